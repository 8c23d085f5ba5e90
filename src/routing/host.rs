//! Host header → tenant label resolution.
//!
//! # Responsibilities
//! - Strip the port from the Host header
//! - Detect subdomains under the local development suffix (`*.localhost`)
//! - Fall back to generic subdomain extraction for real domains
//!
//! # Design Decisions
//! - Host matching is case-insensitive (RFC 9110)
//! - Multi-level labels pass through unmodified (`a.b.localhost` → `a.b`)
//! - IP literals never carry a tenant
//! - Empty label means the main site, not an error

use url::Host;

use crate::config::HostsConfig;

/// Resolves tenant labels from Host headers.
#[derive(Debug, Clone)]
pub struct HostResolver {
    local_suffix: String,
    tld_length: usize,
}

impl HostResolver {
    pub fn new(local_suffix: impl Into<String>, tld_length: usize) -> Self {
        Self {
            local_suffix: local_suffix.into().to_lowercase(),
            tld_length,
        }
    }

    pub fn from_config(config: &HostsConfig) -> Self {
        Self::new(config.local_suffix.clone(), config.tld_length)
    }

    /// Tenant label for a Host header value. Empty when the request targets
    /// the main site.
    pub fn resolve(&self, host: &str) -> String {
        let host = strip_port(host.trim()).to_lowercase();

        let parts: Vec<&str> = host.split('.').collect();
        if parts.len() >= 2 && parts[parts.len() - 1] == self.local_suffix {
            return parts[..parts.len() - 1].join(".");
        }

        self.generic_subdomain(&host)
    }

    /// Everything left of the registered domain, `tld_length` labels for the
    /// public suffix plus one for the domain itself.
    fn generic_subdomain(&self, host: &str) -> String {
        match Host::parse(host) {
            Ok(Host::Domain(domain)) => {
                let labels: Vec<&str> = domain.split('.').collect();
                let keep = self.tld_length + 1;
                if labels.len() > keep {
                    labels[..labels.len() - keep].join(".")
                } else {
                    String::new()
                }
            }
            Ok(Host::Ipv4(_)) | Ok(Host::Ipv6(_)) | Err(_) => String::new(),
        }
    }
}

/// Remove a trailing `:<digits>` port. Bracketed IPv6 literals keep their
/// inner colons.
fn strip_port(host: &str) -> &str {
    match host.rsplit_once(':') {
        Some((rest, port))
            if !port.is_empty()
                && port.bytes().all(|b| b.is_ascii_digit())
                && (!rest.contains(':') || rest.ends_with(']')) =>
        {
            rest
        }
        _ => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> HostResolver {
        HostResolver::new("localhost", 1)
    }

    #[test]
    fn test_local_subdomains() {
        let r = resolver();
        assert_eq!(r.resolve("tenant.localhost:3000"), "tenant");
        assert_eq!(r.resolve("tenant.localhost"), "tenant");
        assert_eq!(r.resolve("localhost:3000"), "");
        assert_eq!(r.resolve("localhost"), "");
        assert_eq!(r.resolve("a.b.localhost"), "a.b");
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(resolver().resolve("Acme.LOCALHOST:8080"), "acme");
    }

    #[test]
    fn test_generic_fallback() {
        let r = resolver();
        assert_eq!(r.resolve("acme.example.com"), "acme");
        assert_eq!(r.resolve("a.b.example.com:443"), "a.b");
        assert_eq!(r.resolve("example.com"), "");
        assert_eq!(r.resolve("com"), "");

        let uk = HostResolver::new("localhost", 2);
        assert_eq!(uk.resolve("shop.acme.co.uk"), "shop");
        assert_eq!(uk.resolve("acme.co.uk"), "");
    }

    #[test]
    fn test_ip_hosts_have_no_tenant() {
        let r = resolver();
        assert_eq!(r.resolve("127.0.0.1:8080"), "");
        assert_eq!(r.resolve("10.1.2.3"), "");
        assert_eq!(r.resolve("[::1]:8080"), "");
        assert_eq!(r.resolve("[::1]"), "");
    }

    #[test]
    fn test_custom_suffix() {
        let r = HostResolver::new("test", 1);
        assert_eq!(r.resolve("acme.test:3000"), "acme");
        assert_eq!(r.resolve("acme.localhost"), "");
    }

    #[test]
    fn test_strip_port() {
        assert_eq!(strip_port("a.localhost:3000"), "a.localhost");
        assert_eq!(strip_port("a.localhost:"), "a.localhost:");
        assert_eq!(strip_port("a.localhost:http"), "a.localhost:http");
        assert_eq!(strip_port("[::1]:80"), "[::1]");
        assert_eq!(strip_port("[::1]"), "[::1]");
    }
}
