//! Domain name validation and slug base derivation.

/// Longest DNS label allowed in a domain name.
const MAX_LABEL_LEN: usize = 63;

/// Shortest acceptable domain, e.g. `a.co`.
const MIN_DOMAIN_LEN: usize = 4;

fn strip_protocol(domain: &str) -> &str {
    domain
        .strip_prefix("https://")
        .or_else(|| domain.strip_prefix("http://"))
        .unwrap_or(domain)
}

/// Validate a user-supplied domain name. Returns every problem found; an
/// empty list means the domain is acceptable. Blank input is left to the
/// presence check.
pub fn validate_domain(domain: &str) -> Vec<String> {
    let mut errors = Vec::new();
    if domain.trim().is_empty() {
        return errors;
    }

    let clean = strip_protocol(domain);

    if !is_well_formed(clean) {
        errors.push("domain_name must be a valid domain format (e.g., example.com)".to_string());
    }
    if clean.contains("..") || clean.starts_with('.') || clean.ends_with('.') {
        errors.push("domain_name contains invalid characters or format".to_string());
    }
    if clean.len() < MIN_DOMAIN_LEN {
        errors.push("domain_name is too short".to_string());
    }

    errors
}

/// One or more `label.` groups followed by an alphabetic TLD of at least two
/// characters. Labels are alphanumeric with inner hyphens.
fn is_well_formed(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    let Some((tld, labels)) = labels.split_last() else {
        return false;
    };
    if labels.is_empty() {
        return false;
    }

    let tld_ok = tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic());
    tld_ok && labels.iter().all(|label| is_valid_label(label))
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= MAX_LABEL_LEN
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Slug base for a domain: the first label, lower-cased, keeping only
/// `[a-z0-9-_]`. `uniteldirect.co.uk` → `uniteldirect`.
pub fn domain_base(domain: &str) -> Option<String> {
    let first = strip_protocol(domain.trim()).split('.').next()?;
    let base: String = first
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_')
        .collect();

    if base.is_empty() {
        None
    } else {
        Some(base)
    }
}
