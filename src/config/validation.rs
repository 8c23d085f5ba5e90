//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect duplicate accounts and shared API keys
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SiteConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::SiteConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

const LOG_FORMATS: &[&str] = &["pretty", "json"];

/// Validate a parsed configuration.
pub fn validate_config(config: &SiteConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.admin.enabled {
        check_addr(&mut errors, "admin.bind_address", &config.admin.bind_address);
    }
    if config.observability.metrics_enabled {
        check_addr(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    let suffix = &config.hosts.local_suffix;
    if suffix.is_empty() {
        errors.push(ValidationError::new("hosts.local_suffix", "must not be empty"));
    } else if suffix.contains('.') {
        errors.push(ValidationError::new("hosts.local_suffix", "must be a single label"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    if !LOG_FORMATS.contains(&config.observability.log_format.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_format",
            format!("unknown format '{}'", config.observability.log_format),
        ));
    }

    let mut ids = HashSet::new();
    let mut keys = HashSet::new();
    for (i, account) in config.accounts.iter().enumerate() {
        if account.id.trim().is_empty() {
            errors.push(ValidationError::new(format!("accounts[{}].id", i), "must not be empty"));
        } else if !ids.insert(account.id.as_str()) {
            errors.push(ValidationError::new(
                format!("accounts[{}].id", i),
                format!("duplicate account '{}'", account.id),
            ));
        }

        if account.api_key.trim().is_empty() {
            errors.push(ValidationError::new(format!("accounts[{}].api_key", i), "must not be empty"));
        } else if !keys.insert(account.api_key.as_str()) {
            errors.push(ValidationError::new(
                format!("accounts[{}].api_key", i),
                "already used by another account",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_addr(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(field, format!("invalid socket address '{}'", value)));
    }
}
