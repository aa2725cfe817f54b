//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation of gateway settings (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Hostname syntax shared with service document validation
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;

/// Maximum hostname length (RFC 1035).
const MAX_HOSTNAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// A single semantic problem with the gateway settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate gateway settings, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.services.dir.is_empty() {
        errors.push(ValidationError::new("services.dir", "must not be empty"));
    }
    if config.services.default_file.is_empty() {
        errors.push(ValidationError::new("services.default_file", "must not be empty"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be greater than 0"));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::new("limits.max_body_bytes", "must be greater than 0"));
    }

    let repo_ok = config
        .update
        .repository
        .split_once('/')
        .map(|(owner, name)| !owner.is_empty() && !name.is_empty() && !name.contains('/'))
        .unwrap_or(false);
    if !repo_ok {
        errors.push(ValidationError::new(
            "update.repository",
            format!("'{}' is not in owner/name form", config.update.repository),
        ));
    }
    if url::Url::parse(&config.update.api_base).is_err() {
        errors.push(ValidationError::new(
            "update.api_base",
            format!("'{}' is not a valid URL", config.update.api_base),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// RFC 1123 hostname syntax check.
pub fn is_valid_hostname(host: &str) -> bool {
    if host.is_empty() || host.len() > MAX_HOSTNAME_LEN {
        return false;
    }

    // A single trailing dot denotes the root and is allowed.
    let host = host.strip_suffix('.').unwrap_or(host);

    host.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}
