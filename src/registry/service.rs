//! Service document schema.
//!
//! Two document shapes exist on disk: the single default document describing
//! the fallback service, and any number of additional documents each listing
//! services and API hostnames.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::config::validation::is_valid_hostname;

/// A backend service addressed by its root domain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct Service {
    #[validate(length(min = 1))]
    pub name: String,

    /// Backend URL requests are proxied to.
    #[validate(length(min = 1), url)]
    pub host: String,

    /// Root domain this service answers for.
    #[validate(length(min = 1), custom(function = "validate_domain"))]
    pub domain: String,

    /// Support server or location.
    #[validate(length(min = 1))]
    pub support: String,

    /// Status page URL.
    #[validate(length(min = 1), url)]
    pub status: String,
}

/// Fallback used when no service domain matches. Has no backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Validate)]
pub struct DefaultService {
    #[validate(length(min = 1))]
    pub name: String,

    #[validate(length(min = 1), custom(function = "validate_domain"))]
    pub domain: String,

    #[validate(length(min = 1))]
    pub support: String,

    #[validate(length(min = 1), url)]
    pub status: String,
}

impl From<&DefaultService> for Service {
    fn from(default: &DefaultService) -> Self {
        Self {
            name: default.name.clone(),
            host: String::new(),
            domain: default.domain.clone(),
            support: default.support.clone(),
            status: default.status.clone(),
        }
    }
}

/// An additional service document.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceDocument {
    #[validate(nested)]
    pub services: Vec<Service>,

    /// Hostnames that always get the maintenance JSON.
    pub api_urls: Vec<String>,
}

fn validate_domain(domain: &str) -> Result<(), ValidationError> {
    if is_valid_hostname(domain) {
        Ok(())
    } else {
        Err(ValidationError::new("hostname"))
    }
}
