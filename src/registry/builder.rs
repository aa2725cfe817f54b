//! Registry construction from the services directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use validator::Validate;

use crate::config::ServicesConfig;
use crate::registry::service::{DefaultService, Service, ServiceDocument};
use crate::registry::ServiceRegistry;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("could not validate {}: {source}", path.display())]
    Validation {
        path: PathBuf,
        #[source]
        source: validator::ValidationErrors,
    },
}

/// Loads the default document and every additional document in a directory.
#[derive(Debug, Clone)]
pub struct RegistryBuilder {
    dir: PathBuf,
    default_file: String,
}

impl RegistryBuilder {
    pub fn new(dir: impl Into<PathBuf>, default_file: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            default_file: default_file.into(),
        }
    }

    pub fn from_config(config: &ServicesConfig) -> Self {
        Self::new(&config.dir, &config.default_file)
    }

    /// Build the registry.
    ///
    /// Fails only when the default document or the directory listing fails.
    /// Any additional document that cannot be read, parsed, or validated is
    /// logged and skipped.
    pub fn build(&self) -> Result<ServiceRegistry, RegistryError> {
        let default_path = self.dir.join(&self.default_file);
        let default_service: DefaultService = load_document(&default_path)?;

        let mut services: Vec<Service> = Vec::new();
        let mut api_urls: Vec<String> = Vec::new();

        for path in self.additional_documents()? {
            match load_document::<ServiceDocument>(&path) {
                Ok(doc) => {
                    tracing::info!(
                        path = %path.display(),
                        services = doc.services.len(),
                        api_urls = doc.api_urls.len(),
                        "Loaded service file"
                    );
                    services.extend(doc.services);
                    api_urls.extend(doc.api_urls);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Skipping service file");
                }
            }
        }

        let registry = ServiceRegistry::new(default_service, services, api_urls);

        tracing::info!(
            services = registry.services().len(),
            api_urls = registry.api_hostname_count(),
            default = %registry.default_service().name,
            "Service registry built"
        );

        Ok(registry)
    }

    /// Additional document paths in file-name order.
    fn additional_documents(&self) -> Result<Vec<PathBuf>, RegistryError> {
        let entries = fs::read_dir(&self.dir).map_err(|source| RegistryError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::error!(dir = %self.dir.display(), error = %e, "Could not read directory entry");
                    continue;
                }
            };

            let path = entry.path();
            if entry.file_name() == self.default_file.as_str() {
                continue;
            }
            match skip_reason(&path) {
                Some(reason) => {
                    tracing::debug!(path = %path.display(), reason, "Ignoring services directory entry");
                }
                None => paths.push(path),
            }
        }

        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }
}

/// Why a directory entry is not loaded as an additional document.
fn skip_reason(path: &Path) -> Option<&'static str> {
    if !path.is_file() {
        return Some("not a regular file");
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => None,
        _ => Some("extension is not .yaml or .yml"),
    }
}

/// Read, parse and validate one YAML document.
fn load_document<T>(path: &Path) -> Result<T, RegistryError>
where
    T: DeserializeOwned + Validate,
{
    let content = fs::read_to_string(path).map_err(|source| RegistryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let doc: T = serde_yaml::from_str(&content).map_err(|source| RegistryError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    doc.validate().map_err(|source| RegistryError::Validation {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(doc)
}
