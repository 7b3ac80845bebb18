use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Per-report defaults for an [`crate::IssueBuilder`], usually supplied by
/// the parser that drives it.
///
/// ```toml
/// origin = "grype"
/// origin_name = "Grype"
/// directory = "/workspace/project"
/// path_name = "/workspace/project"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuilderSettings {
    /// Id of the reporting tool
    pub origin: Option<String>,

    /// Display name of the reporting tool
    pub origin_name: Option<String>,

    /// Directory relative file names are resolved against
    pub directory: Option<String>,

    /// Path name stored in every issue
    pub path_name: Option<String>,
}

impl BuilderSettings {
    /// Parse settings from TOML text. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: BuilderSettings = toml::from_str(content)?;
        debug!(
            "Loaded builder settings for origin {}",
            settings.origin.as_deref().unwrap_or("-")
        );
        Ok(settings)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}
