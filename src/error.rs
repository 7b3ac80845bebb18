//! Error types. Building issues never fails; only settings and whole-report
//! parsing can.

/// Invalid builder settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// A report could not be read at all. Single malformed entries are skipped
/// or built with defaults instead.
#[derive(Debug, thiserror::Error)]
pub enum ParsingError {
    /// The content is not in the format the parser expects.
    #[error("{parser}: unsupported format: {reason}")]
    Format { parser: String, reason: String },

    /// The content is structured data that failed to decode.
    #[error("{parser}: malformed content: {source}")]
    Json {
        parser: String,
        #[source]
        source: serde_json::Error,
    },
}
