use thiserror::Error;

/// Errors returned when loading declarations or observed security groups.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse TOML in {path}: {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("failed to parse JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
    #[error("no security group matches '{selector}'")]
    GroupNotFound { selector: String },
    #[error("'{selector}' matches {count} security groups; pass a group id")]
    AmbiguousGroup { selector: String, count: usize },
}
