use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("pattern symbol must be a single character, got {0:?}")]
    InvalidSymbol(String),
    #[error("invalid regex for pattern {symbol:?}: {source}")]
    InvalidPattern {
        symbol: char,
        #[source]
        source: regex::Error,
    },
    #[error("invalid regex in rule {regex:?}: {source}")]
    InvalidRule {
        regex: String,
        #[source]
        source: regex::Error,
    },
    #[error("either `format` or `pattern` must be set")]
    MissingMask,
    #[error("`format` and `pattern` cannot both be set")]
    ConflictingMask,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
