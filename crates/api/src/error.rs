use std::path::PathBuf;

use thiserror::Error;

/// Failures while obtaining a category tree snapshot.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("catalog API token contains characters not allowed in a header")]
    InvalidToken,
    #[error("catalog request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("catalog API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to read category file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid category tree JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid category tree YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
