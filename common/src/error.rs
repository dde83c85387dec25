//! Error types for the edge client core

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while hashing, signing or talking to the trust service
#[derive(Debug, Error)]
pub enum EdgeError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid keypair format: expected 64 byte values, found {found}")]
    InvalidKeypairFormat { found: usize },

    #[error("No keypair loaded")]
    NoKeypairLoaded,

    #[error("Signing failed: {0}")]
    SigningFailure(#[from] ed25519_dalek::SignatureError),

    #[error("Invalid base58: {0}")]
    InvalidBase58(#[from] bs58::decode::Error),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Server returned HTTP {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl EdgeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EdgeError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = EdgeError> = std::result::Result<T, E>;
