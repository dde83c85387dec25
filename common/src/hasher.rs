//! SHA-256 content hashing
//!
//! The hex form of the digest is what the trust service indexes on and what
//! gets embedded in the signed attestation message.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{EdgeError, Result};

pub const HASH_LEN: usize = 32;

/// A SHA-256 digest paired with its lowercase hex representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHash {
    bytes: [u8; HASH_LEN],
    hex: String,
}

impl ContentHash {
    fn from_digest(bytes: [u8; HASH_LEN]) -> Self {
        Self {
            hex: hex::encode(bytes),
            bytes,
        }
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.bytes
    }

    /// 64 lowercase hex characters.
    pub fn hex(&self) -> &str {
        &self.hex
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.hex)
    }
}

/// Hash a file without loading it into memory.
///
/// # Errors
///
/// Returns `EdgeError::Io` if the file cannot be opened or read.
pub fn hash_file<P: AsRef<Path>>(path: P) -> Result<ContentHash> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| EdgeError::io(path, e))?;
    hash_reader(file).map_err(|e| EdgeError::io(path, e))
}

/// Hash everything `reader` yields. Interrupted reads are retried.
pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<ContentHash> {
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(ContentHash::from_digest(hasher.finalize().into()))
}

pub fn hash_bytes(data: &[u8]) -> ContentHash {
    ContentHash::from_digest(Sha256::digest(data).into())
}
