//! Ed25519 key files
//!
//! A key file holds 64 byte values, 32-byte seed followed by the 32-byte
//! public key, conventionally as a JSON array (`[12,201,...]`). Parsing only
//! looks for runs of decimal digits, so brackets, commas and whitespace are
//! all just separators.

use std::fmt;
use std::fs;
use std::path::Path;

use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use tracing::debug;

use crate::base58;
use crate::error::{EdgeError, Result};

pub const SEED_LEN: usize = 32;
pub const PUBLIC_KEY_LEN: usize = 32;
pub const KEYPAIR_LEN: usize = SEED_LEN + PUBLIC_KEY_LEN;

#[derive(Clone, PartialEq, Eq)]
pub struct Keypair {
    seed: [u8; SEED_LEN],
    public: [u8; PUBLIC_KEY_LEN],
}

impl Keypair {
    pub fn from_bytes(bytes: &[u8; KEYPAIR_LEN]) -> Self {
        let mut seed = [0u8; SEED_LEN];
        let mut public = [0u8; PUBLIC_KEY_LEN];
        seed.copy_from_slice(&bytes[..SEED_LEN]);
        public.copy_from_slice(&bytes[SEED_LEN..]);
        Self { seed, public }
    }

    /// Fresh keypair from the OS random source.
    pub fn generate() -> Self {
        let key = SigningKey::generate(&mut OsRng);
        Self::from_bytes(&key.to_keypair_bytes())
    }

    /// Scan `text` for the first 64 decimal integers, each taken modulo 256.
    ///
    /// # Errors
    ///
    /// Returns `EdgeError::InvalidKeypairFormat` when fewer than 64 are found.
    pub fn parse(text: &str) -> Result<Self> {
        let values: Vec<u8> = text
            .split(|c: char| !c.is_ascii_digit())
            .filter(|token| !token.is_empty())
            .map(|token| {
                token
                    .bytes()
                    .fold(0u32, |acc, d| (acc * 10 + u32::from(d - b'0')) % 256) as u8
            })
            .take(KEYPAIR_LEN)
            .collect();

        let bytes: [u8; KEYPAIR_LEN] = values
            .as_slice()
            .try_into()
            .map_err(|_| EdgeError::InvalidKeypairFormat {
                found: values.len(),
            })?;
        Ok(Self::from_bytes(&bytes))
    }

    /// Write the keypair as a compact JSON byte array.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string(&self.to_bytes().to_vec())?;
        fs::write(path, json).map_err(|e| EdgeError::io(path, e))?;
        debug!("Wrote keypair to {}", path.display());
        Ok(())
    }

    pub fn seed(&self) -> &[u8; SEED_LEN] {
        &self.seed
    }

    pub fn public(&self) -> &[u8; PUBLIC_KEY_LEN] {
        &self.public
    }

    pub fn to_bytes(&self) -> [u8; KEYPAIR_LEN] {
        let mut out = [0u8; KEYPAIR_LEN];
        out[..SEED_LEN].copy_from_slice(&self.seed);
        out[SEED_LEN..].copy_from_slice(&self.public);
        out
    }

    /// Wallet-style address of the public half.
    pub fn public_base58(&self) -> String {
        base58::encode(&self.public)
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("public", &self.public_base58())
            .finish_non_exhaustive()
    }
}

/// Load a keypair from a key file.
///
/// # Errors
///
/// `EdgeError::Io` if the file can't be read, `EdgeError::InvalidKeypairFormat`
/// if it holds fewer than 64 integers.
pub fn load_keypair<P: AsRef<Path>>(path: P) -> Result<Keypair> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| EdgeError::io(path, e))?;
    Keypair::parse(&text)
}
