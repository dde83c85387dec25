pub mod base58;
pub mod client;
pub mod error;
pub mod hasher;
pub mod keypair;
pub mod signing;
pub mod similarity;

use serde::{Deserialize, Serialize};

pub use client::{ApiResponse, ClientContext, DEFAULT_API_URL, DEFAULT_KEYPAIR_PATH};
pub use error::{EdgeError, Result};
pub use hasher::{hash_bytes, hash_file, ContentHash};
pub use keypair::{load_keypair, Keypair};
pub use signing::{sign_attestation, verify_attestation, WalletSignature};
pub use similarity::similarity_hash;

/// Body of `POST /api/edge/attest`.
///
/// Field order is the wire order; optional fields are left out entirely
/// rather than sent as `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttestationRequest {
    pub content_hash: String,
    pub has_c2pa: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wallet_signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tlsh_hash: Option<String>,
}

impl AttestationRequest {
    pub fn new(content_hash: impl Into<String>, has_c2pa: bool) -> Self {
        Self {
            content_hash: content_hash.into(),
            has_c2pa,
            wallet_signature: None,
            tlsh_hash: None,
        }
    }

    pub fn with_wallet_signature(mut self, signature: &WalletSignature) -> Self {
        self.wallet_signature = Some(signature.to_base58());
        self
    }

    /// Empty similarity hashes are treated as absent.
    pub fn with_tlsh_hash(mut self, tlsh_hash: Option<&str>) -> Self {
        self.tlsh_hash = tlsh_hash.filter(|h| !h.is_empty()).map(str::to_owned);
        self
    }
}

/// Body of `POST /api/edge/register`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterRequest {
    pub pubkey: String,
    pub message: String,
    pub signature: String,
    pub name: String,
}
