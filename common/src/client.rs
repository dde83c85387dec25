//! Requests against the trust-verdict service
//!
//! Every call is a single blocking attempt with a fixed timeout. Outcomes are
//! classified the same way everywhere:
//! - connect, timeout or body read failures are `EdgeError::Transport`
//! - a status of 400 or above is `EdgeError::Server` with the body attached
//! - anything else, redirects included, is success, and the body is handed
//!   back untouched

use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{EdgeError, Result};
use crate::keypair::{load_keypair, Keypair};
use crate::signing::{self, REGISTER_MESSAGE};
use crate::{AttestationRequest, RegisterRequest};

pub const DEFAULT_API_URL: &str = "http://localhost:3001";
pub const DEFAULT_KEYPAIR_PATH: &str = "edge-keypair.json";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const API_KEY_HEADER: &str = "X-API-Key";

/// Status and raw body of a successful call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Per-invocation client state: where to send requests, how to authenticate,
/// and the optional signing key.
#[derive(Debug, Clone)]
pub struct ClientContext {
    api_url: String,
    api_key: String,
    keypair: Option<Keypair>,
    timeout: Duration,
}

impl ClientContext {
    /// An empty `api_key` is fine for queries, which are unauthenticated.
    pub fn new(api_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let api_url = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            keypair: None,
            timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn attach_keypair(&mut self, keypair: Keypair) {
        self.keypair = Some(keypair);
    }

    /// Best-effort keypair load. A missing or malformed key file leaves the
    /// context without a keypair; attestations are then sent unsigned.
    pub fn try_attach_keypair<P: AsRef<Path>>(&mut self, path: P) -> bool {
        let path = path.as_ref();
        match load_keypair(path) {
            Ok(keypair) => {
                debug!("Loaded keypair {} from {}", keypair.public_base58(), path.display());
                self.keypair = Some(keypair);
                true
            }
            Err(e) => {
                warn!("No usable keypair at {}: {e}", path.display());
                false
            }
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn keypair(&self) -> Option<&Keypair> {
        self.keypair.as_ref()
    }

    pub fn has_keypair(&self) -> bool {
        self.keypair.is_some()
    }

    /// Assemble the attestation body. A signing failure drops
    /// `wallet_signature` instead of failing the attestation.
    pub fn build_attestation(
        &self,
        hex_hash: &str,
        has_c2pa: bool,
        tlsh_hash: Option<&str>,
    ) -> AttestationRequest {
        let mut request = AttestationRequest::new(hex_hash, has_c2pa).with_tlsh_hash(tlsh_hash);
        if let Some(keypair) = self.keypair() {
            match signing::sign_attestation(Some(keypair), hex_hash) {
                Ok(signature) => {
                    info!("Wallet signature: included");
                    request = request.with_wallet_signature(&signature);
                }
                Err(e) => warn!("Wallet signature omitted: {e}"),
            }
        }
        request
    }

    /// `POST {api_url}/api/edge/attest`, authenticated with the API key.
    pub fn submit_attestation(
        &self,
        hex_hash: &str,
        has_c2pa: bool,
        tlsh_hash: Option<&str>,
    ) -> Result<ApiResponse> {
        let request = self.build_attestation(hex_hash, has_c2pa, tlsh_hash);
        self.post_json("/api/edge/attest", &request, Some(&self.api_key))
    }

    /// `GET {api_url}/api/v1/query/{hex_hash}`.
    pub fn query_verdict(&self, hex_hash: &str) -> Result<ApiResponse> {
        self.get(&format!("/api/v1/query/{hex_hash}"))
    }

    /// `GET {api_url}/api/attestation/{hex_hash}`, the raw attestation record.
    pub fn lookup_attestation(&self, hex_hash: &str) -> Result<ApiResponse> {
        self.get(&format!("/api/attestation/{hex_hash}"))
    }

    /// Register this node's public key. The response carries the issued API key.
    pub fn register(&self, name: Option<&str>) -> Result<ApiResponse> {
        let keypair = self.keypair().ok_or(EdgeError::NoKeypairLoaded)?;
        let pubkey = keypair.public_base58();
        let signature = signing::sign_message(Some(keypair), REGISTER_MESSAGE.as_bytes())?;
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("edge-{}", &pubkey[..pubkey.len().min(8)]),
        };
        let request = RegisterRequest {
            pubkey,
            message: REGISTER_MESSAGE.to_string(),
            signature: signature.to_base58(),
            name,
        };
        self.post_json("/api/edge/register", &request, None)
    }

    fn http(&self, url: &str) -> Result<Client> {
        // 3xx responses are returned, never followed
        Client::builder()
            .timeout(self.timeout)
            .redirect(Policy::none())
            .build()
            .map_err(|source| EdgeError::Transport {
                url: url.to_string(),
                source,
            })
    }

    fn post_json<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        api_key: Option<&str>,
    ) -> Result<ApiResponse> {
        let url = format!("{}{path}", self.api_url);
        let mut request = self
            .http(&url)?
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        if let Some(key) = api_key {
            request = request.header(API_KEY_HEADER, key);
        }
        debug!("POST {url}");
        send(&url, request)
    }

    fn get(&self, path: &str) -> Result<ApiResponse> {
        let url = format!("{}{path}", self.api_url);
        debug!("GET {url}");
        send(&url, self.http(&url)?.get(&url))
    }
}

fn send(url: &str, request: RequestBuilder) -> Result<ApiResponse> {
    let transport = |source: reqwest::Error| EdgeError::Transport {
        url: url.to_string(),
        source,
    };
    let response = request.send().map_err(transport)?;
    let status = response.status().as_u16();
    let body = response.text().map_err(transport)?;
    debug!("{url} -> HTTP {status}, {} bytes", body.len());
    if status >= 400 {
        return Err(EdgeError::Server { status, body });
    }
    Ok(ApiResponse { status, body })
}
