use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};

use crate::base58;
use crate::error::{EdgeError, Result};
use crate::keypair::{Keypair, PUBLIC_KEY_LEN};

pub const SIGNATURE_LEN: usize = 64;

/// Prefix of the message the service verifies wallet signatures against.
pub const ATTEST_PREFIX: &str = "R3L: attest ";
/// Message signed when registering an edge node.
pub const REGISTER_MESSAGE: &str = "R3L: register";

/// Raw Ed25519 signature bytes. Base58 is only applied on the way out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletSignature([u8; SIGNATURE_LEN]);

impl WalletSignature {
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    pub fn to_base58(&self) -> String {
        base58::encode(&self.0)
    }
}

/// Canonical attestation message: `"R3L: attest " + hex_hash`, byte for byte.
pub fn attestation_message(hex_hash: &str) -> String {
    format!("{ATTEST_PREFIX}{hex_hash}")
}

/// Sign arbitrary message bytes with the seed half of `keypair`.
/// - `keypair`: `None` fails with `NoKeypairLoaded`
/// - the stored public half must belong to the seed, otherwise the key is
///   rejected with `SigningFailure`
pub fn sign_message(keypair: Option<&Keypair>, message: &[u8]) -> Result<WalletSignature> {
    let keypair = keypair.ok_or(EdgeError::NoKeypairLoaded)?;
    let key = SigningKey::from_keypair_bytes(&keypair.to_bytes())?;
    Ok(WalletSignature(key.sign(message).to_bytes()))
}

/// Sign the canonical attestation message for `hex_hash`.
pub fn sign_attestation(keypair: Option<&Keypair>, hex_hash: &str) -> Result<WalletSignature> {
    sign_message(keypair, attestation_message(hex_hash).as_bytes())
}

/// Check a wallet signature over the attestation message for `hex_hash`.
/// Returns `Ok(false)` on a well-formed key whose signature does not match.
pub fn verify_attestation(
    public: &[u8; PUBLIC_KEY_LEN],
    hex_hash: &str,
    signature: &WalletSignature,
) -> Result<bool> {
    let verifying_key = VerifyingKey::from_bytes(public)?;
    let signature = Signature::from_bytes(signature.as_bytes());
    Ok(verifying_key
        .verify(attestation_message(hex_hash).as_bytes(), &signature)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::hash_bytes;

    // RFC 8032, section 7.1, TEST 1
    const RFC_SEED: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";
    const RFC_PUBLIC: &str = "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a";
    const RFC_EMPTY_SIG: &str = "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155\
                                 5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b";

    fn rfc_keypair() -> Keypair {
        let mut bytes = [0u8; 64];
        hex::decode_to_slice(RFC_SEED, &mut bytes[..32]).unwrap();
        hex::decode_to_slice(RFC_PUBLIC, &mut bytes[32..]).unwrap();
        Keypair::from_bytes(&bytes)
    }

    #[test]
    fn canonical_message_framing() {
        let hex_hash = hash_bytes(b"hello").hex().to_string();
        let message = attestation_message(&hex_hash);
        assert_eq!(
            message,
            "R3L: attest 2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
        assert_eq!(message.len(), ATTEST_PREFIX.len() + 64);
    }

    #[test]
    fn rfc8032_vector() {
        let kp = rfc_keypair();
        let sig = sign_message(Some(&kp), b"").unwrap();
        assert_eq!(hex::encode(sig.as_bytes()), RFC_EMPTY_SIG);
    }

    #[test]
    fn attestation_signature_is_deterministic_and_verifies() {
        let kp = Keypair::generate();
        let hex_hash = hash_bytes(b"frame-0001").hex().to_string();

        let first = sign_attestation(Some(&kp), &hex_hash).unwrap();
        let second = sign_attestation(Some(&kp), &hex_hash).unwrap();
        assert_eq!(first, second);
        assert!(verify_attestation(kp.public(), &hex_hash, &first).unwrap());
    }

    #[test]
    fn signs_message_not_raw_hash() {
        let kp = rfc_keypair();
        let hash = hash_bytes(b"hello");
        let sig = sign_attestation(Some(&kp), hash.hex()).unwrap();

        assert_eq!(sig, sign_message(Some(&kp), attestation_message(hash.hex()).as_bytes()).unwrap());
        assert_ne!(sig, sign_message(Some(&kp), hash.as_bytes()).unwrap());
        assert_ne!(sig, sign_message(Some(&kp), hash.hex().as_bytes()).unwrap());
    }

    #[test]
    fn one_changed_hex_char_changes_signature() {
        let kp = Keypair::generate();
        let hex_hash = hash_bytes(b"original").hex().to_string();
        let mut tampered = hex_hash.clone();
        let last = if tampered.ends_with('0') { "1" } else { "0" };
        tampered.replace_range(63.., last);

        let sig = sign_attestation(Some(&kp), &hex_hash).unwrap();
        let tampered_sig = sign_attestation(Some(&kp), &tampered).unwrap();
        assert_ne!(sig, tampered_sig);
        assert!(!verify_attestation(kp.public(), &tampered, &sig).unwrap());
        assert!(verify_attestation(kp.public(), &tampered, &tampered_sig).unwrap());
    }

    #[test]
    fn no_keypair_fails() {
        let err = sign_attestation(None, "00").unwrap_err();
        assert!(matches!(err, EdgeError::NoKeypairLoaded));
    }

    #[test]
    fn mismatched_public_half_is_signing_failure() {
        let mut bytes = rfc_keypair().to_bytes();
        bytes[63] ^= 0x01;
        let kp = Keypair::from_bytes(&bytes);
        let err = sign_attestation(Some(&kp), "00").unwrap_err();
        assert!(matches!(err, EdgeError::SigningFailure(_)));
    }

    #[test]
    fn signature_base58_round_trips() {
        let kp = Keypair::generate();
        let sig = sign_attestation(Some(&kp), "ab").unwrap();
        let encoded = sig.to_base58();
        assert_eq!(base58::decode(&encoded).unwrap(), sig.as_bytes().to_vec());
    }
}
