//! Cryptographic Utilities
//!
//! Session secrets and HMAC-signed tokens of the form
//! `<payload>.<base64url(HMAC-SHA256(payload))>`.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use hmac::{Hmac, Mac};
use rand::{RngCore, rngs::OsRng};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// 32 random bytes, sized for an HMAC-SHA256 key
pub fn random_key() -> [u8; 32] {
    let mut key = [0u8; 32];
    OsRng.fill_bytes(&mut key);
    key
}

/// Compute HMAC-SHA256
pub fn hmac_sha256(key: &[u8; 32], data: &[u8]) -> [u8; 32] {
    // A 32-byte key is always a valid HMAC key length.
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key)
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(data);
    mac.finalize().into_bytes().into()
}

// ============================================================================
// Signed tokens
// ============================================================================

/// Sign `payload`, producing `<payload>.<signature>`
///
/// The payload must not contain `.`; callers use UUIDs or similar.
pub fn sign_token(secret: &[u8; 32], payload: &str) -> String {
    let signature = hmac_sha256(secret, payload.as_bytes());
    format!("{}.{}", payload, URL_SAFE_NO_PAD.encode(signature))
}

/// Verify a token produced by [`sign_token`] and return its payload
///
/// Returns `None` for malformed tokens or a signature mismatch.
pub fn verify_token(secret: &[u8; 32], token: &str) -> Option<String> {
    let (payload, signature_b64) = token.split_once('.')?;
    if payload.is_empty() || signature_b64.contains('.') {
        return None;
    }

    let signature = URL_SAFE_NO_PAD.decode(signature_b64).ok()?;

    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret).ok()?;
    mac.update(payload.as_bytes());
    mac.verify_slice(&signature).ok()?;

    Some(payload.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hmac_known_value() {
        // HMAC-SHA256("key", "The quick brown fox jumps over the lazy dog") with a
        // zero-padded 32-byte key equals the short-key result, since HMAC pads keys.
        let mut key = [0u8; 32];
        key[..3].copy_from_slice(b"key");
        let mac = hmac_sha256(&key, b"The quick brown fox jumps over the lazy dog");
        let expected =
            hex::decode("f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8")
                .unwrap();
        assert_eq!(mac.to_vec(), expected);
    }

    #[test]
    fn test_random_key() {
        let key = random_key();
        assert!(key.iter().any(|&b| b != 0));
        assert_ne!(key, random_key());
    }

    #[test]
    fn test_signed_token_verifies() {
        let secret = [7u8; 32];
        let token = sign_token(&secret, "session-123");
        assert!(token.starts_with("session-123."));
        assert_eq!(
            verify_token(&secret, &token),
            Some("session-123".to_string())
        );
    }

    #[test]
    fn test_signed_token_rejects_tampering() {
        let secret = [7u8; 32];
        let token = sign_token(&secret, "session-123");
        let (_, sig) = token.split_once('.').unwrap();

        assert_eq!(verify_token(&secret, &format!("session-124.{sig}")), None);
        assert_eq!(verify_token(&[8u8; 32], &token), None);
        assert_eq!(verify_token(&secret, "session-123"), None);
        assert_eq!(verify_token(&secret, "session-123.!!!"), None);
        assert_eq!(verify_token(&secret, &format!(".{sig}")), None);

        let truncated = &sig[..sig.len() - 4];
        assert_eq!(verify_token(&secret, &format!("session-123.{truncated}")), None);
    }
}
