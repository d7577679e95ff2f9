//! Webhook signature verification.
//!
//! LINE signs each webhook delivery with base64(HMAC-SHA256(channel
//! secret, raw body)) in the `X-Line-Signature` header.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Compute the signature for a raw body. Used by tests and tooling to
/// produce valid webhook deliveries.
pub fn sign(channel_secret: &str, body: &[u8]) -> String {
    // HMAC accepts keys of any length, so new_from_slice cannot fail.
    let mut mac = HmacSha256::new_from_slice(channel_secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(body);
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Validate an `X-Line-Signature` value against the raw request body.
///
/// Returns `false` for malformed base64 or any mismatch. The comparison
/// is constant-time.
pub fn verify_signature(channel_secret: &str, body: &[u8], signature: &str) -> bool {
    let expected = match STANDARD.decode(signature) {
        Ok(bytes) => bytes,
        Err(_) => return false,
    };

    let mut mac = match HmacSha256::new_from_slice(channel_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_verifies() {
        let body = br#"{"events":[]}"#;
        let signature = sign("secret", body);
        assert!(verify_signature("secret", body, &signature));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let body = b"payload";
        let signature = sign("secret", body);
        assert!(!verify_signature("other-secret", body, &signature));
    }

    #[test]
    fn test_tampered_body_rejected() {
        let signature = sign("secret", b"payload");
        assert!(!verify_signature("secret", b"payload!", &signature));
    }

    #[test]
    fn test_malformed_base64_rejected() {
        assert!(!verify_signature("secret", b"payload", "not base64!!!"));
    }

    #[test]
    fn test_verification_is_idempotent() {
        let body = b"payload";
        let signature = sign("secret", body);
        let first = verify_signature("secret", body, &signature);
        let second = verify_signature("secret", body, &signature);
        assert_eq!(first, second);
        assert!(first);
    }
}
