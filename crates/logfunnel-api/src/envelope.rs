//! Signed-request envelope verification.
//!
//! A signed request is a compact two-part token `signature.payload`: the
//! payload is a base64-encoded JSON blob, the signature is the
//! base64-encoded HMAC-SHA256 of the payload under a shared secret.
//! Verification authenticates the token and decodes the payload's
//! `context` field into a [`TrustedContext`]. Pure function of its inputs;
//! no side effects.

use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use logfunnel_core::{CollectorError, Result, TrustedContext};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Authenticates a signed-request token and extracts its trusted context.
///
/// The digest comparison is constant-time: the computed HMAC is checked
/// for equality against the declared signature, never merely for
/// non-emptiness.
///
/// # Errors
///
/// Fails with the envelope error taxonomy: missing token/key, malformed
/// token, missing payload, signature mismatch, undecodable payload, or a
/// payload without a `context` field.
pub fn verify(token: &str, secret: &str) -> Result<TrustedContext> {
    if token.is_empty() {
        return Err(CollectorError::MissingToken);
    }
    if secret.is_empty() {
        return Err(CollectorError::MissingKey);
    }

    let (signature, payload) = split_token(token)?;
    if payload.is_empty() {
        return Err(CollectorError::MissingPayload);
    }

    let expected = signature_for(payload, secret)?;
    if !timing_safe_eq(signature, &expected) {
        return Err(CollectorError::InvalidSignature);
    }

    decode_context(payload)
}

/// Computes the base64-encoded HMAC-SHA256 digest of a payload segment.
///
/// Exposed so callers constructing tokens (test fixtures, upstream
/// signers) share the exact digest rules the verifier applies.
pub fn signature_for(payload: &str, secret: &str) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| CollectorError::MissingKey)?;
    mac.update(payload.as_bytes());
    Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

/// Splits a token into its signature and payload segments.
///
/// Exactly one dot, and the signature segment must be non-empty. An empty
/// payload segment is reported separately by the caller so the failure
/// names what is actually missing.
fn split_token(token: &str) -> Result<(&str, &str)> {
    let mut parts = token.splitn(3, '.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(signature), Some(payload), None) if !signature.is_empty() => {
            Ok((signature, payload))
        },
        _ => Err(CollectorError::MalformedToken),
    }
}

/// Decodes the payload segment and extracts its `context` field.
fn decode_context(payload: &str) -> Result<TrustedContext> {
    let decoded = general_purpose::STANDARD
        .decode(payload)
        .map_err(|e| CollectorError::InvalidPayloadEncoding { reason: e.to_string() })?;

    let parsed: serde_json::Value = serde_json::from_slice(&decoded)
        .map_err(|e| CollectorError::InvalidPayloadJson { reason: e.to_string() })?;

    let context = parsed.get("context").cloned().ok_or(CollectorError::MissingContext)?;

    serde_json::from_value(context)
        .map_err(|e| CollectorError::InvalidPayloadJson { reason: e.to_string() })
}

/// Timing-safe string comparison to prevent timing attacks.
fn timing_safe_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (a_byte, b_byte) in a.as_bytes().iter().zip(b.as_bytes()) {
        result |= a_byte ^ b_byte;
    }

    result == 0
}
