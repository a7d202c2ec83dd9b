//! Minimal JWT inspection for expiry checks.
//!
//! The client never verifies signatures; it only reads the `exp` claim to
//! decide when to refresh. Anything that fails to decode is treated as
//! expired so a garbage token can never keep a session alive.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Extracts the `exp` claim (seconds since epoch) from a JWT.
///
/// Returns `None` for anything that is not a decodable three-part token
/// with a numeric `exp`.
pub fn expiry(token: &str) -> Option<i64> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return None;
    }
    let decoded = URL_SAFE_NO_PAD.decode(parts[1]).ok()?;
    let json: serde_json::Value = serde_json::from_slice(&decoded).ok()?;
    json.get("exp").and_then(serde_json::Value::as_i64)
}

/// Returns true if the token's `exp` is at or before the current wall clock.
///
/// Fails closed: malformed tokens count as expired.
pub fn is_expired(token: &str) -> bool {
    match expiry(token) {
        Some(exp) => exp <= chrono::Utc::now().timestamp(),
        None => true,
    }
}
