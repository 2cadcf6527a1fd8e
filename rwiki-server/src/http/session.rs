//! Signed session cookies.
//!
//! The token format is `{username}.{expiry_unix}.{hex_mac}` where the
//! MAC is a keyed blake3 hash over `{username}.{expiry_unix}`. The key
//! is derived from the configured session secret, so tokens survive
//! restarts but die with a secret rotation.

use blake3::Hash;

pub const SESSION_COOKIE: &str = "rwiki_session";

const KEY_CONTEXT: &str = "rwiki 2024 session cookie v1";

/// Derive the fixed-size MAC key from the configured secret.
pub fn derive_key(secret: &str) -> [u8; 32] {
    blake3::derive_key(KEY_CONTEXT, secret.as_bytes())
}

fn mac(key: &[u8; 32], payload: &str) -> Hash {
    blake3::keyed_hash(key, payload.as_bytes())
}

/// Sign a session token for `username` expiring at `expiry_unix`.
pub fn issue_token(key: &[u8; 32], username: &str, expiry_unix: i64) -> String {
    let payload = format!("{username}.{expiry_unix}");
    let tag = mac(key, &payload);
    format!("{payload}.{}", tag.to_hex())
}

/// Verify a token and return the username it was issued for.
///
/// Rejects malformed tokens, bad signatures and expired sessions. The
/// signature check goes through [`blake3::Hash`] equality, which is
/// constant-time.
pub fn verify_token(key: &[u8; 32], token: &str, now_unix: i64) -> Option<String> {
    let (payload, hex_tag) = token.rsplit_once('.')?;
    let (username, expiry) = payload.rsplit_once('.')?;
    if username.is_empty() {
        return None;
    }
    let expiry: i64 = expiry.parse().ok()?;

    let claimed = Hash::from_hex(hex_tag).ok()?;
    if mac(key, payload) != claimed {
        return None;
    }
    if now_unix >= expiry {
        return None;
    }
    Some(username.to_string())
}

/// Set-Cookie value for a fresh session.
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}")
}

/// Set-Cookie value that clears the session.
pub fn clear_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Pull the session token out of a raw Cookie header value.
pub fn token_from_cookie_header(header: &str) -> Option<&str> {
    header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        (name == SESSION_COOKIE).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let key = derive_key("secret-at-least-this-long");
        let token = issue_token(&key, "admin", 2_000_000_000);
        assert_eq!(
            verify_token(&key, &token, 1_000_000_000).as_deref(),
            Some("admin")
        );
    }

    #[test]
    fn expired_token_is_rejected() {
        let key = derive_key("secret");
        let token = issue_token(&key, "admin", 100);
        assert_eq!(verify_token(&key, &token, 100), None);
        assert_eq!(verify_token(&key, &token, 101), None);
    }

    #[test]
    fn tampered_token_is_rejected() {
        let key = derive_key("secret");
        let token = issue_token(&key, "admin", 2_000_000_000);
        let forged = token.replacen("admin", "mallory", 1);
        assert_eq!(verify_token(&key, &forged, 0), None);
    }

    #[test]
    fn wrong_key_is_rejected() {
        let token = issue_token(&derive_key("one"), "admin", 2_000_000_000);
        assert_eq!(verify_token(&derive_key("two"), &token, 0), None);
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let key = derive_key("secret");
        for junk in ["", "a", "a.b", "a.b.c", "..deadbeef", "admin.notanumber.00"] {
            assert_eq!(verify_token(&key, junk, 0), None, "{junk:?}");
        }
    }

    #[test]
    fn username_with_dots_survives() {
        // rsplit keeps everything before the last two separators as
        // the username, dots included.
        let key = derive_key("secret");
        let token = issue_token(&key, "admin.re", 2_000_000_000);
        assert_eq!(verify_token(&key, &token, 0).as_deref(), Some("admin.re"));
    }

    #[test]
    fn cookie_header_parsing() {
        assert_eq!(
            token_from_cookie_header("foo=bar; rwiki_session=abc.1.ff; other=x"),
            Some("abc.1.ff")
        );
        assert_eq!(token_from_cookie_header("foo=bar"), None);
        assert_eq!(token_from_cookie_header(""), None);
    }
}
