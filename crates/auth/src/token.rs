//! Opaque auth tokens.

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;

const TOKEN_BYTES: usize = 32;

/// A freshly generated auth token (256 random bits, URL-safe base64).
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl core::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("AuthToken(..)")
    }
}

/// Pull the token out of an `Authorization` header value.
///
/// Accepts the bare token or `Bearer <token>`. Blank values yield `None`.
pub fn extract_token(header: Option<&str>) -> Option<&str> {
    let value = header?.trim();
    let token = match value.strip_prefix("Bearer") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim(),
        _ => value,
    };
    if token.is_empty() { None } else { Some(token) }
}
