//! Signed-cookie session state.
//!
//! One cookie holds the whole session document: the logged-in username
//! (if any) and the cart. The cookie is signed with a key derived from
//! the configured secret; a missing cookie, a bad signature, or an
//! unparseable payload all fall back to a fresh anonymous session.

use axum_extra::extract::cookie::{Cookie, Key, SameSite, SignedCookieJar};
use serde::{Deserialize, Serialize};

use crate::cart::Cart;

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: Option<String>,
    #[serde(default)]
    pub cart: Cart,
}

/// Derives the cookie signing key from the configured secret. Short
/// secrets are stretched by repetition before derivation; the derive
/// step requires at least 64 bytes of material.
pub fn signing_key(secret: &str) -> Key {
    assert!(!secret.is_empty(), "SECRET_KEY must not be empty");

    let mut material = secret.as_bytes().to_vec();
    while material.len() < 64 {
        material.extend_from_slice(secret.as_bytes());
    }
    Key::derive_from(&material)
}

pub fn load(jar: &SignedCookieJar) -> Session {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| serde_json::from_str(cookie.value()).ok())
        .unwrap_or_default()
}

pub fn store(jar: SignedCookieJar, session: &Session) -> SignedCookieJar {
    let value = serde_json::to_string(session).expect("session document serializes");
    let cookie = Cookie::build((SESSION_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    jar.add(cookie)
}

pub fn clear(jar: SignedCookieJar) -> SignedCookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/").build())
}
