//! One-shot flash messages carried in a cookie.
//!
//! A message is set alongside a redirect and consumed (cookie removed) by
//! the next rendered page, so it is shown exactly once. The payload is
//! JSON, base64-encoded so titles with cookie-delimiter characters cannot
//! corrupt the header.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "moodjournal_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    pub level: FlashLevel,
    pub message: String,
}

/// Queue a message for the next rendered page.
pub fn set_flash(jar: CookieJar, level: FlashLevel, message: impl Into<String>) -> CookieJar {
    let payload = FlashMessage {
        level,
        message: message.into(),
    };
    // Serializing two plain fields cannot fail.
    let json = serde_json::to_string(&payload).expect("flash message serializes");
    let cookie = Cookie::build((FLASH_COOKIE, URL_SAFE_NO_PAD.encode(json)))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Take the pending message, if any, removing its cookie so it renders
/// exactly once. An undecodable cookie is discarded silently.
pub fn take_flash(jar: CookieJar) -> (CookieJar, Option<FlashMessage>) {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return (jar, None);
    };

    let message = URL_SAFE_NO_PAD
        .decode(cookie.value())
        .ok()
        .and_then(|bytes| serde_json::from_slice::<FlashMessage>(&bytes).ok());

    let removal = Cookie::build((FLASH_COOKIE, "")).path("/").build();
    (jar.remove(removal), message)
}
