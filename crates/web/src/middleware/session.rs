//! Session middleware configuration.
//!
//! Sessions live server-side (`PostgreSQL` in production, memory in tests);
//! the cookie only carries the session id.

use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, Session, SessionManagerLayer, SessionStore};

use crate::models::session_keys;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "sl_session";

/// Create the session layer over any session store.
///
/// # Arguments
///
/// * `store` - Session store backend
/// * `secure` - Whether to mark the cookie `Secure` (HTTPS deployments)
/// * `ttl_secs` - Inactivity expiry in seconds
#[must_use]
pub fn create_session_layer<S>(store: S, secure: bool, ttl_secs: i64) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(ttl_secs)))
        .with_secure(secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Store a one-shot message for the next page that displays flashes.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_flash(
    session: &Session,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::FLASH, message.into()).await
}

/// Remove and return the pending flash message, if any.
///
/// # Errors
///
/// Returns an error if the session cannot be read or modified.
pub async fn take_flash(session: &Session) -> Result<Option<String>, tower_sessions::session::Error> {
    session.remove::<String>(session_keys::FLASH).await
}
