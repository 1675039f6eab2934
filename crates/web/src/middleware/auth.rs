//! Authentication extractor and session helpers.
//!
//! Protected handlers take [`RequireAuth`], which resolves the session's user
//! id to a stored user or redirects to `/login`.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, User, session_keys};
use crate::state::AppState;

/// Path unauthenticated requests are sent to.
pub const LOGIN_PATH: &str = "/login";

/// Extractor that requires a logged-in user.
///
/// Redirects to the login page when there is no session user, when the user
/// no longer exists, or when the store lookup fails.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Error returned when authentication is required but the user is not logged in.
#[derive(Debug)]
pub enum AuthRejection {
    /// Redirect to login page.
    RedirectToLogin,
    /// The session layer is missing from the router.
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::Unauthorized)?;

        let current = match session.get::<CurrentUser>(session_keys::CURRENT_USER).await {
            Ok(Some(current)) => current,
            Ok(None) => return Err(AuthRejection::RedirectToLogin),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read session");
                return Err(AuthRejection::RedirectToLogin);
            }
        };

        match state.store().user_by_id(current.id).await {
            Ok(Some(user)) => Ok(Self(user)),
            Ok(None) => {
                tracing::warn!(user_id = %current.id, "Session references unknown user");
                if let Err(e) = clear_current_user(&session).await {
                    tracing::error!(error = %e, "Failed to clear stale session user");
                }
                Err(AuthRejection::RedirectToLogin)
            }
            Err(e) => {
                tracing::error!(error = %e, user_id = %current.id, "Failed to load session user");
                Err(AuthRejection::RedirectToLogin)
            }
        }
    }
}

/// Helper to set the current user in the session (login).
///
/// Cycles the session id first so a pre-login id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &User,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session
        .insert(session_keys::CURRENT_USER, CurrentUser::from(user))
        .await
}

/// Helper to clear the current user from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}
