//! Authentication route handlers.
//!
//! Users log in by name alone. Registration only creates the account; the
//! user then logs in from the same page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;

use shopping_list_core::UserName;

use crate::db::RepositoryError;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::extract::ValidForm;
use crate::middleware::auth::LOGIN_PATH;
use crate::middleware::{set_current_user, set_flash, take_flash};
use crate::state::AppState;

/// Flash shown when registering a taken name.
pub const NAME_TAKEN_MESSAGE: &str = "User name already registered";
/// Flash shown after a successful registration.
pub const REGISTERED_MESSAGE: &str = "Registration complete, you can now log in";
/// Flash shown when logging in with an unknown name.
pub const UNKNOWN_USER_MESSAGE: &str = "Unknown user name";

// =============================================================================
// Form Types
// =============================================================================

/// Login and registration form data.
#[derive(Debug, Deserialize)]
pub struct UserNameForm {
    pub user_name: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub flash: Option<String>,
}

// =============================================================================
// Routes
// =============================================================================

/// Display the login and registration forms.
pub async fn login_page(session: Session) -> Result<LoginTemplate> {
    let flash = take_flash(&session).await?;
    Ok(LoginTemplate { flash })
}

/// Handle login form submission.
///
/// Known names start an authenticated session; anything else goes back to
/// the login page with a message.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ValidForm(form): ValidForm<UserNameForm>,
) -> Result<Response> {
    let name = match UserName::parse(&form.user_name) {
        Ok(name) => name,
        Err(e) => {
            set_flash(&session, e.to_string()).await?;
            return Ok(Redirect::to(LOGIN_PATH).into_response());
        }
    };

    let Some(user) = state.store().user_by_name(&name).await? else {
        tracing::info!(user_name = %name, "Login with unknown user name");
        set_flash(&session, UNKNOWN_USER_MESSAGE).await?;
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    };

    set_current_user(&session, &user).await?;
    set_sentry_user(&user);
    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Redirect::to("/").into_response())
}

/// Handle registration form submission.
///
/// Duplicate names leave the user table untouched. Both outcomes return to
/// the login page.
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    ValidForm(form): ValidForm<UserNameForm>,
) -> Result<Response> {
    let name = match UserName::parse(&form.user_name) {
        Ok(name) => name,
        Err(e) => {
            set_flash(&session, e.to_string()).await?;
            return Ok(Redirect::to(LOGIN_PATH).into_response());
        }
    };

    if state.store().user_by_name(&name).await?.is_some() {
        tracing::info!(user_name = %name, "User name already registered");
        set_flash(&session, NAME_TAKEN_MESSAGE).await?;
        return Ok(Redirect::to(LOGIN_PATH).into_response());
    }

    match state.store().create_user(&name).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "User registered");
            set_flash(&session, REGISTERED_MESSAGE).await?;
        }
        // Lost a race with a concurrent registration of the same name
        Err(RepositoryError::Conflict(_)) => {
            set_flash(&session, NAME_TAKEN_MESSAGE).await?;
        }
        Err(e) => return Err(e.into()),
    }

    Ok(Redirect::to(LOGIN_PATH).into_response())
}

/// Handle logout.
///
/// Destroys the entire session.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }
    clear_sentry_user();

    Redirect::to(LOGIN_PATH).into_response()
}
