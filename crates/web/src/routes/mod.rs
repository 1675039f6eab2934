//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Shopping lists of the logged-in user
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (pings the store)
//! GET  /css/*                  - Stylesheets
//!
//! # Auth
//! GET  /login                  - Login and registration forms
//! POST /login                  - Log in by user name
//! POST /register               - Register a user name
//! POST /logout                 - Log out
//!
//! # Shopping lists (requires auth)
//! GET  /shopping_list/{id}     - List detail with products
//! POST /add-shopping-list      - Create a list
//! POST /delete-shopping_list   - Delete a list
//!
//! # Products (requires auth)
//! POST /add-product            - Add a product to a list
//! POST /delete-product         - Remove a product
//! POST /product-quantity       - Change a product's quantity
//! ```
//!
//! Every other path renders the 404 page.

pub mod auth;
pub mod health;
pub mod lists;
pub mod products;

use axum::{
    Router, middleware,
    http::Uri,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::error::{AppError, Result};
use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the shopping list routes router.
pub fn list_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(lists::index))
        .route("/shopping_list/{id}", get(lists::show))
        .route("/add-shopping-list", post(lists::create))
        .route("/delete-shopping_list", post(lists::delete))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/add-product", post(products::create))
        .route("/delete-product", post(products::delete))
        .route("/product-quantity", post(products::update_quantity))
}

/// Create all page routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(list_routes())
        .merge(product_routes())
}

/// Build the complete application router.
///
/// The session layer is not included; callers add the one matching their
/// session store (`PostgreSQL` in the server, memory in tests).
pub fn app(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(routes())
        .nest_service("/css", ServeDir::new(format!("{static_dir}/css")))
        .fallback(not_found)
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// Fallback handler for unknown paths.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_owned())
}

/// Trim a required text field and enforce a maximum length in characters.
pub(crate) fn required_text(field: &str, value: &str, max_chars: usize) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    if trimmed.chars().count() > max_chars {
        return Err(AppError::BadRequest(format!(
            "{field} must be at most {max_chars} characters"
        )));
    }
    Ok(trimmed.to_owned())
}
