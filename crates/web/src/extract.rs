//! Form and path extractors that reject with [`AppError::BadRequest`].
//!
//! axum's own `Form` and `Path` reject with plain-text bodies that echo the
//! deserializer error (and `Form` uses 422). These wrappers log the detail
//! and answer with the HTML error page instead.

use axum::{
    Form,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Message shown for a form that does not deserialize.
pub const INVALID_FORM_MESSAGE: &str = "invalid form input";
/// Message shown for a path parameter that does not parse.
pub const INVALID_PATH_MESSAGE: &str = "invalid address";

/// URL-encoded form body.
#[derive(Debug)]
pub struct ValidForm<T>(pub T);

impl<T, S> FromRequest<S> for ValidForm<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Form::<T>::from_request(req, state).await {
            Ok(Form(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected form body");
                Err(AppError::BadRequest(INVALID_FORM_MESSAGE.to_owned()))
            }
        }
    }
}

/// Path parameters.
#[derive(Debug)]
pub struct ValidPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected path parameters");
                Err(AppError::BadRequest(INVALID_PATH_MESSAGE.to_owned()))
            }
        }
    }
}
