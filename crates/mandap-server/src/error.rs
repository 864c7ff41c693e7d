//! HTTP boundary error handling.
//!
//! Every failure leaving a handler is rendered as the standard error
//! envelope `{"success": false, "error": {"message", "field"?}}`. Body
//! deserialization failures go through the same path, so a malformed
//! request never produces a bare framework response.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mandap_auth::AuthRejection;
use mandap_core::AppError;

/// Wrapper that renders an [`AppError`] with the right status code and
/// envelope.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Malformed or mistyped request bodies surface as validation errors, the
/// same way field-level policy violations do.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(AppError::validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.0.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }

        match self.0 {
            // 401s carry a WWW-Authenticate challenge; the bearer guard's
            // rejection already renders exactly that.
            err @ AppError::Unauthorized { .. } => AuthRejection(err).into_response(),
            err => {
                let status = StatusCode::from_u16(err.status_code())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                (status, Json(err.error_body())).into_response()
            }
        }
    }
}

/// JSON body extractor whose rejection is the standard error envelope.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
