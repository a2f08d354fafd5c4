use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContactError {
    /// A required mail credential is missing; the message text is shown
    /// to the caller as-is.
    #[error("{0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    /// Transport failures are genericized; the underlying SMTP error is
    /// logged but never echoed to the caller.
    #[error("Error al enviar el correo")]
    Delivery,
}

pub type ContactResult<T> = Result<T, ContactError>;

/// Convert ContactError to AppError for standardized error responses
impl From<ContactError> for AppError {
    fn from(err: ContactError) -> Self {
        match err {
            ContactError::Config(msg) => AppError::InternalServerError(msg),
            ContactError::Validation(msg) => AppError::BadRequest(msg),
            ContactError::Delivery => AppError::InternalServerError(err.to_string()),
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        // Convert to AppError for standardized error response format
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
