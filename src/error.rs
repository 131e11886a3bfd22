use crate::i18n::CatalogError;
use crate::persist::PersistError;
use crate::render::RenderError;
use crate::schema::SchemaError;
use crate::source::SourceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Failures that end a request (or, at startup, the process).
///
/// Validation failures are not errors: they re-render the form.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl AppError {
    /// Plain-text body shown to the user; details stay in the log.
    fn public_message(&self) -> &'static str {
        match self {
            AppError::Persist(_) => "Your answers could not be saved. Please try again later.",
            AppError::Source(_)
            | AppError::Schema(_)
            | AppError::Catalog(_)
            | AppError::Render(_) => "The questionnaire is temporarily unavailable.",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.public_message()).into_response()
    }
}
