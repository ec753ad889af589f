use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use ghsite::{PageError, RevisionError, SourceError};

use crate::response;

/// Errors that end a request with a plain-text response.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Page(#[from] PageError),

    #[error("asset not found: {0}")]
    AssetNotFound(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Page(PageError::Revision(RevisionError::NotFound(_)))
            | Self::Page(PageError::Revision(RevisionError::Source(SourceError::NotFound(_))))
            | Self::Page(PageError::Asset(SourceError::NotFound(_)))
            | Self::AssetNotFound(_) => StatusCode::NOT_FOUND,
            Self::Page(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{self}");
        } else {
            tracing::debug!("{self}");
        }
        response::text(status, self.to_string())
    }
}
