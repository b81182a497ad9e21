use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::application::use_cases::{
    CreateCaseStudyError, DeleteCaseStudyError, ExportCaseStudyError, GetCaseStudyError,
    ListCaseStudiesError, SummarizeCaseStudyError, UpdateCaseStudyError, UpdateSummaryError,
};
use crate::domain::repositories::RepositoryError;
use crate::presentation::http::dto::ApiResponse;

/// A failed API call, rendered as an `ApiResponse` error envelope.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl HttpError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "VALIDATION_FAILED", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "CONFLICT", message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, "UPSTREAM_FAILED", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = self.code, "{}", self.message);
        }
        (
            self.status,
            Json(ApiResponse::<()>::error(
                self.code.to_string(),
                self.message,
                None,
            )),
        )
            .into_response()
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        HttpError::validation(rejection.body_text())
    }
}

impl From<RepositoryError> for HttpError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::NotFound(_) => HttpError::not_found(error.to_string()),
            RepositoryError::Conflict(_) => HttpError::conflict(error.to_string()),
            RepositoryError::ValidationError(_) | RepositoryError::DatabaseError(_) => {
                HttpError::internal(error.to_string())
            }
        }
    }
}

impl From<CreateCaseStudyError> for HttpError {
    fn from(error: CreateCaseStudyError) -> Self {
        match error {
            CreateCaseStudyError::ValidationError(msg) => HttpError::validation(msg),
            CreateCaseStudyError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<ListCaseStudiesError> for HttpError {
    fn from(error: ListCaseStudiesError) -> Self {
        match error {
            ListCaseStudiesError::ValidationError(msg) => HttpError::validation(msg),
            ListCaseStudiesError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<GetCaseStudyError> for HttpError {
    fn from(error: GetCaseStudyError) -> Self {
        match error {
            GetCaseStudyError::NotFound(_) => HttpError::not_found(error.to_string()),
            GetCaseStudyError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<UpdateCaseStudyError> for HttpError {
    fn from(error: UpdateCaseStudyError) -> Self {
        match error {
            UpdateCaseStudyError::NotFound(_) => HttpError::not_found(error.to_string()),
            UpdateCaseStudyError::ValidationError(msg) => HttpError::validation(msg),
            UpdateCaseStudyError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<DeleteCaseStudyError> for HttpError {
    fn from(error: DeleteCaseStudyError) -> Self {
        match error {
            DeleteCaseStudyError::NotFound(_) => HttpError::not_found(error.to_string()),
            DeleteCaseStudyError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<SummarizeCaseStudyError> for HttpError {
    fn from(error: SummarizeCaseStudyError) -> Self {
        match error {
            SummarizeCaseStudyError::NotFound(_) => HttpError::not_found(error.to_string()),
            SummarizeCaseStudyError::StillProcessing => HttpError::conflict(error.to_string()),
            SummarizeCaseStudyError::NoContent => HttpError::validation(error.to_string()),
            SummarizeCaseStudyError::ModelError(_) => HttpError::upstream(error.to_string()),
            SummarizeCaseStudyError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<UpdateSummaryError> for HttpError {
    fn from(error: UpdateSummaryError) -> Self {
        match error {
            UpdateSummaryError::CaseStudyNotFound(_) | UpdateSummaryError::SummaryNotFound(_) => {
                HttpError::not_found(error.to_string())
            }
            UpdateSummaryError::ValidationError(msg) => HttpError::validation(msg),
            UpdateSummaryError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<ExportCaseStudyError> for HttpError {
    fn from(error: ExportCaseStudyError) -> Self {
        match error {
            ExportCaseStudyError::NotFound(_) | ExportCaseStudyError::NoSummary(_) => {
                HttpError::not_found(error.to_string())
            }
            ExportCaseStudyError::RepositoryError(e) => e.into(),
        }
    }
}
