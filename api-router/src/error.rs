use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use ingestion_pipeline::IngestError;
use query_pipeline::QueryError;

/// Route-level errors. Bodies are the terse phrases clients key on, so the
/// display strings here are part of the interface.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid file type")]
    InvalidFileType,

    #[error("No file uploaded")]
    NoFileUploaded,

    #[error("Please upload a PDF first")]
    NoActiveDocument,

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal server error")]
    Internal(String),
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::InvalidFileType => Self::InvalidFileType,
            other => {
                tracing::error!("Ingestion failed: {other}");
                Self::Internal(other.to_string())
            }
        }
    }
}

impl From<QueryError> for ApiError {
    fn from(err: QueryError) -> Self {
        match err {
            QueryError::NoActiveDocument => Self::NoActiveDocument,
            QueryError::Failed(cause) => {
                tracing::error!("Query failed: {cause}");
                Self::Internal(cause)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::InvalidFileType
            | Self::NoFileUploaded
            | Self::NoActiveDocument
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // The detailed cause was already logged; clients get the terse line.
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn response_parts(error: ApiError) -> (StatusCode, String) {
        let response = error.into_response();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        (status, String::from_utf8(body.to_vec()).expect("utf8 body"))
    }

    #[tokio::test]
    async fn test_invalid_file_type_response() {
        let (status, body) = response_parts(ApiError::InvalidFileType).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Invalid file type");
    }

    #[tokio::test]
    async fn test_no_file_uploaded_response() {
        let (status, body) = response_parts(ApiError::NoFileUploaded).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "No file uploaded");
    }

    #[tokio::test]
    async fn test_no_active_document_response() {
        let (status, body) = response_parts(ApiError::NoActiveDocument).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Please upload a PDF first");
    }

    #[tokio::test]
    async fn test_internal_error_hides_cause() {
        let (status, body) = response_parts(ApiError::Internal("db password wrong".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Internal server error");
    }

    #[test]
    fn test_ingest_error_mapping() {
        assert!(matches!(
            ApiError::from(IngestError::InvalidFileType),
            ApiError::InvalidFileType
        ));
        assert!(matches!(
            ApiError::from(IngestError::Extraction("broken".into())),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_query_error_mapping() {
        assert!(matches!(
            ApiError::from(QueryError::NoActiveDocument),
            ApiError::NoActiveDocument
        ));
        assert!(matches!(
            ApiError::from(QueryError::Failed("timeout".into())),
            ApiError::Internal(_)
        ));
    }
}
