use http::StatusCode;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum FacetdexError {
    #[error("Facet not found: {0}")]
    FacetNotFound(String),

    #[error("Scalar not found: {0}")]
    ScalarNotFound(String),

    #[error("Term not found: {0}")]
    TermNotFound(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(i64),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FacetdexError>;

/// Coarse error taxonomy callers map onto their own responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    StorageFault,
}

impl From<rusqlite::Error> for FacetdexError {
    fn from(e: rusqlite::Error) -> Self {
        FacetdexError::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for FacetdexError {
    fn from(e: serde_json::Error) -> Self {
        FacetdexError::Json(e.to_string())
    }
}

impl FacetdexError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FacetdexError::FacetNotFound(_)
            | FacetdexError::ScalarNotFound(_)
            | FacetdexError::TermNotFound(_)
            | FacetdexError::DocumentNotFound(_) => ErrorKind::NotFound,
            FacetdexError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            FacetdexError::Storage(_) | FacetdexError::Json(_) | FacetdexError::Config(_) => {
                ErrorKind::StorageFault
            }
        }
    }

    /// Status an HTTP front end should answer with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::StorageFault => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = FacetdexError::FacetNotFound("color:teal".to_string());
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Facet not found: color:teal");
    }

    #[test]
    fn test_invalid_argument_maps_to_400() {
        let err = FacetdexError::InvalidArgument("cursor.after without cursor.start".into());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_storage_faults_map_to_500() {
        let sqlite: FacetdexError = rusqlite::Error::InvalidQuery.into();
        assert_eq!(sqlite.kind(), ErrorKind::StorageFault);
        assert_eq!(sqlite.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            FacetdexError::Config("width".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
