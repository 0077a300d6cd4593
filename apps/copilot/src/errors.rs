use thiserror::Error;

use crate::api_client::ApiError;
use crate::storage::StorageError;

/// Application-level error type.
/// Flows return `Result<T, AppError>` and turn failures into a banner string
/// with [`AppError::banner`].
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    /// Message shown to the user.
    ///
    /// Validation errors are shown verbatim. Backend errors show the server's
    /// `detail` when one was sent; everything else collapses to `fallback`.
    pub fn banner(&self, fallback: &str) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Api(ApiError::Api {
                detail: Some(detail),
                ..
            }) => detail.clone(),
            AppError::Api(e) => {
                tracing::error!("Backend error: {e}");
                fallback.to_string()
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                fallback.to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                fallback.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_banner_is_verbatim() {
        let err = AppError::validation("Please upload a resume first");
        assert_eq!(err.banner("generic"), "Please upload a resume first");
        assert!(err.is_validation());
    }

    #[test]
    fn test_api_detail_wins_over_fallback() {
        let err = AppError::from(ApiError::Api {
            status: 400,
            detail: Some("Unknown role".to_string()),
        });
        assert_eq!(err.banner("Failed to perform gap analysis"), "Unknown role");
    }

    #[test]
    fn test_api_without_detail_uses_fallback() {
        let err = AppError::from(ApiError::Api {
            status: 500,
            detail: None,
        });
        assert_eq!(
            err.banner("Failed to perform gap analysis"),
            "Failed to perform gap analysis"
        );
        assert!(!err.is_validation());
    }
}
