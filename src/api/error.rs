// ==========================================
// Club Session Scheduler - API error types
// ==========================================
// One surface error enum. Lower-layer errors are folded in via From so the
// operation bodies stay `?`-only.
// ==========================================

use thiserror::Error;

use crate::engine::EngineError;
use crate::planner::PlannerError;
use crate::repository::RepositoryError;

#[derive(Error, Debug)]
pub enum ApiError {
    // ===== client errors =====
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("business rule violated: {0}")]
    BusinessRuleViolation(String),

    // ===== upstream planner errors =====
    #[error("planner unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("planner response rejected: {0}")]
    BadUpstreamResponse(String),

    // ===== server errors =====
    #[error("database error: {0}")]
    DatabaseError(String),

    #[error("database transaction error: {0}")]
    DatabaseTransactionError(String),

    #[error("internal error: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{entity} with id={id}"))
            }
            RepositoryError::ValidationError(msg) => ApiError::InvalidInput(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("{field}: {message}"))
            }
            RepositoryError::BusinessRuleViolation(msg) => ApiError::BusinessRuleViolation(msg),
            RepositoryError::UniqueConstraintViolation(msg)
            | RepositoryError::ForeignKeyViolation(msg) => ApiError::BusinessRuleViolation(msg),
            RepositoryError::DatabaseTransactionError(msg) => {
                ApiError::DatabaseTransactionError(msg)
            }
            RepositoryError::DatabaseConnectionError(msg)
            | RepositoryError::LockError(msg)
            | RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

impl From<PlannerError> for ApiError {
    fn from(err: PlannerError) -> Self {
        match err {
            PlannerError::Unavailable(msg) => ApiError::UpstreamUnavailable(msg),
            PlannerError::BadResponse(msg) => ApiError::BadUpstreamResponse(msg),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
