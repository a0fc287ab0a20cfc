use thiserror::Error;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// The caller is not authenticated.
    #[error("unauthorized")]
    Unauthorized,
    /// The caller is authenticated but does not own the resource.
    #[error("forbidden")]
    Forbidden,
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// Submitted form data failed validation.
    #[error("{0}")]
    Form(String),
    /// A value violated a domain type constraint.
    #[error("{0}")]
    TypeConstraint(String),
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
