//! Error conversion glue between the form, domain and service layers.
//!
//! The domain layer must not depend on service error types; these impls live
//! here so `?` works across layer boundaries without coupling the layers
//! themselves.

use crate::domain::types::TypeConstraintError;
use crate::forms::products::ProductFormError;
use crate::services::errors::ServiceError;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<ProductFormError> for ServiceError {
    fn from(val: ProductFormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}
