use actix_web::HttpResponse;

use crate::services::ServiceError;

pub mod products;

/// Map a service error onto the HTTP status it surfaces as.
pub fn error_response(err: ServiceError) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::Forbidden => HttpResponse::Forbidden().finish(),
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Form(message) | ServiceError::TypeConstraint(message) => {
            HttpResponse::BadRequest().body(message)
        }
        ServiceError::Internal => HttpResponse::InternalServerError().finish(),
    }
}
