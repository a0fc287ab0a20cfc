//! Bearer-token authentication for HTTP handlers.
//!
//! Handlers take the caller's identity as an explicit extractor argument; the
//! extractor verifies the `Authorization` header against the configured JWT
//! secret. Token issuance lives in a separate auth service.

use std::future::{Ready, ready};

use actix_web::error::ErrorUnauthorized;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{Error, FromRequest, HttpRequest, dev::Payload, web};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use crate::models::config::ServerConfig;

/// Claims carried by a verified marketplace bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Owning user id, stringified.
    pub sub: String,
    pub email: String,
    pub name: String,
    pub exp: usize,
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let Some(config) = req.app_data::<web::Data<ServerConfig>>() else {
        return Err(ErrorUnauthorized("authentication is not configured"));
    };

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| ErrorUnauthorized("missing authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ErrorUnauthorized("expected a bearer token"))?;

    let decoded = decode::<AuthenticatedUser>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_| ErrorUnauthorized("invalid bearer token"))?;

    Ok(decoded.claims)
}
