#[cfg(feature = "server")]
pub mod auth;
pub mod product;
pub mod types;
