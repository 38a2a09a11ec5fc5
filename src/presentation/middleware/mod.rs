//! Middleware for HTTP request processing
//!
//! - JWT authentication and identity matching
//! - Error to response mapping

pub mod auth;
pub mod error;

pub use auth::{AuthError, AuthenticatedUser, Claims, JwtService};
pub use error::{AppError, ErrorResponse};
