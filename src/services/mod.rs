//! Service layer

pub mod auth;
pub mod text_utils;

pub use auth::{AuthConfig, AuthError, AuthService, IssuedToken, TokenClaims};
pub use text_utils::{is_valid_email, slugify};
