//! GraphQL authentication and authorization
//!
//! The HTTP layer verifies the bearer token and injects an [`AuthUser`]
//! into the request data; resolvers reach it through [`AuthExt`].
//!
//! Use `AuthGuard` to require authentication on any GraphQL operation:
//!
//! ```ignore
//! #[graphql(guard = "AuthGuard")]
//! async fn protected(&self, ctx: &Context<'_>) -> Result<String> { ... }
//! ```
//!
//! Use `StaffGuard` for moderation operations.

use async_graphql::{Context, ErrorExtensions, Result};
use serde::{Deserialize, Serialize};

use crate::services::TokenClaims;

/// User context extracted from a verified JWT, available in resolvers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
    pub is_staff: bool,
}

impl From<TokenClaims> for AuthUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            is_staff: claims.staff,
        }
    }
}

/// Extension trait to get the authenticated user from GraphQL context
pub trait AuthExt {
    /// Get the authenticated user, or return an error if not authenticated
    fn auth_user(&self) -> Result<&AuthUser>;

    /// Get the authenticated user if present, or None
    fn try_auth_user(&self) -> Option<&AuthUser>;
}

impl<'a> AuthExt for Context<'a> {
    fn auth_user(&self) -> Result<&AuthUser> {
        self.data_opt::<AuthUser>().ok_or_else(|| {
            async_graphql::Error::new("Authentication required")
                .extend_with(|_, e| e.set("code", "UNAUTHORIZED"))
        })
    }

    fn try_auth_user(&self) -> Option<&AuthUser> {
        self.data_opt::<AuthUser>()
    }
}

/// Guard that requires authentication for GraphQL operations
pub struct AuthGuard;

impl async_graphql::Guard for AuthGuard {
    fn check(&self, ctx: &Context<'_>) -> impl std::future::Future<Output = Result<()>> + Send {
        let result = ctx.auth_user().map(|_| ());
        async move { result }
    }
}

/// Guard that requires the staff flag for GraphQL operations
pub struct StaffGuard;

impl async_graphql::Guard for StaffGuard {
    fn check(&self, ctx: &Context<'_>) -> impl std::future::Future<Output = Result<()>> + Send {
        let result = ctx.auth_user().and_then(|user| {
            if user.is_staff {
                Ok(())
            } else {
                Err(async_graphql::Error::new("Staff privileges required")
                    .extend_with(|_, e| e.set("code", "FORBIDDEN")))
            }
        });
        async move { result }
    }
}
