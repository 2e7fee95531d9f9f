pub mod auth;
pub mod comments;
pub mod posts;
pub mod site;
pub mod taxonomy;
pub mod users;

pub use auth::AuthMutations;
pub use comments::CommentMutations;
pub use posts::PostMutations;
pub use site::SiteMutations;
pub use taxonomy::TaxonomyMutations;
pub use users::UserMutations;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, ErrorExtensions, Object, Result};

    pub(crate) use crate::db::*;
    pub(crate) use crate::graphql::auth::{AuthExt, AuthGuard, StaffGuard};
    pub(crate) use crate::graphql::helpers::*;
    pub(crate) use crate::graphql::types::*;
    pub(crate) use crate::services::AuthService;

    /// Validation failure surfaced in the response error list
    pub(crate) fn validation_error(message: impl Into<String>) -> async_graphql::Error {
        async_graphql::Error::new(message.into()).extend_with(|_, e| e.set("code", "VALIDATION"))
    }

    /// Referenced entity does not exist
    pub(crate) fn not_found_error(message: impl Into<String>) -> async_graphql::Error {
        async_graphql::Error::new(message.into()).extend_with(|_, e| e.set("code", "NOT_FOUND"))
    }
}
