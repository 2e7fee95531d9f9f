//! GraphQL API
//!
//! Queries, mutations, and typed projections over the blog's entities,
//! served from a single endpoint. Per-domain query/mutation objects are
//! merged into the roots in `schema.rs`.

pub mod auth;
pub mod helpers;
pub mod mutations;
pub mod queries;
mod schema;
pub mod types;

pub use auth::AuthUser;
pub use schema::{build_schema, BlogSchema};
