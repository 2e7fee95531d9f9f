//! GraphQL schema definition
//!
//! The single API surface for the backend. Query and mutation roots are
//! merged from per-domain objects; the database and auth service are
//! injected as schema data at startup.

use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::db::Database;
use crate::services::AuthService;

use super::mutations::{
    AuthMutations, CommentMutations, PostMutations, SiteMutations, TaxonomyMutations,
    UserMutations,
};
use super::queries::{
    CommentQueries, PostQueries, SiteQueries, SystemQueries, TaxonomyQueries, UserQueries,
};

/// The GraphQL schema type
pub type BlogSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(
    SystemQueries,
    SiteQueries,
    UserQueries,
    PostQueries,
    TaxonomyQueries,
    CommentQueries,
);

#[derive(MergedObject, Default)]
pub struct MutationRoot(
    AuthMutations,
    UserMutations,
    PostMutations,
    CommentMutations,
    TaxonomyMutations,
    SiteMutations,
);

/// Build the GraphQL schema with all resolvers
pub fn build_schema(db: Database, auth: AuthService) -> BlogSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(db)
    .data(auth)
    .finish()
}
