pub mod comments;
pub mod posts;
pub mod site;
pub mod system;
pub mod taxonomy;
pub mod users;

pub use comments::CommentQueries;
pub use posts::PostQueries;
pub use site::SiteQueries;
pub use system::SystemQueries;
pub use taxonomy::TaxonomyQueries;
pub use users::UserQueries;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, Object, Result};

    pub(crate) use crate::db::*;
    pub(crate) use crate::graphql::auth::AuthExt;
    pub(crate) use crate::graphql::helpers::*;
    pub(crate) use crate::graphql::types::*;
}
