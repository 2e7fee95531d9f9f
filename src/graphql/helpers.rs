// Conversion helpers shared across GraphQL query/mutation modules.

use crate::db::{CategoryRecord, CommentRecord, PostRecord, SiteRecord, TagRecord, UserRecord};
use crate::graphql::types::{Category, Comment, Post, Site, Tag, User};

/// Convert a UserRecord to its public GraphQL projection.
/// The password hash never leaves the repository layer.
pub(crate) fn user_record_to_graphql(r: UserRecord) -> User {
    User {
        id: r.id,
        username: r.username,
        email: r.email,
        first_name: r.first_name,
        last_name: r.last_name,
        avatar_path: r.avatar_path,
        bio: r.bio,
        location: r.location,
        website: r.website,
        is_staff: r.is_staff,
        is_active: r.is_active,
        joined_at: r.joined_at,
        last_login_at: r.last_login_at,
    }
}

pub(crate) fn site_record_to_graphql(r: SiteRecord) -> Site {
    Site {
        name: r.name,
        description: r.description,
        logo_path: r.logo_path,
        updated_at: r.updated_at,
    }
}

pub(crate) fn category_record_to_graphql(r: CategoryRecord) -> Category {
    Category {
        id: r.id,
        name: r.name,
        slug: r.slug,
        description: r.description,
        created_at: r.created_at,
    }
}

pub(crate) fn tag_record_to_graphql(r: TagRecord) -> Tag {
    Tag {
        id: r.id,
        name: r.name,
        slug: r.slug,
        description: r.description,
        created_at: r.created_at,
    }
}

pub(crate) fn post_record_to_graphql(r: PostRecord) -> Post {
    Post {
        id: r.id,
        title: r.title,
        slug: r.slug,
        content: r.content,
        featured_image_path: r.featured_image_path,
        is_published: r.is_published,
        is_featured: r.is_featured,
        user_id: r.user_id,
        category_id: r.category_id,
        created_at: r.created_at,
        updated_at: r.updated_at,
    }
}

pub(crate) fn comment_record_to_graphql(r: CommentRecord) -> Comment {
    Comment {
        id: r.id,
        content: r.content,
        is_approved: r.is_approved,
        user_id: r.user_id,
        post_id: r.post_id,
        created_at: r.created_at,
    }
}
