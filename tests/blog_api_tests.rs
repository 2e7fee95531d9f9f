//! Integration tests for the blog API
//!
//! These tests drive the GraphQL schema directly against a temporary
//! SQLite database:
//! - Account creation and validation
//! - Token issue / verify / refresh
//! - Comment moderation defaults
//! - Likes and derived counts
//! - Set-null deletion policies

use async_graphql::Request;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use chronicle::db::{self, CreateCategory, CreatePost, CreateUser, Database};
use chronicle::graphql::{build_schema, AuthUser, BlogSchema};
use chronicle::services::{AuthConfig, AuthService};

// ============================================================================
// Harness
// ============================================================================

struct TestApp {
    db: Database,
    schema: BlogSchema,
    auth: AuthService,
    // Keeps the database file alive for the duration of the test
    _dir: tempfile::TempDir,
}

async fn test_app() -> TestApp {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("test.db");
    let db = Database::connect(path.to_str().unwrap())
        .await
        .expect("open database");
    db::run_migrations(db.pool()).await.expect("run migrations");

    let auth = AuthService::new(
        db.clone(),
        AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            // Minimum bcrypt cost keeps the tests quick
            bcrypt_cost: 4,
            ..AuthConfig::default()
        },
    );
    let schema = build_schema(db.clone(), auth.clone());

    TestApp {
        db,
        schema,
        auth,
        _dir: dir,
    }
}

impl TestApp {
    /// Execute an unauthenticated operation, returning (data, errors)
    async fn execute(&self, query: &str) -> (Value, Vec<String>) {
        let response = self.schema.execute(Request::new(query)).await;
        let errors = response.errors.iter().map(|e| e.message.clone()).collect();
        (response.data.into_json().unwrap_or(Value::Null), errors)
    }

    /// Execute an operation with an authenticated user in context
    async fn execute_as(&self, user: &AuthUser, query: &str) -> (Value, Vec<String>) {
        let request = Request::new(query).data(user.clone());
        let response = self.schema.execute(request).await;
        let errors = response.errors.iter().map(|e| e.message.clone()).collect();
        (response.data.into_json().unwrap_or(Value::Null), errors)
    }

    /// Create a user straight through the repository
    async fn seed_user(&self, username: &str, staff: bool) -> chronicle::db::UserRecord {
        let hash = self.auth.hash_password("sw0rdfish").unwrap();
        self.db
            .users()
            .create(CreateUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password_hash: hash,
                first_name: None,
                last_name: None,
                is_staff: staff,
            })
            .await
            .expect("seed user")
    }

    fn auth_user(&self, record: &chronicle::db::UserRecord) -> AuthUser {
        AuthUser {
            user_id: record.id.clone(),
            username: record.username.clone(),
            is_staff: record.is_staff,
        }
    }

    /// Create a published post straight through the repository
    async fn seed_post(&self, slug: &str, user_id: Option<String>) -> chronicle::db::PostRecord {
        self.db
            .posts()
            .create(CreatePost {
                title: format!("Post {slug}"),
                slug: slug.to_string(),
                content: "<p>Hello</p>".to_string(),
                featured_image_path: None,
                is_published: true,
                is_featured: false,
                user_id,
                category_id: None,
            })
            .await
            .expect("seed post")
    }
}

// ============================================================================
// User creation
// ============================================================================

#[tokio::test]
async fn create_user_returns_projection_without_password() {
    let app = test_app().await;

    let (data, errors) = app
        .execute(
            r#"mutation {
                createUser(username: "alice", password: "s3cret", email: "alice@example.com") {
                    username
                    email
                    isStaff
                    isActive
                }
            }"#,
        )
        .await;

    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(
        data["createUser"],
        json!({
            "username": "alice",
            "email": "alice@example.com",
            "isStaff": false,
            "isActive": true,
        })
    );

    // The plaintext never appears anywhere in the response
    assert!(!data.to_string().contains("s3cret"));

    // And the stored hash is not the plaintext
    let record = app
        .db
        .users()
        .get_by_username("alice")
        .await
        .unwrap()
        .unwrap();
    assert_ne!(record.password_hash, "s3cret");
    assert!(record.password_hash.starts_with("$2"));
}

#[tokio::test]
async fn duplicate_username_is_rejected_without_persisting() {
    let app = test_app().await;

    let mutation = r#"mutation {
        createUser(username: "bob", password: "pw1", email: "bob@example.com") { id }
    }"#;
    let (_, errors) = app.execute(mutation).await;
    assert_eq!(errors, Vec::<String>::new());

    // Same username, different case: still a duplicate
    let (_, errors) = app
        .execute(
            r#"mutation {
                createUser(username: "BOB", password: "pw2", email: "bob2@example.com") { id }
            }"#,
        )
        .await;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("already exists"));

    assert_eq!(app.db.users().count().await.unwrap(), 1);
}

#[tokio::test]
async fn malformed_email_is_rejected() {
    let app = test_app().await;

    let (_, errors) = app
        .execute(
            r#"mutation {
                createUser(username: "carol", password: "pw", email: "not-an-email") { id }
            }"#,
        )
        .await;

    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("email"));
    assert_eq!(app.db.users().count().await.unwrap(), 0);
}

// ============================================================================
// Tokens
// ============================================================================

#[tokio::test]
async fn token_auth_then_verify_round_trip() {
    let app = test_app().await;
    app.seed_user("dave", false).await;

    let (data, errors) = app
        .execute(r#"mutation { tokenAuth(username: "dave", password: "sw0rdfish") { token payload { username } } }"#)
        .await;
    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(data["tokenAuth"]["payload"]["username"], "dave");

    let token = data["tokenAuth"]["token"].as_str().unwrap().to_string();

    let verify = format!(
        r#"mutation {{ verifyToken(token: "{token}") {{ payload {{ username }} }} }}"#
    );
    let (data, errors) = app.execute(&verify).await;
    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(data["verifyToken"]["payload"]["username"], "dave");
}

#[tokio::test]
async fn bad_credentials_and_tampered_tokens_are_rejected() {
    let app = test_app().await;
    app.seed_user("erin", false).await;

    let (_, errors) = app
        .execute(r#"mutation { tokenAuth(username: "erin", password: "wrong") { token } }"#)
        .await;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Invalid username or password"));

    let (data, _) = app
        .execute(r#"mutation { tokenAuth(username: "erin", password: "sw0rdfish") { token } }"#)
        .await;
    let mut token = data["tokenAuth"]["token"].as_str().unwrap().to_string();
    token.pop();
    token.push(if token.ends_with('A') { 'B' } else { 'A' });

    let verify = format!(r#"mutation {{ verifyToken(token: "{token}") {{ payload {{ username }} }} }}"#);
    let (_, errors) = app.execute(&verify).await;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Invalid token"));
}

#[tokio::test]
async fn refresh_token_issues_a_fresh_token_with_stable_origin() {
    let app = test_app().await;
    app.seed_user("fred", false).await;

    let (data, _) = app
        .execute(r#"mutation { tokenAuth(username: "fred", password: "sw0rdfish") { token payload { origIat } } }"#)
        .await;
    let token = data["tokenAuth"]["token"].as_str().unwrap().to_string();
    let orig_iat = data["tokenAuth"]["payload"]["origIat"].as_i64().unwrap();

    let refresh = format!(
        r#"mutation {{ refreshToken(token: "{token}") {{ token payload {{ origIat username }} }} }}"#
    );
    let (data, errors) = app.execute(&refresh).await;
    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(data["refreshToken"]["payload"]["username"], "fred");
    assert_eq!(data["refreshToken"]["payload"]["origIat"], orig_iat);

    // The refreshed token itself verifies
    let new_token = data["refreshToken"]["token"].as_str().unwrap();
    assert!(app.auth.verify_token(new_token).is_ok());
}

// ============================================================================
// Comments
// ============================================================================

#[tokio::test]
async fn new_comments_start_unapproved() {
    let app = test_app().await;
    let user = app.seed_user("gina", false).await;
    let post = app.seed_post("first-post", Some(user.id.clone())).await;

    let mutation = format!(
        r#"mutation {{
            createComment(content: "Nice post!", userId: "{}", postId: "{}") {{
                content
                isApproved
            }}
        }}"#,
        user.id, post.id
    );
    let (data, errors) = app.execute(&mutation).await;

    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(
        data["createComment"],
        json!({ "content": "Nice post!", "isApproved": false })
    );
}

#[tokio::test]
async fn comment_on_missing_referents_is_rejected() {
    let app = test_app().await;
    let user = app.seed_user("hank", false).await;

    let (_, errors) = app
        .execute(&format!(
            r#"mutation {{ createComment(content: "hi", userId: "{}", postId: "no-such-post") {{ id }} }}"#,
            user.id
        ))
        .await;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Post not found"));

    let post = app.seed_post("second-post", Some(user.id.clone())).await;
    let (_, errors) = app
        .execute(&format!(
            r#"mutation {{ createComment(content: "hi", userId: "no-such-user", postId: "{}") {{ id }} }}"#,
            post.id
        ))
        .await;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("User not found"));
}

#[tokio::test]
async fn staff_can_approve_comments() {
    let app = test_app().await;
    let staff = app.seed_user("mod", true).await;
    let reader = app.seed_user("reader", false).await;
    let post = app.seed_post("third-post", None).await;

    let (data, _) = app
        .execute(&format!(
            r#"mutation {{ createComment(content: "ok", userId: "{}", postId: "{}") {{ id }} }}"#,
            reader.id, post.id
        ))
        .await;
    let comment_id = data["createComment"]["id"].as_str().unwrap().to_string();

    // A non-staff user may not approve
    let approve = format!(r#"mutation {{ approveComment(id: "{comment_id}") {{ isApproved }} }}"#);
    let (_, errors) = app.execute_as(&app.auth_user(&reader), &approve).await;
    assert_eq!(errors.len(), 1);

    let (data, errors) = app.execute_as(&app.auth_user(&staff), &approve).await;
    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(data["approveComment"]["isApproved"], true);
}

// ============================================================================
// Likes
// ============================================================================

#[tokio::test]
async fn post_likes_are_idempotent_and_counted() {
    let app = test_app().await;
    let alice = app.seed_user("alice", false).await;
    let bob = app.seed_user("bob", false).await;
    let post = app.seed_post("liked-post", Some(alice.id.clone())).await;

    let like = format!(r#"mutation {{ likePost(postId: "{}") }}"#, post.id);

    let (data, errors) = app.execute_as(&app.auth_user(&alice), &like).await;
    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(data["likePost"], 1);

    // Liking twice does not double-count
    let (data, _) = app.execute_as(&app.auth_user(&alice), &like).await;
    assert_eq!(data["likePost"], 1);

    let (data, _) = app.execute_as(&app.auth_user(&bob), &like).await;
    assert_eq!(data["likePost"], 2);

    // The computed field agrees
    let query = format!(r#"{{ postById(id: "{}") {{ numberOfLikes }} }}"#, post.id);
    let (data, _) = app.execute(&query).await;
    assert_eq!(data["postById"]["numberOfLikes"], 2);

    let unlike = format!(r#"mutation {{ unlikePost(postId: "{}") }}"#, post.id);
    let (data, _) = app.execute_as(&app.auth_user(&bob), &unlike).await;
    assert_eq!(data["unlikePost"], 1);
}

#[tokio::test]
async fn likes_require_authentication() {
    let app = test_app().await;
    let user = app.seed_user("ivy", false).await;
    let post = app.seed_post("locked-post", Some(user.id)).await;

    let (_, errors) = app
        .execute(&format!(r#"mutation {{ likePost(postId: "{}") }}"#, post.id))
        .await;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Authentication required"));
}

#[tokio::test]
async fn comment_likes_are_counted() {
    let app = test_app().await;
    let user = app.seed_user("june", false).await;
    let post = app.seed_post("commented-post", None).await;

    let (data, _) = app
        .execute(&format!(
            r#"mutation {{ createComment(content: "count me", userId: "{}", postId: "{}") {{ id }} }}"#,
            user.id, post.id
        ))
        .await;
    let comment_id = data["createComment"]["id"].as_str().unwrap().to_string();

    let like = format!(r#"mutation {{ likeComment(commentId: "{comment_id}") }}"#);
    let (data, errors) = app.execute_as(&app.auth_user(&user), &like).await;
    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(data["likeComment"], 1);

    let unlike = format!(r#"mutation {{ unlikeComment(commentId: "{comment_id}") }}"#);
    let (data, _) = app.execute_as(&app.auth_user(&user), &unlike).await;
    assert_eq!(data["unlikeComment"], 0);
}

// ============================================================================
// Deletion policies
// ============================================================================

#[tokio::test]
async fn deleting_a_category_detaches_its_posts() {
    let app = test_app().await;

    let category = app
        .db
        .categories()
        .create(CreateCategory {
            name: "Rust".to_string(),
            slug: "rust".to_string(),
            description: String::new(),
        })
        .await
        .unwrap();

    let post = app
        .db
        .posts()
        .create(CreatePost {
            title: "Categorized".to_string(),
            slug: "categorized".to_string(),
            content: String::new(),
            featured_image_path: None,
            is_published: true,
            is_featured: false,
            user_id: None,
            category_id: Some(category.id.clone()),
        })
        .await
        .unwrap();

    assert!(app.db.categories().delete(&category.id).await.unwrap());

    // The post survives with a NULL category
    let reloaded = app.db.posts().get_by_id(&post.id).await.unwrap().unwrap();
    assert_eq!(reloaded.category_id, None);

    let query = format!(r#"{{ postById(id: "{}") {{ category {{ name }} }} }}"#, post.id);
    let (data, errors) = app.execute(&query).await;
    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(data["postById"]["category"], Value::Null);
}

#[tokio::test]
async fn deleting_a_user_detaches_their_content() {
    let app = test_app().await;
    let user = app.seed_user("kira", false).await;
    let post = app.seed_post("orphaned", Some(user.id.clone())).await;

    let (data, _) = app
        .execute(&format!(
            r#"mutation {{ createComment(content: "mine", userId: "{}", postId: "{}") {{ id }} }}"#,
            user.id, post.id
        ))
        .await;
    let comment_id = data["createComment"]["id"].as_str().unwrap().to_string();

    assert!(app.db.users().delete(&user.id).await.unwrap());

    let post = app.db.posts().get_by_id(&post.id).await.unwrap().unwrap();
    assert_eq!(post.user_id, None);

    let comment = app
        .db
        .comments()
        .get_by_id(&comment_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(comment.user_id, None);
}

#[tokio::test]
async fn deleting_a_post_cascades_likes_but_keeps_comments() {
    let app = test_app().await;
    let user = app.seed_user("liam", false).await;
    let post = app.seed_post("doomed", Some(user.id.clone())).await;

    app.db.posts().add_like(&post.id, &user.id).await.unwrap();

    let (data, _) = app
        .execute(&format!(
            r#"mutation {{ createComment(content: "left behind", userId: "{}", postId: "{}") {{ id }} }}"#,
            user.id, post.id
        ))
        .await;
    let comment_id = data["createComment"]["id"].as_str().unwrap().to_string();

    assert!(app.db.posts().delete(&post.id).await.unwrap());

    let comment = app
        .db
        .comments()
        .get_by_id(&comment_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(comment.post_id, None);
}

// ============================================================================
// Queries
// ============================================================================

#[tokio::test]
async fn public_feed_hides_drafts() {
    let app = test_app().await;
    let user = app.seed_user("maya", false).await;

    app.seed_post("published-one", Some(user.id.clone())).await;
    app.db
        .posts()
        .create(CreatePost {
            title: "Draft".to_string(),
            slug: "draft".to_string(),
            content: String::new(),
            featured_image_path: None,
            is_published: false,
            is_featured: false,
            user_id: Some(user.id.clone()),
            category_id: None,
        })
        .await
        .unwrap();

    let (data, errors) = app.execute("{ posts { slug } }").await;
    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(data["posts"], json!([{ "slug": "published-one" }]));

    let (data, _) = app.execute("{ posts(published: false) { slug } }").await;
    assert_eq!(data["posts"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn me_returns_the_authenticated_user() {
    let app = test_app().await;
    let user = app.seed_user("nina", false).await;

    let (data, errors) = app
        .execute_as(&app.auth_user(&user), "{ me { username email } }")
        .await;
    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(
        data["me"],
        json!({ "username": "nina", "email": "nina@example.com" })
    );

    let (_, errors) = app.execute("{ me { username } }").await;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Authentication required"));
}
