//! REST endpoints that sit beside the GraphQL surface

pub mod health;
