//! GraphQL API
//!
//! The single API surface of the backend: queries and mutations for users,
//! posts, friendships, and media URLs. Per-domain resolver structs are merged
//! into the roots in `schema.rs`.

pub mod auth;
pub mod helpers;
pub mod mutations;
pub mod queries;
mod schema;
pub mod types;

pub use auth::{AUTH_COOKIE, AuthUser, CookieChange, CookieUpdate, verify_token};
pub use schema::{CommuneSchema, build_schema};
