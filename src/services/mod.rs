//! Domain services
//!
//! Stateless services over the database and object storage. Each is cheap to
//! clone and is stored in the GraphQL schema data for resolvers to borrow.

pub mod auth;
pub mod feed;
pub mod friends;
pub mod storage;

pub use auth::{AuthConfig, AuthService, Claims, SignupData, verify_token};
pub use feed::{FeedService, PostView, ReactionTally};
pub use friends::FriendService;
pub use storage::{StorageClient, StorageConfig, URL_EXPIRY_SECS};
