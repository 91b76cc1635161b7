pub mod auth;
pub mod friends;
pub mod media;
pub mod posts;

pub use auth::AuthMutations;
pub use friends::FriendMutations;
pub use media::MediaMutations;
pub use posts::PostMutations;

pub(crate) mod prelude {
    pub(crate) use async_graphql::{Context, Object, Result};

    pub(crate) use crate::db::Database;
    pub(crate) use crate::graphql::auth::AuthExt;
    pub(crate) use crate::graphql::helpers::*;
    pub(crate) use crate::graphql::types::*;
    pub(crate) use crate::services::{AuthService, FeedService, FriendService, StorageClient};
}
