pub mod friends;
pub mod posts;
pub mod users;

pub use friends::FriendQueries;
pub use posts::PostQueries;
pub use users::UserQueries;

pub(crate) mod prelude {
    pub(crate) use std::collections::HashSet;

    pub(crate) use async_graphql::{Context, Object, Result};

    pub(crate) use crate::db::Database;
    pub(crate) use crate::graphql::auth::AuthExt;
    pub(crate) use crate::graphql::helpers::*;
    pub(crate) use crate::graphql::types::*;
    pub(crate) use crate::services::FeedService;
}
