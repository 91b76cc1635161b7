//! GraphQL schema definition
//!
//! Query and mutation roots are merged from per-domain structs; the shared
//! services live in the schema data so resolvers borrow them from context.

use async_graphql::{EmptySubscription, MergedObject, Schema};

use crate::db::Database;
use crate::services::{AuthService, FeedService, FriendService, StorageClient};

use super::mutations::{AuthMutations, FriendMutations, MediaMutations, PostMutations};
use super::queries::{FriendQueries, PostQueries, UserQueries};

/// The GraphQL schema type
pub type CommuneSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

#[derive(MergedObject, Default)]
pub struct QueryRoot(UserQueries, PostQueries, FriendQueries);

#[derive(MergedObject, Default)]
pub struct MutationRoot(AuthMutations, PostMutations, FriendMutations, MediaMutations);

/// Build the GraphQL schema with all resolvers and shared services
pub fn build_schema(
    db: Database,
    auth_service: AuthService,
    feed_service: FeedService,
    friend_service: FriendService,
    storage_client: StorageClient,
) -> CommuneSchema {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        EmptySubscription,
    )
    .data(db)
    .data(auth_service)
    .data(feed_service)
    .data(friend_service)
    .data(storage_client)
    .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::memory_db;
    use crate::services::{AuthConfig, StorageConfig};

    async fn test_schema() -> CommuneSchema {
        let db = memory_db().await;
        build_schema(
            db.clone(),
            AuthService::new(db.clone(), AuthConfig::new("test-secret".to_string())),
            FeedService::new(db.clone()),
            FriendService::new(db),
            StorageClient::new(StorageConfig {
                bucket: "test-bucket".to_string(),
                region: "eu-west-1".to_string(),
                access_key: "AKIDEXAMPLE".to_string(),
                secret_key: "secret".to_string(),
            }),
        )
    }

    /// The deployed client is generated against these exact signatures;
    /// renaming an argument or changing a return type breaks it silently.
    #[tokio::test]
    async fn sdl_matches_deployed_client_contract() {
        let sdl = test_schema().await.sdl();

        for signature in [
            "me: User",
            "posts: [Post!]!",
            "myPosts: [Post!]!",
            "users: [User!]!",
            "myFriends: [User!]!",
            "friendSuggestions: [User!]!",
            "friendRequests: [FriendRequest!]!",
            "signup(input: SignupInput!): User!",
            "login(email: String!, password: String!): AuthPayload!",
            "logout: Boolean!",
            "createPost(input: CreatePostInput!): Post!",
            "addComment(input: AddCommentInput!): Post!",
            "reactPost(input: ReactPostInput!): Post!",
            "addFriend(userId: ID!): Boolean!",
            "sendFriendRequest(userId: ID!): Boolean!",
            "acceptFriendRequest(requestId: ID!): Boolean!",
            "rejectFriendRequest(requestId: ID!): Boolean!",
            "getUploadTargets(requests: [UploadRequest!]!): [UploadTarget!]!",
            "getViewUrls(urls: [String!]!): [String!]!",
        ] {
            assert!(sdl.contains(signature), "missing from SDL: {signature}");
        }
    }
}
