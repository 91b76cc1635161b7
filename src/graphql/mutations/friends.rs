//! Friendship and friend-request mutations
//!
//! These return plain booleans; the deployed client refetches `myFriends`
//! and `friendRequests` after a successful call instead of reading the
//! mutation payload.

use async_graphql::ID;

use super::prelude::*;

#[derive(Default)]
pub struct FriendMutations;

#[Object]
impl FriendMutations {
    /// Directly befriend another user; both friend lists are updated
    async fn add_friend(&self, ctx: &Context<'_>, user_id: ID) -> Result<bool> {
        let auth = ctx.auth_user()?;
        let friends = ctx.data_unchecked::<FriendService>();

        friends.add_friend(&auth.uid, &user_id).await?;

        tracing::info!(user_id = %auth.uid, friend_id = %*user_id, "Friend added");
        Ok(true)
    }

    /// Send a friend request to another user
    async fn send_friend_request(&self, ctx: &Context<'_>, user_id: ID) -> Result<bool> {
        let auth = ctx.auth_user()?;
        let friends = ctx.data_unchecked::<FriendService>();

        let record = friends.send_request(&auth.uid, &user_id).await?;

        tracing::info!(user_id = %auth.uid, to_id = %*user_id, request_id = %record.id, "Friend request sent");
        Ok(true)
    }

    /// Accept a pending friend request addressed to the caller
    async fn accept_friend_request(&self, ctx: &Context<'_>, request_id: ID) -> Result<bool> {
        let auth = ctx.auth_user()?;
        let friends = ctx.data_unchecked::<FriendService>();

        friends.accept_request(&auth.uid, &request_id).await?;

        tracing::info!(user_id = %auth.uid, request_id = %*request_id, "Friend request accepted");
        Ok(true)
    }

    /// Reject a pending friend request addressed to the caller
    async fn reject_friend_request(&self, ctx: &Context<'_>, request_id: ID) -> Result<bool> {
        let auth = ctx.auth_user()?;
        let friends = ctx.data_unchecked::<FriendService>();

        friends.reject_request(&auth.uid, &request_id).await?;

        tracing::info!(user_id = %auth.uid, request_id = %*request_id, "Friend request rejected");
        Ok(true)
    }
}
