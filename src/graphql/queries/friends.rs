use rand::seq::SliceRandom;

use super::prelude::*;

#[derive(Default)]
pub struct FriendQueries;

#[Object]
impl FriendQueries {
    /// List the authenticated user's friends
    async fn my_friends(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let auth = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();

        let Some(me) = db.users().get_by_id(&auth.uid).await? else {
            return Ok(Vec::new());
        };

        let mut friends = Vec::with_capacity(me.friends.len());
        for friend_id in &me.friends {
            match db.users().get_by_id(friend_id).await? {
                Some(friend) => friends.push(user_record_to_graphql(friend)),
                None => {
                    tracing::debug!(user_id = %auth.uid, friend_id = %friend_id, "Skipping friend with unresolvable user");
                }
            }
        }
        Ok(friends)
    }

    /// Suggest users the authenticated user might befriend.
    ///
    /// Excludes the caller, existing friends, and anyone involved with the
    /// caller in a pending request (either direction). Shuffled on each call.
    async fn friend_suggestions(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let auth = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();

        let mut excluded: HashSet<String> = HashSet::new();
        excluded.insert(auth.uid.clone());

        if let Some(me) = db.users().get_by_id(&auth.uid).await? {
            excluded.extend(me.friends);
        }
        for request in db
            .friend_requests()
            .list_pending_involving(&auth.uid)
            .await?
        {
            excluded.insert(request.from_id);
            excluded.insert(request.to_id);
        }

        let mut suggestions: Vec<User> = db
            .users()
            .list_all()
            .await?
            .into_iter()
            .filter(|u| !excluded.contains(&u.id))
            .map(user_record_to_graphql)
            .collect();
        suggestions.shuffle(&mut rand::thread_rng());
        Ok(suggestions)
    }

    /// List pending friend requests addressed to the authenticated user,
    /// newest first
    async fn friend_requests(&self, ctx: &Context<'_>) -> Result<Vec<FriendRequest>> {
        let auth = ctx.auth_user()?;
        let db = ctx.data_unchecked::<Database>();

        let Some(me) = db.users().get_by_id(&auth.uid).await? else {
            return Ok(Vec::new());
        };

        let mut requests = Vec::new();
        for record in db
            .friend_requests()
            .list_incoming_pending(&auth.uid)
            .await?
        {
            match db.users().get_by_id(&record.from_id).await? {
                Some(from) => {
                    requests.push(friend_request_to_graphql(record, from, me.clone()));
                }
                None => {
                    tracing::debug!(request_id = %record.id, "Skipping request with unresolvable sender");
                }
            }
        }
        Ok(requests)
    }
}
