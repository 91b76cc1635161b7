//! Friend request workflow
//!
//! Per unordered user pair the request lifecycle is
//! none -> pending -> accepted | rejected, with both end states terminal.
//! Accepting mutually inserts each user into the other's friend list (two
//! separate row writes, no transaction). The "no duplicate pending request"
//! rule is a check before insert, not an atomic constraint, so two identical
//! concurrent sends can race; accepted gap, see DESIGN.md.
//!
//! There is no path from rejected back to pending, but a brand-new request
//! after a rejection is allowed since only pending requests block sending.

use anyhow::{Result, anyhow};

use crate::db::{Database, FriendRequestRecord, STATUS_ACCEPTED, STATUS_PENDING, STATUS_REJECTED};

#[derive(Clone)]
pub struct FriendService {
    db: Database,
}

impl FriendService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Directly make two users friends, both directions
    pub async fn add_friend(&self, me: &str, other: &str) -> Result<()> {
        if me == other {
            return Err(anyhow!("Cannot add yourself"));
        }

        let users = self.db.users();
        if users.get_by_id(other).await?.is_none() {
            return Err(anyhow!("User not found"));
        }

        users.add_friend(me, other).await?;
        users.add_friend(other, me).await?;
        Ok(())
    }

    /// Send a friend request from `me` to `other`
    pub async fn send_request(&self, me: &str, other: &str) -> Result<FriendRequestRecord> {
        if me == other {
            return Err(anyhow!("Cannot send request to yourself"));
        }

        let users = self.db.users();
        if users.get_by_id(other).await?.is_none() {
            return Err(anyhow!("User not found"));
        }

        if let Some(sender) = users.get_by_id(me).await?
            && sender.friends.iter().any(|f| f == other)
        {
            return Err(anyhow!("Already friends"));
        }

        let requests = self.db.friend_requests();
        if requests.find_pending_between(me, other).await?.is_some() {
            return Err(anyhow!("Friend request already exists"));
        }

        requests.create(me, other).await
    }

    /// Accept a pending request addressed to `me`; also makes the pair friends
    pub async fn accept_request(&self, me: &str, request_id: &str) -> Result<()> {
        let requests = self.db.friend_requests();
        let request = requests
            .get_by_id(request_id)
            .await?
            .ok_or_else(|| anyhow!("Friend request not found"))?;

        if request.to_id != me {
            return Err(anyhow!("You can only accept requests sent to you"));
        }
        if request.status != STATUS_PENDING {
            return Err(anyhow!("Request already processed"));
        }

        requests.set_status(&request.id, STATUS_ACCEPTED).await?;

        let users = self.db.users();
        users.add_friend(&request.from_id, &request.to_id).await?;
        users.add_friend(&request.to_id, &request.from_id).await?;

        Ok(())
    }

    /// Reject a pending request addressed to `me`; friend lists are untouched
    pub async fn reject_request(&self, me: &str, request_id: &str) -> Result<()> {
        let requests = self.db.friend_requests();
        let request = requests
            .get_by_id(request_id)
            .await?
            .ok_or_else(|| anyhow!("Friend request not found"))?;

        if request.to_id != me {
            return Err(anyhow!("You can only reject requests sent to you"));
        }
        if request.status != STATUS_PENDING {
            return Err(anyhow!("Request already processed"));
        }

        requests.set_status(&request.id, STATUS_REJECTED).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{memory_db, seed_user};

    #[tokio::test]
    async fn cannot_request_yourself() {
        let db = memory_db().await;
        let alice = seed_user(&db, "Alice", "alice@example.com").await;

        let err = FriendService::new(db)
            .send_request(&alice.id, &alice.id)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Cannot send request to yourself");
    }

    #[tokio::test]
    async fn duplicate_pending_request_rejected_in_both_directions() {
        let db = memory_db().await;
        let alice = seed_user(&db, "Alice", "alice@example.com").await;
        let bob = seed_user(&db, "Bob", "bob@example.com").await;
        let friends = FriendService::new(db);

        friends.send_request(&alice.id, &bob.id).await.unwrap();

        let err = friends.send_request(&alice.id, &bob.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Friend request already exists");

        let err = friends.send_request(&bob.id, &alice.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Friend request already exists");
    }

    #[tokio::test]
    async fn accept_makes_both_users_friends_and_request_non_pending() {
        let db = memory_db().await;
        let alice = seed_user(&db, "Alice", "alice@example.com").await;
        let bob = seed_user(&db, "Bob", "bob@example.com").await;
        let friends = FriendService::new(db.clone());

        let request = friends.send_request(&alice.id, &bob.id).await.unwrap();
        friends.accept_request(&bob.id, &request.id).await.unwrap();

        let alice = db.users().get_by_id(&alice.id).await.unwrap().unwrap();
        let bob = db.users().get_by_id(&bob.id).await.unwrap().unwrap();
        assert!(alice.friends.contains(&bob.id));
        assert!(bob.friends.contains(&alice.id));

        let request = db
            .friend_requests()
            .get_by_id(&request.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(request.status, STATUS_ACCEPTED);

        // Sending again now fails on the friendship, not the request
        let err = friends.send_request(&alice.id, &bob.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Already friends");
    }

    #[tokio::test]
    async fn only_the_target_may_accept() {
        let db = memory_db().await;
        let alice = seed_user(&db, "Alice", "alice@example.com").await;
        let bob = seed_user(&db, "Bob", "bob@example.com").await;
        let friends = FriendService::new(db);

        let request = friends.send_request(&alice.id, &bob.id).await.unwrap();
        let err = friends
            .accept_request(&alice.id, &request.id)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "You can only accept requests sent to you");
    }

    #[tokio::test]
    async fn reject_leaves_friend_lists_untouched() {
        let db = memory_db().await;
        let alice = seed_user(&db, "Alice", "alice@example.com").await;
        let bob = seed_user(&db, "Bob", "bob@example.com").await;
        let friends = FriendService::new(db.clone());

        let request = friends.send_request(&alice.id, &bob.id).await.unwrap();
        friends.reject_request(&bob.id, &request.id).await.unwrap();

        let alice = db.users().get_by_id(&alice.id).await.unwrap().unwrap();
        let bob = db.users().get_by_id(&bob.id).await.unwrap().unwrap();
        assert!(alice.friends.is_empty());
        assert!(bob.friends.is_empty());

        let request = db
            .friend_requests()
            .get_by_id(&request.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(request.status, STATUS_REJECTED);

        // Rejected is terminal for this request
        let err = friends
            .accept_request(&bob.id, &request.id)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Request already processed");
    }

    #[tokio::test]
    async fn a_new_request_after_rejection_is_allowed() {
        let db = memory_db().await;
        let alice = seed_user(&db, "Alice", "alice@example.com").await;
        let bob = seed_user(&db, "Bob", "bob@example.com").await;
        let friends = FriendService::new(db);

        let first = friends.send_request(&alice.id, &bob.id).await.unwrap();
        friends.reject_request(&bob.id, &first.id).await.unwrap();

        // Only pending requests block a resend
        friends.send_request(&alice.id, &bob.id).await.unwrap();
    }

    #[tokio::test]
    async fn add_friend_is_mutual_and_rejects_self() {
        let db = memory_db().await;
        let alice = seed_user(&db, "Alice", "alice@example.com").await;
        let bob = seed_user(&db, "Bob", "bob@example.com").await;
        let friends = FriendService::new(db.clone());

        let err = friends.add_friend(&alice.id, &alice.id).await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot add yourself");

        friends.add_friend(&alice.id, &bob.id).await.unwrap();
        // Idempotent
        friends.add_friend(&alice.id, &bob.id).await.unwrap();

        let alice = db.users().get_by_id(&alice.id).await.unwrap().unwrap();
        let bob = db.users().get_by_id(&bob.id).await.unwrap().unwrap();
        assert_eq!(alice.friends, vec![bob.id.clone()]);
        assert_eq!(bob.friends, vec![alice.id]);
    }
}
