//! GraphQL type definitions
//!
//! These mirror the domain records but are decorated with async-graphql
//! attributes. Enum items and field names are renamed where the deployed
//! client schema uses different casing (reaction kinds are lowercase on the
//! wire, and a reaction's kind is exposed as `type`).

use async_graphql::{Enum, ID, InputObject, SimpleObject};

/// One of the six fixed reaction kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum)]
#[graphql(name = "ReactionType", rename_items = "lowercase")]
pub enum ReactionKind {
    Like,
    Love,
    Haha,
    Wow,
    Sad,
    Angry,
}

impl ReactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Like => "like",
            ReactionKind::Love => "love",
            ReactionKind::Haha => "haha",
            ReactionKind::Wow => "wow",
            ReactionKind::Sad => "sad",
            ReactionKind::Angry => "angry",
        }
    }

    pub fn from_str(kind: &str) -> Option<Self> {
        match kind {
            "like" => Some(ReactionKind::Like),
            "love" => Some(ReactionKind::Love),
            "haha" => Some(ReactionKind::Haha),
            "wow" => Some(ReactionKind::Wow),
            "sad" => Some(ReactionKind::Sad),
            "angry" => Some(ReactionKind::Angry),
            _ => None,
        }
    }
}

/// A member profile
#[derive(Debug, Clone, SimpleObject)]
pub struct User {
    pub id: ID,
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub dob: String,
    pub gender: String,
    pub created_at: String,
}

/// Token plus user returned from login
#[derive(Debug, Clone, SimpleObject)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

/// A comment with its resolved author
#[derive(Debug, Clone, SimpleObject)]
pub struct Comment {
    pub id: ID,
    pub author: User,
    pub content: String,
    pub created_at: String,
}

/// A reaction with its resolved user
#[derive(Debug, Clone, SimpleObject)]
pub struct Reaction {
    pub user: User,
    #[graphql(name = "type")]
    pub kind: ReactionKind,
    pub created_at: String,
}

/// Per-kind reaction counts; the six fields sum to the number of valid
/// reactions on the post
#[derive(Debug, Clone, Copy, Default, SimpleObject)]
pub struct ReactionSummary {
    pub like: i32,
    pub love: i32,
    pub haha: i32,
    pub wow: i32,
    pub sad: i32,
    pub angry: i32,
}

/// A fully assembled post read model
#[derive(Debug, Clone, SimpleObject)]
pub struct Post {
    pub id: ID,
    pub content: String,
    pub image_url: Option<String>,
    pub image_urls: Vec<String>,
    pub author: User,
    pub created_at: String,
    pub comments: Vec<Comment>,
    pub reactions: Vec<Reaction>,
    pub reaction_summary: ReactionSummary,
}

/// A friend request with both sides resolved
#[derive(Debug, Clone, SimpleObject)]
pub struct FriendRequest {
    pub id: ID,
    pub from: User,
    pub to: User,
    pub status: String,
    pub created_at: String,
}

/// A presigned upload slot for one file
#[derive(Debug, Clone, SimpleObject)]
pub struct UploadTarget {
    /// Presigned PUT URL, valid for five minutes
    pub upload_url: String,
    /// Public URL the object will have once uploaded
    pub public_url: String,
    /// Extra form fields; empty for presigned PUT uploads
    pub fields: Vec<UploadField>,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct UploadField {
    pub key: String,
    pub value: String,
}

#[derive(Debug, InputObject)]
pub struct SignupInput {
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub day: i32,
    pub month: String,
    pub year: i32,
    pub gender: String,
}

#[derive(Debug, InputObject)]
pub struct CreatePostInput {
    pub content: String,
    pub image_url: Option<String>,
    pub image_urls: Option<Vec<String>>,
}

#[derive(Debug, InputObject)]
pub struct AddCommentInput {
    pub post_id: ID,
    pub content: String,
}

#[derive(Debug, InputObject)]
pub struct ReactPostInput {
    pub post_id: ID,
    #[graphql(name = "type")]
    pub kind: ReactionKind,
}

#[derive(Debug, InputObject)]
pub struct UploadRequest {
    pub filename: String,
    pub content_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::feed::REACTION_KINDS;

    #[test]
    fn reaction_kind_string_roundtrip() {
        for kind in REACTION_KINDS {
            let parsed = ReactionKind::from_str(kind).expect("known kind");
            assert_eq!(parsed.as_str(), kind);
        }
        assert!(ReactionKind::from_str("meh").is_none());
    }
}
