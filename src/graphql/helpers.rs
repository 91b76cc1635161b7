// Helper functions shared across GraphQL query/mutation modules.

use crate::db::{FriendRequestRecord, UserRecord};
use crate::graphql::types::{
    Comment, FriendRequest, Post, Reaction, ReactionKind, ReactionSummary, User,
};
use crate::services::feed::PostView;

/// Convert a UserRecord from the database to a GraphQL User type
pub(crate) fn user_record_to_graphql(r: UserRecord) -> User {
    User {
        id: r.id.into(),
        first_name: r.first_name,
        surname: r.surname,
        email: r.email,
        dob: r.dob,
        gender: r.gender,
        created_at: r.created_at,
    }
}

/// Convert an assembled PostView to a GraphQL Post type
pub(crate) fn post_view_to_graphql(view: PostView) -> Post {
    let comments = view
        .comments
        .into_iter()
        .map(|c| Comment {
            id: c.comment.id.into(),
            author: user_record_to_graphql(c.author),
            content: c.comment.content,
            created_at: c.comment.created_at,
        })
        .collect();

    // Reactions with kinds outside the fixed set never reach the wire; the
    // tally already excluded them as well.
    let reactions = view
        .reactions
        .into_iter()
        .filter_map(|r| {
            Some(Reaction {
                user: user_record_to_graphql(r.user),
                kind: ReactionKind::from_str(&r.reaction.kind)?,
                created_at: r.reaction.created_at,
            })
        })
        .collect();

    Post {
        id: view.post.id.into(),
        content: view.post.content,
        image_url: view.post.image_url,
        image_urls: view.post.image_urls,
        author: user_record_to_graphql(view.author),
        created_at: view.post.created_at,
        comments,
        reactions,
        reaction_summary: ReactionSummary {
            like: view.summary.like,
            love: view.summary.love,
            haha: view.summary.haha,
            wow: view.summary.wow,
            sad: view.summary.sad,
            angry: view.summary.angry,
        },
    }
}

/// Convert a FriendRequestRecord with both users resolved to a GraphQL type
pub(crate) fn friend_request_to_graphql(
    r: FriendRequestRecord,
    from: UserRecord,
    to: UserRecord,
) -> FriendRequest {
    FriendRequest {
        id: r.id.into(),
        from: user_record_to_graphql(from),
        to: user_record_to_graphql(to),
        status: r.status,
        created_at: r.created_at,
    }
}
