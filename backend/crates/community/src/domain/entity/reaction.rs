//! Reaction Entity
//!
//! A user has at most one reaction per post and one per comment. Posting a
//! reaction toggles it:
//!
//! | existing            | requested | result                        | count |
//! |---------------------|-----------|-------------------------------|-------|
//! | none                | T         | insert T                      | +1    |
//! | T                   | T         | delete                        | -1    |
//! | U (U != T)          | T         | change type to T              | 0     |

use chrono::{DateTime, Utc};
use kernel::pagination::Cursor;
use uuid::Uuid;

use crate::domain::value_object::{CommentId, PostId, ReactionId, ReactionType, UserId};

/// What a reaction is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReactionTarget {
    Post(PostId),
    Comment(CommentId),
}

impl ReactionTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            ReactionTarget::Post(_) => "post",
            ReactionTarget::Comment(_) => "comment",
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            ReactionTarget::Post(id) => *id.as_uuid(),
            ReactionTarget::Comment(id) => *id.as_uuid(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Reaction {
    pub reaction_id: ReactionId,
    pub user_id: UserId,
    pub target: ReactionTarget,
    pub reaction_type: ReactionType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reaction {
    pub fn new(user_id: UserId, target: ReactionTarget, reaction_type: ReactionType) -> Self {
        let now = Utc::now();

        Self {
            reaction_id: ReactionId::new(),
            user_id,
            target,
            reaction_type,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn post_id(&self) -> Option<PostId> {
        match self.target {
            ReactionTarget::Post(id) => Some(id),
            ReactionTarget::Comment(_) => None,
        }
    }

    pub fn comment_id(&self) -> Option<CommentId> {
        match self.target {
            ReactionTarget::Post(_) => None,
            ReactionTarget::Comment(id) => Some(id),
        }
    }
}

impl Cursor for Reaction {
    fn cursor(&self) -> Uuid {
        *self.reaction_id.as_uuid()
    }
}

/// Step the store has to take for a toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Insert,
    Remove(ReactionId),
    ChangeType(ReactionId),
}

impl ToggleAction {
    /// Decide from the caller's current reaction on the target, if any.
    pub fn decide(existing: Option<&Reaction>, requested: ReactionType) -> Self {
        match existing {
            None => ToggleAction::Insert,
            Some(current) if current.reaction_type == requested => {
                ToggleAction::Remove(current.reaction_id)
            }
            Some(current) => ToggleAction::ChangeType(current.reaction_id),
        }
    }

    /// Change to the target's `reaction_count`.
    pub fn count_delta(&self) -> i32 {
        match self {
            ToggleAction::Insert => 1,
            ToggleAction::Remove(_) => -1,
            ToggleAction::ChangeType(_) => 0,
        }
    }
}

/// Result of a toggle.
#[derive(Debug, Clone)]
pub enum ToggleOutcome {
    Created(Reaction),
    Changed(Reaction),
    Removed(ReactionId),
}

impl ToggleOutcome {
    pub fn reaction(&self) -> Option<&Reaction> {
        match self {
            ToggleOutcome::Created(reaction) | ToggleOutcome::Changed(reaction) => Some(reaction),
            ToggleOutcome::Removed(_) => None,
        }
    }

    pub fn reaction_id(&self) -> ReactionId {
        match self {
            ToggleOutcome::Created(reaction) | ToggleOutcome::Changed(reaction) => {
                reaction.reaction_id
            }
            ToggleOutcome::Removed(id) => *id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing(reaction_type: ReactionType) -> Reaction {
        Reaction::new(
            UserId::new(),
            ReactionTarget::Post(PostId::new()),
            reaction_type,
        )
    }

    #[test]
    fn test_toggle_insert() {
        let action = ToggleAction::decide(None, ReactionType::Like);
        assert_eq!(action, ToggleAction::Insert);
        assert_eq!(action.count_delta(), 1);
    }

    #[test]
    fn test_toggle_same_type_removes() {
        let current = existing(ReactionType::Like);
        let action = ToggleAction::decide(Some(&current), ReactionType::Like);
        assert_eq!(action, ToggleAction::Remove(current.reaction_id));
        assert_eq!(action.count_delta(), -1);
    }

    #[test]
    fn test_toggle_other_type_changes() {
        let current = existing(ReactionType::Like);
        let action = ToggleAction::decide(Some(&current), ReactionType::Angry);
        assert_eq!(action, ToggleAction::ChangeType(current.reaction_id));
        assert_eq!(action.count_delta(), 0);
    }

    #[test]
    fn test_target_accessors() {
        let post_id = PostId::new();
        let reaction = Reaction::new(UserId::new(), ReactionTarget::Post(post_id), ReactionType::Wow);
        assert_eq!(reaction.post_id(), Some(post_id));
        assert_eq!(reaction.comment_id(), None);
        assert_eq!(reaction.target.kind(), "post");
    }
}
