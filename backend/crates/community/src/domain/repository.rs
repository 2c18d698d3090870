//! Repository Traits

use kernel::pagination::PageRequest;

use crate::domain::entity::{Comment, Post, Reaction, ReactionTarget, ToggleOutcome};
use crate::domain::value_object::{CommentId, PostId, ReactionId, ReactionType, UserId};
use crate::error::CommunityResult;

/// Post storage. "Active" means not soft-deleted.
#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    async fn create(&self, post: &Post) -> CommunityResult<()>;

    async fn find_active(&self, post_id: &PostId) -> CommunityResult<Option<Post>>;

    /// Up to `page.fetch_limit()` active posts ordered by id, from the cursor.
    async fn page(&self, page: &PageRequest) -> CommunityResult<Vec<Post>>;

    async fn update(&self, post: &Post) -> CommunityResult<()>;

    /// `false` if the post was missing or already deleted.
    async fn soft_delete(&self, post_id: &PostId) -> CommunityResult<bool>;
}

/// Comment storage. Writes keep `posts.comment_count` in step.
#[trait_variant::make(CommentRepository: Send)]
pub trait LocalCommentRepository {
    /// Insert and bump the post's comment count. `PostNotFound` if the post
    /// is missing or deleted.
    async fn create(&self, comment: &Comment) -> CommunityResult<()>;

    async fn find_active(&self, comment_id: &CommentId) -> CommunityResult<Option<Comment>>;

    async fn page_for_post(
        &self,
        post_id: &PostId,
        page: &PageRequest,
    ) -> CommunityResult<Vec<Comment>>;

    async fn update(&self, comment: &Comment) -> CommunityResult<()>;

    /// Soft delete and decrement the post's comment count.
    async fn soft_delete(&self, comment: &Comment) -> CommunityResult<bool>;
}

/// Reaction storage.
#[trait_variant::make(ReactionRepository: Send)]
pub trait LocalReactionRepository {
    /// Apply the toggle rule for `user_id` on `target` atomically, adjusting
    /// the target's reaction count. `PostNotFound` / `CommentNotFound` when
    /// the target is missing or deleted.
    async fn toggle(
        &self,
        user_id: &UserId,
        target: &ReactionTarget,
        reaction_type: ReactionType,
    ) -> CommunityResult<ToggleOutcome>;

    async fn find_by_id(&self, reaction_id: &ReactionId) -> CommunityResult<Option<Reaction>>;

    async fn page_for_target(
        &self,
        target: &ReactionTarget,
        page: &PageRequest,
    ) -> CommunityResult<Vec<Reaction>>;

    /// Target exists and is not deleted.
    async fn target_exists(&self, target: &ReactionTarget) -> CommunityResult<bool>;
}
