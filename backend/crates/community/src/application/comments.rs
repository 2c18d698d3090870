//! Comments
//!
//! Comments live under a post; every write also touches the post's
//! `comment_count`, so the post's cached detail and list pages are refreshed
//! alongside the comment entries.

use std::sync::Arc;

use kernel::pagination::{Page, PageRequest};
use platform::cache::{Cached, ReadThroughCache};

use crate::application::cache_keys::{self, COMMENTS, POSTS};
use crate::application::config::CommunityConfig;
use crate::application::views::CommentView;
use crate::domain::entity::Comment;
use crate::domain::repository::{CommentRepository, PostRepository};
use crate::domain::value_object::{CommentContent, CommentId, PostId, UserId};
use crate::error::{CommunityError, CommunityResult};

const NOT_AUTHOR: &str = "You can only modify your own comments";

pub struct CommentService<R>
where
    R: PostRepository + CommentRepository,
{
    repo: Arc<R>,
    cache: ReadThroughCache,
    config: Arc<CommunityConfig>,
}

impl<R> CommentService<R>
where
    R: PostRepository + CommentRepository,
{
    pub fn new(repo: Arc<R>, cache: ReadThroughCache, config: Arc<CommunityConfig>) -> Self {
        Self {
            repo,
            cache,
            config,
        }
    }

    pub async fn list_for_post(
        &self,
        post_id: &PostId,
        page: &PageRequest,
    ) -> CommunityResult<Cached<Page<CommentView>>> {
        let generation = self.cache.generation(COMMENTS).await;
        let key = cache_keys::scoped_list(COMMENTS, generation, &post_id.to_string(), page);

        self.cache
            .get_or_compute(&key, self.config.cache_ttl, || async {
                if PostRepository::find_active(&*self.repo, post_id)
                    .await?
                    .is_none()
                {
                    return Err(CommunityError::PostNotFound);
                }
                let rows = self.repo.page_for_post(post_id, page).await?;
                Ok::<_, CommunityError>(
                    Page::from_lookahead(rows, page).map(|comment| CommentView::from(&comment)),
                )
            })
            .await
    }

    pub async fn get(&self, comment_id: &CommentId) -> CommunityResult<Cached<CommentView>> {
        let key = cache_keys::detail(COMMENTS, comment_id.as_uuid());

        self.cache
            .get_or_compute(&key, self.config.cache_ttl, || async {
                let comment = self.find(comment_id).await?;
                Ok::<_, CommunityError>(CommentView::from(&comment))
            })
            .await
    }

    pub async fn create(
        &self,
        author: &UserId,
        post_id: &PostId,
        content: String,
    ) -> CommunityResult<CommentView> {
        let content = CommentContent::new(content)?;
        let comment = Comment::new(*post_id, *author, content);
        CommentRepository::create(&*self.repo, &comment).await?;

        tracing::info!(
            comment_id = %comment.comment_id,
            post_id = %post_id,
            user_id = %author,
            "Comment created"
        );

        let view = self.store_view(&comment).await;
        self.post_changed(post_id).await;
        Ok(view)
    }

    pub async fn update(
        &self,
        actor: &UserId,
        comment_id: &CommentId,
        content: String,
    ) -> CommunityResult<CommentView> {
        let content = CommentContent::new(content)?;
        let mut comment = self.find(comment_id).await?;
        if !comment.is_owned_by(actor) {
            return Err(CommunityError::NotOwner(NOT_AUTHOR));
        }

        comment.edit(content);
        CommentRepository::update(&*self.repo, &comment).await?;

        tracing::info!(comment_id = %comment.comment_id, "Comment updated");

        Ok(self.store_view(&comment).await)
    }

    pub async fn delete(&self, actor: &UserId, comment_id: &CommentId) -> CommunityResult<()> {
        let comment = self.find(comment_id).await?;
        if !comment.is_owned_by(actor) {
            return Err(CommunityError::NotOwner(NOT_AUTHOR));
        }

        if !CommentRepository::soft_delete(&*self.repo, &comment).await? {
            return Err(CommunityError::CommentNotFound);
        }

        tracing::info!(comment_id = %comment_id, post_id = %comment.post_id, "Comment deleted");

        self.cache
            .invalidate(&cache_keys::detail(COMMENTS, comment_id.as_uuid()))
            .await;
        self.cache.bump_generation(COMMENTS).await;
        self.post_changed(&comment.post_id).await;
        Ok(())
    }

    async fn find(&self, comment_id: &CommentId) -> CommunityResult<Comment> {
        CommentRepository::find_active(&*self.repo, comment_id)
            .await?
            .ok_or(CommunityError::CommentNotFound)
    }

    async fn store_view(&self, comment: &Comment) -> CommentView {
        let view = CommentView::from(comment);
        self.cache
            .put(
                &cache_keys::detail(COMMENTS, &view.id),
                self.config.cache_ttl,
                &view,
            )
            .await;
        self.cache.bump_generation(COMMENTS).await;
        view
    }

    /// The post's comment count moved.
    async fn post_changed(&self, post_id: &PostId) {
        self.cache
            .invalidate(&cache_keys::detail(POSTS, post_id.as_uuid()))
            .await;
        self.cache.bump_generation(POSTS).await;
    }
}
