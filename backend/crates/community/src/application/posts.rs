//! Posts

use std::sync::Arc;

use kernel::pagination::{Page, PageRequest};
use platform::cache::{Cached, ReadThroughCache};

use crate::application::cache_keys::{self, COMMENTS, POSTS, REACTIONS};
use crate::application::config::CommunityConfig;
use crate::application::views::PostView;
use crate::domain::entity::{NewPost, Post, PostChanges};
use crate::domain::repository::PostRepository;
use crate::domain::value_object::{PostContent, PostId, PostTitle, PostType, UserId};
use crate::error::{CommunityError, CommunityResult};

const NOT_AUTHOR: &str = "You can only modify your own posts";

#[derive(Debug)]
pub struct PostInput {
    pub title: Option<String>,
    pub content: String,
    pub post_type: Option<String>,
}

impl PostInput {
    fn validate(self) -> CommunityResult<NewPost> {
        Ok(NewPost {
            title: PostTitle::parse(self.title)?,
            content: PostContent::new(&self.content)?,
            post_type: PostType::parse_optional(self.post_type.as_deref())?,
        })
    }
}

/// Partial edit. `None` keeps the current value.
#[derive(Debug, Default)]
pub struct PostUpdateInput {
    pub title: Option<String>,
    pub content: Option<String>,
    pub post_type: Option<String>,
}

impl PostUpdateInput {
    fn validate(self) -> CommunityResult<PostChanges> {
        Ok(PostChanges {
            title: PostTitle::parse(self.title)?,
            content: self.content.map(PostContent::new).transpose()?,
            post_type: self
                .post_type
                .as_deref()
                .map(str::parse::<PostType>)
                .transpose()?,
        })
    }
}

pub struct PostService<R>
where
    R: PostRepository,
{
    repo: Arc<R>,
    cache: ReadThroughCache,
    config: Arc<CommunityConfig>,
}

impl<R> PostService<R>
where
    R: PostRepository,
{
    pub fn new(repo: Arc<R>, cache: ReadThroughCache, config: Arc<CommunityConfig>) -> Self {
        Self {
            repo,
            cache,
            config,
        }
    }

    pub async fn list(&self, page: &PageRequest) -> CommunityResult<Cached<Page<PostView>>> {
        let generation = self.cache.generation(POSTS).await;
        let key = cache_keys::list(POSTS, generation, page);

        self.cache
            .get_or_compute(&key, self.config.cache_ttl, || async {
                let rows = self.repo.page(page).await?;
                Ok::<_, CommunityError>(
                    Page::from_lookahead(rows, page).map(|post| PostView::from(&post)),
                )
            })
            .await
    }

    pub async fn get(&self, post_id: &PostId) -> CommunityResult<Cached<PostView>> {
        let key = cache_keys::detail(POSTS, post_id.as_uuid());

        self.cache
            .get_or_compute(&key, self.config.cache_ttl, || async {
                let post = self.find(post_id).await?;
                Ok::<_, CommunityError>(PostView::from(&post))
            })
            .await
    }

    pub async fn create(&self, author: &UserId, input: PostInput) -> CommunityResult<PostView> {
        let post = Post::new(*author, input.validate()?);
        self.repo.create(&post).await?;

        tracing::info!(
            post_id = %post.post_id,
            user_id = %author,
            post_type = %post.post_type,
            "Post created"
        );

        let view = PostView::from(&post);
        self.cache
            .put(&cache_keys::detail(POSTS, &view.id), self.config.cache_ttl, &view)
            .await;
        self.cache.bump_generation(POSTS).await;
        Ok(view)
    }

    pub async fn update(
        &self,
        actor: &UserId,
        post_id: &PostId,
        input: PostUpdateInput,
    ) -> CommunityResult<PostView> {
        let changes = input.validate()?;
        let mut post = self.find(post_id).await?;
        if !post.is_owned_by(actor) {
            return Err(CommunityError::NotOwner(NOT_AUTHOR));
        }

        post.apply(changes);
        self.repo.update(&post).await?;

        tracing::info!(post_id = %post.post_id, "Post updated");

        let view = PostView::from(&post);
        self.cache
            .put(&cache_keys::detail(POSTS, &view.id), self.config.cache_ttl, &view)
            .await;
        self.cache.bump_generation(POSTS).await;
        Ok(view)
    }

    pub async fn delete(&self, actor: &UserId, post_id: &PostId) -> CommunityResult<()> {
        let post = self.find(post_id).await?;
        if !post.is_owned_by(actor) {
            return Err(CommunityError::NotOwner(NOT_AUTHOR));
        }

        if !self.repo.soft_delete(post_id).await? {
            return Err(CommunityError::PostNotFound);
        }

        tracing::info!(post_id = %post_id, "Post deleted");

        self.cache
            .invalidate(&cache_keys::detail(POSTS, post_id.as_uuid()))
            .await;
        // Comment and reaction pages under the post are gone too
        for namespace in [POSTS, COMMENTS, REACTIONS] {
            self.cache.bump_generation(namespace).await;
        }
        Ok(())
    }

    async fn find(&self, post_id: &PostId) -> CommunityResult<Post> {
        self.repo
            .find_active(post_id)
            .await?
            .ok_or(CommunityError::PostNotFound)
    }
}
