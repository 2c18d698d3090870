//! Reactions

use std::sync::Arc;

use kernel::pagination::{Page, PageRequest};
use platform::cache::{Cached, ReadThroughCache};

use crate::application::cache_keys::{self, COMMENTS, POSTS, REACTIONS};
use crate::application::config::CommunityConfig;
use crate::application::views::ReactionView;
use crate::domain::entity::{ReactionTarget, ToggleOutcome};
use crate::domain::repository::ReactionRepository;
use crate::domain::value_object::{ReactionId, ReactionType, UserId};
use crate::error::{CommunityError, CommunityResult};

pub struct ReactionService<R>
where
    R: ReactionRepository,
{
    repo: Arc<R>,
    cache: ReadThroughCache,
    config: Arc<CommunityConfig>,
}

impl<R> ReactionService<R>
where
    R: ReactionRepository,
{
    pub fn new(repo: Arc<R>, cache: ReadThroughCache, config: Arc<CommunityConfig>) -> Self {
        Self {
            repo,
            cache,
            config,
        }
    }

    /// React to a post or comment, or undo/replace an earlier reaction.
    pub async fn toggle(
        &self,
        actor: &UserId,
        target: &ReactionTarget,
        reaction_type: &str,
    ) -> CommunityResult<ToggleOutcome> {
        let reaction_type = ReactionType::parse(reaction_type)?;
        let outcome = self.repo.toggle(actor, target, reaction_type).await?;

        tracing::info!(
            user_id = %actor,
            target_kind = target.kind(),
            target_id = %target.id(),
            reaction_type = %reaction_type,
            removed = outcome.reaction().is_none(),
            "Reaction toggled"
        );

        self.cache
            .invalidate(&cache_keys::detail(
                REACTIONS,
                outcome.reaction_id().as_uuid(),
            ))
            .await;
        self.cache.bump_generation(REACTIONS).await;

        // Target's reaction_count may have moved
        let target_namespace = match target {
            ReactionTarget::Post(_) => POSTS,
            ReactionTarget::Comment(_) => COMMENTS,
        };
        self.cache
            .invalidate(&cache_keys::detail(target_namespace, &target.id()))
            .await;
        self.cache.bump_generation(target_namespace).await;

        Ok(outcome)
    }

    pub async fn list_for_target(
        &self,
        target: &ReactionTarget,
        page: &PageRequest,
    ) -> CommunityResult<Cached<Page<ReactionView>>> {
        let generation = self.cache.generation(REACTIONS).await;
        let key = cache_keys::scoped_list(
            REACTIONS,
            generation,
            &cache_keys::reaction_scope(target),
            page,
        );

        self.cache
            .get_or_compute(&key, self.config.cache_ttl, || async {
                if !self.repo.target_exists(target).await? {
                    return Err(match target {
                        ReactionTarget::Post(_) => CommunityError::PostNotFound,
                        ReactionTarget::Comment(_) => CommunityError::CommentNotFound,
                    });
                }
                let rows = self.repo.page_for_target(target, page).await?;
                Ok::<_, CommunityError>(
                    Page::from_lookahead(rows, page).map(|reaction| ReactionView::from(&reaction)),
                )
            })
            .await
    }

    pub async fn get(&self, reaction_id: &ReactionId) -> CommunityResult<Cached<ReactionView>> {
        let key = cache_keys::detail(REACTIONS, reaction_id.as_uuid());

        self.cache
            .get_or_compute(&key, self.config.cache_ttl, || async {
                let reaction = self
                    .repo
                    .find_by_id(reaction_id)
                    .await?
                    .ok_or(CommunityError::ReactionNotFound)?;
                Ok::<_, CommunityError>(ReactionView::from(&reaction))
            })
            .await
    }
}
