//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::markers;
use kernel::pagination::PageRequest;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::domain::entity::{
    Comment, Post, Reaction, ReactionTarget, ToggleAction, ToggleOutcome,
};
use crate::domain::repository::{CommentRepository, PostRepository, ReactionRepository};
use crate::domain::value_object::{
    CommentContent, CommentId, PostContent, PostId, PostTitle, PostType, ReactionId,
    ReactionType, UserId,
};
use crate::error::{CommunityError, CommunityResult};
use crate::infra::resource::{PgResourceRepository, Resource, Scope, SoftDelete};

// ============================================================================
// Resources
// ============================================================================

pub struct PostResource;

impl Resource for PostResource {
    type Marker = markers::Post;
    type Row = PostRow;
    type Entity = Post;

    const TABLE: &'static str = "posts";
    const COLUMNS: &'static str = "id, user_id, title, content, post_type, reaction_count, \
                                   comment_count, created_at, updated_at, deleted_at";
    const LIVE: &'static str = "deleted_at IS NULL";

    fn into_entity(row: PostRow) -> CommunityResult<Post> {
        Ok(row.into_post())
    }
}

impl SoftDelete for PostResource {}

pub struct CommentResource;

impl Resource for CommentResource {
    type Marker = markers::Comment;
    type Row = CommentRow;
    type Entity = Comment;

    const TABLE: &'static str = "comments";
    const COLUMNS: &'static str = "id, post_id, user_id, content, reaction_count, \
                                   created_at, updated_at, deleted_at";
    const LIVE: &'static str = "deleted_at IS NULL";

    fn into_entity(row: CommentRow) -> CommunityResult<Comment> {
        Ok(row.into_comment())
    }
}

impl SoftDelete for CommentResource {}

pub struct ReactionResource;

impl Resource for ReactionResource {
    type Marker = markers::Reaction;
    type Row = ReactionRow;
    type Entity = Reaction;

    const TABLE: &'static str = "reactions";
    const COLUMNS: &'static str =
        "id, user_id, post_id, comment_id, reaction_type, created_at, updated_at";

    fn into_entity(row: ReactionRow) -> CommunityResult<Reaction> {
        row.into_reaction()
    }
}

// ============================================================================
// Repository
// ============================================================================

/// PostgreSQL-backed community repository
#[derive(Clone)]
pub struct PgCommunityRepository {
    pool: PgPool,
    posts: PgResourceRepository<PostResource>,
    comments: PgResourceRepository<CommentResource>,
    reactions: PgResourceRepository<ReactionResource>,
}

impl PgCommunityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            posts: PgResourceRepository::new(pool.clone()),
            comments: PgResourceRepository::new(pool.clone()),
            reactions: PgResourceRepository::new(pool.clone()),
            pool,
        }
    }
}

/// `(table, counter-owning column on reactions)` for a target.
fn target_columns(target: &ReactionTarget) -> (&'static str, &'static str) {
    match target {
        ReactionTarget::Post(_) => ("posts", "post_id"),
        ReactionTarget::Comment(_) => ("comments", "comment_id"),
    }
}

fn target_not_found(target: &ReactionTarget) -> CommunityError {
    match target {
        ReactionTarget::Post(_) => CommunityError::PostNotFound,
        ReactionTarget::Comment(_) => CommunityError::CommentNotFound,
    }
}

/// Row-lock a live post or comment for the rest of the transaction.
async fn lock_live(conn: &mut PgConnection, table: &str, id: Uuid) -> CommunityResult<bool> {
    let sql = format!("SELECT id FROM {table} WHERE id = $1 AND deleted_at IS NULL FOR UPDATE");
    let locked = sqlx::query_scalar::<_, Uuid>(&sql)
        .bind(id)
        .fetch_optional(conn)
        .await?;

    Ok(locked.is_some())
}

// ============================================================================
// Post Repository Implementation
// ============================================================================

impl PostRepository for PgCommunityRepository {
    async fn create(&self, post: &Post) -> CommunityResult<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (
                id,
                user_id,
                title,
                content,
                post_type,
                reaction_count,
                comment_count,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(post.user_id.as_uuid())
        .bind(post.title.as_ref().map(PostTitle::as_str))
        .bind(post.content.as_str())
        .bind(post.post_type.as_str())
        .bind(post.reaction_count)
        .bind(post.comment_count)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_active(&self, post_id: &PostId) -> CommunityResult<Option<Post>> {
        self.posts.find_active(post_id).await
    }

    async fn page(&self, page: &PageRequest) -> CommunityResult<Vec<Post>> {
        self.posts.page(None, page).await
    }

    async fn update(&self, post: &Post) -> CommunityResult<()> {
        sqlx::query(
            r#"
            UPDATE posts SET
                title = $2,
                content = $3,
                post_type = $4,
                updated_at = $5
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(post.title.as_ref().map(PostTitle::as_str))
        .bind(post.content.as_str())
        .bind(post.post_type.as_str())
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn soft_delete(&self, post_id: &PostId) -> CommunityResult<bool> {
        self.posts.soft_delete(&self.pool, post_id).await
    }
}

// ============================================================================
// Comment Repository Implementation
// ============================================================================

impl CommentRepository for PgCommunityRepository {
    async fn create(&self, comment: &Comment) -> CommunityResult<()> {
        let mut tx = self.pool.begin().await?;

        if !lock_live(&mut tx, "posts", *comment.post_id.as_uuid()).await? {
            return Err(CommunityError::PostNotFound);
        }

        sqlx::query(
            r#"
            INSERT INTO comments (
                id,
                post_id,
                user_id,
                content,
                reaction_count,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(comment.comment_id.as_uuid())
        .bind(comment.post_id.as_uuid())
        .bind(comment.user_id.as_uuid())
        .bind(comment.content.as_str())
        .bind(comment.reaction_count)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query("UPDATE posts SET comment_count = comment_count + 1 WHERE id = $1")
            .bind(comment.post_id.as_uuid())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn find_active(&self, comment_id: &CommentId) -> CommunityResult<Option<Comment>> {
        self.comments.find_active(comment_id).await
    }

    async fn page_for_post(
        &self,
        post_id: &PostId,
        page: &PageRequest,
    ) -> CommunityResult<Vec<Comment>> {
        let scope = Scope::new("post_id", *post_id.as_uuid());
        self.comments.page(Some(scope), page).await
    }

    async fn update(&self, comment: &Comment) -> CommunityResult<()> {
        sqlx::query(
            "UPDATE comments SET content = $2, updated_at = $3 \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(comment.comment_id.as_uuid())
        .bind(comment.content.as_str())
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn soft_delete(&self, comment: &Comment) -> CommunityResult<bool> {
        let mut tx = self.pool.begin().await?;

        if !self.comments.soft_delete(&mut *tx, &comment.comment_id).await? {
            return Ok(false);
        }

        sqlx::query(
            "UPDATE posts SET comment_count = GREATEST(comment_count - 1, 0) WHERE id = $1",
        )
        .bind(comment.post_id.as_uuid())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}

// ============================================================================
// Reaction Repository Implementation
// ============================================================================

impl ReactionRepository for PgCommunityRepository {
    async fn toggle(
        &self,
        user_id: &UserId,
        target: &ReactionTarget,
        reaction_type: ReactionType,
    ) -> CommunityResult<ToggleOutcome> {
        let (table, column) = target_columns(target);
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent toggles on the same target
        if !lock_live(&mut tx, table, target.id()).await? {
            return Err(target_not_found(target));
        }

        let sql = format!(
            "SELECT {} FROM reactions WHERE user_id = $1 AND {column} = $2",
            ReactionResource::COLUMNS
        );
        let existing = sqlx::query_as::<_, ReactionRow>(&sql)
            .bind(user_id.as_uuid())
            .bind(target.id())
            .fetch_optional(&mut *tx)
            .await?
            .map(ReactionRow::into_reaction)
            .transpose()?;

        let action = ToggleAction::decide(existing.as_ref(), reaction_type);

        let outcome = match action {
            ToggleAction::Insert => {
                let reaction = Reaction::new(*user_id, *target, reaction_type);
                sqlx::query(
                    r#"
                    INSERT INTO reactions (
                        id,
                        user_id,
                        post_id,
                        comment_id,
                        reaction_type,
                        created_at,
                        updated_at
                    ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                    "#,
                )
                .bind(reaction.reaction_id.as_uuid())
                .bind(reaction.user_id.as_uuid())
                .bind(reaction.post_id().map(PostId::into_uuid))
                .bind(reaction.comment_id().map(CommentId::into_uuid))
                .bind(reaction.reaction_type.as_str())
                .bind(reaction.created_at)
                .bind(reaction.updated_at)
                .execute(&mut *tx)
                .await?;

                ToggleOutcome::Created(reaction)
            }
            ToggleAction::Remove(reaction_id) => {
                sqlx::query("DELETE FROM reactions WHERE id = $1")
                    .bind(reaction_id.as_uuid())
                    .execute(&mut *tx)
                    .await?;

                ToggleOutcome::Removed(reaction_id)
            }
            ToggleAction::ChangeType(reaction_id) => {
                let sql = format!(
                    "UPDATE reactions SET reaction_type = $2, updated_at = now() \
                     WHERE id = $1 RETURNING {}",
                    ReactionResource::COLUMNS
                );
                let row = sqlx::query_as::<_, ReactionRow>(&sql)
                    .bind(reaction_id.as_uuid())
                    .bind(reaction_type.as_str())
                    .fetch_one(&mut *tx)
                    .await?;

                ToggleOutcome::Changed(row.into_reaction()?)
            }
        };

        let delta = action.count_delta();
        if delta != 0 {
            let sql = format!(
                "UPDATE {table} SET reaction_count = GREATEST(reaction_count + $2, 0) WHERE id = $1"
            );
            sqlx::query(&sql)
                .bind(target.id())
                .bind(delta)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        tracing::debug!(
            user_id = %user_id,
            target_kind = target.kind(),
            target_id = %target.id(),
            delta,
            "Reaction toggled"
        );

        Ok(outcome)
    }

    async fn find_by_id(&self, reaction_id: &ReactionId) -> CommunityResult<Option<Reaction>> {
        self.reactions.find_active(reaction_id).await
    }

    async fn page_for_target(
        &self,
        target: &ReactionTarget,
        page: &PageRequest,
    ) -> CommunityResult<Vec<Reaction>> {
        let (_, column) = target_columns(target);
        self.reactions
            .page(Some(Scope::new(column, target.id())), page)
            .await
    }

    async fn target_exists(&self, target: &ReactionTarget) -> CommunityResult<bool> {
        let (table, _) = target_columns(target);
        let sql =
            format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = $1 AND deleted_at IS NULL)");
        let exists = sqlx::query_scalar::<_, bool>(&sql)
            .bind(target.id())
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
pub struct PostRow {
    id: Uuid,
    user_id: Uuid,
    title: Option<String>,
    content: String,
    post_type: String,
    reaction_count: i32,
    comment_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl PostRow {
    fn into_post(self) -> Post {
        Post {
            post_id: PostId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            title: self.title.map(PostTitle::from_db),
            content: PostContent::from_db(self.content),
            post_type: PostType::from_db(&self.post_type),
            reaction_count: self.reaction_count,
            comment_count: self.comment_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct CommentRow {
    id: Uuid,
    post_id: Uuid,
    user_id: Uuid,
    content: String,
    reaction_count: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl CommentRow {
    fn into_comment(self) -> Comment {
        Comment {
            comment_id: CommentId::from_uuid(self.id),
            post_id: PostId::from_uuid(self.post_id),
            user_id: UserId::from_uuid(self.user_id),
            content: CommentContent::from_db(self.content),
            reaction_count: self.reaction_count,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }
}

#[derive(sqlx::FromRow)]
pub struct ReactionRow {
    id: Uuid,
    user_id: Uuid,
    post_id: Option<Uuid>,
    comment_id: Option<Uuid>,
    reaction_type: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ReactionRow {
    fn into_reaction(self) -> CommunityResult<Reaction> {
        let target = match (self.post_id, self.comment_id) {
            (Some(post_id), None) => ReactionTarget::Post(PostId::from_uuid(post_id)),
            (None, Some(comment_id)) => ReactionTarget::Comment(CommentId::from_uuid(comment_id)),
            _ => {
                return Err(CommunityError::Internal(format!(
                    "Reaction {} must reference exactly one target",
                    self.id
                )));
            }
        };
        let reaction_type = self
            .reaction_type
            .parse::<ReactionType>()
            .map_err(|_| {
                CommunityError::Internal(format!("Unknown reaction type {}", self.reaction_type))
            })?;

        Ok(Reaction {
            reaction_id: ReactionId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            target,
            reaction_type,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
