//! Generic Resource Repository
//!
//! Lookup, cursor paging and soft delete for any table with a UUID `id`
//! primary key. Entity-specific writes stay in `postgres.rs`.

use std::marker::PhantomData;

use kernel::id::Id;
use kernel::pagination::PageRequest;
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgExecutor, PgPool};
use uuid::Uuid;

use crate::error::CommunityResult;

/// A table the generic repository can serve.
pub trait Resource: Send + Sync + 'static {
    /// Id marker of the entity (`kernel::id::markers::*`)
    type Marker;
    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;
    type Entity: Send;

    const TABLE: &'static str;
    const COLUMNS: &'static str;
    /// Predicate selecting rows that are still visible.
    const LIVE: &'static str = "TRUE";

    fn into_entity(row: Self::Row) -> CommunityResult<Self::Entity>;
}

/// Tables with a `deleted_at` column.
pub trait SoftDelete: Resource {}

/// Restrict a page to rows whose `column` equals `value`.
#[derive(Debug, Clone, Copy)]
pub struct Scope {
    pub column: &'static str,
    pub value: Uuid,
}

impl Scope {
    pub fn new(column: &'static str, value: Uuid) -> Self {
        Self { column, value }
    }
}

pub struct PgResourceRepository<R> {
    pool: PgPool,
    _resource: PhantomData<fn() -> R>,
}

impl<R> Clone for PgResourceRepository<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _resource: PhantomData,
        }
    }
}

impl<R: Resource> PgResourceRepository<R> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _resource: PhantomData,
        }
    }

    pub async fn find_active(&self, id: &Id<R::Marker>) -> CommunityResult<Option<R::Entity>> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1 AND {}",
            R::COLUMNS,
            R::TABLE,
            R::LIVE
        );
        let row = sqlx::query_as::<_, R::Row>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(R::into_entity).transpose()
    }

    /// `page.fetch_limit()` live rows with `id >= cursor`, ascending.
    pub async fn page(
        &self,
        scope: Option<Scope>,
        page: &PageRequest,
    ) -> CommunityResult<Vec<R::Entity>> {
        let sql = page_sql::<R>(scope.map(|s| s.column));

        let mut query = sqlx::query_as::<_, R::Row>(&sql)
            .bind(page.cursor())
            .bind(page.fetch_limit());
        if let Some(scope) = scope {
            query = query.bind(scope.value);
        }

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(R::into_entity).collect()
    }
}

impl<R: SoftDelete> PgResourceRepository<R> {
    /// Mark a live row deleted. Runs on `executor` so callers can fold it
    /// into a transaction.
    pub async fn soft_delete<'e, E>(&self, executor: E, id: &Id<R::Marker>) -> CommunityResult<bool>
    where
        E: PgExecutor<'e>,
    {
        let sql = format!(
            "UPDATE {} SET deleted_at = now(), updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL",
            R::TABLE
        );
        let affected = sqlx::query(&sql)
            .bind(id.as_uuid())
            .execute(executor)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }
}

fn page_sql<R: Resource>(scope_column: Option<&str>) -> String {
    let mut sql = format!(
        "SELECT {} FROM {} WHERE {} AND ($1::uuid IS NULL OR id >= $1)",
        R::COLUMNS,
        R::TABLE,
        R::LIVE
    );
    if let Some(column) = scope_column {
        sql.push_str(&format!(" AND {} = $3", column));
    }
    sql.push_str(" ORDER BY id ASC LIMIT $2");
    sql
}
