//! Cursor Pagination
//!
//! Forward-only, id-ordered paging shared by every list endpoint.
//!
//! A page of `limit` items is read as `limit + 1` rows ordered ascending by id,
//! starting at the cursor (inclusive). The extra row only signals that more
//! data exists; its id becomes `next_cursor` and it is dropped from the page.
//!
//! A cursor whose row has since been deleted is not an error: the query is a
//! plain `id >= cursor` comparison, so listing resumes at the smallest
//! remaining id after the old position.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::app_error::{AppError, AppResult};

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Raw `?cursor=&limit=` query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub cursor: Option<Uuid>,
    pub limit: Option<u32>,
}

/// Validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    cursor: Option<Uuid>,
    limit: u32,
}

impl PageRequest {
    /// `limit` defaults to [`DEFAULT_PAGE_LIMIT`]; it must be within
    /// `1..=MAX_PAGE_LIMIT`.
    pub fn new(cursor: Option<Uuid>, limit: Option<u32>) -> AppResult<Self> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if limit == 0 || limit > MAX_PAGE_LIMIT {
            return Err(AppError::bad_request(format!(
                "limit must be between 1 and {}",
                MAX_PAGE_LIMIT
            )));
        }
        Ok(Self { cursor, limit })
    }

    /// First page with the default limit.
    pub fn first() -> Self {
        Self {
            cursor: None,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }

    pub fn cursor(&self) -> Option<Uuid> {
        self.cursor
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Rows to ask the store for (one lookahead row).
    pub fn fetch_limit(&self) -> i64 {
        i64::from(self.limit) + 1
    }

    /// Stable fragment for cache keys: `<cursor|start>:<limit>`.
    pub fn key_fragment(&self) -> String {
        match self.cursor {
            Some(cursor) => format!("{}:{}", cursor, self.limit),
            None => format!("start:{}", self.limit),
        }
    }

    /// In-memory equivalent of the SQL the repositories run. Used by tests and
    /// by stores without a query engine.
    pub fn apply<T, I>(&self, items: I) -> Vec<T>
    where
        T: Cursor,
        I: IntoIterator<Item = T>,
    {
        let mut rows: Vec<T> = items
            .into_iter()
            .filter(|item| self.cursor.is_none_or(|cursor| item.cursor() >= cursor))
            .collect();
        rows.sort_by_key(|item| item.cursor());
        rows.truncate(self.fetch_limit() as usize);
        rows
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

impl TryFrom<PageQuery> for PageRequest {
    type Error = AppError;

    fn try_from(query: PageQuery) -> AppResult<Self> {
        Self::new(query.cursor, query.limit)
    }
}

/// Anything that can be listed: exposes the id it is ordered by.
pub trait Cursor {
    fn cursor(&self) -> Uuid;
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub has_next_page: bool,
    pub next_cursor: Option<Uuid>,
}

impl<T: Cursor> Page<T> {
    /// Build a page from the `limit + 1` rows returned by the store.
    pub fn from_lookahead(mut rows: Vec<T>, request: &PageRequest) -> Self {
        let limit = request.limit() as usize;
        if rows.len() > limit {
            let next_cursor = rows[limit].cursor();
            rows.truncate(limit);
            Self {
                items: rows,
                has_next_page: true,
                next_cursor: Some(next_cursor),
            }
        } else {
            Self {
                items: rows,
                has_next_page: false,
                next_cursor: None,
            }
        }
    }
}

impl<T> Page<T> {
    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            has_next_page: self.has_next_page,
            next_cursor: self.next_cursor,
        }
    }

    /// `pagination` object of list responses.
    pub fn info(&self) -> PageInfo {
        PageInfo {
            has_next_page: self.has_next_page,
            next_cursor: self.next_cursor,
            count: self.count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub next_cursor: Option<Uuid>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(Uuid);

    impl Cursor for Row {
        fn cursor(&self) -> Uuid {
            self.0
        }
    }

    fn rows(n: u128) -> Vec<Row> {
        (1..=n).map(|i| Row(Uuid::from_u128(i))).collect()
    }

    #[test]
    fn test_default_limit() {
        let request = PageRequest::new(None, None).unwrap();
        assert_eq!(request.limit(), DEFAULT_PAGE_LIMIT);
        assert_eq!(request.fetch_limit(), 11);
    }

    #[test]
    fn test_limit_bounds() {
        assert!(PageRequest::new(None, Some(0)).is_err());
        assert!(PageRequest::new(None, Some(MAX_PAGE_LIMIT + 1)).is_err());
        assert!(PageRequest::new(None, Some(1)).is_ok());
        assert!(PageRequest::new(None, Some(MAX_PAGE_LIMIT)).is_ok());
    }

    #[test]
    fn test_walks_five_rows_two_at_a_time() {
        let all = rows(5);

        let first = PageRequest::new(None, Some(2)).unwrap();
        let page = Page::from_lookahead(first.apply(all.clone()), &first);
        assert_eq!(page.items, vec![Row(Uuid::from_u128(1)), Row(Uuid::from_u128(2))]);
        assert!(page.has_next_page);
        assert_eq!(page.next_cursor, Some(Uuid::from_u128(3)));

        let second = PageRequest::new(page.next_cursor, Some(2)).unwrap();
        let page = Page::from_lookahead(second.apply(all.clone()), &second);
        assert_eq!(page.items, vec![Row(Uuid::from_u128(3)), Row(Uuid::from_u128(4))]);
        assert!(page.has_next_page);
        assert_eq!(page.next_cursor, Some(Uuid::from_u128(5)));

        let third = PageRequest::new(page.next_cursor, Some(2)).unwrap();
        let page = Page::from_lookahead(third.apply(all), &third);
        assert_eq!(page.items, vec![Row(Uuid::from_u128(5))]);
        assert!(!page.has_next_page);
        assert_eq!(page.next_cursor, None);
        assert_eq!(page.info().count, 1);
    }

    #[test]
    fn test_exact_fit_has_no_next_page() {
        let request = PageRequest::new(None, Some(3)).unwrap();
        let page = Page::from_lookahead(request.apply(rows(3)), &request);
        assert_eq!(page.count(), 3);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_deleted_cursor_resumes_at_next_id() {
        // id 3 is gone; a client still holding it as cursor continues at 4.
        let remaining: Vec<Row> = rows(5).into_iter().filter(|r| r.0 != Uuid::from_u128(3)).collect();
        let request = PageRequest::new(Some(Uuid::from_u128(3)), Some(2)).unwrap();
        let page = Page::from_lookahead(request.apply(remaining), &request);
        assert_eq!(page.items, vec![Row(Uuid::from_u128(4)), Row(Uuid::from_u128(5))]);
        assert!(!page.has_next_page);
    }

    #[test]
    fn test_key_fragment() {
        let cursor = Uuid::from_u128(9);
        assert_eq!(PageRequest::first().key_fragment(), "start:10");
        assert_eq!(
            PageRequest::new(Some(cursor), Some(5)).unwrap().key_fragment(),
            format!("{}:5", cursor)
        );
    }

    #[test]
    fn test_page_info_serialization() {
        let request = PageRequest::new(None, Some(1)).unwrap();
        let page = Page::from_lookahead(request.apply(rows(2)), &request);
        let json = serde_json::to_value(page.info()).unwrap();
        assert_eq!(json["hasNextPage"], true);
        assert_eq!(json["count"], 1);
        assert_eq!(json["nextCursor"], Uuid::from_u128(2).to_string());
    }
}
