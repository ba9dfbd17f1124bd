use chrono::NaiveDate;
use serde::Serialize;

use super::error::{DomainError, DomainResult};
use super::task::{CategoryId, TaskStatus};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// Columns a list query may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField { Id, Title, Status, DueDate, CreatedAt, UpdatedAt }

impl SortField {
    /// Column name in the tasks table. Values come from a fixed allow-list,
    /// never from user input, so they are safe to splice into SQL.
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Title => "title",
            SortField::Status => "status",
            SortField::DueDate => "due_date",
            SortField::CreatedAt => "created_at",
            SortField::UpdatedAt => "updated_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection { Asc, Desc }

impl SortDirection {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// Optional filters of a list query. Omitted filters impose no constraint;
/// provided filters combine with AND semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub category_id: Option<CategoryId>,
    /// Inclusive upper bound on due date.
    pub due_date_before: Option<NaiveDate>,
    /// Inclusive lower bound on due date.
    pub due_date_after: Option<NaiveDate>,
    /// Case-insensitive substring match on title.
    pub title_contains: Option<String>,
}

/// Bounded, validated descriptor of a list query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    pub filter: TaskFilter,
    pub page: i64,
    pub size: i64,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl TaskQuery {
    /// Normalize raw, untrusted list parameters into a bounded query.
    ///
    /// - negative `page` clamps to 0
    /// - `size` outside 1..=100 falls back to the default of 10
    /// - `sort` is `"field"` or `"field,direction"`; direction defaults to
    ///   descending and must otherwise be `asc`/`desc` (case-insensitive)
    /// - unrecognized field tokens fall back to created-at descending rather
    ///   than erroring, so stale sort hints never break the list endpoint
    pub fn normalize(filter: TaskFilter, page: i64, size: i64, sort: &str) -> DomainResult<Self> {
        let page = page.max(0);
        let size = if size <= 0 || size > MAX_PAGE_SIZE { DEFAULT_PAGE_SIZE } else { size };

        let (field_token, direction_token) = match sort.split_once(',') {
            Some((f, d)) => (f.trim(), d.trim()),
            None => (sort.trim(), ""),
        };

        let sort_direction = if direction_token.is_empty() {
            SortDirection::Desc
        } else if direction_token.eq_ignore_ascii_case("asc") {
            SortDirection::Asc
        } else if direction_token.eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            return Err(DomainError::InvalidSortDirection(direction_token.to_string()));
        };

        let (sort_field, sort_direction) = match field_token {
            "due_date" | "dueDate" => (SortField::DueDate, sort_direction),
            "created_at" | "createdAt" => (SortField::CreatedAt, sort_direction),
            "updated_at" | "updatedAt" => (SortField::UpdatedAt, sort_direction),
            "id" => (SortField::Id, sort_direction),
            "title" => (SortField::Title, sort_direction),
            "status" => (SortField::Status, sort_direction),
            _ => (SortField::CreatedAt, SortDirection::Desc),
        };

        Ok(Self { filter, page, size, sort_field, sort_direction })
    }

    pub fn offset(&self) -> i64 { self.page * self.size }
}

/// One page of results plus paging metadata.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub size: i64,
}
