use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, QueryBuilder, Row, Sqlite};
use uuid::Uuid;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::query::{Page, TaskFilter, TaskQuery};
use crate::domain::repository::{CategoryRepository, TaskRepository};
use crate::domain::task::{Category, CategoryId, Task, TaskId, TaskStatus};

impl From<sqlx::Error> for DomainError {
    fn from(e: sqlx::Error) -> Self { DomainError::Storage(e.to_string()) }
}

pub async fn connect(database_url: &str) -> DomainResult<Pool<Sqlite>> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;
    Ok(pool)
}

#[derive(Clone)]
pub struct SqliteTaskRepository {
    pool: Pool<Sqlite>,
}

impl SqliteTaskRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self { Self { pool } }
}

fn push_filters(qb: &mut QueryBuilder<'_, Sqlite>, filter: &TaskFilter) {
    qb.push(" WHERE 1=1");
    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status.as_str());
    }
    if let Some(category_id) = filter.category_id {
        qb.push(" AND category_id = ").push_bind(category_id.0.to_string());
    }
    if let Some(after) = filter.due_date_after {
        qb.push(" AND due_date >= ").push_bind(format_date(after));
    }
    if let Some(before) = filter.due_date_before {
        qb.push(" AND due_date <= ").push_bind(format_date(before));
    }
    if let Some(needle) = &filter.title_contains {
        qb.push(" AND LOWER(title) LIKE ")
            .push_bind(format!("%{}%", needle.to_lowercase()));
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn init(&self) -> DomainResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                status TEXT NOT NULL,
                due_date TEXT,
                category_id TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert(&self, task: &Task) -> DomainResult<()> {
        sqlx::query(
            "INSERT INTO tasks (id, title, description, status, due_date, category_id, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(task.id.0.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.due_date.map(format_date))
        .bind(task.category_id.map(|c| c.0.to_string()))
        .bind(task.created_at.to_rfc3339())
        .bind(task.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, id: TaskId) -> DomainResult<Option<Task>> {
        let row = sqlx::query(
            "SELECT id, title, description, status, due_date, category_id, created_at, updated_at
             FROM tasks WHERE id = ?1",
        )
        .bind(id.0.to_string())
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(row_to_task))
    }

    async fn list(&self, query: &TaskQuery) -> DomainResult<Page<Task>> {
        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM tasks");
        push_filters(&mut count, &query.filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::new(
            "SELECT id, title, description, status, due_date, category_id, created_at, updated_at FROM tasks",
        );
        push_filters(&mut select, &query.filter);
        // secondary id tiebreak keeps page boundaries deterministic when
        // the sort key repeats
        select
            .push(" ORDER BY ")
            .push(query.sort_field.column())
            .push(" ")
            .push(query.sort_direction.keyword())
            .push(", id ASC");
        select.push(" LIMIT ").push_bind(query.size);
        select.push(" OFFSET ").push_bind(query.offset());

        let rows = select.build().fetch_all(&self.pool).await?;
        let items = rows.into_iter().map(row_to_task).collect();
        Ok(Page { items, total, page: query.page, size: query.size })
    }

    async fn update(&self, task: &Task) -> DomainResult<bool> {
        let result = sqlx::query(
            "UPDATE tasks SET title = ?2, description = ?3, status = ?4, due_date = ?5,
                              category_id = ?6, updated_at = ?7
             WHERE id = ?1",
        )
        .bind(task.id.0.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status.as_str())
        .bind(task.due_date.map(format_date))
        .bind(task.category_id.map(|c| c.0.to_string()))
        .bind(task.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: TaskId) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?1")
            .bind(id.0.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct SqliteCategoryRepository {
    pool: Pool<Sqlite>,
}

impl SqliteCategoryRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self { Self { pool } }
}

#[async_trait]
impl CategoryRepository for SqliteCategoryRepository {
    async fn init(&self) -> DomainResult<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS categories (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert(&self, category: &Category) -> DomainResult<()> {
        sqlx::query("INSERT INTO categories (id, name) VALUES (?1, ?2)")
            .bind(category.id.0.to_string())
            .bind(&category.name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get(&self, id: CategoryId) -> DomainResult<Option<Category>> {
        let row = sqlx::query("SELECT id, name FROM categories WHERE id = ?1")
            .bind(id.0.to_string())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(row_to_category))
    }

    async fn list(&self) -> DomainResult<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name FROM categories ORDER BY name ASC")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(row_to_category).collect())
    }
}

fn format_date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

fn row_to_task(row: SqliteRow) -> Task {
    let id_str: String = row.get("id");
    let title: String = row.get("title");
    let description: Option<String> = row.get("description");
    let status_str: String = row.get("status");
    let due_date_str: Option<String> = row.get("due_date");
    let category_id_str: Option<String> = row.get("category_id");
    let created_at_str: String = row.get("created_at");
    let updated_at_str: String = row.get("updated_at");

    let status = TaskStatus::parse(&status_str).unwrap_or(TaskStatus::Pending);
    let due_date = due_date_str.map(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").unwrap());
    let category_id = category_id_str.map(|s| CategoryId(Uuid::parse_str(&s).unwrap()));
    let created_at = DateTime::parse_from_rfc3339(&created_at_str).unwrap().with_timezone(&Utc);
    let updated_at = DateTime::parse_from_rfc3339(&updated_at_str).unwrap().with_timezone(&Utc);

    Task {
        id: TaskId(Uuid::parse_str(&id_str).unwrap()),
        title,
        description,
        status,
        due_date,
        category_id,
        created_at,
        updated_at,
    }
}

fn row_to_category(row: SqliteRow) -> Category {
    let id_str: String = row.get("id");
    let name: String = row.get("name");
    Category { id: CategoryId(Uuid::parse_str(&id_str).unwrap()), name }
}
