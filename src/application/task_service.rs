use async_trait::async_trait;
use chrono::Utc;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::query::{Page, TaskQuery};
use crate::domain::repository::{CategoryRepository, TaskRepository};
use crate::domain::task::{Task, TaskDraft, TaskId};

pub const MAX_TITLE_LEN: usize = 200;

#[async_trait]
pub trait TaskService: Send + Sync + 'static {
    async fn list(&self, query: &TaskQuery) -> DomainResult<Page<Task>>;
    async fn get(&self, id: TaskId) -> DomainResult<Task>;
    async fn create(&self, draft: TaskDraft) -> DomainResult<Task>;
    async fn update(&self, id: TaskId, draft: TaskDraft) -> DomainResult<Task>;
    async fn delete(&self, id: TaskId) -> DomainResult<()>;
}

#[derive(Clone)]
pub struct TaskServiceImpl<R: TaskRepository, C: CategoryRepository> {
    tasks: R,
    categories: C,
}

impl<R: TaskRepository, C: CategoryRepository> TaskServiceImpl<R, C> {
    pub fn new(tasks: R, categories: C) -> Self { Self { tasks, categories } }

    /// Field-level validation run before every mutating call.
    async fn validate(&self, draft: &TaskDraft) -> DomainResult<()> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(DomainError::Validation("title must not be empty".into()));
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(DomainError::Validation(format!(
                "title must be at most {MAX_TITLE_LEN} characters"
            )));
        }
        if let Some(category_id) = draft.category_id {
            if self.categories.get(category_id).await?.is_none() {
                return Err(DomainError::Validation(format!(
                    "category '{category_id}' does not exist"
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl<R: TaskRepository, C: CategoryRepository> TaskService for TaskServiceImpl<R, C> {
    async fn list(&self, query: &TaskQuery) -> DomainResult<Page<Task>> {
        self.tasks.list(query).await
    }

    async fn get(&self, id: TaskId) -> DomainResult<Task> {
        self.tasks
            .get(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("task '{id}' not found")))
    }

    async fn create(&self, draft: TaskDraft) -> DomainResult<Task> {
        self.validate(&draft).await?;
        let now = Utc::now();
        let task = Task {
            id: TaskId::default(),
            title: draft.title,
            description: draft.description,
            status: draft.status,
            due_date: draft.due_date,
            category_id: draft.category_id,
            created_at: now,
            updated_at: now,
        };
        self.tasks.insert(&task).await?;
        tracing::info!(id = %task.id, "task created");
        Ok(task)
    }

    async fn update(&self, id: TaskId, draft: TaskDraft) -> DomainResult<Task> {
        let mut task = self.get(id).await?;
        self.validate(&draft).await?;
        task.title = draft.title;
        task.description = draft.description;
        task.status = draft.status;
        task.due_date = draft.due_date;
        task.category_id = draft.category_id;
        task.updated_at = Utc::now();
        if !self.tasks.update(&task).await? {
            return Err(DomainError::NotFound(format!("task '{id}' not found")));
        }
        Ok(task)
    }

    async fn delete(&self, id: TaskId) -> DomainResult<()> {
        if !self.tasks.delete(id).await? {
            return Err(DomainError::NotFound(format!("task '{id}' not found")));
        }
        tracing::info!(%id, "task deleted");
        Ok(())
    }
}
