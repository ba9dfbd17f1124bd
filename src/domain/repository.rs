use async_trait::async_trait;

use super::error::DomainResult;
use super::query::{Page, TaskQuery};
use super::task::{Category, CategoryId, Task, TaskId};

#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    async fn init(&self) -> DomainResult<()>;
    async fn insert(&self, task: &Task) -> DomainResult<()>;
    async fn get(&self, id: TaskId) -> DomainResult<Option<Task>>;
    async fn list(&self, query: &TaskQuery) -> DomainResult<Page<Task>>;
    /// Returns false when no row with the task's id exists.
    async fn update(&self, task: &Task) -> DomainResult<bool>;
    /// Returns false when no row was deleted.
    async fn delete(&self, id: TaskId) -> DomainResult<bool>;
}

#[async_trait]
pub trait CategoryRepository: Send + Sync + 'static {
    async fn init(&self) -> DomainResult<()>;
    async fn insert(&self, category: &Category) -> DomainResult<()>;
    async fn get(&self, id: CategoryId) -> DomainResult<Option<Category>>;
    /// All categories, name ascending.
    async fn list(&self) -> DomainResult<Vec<Category>>;
}
