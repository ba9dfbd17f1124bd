use async_trait::async_trait;

use crate::domain::error::DomainResult;
use crate::domain::repository::CategoryRepository;
use crate::domain::task::Category;

/// Category lookup for the web form flow; task validation checks existence
/// through the repository directly.
#[async_trait]
pub trait CategoryService: Send + Sync + 'static {
    async fn list(&self) -> DomainResult<Vec<Category>>;
}

#[derive(Clone)]
pub struct CategoryServiceImpl<C: CategoryRepository> {
    repo: C,
}

impl<C: CategoryRepository> CategoryServiceImpl<C> {
    pub fn new(repo: C) -> Self { Self { repo } }
}

#[async_trait]
impl<C: CategoryRepository> CategoryService for CategoryServiceImpl<C> {
    async fn list(&self) -> DomainResult<Vec<Category>> {
        self.repo.list().await
    }
}
