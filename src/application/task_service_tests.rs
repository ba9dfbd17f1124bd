#[cfg(test)]
mod tests {
    use std::cmp::Ordering;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};

    use super::super::task_service::{TaskService, TaskServiceImpl};
    use crate::domain::error::{DomainError, DomainResult};
    use crate::domain::query::{Page, SortDirection, SortField, TaskFilter, TaskQuery};
    use crate::domain::repository::{CategoryRepository, TaskRepository};
    use crate::domain::task::{Category, CategoryId, Task, TaskDraft, TaskId, TaskStatus};

    #[derive(Clone, Default)]
    struct InMemoryTasks {
        items: Arc<Mutex<HashMap<TaskId, Task>>>,
    }

    fn compare_by(a: &Task, b: &Task, field: SortField) -> Ordering {
        match field {
            SortField::Id => a.id.0.cmp(&b.id.0),
            SortField::Title => a.title.cmp(&b.title),
            SortField::Status => a.status.as_str().cmp(b.status.as_str()),
            SortField::DueDate => a.due_date.cmp(&b.due_date),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        }
    }

    fn matches(task: &Task, filter: &TaskFilter) -> bool {
        if let Some(status) = filter.status {
            if task.status != status { return false; }
        }
        if let Some(category_id) = filter.category_id {
            if task.category_id != Some(category_id) { return false; }
        }
        if let Some(after) = filter.due_date_after {
            match task.due_date { Some(d) if d >= after => {}, _ => return false }
        }
        if let Some(before) = filter.due_date_before {
            match task.due_date { Some(d) if d <= before => {}, _ => return false }
        }
        if let Some(needle) = &filter.title_contains {
            if !task.title.to_lowercase().contains(&needle.to_lowercase()) { return false; }
        }
        true
    }

    #[async_trait]
    impl TaskRepository for InMemoryTasks {
        async fn init(&self) -> DomainResult<()> { Ok(()) }
        async fn insert(&self, task: &Task) -> DomainResult<()> {
            self.items.lock().unwrap().insert(task.id, task.clone());
            Ok(())
        }
        async fn get(&self, id: TaskId) -> DomainResult<Option<Task>> {
            Ok(self.items.lock().unwrap().get(&id).cloned())
        }
        async fn list(&self, query: &TaskQuery) -> DomainResult<Page<Task>> {
            let mut matching: Vec<Task> = self
                .items
                .lock()
                .unwrap()
                .values()
                .filter(|t| matches(t, &query.filter))
                .cloned()
                .collect();
            matching.sort_by(|a, b| {
                let ord = compare_by(a, b, query.sort_field);
                let ord = match query.sort_direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                };
                ord.then(a.id.0.cmp(&b.id.0))
            });
            let total = matching.len() as i64;
            let items = matching
                .into_iter()
                .skip(query.offset() as usize)
                .take(query.size as usize)
                .collect();
            Ok(Page { items, total, page: query.page, size: query.size })
        }
        async fn update(&self, task: &Task) -> DomainResult<bool> {
            let mut map = self.items.lock().unwrap();
            if !map.contains_key(&task.id) { return Ok(false); }
            map.insert(task.id, task.clone());
            Ok(true)
        }
        async fn delete(&self, id: TaskId) -> DomainResult<bool> {
            Ok(self.items.lock().unwrap().remove(&id).is_some())
        }
    }

    #[derive(Clone, Default)]
    struct InMemoryCategories {
        items: Arc<Mutex<HashMap<CategoryId, Category>>>,
    }

    #[async_trait]
    impl CategoryRepository for InMemoryCategories {
        async fn init(&self) -> DomainResult<()> { Ok(()) }
        async fn insert(&self, category: &Category) -> DomainResult<()> {
            self.items.lock().unwrap().insert(category.id, category.clone());
            Ok(())
        }
        async fn get(&self, id: CategoryId) -> DomainResult<Option<Category>> {
            Ok(self.items.lock().unwrap().get(&id).cloned())
        }
        async fn list(&self) -> DomainResult<Vec<Category>> {
            let mut all: Vec<Category> = self.items.lock().unwrap().values().cloned().collect();
            all.sort_by(|a, b| a.name.cmp(&b.name));
            Ok(all)
        }
    }

    fn service() -> TaskServiceImpl<InMemoryTasks, InMemoryCategories> {
        TaskServiceImpl::new(InMemoryTasks::default(), InMemoryCategories::default())
    }

    fn service_with_category(name: &str) -> (TaskServiceImpl<InMemoryTasks, InMemoryCategories>, CategoryId) {
        let tasks = InMemoryTasks::default();
        let categories = InMemoryCategories::default();
        let category = Category { id: CategoryId::default(), name: name.into() };
        categories.items.lock().unwrap().insert(category.id, category.clone());
        (TaskServiceImpl::new(tasks, categories), category.id)
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.into(),
            description: None,
            status: TaskStatus::Pending,
            due_date: None,
            category_id: None,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn all(page: i64, size: i64, sort: &str) -> TaskQuery {
        TaskQuery::normalize(TaskFilter::default(), page, size, sort).unwrap()
    }

    #[tokio::test]
    async fn create_assigns_id_and_timestamps() {
        let service = service();
        let created = service.create(draft("Write report")).await.unwrap();
        assert_eq!(created.title, "Write report");
        assert_eq!(created.created_at, created.updated_at);
        let got = service.get(created.id).await.unwrap();
        assert_eq!(got, created);
    }

    #[tokio::test]
    async fn create_rejects_empty_title() {
        let service = service();
        let err = service.create(draft("   ")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_dangling_category() {
        let service = service();
        let mut d = draft("Task");
        d.category_id = Some(CategoryId::default());
        let err = service.create(d).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn create_accepts_existing_category() {
        let (service, category_id) = service_with_category("Work");
        let mut d = draft("Task");
        d.category_id = Some(category_id);
        let created = service.create(d).await.unwrap();
        assert_eq!(created.category_id, Some(category_id));
    }

    #[tokio::test]
    async fn update_missing_task_is_not_found() {
        let service = service();
        let err = service.update(TaskId::default(), draft("X")).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn update_overwrites_fields_and_refreshes_timestamp() {
        let service = service();
        let created = service.create(draft("Before")).await.unwrap();
        let mut d = draft("After");
        d.status = TaskStatus::Done;
        d.due_date = Some(date("2026-09-01"));
        let updated = service.update(created.id, d).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "After");
        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.due_date, Some(date("2026-09-01")));
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn delete_twice_fails_the_second_time() {
        let service = service();
        let created = service.create(draft("Once")).await.unwrap();
        service.delete(created.id).await.unwrap();
        let err = service.delete(created.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn list_combines_filters_with_and_semantics() {
        let service = service();
        let mut a = draft("Quarterly report");
        a.status = TaskStatus::Done;
        service.create(a).await.unwrap();
        let mut b = draft("Weekly report");
        b.status = TaskStatus::Pending;
        service.create(b).await.unwrap();
        service.create(draft("Groceries")).await.unwrap();

        let filter = TaskFilter {
            status: Some(TaskStatus::Pending),
            title_contains: Some("REPORT".into()),
            ..TaskFilter::default()
        };
        let query = TaskQuery::normalize(filter, 0, 10, "createdAt,desc").unwrap();
        let page = service.list(&query).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].title, "Weekly report");
    }

    #[tokio::test]
    async fn due_date_bounds_are_inclusive() {
        let service = service();
        for (title, due) in [
            ("early", "2024-01-01"),
            ("mid", "2024-01-15"),
            ("edge", "2024-01-31"),
            ("late", "2024-02-01"),
        ] {
            let mut d = draft(title);
            d.due_date = Some(date(due));
            service.create(d).await.unwrap();
        }
        service.create(draft("undated")).await.unwrap();

        let filter = TaskFilter {
            due_date_after: Some(date("2024-01-01")),
            due_date_before: Some(date("2024-01-31")),
            ..TaskFilter::default()
        };
        let query = TaskQuery::normalize(filter, 0, 10, "due_date,asc").unwrap();
        let page = service.list(&query).await.unwrap();
        let titles: Vec<&str> = page.items.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["early", "mid", "edge"]);
    }

    #[tokio::test]
    async fn duplicate_sort_keys_order_deterministically() {
        // identical created_at, written through the repo directly
        let now = Utc::now();
        let repo = InMemoryTasks::default();
        for _ in 0..5 {
            let task = Task {
                id: TaskId::default(),
                title: "same".into(),
                description: None,
                status: TaskStatus::Pending,
                due_date: None,
                category_id: None,
                created_at: now,
                updated_at: now,
            };
            repo.insert(&task).await.unwrap();
        }
        let service = TaskServiceImpl::new(repo, InMemoryCategories::default());
        let first = service.list(&all(0, 10, "createdAt,desc")).await.unwrap();
        for _ in 0..3 {
            let again = service.list(&all(0, 10, "createdAt,desc")).await.unwrap();
            assert_eq!(again.items, first.items);
        }
        // the tiebreak is ascending id
        let ids: Vec<_> = first.items.iter().map(|t| t.id.0).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);
    }

    #[tokio::test]
    async fn pages_do_not_overlap() {
        let service = service();
        for i in 0..7 {
            service.create(draft(&format!("task {i}"))).await.unwrap();
        }
        let first = service.list(&all(0, 3, "id,asc")).await.unwrap();
        let second = service.list(&all(1, 3, "id,asc")).await.unwrap();
        let third = service.list(&all(2, 3, "id,asc")).await.unwrap();
        assert_eq!(first.total, 7);
        assert_eq!(first.items.len(), 3);
        assert_eq!(second.items.len(), 3);
        assert_eq!(third.items.len(), 1);
        let mut seen: Vec<_> = first
            .items
            .iter()
            .chain(&second.items)
            .chain(&third.items)
            .map(|t| t.id)
            .collect();
        seen.dedup();
        assert_eq!(seen.len(), 7);
    }
}
