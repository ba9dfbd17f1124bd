use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::application::task_service::TaskService;
use crate::domain::query::{Page, TaskFilter, TaskQuery};
use crate::domain::task::{CategoryId, Task, TaskDraft, TaskId, TaskStatus};
use crate::http::types::ApiError;

#[derive(Clone)]
pub struct ApiState<S: TaskService> {
    pub service: S,
}

pub fn router<S: TaskService + Clone>(state: ApiState<S>) -> Router {
    Router::new()
        .route("/api/v1/tasks", post(create_task::<S>))
        .route("/api/v1/tasks/", get(list_tasks::<S>))
        .route(
            "/api/v1/tasks/:id",
            get(get_task::<S>).put(update_task::<S>).delete(delete_task::<S>),
        )
        .with_state(state)
}

fn default_size() -> i64 { 10 }
fn default_sort() -> String { "createdAt,desc".to_string() }

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListParams {
    status: Option<TaskStatus>,
    category_id: Option<Uuid>,
    due_date_before: Option<NaiveDate>,
    due_date_after: Option<NaiveDate>,
    title: Option<String>,
    #[serde(default)]
    page: i64,
    #[serde(default = "default_size")]
    size: i64,
    #[serde(default = "default_sort")]
    sort: String,
}

async fn list_tasks<S: TaskService>(
    State(state): State<ApiState<S>>,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<Task>>, ApiError> {
    let filter = TaskFilter {
        status: params.status,
        category_id: params.category_id.map(CategoryId),
        due_date_before: params.due_date_before,
        due_date_after: params.due_date_after,
        title_contains: params.title,
    };
    let query = TaskQuery::normalize(filter, params.page, params.size, &params.sort)?;
    let page = state.service.list(&query).await?;
    Ok(Json(page))
}

async fn get_task<S: TaskService>(
    State(state): State<ApiState<S>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, ApiError> {
    let task = state.service.get(TaskId(id)).await?;
    Ok(Json(task))
}

async fn create_task<S: TaskService>(
    State(state): State<ApiState<S>>,
    Json(draft): Json<TaskDraft>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = state.service.create(draft).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task<S: TaskService>(
    State(state): State<ApiState<S>>,
    Path(id): Path<Uuid>,
    Json(draft): Json<TaskDraft>,
) -> Result<Json<Task>, ApiError> {
    let task = state.service.update(TaskId(id), draft).await?;
    Ok(Json(task))
}

async fn delete_task<S: TaskService>(
    State(state): State<ApiState<S>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.delete(TaskId(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
