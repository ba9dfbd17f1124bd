use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::application::category_service::CategoryService;
use crate::application::task_service::TaskService;
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::query::{TaskFilter, TaskQuery};
use crate::domain::task::{CategoryId, TaskDraft, TaskId, TaskStatus};
use crate::http::views::{self, TaskFormView};

/// The list page shows the newest 50 tasks, unfiltered.
const LIST_PAGE_SIZE: i64 = 50;

#[derive(Clone)]
pub struct WebState<S: TaskService, C: CategoryService> {
    pub tasks: S,
    pub categories: C,
}

pub fn router<S, C>(state: WebState<S, C>) -> Router
where
    S: TaskService + Clone,
    C: CategoryService + Clone,
{
    Router::new()
        .route("/", get(index))
        .route("/tasks", get(task_list::<S, C>).post(create_task::<S, C>))
        .route("/tasks/new", get(new_task_form::<S, C>))
        .route("/tasks/:id", get(edit_task_form::<S, C>).post(update_or_delete_task::<S, C>))
        .with_state(state)
}

/// HTML transport wrapper for [`DomainError`]: renders an error page with
/// the matching status code.
struct WebError(DomainError);

impl From<DomainError> for WebError {
    fn from(e: DomainError) -> Self { Self(e) }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DomainError::NotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Validation(_) | DomainError::InvalidSortDirection(_) => StatusCode::BAD_REQUEST,
            DomainError::Storage(_) => {
                tracing::error!(error = %self.0, "request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Html(views::error_page(&self.0.to_string()))).into_response()
    }
}

/// Form body shared by create, update, and delete-override posts. Fields
/// arrive as raw strings and are parsed in [`TaskForm::to_draft`].
#[derive(Debug, Clone, Default, Deserialize)]
struct TaskForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    due_date: String,
    #[serde(default)]
    category_id: String,
    #[serde(rename = "_method", default)]
    method: String,
}

impl TaskForm {
    fn to_draft(&self) -> DomainResult<TaskDraft> {
        let status = match self.status.trim() {
            "" => return Err(DomainError::Validation("status is required".into())),
            s => TaskStatus::parse(s)
                .ok_or_else(|| DomainError::Validation(format!("unknown status '{s}'")))?,
        };
        let due_date = match self.due_date.trim() {
            "" => None,
            s => Some(
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map_err(|_| DomainError::Validation(format!("due date '{s}' is not a valid date")))?,
            ),
        };
        let category_id = match self.category_id.trim() {
            "" => None,
            s => Some(
                Uuid::parse_str(s)
                    .map(CategoryId)
                    .map_err(|_| DomainError::Validation(format!("invalid category id '{s}'")))?,
            ),
        };
        let description = match self.description.trim() {
            "" => None,
            s => Some(s.to_string()),
        };
        Ok(TaskDraft {
            title: self.title.trim().to_string(),
            description,
            status,
            due_date,
            category_id,
        })
    }

    fn view(&self, action: String) -> TaskFormView {
        TaskFormView {
            action,
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status.clone(),
            due_date: self.due_date.clone(),
            category_id: self.category_id.clone(),
        }
    }
}

async fn index() -> Html<String> {
    Html(views::index_page())
}

async fn task_list<S: TaskService, C: CategoryService>(
    State(state): State<WebState<S, C>>,
) -> Result<Html<String>, WebError> {
    let query = TaskQuery::normalize(TaskFilter::default(), 0, LIST_PAGE_SIZE, "createdAt,desc")?;
    let page = state.tasks.list(&query).await?;
    let categories = state.categories.list().await?;
    Ok(Html(views::task_list_page(&page, &categories)))
}

async fn new_task_form<S: TaskService, C: CategoryService>(
    State(state): State<WebState<S, C>>,
) -> Result<Html<String>, WebError> {
    let categories = state.categories.list().await?;
    Ok(Html(views::task_form_page(&TaskFormView::for_create(), &categories, &[])))
}

async fn edit_task_form<S: TaskService, C: CategoryService>(
    State(state): State<WebState<S, C>>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>, WebError> {
    let task = state.tasks.get(TaskId(id)).await?;
    let categories = state.categories.list().await?;
    Ok(Html(views::task_form_page(&TaskFormView::for_task(&task), &categories, &[])))
}

async fn create_task<S: TaskService, C: CategoryService>(
    State(state): State<WebState<S, C>>,
    Form(form): Form<TaskForm>,
) -> Result<Response, WebError> {
    submit(&state, None, form).await
}

async fn update_or_delete_task<S: TaskService, C: CategoryService>(
    State(state): State<WebState<S, C>>,
    Path(id): Path<Uuid>,
    Form(form): Form<TaskForm>,
) -> Result<Response, WebError> {
    let id = TaskId(id);
    if form.method.eq_ignore_ascii_case("delete") {
        state.tasks.delete(id).await?;
        return Ok(Redirect::to("/tasks").into_response());
    }
    submit(&state, Some(id), form).await
}

/// Shared create/update flow: validation failures re-render the form with
/// field errors and a refreshed category list; success redirects to the
/// task list.
async fn submit<S: TaskService, C: CategoryService>(
    state: &WebState<S, C>,
    id: Option<TaskId>,
    form: TaskForm,
) -> Result<Response, WebError> {
    let action = match id {
        Some(id) => format!("/tasks/{id}"),
        None => "/tasks".to_string(),
    };
    let draft = match form.to_draft() {
        Ok(draft) => draft,
        Err(e) => return rerender(state, form.view(action), e).await,
    };
    let result = match id {
        Some(id) => state.tasks.update(id, draft).await,
        None => state.tasks.create(draft).await,
    };
    match result {
        Ok(_) => Ok(Redirect::to("/tasks").into_response()),
        Err(e @ DomainError::Validation(_)) => rerender(state, form.view(action), e).await,
        Err(e) => Err(WebError(e)),
    }
}

async fn rerender<S: TaskService, C: CategoryService>(
    state: &WebState<S, C>,
    view: TaskFormView,
    error: DomainError,
) -> Result<Response, WebError> {
    let categories = state.categories.list().await?;
    let errors = vec![error.to_string()];
    Ok(Html(views::task_form_page(&view, &categories, &errors)).into_response())
}
