//! Task API endpoints
//!
//! RESTful API for task CRUD operations. Every handler validates its input
//! before touching the store and answers with exactly one response.

use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{StatusCode, Uri},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use task_core::task::{
    NewTask, Task, TaskListParams, TaskPatch, TaskPriority, TaskQuery, TaskSort, TaskStatus,
};

use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{query_fields, validate, validate_id, FieldRules, Rule, Violation};

const TITLE_MAX_LEN: usize = 100;

// ============================================================================
// Validation rules
// ============================================================================

const CREATE_RULES: &[FieldRules] = &[
    FieldRules::new("title", &[Rule::Required, Rule::MaxLength(TITLE_MAX_LEN)]),
    FieldRules::new("priority", &[Rule::Required, Rule::OneOf(TaskPriority::VALUES)]),
    FieldRules::new("description", &[Rule::Text]),
    FieldRules::new("status", &[Rule::OneOf(TaskStatus::VALUES)]),
    FieldRules::new("dueDate", &[Rule::Timestamp]),
];

const LIST_RULES: &[FieldRules] = &[
    FieldRules::new("status", &[Rule::OneOf(TaskStatus::VALUES)]),
    FieldRules::new("priority", &[Rule::OneOf(TaskPriority::VALUES)]),
    FieldRules::new("sort", &[Rule::OneOf(TaskSort::VALUES)]),
    FieldRules::new("limit", &[Rule::NonNegativeInteger]),
    FieldRules::new("skip", &[Rule::NonNegativeInteger]),
];

const UPDATE_RULES: &[FieldRules] = &[
    FieldRules::new("title", &[Rule::NotBlank, Rule::MaxLength(TITLE_MAX_LEN)]),
    FieldRules::new("description", &[Rule::Text]),
    FieldRules::new("status", &[Rule::OneOf(TaskStatus::VALUES)]),
    FieldRules::new("priority", &[Rule::OneOf(TaskPriority::VALUES)]),
    FieldRules::new("dueDate", &[Rule::Timestamp]),
];

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status,
            priority: task.priority,
            due_date: task.due_date.map(|t| t.to_rfc3339()),
            created_at: task.created_at.to_rfc3339(),
            updated_at: task.updated_at.to_rfc3339(),
        }
    }
}

/// Unwrap a JSON object body, turning parse failures into a `body` violation.
///
/// A request without a JSON content type carries no fields.
fn json_object(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, Vec<Violation>> {
    match body {
        Ok(Json(Value::Object(fields))) => Ok(fields),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(Map::new()),
        Ok(Json(_)) => Err(vec![Violation::new(
            "body",
            "request body must be a JSON object",
        )]),
        Err(rejection) => Err(vec![Violation::new("body", rejection.body_text())]),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /tasks - List tasks matching the query parameters
async fn list_tasks(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let Query(raw) = Query::<HashMap<String, String>>::try_from_uri(&uri)
        .map_err(|e| ApiError::invalid("query", e.body_text()))?;
    validate(LIST_RULES, &query_fields(&raw))?;

    let Query(params) = Query::<TaskListParams>::try_from_uri(&uri)
        .map_err(|e| ApiError::invalid("query", e.body_text()))?;
    let query = TaskQuery::from(params);

    let tasks = state.task_store().find(&query).await?;
    tracing::debug!(count = tasks.len(), ?query, "Listed tasks");

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// POST /tasks - Create a new task
async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let fields = json_object(body)?;
    validate(CREATE_RULES, &fields)?;

    let input: NewTask = serde_json::from_value(Value::Object(fields))
        .map_err(|e| ApiError::invalid("body", e.to_string()))?;

    let created = state.task_store().create(input).await?;
    tracing::info!(task_id = %created.id, "Created task");

    Ok((StatusCode::CREATED, Json(TaskResponse::from(created))))
}

/// GET /tasks/{id} - Get a single task
async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let id = validate_id(&id)?;

    let task = state
        .task_store()
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(TaskResponse::from(task)))
}

/// PUT /tasks/{id} - Update the supplied fields of a task
async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TaskResponse>, ApiError> {
    let id = validate_id(&id);
    let fields = json_object(body).and_then(|fields| validate(UPDATE_RULES, &fields).map(|()| fields));

    let (id, fields) = match (id, fields) {
        (Ok(id), Ok(fields)) => (id, fields),
        (id, fields) => {
            let mut violations: Vec<Violation> = id.err().into_iter().collect();
            violations.extend(fields.err().unwrap_or_default());
            return Err(ApiError::Validation(violations));
        }
    };

    let patch: TaskPatch = serde_json::from_value(Value::Object(fields))
        .map_err(|e| ApiError::invalid("body", e.to_string()))?;

    let updated = state
        .task_store()
        .update_by_id(id, patch)
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!(
        task_id = %id,
        status = updated.status.as_str(),
        priority = updated.priority.as_str(),
        "Updated task"
    );

    Ok(Json(TaskResponse::from(updated)))
}

/// DELETE /tasks/{id} - Delete a task
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = validate_id(&id)?;

    if state.task_store().delete_by_id(id).await? {
        tracing::info!(task_id = %id, "Deleted task");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
}
