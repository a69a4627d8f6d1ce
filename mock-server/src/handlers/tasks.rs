use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::{filter_hit, PageQuery};
use crate::db::{Db, Task};
use crate::error::{Failure, HandlerResult};

pub const DEFAULT_TASK_STATUS: &str = "todo";

#[derive(Debug, Deserialize)]
pub struct TaskFilter {
    pub user_id: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub user_id: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub user_id: Option<i64>,
    pub status: Option<String>,
}

pub async fn list(
    State(db): State<Db>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<TaskFilter>,
) -> Json<Vec<Task>> {
    let store = db.read().await;
    let tasks = store.tasks.values().filter(|t| {
        filter.user_id.is_none_or(|u| t.user_id == Some(u)) && filter_hit(&filter.status, &t.status)
    });
    Json(page.apply(tasks))
}

pub async fn get(State(db): State<Db>, Path(id): Path<i64>) -> HandlerResult<Json<Task>> {
    let store = db.read().await;
    store.tasks.get(&id).cloned().map(Json).ok_or(Failure::not_found("Task", id))
}

pub async fn create(State(db): State<Db>, Json(input): Json<NewTask>) -> (StatusCode, Json<Task>) {
    let mut store = db.write().await;
    let id = store.next_id();
    let task = Task {
        id,
        title: input.title,
        description: input.description,
        user_id: input.user_id,
        status: input.status.unwrap_or_else(|| DEFAULT_TASK_STATUS.to_string()),
    };
    store.tasks.insert(id, task.clone());
    (StatusCode::CREATED, Json(task))
}

pub async fn update(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<TaskUpdate>,
) -> HandlerResult<Json<Task>> {
    let mut store = db.write().await;
    let task = store.tasks.get_mut(&id).ok_or(Failure::not_found("Task", id))?;
    if let Some(title) = input.title {
        task.title = title;
    }
    if let Some(description) = input.description {
        task.description = Some(description);
    }
    if let Some(user_id) = input.user_id {
        task.user_id = Some(user_id);
    }
    if let Some(status) = input.status {
        task.status = status;
    }
    Ok(Json(task.clone()))
}

pub async fn update_status(
    State(db): State<Db>,
    Path((id, status)): Path<(i64, String)>,
) -> HandlerResult<Json<Task>> {
    let mut store = db.write().await;
    let task = store.tasks.get_mut(&id).ok_or(Failure::not_found("Task", id))?;
    task.status = status;
    Ok(Json(task.clone()))
}

pub async fn delete(State(db): State<Db>, Path(id): Path<i64>) -> HandlerResult<StatusCode> {
    let mut store = db.write().await;
    store
        .tasks
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(Failure::not_found("Task", id))
}
