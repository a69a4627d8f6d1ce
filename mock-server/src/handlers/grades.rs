use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::{filter_hit, PageQuery};
use crate::db::{Db, Grade};
use crate::error::{Failure, HandlerResult};

#[derive(Debug, Deserialize)]
pub struct GradeFilter {
    pub user_id: Option<i64>,
    pub exercise_history_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewGrade {
    pub user_id: i64,
    pub exercise_history_id: Option<i64>,
    pub value: f64,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GradeUpdate {
    pub value: Option<f64>,
    pub comment: Option<String>,
}

pub async fn list(
    State(db): State<Db>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<GradeFilter>,
) -> Json<Vec<Grade>> {
    let store = db.read().await;
    let grades = store.grades.values().filter(|g| {
        filter_hit(&filter.user_id, &g.user_id)
            && filter
                .exercise_history_id
                .is_none_or(|h| g.exercise_history_id == Some(h))
    });
    Json(page.apply(grades))
}

pub async fn get(State(db): State<Db>, Path(id): Path<i64>) -> HandlerResult<Json<Grade>> {
    let store = db.read().await;
    store.grades.get(&id).cloned().map(Json).ok_or(Failure::not_found("Grade", id))
}

/// Upserts on (user, session) when a session is given.
pub async fn create(State(db): State<Db>, Json(input): Json<NewGrade>) -> HandlerResult<(StatusCode, Json<Grade>)> {
    let mut store = db.write().await;
    if !store.users.contains_key(&input.user_id) {
        return Err(Failure::not_found("User", input.user_id));
    }
    let existing = input.exercise_history_id.and_then(|h| {
        store
            .grades
            .values()
            .find(|g| g.user_id == input.user_id && g.exercise_history_id == Some(h))
            .map(|g| g.id)
    });
    let (status, id) = match existing {
        Some(id) => (StatusCode::OK, id),
        None => (StatusCode::CREATED, store.next_id()),
    };
    let grade = Grade {
        id,
        user_id: input.user_id,
        exercise_history_id: input.exercise_history_id,
        value: input.value,
        comment: input.comment,
    };
    store.grades.insert(id, grade.clone());
    Ok((status, Json(grade)))
}

pub async fn update(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<GradeUpdate>,
) -> HandlerResult<Json<Grade>> {
    let mut store = db.write().await;
    let grade = store.grades.get_mut(&id).ok_or(Failure::not_found("Grade", id))?;
    if let Some(value) = input.value {
        grade.value = value;
    }
    if let Some(comment) = input.comment {
        grade.comment = Some(comment);
    }
    Ok(Json(grade.clone()))
}

pub async fn delete(State(db): State<Db>, Path(id): Path<i64>) -> HandlerResult<StatusCode> {
    let mut store = db.write().await;
    store
        .grades
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(Failure::not_found("Grade", id))
}
