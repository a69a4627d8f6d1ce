use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use log::info;
use serde::Deserialize;

use super::PageQuery;
use crate::db::{Db, Exercise};
use crate::error::{Failure, HandlerResult};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewExercise {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExerciseUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn list(State(db): State<Db>, Query(page): Query<PageQuery>) -> Json<Vec<Exercise>> {
    let store = db.read().await;
    Json(page.apply(store.exercises.values()))
}

pub async fn get(State(db): State<Db>, Path(id): Path<i64>) -> HandlerResult<Json<Exercise>> {
    let store = db.read().await;
    store.exercises.get(&id).cloned().map(Json).ok_or(Failure::not_found("Exercise", id))
}

pub async fn add(State(db): State<Db>, Json(input): Json<NewExercise>) -> Json<Exercise> {
    let mut store = db.write().await;
    let id = store.next_id();
    let exercise = Exercise {
        id,
        name: input.name,
        description: input.description,
    };
    store.exercises.insert(id, exercise.clone());
    info!("created exercise {id}");
    Json(exercise)
}

pub async fn update(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<ExerciseUpdate>,
) -> HandlerResult<Json<Exercise>> {
    let mut store = db.write().await;
    let exercise = store.exercises.get_mut(&id).ok_or(Failure::not_found("Exercise", id))?;
    if let Some(name) = input.name {
        exercise.name = name;
    }
    if let Some(description) = input.description {
        exercise.description = Some(description);
    }
    Ok(Json(exercise.clone()))
}

/// Refuses while the exercise is still scheduled in some class.
pub async fn delete(State(db): State<Db>, Path(id): Path<i64>) -> HandlerResult<StatusCode> {
    let mut store = db.write().await;
    if !store.exercises.contains_key(&id) {
        return Err(Failure::not_found("Exercise", id));
    }
    if store.class_exercises.values().any(|ce| ce.exercise_id == id) {
        return Err(Failure::conflict(format!("Exercise {id} is still scheduled")));
    }
    store.exercises.remove(&id);
    info!("deleted exercise {id}");
    Ok(StatusCode::NO_CONTENT)
}
