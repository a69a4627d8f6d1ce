use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use log::info;
use serde::{Deserialize, Serialize};

use super::{filter_hit, PageQuery};
use crate::db::{Class, ClassExercise, Db, Store};
use crate::error::{Failure, HandlerResult};

#[derive(Debug, Deserialize)]
pub struct ClassFilter {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewClass {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClassUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserParam {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ScheduleParams {
    pub exercise_id: i64,
    pub teacher_id: i64,
    pub day_of_week: u8,
    pub time_of_exercise: String,
    pub week_interval: Option<u8>,
    pub week_offset: Option<u8>,
}

/// A class together with its exercise schedule.
#[derive(Debug, Serialize)]
pub struct ClassDetail {
    #[serde(flatten)]
    pub class: Class,
    pub exercises: Vec<ClassExercise>,
}

fn detail(store: &Store, id: i64) -> HandlerResult<ClassDetail> {
    let class = store.classes.get(&id).cloned().ok_or(Failure::not_found("Class", id))?;
    let exercises = store
        .class_exercises
        .values()
        .filter(|ce| ce.class_id == id)
        .cloned()
        .collect();
    Ok(ClassDetail { class, exercises })
}

pub async fn list(
    State(db): State<Db>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<ClassFilter>,
) -> Json<Vec<Class>> {
    let store = db.read().await;
    let classes = store.classes.values().filter(|c| {
        filter_hit(&filter.name, &c.name)
            && filter_hit(&filter.is_active, &c.is_active)
            && filter.user_id.is_none_or(|u| c.user_ids.contains(&u))
    });
    Json(page.apply(classes))
}

pub async fn get(State(db): State<Db>, Path(id): Path<i64>) -> HandlerResult<Json<ClassDetail>> {
    let store = db.read().await;
    detail(&store, id).map(Json)
}

pub async fn add(State(db): State<Db>, Json(input): Json<NewClass>) -> HandlerResult<Json<Class>> {
    if input.name.trim().is_empty() {
        return Err(Failure::unprocessable("Class name must not be empty"));
    }
    let mut store = db.write().await;
    let id = store.next_id();
    let class = Class {
        id,
        name: input.name,
        description: input.description,
        is_active: true,
        user_ids: Vec::new(),
    };
    store.classes.insert(id, class.clone());
    info!("created class {id}");
    Ok(Json(class))
}

pub async fn update(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<ClassUpdate>,
) -> HandlerResult<Json<Class>> {
    let mut store = db.write().await;
    let class = store.classes.get_mut(&id).ok_or(Failure::not_found("Class", id))?;
    if let Some(name) = input.name {
        class.name = name;
    }
    if let Some(description) = input.description {
        class.description = Some(description);
    }
    Ok(Json(class.clone()))
}

pub async fn remove(State(db): State<Db>, Path(id): Path<i64>) -> HandlerResult<StatusCode> {
    let mut store = db.write().await;
    store.classes.remove(&id).ok_or(Failure::not_found("Class", id))?;
    store.class_exercises.retain(|_, ce| ce.class_id != id);
    info!("removed class {id}");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_user(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Query(param): Query<UserParam>,
) -> HandlerResult<Json<Class>> {
    let mut store = db.write().await;
    if !store.users.contains_key(&param.user_id) {
        return Err(Failure::not_found("User", param.user_id));
    }
    let class = store.classes.get_mut(&id).ok_or(Failure::not_found("Class", id))?;
    if !class.user_ids.contains(&param.user_id) {
        class.user_ids.push(param.user_id);
    }
    Ok(Json(class.clone()))
}

pub async fn remove_user(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Query(param): Query<UserParam>,
) -> HandlerResult<Json<Class>> {
    let mut store = db.write().await;
    let class = store.classes.get_mut(&id).ok_or(Failure::not_found("Class", id))?;
    class.user_ids.retain(|u| *u != param.user_id);
    Ok(Json(class.clone()))
}

pub async fn add_exercise(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Query(params): Query<ScheduleParams>,
) -> HandlerResult<Json<ClassExercise>> {
    if params.day_of_week > 6 {
        return Err(Failure::unprocessable("day_of_week must be between 0 and 6"));
    }
    let week_interval = params.week_interval.unwrap_or(1);
    if week_interval == 0 {
        return Err(Failure::unprocessable("week_interval must be positive"));
    }
    let mut store = db.write().await;
    if !store.classes.contains_key(&id) {
        return Err(Failure::not_found("Class", id));
    }
    if !store.exercises.contains_key(&params.exercise_id) {
        return Err(Failure::not_found("Exercise", params.exercise_id));
    }
    if !store.users.contains_key(&params.teacher_id) {
        return Err(Failure::not_found("User", params.teacher_id));
    }
    let ce_id = store.next_id();
    let link = ClassExercise {
        id: ce_id,
        class_id: id,
        exercise_id: params.exercise_id,
        teacher_id: params.teacher_id,
        day_of_week: params.day_of_week,
        time_of_exercise: params.time_of_exercise,
        week_interval,
        week_offset: params.week_offset.unwrap_or(0) % week_interval,
    };
    store.class_exercises.insert(ce_id, link.clone());
    info!("scheduled exercise {} in class {id}", link.exercise_id);
    Ok(Json(link))
}

pub async fn remove_exercise(State(db): State<Db>, Path(ce_id): Path<i64>) -> HandlerResult<StatusCode> {
    let mut store = db.write().await;
    store
        .class_exercises
        .remove(&ce_id)
        .ok_or(Failure::not_found("Class exercise", ce_id))?;
    Ok(StatusCode::NO_CONTENT)
}

async fn set_active(db: Db, id: i64, active: bool) -> HandlerResult<Json<Class>> {
    let mut store = db.write().await;
    let class = store.classes.get_mut(&id).ok_or(Failure::not_found("Class", id))?;
    class.is_active = active;
    Ok(Json(class.clone()))
}

pub async fn deactivate(State(db): State<Db>, Path(id): Path<i64>) -> HandlerResult<Json<Class>> {
    set_active(db, id, false).await
}

pub async fn activate(State(db): State<Db>, Path(id): Path<i64>) -> HandlerResult<Json<Class>> {
    set_active(db, id, true).await
}
