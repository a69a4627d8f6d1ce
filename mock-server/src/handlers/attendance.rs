//! Attendance rows, one per (exercise history, user).

use axum::extract::{Path, Query, State};
use axum::Json;
use log::info;
use serde::Deserialize;

use super::{filter_hit, ForceQuery, PageQuery};
use crate::db::{Attendance, Db, Store};
use crate::error::{Failure, HandlerResult};

pub const DEFAULT_STATUS: &str = "present";

const CONVENIENCE_STATUSES: [&str; 3] = ["present", "absent", "late"];

#[derive(Debug, Deserialize)]
pub struct AttendanceFilter {
    pub exercise_history_id: Option<i64>,
    pub user_id: Option<i64>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttendanceMark {
    pub user_id: i64,
    pub status: String,
    pub note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AttendanceUpdate {
    pub status: Option<String>,
    pub note: Option<String>,
}

fn enrolled_users(store: &Store, history_id: i64) -> HandlerResult<Vec<i64>> {
    let session = store
        .history
        .get(&history_id)
        .ok_or(Failure::not_found("Exercise history", history_id))?;
    let class = store
        .classes
        .get(&session.class_id)
        .ok_or(Failure::not_found("Class", session.class_id))?;
    Ok(class.user_ids.clone())
}

/// Insert or overwrite the row for (history, user). Returns the stored row.
fn upsert(store: &mut Store, history_id: i64, user_id: i64, status: &str, note: Option<String>) -> Attendance {
    let existing = store.attendance_for(history_id, user_id).map(|a| a.id);
    let id = existing.unwrap_or_else(|| store.next_id());
    let row = Attendance {
        id,
        exercise_history_id: history_id,
        user_id,
        status: status.to_string(),
        note,
    };
    store.attendance.insert(id, row.clone());
    row
}

pub async fn list(
    State(db): State<Db>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<AttendanceFilter>,
) -> Json<Vec<Attendance>> {
    let store = db.read().await;
    let rows = store.attendance.values().filter(|a| {
        filter_hit(&filter.exercise_history_id, &a.exercise_history_id)
            && filter_hit(&filter.user_id, &a.user_id)
            && filter_hit(&filter.status, &a.status)
    });
    Json(page.apply(rows))
}

pub async fn get(State(db): State<Db>, Path(id): Path<i64>) -> HandlerResult<Json<Attendance>> {
    let store = db.read().await;
    store.attendance.get(&id).cloned().map(Json).ok_or(Failure::not_found("Attendance", id))
}

pub async fn mark(
    State(db): State<Db>,
    Path(history_id): Path<i64>,
    Json(input): Json<AttendanceMark>,
) -> HandlerResult<Json<Attendance>> {
    let mut store = db.write().await;
    if !store.history.contains_key(&history_id) {
        return Err(Failure::not_found("Exercise history", history_id));
    }
    if !store.users.contains_key(&input.user_id) {
        return Err(Failure::not_found("User", input.user_id));
    }
    let row = upsert(&mut store, history_id, input.user_id, &input.status, input.note);
    Ok(Json(row))
}

pub async fn update(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<AttendanceUpdate>,
) -> HandlerResult<Json<Attendance>> {
    let mut store = db.write().await;
    let row = store.attendance.get_mut(&id).ok_or(Failure::not_found("Attendance", id))?;
    if let Some(status) = input.status {
        row.status = status;
    }
    if let Some(note) = input.note {
        row.note = Some(note);
    }
    Ok(Json(row.clone()))
}

/// One row per enrolled user. Without `force` only missing rows are created;
/// with it existing rows are reset to the default status as well. Answers
/// with the number of rows created or reset.
pub async fn generate(
    State(db): State<Db>,
    Path(history_id): Path<i64>,
    Query(params): Query<ForceQuery>,
) -> HandlerResult<Json<u64>> {
    let mut store = db.write().await;
    let users = enrolled_users(&store, history_id)?;
    let mut count = 0;
    for user_id in users {
        if store.attendance_for(history_id, user_id).is_some() && !params.force {
            continue;
        }
        upsert(&mut store, history_id, user_id, DEFAULT_STATUS, None);
        count += 1;
    }
    info!("generated {count} attendance rows for session {history_id} (force={})", params.force);
    Ok(Json(count))
}

/// Set one user's status. A row already holding a different status is only
/// overwritten with `force`.
pub async fn set_status(
    State(db): State<Db>,
    Path((history_id, user_id, status)): Path<(i64, i64, String)>,
    Query(params): Query<ForceQuery>,
) -> HandlerResult<Json<Attendance>> {
    if !CONVENIENCE_STATUSES.contains(&status.as_str()) {
        return Err(Failure::unprocessable(format!("Unsupported status {status}")));
    }
    let mut store = db.write().await;
    if !store.history.contains_key(&history_id) {
        return Err(Failure::not_found("Exercise history", history_id));
    }
    if !store.users.contains_key(&user_id) {
        return Err(Failure::not_found("User", user_id));
    }
    if let Some(existing) = store.attendance_for(history_id, user_id) {
        if existing.status == status {
            return Ok(Json(existing.clone()));
        }
        if !params.force {
            return Err(Failure::conflict(format!(
                "Attendance already marked as {}",
                existing.status
            )));
        }
    }
    let note = store.attendance_for(history_id, user_id).and_then(|a| a.note.clone());
    Ok(Json(upsert(&mut store, history_id, user_id, &status, note)))
}
