//! Exercise history: dated sessions expanded from a class's schedule.

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Datelike, Duration, Local, NaiveDate};
use log::info;
use serde::Deserialize;

use super::{filter_hit, PageQuery};
use crate::db::{ClassExercise, Db, ExerciseHistory};
use crate::error::{Failure, HandlerResult};

/// Weeks covered by one generate call, starting with the current one.
pub const GENERATE_WEEKS: i64 = 4;

#[derive(Debug, Deserialize)]
pub struct HistoryFilter {
    pub class_id: Option<i64>,
    pub exercise_id: Option<i64>,
    pub teacher_id: Option<i64>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryUpdate {
    pub date: Option<String>,
    pub teacher_id: Option<i64>,
    pub notes: Option<String>,
}

/// Monday 1970-01-05, week 0 of every n-weekly rotation.
fn epoch_monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 5).unwrap_or_default()
}

/// Weeks elapsed since `epoch_monday` for the week containing `date`.
pub fn week_index(date: NaiveDate) -> i64 {
    (date - epoch_monday()).num_days().div_euclid(7)
}

/// Dates on which `slot` falls within the horizon starting at `monday`.
/// A slot runs in weeks where `week_index % interval == offset`.
pub fn occurrences(slot: &ClassExercise, monday: NaiveDate, weeks: i64) -> Vec<NaiveDate> {
    let interval = i64::from(slot.week_interval.max(1));
    let offset = i64::from(slot.week_offset) % interval;
    (0..weeks)
        .map(|w| monday + Duration::days(w * 7 + i64::from(slot.day_of_week)))
        .filter(|date| week_index(*date).rem_euclid(interval) == offset)
        .collect()
}

fn current_monday() -> NaiveDate {
    let today = Local::now().date_naive();
    today - Duration::days(i64::from(today.weekday().num_days_from_monday()))
}

pub async fn list(
    State(db): State<Db>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<HistoryFilter>,
) -> Json<Vec<ExerciseHistory>> {
    let store = db.read().await;
    let sessions = store.history.values().filter(|h| {
        filter_hit(&filter.class_id, &h.class_id)
            && filter_hit(&filter.exercise_id, &h.exercise_id)
            && filter_hit(&filter.teacher_id, &h.teacher_id)
            && filter.date_from.as_ref().is_none_or(|from| h.date.as_str() >= from.as_str())
            && filter.date_to.as_ref().is_none_or(|to| h.date.as_str() <= to.as_str())
    });
    Json(page.apply(sessions))
}

pub async fn get(State(db): State<Db>, Path(id): Path<i64>) -> HandlerResult<Json<ExerciseHistory>> {
    let store = db.read().await;
    store.history.get(&id).cloned().map(Json).ok_or(Failure::not_found("Exercise history", id))
}

/// Sessions already generated for the same slot and date are skipped, so
/// repeated calls within a week do not duplicate anything.
pub async fn generate(State(db): State<Db>, Path(class_id): Path<i64>) -> HandlerResult<Json<Vec<ExerciseHistory>>> {
    let mut store = db.write().await;
    if !store.classes.contains_key(&class_id) {
        return Err(Failure::not_found("Class", class_id));
    }
    let slots: Vec<ClassExercise> = store
        .class_exercises
        .values()
        .filter(|ce| ce.class_id == class_id)
        .cloned()
        .collect();
    let monday = current_monday();

    let mut created = Vec::new();
    for slot in &slots {
        for date in occurrences(slot, monday, GENERATE_WEEKS) {
            let date = date.format("%Y-%m-%d").to_string();
            let exists = store
                .history
                .values()
                .any(|h| h.class_exercise_id == slot.id && h.date == date);
            if exists {
                continue;
            }
            let id = store.next_id();
            let session = ExerciseHistory {
                id,
                class_id,
                class_exercise_id: slot.id,
                exercise_id: slot.exercise_id,
                teacher_id: slot.teacher_id,
                date,
                time_of_exercise: slot.time_of_exercise.clone(),
                notes: None,
            };
            store.history.insert(id, session.clone());
            created.push(session);
        }
    }
    info!("generated {} sessions for class {class_id}", created.len());
    Ok(Json(created))
}

pub async fn update(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<HistoryUpdate>,
) -> HandlerResult<Json<ExerciseHistory>> {
    if let Some(date) = &input.date {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| Failure::unprocessable(format!("date {date} is not YYYY-MM-DD")))?;
    }
    let mut store = db.write().await;
    let session = store
        .history
        .get_mut(&id)
        .ok_or(Failure::not_found("Exercise history", id))?;
    if let Some(date) = input.date {
        session.date = date;
    }
    if let Some(teacher_id) = input.teacher_id {
        session.teacher_id = teacher_id;
    }
    if let Some(notes) = input.notes {
        session.notes = Some(notes);
    }
    Ok(Json(session.clone()))
}
