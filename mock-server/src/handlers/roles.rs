use axum::extract::{Path, Query, State};
use axum::Json;

use super::PageQuery;
use crate::db::{Db, Role};
use crate::error::{Failure, HandlerResult};

pub async fn list(State(db): State<Db>, Query(page): Query<PageQuery>) -> Json<Vec<Role>> {
    let store = db.read().await;
    Json(page.apply(store.roles.values()))
}

pub async fn get(State(db): State<Db>, Path(id): Path<i64>) -> HandlerResult<Json<Role>> {
    let store = db.read().await;
    store.roles.get(&id).cloned().map(Json).ok_or(Failure::not_found("Role", id))
}
