use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use super::{filter_hit, PageQuery};
use crate::auth::CurrentUser;
use crate::db::{Db, Message};
use crate::error::{Failure, HandlerResult};

#[derive(Debug, Deserialize)]
pub struct MessageFilter {
    pub sender_id: Option<i64>,
    pub receiver_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewMessage {
    pub receiver_id: i64,
    pub subject: Option<String>,
    pub content: String,
}

pub async fn list(
    State(db): State<Db>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<MessageFilter>,
) -> Json<Vec<Message>> {
    let store = db.read().await;
    let messages = store.messages.values().filter(|m| {
        filter_hit(&filter.sender_id, &m.sender_id) && filter_hit(&filter.receiver_id, &m.receiver_id)
    });
    Json(page.apply(messages))
}

pub async fn get(State(db): State<Db>, Path(id): Path<i64>) -> HandlerResult<Json<Message>> {
    let store = db.read().await;
    store.messages.get(&id).cloned().map(Json).ok_or(Failure::not_found("Message", id))
}

/// The sender is whoever holds the bearer token.
pub async fn create(
    State(db): State<Db>,
    Extension(CurrentUser(sender_id)): Extension<CurrentUser>,
    Json(input): Json<NewMessage>,
) -> HandlerResult<(StatusCode, Json<Message>)> {
    let mut store = db.write().await;
    if !store.users.contains_key(&input.receiver_id) {
        return Err(Failure::not_found("User", input.receiver_id));
    }
    let id = store.next_id();
    let message = Message {
        id,
        sender_id,
        receiver_id: input.receiver_id,
        subject: input.subject,
        content: input.content,
    };
    store.messages.insert(id, message.clone());
    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn delete(State(db): State<Db>, Path(id): Path<i64>) -> HandlerResult<StatusCode> {
    let mut store = db.write().await;
    store
        .messages
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(Failure::not_found("Message", id))
}
