//! `POST /auth` and the bearer check applied to every other route.
//!
//! Tokens are `token_<user id>`, the same string the client derives after a
//! successful login.

use axum::extract::{Query, Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use axum::Json;
use log::info;
use serde::Deserialize;

use crate::db::Db;
use crate::error::{Failure, HandlerResult};

/// Id of the authenticated caller, inserted into request extensions.
#[derive(Clone, Copy, Debug)]
pub struct CurrentUser(pub i64);

#[derive(Deserialize)]
pub struct Credentials {
    pub login: String,
    /// MD5 hex digest of the password.
    pub password: String,
}

pub async fn login(State(db): State<Db>, Query(credentials): Query<Credentials>) -> HandlerResult<Json<i64>> {
    let store = db.read().await;
    let user = store
        .user_by_login(&credentials.login)
        .filter(|u| u.password_hash.eq_ignore_ascii_case(&credentials.password))
        .ok_or_else(|| Failure::unauthorized("Invalid login or password"))?;
    if !user.is_active {
        return Err(Failure::unauthorized("User is inactive"));
    }
    info!("user {} logged in", user.id);
    Ok(Json(user.id))
}

fn bearer_user_id(request: &Request) -> Option<i64> {
    request
        .headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .strip_prefix("token_")?
        .parse()
        .ok()
}

pub async fn require_bearer(State(db): State<Db>, mut request: Request, next: Next) -> HandlerResult<Response> {
    let id = bearer_user_id(&request).ok_or_else(|| Failure::unauthorized("Not authenticated"))?;
    let active = db.read().await.users.get(&id).is_some_and(|u| u.is_active);
    if !active {
        return Err(Failure::unauthorized("Invalid or revoked token"));
    }
    request.extensions_mut().insert(CurrentUser(id));
    Ok(next.run(request).await)
}
