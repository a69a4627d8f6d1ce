use axum::extract::{Path, Query, State};
use axum::Json;
use log::info;
use serde::Deserialize;

use super::{filter_hit, PageQuery};
use crate::db::{Db, User};
use crate::error::{Failure, HandlerResult};

#[derive(Debug, Deserialize)]
pub struct UserFilter {
    pub login: Option<String>,
    pub email: Option<String>,
    pub is_active: Option<bool>,
    pub role_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewUser {
    pub login: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserUpdate {
    pub login: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RoleParam {
    pub role_id: i64,
}

pub async fn list(
    State(db): State<Db>,
    Query(page): Query<PageQuery>,
    Query(filter): Query<UserFilter>,
) -> Json<Vec<User>> {
    let store = db.read().await;
    let users = store.users.values().filter(|u| {
        filter_hit(&filter.login, &u.login)
            && filter_hit(&filter.email, &u.email)
            && filter_hit(&filter.is_active, &u.is_active)
            && filter.role_id.is_none_or(|r| u.role_ids.contains(&r))
    });
    Json(page.apply(users))
}

pub async fn get(State(db): State<Db>, Path(id): Path<i64>) -> HandlerResult<Json<User>> {
    let store = db.read().await;
    store.users.get(&id).cloned().map(Json).ok_or(Failure::not_found("User", id))
}

pub async fn add(State(db): State<Db>, Json(input): Json<NewUser>) -> HandlerResult<Json<User>> {
    let mut store = db.write().await;
    if store.user_by_login(&input.login).is_some() {
        return Err(Failure::conflict(format!("Login {} already taken", input.login)));
    }
    let id = store.next_id();
    let user = User {
        id,
        login: input.login,
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        is_active: true,
        role_ids: Vec::new(),
        password_hash: input.password,
    };
    store.users.insert(id, user.clone());
    info!("created user {id}");
    Ok(Json(user))
}

pub async fn update(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<UserUpdate>,
) -> HandlerResult<Json<User>> {
    let mut store = db.write().await;
    if let Some(login) = &input.login {
        if store.user_by_login(login).is_some_and(|u| u.id != id) {
            return Err(Failure::conflict(format!("Login {login} already taken")));
        }
    }
    let user = store.users.get_mut(&id).ok_or(Failure::not_found("User", id))?;
    if let Some(login) = input.login {
        user.login = login;
    }
    if let Some(email) = input.email {
        user.email = email;
    }
    if let Some(first_name) = input.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = input.last_name {
        user.last_name = last_name;
    }
    if let Some(password) = input.password {
        user.password_hash = password;
    }
    Ok(Json(user.clone()))
}

pub async fn add_role(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Query(param): Query<RoleParam>,
) -> HandlerResult<Json<User>> {
    let mut store = db.write().await;
    if !store.roles.contains_key(&param.role_id) {
        return Err(Failure::not_found("Role", param.role_id));
    }
    let user = store.users.get_mut(&id).ok_or(Failure::not_found("User", id))?;
    if !user.role_ids.contains(&param.role_id) {
        user.role_ids.push(param.role_id);
    }
    Ok(Json(user.clone()))
}

pub async fn remove_role(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Query(param): Query<RoleParam>,
) -> HandlerResult<Json<User>> {
    let mut store = db.write().await;
    let user = store.users.get_mut(&id).ok_or(Failure::not_found("User", id))?;
    user.role_ids.retain(|r| *r != param.role_id);
    Ok(Json(user.clone()))
}

async fn set_active(db: Db, id: i64, active: bool) -> HandlerResult<Json<User>> {
    let mut store = db.write().await;
    let user = store.users.get_mut(&id).ok_or(Failure::not_found("User", id))?;
    user.is_active = active;
    info!("user {id} active={active}");
    Ok(Json(user.clone()))
}

pub async fn deactivate(State(db): State<Db>, Path(id): Path<i64>) -> HandlerResult<Json<User>> {
    set_active(db, id, false).await
}

pub async fn activate(State(db): State<Db>, Path(id): Path<i64>) -> HandlerResult<Json<User>> {
    set_active(db, id, true).await
}
