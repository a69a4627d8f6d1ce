//! In-memory stand-in for the SAiPD backend.
//!
//! Serves the same routes, verbs and parameter shapes as the real service so
//! the client can be exercised end-to-end. Every route except `POST /auth`
//! requires `Authorization: Bearer token_<user id>` for an active user.

pub mod auth;
pub mod db;
pub mod error;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;

pub use db::{new_db, Db, Store, ADMIN_LOGIN, ADMIN_PASSWORD};

use handlers::{attendance, classes, exercises, grades, history, messages, roles, tasks, users};

pub fn app() -> Router {
    app_with(new_db())
}

/// Router over an existing store, so tests can inspect or pre-populate it.
pub fn app_with(db: Db) -> Router {
    let protected = Router::new()
        .route("/user/list", get(users::list))
        .route("/user/get/{id}", get(users::get))
        .route("/user/add", post(users::add))
        .route("/user/update/{id}", post(users::update))
        .route("/user/add_role/{id}", post(users::add_role))
        .route("/user/remove_role/{id}", post(users::remove_role))
        .route("/user/deactivate/{id}", post(users::deactivate))
        .route("/user/activate/{id}", post(users::activate))
        .route("/role/list", get(roles::list))
        .route("/role/get/{id}", get(roles::get))
        .route("/class/list", get(classes::list))
        .route("/class/{id}", get(classes::get))
        .route("/class/get/{id}", get(classes::get))
        .route("/class/add", post(classes::add))
        .route("/class/update/{id}", post(classes::update))
        .route("/class/remove/{id}", post(classes::remove))
        .route("/class/add_user/{id}", post(classes::add_user))
        .route("/class/remove_user/{id}", post(classes::remove_user))
        .route("/class/add_exercise/{id}", post(classes::add_exercise))
        .route("/class/remove_exercise/{id}", post(classes::remove_exercise))
        .route("/class/deactivate/{id}", post(classes::deactivate))
        .route("/class/activate/{id}", post(classes::activate))
        .route("/exercise/list", get(exercises::list))
        .route("/exercise/get/{id}", get(exercises::get))
        .route("/exercise/add", post(exercises::add))
        .route("/exercise/update/{id}", post(exercises::update))
        .route("/exercise/delete/{id}", post(exercises::delete))
        .route("/history/list", get(history::list))
        .route("/history/get/{id}", get(history::get))
        .route("/history/generate/{id}", post(history::generate))
        .route("/history/update/{id}", post(history::update))
        .route("/attend/list", get(attendance::list))
        .route("/attend/get/{id}", get(attendance::get))
        .route("/attend/mark/{id}", post(attendance::mark))
        .route("/attend/update/{id}", post(attendance::update))
        .route("/attend/{history_id}/generate", get(attendance::generate))
        .route("/attend/{history_id}/{user_id}/{status}", get(attendance::set_status))
        .route("/grade/", get(grades::list).post(grades::create))
        .route("/grade/{id}", get(grades::get).put(grades::update).delete(grades::delete))
        .route("/task/", get(tasks::list).post(tasks::create))
        .route("/task/{id}", get(tasks::get).put(tasks::update).delete(tasks::delete))
        .route("/task/{id}/status/{status}", put(tasks::update_status))
        .route("/msg/", get(messages::list).post(messages::create))
        .route("/msg/{id}", get(messages::get).delete(messages::delete))
        .route_layer(middleware::from_fn_with_state(db.clone(), auth::require_bearer));

    Router::new()
        .route("/auth", post(auth::login))
        .merge(protected)
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}
