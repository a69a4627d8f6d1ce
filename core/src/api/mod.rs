//! Per-resource request builders.
//!
//! Each grouping borrows the `SaipdClient` and maps one backend operation to
//! one `build_*` method. Verbs and paths differ between resources (older
//! resources use `POST /x/update/{id}`, newer ones REST-style `PUT /x/{id}`),
//! so nothing here is shared beyond the client's own request helpers.

mod attendance;
mod auth;
mod classes;
mod exercises;
mod grades;
mod history;
mod messages;
mod roles;
mod tasks;
mod users;

pub use attendance::AttendanceApi;
pub use auth::AuthApi;
pub use classes::ClassApi;
pub use exercises::ExerciseApi;
pub use grades::GradeApi;
pub use history::HistoryApi;
pub use messages::MessageApi;
pub use roles::RoleApi;
pub use tasks::TaskApi;
pub use users::UserApi;

#[cfg(test)]
pub(crate) mod testing {
    use crate::client::SaipdClient;
    use crate::config::ClientConfig;
    use crate::http::HttpRequest;
    use crate::session::{Session, SessionUser};

    pub fn client() -> SaipdClient {
        SaipdClient::new(&ClientConfig::default(), Session::in_memory()).unwrap()
    }

    pub fn logged_in_client() -> SaipdClient {
        let client = client();
        let user = SessionUser::synthesized(1, "admin");
        client.session().set_auth(&user, &user.token()).unwrap();
        client
    }

    pub fn query(req: &HttpRequest) -> Vec<(&str, &str)> {
        req.query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    pub fn body(req: &HttpRequest) -> serde_json::Value {
        serde_json::from_str(req.body.as_deref().expect("request has a body")).unwrap()
    }
}
