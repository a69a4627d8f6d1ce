use log::debug;

use crate::client::SaipdClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::password::hash_password;
use crate::query::Query;
use crate::session::SessionUser;
use crate::transport::Transport;

/// Login and logout.
///
/// Credentials travel as query parameters on an empty-bodied `POST /auth`,
/// with the password replaced by its MD5 hex digest. The backend answers with
/// the user id only; the session profile is synthesized from it.
pub struct AuthApi<'a> {
    client: &'a SaipdClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a SaipdClient) -> Self {
        Self { client }
    }

    pub fn build_login(&self, login: &str, password: &str) -> Result<HttpRequest, ApiError> {
        let query = Query::new()
            .with("login", login)
            .with("password", hash_password(password));
        self.client.post_empty(&["auth"], query)
    }

    /// User id from a login response. Accepts a bare number or `{"id": n}`.
    pub fn parse_login(&self, response: HttpResponse) -> Result<i64, ApiError> {
        let value = self.client.parse_value(response)?;
        value
            .as_i64()
            .or_else(|| value.get("id").and_then(|id| id.as_i64()))
            .ok_or_else(|| ApiError::Deserialization(format!("login response has no user id: {value}")))
    }

    /// Persist the credential for `id` and return the synthesized profile.
    pub fn complete_login(&self, login: &str, id: i64) -> Result<SessionUser, ApiError> {
        let user = SessionUser::synthesized(id, login);
        self.client.session().set_auth(&user, &user.token())?;
        debug!("logged in as user {id}");
        Ok(user)
    }

    /// Full login round-trip over `transport`. On failure the session is left
    /// as it was.
    pub fn login<T: Transport>(&self, transport: &T, login: &str, password: &str) -> Result<SessionUser, ApiError> {
        let request = self.build_login(login, password)?;
        let id = self.parse_login(transport.send(&request)?)?;
        self.complete_login(login, id)
    }

    pub fn logout(&self) -> Result<(), ApiError> {
        self.client.session().logout()
    }

    pub fn build_get_user(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.client.get(&["user", "get", &id.to_string()], Query::new())
    }
}
