use crate::client::SaipdClient;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::query::{Page, Query};
use crate::types::{NewUser, UserFilter, UserUpdate};

/// `/user/*` endpoints.
pub struct UserApi<'a> {
    client: &'a SaipdClient,
}

impl<'a> UserApi<'a> {
    pub(crate) fn new(client: &'a SaipdClient) -> Self {
        Self { client }
    }

    pub fn build_list(&self, page: Page, filters: &UserFilter) -> Result<HttpRequest, ApiError> {
        let query = Query::page(page)?.with_fields(filters)?;
        self.client.get(&["user", "list"], query)
    }

    pub fn build_get(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.client.get(&["user", "get", &id.to_string()], Query::new())
    }

    pub fn build_add(&self, user: &NewUser) -> Result<HttpRequest, ApiError> {
        self.client.post_json(&["user", "add"], user)
    }

    pub fn build_update(&self, id: i64, update: &UserUpdate) -> Result<HttpRequest, ApiError> {
        self.client.post_json(&["user", "update", &id.to_string()], update)
    }

    pub fn build_add_role(&self, user_id: i64, role_id: i64) -> Result<HttpRequest, ApiError> {
        let query = Query::new().with("role_id", role_id);
        self.client.post_empty(&["user", "add_role", &user_id.to_string()], query)
    }

    pub fn build_remove_role(&self, user_id: i64, role_id: i64) -> Result<HttpRequest, ApiError> {
        let query = Query::new().with("role_id", role_id);
        self.client.post_empty(&["user", "remove_role", &user_id.to_string()], query)
    }

    pub fn build_deactivate(&self, user_id: i64) -> Result<HttpRequest, ApiError> {
        self.client.post_empty(&["user", "deactivate", &user_id.to_string()], Query::new())
    }

    pub fn build_activate(&self, user_id: i64) -> Result<HttpRequest, ApiError> {
        self.client.post_empty(&["user", "activate", &user_id.to_string()], Query::new())
    }
}
