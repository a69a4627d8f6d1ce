use crate::client::SaipdClient;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::query::{Page, Query};

/// Read-only `/role/*` endpoints. The role list takes no filters.
pub struct RoleApi<'a> {
    client: &'a SaipdClient,
}

impl<'a> RoleApi<'a> {
    pub(crate) fn new(client: &'a SaipdClient) -> Self {
        Self { client }
    }

    pub fn build_list(&self, page: Page) -> Result<HttpRequest, ApiError> {
        self.client.get(&["role", "list"], Query::page(page)?)
    }

    pub fn build_get(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.client.get(&["role", "get", &id.to_string()], Query::new())
    }
}
