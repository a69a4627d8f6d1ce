use crate::client::SaipdClient;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::query::{Page, Query};
use crate::types::{MessageFilter, NewMessage};

/// `/msg/` endpoints. Messages cannot be edited once sent.
pub struct MessageApi<'a> {
    client: &'a SaipdClient,
}

impl<'a> MessageApi<'a> {
    pub(crate) fn new(client: &'a SaipdClient) -> Self {
        Self { client }
    }

    pub fn build_list(&self, page: Page, filters: &MessageFilter) -> Result<HttpRequest, ApiError> {
        let query = Query::page(page)?.with_fields(filters)?;
        self.client.get(&["msg", ""], query)
    }

    pub fn build_get(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.client.get(&["msg", &id.to_string()], Query::new())
    }

    pub fn build_create(&self, message: &NewMessage) -> Result<HttpRequest, ApiError> {
        self.client.post_json(&["msg", ""], message)
    }

    pub fn build_delete(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.client.delete(&["msg", &id.to_string()])
    }
}
