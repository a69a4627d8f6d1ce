use crate::client::SaipdClient;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::query::{Page, Query};
use crate::types::{HistoryFilter, HistoryUpdate};

/// `/history/*` endpoints: concrete dated sessions of scheduled exercises.
pub struct HistoryApi<'a> {
    client: &'a SaipdClient,
}

impl<'a> HistoryApi<'a> {
    pub(crate) fn new(client: &'a SaipdClient) -> Self {
        Self { client }
    }

    pub fn build_list(&self, page: Page, filters: &HistoryFilter) -> Result<HttpRequest, ApiError> {
        let query = Query::page(page)?.with_fields(filters)?;
        self.client.get(&["history", "list"], query)
    }

    pub fn build_get(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.client.get(&["history", "get", &id.to_string()], Query::new())
    }

    /// Expand the class's recurring schedule into dated sessions. Whether a
    /// second call duplicates sessions is up to the backend.
    pub fn build_generate(&self, class_id: i64) -> Result<HttpRequest, ApiError> {
        self.client.post_empty(&["history", "generate", &class_id.to_string()], Query::new())
    }

    pub fn build_update(&self, id: i64, update: &HistoryUpdate) -> Result<HttpRequest, ApiError> {
        self.client.post_json(&["history", "update", &id.to_string()], update)
    }
}
