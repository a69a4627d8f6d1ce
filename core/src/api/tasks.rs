use crate::client::SaipdClient;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::query::{Page, Query};
use crate::types::{NewTask, TaskFilter, TaskUpdate};

/// REST-style `/task/` endpoints.
pub struct TaskApi<'a> {
    client: &'a SaipdClient,
}

impl<'a> TaskApi<'a> {
    pub(crate) fn new(client: &'a SaipdClient) -> Self {
        Self { client }
    }

    pub fn build_list(&self, page: Page, filters: &TaskFilter) -> Result<HttpRequest, ApiError> {
        let query = Query::page(page)?.with_fields(filters)?;
        self.client.get(&["task", ""], query)
    }

    pub fn build_get(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.client.get(&["task", &id.to_string()], Query::new())
    }

    pub fn build_create(&self, task: &NewTask) -> Result<HttpRequest, ApiError> {
        self.client.post_json(&["task", ""], task)
    }

    pub fn build_update(&self, id: i64, update: &TaskUpdate) -> Result<HttpRequest, ApiError> {
        self.client.put_json(&["task", &id.to_string()], update)
    }

    pub fn build_update_status(&self, id: i64, status: &str) -> Result<HttpRequest, ApiError> {
        if status.trim().is_empty() {
            return Err(ApiError::InvalidArgument("task status must not be empty".to_string()));
        }
        self.client.put_empty(&["task", &id.to_string(), "status", status])
    }

    pub fn build_delete(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.client.delete(&["task", &id.to_string()])
    }
}
