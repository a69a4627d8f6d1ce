use crate::client::SaipdClient;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::query::{Page, Query};
use crate::types::{GradeFilter, GradeUpdate, NewGrade};

/// REST-style `/grade/` endpoints.
pub struct GradeApi<'a> {
    client: &'a SaipdClient,
}

impl<'a> GradeApi<'a> {
    pub(crate) fn new(client: &'a SaipdClient) -> Self {
        Self { client }
    }

    pub fn build_list(&self, page: Page, filters: &GradeFilter) -> Result<HttpRequest, ApiError> {
        let query = Query::page(page)?.with_fields(filters)?;
        self.client.get(&["grade", ""], query)
    }

    pub fn build_get(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.client.get(&["grade", &id.to_string()], Query::new())
    }

    /// Create or upsert.
    pub fn build_create(&self, grade: &NewGrade) -> Result<HttpRequest, ApiError> {
        self.client.post_json(&["grade", ""], grade)
    }

    pub fn build_update(&self, id: i64, update: &GradeUpdate) -> Result<HttpRequest, ApiError> {
        self.client.put_json(&["grade", &id.to_string()], update)
    }

    pub fn build_delete(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.client.delete(&["grade", &id.to_string()])
    }
}
