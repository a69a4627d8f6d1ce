use crate::client::SaipdClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::query::{Page, Query};
use crate::types::{AttendanceFilter, AttendanceMark, AttendanceStatus, AttendanceUpdate};

/// `/attend/*` endpoints.
///
/// Besides record-level CRUD, attendance has convenience endpoints addressed
/// by (session, user) for the three common statuses, and a bulk `generate`
/// that creates one row per enrolled user of a session.
pub struct AttendanceApi<'a> {
    client: &'a SaipdClient,
}

impl<'a> AttendanceApi<'a> {
    pub(crate) fn new(client: &'a SaipdClient) -> Self {
        Self { client }
    }

    pub fn build_list(&self, page: Page, filters: &AttendanceFilter) -> Result<HttpRequest, ApiError> {
        let query = Query::page(page)?.with_fields(filters)?;
        self.client.get(&["attend", "list"], query)
    }

    pub fn build_get(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.client.get(&["attend", "get", &id.to_string()], Query::new())
    }

    pub fn build_mark(&self, history_id: i64, mark: &AttendanceMark) -> Result<HttpRequest, ApiError> {
        self.client.post_json(&["attend", "mark", &history_id.to_string()], mark)
    }

    pub fn build_update(&self, id: i64, update: &AttendanceUpdate) -> Result<HttpRequest, ApiError> {
        self.client.post_json(&["attend", "update", &id.to_string()], update)
    }

    /// Create missing rows for every enrolled user of `history_id`. With
    /// `force`, existing rows are reset too.
    pub fn build_generate(&self, history_id: i64, force: bool) -> Result<HttpRequest, ApiError> {
        let query = Query::new().with("force", force);
        self.client.get(&["attend", &history_id.to_string(), "generate"], query)
    }

    /// Number of rows the generate call created or updated.
    pub fn parse_generate(&self, response: HttpResponse) -> Result<u64, ApiError> {
        let value = self.client.parse_value(response)?;
        value
            .as_u64()
            .or_else(|| value.get("count").and_then(|c| c.as_u64()))
            .ok_or_else(|| ApiError::Deserialization(format!("generate response is not a count: {value}")))
    }

    pub fn build_present(&self, history_id: i64, user_id: i64, force: bool) -> Result<HttpRequest, ApiError> {
        self.convenience(history_id, user_id, "present", force)
    }

    pub fn build_absent(&self, history_id: i64, user_id: i64, force: bool) -> Result<HttpRequest, ApiError> {
        self.convenience(history_id, user_id, "absent", force)
    }

    pub fn build_late(&self, history_id: i64, user_id: i64, force: bool) -> Result<HttpRequest, ApiError> {
        self.convenience(history_id, user_id, "late", force)
    }

    /// Convenience endpoint for `status`. Statuses without one (e.g.
    /// `excused`) fail with `UnsupportedStatus`; use `build_apply_status` or
    /// `build_update` for those.
    pub fn build_set_status_for_user(
        &self,
        history_id: i64,
        user_id: i64,
        status: &AttendanceStatus,
        force: bool,
    ) -> Result<HttpRequest, ApiError> {
        let segment = status
            .convenience_segment()
            .ok_or_else(|| ApiError::UnsupportedStatus(status.to_string()))?;
        self.convenience(history_id, user_id, segment, force)
    }

    /// Route `status` to its convenience endpoint when one exists, otherwise
    /// to `update` on the existing record `record_id`.
    pub fn build_apply_status(
        &self,
        record_id: i64,
        history_id: i64,
        user_id: i64,
        status: &AttendanceStatus,
        force: bool,
    ) -> Result<HttpRequest, ApiError> {
        match status.convenience_segment() {
            Some(segment) => self.convenience(history_id, user_id, segment, force),
            None => self.build_update(
                record_id,
                &AttendanceUpdate {
                    status: Some(status.clone()),
                    note: None,
                },
            ),
        }
    }

    fn convenience(&self, history_id: i64, user_id: i64, segment: &str, force: bool) -> Result<HttpRequest, ApiError> {
        let query = Query::new().with("force", force);
        self.client
            .get(&["attend", &history_id.to_string(), &user_id.to_string(), segment], query)
    }
}
