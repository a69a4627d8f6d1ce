use crate::client::SaipdClient;
use crate::config::ClassGetRoute;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::query::{Page, Query};
use crate::types::{ClassExerciseSchedule, ClassFilter, ClassUpdate, NewClass};

/// `/class/*` endpoints, including user enrolment and the recurring
/// exercise schedule.
pub struct ClassApi<'a> {
    client: &'a SaipdClient,
}

impl<'a> ClassApi<'a> {
    pub(crate) fn new(client: &'a SaipdClient) -> Self {
        Self { client }
    }

    pub fn build_list(&self, page: Page, filters: &ClassFilter) -> Result<HttpRequest, ApiError> {
        let query = Query::page(page)?.with_fields(filters)?;
        self.client.get(&["class", "list"], query)
    }

    /// Path follows `ClientConfig::class_get_route`.
    pub fn build_get(&self, id: i64) -> Result<HttpRequest, ApiError> {
        let id = id.to_string();
        match self.client.class_get_route() {
            ClassGetRoute::Bare => self.client.get(&["class", &id], Query::new()),
            ClassGetRoute::Prefixed => self.client.get(&["class", "get", &id], Query::new()),
        }
    }

    pub fn build_create(&self, class: &NewClass) -> Result<HttpRequest, ApiError> {
        self.client.post_json(&["class", "add"], class)
    }

    pub fn build_update(&self, id: i64, update: &ClassUpdate) -> Result<HttpRequest, ApiError> {
        self.client.post_json(&["class", "update", &id.to_string()], update)
    }

    pub fn build_remove(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.client.post_empty(&["class", "remove", &id.to_string()], Query::new())
    }

    pub fn build_add_user(&self, class_id: i64, user_id: i64) -> Result<HttpRequest, ApiError> {
        let query = Query::new().with("user_id", user_id);
        self.client.post_empty(&["class", "add_user", &class_id.to_string()], query)
    }

    pub fn build_remove_user(&self, class_id: i64, user_id: i64) -> Result<HttpRequest, ApiError> {
        let query = Query::new().with("user_id", user_id);
        self.client.post_empty(&["class", "remove_user", &class_id.to_string()], query)
    }

    /// Schedule `exercise_id` in the class. The schedule goes in the query
    /// string, in a fixed order, with no request body.
    pub fn build_add_exercise(
        &self,
        class_id: i64,
        exercise_id: i64,
        schedule: &ClassExerciseSchedule,
    ) -> Result<HttpRequest, ApiError> {
        if schedule.day_of_week > 6 {
            return Err(ApiError::InvalidArgument(format!(
                "day_of_week must be 0..=6, got {}",
                schedule.day_of_week
            )));
        }
        if schedule.week_interval == Some(0) {
            return Err(ApiError::InvalidArgument("week_interval must be positive".to_string()));
        }
        let query = Query::new()
            .with("exercise_id", exercise_id)
            .with("teacher_id", schedule.teacher_id)
            .with("day_of_week", schedule.day_of_week)
            .with("time_of_exercise", &schedule.time_of_exercise)
            .with_opt("week_interval", schedule.week_interval)
            .with_opt("week_offset", schedule.week_offset);
        self.client.post_empty(&["class", "add_exercise", &class_id.to_string()], query)
    }

    /// Unschedule by class-exercise link id (not by exercise id).
    pub fn build_remove_exercise(&self, class_exercise_id: i64) -> Result<HttpRequest, ApiError> {
        self.client.post_empty(&["class", "remove_exercise", &class_exercise_id.to_string()], Query::new())
    }

    pub fn build_deactivate(&self, class_id: i64) -> Result<HttpRequest, ApiError> {
        self.client.post_empty(&["class", "deactivate", &class_id.to_string()], Query::new())
    }

    pub fn build_activate(&self, class_id: i64) -> Result<HttpRequest, ApiError> {
        self.client.post_empty(&["class", "activate", &class_id.to_string()], Query::new())
    }
}
