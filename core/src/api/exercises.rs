use crate::client::SaipdClient;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::query::{Page, Query};
use crate::types::{ExerciseUpdate, NewExercise};

/// `/exercise/*` endpoints. The list takes no filters.
pub struct ExerciseApi<'a> {
    client: &'a SaipdClient,
}

impl<'a> ExerciseApi<'a> {
    pub(crate) fn new(client: &'a SaipdClient) -> Self {
        Self { client }
    }

    pub fn build_list(&self, page: Page) -> Result<HttpRequest, ApiError> {
        self.client.get(&["exercise", "list"], Query::page(page)?)
    }

    pub fn build_get(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.client.get(&["exercise", "get", &id.to_string()], Query::new())
    }

    pub fn build_create(&self, exercise: &NewExercise) -> Result<HttpRequest, ApiError> {
        self.client.post_json(&["exercise", "add"], exercise)
    }

    pub fn build_update(&self, id: i64, update: &ExerciseUpdate) -> Result<HttpRequest, ApiError> {
        self.client.post_json(&["exercise", "update", &id.to_string()], update)
    }

    pub fn build_delete(&self, id: i64) -> Result<HttpRequest, ApiError> {
        self.client.post_empty(&["exercise", "delete", &id.to_string()], Query::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::{body, client, query};
    use crate::http::HttpMethod;

    #[test]
    fn paths_and_verbs() {
        let client = client();
        let exercises = client.exercises();

        let list = exercises.build_list(Page::default()).unwrap();
        assert_eq!(list.path, "http://localhost:8000/exercise/list");
        assert_eq!(query(&list), vec![("skip", "0"), ("limit", "100")]);

        assert_eq!(
            exercises.build_get(3).unwrap().path,
            "http://localhost:8000/exercise/get/3"
        );

        let create = exercises
            .build_create(&NewExercise {
                name: "Scales".to_string(),
                description: Some("C major".to_string()),
            })
            .unwrap();
        assert_eq!(create.method, HttpMethod::Post);
        assert_eq!(create.path, "http://localhost:8000/exercise/add");
        assert_eq!(body(&create)["description"], "C major");

        let update = exercises.build_update(3, &ExerciseUpdate::default()).unwrap();
        assert_eq!(update.method, HttpMethod::Post);
        assert_eq!(update.path, "http://localhost:8000/exercise/update/3");
        assert_eq!(body(&update), serde_json::json!({}));

        let delete = exercises.build_delete(3).unwrap();
        assert_eq!(delete.method, HttpMethod::Post);
        assert_eq!(delete.path, "http://localhost:8000/exercise/delete/3");
        assert!(delete.body.is_none());
    }
}
