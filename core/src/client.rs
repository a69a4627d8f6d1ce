//! Request builder and response parser for the SAiPD backend.
//!
//! # Design
//! `SaipdClient` holds the base origin, the class-route setting and a
//! `Session` handle. Every request goes through `request`, which stamps the
//! default content type and, if the session holds a token at that moment,
//! the bearer header. The token is read from the session store on every
//! call and never cached.
//!
//! Resource groupings (`users()`, `classes()`, ...) are thin borrowed views
//! over the client; they only decide verb, path and parameters.

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::api::{
    AttendanceApi, AuthApi, ClassApi, ExerciseApi, GradeApi, HistoryApi, MessageApi, RoleApi, TaskApi, UserApi,
};
use crate::config::{ClassGetRoute, ClientConfig};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::Query;
use crate::session::Session;

pub const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Debug, Clone)]
pub struct SaipdClient {
    base: Url,
    class_get_route: ClassGetRoute,
    session: Session,
}

impl SaipdClient {
    pub fn new(config: &ClientConfig, session: Session) -> Result<Self, ApiError> {
        let base = Url::parse(config.base_url.trim())
            .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;
        if base.cannot_be_a_base() || !matches!(base.scheme(), "http" | "https") {
            return Err(ApiError::InvalidBaseUrl(config.base_url.clone()));
        }
        Ok(Self {
            base,
            class_get_route: config.class_get_route,
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub(crate) fn class_get_route(&self) -> ClassGetRoute {
        self.class_get_route
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn users(&self) -> UserApi<'_> {
        UserApi::new(self)
    }

    pub fn roles(&self) -> RoleApi<'_> {
        RoleApi::new(self)
    }

    pub fn classes(&self) -> ClassApi<'_> {
        ClassApi::new(self)
    }

    pub fn exercises(&self) -> ExerciseApi<'_> {
        ExerciseApi::new(self)
    }

    pub fn history(&self) -> HistoryApi<'_> {
        HistoryApi::new(self)
    }

    pub fn attendance(&self) -> AttendanceApi<'_> {
        AttendanceApi::new(self)
    }

    pub fn grades(&self) -> GradeApi<'_> {
        GradeApi::new(self)
    }

    pub fn tasks(&self) -> TaskApi<'_> {
        TaskApi::new(self)
    }

    pub fn messages(&self) -> MessageApi<'_> {
        MessageApi::new(self)
    }

    // -----------------------------------------------------------------------
    // Request building
    // -----------------------------------------------------------------------

    /// Absolute URL for `segments` under the base origin. Segments are
    /// percent-encoded; an empty trailing segment yields a trailing slash.
    /// `.` and `..` are rejected since the URL parser would drop them.
    fn endpoint(&self, segments: &[&str]) -> Result<String, ApiError> {
        if let Some(dot) = segments.iter().find(|s| matches!(**s, "." | "..")) {
            return Err(ApiError::InvalidArgument(format!("path segment `{dot}` is not allowed")));
        }
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        url.set_query(None);
        Ok(url.into())
    }

    pub(crate) fn request(
        &self,
        method: HttpMethod,
        segments: &[&str],
        query: Query,
        body: Option<String>,
    ) -> Result<HttpRequest, ApiError> {
        let path = self.endpoint(segments)?;
        let mut headers = vec![("content-type".to_string(), CONTENT_TYPE_JSON.to_string())];
        if let Some(token) = self.session.token()? {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        debug!("built {} {path}", method.as_str());
        Ok(HttpRequest {
            method,
            path,
            query: query.into_pairs(),
            headers,
            body,
        })
    }

    pub(crate) fn get(&self, segments: &[&str], query: Query) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Get, segments, query, None)
    }

    pub(crate) fn post_empty(&self, segments: &[&str], query: Query) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Post, segments, query, None)
    }

    pub(crate) fn post_json<T: Serialize>(&self, segments: &[&str], payload: &T) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Post, segments, Query::new(), Some(to_json(payload)?))
    }

    pub(crate) fn put_json<T: Serialize>(&self, segments: &[&str], payload: &T) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Put, segments, Query::new(), Some(to_json(payload)?))
    }

    pub(crate) fn put_empty(&self, segments: &[&str]) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Put, segments, Query::new(), None)
    }

    pub(crate) fn delete(&self, segments: &[&str]) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Delete, segments, Query::new(), None)
    }

    // -----------------------------------------------------------------------
    // Response parsing
    // -----------------------------------------------------------------------

    /// Pass 2xx responses through, turn anything else into `ApiError::Http`
    /// with the body untouched.
    pub fn check(&self, response: HttpResponse) -> Result<HttpResponse, ApiError> {
        if response.is_success() {
            return Ok(response);
        }
        warn!("backend answered HTTP {}", response.status);
        Err(ApiError::Http {
            status: response.status,
            body: response.body,
        })
    }

    pub fn parse_json<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        let response = self.check(response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// Raw JSON body. An empty 2xx body reads as `null`.
    pub fn parse_value(&self, response: HttpResponse) -> Result<serde_json::Value, ApiError> {
        let response = self.check(response)?;
        if response.body.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn parse_empty(&self, response: HttpResponse) -> Result<(), ApiError> {
        self.check(response).map(|_| ())
    }
}

fn to_json<T: Serialize>(payload: &T) -> Result<String, ApiError> {
    serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))
}
