//! Query-string shaping: pagination plus typed filter structs flattened into
//! string pairs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

pub const DEFAULT_LIMIT: u32 = 100;

/// Offset pagination shared by every list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Page {
    pub skip: u32,
    pub limit: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Page {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }

    pub(crate) fn validate(&self) -> Result<(), ApiError> {
        if self.limit == 0 {
            return Err(ApiError::InvalidArgument("limit must be positive".to_string()));
        }
        Ok(())
    }
}

/// Ordered query pairs for one request.
#[derive(Debug, Default)]
pub(crate) struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(page: Page) -> Result<Self, ApiError> {
        page.validate()?;
        Ok(Self::new().with("skip", page.skip).with("limit", page.limit))
    }

    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_opt(self, key: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.with(key, v),
            None => self,
        }
    }

    /// Append every populated field of `filters`. Unset (`None`) fields are
    /// left out entirely.
    pub fn with_fields<T: Serialize>(mut self, filters: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(filters).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let Value::Object(map) = value else {
            return Err(ApiError::InvalidArgument(
                "query fields must serialize to an object".to_string(),
            ));
        };
        for (key, value) in map {
            let rendered = match value {
                Value::Null => continue,
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(ApiError::InvalidArgument(format!(
                        "query field `{key}` is not a scalar: {other}"
                    )))
                }
            };
            self.pairs.push((key, rendered));
        }
        Ok(self)
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }
}
