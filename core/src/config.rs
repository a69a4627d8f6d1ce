//! Client configuration.

use std::env;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

pub const ENV_BASE_URL: &str = "SAIPD_API_BASE";
pub const ENV_CLASS_GET_ROUTE: &str = "SAIPD_CLASS_GET_ROUTE";

/// Path shape used to fetch a single class.
///
/// Backend revisions disagree: older ones serve `/class/get/{id}`, newer ones
/// `/class/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassGetRoute {
    /// `/class/{id}`
    #[default]
    Bare,
    /// `/class/get/{id}`
    Prefixed,
}

impl std::str::FromStr for ClassGetRoute {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bare" => Ok(ClassGetRoute::Bare),
            "get" | "prefixed" => Ok(ClassGetRoute::Prefixed),
            other => Err(ApiError::Config(format!(
                "{ENV_CLASS_GET_ROUTE} must be `bare` or `get`, got `{other}`"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub class_get_route: ClassGetRoute,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            class_get_route: ClassGetRoute::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_class_get_route(mut self, route: ClassGetRoute) -> Self {
        self.class_get_route = route;
        self
    }

    /// Read `SAIPD_API_BASE` and `SAIPD_CLASS_GET_ROUTE`, falling back to
    /// defaults for unset variables.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(base) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            config.base_url = base.trim().to_string();
        }
        if let Some(route) = lookup(ENV_CLASS_GET_ROUTE) {
            config.class_get_route = route.parse()?;
        }
        Ok(config)
    }
}
