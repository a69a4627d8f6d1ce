//! Route handlers, one module per resource.

pub mod attendance;
pub mod classes;
pub mod exercises;
pub mod grades;
pub mod history;
pub mod messages;
pub mod roles;
pub mod tasks;
pub mod users;

use serde::Deserialize;

fn default_limit() -> usize {
    100
}

/// `skip`/`limit` shared by every list route.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl PageQuery {
    pub fn apply<'a, T, I>(&self, items: I) -> Vec<T>
    where
        T: Clone + 'a,
        I: Iterator<Item = &'a T>,
    {
        items.skip(self.skip).take(self.limit).cloned().collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct ForceQuery {
    #[serde(default)]
    pub force: bool,
}

pub(crate) fn filter_hit<T: PartialEq>(filter: &Option<T>, value: &T) -> bool {
    filter.as_ref().is_none_or(|f| f == value)
}
