//! Typed API-access layer for the SAiPD school management backend.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values for every
//! backend resource (auth, users, roles, classes, exercises, exercise
//! history, attendance, grades, tasks, messages). The facade itself performs
//! no I/O; a `Transport` such as `UreqTransport` executes requests.
//!
//! # Design
//! - `SaipdClient` holds only the base origin, the class-route setting and an
//!   injected `Session`; the bearer token is read from the session store each
//!   time a request is built.
//! - Each operation is a `build_*` method on a per-resource grouping
//!   (`client.users()`, `client.attendance()`, ...). Responses come back as
//!   raw JSON through `parse_value` / `parse_json`.
//! - Parameters are typed per endpoint; caller misuse is rejected while
//!   building, before any request exists.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod password;
pub mod query;
pub mod session;
pub mod transport;
pub mod types;

pub use client::SaipdClient;
pub use config::{ClassGetRoute, ClientConfig};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use password::hash_password;
pub use query::Page;
pub use session::{FileStore, MemoryStore, Session, SessionStore, SessionUser};
pub use transport::{Transport, UreqTransport};
pub use types::*;
