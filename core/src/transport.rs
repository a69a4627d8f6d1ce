//! Executing built requests over the network.
//!
//! # Design
//! `Transport` is the seam between the I/O-free facade and a real HTTP
//! stack. Implementations return every HTTP response as data, error statuses
//! included; only a missing response is an `Err`. Status interpretation stays
//! with `SaipdClient::check`. No retries, caching or timeouts are layered on
//! top of what the underlying agent does.

use log::trace;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

pub trait Transport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport backed by a `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    /// Run the request on tokio's blocking pool. Independent calls may be
    /// awaited concurrently; their completion order is unspecified.
    pub async fn send_async(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = self.agent.clone();
        tokio::task::spawn_blocking(move || execute(&agent, &request))
            .await
            .map_err(|e| ApiError::Transport(format!("dispatch task failed: {e}")))?
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        execute(&self.agent, request)
    }
}

fn execute(agent: &ureq::Agent, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
    let url = request.url();
    trace!("sending {} {}", request.method.as_str(), request.path);

    let result = match request.method {
        HttpMethod::Get => {
            let mut builder = agent.get(url.as_str());
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        HttpMethod::Delete => {
            let mut builder = agent.delete(url.as_str());
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        HttpMethod::Post | HttpMethod::Put => {
            let mut builder = if request.method == HttpMethod::Post {
                agent.post(url.as_str())
            } else {
                agent.put(url.as_str())
            };
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            match &request.body {
                Some(body) => builder.send(body.as_bytes()),
                None => builder.send_empty(),
            }
        }
    };

    let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::Transport(format!("reading response body: {e}")))?;

    Ok(HttpResponse { status, headers, body })
}
