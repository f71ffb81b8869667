use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, header};
use tracing::debug;

use crate::{config::HttpSettings, error::QueryError};

/// Issues GET requests and hands back the response body.
///
/// Implementations must be safe to share between concurrent queries.
#[async_trait]
pub trait Transport: Send + Sync + Debug {
    async fn get(&self, url: &str) -> Result<String, QueryError>;
}

/// [`Transport`] backed by a single shared `reqwest` connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, QueryError> {
        Self::from_settings(&HttpSettings::default())
    }

    pub fn from_settings(settings: &HttpSettings) -> Result<Self, QueryError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(settings.user_agent.as_str());
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder.build().map_err(QueryError::Client)?;
        Ok(Self { http })
    }

    /// Wrap an existing client, e.g. one shared with the rest of an application.
    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<String, QueryError> {
        debug!(%url, "GET");

        let res = self.http.get(url).send().await.map_err(|source| QueryError::Network {
            url: url.to_string(),
            source,
        })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| QueryError::Network {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(QueryError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_bodies() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn truncate_cuts_on_char_boundary() {
        let body = "é".repeat(300);
        let cut = truncate_body(&body);

        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }

    #[test]
    fn builds_from_default_settings() {
        assert!(HttpTransport::new().is_ok());
    }
}
