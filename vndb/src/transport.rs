use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::errors::{VndbError, VndbResult};
use crate::query::{QueryBody, QueryResponse};

/// One POST per query against the data service
#[async_trait]
pub trait VndbTransport: Send + Sync {
    async fn post_query(&self, endpoint: &str, body: &QueryBody) -> VndbResult<QueryResponse>;
}

/// reqwest-backed transport for the public Kana API
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> VndbResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }
}

#[async_trait]
impl VndbTransport for HttpTransport {
    async fn post_query(&self, endpoint: &str, body: &QueryBody) -> VndbResult<QueryResponse> {
        let url = self.url(endpoint);
        debug!(%url, fields = %body.fields, results = body.results, "POST VNDB query");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| VndbError::RequestError(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VndbError::HttpError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<QueryResponse>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url() {
        let transport = HttpTransport::new("https://api.vndb.org/kana/", None).unwrap();
        assert_eq!(transport.url("vn"), "https://api.vndb.org/kana/vn");
    }
}
