//! Shared HTTP plumbing for both backends.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ApiSettings;
use crate::envelope::{self, Payload};
use crate::error::{ApiError, Result};

/// Thin wrapper over a configured `reqwest::Client` rooted at one base URL.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    client: reqwest::Client,
    base: Url,
}

impl Transport {
    pub(crate) fn new(base_url: &str, settings: &ApiSettings) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .map_err(|e| ApiError::InvalidRequest(format!("bad base URL {base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidRequest(format!(
                "base URL {base_url} cannot carry paths"
            )));
        }
        // Keep a trailing slash so joined paths append instead of replacing.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let agent = HeaderValue::from_str(&settings.user_agent())
            .map_err(|e| ApiError::InvalidRequest(format!("bad user agent: {e}")))?;
        headers.insert(USER_AGENT, agent);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout())
            .build()
            .map_err(|e| ApiError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, base })
    }

    /// Build an absolute URL from path segments and query pairs.
    ///
    /// Segments are percent-encoded individually, so user input such as a set
    /// code can never inject extra path components.
    pub(crate) fn url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidRequest("base URL cannot carry paths".into()))?;
            path.pop_if_empty();
            path.extend(segments);
        }
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// GET an enveloped resource with required `data`.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Payload<T>> {
        let (status, body) = self.send(Method::GET, url, None::<&()>).await?;
        envelope::interpret(status, &body)
    }

    /// GET a resource that is plain JSON rather than enveloped.
    pub(crate) async fn get_plain<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let (status, body) = self.send(Method::GET, url, None::<&()>).await?;
        if !(200..300).contains(&status) {
            return Err(envelope::http_failure(status, &body));
        }
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::MalformedResponse(format!("body is not valid JSON: {e}")))
    }

    /// POST a JSON body to an enveloped endpoint with required `data`.
    pub(crate) async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<Payload<T>> {
        let (status, bytes) = self.send(Method::POST, url, Some(body)).await?;
        envelope::interpret(status, &bytes)
    }

    /// POST a JSON body to an acknowledgement-style endpoint.
    pub(crate) async fn post_ack<B: Serialize>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<Payload<Option<Value>>> {
        let (status, bytes) = self.send(Method::POST, url, Some(body)).await?;
        envelope::interpret_ack(status, &bytes)
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        url: Url,
        body: Option<&B>,
    ) -> Result<(u16, Vec<u8>)> {
        tracing::debug!(%method, %url, "sending request");
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        tracing::debug!(status, bytes = body.len(), "received response");
        Ok((status, body.to_vec()))
    }
}
