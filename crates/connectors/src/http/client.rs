use crate::http::{error::TransportError, token::TokenSource, transport::BatchTransport};
use async_trait::async_trait;
use serde_json::Value as Json;
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};

/// `BatchTransport` over HTTP with bearer authentication.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    token: Arc<dyn TokenSource>,
}

impl HttpTransport {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        token: Arc<dyn TokenSource>,
    ) -> Result<Self, TransportError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(TransportError::InvalidUrl(base_url));
        }

        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpTransport {
            client,
            base_url,
            token,
        })
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl BatchTransport for HttpTransport {
    async fn post_json(&self, path: &str, body: &Json) -> Result<Json, TransportError> {
        let url = self.url_for(path);
        debug!("POST {url}");

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = self.token.bearer_token() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        decode_response(status.as_u16(), status.is_success(), &text).inspect_err(|err| {
            warn!("POST {url} failed: {err}");
        })
    }
}

/// 2xx bodies must be JSON (an empty body reads as `{}`). Non-2xx bodies are
/// passed through when they are JSON so `{ "error": ... }` reaches the caller
/// as an application error.
fn decode_response(status: u16, success: bool, text: &str) -> Result<Json, TransportError> {
    if text.trim().is_empty() {
        return if success {
            Ok(Json::Object(Default::default()))
        } else {
            Err(TransportError::Status {
                status,
                body: String::new(),
            })
        };
    }

    match serde_json::from_str::<Json>(text) {
        Ok(value) if success || value.is_object() => Ok(value),
        Ok(_) => Err(TransportError::Status {
            status,
            body: text.to_string(),
        }),
        Err(e) if success => Err(TransportError::Decode(e.to_string())),
        Err(_) => Err(TransportError::Status {
            status,
            body: text.chars().take(200).collect(),
        }),
    }
}
