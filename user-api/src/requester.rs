//! The transport seam, and the default implementation of it over `reqwest`.

use crate::credential::{Claim, Credential};
use crate::error::{Error, Result};
use async_trait::async_trait;
use http::Method;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::instrument;

/// Ordered request parameters, already encoded the way the target endpoint expects them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(&'static str, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter, replacing any earlier value under the same key.
    pub fn insert(&mut self, key: &'static str, value: impl ToString) -> &mut Self {
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
        self
    }

    pub fn with(mut self, key: &'static str, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn as_pairs(&self) -> &[(&'static str, String)] {
        &self.0
    }
}

/// A fully composed request, ready for a [`Requester`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub query: Option<Params>,
    pub body: Option<Params>,
}

/// Performs HTTP calls on behalf of the crate.
///
/// Implementations own everything about the transport: connection reuse, TLS, timeouts. They
/// must report failures through the [`Error::Network`], [`Error::Response`] and
/// [`Error::ResponseCode`] variants so callers can tell them apart, and return the application
/// payload with the upstream envelope removed.
#[async_trait]
pub trait Requester: Send + Sync {
    async fn send(&self, request: ApiRequest, credential: &Credential) -> Result<Value>;
}

/// Settings for [`ReqwestRequester`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RequesterConfig {
    pub user_agent: String,
    pub referer: String,
    /// Per-request timeout. `None` leaves it to `reqwest`'s default of no timeout.
    pub timeout_secs: Option<u64>,
}

impl Default for RequesterConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/126.0 Safari/537.36"
                .to_string(),
            referer: "https://www.bilibili.com".to_string(),
            timeout_secs: None,
        }
    }
}

/// The upstream wraps every payload in `{"code": .., "message": .., "data": ..}`.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    code: i64,
    #[serde(default, alias = "msg")]
    message: String,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
}

impl Envelope {
    fn into_payload(self) -> Result<Value> {
        if self.code != 0 {
            return Err(Error::ResponseCode {
                code: self.code,
                message: self.message,
            });
        }
        Ok(self.data.or(self.result).unwrap_or(Value::Null))
    }
}

/// [`Requester`] that talks to the real upstream.
#[derive(Debug, Clone)]
pub struct ReqwestRequester {
    client: reqwest::Client,
    config: RequesterConfig,
}

impl ReqwestRequester {
    pub fn new(config: RequesterConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(Error::HttpClient)?;
        Ok(Self { client, config })
    }

    /// Uses an existing HTTP client, for example one shared with other API clients.
    pub fn with_client(client: reqwest::Client, config: RequesterConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl Requester for ReqwestRequester {
    #[instrument(skip(self, request, credential), fields(method = %request.method, url = %request.url), level = tracing::Level::TRACE)]
    async fn send(&self, request: ApiRequest, credential: &Credential) -> Result<Value> {
        let ApiRequest {
            method,
            url,
            query,
            body,
        } = request;

        let mut builder = self
            .client
            .request(method.clone(), &url)
            .header("Referer", &self.config.referer);

        let cookies = credential
            .cookies()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        if !cookies.is_empty() {
            builder = builder.header("Cookie", cookies);
        }

        if let Some(query) = &query {
            builder = builder.query(query.as_pairs());
        }

        if method != Method::GET {
            let mut form = body.unwrap_or_default();
            if let Some(csrf) = credential.get(Claim::WriteToken) {
                form.insert("csrf", csrf);
            }
            builder = builder.form(form.as_pairs());
        }

        let response = builder.send().await.map_err(|e| Error::Network {
            url: url.clone(),
            source: Box::new(e),
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| Error::Network {
            url: url.clone(),
            source: Box::new(e),
        })?;
        if !status.is_success() {
            return Err(Error::Response {
                status: status.as_u16(),
                url,
                body: text,
            });
        }

        let envelope: Envelope = serde_json::from_str(&text)?;
        tracing::trace!(code = envelope.code, "received response");
        envelope.into_payload()
    }
}
