//! HTTP client wrapper — the single point of entry for all backend calls.
//!
//! Every request goes through [`ApiClient::execute`]: the session's bearer
//! token is attached when present, cookies ride along, and a 401 response
//! hands control to the refresh coordinator for a single replay. No other
//! module talks to the transport directly.

mod refresh;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::errors::ApiError;
use crate::session::{SessionHandle, SessionStorage};
use refresh::RefreshCoordinator;

/// The one endpoint the interceptor must never try to refresh on behalf of.
pub(crate) const REFRESH_PATH: &str = "/auth/token/refresh";

/// Authenticated HTTP client shared by every store. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    session: SessionHandle,
    refresh: RefreshCoordinator,
}

impl ApiClient {
    pub fn new(config: &Config, storage: Arc<dyn SessionStorage>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        // Validate the base URL once, at construction.
        Url::parse(&config.api_base_url)?;
        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                base_url: config.api_base_url.trim_end_matches('/').to_string(),
                session: SessionHandle::load(storage),
                refresh: RefreshCoordinator::new(),
            }),
        })
    }

    pub fn session(&self) -> &SessionHandle {
        &self.inner.session
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.request(Method::PUT, path)
    }

    pub fn patch(&self, path: &str) -> RequestBuilder {
        self.request(Method::PATCH, path)
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.request(Method::DELETE, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        RequestBuilder {
            client: self.clone(),
            req: ApiRequest {
                method,
                target: Target::Path(path.to_string()),
                query: Vec::new(),
                body: None,
                authenticated: true,
            },
        }
    }

    /// Request against an absolute URL (presigned uploads). No bearer header:
    /// the URL itself carries the authorization.
    pub fn put_absolute(&self, url: &str) -> RequestBuilder {
        RequestBuilder {
            client: self.clone(),
            req: ApiRequest {
                method: Method::PUT,
                target: Target::Absolute(url.to_string()),
                query: Vec::new(),
                body: None,
                authenticated: false,
            },
        }
    }

    /// Runs a request through the interceptor pipeline. A first-time 401 on a
    /// non-refresh call waits for (or triggers) a token refresh, then replays
    /// the request exactly once; everything else passes through unchanged.
    pub(crate) async fn execute(&self, req: ApiRequest) -> Result<ApiResponse, ApiError> {
        let mut retried = false;
        loop {
            let response = self.dispatch(&req).await?;
            if response.status() == StatusCode::UNAUTHORIZED && !retried && !req.is_refresh() {
                retried = true;
                debug!("401 on {}, entering refresh", req.describe());
                self.inner.refresh.wait_for_refresh(&self.inner).await?;
                continue;
            }
            return Ok(ApiResponse(response));
        }
    }

    /// Builds and sends one transport request. The bearer token is read from
    /// the session at dispatch time, so a replay after refresh automatically
    /// carries the renewed token.
    async fn dispatch(&self, req: &ApiRequest) -> Result<reqwest::Response, ApiError> {
        let url = match &req.target {
            Target::Path(path) => format!("{}{}", self.inner.base_url, path),
            Target::Absolute(url) => url.clone(),
        };
        let mut url = Url::parse(&url)?;
        if !req.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &req.query {
                pairs.append_pair(key, value);
            }
        }

        let mut builder = self.inner.http.request(req.method.clone(), url);
        if req.authenticated {
            if let Some(token) = self.inner.session.access_token() {
                builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
            }
        }
        builder = match &req.body {
            Some(ApiBody::Json(value)) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(value.to_string()),
            Some(ApiBody::Bytes { content_type, data }) => builder
                .header(CONTENT_TYPE, content_type.clone())
                .body(data.clone()),
            None => builder,
        };
        Ok(builder.send().await?)
    }
}

enum Target {
    Path(String),
    Absolute(String),
}

/// A buffered request: everything needed to dispatch it again after a token
/// refresh without consulting the caller.
pub(crate) struct ApiRequest {
    method: Method,
    target: Target,
    query: Vec<(String, String)>,
    body: Option<ApiBody>,
    authenticated: bool,
}

impl ApiRequest {
    fn is_refresh(&self) -> bool {
        matches!(&self.target, Target::Path(p) if p == REFRESH_PATH)
    }

    fn describe(&self) -> String {
        match &self.target {
            Target::Path(p) => format!("{} {p}", self.method),
            Target::Absolute(u) => format!("{} {u}", self.method),
        }
    }
}

enum ApiBody {
    Json(Value),
    Bytes { content_type: String, data: Vec<u8> },
}

pub struct RequestBuilder {
    client: ApiClient,
    req: ApiRequest,
}

impl RequestBuilder {
    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.req.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.req.body = Some(ApiBody::Json(body));
        self
    }

    pub fn body_bytes(mut self, content_type: &str, data: Vec<u8>) -> Self {
        self.req.body = Some(ApiBody::Bytes {
            content_type: content_type.to_string(),
            data,
        });
        self
    }

    pub async fn send(self) -> Result<ApiResponse, ApiError> {
        self.client.execute(self.req).await
    }
}

/// Response wrapper. Non-success statuses are NOT turned into errors here;
/// stores inspect `status()` or opt in via `error_for_status`, mirroring the
/// pass-through contract of the interceptor.
#[derive(Debug)]
pub struct ApiResponse(reqwest::Response);

impl ApiResponse {
    pub fn status(&self) -> StatusCode {
        self.0.status()
    }

    /// Converts a non-2xx status into `ApiError::Api` carrying the body text.
    pub async fn error_for_status(self) -> Result<ApiResponse, ApiError> {
        let status = self.0.status();
        if status.is_success() {
            return Ok(self);
        }
        let message = self.0.text().await.unwrap_or_default();
        Err(ApiError::Api {
            status: status.as_u16(),
            message,
        })
    }

    /// Checks the status, then decodes the body.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        let response = self.error_for_status().await?;
        let text = response.0.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn text(self) -> Result<String, ApiError> {
        let response = self.error_for_status().await?;
        Ok(response.0.text().await?)
    }
}
