use std::{sync::Arc, time::Instant};

use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::{EventId, PropertyId, TenantId, TenantStatus},
    error::ApiError,
    protocol::{
        BriefResponse, EventDetailResponse, Evidence, HealthStatus, Property, SearchResponse,
        Tenant, TenantDetailResponse,
    },
};
use tracing::debug;
use url::Url;

pub mod cancel;
pub mod config;
pub mod error;
pub mod identity;

pub use cancel::CancelToken;
pub use config::{load_settings, ClientSettings};
pub use error::{ClientError, ClientResult};
pub use identity::{AnonymousIdentity, CallerIdentity, DemoIdentity, IdentityProvider};

const API_ROOT_SEGMENTS: [&str; 2] = ["api", "v1"];

/// Per-request extras layered on top of the defaults.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    headers: HeaderMap,
    body: Option<serde_json::Value>,
    cancel: Option<CancelToken>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Caller headers are merged last and replace identity headers of the same name.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn json_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn cancel_on(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// One accessor per remote resource.
#[async_trait]
pub trait OversightApi: Send + Sync {
    async fn get_brief(&self, as_of: Option<NaiveDate>) -> ClientResult<BriefResponse>;
    async fn get_tenants(&self, status: Option<TenantStatus>) -> ClientResult<Vec<Tenant>>;
    async fn get_tenant(&self, id: &TenantId) -> ClientResult<TenantDetailResponse>;
    async fn get_event(&self, id: &EventId) -> ClientResult<EventDetailResponse>;
    async fn get_event_evidence(&self, id: &EventId) -> ClientResult<Vec<Evidence>>;
    async fn get_properties(&self) -> ClientResult<Vec<Property>>;
    async fn get_property(&self, id: &PropertyId) -> ClientResult<Property>;
    async fn search(&self, query: &str) -> ClientResult<SearchResponse>;
    async fn health(&self) -> ClientResult<HealthStatus>;
}

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    identity: Arc<dyn IdentityProvider>,
    cancel: Option<CancelToken>,
}

impl ApiClient {
    pub fn new(base_url: Url, identity: Arc<dyn IdentityProvider>) -> Self {
        Self::with_http_client(Client::new(), base_url, identity)
    }

    pub fn with_http_client(
        http: Client,
        base_url: Url,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            http,
            base_url,
            identity,
            cancel: None,
        }
    }

    pub fn from_settings(
        settings: &ClientSettings,
        identity: Arc<dyn IdentityProvider>,
    ) -> anyhow::Result<Self> {
        let base_url = settings.base_url()?;
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()
            .context("failed to build http client")?;
        Ok(Self::with_http_client(http, base_url, identity))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// A view of this client whose every request is abandoned once `token` fires.
    pub fn with_cancel(&self, token: CancelToken) -> Self {
        Self {
            cancel: Some(token),
            ..self.clone()
        }
    }

    /// Builds `{base}/api/v1/{segments..}?{query}`. Segments are percent-encoded
    /// individually; an empty query leaves no `?` behind.
    pub fn endpoint_url(&self, segments: &[&str], query: &[(&str, &str)]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ClientError::InvalidUrl {
                    url: self.base_url.to_string(),
                    source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
                })?;
            path.pop_if_empty();
            path.extend(API_ROOT_SEGMENTS.iter().chain(segments.iter()));
        }
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter());
        }
        Ok(url)
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, &str)],
        options: RequestOptions,
    ) -> ClientResult<T> {
        let url = self.endpoint_url(segments, query)?;
        let RequestOptions {
            headers,
            body,
            cancel,
        } = options;
        let exchange = self.dispatch(method, url, headers, body);
        match cancel.or_else(|| self.cancel.clone()) {
            Some(token) => token.run(exchange).await,
            None => exchange.await,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> ClientResult<T> {
        self.request(Method::GET, segments, query, RequestOptions::default())
            .await
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        extra_headers: HeaderMap,
        body: Option<serde_json::Value>,
    ) -> ClientResult<T> {
        // Identity is read here, at dispatch, never earlier.
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.extend(self.identity.identity_headers().await?);
        headers.extend(extra_headers);

        debug!(method = %method, url = %url, "api: dispatching request");
        let started = Instant::now();

        let mut builder = self.http.request(method.clone(), url.clone()).headers(headers);
        if let Some(body) = body {
            builder = builder.json(&body);
        }
        let res = builder.send().await.map_err(ClientError::Transport)?;
        let status = res.status();

        debug!(
            method = %method,
            url = %url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "api: response received"
        );

        if !status.is_success() {
            let body = res.bytes().await.unwrap_or_default();
            return Err(ApiError::from_body(status.as_u16(), &body).into());
        }

        let bytes = res.bytes().await.map_err(ClientError::Transport)?;
        serde_json::from_slice(&bytes).map_err(ClientError::Decode)
    }
}

#[async_trait]
impl OversightApi for ApiClient {
    async fn get_brief(&self, as_of: Option<NaiveDate>) -> ClientResult<BriefResponse> {
        let as_of = as_of.map(|date| date.format("%Y-%m-%d").to_string());
        let query = optional_query("as_of_date", as_of.as_deref());
        self.get(&["brief"], &query).await
    }

    async fn get_tenants(&self, status: Option<TenantStatus>) -> ClientResult<Vec<Tenant>> {
        let query = optional_query("status", status.map(TenantStatus::as_str));
        self.get(&["tenants"], &query).await
    }

    async fn get_tenant(&self, id: &TenantId) -> ClientResult<TenantDetailResponse> {
        self.get(&["tenants", id.as_str()], &[]).await
    }

    async fn get_event(&self, id: &EventId) -> ClientResult<EventDetailResponse> {
        self.get(&["events", id.as_str()], &[]).await
    }

    async fn get_event_evidence(&self, id: &EventId) -> ClientResult<Vec<Evidence>> {
        self.get(&["events", id.as_str(), "evidence"], &[]).await
    }

    async fn get_properties(&self) -> ClientResult<Vec<Property>> {
        self.get(&["properties"], &[]).await
    }

    async fn get_property(&self, id: &PropertyId) -> ClientResult<Property> {
        self.get(&["properties", id.as_str()], &[]).await
    }

    async fn search(&self, query: &str) -> ClientResult<SearchResponse> {
        self.get(&["search"], &[("q", query)]).await
    }

    /// Served at the upstream root, outside `/api/v1`.
    async fn health(&self) -> ClientResult<HealthStatus> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl {
                url: self.base_url.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .pop_if_empty()
            .push("health");
        let exchange = self.dispatch(Method::GET, url, HeaderMap::new(), None);
        match &self.cancel {
            Some(token) => token.run(exchange).await,
            None => exchange.await,
        }
    }
}

fn optional_query<'a>(key: &'a str, value: Option<&'a str>) -> Vec<(&'a str, &'a str)> {
    value
        .filter(|value| !value.is_empty())
        .map(|value| vec![(key, value)])
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
