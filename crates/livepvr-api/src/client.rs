//! `LivePvrClient` - Live PVR Data API client implementation.

use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::Serialize;
use tracing::instrument;
use url::Url;

use crate::api::LocalLivePvrApi;
use crate::request::{EventsRequest, OverrideRequest, StatusRequest};
use crate::response::{
    EventsResponse, Response, SimpleResponse, StatusResponse, SuccessShape, classify,
};
use crate::signer::Credentials;

/// Default base URL of the production service.
pub const DEFAULT_BASE_URL: &str = "http://www.livepvrdata.com/";

/// Default User-Agent; applications should set their own.
pub const DEFAULT_USER_AGENT: &str = concat!("livepvr-api/", env!("CARGO_PKG_VERSION"));

/// Maximum number of body bytes logged at trace level.
const BODY_PREVIEW_LEN: usize = 500;

/// Service endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// Single event status query.
    Status,
    /// Event listing for a type and date.
    Events,
    /// Override map submission.
    Override,
}

impl Endpoint {
    /// Default path relative to the base URL.
    #[must_use]
    pub const fn default_path(self) -> &'static str {
        match self {
            Self::Status => "api/qryStatus",
            Self::Events => "api/qryEvents",
            Self::Override => "api/override",
        }
    }

    /// Name used in logs and error messages.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Status => "qryStatus",
            Self::Events => "qryEvents",
            Self::Override => "override",
        }
    }
}

/// Endpoint paths of one service deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EndpointPaths {
    status: String,
    events: String,
    override_map: String,
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            status: String::from(Endpoint::Status.default_path()),
            events: String::from(Endpoint::Events.default_path()),
            override_map: String::from(Endpoint::Override.default_path()),
        }
    }
}

impl EndpointPaths {
    fn get(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Status => &self.status,
            Endpoint::Events => &self.events,
            Endpoint::Override => &self.override_map,
        }
    }

    fn set(&mut self, endpoint: Endpoint, path: String) {
        match endpoint {
            Endpoint::Status => self.status = path,
            Endpoint::Events => self.events = path,
            Endpoint::Override => self.override_map = path,
        }
    }
}

/// Live PVR Data API client.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct LivePvrClient {
    /// HTTP client.
    http_client: Client,
    /// Base URL, always ending in `/`.
    base_url: Url,
    /// Signing credentials; requests go out unsigned without them.
    credentials: Option<Credentials>,
    /// Endpoint paths relative to `base_url`.
    paths: EndpointPaths,
}

/// Builder for `LivePvrClient`.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct LivePvrClientBuilder {
    base_url: Option<Url>,
    user_agent: Option<String>,
    credentials: Option<Credentials>,
    paths: EndpointPaths,
}

impl LivePvrClientBuilder {
    /// Creates a new builder.
    fn new() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            credentials: None,
            paths: EndpointPaths::default(),
        }
    }

    /// Overrides the base URL (test deployments, wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the User-Agent (default: [`DEFAULT_USER_AGENT`]).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the e-mail address and API secret used to sign requests.
    #[must_use]
    pub fn credentials(mut self, email: impl Into<String>, secret: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(email, secret));
        self
    }

    /// Overrides the path of one endpoint, relative to the base URL.
    #[must_use]
    pub fn endpoint_path(mut self, endpoint: Endpoint, path: impl Into<String>) -> Self {
        self.paths.set(endpoint, path.into());
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - The default base URL cannot be parsed.
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<LivePvrClient> {
        let base_url = if let Some(url) = self.base_url {
            url
        } else {
            let result = Url::parse(DEFAULT_BASE_URL);
            result.context("invalid default base URL")?
        };

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| String::from(DEFAULT_USER_AGENT));

        let http_client = Client::builder()
            .user_agent(&user_agent)
            .gzip(true)
            .build()
            .context("failed to build HTTP client")?;

        if let Some(ref creds) = self.credentials
            && !creds.is_usable()
        {
            tracing::warn!(
                email = creds.email(),
                "Incomplete credentials, requests will not be signed"
            );
        }

        Ok(LivePvrClient {
            http_client,
            base_url: with_trailing_slash(base_url),
            credentials: self.credentials,
            paths: self.paths,
        })
    }
}

/// Appends `/` to the URL path so relative endpoint paths join below it.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

impl LivePvrClient {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> LivePvrClientBuilder {
        LivePvrClientBuilder::new()
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends `req` as the `q` parameter of a GET to `endpoint` and
    /// classifies the body as `T`.
    ///
    /// Signs the request when usable credentials are configured.
    #[instrument(skip_all, fields(endpoint = endpoint.name()))]
    async fn get_response<R, T>(&self, endpoint: Endpoint, req: &R) -> Result<Response<T>>
    where
        R: Serialize + Sync,
        T: SuccessShape,
    {
        let path = self.paths.get(endpoint);
        let url = self
            .base_url
            .join(path)
            .with_context(|| format!("failed to join URL path: {path}"))?;

        let payload = serde_json::to_string(req)
            .with_context(|| format!("failed to encode {} request", endpoint.name()))?;

        let signing = match self.credentials {
            Some(ref creds) => creds
                .signing_headers(&payload)
                .with_context(|| format!("failed to sign {} request", endpoint.name()))?,
            None => None,
        };

        let mut builder = self.http_client.get(url).query(&[("q", payload.as_str())]);
        if let Some(ref headers) = signing {
            for (name, value) in headers.pairs() {
                builder = builder.header(name, value);
            }
        }
        let request = builder
            .build()
            .with_context(|| format!("failed to build request: {path}"))?;

        tracing::debug!(
            url = %request.url(),
            signed = signing.is_some(),
            "LivePvr API request"
        );

        let result = self.http_client.execute(request).await;
        let response = result.with_context(|| format!("request failed: {path}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| String::from("<failed to read body>"));
            bail!("LivePvr API error (HTTP {status}): {body}");
        }

        let body = response
            .text()
            .await
            .with_context(|| format!("failed to read response body: {path}"))?;

        tracing::debug!(%status, body_len = body.len(), "Response body received");
        tracing::trace!(
            body_preview = &body[..body.floor_char_boundary(BODY_PREVIEW_LEN)],
            "Response body preview"
        );

        let classified = classify::<T>(&body).with_context(|| {
            format!(
                "failed to classify {} response as {}",
                endpoint.name(),
                T::NAME
            )
        })?;
        Ok(classified)
    }
}

impl LocalLivePvrApi for LivePvrClient {
    #[instrument(skip_all)]
    async fn get_status(&self, req: &StatusRequest) -> Result<Response<StatusResponse>> {
        self.get_response(Endpoint::Status, req).await
    }

    #[instrument(skip_all)]
    async fn get_events(&self, req: &EventsRequest) -> Result<Response<EventsResponse>> {
        self.get_response(Endpoint::Events, req).await
    }

    #[instrument(skip_all)]
    async fn submit_override(&self, req: &OverrideRequest) -> Result<Response<SimpleResponse>> {
        self.get_response(Endpoint::Override, req).await
    }
}
