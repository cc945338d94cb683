//! HTTP transport implementation.
//!
//! HTTP/1.1 and HTTP/2 over reqwest with rustls.

use reqwest::{Client, RequestBuilder, header::CONTENT_TYPE};
use tracing::{debug, instrument};
use url::Url;

use super::config::{HttpConfig, HttpVersion};
use crate::{
    error::{DarajaError, Result},
    transport::{Authorization, RequestContext, Transport, TransportResponse, sealed},
};

/// Parses the base URL and checks it is an absolute HTTP(S) URL with a host.
pub(crate) fn validate_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url)
        .map_err(|e| DarajaError::Config(format!("invalid base_url '{base_url}': {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(DarajaError::Config(format!(
            "base_url must use http or https, got: {}",
            url.scheme()
        )));
    }
    if url.host_str().is_none() {
        return Err(DarajaError::Config(format!("base_url missing host: {base_url}")));
    }

    Ok(url)
}

/// Rejects paths that could escape the API root.
fn sanitize_path(path: &str) -> Result<&str> {
    if !path.starts_with('/') {
        return Err(DarajaError::Config(format!("path must start with '/': {path}")));
    }
    if path.contains("..") || path.contains("//") {
        return Err(DarajaError::Config(format!(
            "invalid path: traversal sequences not allowed: {path}"
        )));
    }
    Ok(path)
}

/// HTTP/1.1 and HTTP/2 transport using reqwest.
///
/// Cloning is cheap: the inner client is reference-counted and clones share
/// the connection pool.
///
/// # Examples
///
/// ```
/// use mpesa_daraja::transport::{HttpConfig, HttpTransport, HttpVersion, Transport};
///
/// let config = HttpConfig { http_version: HttpVersion::Http1, ..Default::default() };
/// let transport = HttpTransport::with_config(&config).unwrap();
/// assert_eq!(transport.protocol_name(), "http/1.1");
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    http_version: HttpVersion,
}

impl sealed::private::Sealed for HttpTransport {}

impl HttpTransport {
    /// Creates a transport from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError::Config`] if the settings fail validation and
    /// [`DarajaError::Transport`] if the HTTP client cannot be built.
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.as_str());

        builder = match config.http_version {
            HttpVersion::Http1 => builder.http1_only(),
            HttpVersion::Http2 => builder.http2_prior_knowledge(),
            HttpVersion::Auto => builder,
        };

        let client = builder.build()?;

        Ok(Self { client, http_version: config.http_version })
    }

    fn authorize(request: RequestBuilder, authorization: Authorization<'_>) -> RequestBuilder {
        match authorization {
            Authorization::Bearer(token) => request.bearer_auth(token),
            Authorization::Basic { username, password } => {
                request.basic_auth(username, Some(password))
            }
        }
    }

    #[instrument(skip(self, ctx, body), fields(path = ctx.path))]
    async fn execute_request(
        &self,
        ctx: RequestContext<'_>,
        method: reqwest::Method,
        body: Option<&[u8]>,
    ) -> Result<TransportResponse> {
        validate_base_url(ctx.base_url)?;
        let path = sanitize_path(ctx.path)?;

        let full_url = format!("{}{path}", ctx.base_url.trim_end_matches('/'));

        let mut request = self.client.request(method, &full_url);
        request = Self::authorize(request, ctx.authorization);

        if let Some(content_type) = ctx.content_type {
            request = request.header(CONTENT_TYPE, content_type);
        }
        if let Some(bytes) = body {
            request = request.body(bytes.to_vec());
        }

        let response = request.send().await?;

        let status = response.status().as_u16();
        let response_body = response.bytes().await?.to_vec();
        debug!(status, bytes = response_body.len(), "response received");

        Ok(TransportResponse { status, body: response_body })
    }
}

impl Transport for HttpTransport {
    async fn get<'a>(&'a self, ctx: RequestContext<'a>) -> Result<TransportResponse> {
        self.execute_request(ctx, reqwest::Method::GET, None).await
    }

    async fn post<'a>(
        &'a self,
        ctx: RequestContext<'a>,
        body: &'a [u8],
    ) -> Result<TransportResponse> {
        self.execute_request(ctx, reqwest::Method::POST, Some(body)).await
    }

    fn protocol_name(&self) -> &'static str {
        match self.http_version {
            HttpVersion::Http1 => "http/1.1",
            HttpVersion::Http2 => "http/2",
            HttpVersion::Auto => "http",
        }
    }
}
