// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client wrapper: operation records, authentication and status mapping.

use std::error::Error as _;
use std::time::Duration;

use reqwest::{Body, Client, Method, Proxy, RequestBuilder, Response, StatusCode};

use crate::config::WebDavConfig;
use crate::error::WebDavError;
use crate::urn::Urn;
use crate::xml;

/// Kind of a `WebDAV` exchange, fixing its verb and default headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Connectivity check.
    Check,
    /// Directory listing.
    List,
    /// Free space query.
    Free,
    /// Metadata query.
    Info,
    /// Collection creation.
    Mkdir,
    /// Resource deletion.
    Clear,
    /// Server-side copy.
    Copy,
    /// Server-side move.
    Move,
    /// File download.
    Download,
    /// File upload.
    Upload,
    /// Publishing a resource.
    Publish,
    /// Withdrawing a published resource.
    Unpublish,
    /// Reading the public URL of a resource.
    Published,
    /// Reading a property.
    GetProperty,
    /// Writing a property.
    SetProperty,
}

impl OperationKind {
    const fn verb(self) -> &'static str {
        match self {
            Self::Check => "OPTIONS",
            Self::List | Self::Free | Self::Info | Self::Published | Self::GetProperty => {
                "PROPFIND"
            }
            Self::Mkdir => "MKCOL",
            Self::Clear => "DELETE",
            Self::Copy => "COPY",
            Self::Move => "MOVE",
            Self::Download => "GET",
            Self::Upload => "PUT",
            Self::Publish | Self::Unpublish | Self::SetProperty => "PROPPATCH",
        }
    }

    const fn headers(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::List | Self::Info => &[("Accept", "*/*"), ("Depth", "1")],
            Self::Free | Self::Published | Self::GetProperty => {
                &[("Accept", "*/*"), ("Depth", "0")]
            }
            _ => &[("Accept", "*/*")],
        }
    }

    /// Returns the HTTP method of this kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the verb is rejected by the HTTP layer.
    pub fn method(self) -> Result<Method, WebDavError> {
        Method::from_bytes(self.verb().as_bytes())
            .map_err(|_| WebDavError::option("method", self.verb()))
    }
}

/// A single exchange: verb, URL, headers and optional body.
///
/// Built fresh for every call and consumed by [`HttpClient::execute`].
#[derive(Debug)]
pub struct Operation {
    kind: OperationKind,
    target: String,
    url: String,
    headers: Vec<(&'static str, String)>,
    body: Option<Body>,
}

impl Operation {
    /// Creates an operation of `kind` addressed at `urn`.
    pub fn new(http: &HttpClient, kind: OperationKind, urn: &Urn) -> Self {
        Self {
            kind,
            target: urn.path(),
            url: http.url(urn),
            headers: kind
                .headers()
                .iter()
                .map(|&(name, value)| (name, value.to_string()))
                .collect(),
            body: None,
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Sets a raw body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets an XML body along with its content type.
    #[must_use]
    pub fn xml(self, body: String) -> Self {
        self.header("Content-Type", xml::CONTENT_TYPE).body(body)
    }
}

/// HTTP client for `WebDAV` operations.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    config: WebDavConfig,
}

impl HttpClient {
    /// Creates a new HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the transport
    /// cannot be built from it.
    pub fn new(config: WebDavConfig) -> Result<Self, WebDavError> {
        config.validate()?;

        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .danger_accept_invalid_certs(!config.verify_tls);

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        if let Some(proxy_url) = &config.proxy_hostname {
            let mut proxy = Proxy::all(proxy_url)
                .map_err(|_| WebDavError::option("proxy_hostname", proxy_url))?;
            if let Some(login) = &config.proxy_login {
                let password = config.proxy_password.as_deref().unwrap_or_default();
                proxy = proxy.basic_auth(login, password);
            }
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| WebDavError::option("transport", error_chain(&e)))?;
        Ok(Self { client, config })
    }

    /// The configuration this client was built from.
    pub const fn config(&self) -> &WebDavConfig {
        &self.config
    }

    /// Builds the full URL of `urn`, below the server root.
    pub fn url(&self, urn: &Urn) -> String {
        format!(
            "{}{}{}",
            self.config.hostname(),
            self.config.root(),
            urn.raw_path()
        )
    }

    /// Builds a request with authentication headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the operation's method is rejected.
    pub fn build_request(&self, op: Operation) -> Result<RequestBuilder, WebDavError> {
        let mut req = self.client.request(op.kind.method()?, &op.url);

        if !self.config.server_login.is_empty() {
            req = req.basic_auth(&self.config.server_login, Some(&self.config.server_password));
        }

        for (name, value) in op.headers {
            req = req.header(name, value);
        }

        if let Some(body) = op.body {
            req = req.body(body);
        }

        Ok(req)
    }

    /// Executes an operation and classifies the outcome.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport fails or the server answers with a
    /// non-success status.
    pub async fn execute(&self, op: Operation) -> Result<Response, WebDavError> {
        let kind = op.kind;
        let target = op.target.clone();
        tracing::debug!(method = kind.verb(), url = %op.url, "sending request");

        let resp = self
            .build_request(op)?
            .send()
            .await
            .map_err(|e| self.transport_error(&e))?;

        let status = resp.status();
        tracing::debug!(method = kind.verb(), %status, "received response");
        if status.is_success() {
            return Ok(resp);
        }

        Err(match status {
            StatusCode::NOT_FOUND => WebDavError::RemoteResourceNotFound(target),
            StatusCode::METHOD_NOT_ALLOWED | StatusCode::NOT_IMPLEMENTED => {
                WebDavError::MethodNotSupported {
                    name: kind.verb().to_string(),
                    server: self.config.hostname().to_string(),
                }
            }
            StatusCode::INTERNAL_SERVER_ERROR => WebDavError::InternalServerError,
            StatusCode::INSUFFICIENT_STORAGE => WebDavError::NotEnoughSpace,
            status => {
                let text = resp
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read response".to_string());
                WebDavError::UnhandledError(format!("{status}: {text}"))
            }
        })
    }

    /// Reads a response body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be received.
    pub async fn text(&self, resp: Response) -> Result<String, WebDavError> {
        resp.text().await.map_err(|e| self.transport_error(&e))
    }

    /// Maps a transport failure into the error taxonomy.
    pub fn transport_error(&self, e: &reqwest::Error) -> WebDavError {
        let reason = error_chain(e);
        if reason.to_lowercase().contains("certificate") {
            WebDavError::CertificateNotValid(reason)
        } else if e.is_builder() {
            WebDavError::option("request", reason)
        } else {
            WebDavError::NotConnection {
                hostname: self.config.hostname().to_string(),
                reason,
            }
        }
    }
}

/// Joins an error and its sources into one diagnostic line.
fn error_chain(e: &reqwest::Error) -> String {
    let mut text = e.to_string();
    let mut source = e.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
