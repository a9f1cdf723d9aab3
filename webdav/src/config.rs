// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::str::FromStr;

use crate::error::WebDavError;
use crate::urn::{SEPARATOR, Urn};

/// `WebDAV` server configuration.
///
/// Unknown keys are rejected when deserializing, so a misspelled option is
/// reported before any request is made.
#[derive(Debug, Clone, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WebDavConfig {
    /// Base URL of the server, e.g. `https://webdav.example.com`.
    pub server_hostname: String,
    /// Login for basic authentication. Empty disables authentication.
    #[serde(default)]
    pub server_login: String,
    /// Password for basic authentication.
    #[serde(default)]
    pub server_password: String,
    /// Proxy URL, e.g. `http://proxy.example.com:3128`.
    #[serde(default)]
    pub proxy_hostname: Option<String>,
    /// Proxy login.
    #[serde(default)]
    pub proxy_login: Option<String>,
    /// Proxy password.
    #[serde(default)]
    pub proxy_password: Option<String>,
    /// Path prefix every request is confined to. Empty means unconfined.
    #[serde(default)]
    pub server_root: String,
    /// Whether to verify the server's TLS certificate.
    #[serde(default = "default_verify_tls")]
    pub verify_tls: bool,
    /// Request timeout in seconds. Unset keeps the transport default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// User agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_verify_tls() -> bool {
    true
}

fn default_user_agent() -> String {
    concat!("webdav-client/", env!("CARGO_PKG_VERSION")).to_string()
}

impl WebDavConfig {
    /// Creates a configuration for `server_hostname` with defaults elsewhere.
    #[must_use]
    pub fn new(server_hostname: impl Into<String>) -> Self {
        Self {
            server_hostname: server_hostname.into(),
            ..Self::default()
        }
    }

    /// Checks that the configured URLs are usable.
    ///
    /// # Errors
    ///
    /// Returns [`WebDavError::OptionNotValid`] naming the first bad option.
    pub fn validate(&self) -> Result<(), WebDavError> {
        check_url("server_hostname", &self.server_hostname)?;

        if let Some(proxy) = &self.proxy_hostname {
            check_url("proxy_hostname", proxy)?;
        }

        if self.proxy_login.is_some() && self.proxy_hostname.is_none() {
            return Err(WebDavError::option("proxy_login", "set without proxy_hostname"));
        }

        if self.proxy_password.is_some() && self.proxy_login.is_none() {
            return Err(WebDavError::option("proxy_password", "set without proxy_login"));
        }

        Ok(())
    }

    /// Server hostname without a trailing separator.
    pub(crate) fn hostname(&self) -> &str {
        self.server_hostname.trim_end_matches(SEPARATOR)
    }

    /// Encoded server root without a trailing separator, empty if unset.
    pub(crate) fn root(&self) -> String {
        Urn::new(&self.server_root)
            .raw_path()
            .trim_end_matches(SEPARATOR)
            .to_string()
    }

    /// Encoded path the server reports hrefs under: the path part of the
    /// hostname followed by the root, without a trailing separator.
    pub(crate) fn href_prefix(&self) -> String {
        let base = reqwest::Url::parse(&self.server_hostname)
            .map(|url| url.path().trim_end_matches(SEPARATOR).to_string())
            .unwrap_or_default();
        format!("{base}{}", self.root())
    }
}

impl Default for WebDavConfig {
    fn default() -> Self {
        Self {
            server_hostname: String::new(),
            server_login: String::new(),
            server_password: String::new(),
            proxy_hostname: None,
            proxy_login: None,
            proxy_password: None,
            server_root: String::new(),
            verify_tls: default_verify_tls(),
            timeout_secs: None,
            user_agent: default_user_agent(),
        }
    }
}

impl FromStr for WebDavConfig {
    type Err = WebDavError;

    /// Parses and validates a TOML configuration.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Self =
            toml::from_str(s).map_err(|e| WebDavError::option("config", e.message()))?;
        config.validate()?;
        Ok(config)
    }
}

fn check_url(name: &str, value: &str) -> Result<(), WebDavError> {
    match reqwest::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(()),
        _ => Err(WebDavError::option(name, value)),
    }
}
