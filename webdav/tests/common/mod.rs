// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use webdav_client::{WebDavClient, WebDavConfig};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

/// Builds a multistatus body listing `hrefs`. Hrefs ending with `/` are
/// reported as collections.
pub fn multistatus(hrefs: &[&str]) -> String {
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"utf-8\" ?>\n<D:multistatus xmlns:D=\"DAV:\">\n",
    );
    for href in hrefs {
        let resource_type = if href.ends_with('/') {
            "<D:resourcetype><D:collection/></D:resourcetype>"
        } else {
            "<D:resourcetype/>"
        };
        xml.push_str(&format!(
            "  <D:response>
    <D:href>{href}</D:href>
    <D:propstat>
      <D:prop>{resource_type}</D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
"
        ));
    }
    xml.push_str("</D:multistatus>");
    xml
}

/// Mounts a depth-1 PROPFIND on `dir` answering with `hrefs`.
pub async fn mount_listing(server: &MockServer, dir: &str, hrefs: &[&str]) {
    Mock::given(method("PROPFIND"))
        .and(path(dir))
        .and(header("Depth", "1"))
        .respond_with(
            ResponseTemplate::new(207).set_body_raw(multistatus(hrefs), "application/xml"),
        )
        .mount(server)
        .await;
}

/// Creates a client for the mock server, without server root.
pub fn client(server: &MockServer) -> WebDavClient {
    client_with_root(server, "")
}

/// Creates a client for the mock server confined to `root`.
pub fn client_with_root(server: &MockServer, root: &str) -> WebDavClient {
    let config = WebDavConfig {
        server_root: root.to_string(),
        ..WebDavConfig::new(server.uri())
    };
    WebDavClient::new(config).expect("Failed to create client")
}

/// Returns `METHOD path` of every request the server received, in order.
pub async fn requests(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(describe)
        .collect()
}

fn describe(request: &Request) -> String {
    format!("{} {}", request.method, request.url.path())
}
