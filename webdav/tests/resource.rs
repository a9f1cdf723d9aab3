// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Resource handle tests.

mod common;

use webdav_client::{PropertyName, WebDavError};
use wiremock::matchers::{body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::common::{client, mount_listing};

#[tokio::test]
async fn resource_display_and_urn() {
    let mock_server = MockServer::start().await;
    let resource = client(&mock_server).resource("docs//a b.txt");

    assert_eq!(resource.to_string(), "resource /docs/a b.txt");
    assert_eq!(resource.urn().raw_path(), "/docs/a%20b.txt");
}

#[tokio::test]
async fn resource_rename_rebinds_handle() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, "/", &["/", "/docs/"]).await;
    mount_listing(&mock_server, "/docs/", &["/docs/", "/docs/a.txt"]).await;
    Mock::given(method("MOVE"))
        .and(path("/docs/a.txt"))
        .and(header(
            "Destination",
            format!("{}/docs/b.txt", mock_server.uri()).as_str(),
        ))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut resource = client(&mock_server).resource("/docs/a.txt");
    resource.rename("b.txt").await.expect("Failed to rename");

    assert_eq!(resource.urn().path(), "/docs/b.txt");
}

#[tokio::test]
async fn resource_rename_keeps_directory_kind() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, "/", &["/", "/old/"]).await;
    Mock::given(method("MOVE"))
        .and(path("/old/"))
        .and(header(
            "Destination",
            format!("{}/new/", mock_server.uri()).as_str(),
        ))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut resource = client(&mock_server).resource("/old/");
    resource.rename("new").await.expect("Failed to rename");

    assert_eq!(resource.urn().path(), "/new/");
}

#[tokio::test]
async fn resource_failed_move_keeps_binding() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, "/", &["/"]).await;

    let mut resource = client(&mock_server).resource("/a.txt");
    let err = resource.move_to("/b.txt").await.unwrap_err();

    assert!(matches!(err, WebDavError::RemoteResourceNotFound(_)));
    assert_eq!(resource.urn().path(), "/a.txt");
}

#[tokio::test]
async fn resource_copy_returns_new_handle() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, "/", &["/", "/a.txt"]).await;
    Mock::given(method("COPY"))
        .and(path("/a.txt"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resource = client(&mock_server).resource("/a.txt");
    let copy = resource.copy_to("/b.txt").await.expect("Failed to copy");

    assert_eq!(resource.urn().path(), "/a.txt");
    assert_eq!(copy.urn().path(), "/b.txt");
}

#[tokio::test]
async fn resource_read_and_write_buffers() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, "/", &["/", "/a.txt"]).await;
    Mock::given(method("GET"))
        .and(path("/a.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes("content"))
        .mount(&mock_server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/a.txt"))
        .and(body_string("updated"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    let resource = client(&mock_server).resource("/a.txt");
    let mut buffer = Vec::new();
    resource.read_to(&mut buffer).await.expect("Failed to read");
    assert_eq!(buffer, b"content");

    resource
        .write_from(b"updated".to_vec())
        .await
        .expect("Failed to write");
}

#[tokio::test]
async fn resource_background_read() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, "/", &["/", "/a.txt"]).await;
    Mock::given(method("GET"))
        .and(path("/a.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes("content"))
        .mount(&mock_server)
        .await;
    let scratch = tempfile::tempdir().unwrap();
    let target = scratch.path().join("a.txt");

    let resource = client(&mock_server).resource("/a.txt");
    let handle = resource.read_async(&target, None);
    handle.wait().await.expect("Failed to read");

    assert_eq!(std::fs::read_to_string(&target).unwrap(), "content");
}

#[tokio::test]
async fn resource_property_forwards_path() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, "/", &["/", "/a.txt"]).await;
    Mock::given(method("PROPFIND"))
        .and(path("/a.txt"))
        .and(header("Depth", "0"))
        .respond_with(ResponseTemplate::new(207).set_body_raw(
            "\
<D:multistatus xmlns:D=\"DAV:\">
  <D:response>
    <D:href>/a.txt</D:href>
    <D:propstat>
      <D:prop><D:getcontenttype>text/plain</D:getcontenttype></D:prop>
      <D:status>HTTP/1.1 200 OK</D:status>
    </D:propstat>
  </D:response>
</D:multistatus>",
            "application/xml",
        ))
        .mount(&mock_server)
        .await;

    let resource = client(&mock_server).resource("/a.txt");
    let value = resource
        .property(&PropertyName::dav("getcontenttype"))
        .await
        .expect("Failed to get property");

    assert_eq!(value.as_deref(), Some("text/plain"));
}
