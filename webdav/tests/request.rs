// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Request building tests.

use webdav_client::{PropFindRequest, PropertyName, PropertyUpdateRequest};

#[test]
fn request_propfind_builds_xml() {
    let mut request = PropFindRequest::new();
    request.add_property(PropertyName::dav("displayname"));
    request.add_property(PropertyName::dav("getcontentlength"));

    let xml = request.build().expect("Failed to build PROPFIND XML");

    assert!(xml.contains("<D:propfind xmlns:D=\"DAV:\">"));
    assert!(xml.contains("<D:prop>"));
    assert!(xml.contains("<D:displayname/>"));
    assert!(xml.contains("<D:getcontentlength/>"));
    assert!(xml.contains("</D:prop>"));
    assert!(xml.contains("</D:propfind>"));
}

#[test]
fn request_propfind_quota_properties() {
    let xml = PropFindRequest::quota()
        .build()
        .expect("Failed to build PROPFIND XML");

    assert!(xml.contains("<D:quota-available-bytes/>"));
    assert!(xml.contains("<D:quota-used-bytes/>"));
}

#[test]
fn request_propfind_foreign_namespace_is_declared() {
    let mut request = PropFindRequest::new();
    request.add_property(PropertyName::public_url());

    let xml = request.build().expect("Failed to build PROPFIND XML");

    assert!(xml.contains("<u:public_url xmlns:u=\"urn:yandex:disk:meta\"/>"));
}

#[test]
fn request_propertyupdate_set_builds_xml() {
    let xml = PropertyUpdateRequest::new()
        .set(PropertyName::new("urn:example:props", "color"), "red & blue")
        .build()
        .expect("Failed to build PROPPATCH XML");

    assert!(xml.contains("<D:propertyupdate xmlns:D=\"DAV:\">"));
    assert!(xml.contains("<D:set>"));
    assert!(xml.contains("<u:color xmlns:u=\"urn:example:props\">"));
    assert!(xml.contains("red &amp; blue"));
    assert!(xml.contains("</u:color>"));
    assert!(xml.contains("</D:set>"));
    assert!(!xml.contains("<D:remove>"));
}

#[test]
fn request_propertyupdate_remove_builds_xml() {
    let xml = PropertyUpdateRequest::new()
        .remove(PropertyName::public_url())
        .build()
        .expect("Failed to build PROPPATCH XML");

    assert!(xml.contains("<D:remove>"));
    assert!(xml.contains("<u:public_url xmlns:u=\"urn:yandex:disk:meta\"/>"));
    assert!(xml.contains("</D:remove>"));
    assert!(!xml.contains("<D:set>"));
}

#[test]
fn request_property_without_namespace() {
    let xml = PropertyUpdateRequest::new()
        .set(PropertyName::new("", "note"), "hello")
        .build()
        .expect("Failed to build PROPPATCH XML");

    assert!(xml.contains("<note>"));
    assert!(xml.contains("hello"));
    assert!(xml.contains("</note>"));
}
