// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Request body builders for `WebDAV` operations.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::WebDavError;
use crate::types::PropertyName;
use crate::xml::ns;

type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// PROPFIND request builder.
#[derive(Debug, Default)]
pub struct PropFindRequest {
    props: Vec<PropertyName>,
}

impl PropFindRequest {
    /// Creates a new PROPFIND request.
    #[must_use]
    pub fn new() -> Self {
        Self { props: Vec::new() }
    }

    /// Creates the quota request used to query free space.
    #[must_use]
    pub fn quota() -> Self {
        let mut request = Self::new();
        request
            .add_property(PropertyName::dav("quota-available-bytes"))
            .add_property(PropertyName::dav("quota-used-bytes"));
        request
    }

    /// Adds a property to the request.
    pub fn add_property(&mut self, prop: PropertyName) -> &mut Self {
        self.props.push(prop);
        self
    }

    /// Builds the XML body for the PROPFIND request.
    ///
    /// # Errors
    ///
    /// Returns an error if XML building fails.
    pub fn build(&self) -> Result<String, WebDavError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        // <D:propfind xmlns:D="DAV:">
        let mut propfind = BytesStart::new("D:propfind");
        propfind.push_attribute(("xmlns:D", ns::DAV));
        write(&mut writer, Event::Start(propfind))?;

        write(&mut writer, Event::Start(BytesStart::new("D:prop")))?;
        for prop in &self.props {
            write_property(&mut writer, prop, None)?;
        }
        write(&mut writer, Event::End(BytesEnd::new("D:prop")))?;

        write(&mut writer, Event::End(BytesEnd::new("D:propfind")))?;

        finish(writer)
    }
}

/// PROPPATCH request builder.
#[derive(Debug, Default)]
pub struct PropertyUpdateRequest {
    set: Vec<(PropertyName, String)>,
    remove: Vec<PropertyName>,
}

impl PropertyUpdateRequest {
    /// Creates a new PROPPATCH request.
    #[must_use]
    pub fn new() -> Self {
        Self {
            set: Vec::new(),
            remove: Vec::new(),
        }
    }

    /// Sets a property to a value.
    #[must_use]
    pub fn set(mut self, prop: PropertyName, value: impl Into<String>) -> Self {
        self.set.push((prop, value.into()));
        self
    }

    /// Removes a property.
    #[must_use]
    pub fn remove(mut self, prop: PropertyName) -> Self {
        self.remove.push(prop);
        self
    }

    /// Builds the XML body for the PROPPATCH request.
    ///
    /// # Errors
    ///
    /// Returns an error if XML building fails.
    pub fn build(&self) -> Result<String, WebDavError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        // <D:propertyupdate xmlns:D="DAV:">
        let mut update = BytesStart::new("D:propertyupdate");
        update.push_attribute(("xmlns:D", ns::DAV));
        write(&mut writer, Event::Start(update))?;

        if !self.set.is_empty() {
            write(&mut writer, Event::Start(BytesStart::new("D:set")))?;
            write(&mut writer, Event::Start(BytesStart::new("D:prop")))?;
            for (prop, value) in &self.set {
                write_property(&mut writer, prop, Some(value))?;
            }
            write(&mut writer, Event::End(BytesEnd::new("D:prop")))?;
            write(&mut writer, Event::End(BytesEnd::new("D:set")))?;
        }

        if !self.remove.is_empty() {
            write(&mut writer, Event::Start(BytesStart::new("D:remove")))?;
            write(&mut writer, Event::Start(BytesStart::new("D:prop")))?;
            for prop in &self.remove {
                write_property(&mut writer, prop, None)?;
            }
            write(&mut writer, Event::End(BytesEnd::new("D:prop")))?;
            write(&mut writer, Event::End(BytesEnd::new("D:remove")))?;
        }

        write(&mut writer, Event::End(BytesEnd::new("D:propertyupdate")))?;

        finish(writer)
    }
}

/// Writes `<prefix:name/>`, or `<prefix:name>value</prefix:name>` when a
/// value is given. Properties outside `DAV:` declare their namespace inline.
fn write_property(
    writer: &mut XmlWriter,
    prop: &PropertyName,
    value: Option<&str>,
) -> Result<(), WebDavError> {
    let tag = if prop.namespace == ns::DAV {
        format!("D:{}", prop.name)
    } else if prop.namespace.is_empty() {
        prop.name.clone()
    } else {
        format!("u:{}", prop.name)
    };

    let mut start = BytesStart::new(tag.as_str());
    if prop.namespace != ns::DAV && !prop.namespace.is_empty() {
        start.push_attribute(("xmlns:u", prop.namespace.as_str()));
    }

    match value {
        Some(value) => {
            write(writer, Event::Start(start))?;
            write(writer, Event::Text(BytesText::new(value)))?;
            write(writer, Event::End(BytesEnd::new(tag.as_str())))
        }
        None => write(writer, Event::Empty(start)),
    }
}

fn write(writer: &mut XmlWriter, event: Event<'_>) -> Result<(), WebDavError> {
    writer
        .write_event(event)
        .map_err(|e| WebDavError::UnhandledError(format!("XML error: {e}")))
}

fn finish(writer: XmlWriter) -> Result<String, WebDavError> {
    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| WebDavError::UnhandledError(format!("UTF-8 error: {e}")))
}
