// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! XML utilities for `WebDAV` processing.

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;

use crate::error::WebDavError;

/// XML namespaces used in `WebDAV`.
pub mod ns {
    /// `WebDAV` namespace.
    pub const DAV: &str = "DAV:";

    /// Namespace of the `public_url` publishing property.
    pub const DISK_META: &str = "urn:yandex:disk:meta";
}

/// Content type sent with XML request bodies.
pub const CONTENT_TYPE: &str = "application/xml; charset=utf-8";

/// Reads the text content of the element whose start tag was just consumed.
///
/// Consumes events up to and including the matching end tag. Text of nested
/// elements is concatenated, surrounding whitespace is trimmed.
///
/// # Errors
///
/// Returns an error if XML parsing fails or the document ends early.
pub fn read_element_text(reader: &mut Reader<&[u8]>) -> Result<String, WebDavError> {
    let mut text = String::new();
    let mut depth = 1_usize;

    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            Event::Text(e) => text.push_str(&e.decode().map_err(quick_xml::Error::from)?),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e.into_inner())),
            Event::GeneralRef(e) => {
                let resolved = e
                    .resolve_char_ref()
                    .map_err(|e| WebDavError::UnhandledError(format!("XML error: {e}")))?;
                if let Some(c) = resolved {
                    text.push(c);
                } else {
                    let name = e
                        .decode()
                        .map_err(|e| WebDavError::UnhandledError(format!("XML error: {e}")))?;
                    match resolve_predefined_entity(&name) {
                        Some(value) => text.push_str(value),
                        None => {
                            return Err(WebDavError::UnhandledError(format!(
                                "XML error: unknown entity &{name};"
                            )));
                        }
                    }
                }
            }
            Event::Eof => {
                return Err(WebDavError::UnhandledError(
                    "XML error: unexpected end of document".to_string(),
                ));
            }
            _ => {}
        }
    }

    Ok(text.trim().to_string())
}

/// Finds the text of the first element named `local_name`, ignoring
/// namespace prefixes.
///
/// # Errors
///
/// Returns an error if XML parsing fails.
pub fn find_element_text(xml: &str, local_name: &str) -> Result<Option<String>, WebDavError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().check_end_names = true;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().local_name().into_inner() == local_name.as_bytes() => {
                return read_element_text(&mut reader).map(Some);
            }
            Event::Empty(e) if e.name().local_name().into_inner() == local_name.as_bytes() => {
                return Ok(Some(String::new()));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}
