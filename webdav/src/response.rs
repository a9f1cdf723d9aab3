// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Response parsers for `WebDAV` operations.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::Event;

use crate::error::WebDavError;
use crate::types::ResourceInfo;
use crate::xml::read_element_text;

/// `WebDAV` multistatus response.
#[derive(Debug, Clone, Default)]
pub struct MultiStatusResponse {
    /// The response items.
    pub responses: Vec<ResponseItem>,
}

/// Individual response in multistatus.
#[derive(Debug, Clone, Default)]
pub struct ResponseItem {
    /// The href exactly as sent by the server.
    pub href: String,
    /// Property groups with their status.
    pub prop_stats: Vec<PropStat>,
    /// Response-level status, if the server sent one instead of propstats.
    pub status: Option<String>,
}

/// Property stat with status and values.
#[derive(Debug, Clone, Default)]
pub struct PropStat {
    /// The reported properties.
    pub props: Properties,
    /// Status line, e.g. `HTTP/1.1 200 OK`.
    pub status: String,
}

/// `WebDAV` properties, keyed by local name.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    /// Text values of the reported properties.
    pub values: HashMap<String, String>,
    /// Whether `resourcetype` contains `collection`.
    pub is_collection: bool,
}

impl Properties {
    /// Returns the text of a property by local name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

impl PropStat {
    /// Whether the status line carries a 2xx code.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status
            .split_whitespace()
            .nth(1)
            .and_then(|code| code.parse::<u16>().ok())
            .is_some_and(|code| (200..300).contains(&code))
    }
}

impl ResponseItem {
    /// Returns the value of a property from the first successful propstat
    /// reporting it.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.prop_stats
            .iter()
            .filter(|p| p.is_success())
            .find_map(|p| p.props.get(name))
    }

    /// Whether the resource is a collection.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.prop_stats
            .iter()
            .any(|p| p.is_success() && p.props.is_collection)
    }

    /// Extracts the common resource metadata.
    #[must_use]
    pub fn info(&self) -> ResourceInfo {
        ResourceInfo {
            created: self.property("creationdate").map(str::to_string),
            name: self.property("displayname").map(str::to_string),
            size: self
                .property("getcontentlength")
                .and_then(|s| s.parse().ok()),
            modified: self.property("getlastmodified").map(str::to_string),
            is_directory: self.is_collection(),
        }
    }
}

impl MultiStatusResponse {
    /// Parses multistatus response from XML.
    ///
    /// # Errors
    ///
    /// Returns an error if XML parsing fails.
    pub fn from_xml(xml: &str) -> Result<Self, WebDavError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().check_end_names = true;

        let mut responses = Vec::new();
        let mut current_response: Option<ResponseItem> = None;
        let mut current_prop_stat: Option<PropStat> = None;
        let mut in_prop = false;

        loop {
            match reader.read_event()? {
                Event::Eof => break,

                Event::Start(e) => {
                    let name = e.name().local_name().into_inner();
                    match name {
                        b"response" => current_response = Some(ResponseItem::default()),
                        b"propstat" if current_response.is_some() => {
                            current_prop_stat = Some(PropStat::default());
                        }
                        b"prop" if current_prop_stat.is_some() => in_prop = true,
                        b"resourcetype" if in_prop => {
                            let is_collection = read_resource_type(&mut reader)?;
                            if let Some(prop_stat) = current_prop_stat.as_mut() {
                                prop_stat.props.is_collection = is_collection;
                            }
                        }
                        _ if in_prop => {
                            let key = String::from_utf8_lossy(name).into_owned();
                            let text = read_element_text(&mut reader)?;
                            if let Some(prop_stat) = current_prop_stat.as_mut() {
                                prop_stat.props.values.insert(key, text);
                            }
                        }
                        b"href" if current_response.is_some() => {
                            let href = read_element_text(&mut reader)?;
                            if let Some(resp) = current_response.as_mut() {
                                resp.href = href;
                            }
                        }
                        b"status" if current_response.is_some() => {
                            let status = read_element_text(&mut reader)?;
                            if let Some(prop_stat) = current_prop_stat.as_mut() {
                                prop_stat.status = status;
                            } else if let Some(resp) = current_response.as_mut() {
                                resp.status = Some(status);
                            }
                        }
                        _ => {}
                    }
                }

                Event::Empty(e) if in_prop => {
                    let name = e.name().local_name().into_inner();
                    if name != b"resourcetype" {
                        if let Some(prop_stat) = current_prop_stat.as_mut() {
                            let key = String::from_utf8_lossy(name).into_owned();
                            prop_stat.props.values.insert(key, String::new());
                        }
                    }
                }

                Event::End(e) => match e.name().local_name().into_inner() {
                    b"prop" => in_prop = false,
                    b"propstat" => {
                        if let (Some(resp), Some(prop_stat)) =
                            (current_response.as_mut(), current_prop_stat.take())
                        {
                            resp.prop_stats.push(prop_stat);
                        }
                    }
                    b"response" => {
                        if let Some(resp) = current_response.take() {
                            responses.push(resp);
                        }
                    }
                    _ => {}
                },

                _ => {}
            }
        }

        Ok(Self { responses })
    }

    /// Returns the value of a property from the first response reporting it.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.responses.iter().find_map(|r| r.property(name))
    }
}

/// Consumes a `resourcetype` element, reporting whether it marks a collection.
fn read_resource_type(reader: &mut Reader<&[u8]>) -> Result<bool, WebDavError> {
    let mut is_collection = false;
    let mut depth = 1_usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                if e.name().local_name().into_inner() == b"collection" {
                    is_collection = true;
                }
            }
            Event::Empty(e) => {
                if e.name().local_name().into_inner() == b"collection" {
                    is_collection = true;
                }
            }
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    break;
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

    Ok(is_collection)
}
