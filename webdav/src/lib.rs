// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `WebDAV` client for listing, transferring and tagging resources on `WebDAV`
//! servers (RFC 4918).
//!
//! Remote resources are addressed with filesystem-like paths; every call is
//! translated into the matching verb, headers and XML body, and confined below
//! the configured server root.

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::single_match_else
)]

mod client;
mod config;
mod error;
mod http;
mod request;
mod resource;
mod response;
mod transfer;
mod types;
mod urn;
mod xml;

pub use crate::client::WebDavClient;
pub use crate::config::WebDavConfig;
pub use crate::error::WebDavError;
pub use crate::http::OperationKind;
pub use crate::request::{PropFindRequest, PropertyUpdateRequest};
pub use crate::resource::Resource;
pub use crate::response::{MultiStatusResponse, PropStat, Properties, ResponseItem};
pub use crate::transfer::{Callback, TransferHandle};
pub use crate::types::{PropertyName, ResourceInfo};
pub use crate::urn::{SEPARATOR, Urn};
