//! Typed client core for the Synology FileStation web API.
//!
//! # Overview
//! Builds [`WireRequest`] values and interprets [`WireResponse`] envelopes
//! without touching the network. The transport collaborator — anything
//! implementing [`Transport`] — executes the actual HTTP round-trip and owns
//! authentication, TLS and retry policy.
//!
//! # Design
//! - [`FileStationClient`] is stateless; it holds only the base-URL
//!   configuration fixed at construction.
//! - Every operation is a row in the [`catalog`]: a fixed
//!   (api, path, method, version, verb) tuple consumed uniformly by one
//!   request-building routine. No subclassing, no virtual dispatch.
//! - The response envelope is uniform across operations, so one
//!   [`interpret`](FileStationClient::interpret) method covers all of them;
//!   failures keep the service's numeric code and detail fields unmodified.

pub mod catalog;
pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use catalog::{Descriptor, ObjectKind, Operation, API_NAMESPACE, SERVICE_NAME};
pub use client::{FileStationClient, Protocol};
pub use error::{describe, Error};
pub use http::{
    BoxError, FilePart, HttpMethod, RequestBody, Transport, WireRequest, WireResponse,
};
pub use types::{DownloadMode, FileType, ListOptions, ShareListOptions, SortBy, SortDirection};
