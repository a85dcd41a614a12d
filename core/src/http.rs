//! Wire-level request/response types and the transport seam.
//!
//! # Design
//! These types describe HTTP requests and responses as plain data. The core
//! crate builds `WireRequest` values and interprets `WireResponse` values
//! without ever touching the network — the transport collaborator executes
//! the actual I/O. This separation keeps the core deterministic and easy to
//! test.
//!
//! All fields use owned types (`String`, `Vec`) so a request can outlive the
//! client that built it.

/// HTTP verb for a request. The FileStation API only ever uses these two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// The binary attachment of an upload request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    /// Filename the service stores the content under.
    pub filename: String,
    pub content: Vec<u8>,
}

/// Body of an outbound request.
///
/// The transport owns the actual encoding: `Form` becomes an
/// `application/x-www-form-urlencoded` body, `Multipart` becomes a
/// `multipart/form-data` body with one part per field plus exactly one file
/// part named `file`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    /// GET requests carry all parameters in the URL query string.
    Empty,
    Form(Vec<(String, String)>),
    Multipart {
        fields: Vec<(String, String)>,
        file: FilePart,
    },
}

/// A fully-specified outbound request, as plain data.
///
/// Built by `FileStationClient::build_*` methods. The transport executes it
/// and returns the corresponding [`WireResponse`].
#[derive(Debug, Clone)]
pub struct WireRequest {
    pub method: HttpMethod,
    /// Full endpoint URL; for GET requests the query string is already
    /// encoded into it.
    pub url: String,
    /// Extra headers. The builder leaves this empty — session cookies and
    /// auth tokens are owned by the transport.
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    /// TLS-verification flag, passed through unchanged. The core never
    /// implements certificate logic.
    pub verify_ssl: bool,
}

/// A raw response, as plain data.
///
/// The body stays as bytes because `download` answers with the raw file
/// content rather than a JSON envelope.
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Error type transports report with. Surfaced unmodified as
/// [`Error::Transport`](crate::Error::Transport).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The abstract transport contract the core calls through.
///
/// Implementors own TLS verification, authentication tokens/session cookies,
/// timeouts and retry policy. The core neither retries nor parallelizes; one
/// call is one request/response cycle.
pub trait Transport {
    fn perform(&self, request: &WireRequest) -> Result<WireResponse, BoxError>;
}
