//! Error taxonomy for the FileStation client.
//!
//! # Design
//! Every failure surfaces to the immediate caller as a typed variant; the
//! core never recovers locally, retries, or synthesizes partial results.
//! Service-reported failures keep their numeric code and any auxiliary
//! detail fields unmodified — [`describe`] only provides the documented
//! code→category table, operation-dependent meanings are the caller's
//! lookup.

use thiserror::Error;

use crate::http::BoxError;

/// Errors returned by request building, transport dispatch, and response
/// interpretation.
#[derive(Debug, Error)]
pub enum Error {
    /// The caller supplied an unrecognized discriminator (e.g. an unknown
    /// object-info kind). Raised before any request is built.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The transport collaborator failed (network, TLS). Propagated
    /// unmodified.
    #[error("transport failure: {0}")]
    Transport(#[source] BoxError),

    /// The response body is not a parseable envelope or lacks the `success`
    /// field.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The service reported `success: false`. `detail` carries any auxiliary
    /// fields the error object held besides `code`, passed through as-is.
    #[error("api error {code}: {}", describe(*.code))]
    Api {
        code: u32,
        detail: serde_json::Map<String, serde_json::Value>,
    },
}

/// The documented code→category table.
///
/// Codes 100–107 are common to every DSM API; 400–421 and 599 are
/// FileStation-specific. Anything else is service-defined and
/// operation-dependent.
pub fn describe(code: u32) -> &'static str {
    match code {
        100 => "unknown error",
        101 => "no parameter of API, method or version",
        102 => "the requested API does not exist",
        103 => "the requested method does not exist",
        104 => "the requested version does not support the functionality",
        105 => "the logged in session does not have permission",
        106 => "session timeout",
        107 => "session interrupted by duplicate login",
        400 => "invalid parameter of file operation",
        401 => "unknown error of file operation",
        402 => "system is too busy",
        403 => "invalid user does this file operation",
        404 => "invalid group does this file operation",
        405 => "invalid user and group does this file operation",
        406 => "can't get user/group information from the account server",
        407 => "operation not permitted",
        408 => "no such file or directory",
        409 => "non-supported file system",
        410 => "failed to connect internet-based file system",
        411 => "read-only file system",
        412 => "filename too long in the non-encrypted file system",
        413 => "filename too long in the encrypted file system",
        414 => "file already exists",
        415 => "disk quota exceeded",
        416 => "no space left on device",
        417 => "input/output error",
        418 => "illegal name or path",
        419 => "illegal file name",
        420 => "illegal file name on FAT file system",
        421 => "device or resource busy",
        599 => "no such task of the file operation",
        _ => "service-defined error",
    }
}
