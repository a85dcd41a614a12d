//! Stateless request builder and response interpreter for the FileStation
//! API.
//!
//! # Design
//! `FileStationClient` holds only the base-URL configuration and carries no
//! mutable state between calls. Each catalog operation has a `build_*`
//! method producing a [`WireRequest`]; the single [`interpret`] method
//! decodes the uniform response envelope. The transport collaborator
//! executes the round-trip in between, keeping the core deterministic and
//! free of I/O dependencies. Concurrent callers are safe — nothing here is
//! shared or retained across calls.
//!
//! [`interpret`]: FileStationClient::interpret

use serde::Deserialize;
use serde_json::Value;
use url::form_urlencoded;

use crate::catalog::{ObjectKind, Operation};
use crate::error::Error;
use crate::http::{FilePart, HttpMethod, RequestBody, Transport, WireRequest, WireResponse};
use crate::types::{wire_bool, DownloadMode, ListOptions, ShareListOptions};

/// Scheme of the base URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    #[default]
    Http,
    Https,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    /// DSM's stock ports: 5000 plain, 5001 TLS.
    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Http => 5000,
            Protocol::Https => 5001,
        }
    }
}

/// Stateless client for the FileStation API.
///
/// Builds [`WireRequest`] values and interprets [`WireResponse`] values
/// without touching the network. Construction fixes the base URL for every
/// request the instance builds:
///
/// ```
/// use filestation_core::{FileStationClient, Protocol};
///
/// let client = FileStationClient::new("nas.local")
///     .protocol(Protocol::Https)
///     .verify_ssl(true);
/// let request = client.build_get_info();
/// assert!(request.url.starts_with("https://nas.local:5001/webapi/"));
/// ```
#[derive(Debug, Clone)]
pub struct FileStationClient {
    address: String,
    port: Option<u16>,
    protocol: Protocol,
    version: u32,
    verify_ssl: bool,
}

impl FileStationClient {
    /// Client for `address` with the stock defaults: plain HTTP on port
    /// 5000, API version 1, TLS verification off.
    pub fn new(address: &str) -> Self {
        Self {
            address: address.trim_end_matches('/').to_string(),
            port: None,
            protocol: Protocol::default(),
            version: 1,
            verify_ssl: false,
        }
    }

    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Override the protocol's default port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Default API version for operations whose catalog row does not pin
    /// one (info, share enumeration, object info). Versions below 1 round
    /// up to 1; pinned operations are unaffected.
    pub fn version(mut self, version: u32) -> Self {
        self.version = version.max(1);
        self
    }

    /// TLS-verification flag stamped onto every built request. Enforcement
    /// is the transport's job.
    pub fn verify_ssl(mut self, verify: bool) -> Self {
        self.verify_ssl = verify;
        self
    }

    fn base_url(&self) -> String {
        let port = self.port.unwrap_or_else(|| self.protocol.default_port());
        format!("{}://{}:{port}/webapi", self.protocol.as_str(), self.address)
    }

    /// Assemble the wire request for one catalog operation.
    ///
    /// Injects the fixed `api`, `version` and `method` fields from the
    /// catalog row ahead of the operation's own parameters, then encodes:
    /// GET → query string, POST → form body, POST with attachment →
    /// multipart. An attachment forces POST.
    fn build(
        &self,
        operation: Operation,
        params: Vec<(String, String)>,
        file: Option<FilePart>,
    ) -> WireRequest {
        let descriptor = operation.descriptor();

        let mut fields = Vec::with_capacity(params.len() + 3);
        fields.push(("api".to_string(), operation.qualified_api()));
        fields.push((
            "version".to_string(),
            descriptor.version.unwrap_or(self.version).to_string(),
        ));
        fields.push(("method".to_string(), descriptor.method.to_string()));
        fields.extend(params);

        let endpoint = format!("{}/{}", self.base_url(), descriptor.path);

        let verb = if file.is_some() {
            HttpMethod::Post
        } else {
            descriptor.verb
        };

        let (url, body) = match (verb, file) {
            (HttpMethod::Get, _) => {
                let mut query = form_urlencoded::Serializer::new(String::new());
                for (key, value) in &fields {
                    query.append_pair(key, value);
                }
                (format!("{endpoint}?{}", query.finish()), RequestBody::Empty)
            }
            (HttpMethod::Post, None) => (endpoint, RequestBody::Form(fields)),
            (HttpMethod::Post, Some(file)) => (endpoint, RequestBody::Multipart { fields, file }),
        };

        WireRequest {
            method: verb,
            url,
            headers: Vec::new(),
            body,
            verify_ssl: self.verify_ssl,
        }
    }

    /// Service information: manager flag, version, version string.
    pub fn build_get_info(&self) -> WireRequest {
        self.build(Operation::Info, Vec::new(), None)
    }

    /// Enumerate the available shares.
    pub fn build_list_shares(&self, opts: &ShareListOptions) -> WireRequest {
        let params = vec![
            ("onlywritable".to_string(), wire_bool(opts.only_writable).to_string()),
            ("limit".to_string(), opts.limit.to_string()),
            ("offset".to_string(), opts.offset.to_string()),
            ("sort_by".to_string(), opts.sort_by.as_str().to_string()),
            ("sort_direction".to_string(), opts.sort_direction.as_str().to_string()),
            (
                "additional".to_string(),
                Operation::ListShares.shape_additional(opts.additional).to_string(),
            ),
        ];
        self.build(Operation::ListShares, params, None)
    }

    /// Information about a single object. `kind` selects the routing branch
    /// (`"List"` or `"Sharing"`); anything else fails with
    /// [`Error::InvalidOperation`] before any request exists.
    pub fn build_get_object_info(&self, kind: &str, id: &str) -> Result<WireRequest, Error> {
        let kind: ObjectKind = kind.parse()?;
        let params = vec![("id".to_string(), id.to_string())];
        Ok(self.build(Operation::ObjectInfo(kind), params, None))
    }

    /// List files and directories under `opts.folder_path`.
    pub fn build_list(&self, opts: &ListOptions) -> WireRequest {
        self.build(Operation::List, list_params(Operation::List, opts, None), None)
    }

    /// Search under `opts.folder_path` for entries matching `pattern`.
    ///
    /// Routes to the same endpoint and method as [`build_list`]; the
    /// upstream service documents both through the `List` API. Kept as its
    /// own entry point in case the server distinguishes them.
    ///
    /// [`build_list`]: FileStationClient::build_list
    pub fn build_search(&self, pattern: &str, opts: &ListOptions) -> WireRequest {
        self.build(
            Operation::Search,
            list_params(Operation::Search, opts, Some(pattern)),
            None,
        )
    }

    /// Upload `content` as `filename` into `remote_dir`.
    ///
    /// Always a multipart POST with exactly one file part; existing files
    /// are overwritten and missing parent directories are created.
    pub fn build_upload(&self, remote_dir: &str, filename: &str, content: Vec<u8>) -> WireRequest {
        let params = vec![
            ("path".to_string(), remote_dir.to_string()),
            ("overwrite".to_string(), "true".to_string()),
            ("create_parents".to_string(), "true".to_string()),
            ("filename".to_string(), filename.to_string()),
        ];
        let file = FilePart {
            filename: filename.to_string(),
            content,
        };
        self.build(Operation::Upload, params, Some(file))
    }

    /// Download one or more files; multiple paths are comma-joined into a
    /// single `path` field.
    ///
    /// On success the service answers with the raw file content, not an
    /// envelope — run the request through [`Transport::perform`] and use the
    /// body directly. A failure still comes back as an envelope and can be
    /// fed to [`interpret`](FileStationClient::interpret).
    pub fn build_download(&self, paths: &[&str], mode: DownloadMode) -> WireRequest {
        let params = vec![
            ("path".to_string(), paths.join(",")),
            ("mode".to_string(), mode.as_str().to_string()),
        ];
        self.build(Operation::Download, params, None)
    }

    /// Delete the file or empty directory at `path`.
    ///
    /// Always non-recursive: the request carries `recursive=false` and no
    /// recursive option is exposed, so subtree contents are never deleted
    /// unless the caller issues per-item calls.
    pub fn build_delete(&self, path: &str) -> WireRequest {
        let params = vec![
            ("path".to_string(), path.to_string()),
            ("recursive".to_string(), wire_bool(false).to_string()),
        ];
        self.build(Operation::Delete, params, None)
    }

    /// Create directory `name` under `folder_path`.
    pub fn build_create_folder(
        &self,
        folder_path: &str,
        name: &str,
        force_parent: bool,
        additional: bool,
    ) -> WireRequest {
        let params = vec![
            ("folder_path".to_string(), folder_path.to_string()),
            ("name".to_string(), name.to_string()),
            ("force_parent".to_string(), wire_bool(force_parent).to_string()),
            (
                "additional".to_string(),
                Operation::CreateFolder.shape_additional(additional).to_string(),
            ),
        ];
        self.build(Operation::CreateFolder, params, None)
    }

    /// Decode a response envelope into its payload or a typed error.
    ///
    /// `success: true` yields the `data` field verbatim (`None` when absent
    /// or null, e.g. for delete). `success: false` yields
    /// [`Error::Api`] with the service's code and any auxiliary detail
    /// fields unmodified. Anything that is not an envelope with a `success`
    /// field is [`Error::MalformedResponse`].
    pub fn interpret(&self, response: &WireResponse) -> Result<Option<Value>, Error> {
        let envelope: Envelope = serde_json::from_slice(&response.body)
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;

        if envelope.success {
            return Ok(envelope.data.filter(|data| !data.is_null()));
        }

        let mut detail = envelope.error.unwrap_or_default();
        let code = detail
            .remove("code")
            .and_then(|code| code.as_u64())
            .ok_or_else(|| {
                Error::MalformedResponse("failure envelope without numeric error code".to_string())
            })?;
        let code = u32::try_from(code).map_err(|_| {
            Error::MalformedResponse(format!("error code {code} out of range"))
        })?;

        Err(Error::Api { code, detail })
    }

    /// Perform `request` through `transport` and interpret the envelope.
    ///
    /// Transport failures surface unmodified as [`Error::Transport`]; the
    /// core never retries. Not for successful `download` responses, whose
    /// bodies are raw file content.
    pub fn call<T: Transport>(
        &self,
        transport: &T,
        request: &WireRequest,
    ) -> Result<Option<Value>, Error> {
        let response = transport.perform(request).map_err(Error::Transport)?;
        self.interpret(&response)
    }
}

/// The wire envelope. `data` and `error` are mutually exclusive; a missing
/// `success` field makes the whole body malformed.
#[derive(Debug, Deserialize)]
struct Envelope {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    error: Option<serde_json::Map<String, Value>>,
}

/// Shared parameter shaping for list and search. `pattern` overrides the
/// one in `opts` when given (search requires it).
fn list_params(
    operation: Operation,
    opts: &ListOptions,
    pattern: Option<&str>,
) -> Vec<(String, String)> {
    let pattern = pattern
        .map(str::to_string)
        .or_else(|| opts.pattern.clone())
        .unwrap_or_default();
    vec![
        ("folder_path".to_string(), opts.folder_path.clone()),
        ("limit".to_string(), opts.limit.to_string()),
        ("offset".to_string(), opts.offset.to_string()),
        ("sort_by".to_string(), opts.sort_by.as_str().to_string()),
        ("sort_direction".to_string(), opts.sort_direction.as_str().to_string()),
        ("pattern".to_string(), pattern),
        ("filetype".to_string(), opts.file_type.as_str().to_string()),
        (
            "additional".to_string(),
            operation.shape_additional(opts.additional).to_string(),
        ),
    ]
}
