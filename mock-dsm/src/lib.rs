//! In-memory mock of the DSM FileStation web API.
//!
//! Implements the envelope protocol (`{success, data}` / `{success,
//! error:{code}}`) over the three CGI endpoints the client targets, backed
//! by a flat map of absolute paths. Enough fidelity for integration tests:
//! dispatch on `api`/`method`, form- and multipart-encoded POST bodies,
//! capability-string `additional` fields, and the documented FileStation
//! error codes (101/102/103, 407, 408, 414).

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Query, Request, State},
    http::header,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

/// One entry in the mock file system.
#[derive(Clone, Debug)]
pub struct Node {
    pub is_dir: bool,
    pub content: Vec<u8>,
}

impl Node {
    fn dir() -> Self {
        Node { is_dir: true, content: Vec::new() }
    }

    fn file(content: Vec<u8>) -> Self {
        Node { is_dir: false, content }
    }
}

/// Absolute path → node. Top-level directories double as the shares.
pub type Fs = Arc<RwLock<BTreeMap<String, Node>>>;

pub fn app() -> Router {
    let fs: Fs = Arc::new(RwLock::new(BTreeMap::from([
        ("/home".to_string(), Node::dir()),
        ("/photo".to_string(), Node::dir()),
    ])));
    Router::new()
        .route("/webapi/entry.cgi", get(handle_get).post(handle_post))
        .route("/webapi/FileStation/info.cgi", get(handle_get))
        .route("/webapi/FileStation/file_sharing.cgi", get(handle_get))
        .with_state(fs)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn handle_get(
    State(fs): State<Fs>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    dispatch(fs, params, None).await
}

/// POST bodies arrive either form-urlencoded or, for uploads, as multipart.
async fn handle_post(State(fs): State<Fs>, request: Request) -> Response {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        let mut multipart = match Multipart::from_request(request, &()).await {
            Ok(multipart) => multipart,
            Err(_) => return fail(101),
        };

        let mut params = HashMap::new();
        let mut file: Option<(String, Vec<u8>)> = None;
        loop {
            match multipart.next_field().await {
                Ok(Some(field)) => {
                    let name = field.name().unwrap_or_default().to_string();
                    if name == "file" {
                        let filename = field.file_name().unwrap_or("upload.bin").to_string();
                        let content = field.bytes().await.unwrap_or_else(|_| Bytes::new());
                        file = Some((filename, content.to_vec()));
                    } else {
                        params.insert(name, field.text().await.unwrap_or_default());
                    }
                }
                Ok(None) => break,
                Err(_) => return fail(101),
            }
        }
        return dispatch(fs, params, file).await;
    }

    let body = match axum::body::to_bytes(request.into_body(), usize::MAX).await {
        Ok(body) => body,
        Err(_) => return fail(101),
    };
    let params: HashMap<String, String> =
        url::form_urlencoded::parse(&body).into_owned().collect();
    dispatch(fs, params, None).await
}

async fn dispatch(fs: Fs, params: HashMap<String, String>, file: Option<(String, Vec<u8>)>) -> Response {
    let (Some(api), Some(method)) = (params.get("api"), params.get("method")) else {
        return fail(101);
    };

    match (api.as_str(), method.as_str()) {
        ("SYNO.FileStation.Info", "getinfo") => ok(json!({
            "is_manager": true,
            "version": 7,
            "version_string": "DSM 7.2-mock",
        })),
        ("SYNO.FileStation.Info", _) => fail(103),

        ("SYNO.FileStation.List", "list_share") => list_shares(&fs, &params).await,
        ("SYNO.FileStation.List", "list") => list(&fs, &params).await,
        ("SYNO.FileStation.List", "getinfo") => object_info(&fs, &params).await,
        ("SYNO.FileStation.List", _) => fail(103),

        ("SYNO.FileStation.Sharing", "getinfo") => {
            let Some(id) = params.get("id") else {
                return fail(101);
            };
            ok(json!({"id": id, "status": "valid", "url": format!("/sharing/{id}")}))
        }
        ("SYNO.FileStation.Sharing", _) => fail(103),

        ("SYNO.FileStation.Upload", "upload") => upload(&fs, &params, file).await,
        ("SYNO.FileStation.Upload", _) => fail(103),

        ("SYNO.FileStation.Download", "download") => download(&fs, &params).await,
        ("SYNO.FileStation.Download", _) => fail(103),

        ("SYNO.FileStation.Delete", "delete") => delete(&fs, &params).await,
        ("SYNO.FileStation.Delete", _) => fail(103),

        ("SYNO.FileStation.CreateFolder", "create") => create_folder(&fs, &params).await,
        ("SYNO.FileStation.CreateFolder", _) => fail(103),

        _ => fail(102),
    }
}

async fn list_shares(fs: &Fs, params: &HashMap<String, String>) -> Response {
    let nodes = fs.read().await;
    let additional = params.get("additional").map(String::as_str).unwrap_or("");

    let mut shares: Vec<Value> = nodes
        .iter()
        .filter(|(path, node)| node.is_dir && depth(path) == 1)
        .map(|(path, node)| entry_json(path, node, additional))
        .collect();
    if params.get("sort_direction").map(String::as_str) == Some("desc") {
        shares.reverse();
    }

    let total = shares.len();
    let (offset, page) = paginate(shares, params);
    ok(json!({"shares": page, "total": total, "offset": offset}))
}

async fn list(fs: &Fs, params: &HashMap<String, String>) -> Response {
    let Some(folder_path) = params.get("folder_path") else {
        return fail(101);
    };
    let nodes = fs.read().await;
    match nodes.get(folder_path.as_str()) {
        Some(node) if node.is_dir => {}
        _ => return fail(408),
    }

    // Patterns are globs on real DSM; substring matching is enough here.
    let pattern = params
        .get("pattern")
        .map(|p| p.trim_matches('*').to_string())
        .unwrap_or_default();
    let filetype = params.get("filetype").map(String::as_str).unwrap_or("all");
    let additional = params.get("additional").map(String::as_str).unwrap_or("");

    let mut files: Vec<Value> = nodes
        .iter()
        .filter(|(path, _)| parent(path) == *folder_path)
        .filter(|(path, _)| pattern.is_empty() || name_of(path).contains(&pattern))
        .filter(|(_, node)| match filetype {
            "file" => !node.is_dir,
            "dir" => node.is_dir,
            _ => true,
        })
        .map(|(path, node)| entry_json(path, node, additional))
        .collect();
    if params.get("sort_direction").map(String::as_str) == Some("desc") {
        files.reverse();
    }

    let total = files.len();
    let (offset, page) = paginate(files, params);
    ok(json!({"files": page, "total": total, "offset": offset}))
}

async fn object_info(fs: &Fs, params: &HashMap<String, String>) -> Response {
    let Some(id) = params.get("id") else {
        return fail(101);
    };
    let nodes = fs.read().await;
    match nodes.get(id.as_str()) {
        Some(node) => ok(json!({"files": [entry_json(id, node, "")]})),
        None => fail(408),
    }
}

async fn upload(
    fs: &Fs,
    params: &HashMap<String, String>,
    file: Option<(String, Vec<u8>)>,
) -> Response {
    let (Some(path), Some((filename, content))) = (params.get("path"), file) else {
        return fail(101);
    };

    let mut nodes = fs.write().await;
    if !nodes.get(path.as_str()).is_some_and(|node| node.is_dir) {
        if params.get("create_parents").map(String::as_str) != Some("true") {
            return fail(408);
        }
        create_chain(&mut nodes, path);
    }

    let target = format!("{path}/{filename}");
    if nodes.contains_key(&target) && params.get("overwrite").map(String::as_str) != Some("true") {
        return fail(414);
    }
    nodes.insert(target, Node::file(content));
    ok(json!({"blSkip": false, "file": filename, "progress": 1.0}))
}

async fn download(fs: &Fs, params: &HashMap<String, String>) -> Response {
    let Some(path) = params.get("path") else {
        return fail(101);
    };
    let nodes = fs.read().await;
    // Single-path downloads only; real DSM zips multiple paths.
    match nodes.get(path.as_str()) {
        Some(node) if !node.is_dir => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            node.content.clone(),
        )
            .into_response(),
        _ => fail(408),
    }
}

async fn delete(fs: &Fs, params: &HashMap<String, String>) -> Response {
    let Some(path) = params.get("path") else {
        return fail(101);
    };
    let mut nodes = fs.write().await;
    let Some(node) = nodes.get(path.as_str()) else {
        return fail(408);
    };

    let has_children = nodes.keys().any(|key| parent(key) == *path);
    if node.is_dir && has_children && params.get("recursive").map(String::as_str) != Some("true") {
        return fail(407);
    }

    nodes.retain(|key, _| key != path && !key.starts_with(&format!("{path}/")));
    Json(json!({"success": true})).into_response()
}

async fn create_folder(fs: &Fs, params: &HashMap<String, String>) -> Response {
    let (Some(folder_path), Some(name)) = (params.get("folder_path"), params.get("name")) else {
        return fail(101);
    };

    let mut nodes = fs.write().await;
    if !nodes.get(folder_path.as_str()).is_some_and(|node| node.is_dir) {
        if params.get("force_parent").map(String::as_str) != Some("true") {
            return fail(408);
        }
        create_chain(&mut nodes, folder_path);
    }

    let target = format!("{folder_path}/{name}");
    if nodes.contains_key(&target) {
        return fail(414);
    }
    nodes.insert(target.clone(), Node::dir());

    let additional = params.get("additional").map(String::as_str).unwrap_or("");
    let folder = entry_json(&target, &Node::dir(), additional);
    ok(json!({"folders": [folder]}))
}

/// Apply `offset`/`limit` the way the service pages results.
fn paginate(entries: Vec<Value>, params: &HashMap<String, String>) -> (usize, Vec<Value>) {
    let offset: usize = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let limit: usize = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(25);
    let page = entries.into_iter().skip(offset).take(limit).collect();
    (offset, page)
}

fn ok(data: Value) -> Response {
    Json(json!({"success": true, "data": data})).into_response()
}

fn fail(code: u32) -> Response {
    Json(json!({"success": false, "error": {"code": code}})).into_response()
}

fn depth(path: &str) -> usize {
    path.matches('/').count()
}

fn parent(path: &str) -> String {
    match path.rsplit_once('/') {
        Some(("", _)) => "/".to_string(),
        Some((parent, _)) => parent.to_string(),
        None => String::new(),
    }
}

fn name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Create every missing directory along `path`.
fn create_chain(nodes: &mut BTreeMap<String, Node>, path: &str) {
    let mut current = String::new();
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        current.push('/');
        current.push_str(segment);
        nodes.entry(current.clone()).or_insert_with(Node::dir);
    }
}

/// A list/share entry, with the requested capability fields attached.
fn entry_json(path: &str, node: &Node, additional: &str) -> Value {
    let mut entry = json!({
        "isdir": node.is_dir,
        "name": name_of(path),
        "path": path,
    });

    if !additional.is_empty() {
        let mut extra = serde_json::Map::new();
        for field in additional.split(',') {
            let value = match field {
                "real_path" => json!(path),
                "size" => json!(node.content.len()),
                "owner" => json!({"user": "admin", "uid": 1024, "group": "users", "gid": 100}),
                "time" => json!({"atime": 1700000000, "mtime": 1700000000, "ctime": 1700000000, "crtime": 1700000000}),
                "perm" => json!({"posix": 755}),
                "volume_status" => json!({"freespace": 1073741824u64, "totalspace": 2147483648u64, "readonly": false}),
                _ => continue,
            };
            extra.insert(field.to_string(), value);
        }
        entry["additional"] = Value::Object(extra);
    }
    entry
}
