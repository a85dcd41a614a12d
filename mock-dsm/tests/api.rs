use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_dsm::app;
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get_request(path: &str, query: &str) -> Request<String> {
    Request::builder()
        .uri(format!("{path}?{query}"))
        .body(String::new())
        .unwrap()
}

fn form_request(body: &str) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri("/webapi/entry.cgi")
        .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.to_string())
        .unwrap()
}

fn multipart_upload_request(fields: &[(&str, &str)], filename: &str, content: &str) -> Request<String> {
    let boundary = "mock-dsm-test";
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
         Content-Type: application/octet-stream\r\n\r\n{content}\r\n--{boundary}--\r\n"
    ));

    Request::builder()
        .method("POST")
        .uri("/webapi/entry.cgi")
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(body)
        .unwrap()
}

// --- envelope dispatch ---

#[tokio::test]
async fn info_getinfo_returns_success_envelope() {
    let resp = app()
        .oneshot(get_request(
            "/webapi/FileStation/info.cgi",
            "api=SYNO.FileStation.Info&version=1&method=getinfo",
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let envelope = body_json(resp).await;
    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["data"]["version_string"], "DSM 7.2-mock");
    assert_eq!(envelope["data"]["is_manager"], true);
}

#[tokio::test]
async fn unknown_api_returns_102() {
    let resp = app()
        .oneshot(get_request(
            "/webapi/entry.cgi",
            "api=SYNO.FileStation.Nope&version=1&method=list",
        ))
        .await
        .unwrap();

    let envelope = body_json(resp).await;
    assert_eq!(envelope["success"], false);
    assert_eq!(envelope["error"]["code"], 102);
}

#[tokio::test]
async fn unknown_method_returns_103() {
    let resp = app()
        .oneshot(get_request(
            "/webapi/entry.cgi",
            "api=SYNO.FileStation.List&version=1&method=frobnicate",
        ))
        .await
        .unwrap();

    let envelope = body_json(resp).await;
    assert_eq!(envelope["error"]["code"], 103);
}

#[tokio::test]
async fn missing_api_field_returns_101() {
    let resp = app()
        .oneshot(get_request("/webapi/entry.cgi", "version=1&method=list"))
        .await
        .unwrap();

    let envelope = body_json(resp).await;
    assert_eq!(envelope["error"]["code"], 101);
}

// --- list / shares ---

#[tokio::test]
async fn list_share_returns_seeded_shares() {
    let resp = app()
        .oneshot(get_request(
            "/webapi/entry.cgi",
            "api=SYNO.FileStation.List&version=1&method=list_share&limit=25&offset=0",
        ))
        .await
        .unwrap();

    let envelope = body_json(resp).await;
    assert_eq!(envelope["success"], true);
    let shares = envelope["data"]["shares"].as_array().unwrap();
    let names: Vec<&str> = shares.iter().map(|s| s["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["home", "photo"]);
    assert_eq!(envelope["data"]["total"], 2);
    // No capability string requested, so no additional object.
    assert!(shares[0].get("additional").is_none());
}

#[tokio::test]
async fn list_share_honors_capability_string() {
    let resp = app()
        .oneshot(get_request(
            "/webapi/entry.cgi",
            "api=SYNO.FileStation.List&version=1&method=list_share\
             &additional=real_path,owner,time,perm,volume_status",
        ))
        .await
        .unwrap();

    let envelope = body_json(resp).await;
    let share = &envelope["data"]["shares"][0];
    assert_eq!(share["additional"]["real_path"], "/home");
    assert!(share["additional"]["volume_status"]["freespace"].is_u64());
    assert_eq!(share["additional"]["owner"]["user"], "admin");
}

#[tokio::test]
async fn list_missing_folder_returns_408() {
    let resp = app()
        .oneshot(get_request(
            "/webapi/entry.cgi",
            "api=SYNO.FileStation.List&version=1&method=list&folder_path=/nope",
        ))
        .await
        .unwrap();

    let envelope = body_json(resp).await;
    assert_eq!(envelope["success"], false);
    assert_eq!(envelope["error"]["code"], 408);
}

// --- lifecycle over one router instance ---

#[tokio::test]
async fn folder_and_file_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create folder under /home
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "api=SYNO.FileStation.CreateFolder&version=1&method=create\
             &folder_path=%2Fhome&name=docs&force_parent=false&additional=",
        ))
        .await
        .unwrap();
    let envelope = body_json(resp).await;
    assert_eq!(envelope["success"], true);
    assert_eq!(envelope["data"]["folders"][0]["path"], "/home/docs");

    // duplicate create — 414
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "api=SYNO.FileStation.CreateFolder&version=1&method=create\
             &folder_path=%2Fhome&name=docs&force_parent=false&additional=",
        ))
        .await
        .unwrap();
    let envelope = body_json(resp).await;
    assert_eq!(envelope["error"]["code"], 414);

    // upload a file into the new folder
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(multipart_upload_request(
            &[
                ("api", "SYNO.FileStation.Upload"),
                ("version", "2"),
                ("method", "upload"),
                ("path", "/home/docs"),
                ("overwrite", "true"),
                ("create_parents", "true"),
                ("filename", "notes.txt"),
            ],
            "notes.txt",
            "hello mock",
        ))
        .await
        .unwrap();
    let envelope = body_json(resp).await;
    assert_eq!(envelope["success"], true, "upload failed: {envelope}");

    // list the folder — file shows up with its size
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request(
            "/webapi/entry.cgi",
            "api=SYNO.FileStation.List&version=1&method=list\
             &folder_path=%2Fhome%2Fdocs&additional=size",
        ))
        .await
        .unwrap();
    let envelope = body_json(resp).await;
    let files = envelope["data"]["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], "notes.txt");
    assert_eq!(files[0]["additional"]["size"], 10);

    // download it back
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request(
            "/webapi/entry.cgi",
            "api=SYNO.FileStation.Download&version=2&method=download\
             &path=%2Fhome%2Fdocs%2Fnotes.txt&mode=open",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    assert_eq!(&body[..], b"hello mock");

    // deleting the non-empty folder non-recursively is refused
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "api=SYNO.FileStation.Delete&version=1&method=delete\
             &path=%2Fhome%2Fdocs&recursive=false",
        ))
        .await
        .unwrap();
    let envelope = body_json(resp).await;
    assert_eq!(envelope["error"]["code"], 407);

    // delete the file, then the now-empty folder
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "api=SYNO.FileStation.Delete&version=1&method=delete\
             &path=%2Fhome%2Fdocs%2Fnotes.txt&recursive=false",
        ))
        .await
        .unwrap();
    let envelope = body_json(resp).await;
    assert_eq!(envelope["success"], true);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "api=SYNO.FileStation.Delete&version=1&method=delete\
             &path=%2Fhome%2Fdocs&recursive=false",
        ))
        .await
        .unwrap();
    let envelope = body_json(resp).await;
    assert_eq!(envelope["success"], true);

    // deleting again — 408
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(form_request(
            "api=SYNO.FileStation.Delete&version=1&method=delete\
             &path=%2Fhome%2Fdocs&recursive=false",
        ))
        .await
        .unwrap();
    let envelope = body_json(resp).await;
    assert_eq!(envelope["error"]["code"], 408);
}
