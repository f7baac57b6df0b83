mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::StatusCode;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use common::{provider_set, FileRenderer, RecordingLLM, StubCloud, StubCompanyProvider, StubMailer, StubSearchProvider};
use company_research::api::{build_router, AppState};
use company_research::config::AppConfig;
use company_research::models::ProviderKind;
use company_research::providers::ProviderSet;
use company_research::sinks::{CloudStore, DriveFile, Mailer};

fn config(env: &[(&str, &str)]) -> AppConfig {
    let env: Vec<(String, String)> = env.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    AppConfig::from_lookup(move |key| env.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone()))
}

fn stub_providers() -> ProviderSet {
    provider_set(
        StubCompanyProvider::ok(ProviderKind::Apollo, json!({"organization": {"name": "Acme Corp"}})),
        StubCompanyProvider::ok(ProviderKind::CoreSignal, json!({"company_name": "Acme CS"})),
        StubSearchProvider::new(Vec::new()),
    )
}

fn create_test_state(
    dir: &TempDir,
    cloud: Option<Arc<dyn CloudStore>>,
    mailer: Option<Arc<dyn Mailer>>,
) -> AppState {
    AppState {
        config: Arc::new(config(&[("GOOGLE_DRIVE_INTERFACE_FOLDER_ID", "interface-folder")])),
        providers: stub_providers(),
        llm: Some(RecordingLLM::new("# Acme Corp\n\nReport")),
        renderer: FileRenderer::new(dir.path(), 256),
        cloud,
        mailer,
    }
}

fn app(state: &AppState) -> axum::Router {
    build_router(state.clone())
}

fn make_request(method: &str, uri: &str, body: Option<Value>) -> axum::http::Request<Body> {
    let builder = axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");

    match body {
        Some(b) => builder.body(Body::from(serde_json::to_string(&b).unwrap())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn response_json(response: axum::http::Response<Body>) -> Value {
    let (parts, body) = response.into_parts();
    let bytes = body.collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        panic!("Empty response body. Status: {}, Headers: {:?}", parts.status, parts.headers);
    }
    serde_json::from_slice(&bytes)
        .unwrap_or_else(|e| panic!("JSON parse error: {}. Body: {:?}", e, String::from_utf8_lossy(&bytes)))
}

#[tokio::test]
async fn test_health_reports_capabilities() {
    let dir = TempDir::new().unwrap();
    let state = create_test_state(&dir, None, Some(StubMailer::succeeding()));

    let response = app(&state).oneshot(make_request("GET", "/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["api_availability"]["apollo"], true);
    assert_eq!(body["api_availability"]["llm"], true);
    assert_eq!(body["google_drive_available"], false);
    assert_eq!(body["email_configured"], true);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_with_nothing_configured() {
    let dir = TempDir::new().unwrap();
    let state = AppState {
        config: Arc::new(config(&[("GOOGLE_SERVICE_ACCOUNT_FILE", "/nonexistent/sa.json")])),
        providers: ProviderSet::default(),
        llm: None,
        renderer: FileRenderer::new(dir.path(), 1),
        cloud: None,
        mailer: None,
    };

    let body = response_json(app(&state).oneshot(make_request("GET", "/api/health", None)).await.unwrap()).await;

    assert_eq!(body["api_availability"]["coresignal"], false);
    assert_eq!(body["api_availability"]["tavily"], false);
    assert_eq!(body["api_availability"]["llm"], false);
    assert_eq!(body["email_configured"], false);
    assert_eq!(body["service_account_exists"], false);
}

#[tokio::test]
async fn test_research_with_email_returns_json() {
    let dir = TempDir::new().unwrap();
    let mailer = StubMailer::succeeding();
    let state = create_test_state(&dir, Some(StubCloud::succeeding()), Some(mailer.clone()));

    let req = make_request("POST", "/api/multi-source-research", Some(json!({
        "domain": "acme.com",
        "email": "ceo@example.com",
        "upload_to_drive": true,
        "upload_to_drive_folder_id": "folder-1",
        "return_data": true
    })));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["company_name"], "Acme Corp");
    assert_eq!(body["email_sent"], true);
    assert_eq!(body["google_drive"]["success"], true);
    assert_eq!(body["raw_data"]["coresignal_data"]["company_name"], "Acme CS");
    assert_eq!(mailer.sent().len(), 1);
}

#[tokio::test]
async fn test_research_without_sinks_streams_pdf() {
    let dir = TempDir::new().unwrap();
    let state = create_test_state(&dir, None, None);

    let req = make_request("POST", "/api/multi-source-research", Some(json!({"domain": "acme.com"})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/pdf");
    let disposition = response.headers()["content-disposition"].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment; filename=\"Acme_Corp_multi_source_report_"));
    assert!(response.headers().get("x-drive-upload-error").is_none());

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(bytes.len(), 256);
}

#[tokio::test]
async fn test_failed_upload_is_reported_in_header() {
    let dir = TempDir::new().unwrap();
    let state = create_test_state(&dir, Some(StubCloud::failing()), None);

    let req = make_request("POST", "/api/multi-source-research", Some(json!({
        "domain": "acme.com",
        "upload_to_drive": true,
        "upload_to_drive_folder_id": "folder-1"
    })));
    let response = app(&state).oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-drive-upload-error"], "Drive upload returned 403");
}

#[tokio::test]
async fn test_provider_failure_maps_to_bad_gateway() {
    let dir = TempDir::new().unwrap();
    let mut state = create_test_state(&dir, None, None);
    state.providers = provider_set(
        StubCompanyProvider::failing(ProviderKind::Apollo, "apollo returned HTTP 500"),
        StubCompanyProvider::ok(ProviderKind::CoreSignal, json!({})),
        StubSearchProvider::new(Vec::new()),
    );

    let req = make_request("POST", "/api/multi-source-research", Some(json!({"domain": "acme.com"})));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = response_json(response).await;
    assert_eq!(body["error_type"], "UpstreamError");
    assert!(body["error"].as_str().unwrap().contains("apollo returned HTTP 500"));
}

#[tokio::test]
async fn test_missing_llm_is_service_unavailable() {
    let dir = TempDir::new().unwrap();
    let mut state = create_test_state(&dir, None, None);
    state.llm = None;

    let req = make_request("POST", "/api/multi-source-research", Some(json!({"domain": "acme.com"})));
    let response = app(&state).oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response_json(response).await["error_type"], "ConfigurationError");
}

#[tokio::test]
async fn test_background_research_acknowledges_immediately() {
    let dir = TempDir::new().unwrap();
    let state = create_test_state(&dir, Some(StubCloud::succeeding()), Some(StubMailer::succeeding()));

    let req = make_request("POST", "/api/multi-source-research-background", Some(json!({
        "website": "https://www.acme.com/",
        "email": "ceo@example.com"
    })));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["status"], "processing");
    assert_eq!(body["domain"], "https://www.acme.com/");
    assert_eq!(body["email"], "ceo@example.com");
    assert_eq!(body["estimated_time"], "5-10 minutes");
    assert!(!body["job_id"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_background_requires_email() {
    let dir = TempDir::new().unwrap();
    let state = create_test_state(&dir, None, None);

    let req = make_request("POST", "/api/coresignal/generate-pdf-background", Some(json!({
        "website": "acme.com",
        "email": "  "
    })));
    let response = app(&state).oneshot(req).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_background_run_uploads_to_interface_folder() {
    // The detached task runs the same code path; drive it directly.
    let dir = TempDir::new().unwrap();
    let cloud = StubCloud::succeeding();
    let mailer = StubMailer::succeeding();
    let state = create_test_state(&dir, Some(cloud.clone()), Some(mailer.clone()));
    let options = company_research::pipeline::DeliveryOptions {
        email: Some("ceo@example.com".into()),
        upload: true,
        folder_id: state.config.drive.interface_folder_id.clone(),
        return_data: false,
    };

    let report = company_research::api::jobs::run_report(
        &state,
        company_research::pipeline::ReportKind::MultiSource,
        "acme.com",
        &options,
    )
    .await
    .unwrap();

    assert!(report.upload.unwrap().success);
    assert_eq!(cloud.uploads.lock().unwrap()[0].1, "interface-folder");
    assert_eq!(mailer.sent()[0].to, "ceo@example.com");
}

#[tokio::test]
async fn test_coresignal_report_with_email() {
    let dir = TempDir::new().unwrap();
    let state = create_test_state(&dir, None, Some(StubMailer::succeeding()));

    let req = make_request("POST", "/api/coresignal/generate-pdf", Some(json!({
        "website": "acme.com",
        "email": "ceo@example.com"
    })));
    let response = app(&state).oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["company_name"], "Acme CS");
    assert_eq!(body["website"], "https://acme.com");
    assert!(body["pdf_filename"].as_str().unwrap().starts_with("Acme_CS_coresignal_report_"));
}

#[tokio::test]
async fn test_drive_files_requires_configured_store() {
    let dir = TempDir::new().unwrap();
    let state = create_test_state(&dir, None, None);

    let response = app(&state).oneshot(make_request("GET", "/api/drive-files", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_drive_files_lists_interface_folder() {
    let dir = TempDir::new().unwrap();
    let cloud = StubCloud::with_files(vec![DriveFile {
        id: "f1".into(),
        name: "Acme_Corp_multi_source_report_20240101_000000.pdf".into(),
        mime_type: Some("application/pdf".into()),
        size: Some("2048".into()),
        created_time: None,
        modified_time: None,
        web_view_link: Some("https://drive.example.com/f1".into()),
        web_content_link: None,
    }]);
    let state = create_test_state(&dir, Some(cloud), None);

    let response = app(&state).oneshot(make_request("GET", "/api/drive-files", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = response_json(response).await;
    assert_eq!(body["folder_id"], "interface-folder");
    assert_eq!(body["file_count"], 1);
    assert_eq!(body["files"][0]["mimeType"], "application/pdf");
    assert_eq!(body["files"][0]["webViewLink"], "https://drive.example.com/f1");
}

#[tokio::test]
async fn test_drive_files_without_any_folder_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let mut state = create_test_state(&dir, Some(StubCloud::succeeding()), None);
    state.config = Arc::new(config(&[]));

    let response = app(&state).oneshot(make_request("GET", "/api/drive-files", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
