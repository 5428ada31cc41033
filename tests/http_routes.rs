//! HTTP Route Tests
//!
//! Drives the outpass router in-process: form submission, status page,
//! warden action links, and the plain-text failure path.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use outpass::explain::StaticExplainer;
use outpass::http_server::{HttpServer, HttpServerConfig};
use outpass::notify::RecordingNotifier;
use outpass::store::{RecordStore, RequestStatus};
use outpass::workflow::{OutpassWorkflow, WorkflowSettings};
use tempfile::TempDir;
use tower::ServiceExt;

struct App {
    temp_dir: TempDir,
    notifier: Arc<RecordingNotifier>,
    router: Router,
}

impl App {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let notifier = Arc::new(RecordingNotifier::new());
        let workflow = OutpassWorkflow::open(
            RecordStore::open(temp_dir.path().join("outpass_requests.json")),
            Arc::new(StaticExplainer::new("Requesting leave for a medical appointment.")),
            notifier.clone(),
            WorkflowSettings {
                approver_email: "warden@example.com".to_string(),
                base_url: "http://hostel.example".to_string(),
            },
        )
        .unwrap();

        let router = HttpServer::new(HttpServerConfig::default(), Arc::new(workflow)).router();

        Self {
            temp_dir,
            notifier,
            router,
        }
    }

    fn store(&self) -> RecordStore {
        RecordStore::open(self.temp_dir.path().join("outpass_requests.json"))
    }

    async fn get(&self, uri: &str) -> (StatusCode, Option<String>, String) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn post_form(&self, body: &str) -> (StatusCode, Option<String>, String) {
        let request = Request::builder()
            .method("POST")
            .uri("/submit_form")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Option<String>, String) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, location, String::from_utf8(bytes.to_vec()).unwrap())
    }
}

const MEDICAL_FORM: &str = "studentName=Asha+Kumar&rollNumber=21CS042&studentMobile=9000000001\
&parentMobile=9000000002&reason=medical+appointment&studentEmail=asha%40example.com";

#[tokio::test(flavor = "multi_thread")]
async fn test_home_renders_form() {
    let app = App::new();
    let (status, _, body) = app.get("/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("action=\"/submit_form\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_health() {
    let app = App::new();
    let (status, _, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"ok\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_redirects_to_status() {
    let app = App::new();
    let (status, location, _) = app.post_form(MEDICAL_FORM).await;

    assert!(status.is_redirection());
    assert_eq!(location.as_deref(), Some("/status"));

    let persisted = app.store().load_all().unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].student_name, "Asha Kumar");
    assert_eq!(persisted[0].student_email, "asha@example.com");
    assert_eq!(persisted[0].status, RequestStatus::Pending);

    let sent = app.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains("http://hostel.example/approve/0"));
    assert!(sent[0].body.contains("http://hostel.example/reject/0"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_with_missing_fields_is_accepted() {
    let app = App::new();
    let (status, _, _) = app.post_form("reason=home+visit").await;

    assert!(status.is_redirection());
    let persisted = app.store().load_all().unwrap();
    assert_eq!(persisted[0].reason, "home visit");
    assert_eq!(persisted[0].student_name, "");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_lists_requests() {
    let app = App::new();
    app.post_form(MEDICAL_FORM).await;
    app.post_form("studentName=%3Cb%3ERavi%3C%2Fb%3E&reason=family+function")
        .await;

    let (status, _, body) = app.get("/status").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Asha Kumar"));
    assert!(body.contains("&lt;b&gt;Ravi&lt;/b&gt;"));
    assert!(body.contains("2 request(s), 2 pending."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_approve_link_updates_status() {
    let app = App::new();
    app.post_form(MEDICAL_FORM).await;

    let (status, location, _) = app.get("/approve/0").await;
    assert!(status.is_redirection());
    assert_eq!(location.as_deref(), Some("/status"));

    assert_eq!(app.store().load_all().unwrap()[0].status, RequestStatus::Approved);

    let student_email = app.notifier.sent().pop().unwrap();
    assert_eq!(student_email.recipients, vec!["asha@example.com"]);
    assert!(student_email.body.contains("approved"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_reject_after_approve_is_ignored() {
    let app = App::new();
    app.post_form(MEDICAL_FORM).await;
    app.get("/approve/0").await;

    let (status, _, _) = app.get("/reject/0").await;

    assert!(status.is_redirection());
    assert_eq!(app.store().load_all().unwrap()[0].status, RequestStatus::Approved);
    assert_eq!(app.notifier.sent_count(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_out_of_range_link_redirects_without_change() {
    let app = App::new();
    app.post_form(MEDICAL_FORM).await;

    let (status, location, _) = app.get("/reject/5").await;

    assert!(status.is_redirection());
    assert_eq!(location.as_deref(), Some("/status"));
    assert_eq!(app.store().load_all().unwrap()[0].status, RequestStatus::Pending);
    assert_eq!(app.notifier.sent_count(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_oversized_index_redirects_without_change() {
    let app = App::new();
    app.post_form(MEDICAL_FORM).await;

    let (status, location, _) = app.get("/approve/99999999999999999999999").await;

    assert!(status.is_redirection());
    assert_eq!(location.as_deref(), Some("/status"));
    assert_eq!(app.store().load_all().unwrap()[0].status, RequestStatus::Pending);
    assert_eq!(app.notifier.sent_count(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_non_numeric_index_is_not_found() {
    let app = App::new();
    let (status, _, _) = app.get("/approve/abc").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_without_body_or_content_type_is_accepted() {
    let app = App::new();
    let request = Request::builder()
        .method("POST")
        .uri("/submit_form")
        .body(Body::empty())
        .unwrap();

    let (status, location, _) = app.send(request).await;

    assert!(status.is_redirection());
    assert_eq!(location.as_deref(), Some("/status"));
    let persisted = app.store().load_all().unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].student_name, "");
    assert_eq!(persisted[0].status, RequestStatus::Pending);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_with_repeated_field_keeps_first_value() {
    let app = App::new();
    let (status, _, _) = app.post_form("reason=a&reason=b&studentName=Ravi").await;

    assert!(status.is_redirection());
    let persisted = app.store().load_all().unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].reason, "a");
    assert_eq!(persisted[0].student_name, "Ravi");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_submit_failure_is_plain_text_error() {
    let app = App::new();
    // A directory on the temp path makes the save fail
    std::fs::create_dir(app.temp_dir.path().join("outpass_requests.json.tmp")).unwrap();

    let (status, location, body) = app.post_form(MEDICAL_FORM).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(location.is_none());
    assert!(body.starts_with("An error occurred: "));
    assert_eq!(app.notifier.sent_count(), 0);
}
