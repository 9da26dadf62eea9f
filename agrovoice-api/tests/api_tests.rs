//! Integration tests for agrovoice-api endpoints
//!
//! Tests cover:
//! - Health endpoint
//! - POST /analyze/ success path (disease + advisory in the body)
//! - Voice-rendering failures staying invisible to the caller
//! - 500 with a non-empty error for unclassifiable payloads
//! - Temp upload cleanup on success and failure paths
//! - Dubverse client behavior on non-200 vendor responses

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::post,
    Router,
};
use serde_json::Value;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::util::ServiceExt; // for `oneshot` method

use agrovoice_api::{build_router, AppState};
use agrovoice_common::classifier::{ClassifierError, DiseaseClassifier};
use agrovoice_common::tts::{DubverseClient, TtsError};

/// Stub classifier: decodes the upload with the `image` crate and returns
/// a fixed label, so the "unclassifiable payload" path behaves like the
/// real model without needing a model file.
struct StubClassifier {
    label: &'static str,
}

impl DiseaseClassifier for StubClassifier {
    fn classify(&self, image_path: &Path) -> Result<String, ClassifierError> {
        if !image_path.exists() {
            return Err(ClassifierError::FileNotFound(
                image_path.display().to_string(),
            ));
        }
        image::open(image_path).map_err(|e| ClassifierError::ImageDecode(e.to_string()))?;
        Ok(self.label.to_string())
    }
}

/// Test helper: app with a stub classifier and the given TTS client
fn setup_app(label: &'static str, tts: DubverseClient, audio_output: PathBuf) -> Router {
    let state = AppState::new(Arc::new(StubClassifier { label }), tts, audio_output);
    build_router(state)
}

/// Test helper: app whose TTS client has no API key (voice disabled)
fn setup_app_no_tts(label: &'static str) -> Router {
    setup_app(label, DubverseClient::new(None), PathBuf::from("response.wav"))
}

/// Test helper: JPEG-encode a small leaf-green image
fn jpeg_fixture() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(32, 32, image::Rgb([40, 160, 60]));
    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, image::ImageFormat::Jpeg)
        .expect("Should encode fixture");
    buf.into_inner()
}

/// Test helper: multipart POST /analyze/ request with image + lang fields
fn analyze_request(image: &[u8], lang: Option<&str>) -> Request<Body> {
    let boundary = "agrovoice-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; \
             filename=\"leaf.jpg\"\r\nContent-Type: image/jpeg\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(image);
    body.extend_from_slice(format!("\r\n--{boundary}").as_bytes());
    if let Some(lang) = lang {
        body.extend_from_slice(
            format!("\r\nContent-Disposition: form-data; name=\"lang\"\r\n\r\n{lang}\r\n--{boundary}")
                .as_bytes(),
        );
    }
    body.extend_from_slice(b"--\r\n");

    Request::builder()
        .method("POST")
        .uri("/analyze/")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

/// Test helper: temp upload files currently in the working directory
fn temp_uploads() -> Vec<PathBuf> {
    std::fs::read_dir(".")
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.starts_with("temp_") && n.ends_with(".jpg"))
                .unwrap_or(false)
        })
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect()
}

// =============================================================================
// Health endpoint
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_app_no_tts("Healthy");

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "agrovoice-api");
    assert!(body["version"].is_string());
}

// =============================================================================
// POST /analyze/ success path
// =============================================================================

#[tokio::test]
async fn test_analyze_returns_disease_and_advisory() {
    let app = setup_app_no_tts("Black Rot");

    let response = app
        .oneshot(analyze_request(&jpeg_fixture(), Some("en")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["disease"], "Black Rot");
    assert!(body["advisory"].as_str().unwrap().contains("Mancozeb"));
}

#[tokio::test]
async fn test_analyze_localizes_advisory() {
    let app = setup_app_no_tts("Healthy");

    let response = app
        .oneshot(analyze_request(&jpeg_fixture(), Some("mr")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["disease"], "Healthy");
    assert_eq!(body["advisory"], "पान निरोगी आहे. काही करण्याची गरज नाही.");
}

#[tokio::test]
async fn test_analyze_unknown_label_gets_not_recognized() {
    // Label outside the advisory table falls back per language
    let app = setup_app_no_tts("Powdery Mildew");

    let response = app
        .oneshot(analyze_request(&jpeg_fixture(), Some("hi")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["advisory"], "रोग की पहचान नहीं हुई।");
}

// =============================================================================
// Voice failures must not affect the response
// =============================================================================

#[tokio::test]
async fn test_missing_api_key_does_not_affect_response() {
    // setup_app_no_tts has no key: every speak() call fails internally
    let app = setup_app_no_tts("Esca");

    let response = app
        .oneshot(analyze_request(&jpeg_fixture(), Some("en")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["disease"], "Esca");
    assert!(body["advisory"].as_str().unwrap().contains("fungicide"));
}

#[tokio::test]
async fn test_vendor_error_does_not_affect_response() {
    // Local stand-in vendor that always rejects the TTS call
    let vendor = Router::new().route(
        "/api/tts",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "vendor down") }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, vendor).await.unwrap();
    });

    let tts = DubverseClient::new(Some("test-key".to_string()))
        .with_base_url(format!("http://{}", addr));
    let dir = tempfile::tempdir().unwrap();
    let app = setup_app("Leaf Blight", tts, dir.path().join("response.wav"));

    let response = app
        .oneshot(analyze_request(&jpeg_fixture(), Some("en")))
        .await
        .unwrap();

    // Voice failure is logged and swallowed; the caller sees only the
    // classification result
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["disease"], "Leaf Blight");
    assert!(body["advisory"].as_str().unwrap().contains("copper"));
}

// =============================================================================
// Failure paths
// =============================================================================

#[tokio::test]
async fn test_non_image_payload_returns_500() {
    let app = setup_app_no_tts("Healthy");

    let response = app
        .oneshot(analyze_request(b"definitely not a jpeg", Some("en")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = extract_json(response.into_body()).await;
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_lang_field_returns_500() {
    let app = setup_app_no_tts("Healthy");

    let response = app
        .oneshot(analyze_request(&jpeg_fixture(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("lang"));
}

#[tokio::test]
async fn test_unsupported_lang_returns_500() {
    let app = setup_app_no_tts("Healthy");

    let response = app
        .oneshot(analyze_request(&jpeg_fixture(), Some("fr")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("fr"));
}

// =============================================================================
// Temp upload cleanup (serialized: these scan the working directory)
// =============================================================================

#[tokio::test]
#[serial_test::serial]
async fn test_temp_upload_removed_after_success() {
    let before = temp_uploads();

    let app = setup_app_no_tts("Healthy");
    let response = app
        .oneshot(analyze_request(&jpeg_fixture(), Some("en")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(temp_uploads(), before, "temp upload left behind");
}

#[tokio::test]
#[serial_test::serial]
async fn test_temp_upload_removed_after_classifier_failure() {
    let before = temp_uploads();

    let app = setup_app_no_tts("Healthy");
    let response = app
        .oneshot(analyze_request(b"garbage bytes", Some("en")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(temp_uploads(), before, "temp upload left behind on error");
}

// =============================================================================
// Dubverse client against a local stand-in vendor
// =============================================================================

#[tokio::test]
async fn test_dubverse_non_200_reported_with_status_and_body() {
    let vendor = Router::new().route(
        "/api/tts",
        post(|| async { (StatusCode::UNAUTHORIZED, "bad key") }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, vendor).await.unwrap();
    });

    let client = DubverseClient::new(Some("wrong-key".to_string()))
        .with_base_url(format!("http://{}", addr));

    let err = client.synthesize("hello", 184).await.unwrap_err();
    match err {
        TtsError::ApiError(status, body) => {
            assert_eq!(status, 401);
            assert_eq!(body, "bad key");
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_dubverse_success_returns_audio_bytes() {
    let vendor = Router::new().route(
        "/api/tts",
        post(|| async { (StatusCode::OK, b"RIFFfake-wav-bytes".to_vec()) }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, vendor).await.unwrap();
    });

    let client = DubverseClient::new(Some("test-key".to_string()))
        .with_base_url(format!("http://{}", addr));

    let audio = client.synthesize("hello", 184).await.unwrap();
    assert_eq!(audio, b"RIFFfake-wav-bytes");
}
