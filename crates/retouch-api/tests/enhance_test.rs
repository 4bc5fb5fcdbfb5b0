//! Enhance endpoint integration tests.
//!
//! Run with: `cargo test -p retouch-api --test enhance_test`.
//! Each test gets an isolated temp data directory and a mock pipeline script.

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::{setup_test_app, setup_test_app_with_timeout, MockPipeline};

fn png_upload() -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(helpers::fixtures::create_minimal_png())
            .file_name("cat.png")
            .mime_type("image/png"),
    )
}

#[tokio::test]
async fn test_enhance_full_mode_happy_path() {
    let app = setup_test_app(MockPipeline::Succeed).await;

    let response = app.server.post("/api/enhance").multipart(png_upload()).await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["skipEsrgan"], false);

    let filename = body["filename"].as_str().unwrap();
    assert!(filename.ends_with("_cat_enhanced.png"), "got {}", filename);
    assert_eq!(
        body["downloadUrl"].as_str().unwrap(),
        format!("/api/download/{}", filename)
    );

    // The artifact is downloadable and carries the original bytes (the mock
    // copies the input).
    let download = app
        .server
        .get(&format!("/api/download/{}", filename))
        .await;
    assert_eq!(download.status_code(), 200);
    assert_eq!(
        download.as_bytes().to_vec(),
        helpers::fixtures::create_minimal_png()
    );

    // Cleanup invariant: nothing left in the input directory.
    assert!(app.input_entries().is_empty());
}

#[tokio::test]
async fn test_enhance_skip_esrgan_expects_restored_name() {
    let app = setup_test_app(MockPipeline::Succeed).await;

    let form = png_upload().add_text("skipEsrgan", "true");
    let response = app.server.post("/api/enhance").multipart(form).await;
    assert_eq!(response.status_code(), 200);

    let body: serde_json::Value = response.json();
    assert_eq!(body["skipEsrgan"], true);
    let filename = body["filename"].as_str().unwrap();
    assert!(filename.ends_with("_cat_restored.png"), "got {}", filename);

    assert!(app.input_entries().is_empty());
}

#[tokio::test]
async fn test_enhance_missing_output_is_contract_violation() {
    let app = setup_test_app(MockPipeline::WriteNothing).await;

    let response = app.server.post("/api/enhance").multipart(png_upload()).await;
    assert_eq!(response.status_code(), 500);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Output file not found");
    assert_eq!(body["code"], "ARTIFACT_MISSING");

    assert!(app.input_entries().is_empty());
}

#[tokio::test]
async fn test_enhance_pipeline_failure_surfaces_diagnostics() {
    let app = setup_test_app(MockPipeline::Fail).await;

    let response = app.server.post("/api/enhance").multipart(png_upload()).await;
    assert_eq!(response.status_code(), 500);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Enhancement failed");
    assert_eq!(body["code"], "PIPELINE_FAILED");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("no face detected"));

    assert!(app.input_entries().is_empty());
}

#[tokio::test]
async fn test_enhance_timeout_returns_504_and_cleans_up() {
    let app = setup_test_app_with_timeout(MockPipeline::Hang, 1).await;

    let response = app.server.post("/api/enhance").multipart(png_upload()).await;
    assert_eq!(response.status_code(), 504);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "PIPELINE_TIMEOUT");

    assert!(app.input_entries().is_empty());
}

#[tokio::test]
async fn test_enhance_rejects_disallowed_extension_without_write() {
    let app = setup_test_app(MockPipeline::Succeed).await;

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(b"GIF89a".to_vec())
            .file_name("cat.gif")
            .mime_type("image/gif"),
    );
    let response = app.server.post("/api/enhance").multipart(form).await;
    assert_eq!(response.status_code(), 400);

    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");

    // Rejected before any filesystem write.
    assert!(app.input_entries().is_empty());
    assert!(std::fs::read_dir(app.output_dir()).unwrap().next().is_none());
}

#[tokio::test]
async fn test_enhance_without_file_field_is_invalid_input() {
    let app = setup_test_app(MockPipeline::Succeed).await;

    let form = MultipartForm::new().add_text("skipEsrgan", "false");
    let response = app.server.post("/api/enhance").multipart(form).await;
    assert_eq!(response.status_code(), 400);

    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "No file provided");
}

#[tokio::test]
async fn test_client_disconnect_still_cleans_up_input() {
    let app = setup_test_app(MockPipeline::Hang).await;

    // A client that gives up mid-pipeline drops the request future.
    let request = app.server.post("/api/enhance").multipart(png_upload());
    let outcome = tokio::time::timeout(std::time::Duration::from_millis(1500), request).await;
    assert!(outcome.is_err(), "hanging pipeline should outlive the client");

    // The input guard spawns the deletion; poll until it lands.
    for _ in 0..50 {
        if app.input_entries().is_empty() {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }
    assert!(
        app.input_entries().is_empty(),
        "input files left behind: {:?}",
        app.input_entries()
    );
}

#[tokio::test]
async fn test_concurrent_enhances_with_same_name_do_not_collide() {
    let app = setup_test_app(MockPipeline::Succeed).await;

    let (a, b) = tokio::join!(
        app.server.post("/api/enhance").multipart(png_upload()),
        app.server.post("/api/enhance").multipart(png_upload())
    );
    assert_eq!(a.status_code(), 200);
    assert_eq!(b.status_code(), 200);

    let a_name = a.json::<serde_json::Value>()["filename"]
        .as_str()
        .unwrap()
        .to_string();
    let b_name = b.json::<serde_json::Value>()["filename"]
        .as_str()
        .unwrap()
        .to_string();
    assert_ne!(a_name, b_name);

    assert!(app.input_entries().is_empty());
}
