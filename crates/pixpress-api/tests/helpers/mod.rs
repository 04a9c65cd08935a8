//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p pixpress-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use pixpress_api::setup::{build_state, routes};
use pixpress_api::AppState;
use pixpress_core::Config;
use std::sync::Arc;

pub const CLIENT_IP: &str = "203.0.113.10";
pub const OTHER_IP: &str = "198.51.100.99";

/// Test application: server plus direct access to state (workspace, registry).
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config() -> Config {
    Config {
        heif_convert_path: "pixpress-test-missing-heif-convert".to_string(),
        ..Config::default()
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(test_config()).await
}

pub async fn setup_test_app_with(config: Config) -> TestApp {
    let state = build_state(config)
        .await
        .expect("Failed to build application state");
    let router =
        routes::setup_routes(&state.config, state.clone()).expect("Failed to set up routes");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp { server, state }
}

pub fn files_form(files: &[(&str, Vec<u8>)]) -> MultipartForm {
    files.iter().fold(MultipartForm::new(), |form, (name, data)| {
        form.add_part(
            "files",
            Part::bytes(bytes::Bytes::from(data.clone())).file_name(name.to_string()),
        )
    })
}

/// Upload files and return the `files` array of the response.
pub async fn upload(client: &TestServer, files: &[(&str, Vec<u8>)]) -> Vec<serde_json::Value> {
    let response = client.post("/photo/upload").multipart(files_form(files)).await;
    assert_eq!(response.status_code(), 200, "{}", response.text());

    let body: serde_json::Value = response.json();
    body["files"].as_array().cloned().unwrap_or_default()
}

pub async fn compress_as(
    client: &TestServer,
    ip: &str,
    handles: Vec<serde_json::Value>,
    max_width: u32,
    max_height: u32,
) -> TestResponse {
    client
        .post("/photo/compress")
        .add_header("X-Real-IP", ip)
        .json(&serde_json::json!({
            "files": handles,
            "max_width": max_width,
            "max_height": max_height,
        }))
        .await
}

/// Upload then compress from [`CLIENT_IP`]; returns the `compressed_files` array.
pub async fn upload_and_compress(
    client: &TestServer,
    files: &[(&str, Vec<u8>)],
    max_width: u32,
    max_height: u32,
) -> Vec<serde_json::Value> {
    let handles = upload(client, files).await;
    let response = compress_as(client, CLIENT_IP, handles, max_width, max_height).await;
    assert_eq!(response.status_code(), 200, "{}", response.text());

    let body: serde_json::Value = response.json();
    body["compressed_files"].as_array().cloned().unwrap_or_default()
}

pub async fn download_as(client: &TestServer, ip: &str, filename: &str) -> TestResponse {
    client
        .get(&format!("/photo/download/{}", filename))
        .add_header("X-Real-IP", ip)
        .await
}
