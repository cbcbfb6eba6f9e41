//! Loader tests
//!
//! Tests the HTTP and file sources against a canned local server and a
//! temporary file.
mod utils;

use std::path::PathBuf;
use std::time::Duration;
use studyscope_lib::{
    AppError, CatalogConfigBuilder, FileStudySource, HttpStudySource, StudySource,
};
use utils::{factories::SAMPLE_CSV, helpers::serve};

fn http_source(base_url: &str) -> HttpStudySource {
    let config = CatalogConfigBuilder::new()
        .base_url(base_url)
        .data_path("data/studies.csv")
        .request_timeout(Duration::from_secs(2))
        .build()
        .unwrap();
    HttpStudySource::from_config(&config).unwrap()
}

// ================================================================================================
// HTTP
// ================================================================================================

#[tokio::test]
async fn http_source_parses_the_served_table() {
    let server = serve(200, SAMPLE_CSV).await;
    let source = http_source(&server.base_url);
    assert!(source.url().as_str().ends_with("/data/studies.csv"));

    let records = source.load().await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["title"], "AI and Jobs");
    // Quoted commas stay inside the field
    assert_eq!(records[1]["title"], "Teachers, chatbots and trust");
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn non_success_status_is_a_transport_error() {
    let server = serve(404, "missing").await;
    let error = http_source(&server.base_url).load().await.unwrap_err();

    match error {
        AppError::TransportError(message) => assert!(message.contains("404"), "{}", message),
        other => panic!("expected TransportError, got {:?}", other),
    }
}

#[tokio::test]
async fn header_only_body_is_a_parse_error() {
    let server = serve(200, "id,title\n").await;
    let error = http_source(&server.base_url).load().await.unwrap_err();
    assert!(matches!(error, AppError::ParseError(_)));
    assert!(error.is_retryable());
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    let source = http_source("http://127.0.0.1:9/");
    let error = source.load().await.unwrap_err();
    assert!(matches!(error, AppError::TransportError(_)));
}

#[test]
fn invalid_base_url_is_a_config_error() {
    let result = CatalogConfigBuilder::new().base_url("not a url").build();
    assert!(matches!(result, Err(AppError::ConfigError(_))));
}

// ================================================================================================
// FILE
// ================================================================================================

fn temp_csv(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("studyscope-{}-{}.csv", name, uuid::Uuid::new_v4()));
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn file_source_reads_local_table() {
    let path = temp_csv("ok", SAMPLE_CSV);
    let source = FileStudySource::new(path.clone());

    let records = tokio_test::block_on(source.load()).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["metadata"], "subjects=economics");
    assert_eq!(source.describe(), path.display().to_string());

    std::fs::remove_file(path).ok();
}

#[test]
fn missing_file_is_a_transport_error() {
    let source = FileStudySource::new("/definitely/not/here/studies.csv");
    let error = tokio_test::block_on(source.load()).unwrap_err();
    assert!(matches!(error, AppError::TransportError(_)));
}
