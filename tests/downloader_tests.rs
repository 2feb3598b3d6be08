//! Mock HTTP tests for CaptureDownloader.

use std::path::Path;

use dc_download::api::{DcClient, RetryPolicy};
use dc_download::capture::{CaptureRecord, DownloadRequest};
use dc_download::cli::ResolutionTier;
use dc_download::downloader::{CaptureDownloader, DownloadError, DownloadOutcome};
use dc_download::filename::FilenameFields;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const IMAGE_BYTES: &[u8] = b"\xff\xd8\xff\xe0fake-jpeg-bytes";

fn create_test_client(server: &MockServer) -> DcClient {
    DcClient::with_base_urls(
        "test-token".to_string(),
        server.uri(),
        server.uri(),
        None,
    )
    .expect("Failed to create test client")
}

fn record(image_id: &str) -> CaptureRecord {
    CaptureRecord {
        image_id: image_id.to_string(),
        capture_uuid: format!("uuid-{}", image_id),
        sort_key: "0001".to_string(),
    }
}

fn request(image_id: &str, tier: ResolutionTier, output: &Path) -> DownloadRequest {
    DownloadRequest::new(&record(image_id), tier, FilenameFields::default(), output)
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_download_writes_body_verbatim() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("id", "5001"))
        .and(query_param("t", "b"))
        .and(header("Authorization", "Token token=test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(IMAGE_BYTES.to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let outcome = CaptureDownloader::new(&client, RetryPolicy::immediate(4))
        .download(&request("5001", ResolutionTier::CroppedThumbnail, output.path()))
        .await;

    let expected = output.path().join("0001.5001.uuid-5001.jpeg");
    match outcome {
        DownloadOutcome::Saved { path, attempts } => {
            assert_eq!(path, expected);
            assert_eq!(attempts, 1);
        }
        other => panic!("Expected Saved, got {:?}", other),
    }
    assert_eq!(std::fs::read(&expected).unwrap(), IMAGE_BYTES);
    assert_eq!(file_names(output.path()), vec!["0001.5001.uuid-5001.jpeg"]);
}

#[tokio::test]
async fn test_full_tiff_tier_writes_tif_file() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("t", "T"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"II*\x00tiff".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let outcome = CaptureDownloader::new(&client, RetryPolicy::immediate(4))
        .download(&request("5002", ResolutionTier::FullTiff, output.path()))
        .await;

    assert!(outcome.is_saved());
    assert_eq!(file_names(output.path()), vec!["0001.5002.uuid-5002.tif"]);
}

#[tokio::test]
async fn test_existing_file_is_replaced() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let dest = output.path().join("0001.5003.uuid-5003.jpeg");
    std::fs::write(&dest, b"stale contents that are longer than the new body").unwrap();

    Mock::given(method("GET"))
        .and(path("/index.php"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(IMAGE_BYTES.to_vec()))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let outcome = CaptureDownloader::new(&client, RetryPolicy::immediate(4))
        .download(&request("5003", ResolutionTier::CroppedThumbnail, output.path()))
        .await;

    assert!(outcome.is_saved());
    assert_eq!(std::fs::read(&dest).unwrap(), IMAGE_BYTES);
}

#[tokio::test]
async fn test_three_failures_then_success_matches_first_try() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/index.php"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(3)
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(IMAGE_BYTES.to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let outcome = CaptureDownloader::new(&client, RetryPolicy::immediate(4))
        .download(&request("5004", ResolutionTier::CroppedThumbnail, output.path()))
        .await;

    match outcome {
        DownloadOutcome::Saved { attempts, .. } => assert_eq!(attempts, 4),
        other => panic!("Expected Saved, got {:?}", other),
    }
    assert_eq!(file_names(output.path()), vec!["0001.5004.uuid-5004.jpeg"]);
    assert_eq!(
        std::fs::read(output.path().join("0001.5004.uuid-5004.jpeg")).unwrap(),
        IMAGE_BYTES
    );
}

#[tokio::test]
async fn test_four_failures_abandons_capture_and_writes_nothing() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/index.php"))
        .respond_with(ResponseTemplate::new(503))
        .expect(4)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let outcome = CaptureDownloader::new(&client, RetryPolicy::immediate(4))
        .download(&request("5005", ResolutionTier::CroppedThumbnail, output.path()))
        .await;

    match outcome {
        DownloadOutcome::Failed {
            attempts,
            last_error,
        } => {
            assert_eq!(attempts, 4);
            // The reported status is the image request's own status.
            assert_eq!(last_error.status(), Some(reqwest::StatusCode::SERVICE_UNAVAILABLE));
            assert!(matches!(last_error, DownloadError::Api(_)));
        }
        other => panic!("Expected Failed, got {:?}", other),
    }
    assert!(file_names(output.path()).is_empty());
}

#[tokio::test]
async fn test_failure_on_one_capture_does_not_affect_the_next() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("id", "bad"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("id", "good"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(IMAGE_BYTES.to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let downloader = CaptureDownloader::new(&client, RetryPolicy::immediate(2));

    let first = downloader
        .download(&request("bad", ResolutionTier::CroppedThumbnail, output.path()))
        .await;
    let second = downloader
        .download(&request("good", ResolutionTier::CroppedThumbnail, output.path()))
        .await;

    assert!(!first.is_saved());
    assert!(second.is_saved());
    assert_eq!(file_names(output.path()), vec!["0001.good.uuid-good.jpeg"]);
}

#[tokio::test]
async fn test_write_failure_is_reported_as_io_error() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let missing = output.path().join("gone");

    Mock::given(method("GET"))
        .and(path("/index.php"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(IMAGE_BYTES.to_vec()))
        .expect(2)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let outcome = CaptureDownloader::new(&client, RetryPolicy::immediate(2))
        .download(&request("5006", ResolutionTier::CroppedThumbnail, &missing))
        .await;

    match outcome {
        DownloadOutcome::Failed { last_error, .. } => {
            assert!(matches!(last_error, DownloadError::Io(_)));
            assert_eq!(last_error.status(), None);
        }
        other => panic!("Expected Failed, got {:?}", other),
    }
    assert!(!missing.exists());
}

#[tokio::test]
async fn test_failed_rename_removes_partial_file() {
    let server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    // A non-empty directory squatting on the destination name makes the
    // final rename fail after the body has been streamed.
    let blocker = output.path().join("0001.5007.uuid-5007.jpeg");
    std::fs::create_dir(&blocker).unwrap();
    std::fs::write(blocker.join("keep"), b"x").unwrap();

    Mock::given(method("GET"))
        .and(path("/index.php"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(IMAGE_BYTES.to_vec()))
        .expect(2)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let outcome = CaptureDownloader::new(&client, RetryPolicy::immediate(2))
        .download(&request("5007", ResolutionTier::CroppedThumbnail, output.path()))
        .await;

    match outcome {
        DownloadOutcome::Failed { last_error, .. } => {
            assert!(matches!(last_error, DownloadError::Io(_)));
        }
        other => panic!("Expected Failed, got {:?}", other),
    }
    assert_eq!(file_names(output.path()), vec!["0001.5007.uuid-5007.jpeg"]);
    assert!(blocker.is_dir());
}
