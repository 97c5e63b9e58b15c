use std::time::Duration;

use ufc_rankings_api::{Client, Error};
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap()
}

#[tokio::test]
async fn get_rankings_success() {
    let mock_server = MockServer::start().await;
    let body = load_fixture("rankings.html");

    Mock::given(method("GET"))
        .and(path("/rankings"))
        .and(header_exists("user-agent"))
        .respond_with(ResponseTemplate::new(200).set_body_string(&body))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let html = client.get_rankings().await.unwrap();
    assert!(html.contains("list-denotions"));
}

#[tokio::test]
async fn get_rankings_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rankings"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    match client.get_rankings().await {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body, "Not Found");
        }
        other => panic!("expected HttpStatus error, got {:?}", other),
    }
}

#[tokio::test]
async fn get_rankings_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rankings"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::with_base_url(&mock_server.uri());
    let result = client.get_rankings().await;
    assert!(matches!(result, Err(Error::HttpStatus { status: 500, .. })));
}

#[tokio::test]
async fn get_html_times_out() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html></html>")
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let client =
        Client::with_base_url(&mock_server.uri()).with_timeout(Duration::from_millis(200));
    let err = client.get_html("/slow").await.unwrap_err();
    assert!(err.is_network());
}

#[tokio::test]
async fn get_html_unreachable_host() {
    // Port 9 (discard) on localhost is not expected to accept HTTP.
    let client = Client::with_base_url("http://127.0.0.1:9").with_timeout(Duration::from_secs(2));
    let err = client.get_html("/rankings").await.unwrap_err();
    assert!(err.is_network());
}
