//! Mapbox client tests against a local stub server.
//!
//! The stub accepts a single connection, records the request line and
//! answers with a canned HTTP response.

use geo_search::error::GeoSearchError;
use geo_search::geocoding::{Geocoder, MapboxClient, MapboxConfig};
use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

const PARIS_BODY: &str = r#"{
  "type": "FeatureCollection",
  "query": ["paris"],
  "features": [
    {
      "id": "place.8970",
      "type": "Feature",
      "text": "Paris",
      "place_name": "Paris, Île-de-France, France",
      "center": [2.35183, 48.85658],
      "context": [
        {"id": "region.13244", "text": "Île-de-France"},
        {"id": "country.8781", "text": "France"}
      ]
    },
    {
      "id": "place.1245",
      "type": "Feature",
      "text": "Paris",
      "place_name": "Paris, Texas, United States",
      "center": [-95.5555, 33.6609]
    }
  ]
}"#;

/// Starts a one-shot HTTP stub. Returns its base URL and a receiver for the
/// request line it saw.
async fn stub_server(status: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = oneshot::channel();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let request = String::from_utf8_lossy(&request);
        let request_line = request.lines().next().unwrap_or_default().to_string();
        let _ = tx.send(request_line);

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    (format!("http://{addr}"), rx)
}

fn client(base_url: &str, timeout_secs: u64) -> MapboxClient {
    MapboxClient::new(
        MapboxConfig::new("pk.test")
            .with_url(base_url)
            .with_timeout(timeout_secs),
    )
    .unwrap()
}

/// Scenario: Successful lookup
/// Given the service answers with two features
/// When "Paris" is searched
/// Then the request targets the places endpoint with the type filter
/// And both features are decoded with their first context entry
#[tokio::test]
async fn test_search_decodes_features() {
    let (base_url, request_line) = stub_server("200 OK", PARIS_BODY).await;

    let suggestions = client(&base_url, 5).search("Paris").await.unwrap();

    assert_eq!(
        request_line.await.unwrap(),
        "GET /geocoding/v5/mapbox.places/Paris.json?access_token=pk.test\
         &types=district&types=place&types=locality&types=neighborhood HTTP/1.1"
    );
    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].id, "place.8970");
    assert_eq!(suggestions[0].context.as_deref(), Some("Île-de-France"));
    assert_eq!(suggestions[1].context, None);
    assert_eq!(suggestions[1].display_name(), "Paris, Texas, United States");
}

/// Scenario: Query text is sent as one encoded path segment
#[tokio::test]
async fn test_search_encodes_query() {
    let (base_url, request_line) = stub_server("200 OK", r#"{"features": []}"#).await;

    let suggestions = client(&base_url, 5).search("São Paulo").await.unwrap();

    assert!(suggestions.is_empty());
    assert!(request_line
        .await
        .unwrap()
        .starts_with("GET /geocoding/v5/mapbox.places/S%C3%A3o%20Paulo.json?"));
}

/// Scenario: A semicolon stays inside the place name
/// Given a query containing the batch separator
/// When it is searched
/// Then the request carries it escaped as a single segment
#[tokio::test]
async fn test_search_escapes_batch_separator() {
    let (base_url, request_line) = stub_server("200 OK", r#"{"features": []}"#).await;

    client(&base_url, 5).search("Paris;Lyon").await.unwrap();

    assert!(request_line
        .await
        .unwrap()
        .starts_with("GET /geocoding/v5/mapbox.places/Paris%3BLyon.json?"));
}

/// Scenario: The service rejects the token
#[tokio::test]
async fn test_search_reports_api_error() {
    let (base_url, _) = stub_server("401 Unauthorized", r#"{"message": "Not Authorized - Invalid Token"}"#).await;

    let err = client(&base_url, 5).search("Paris").await.unwrap_err();

    assert!(matches!(err, GeoSearchError::Geocoding(_)));
    assert!(err.to_string().contains("401"));
    assert!(err.to_string().contains("Not Authorized - Invalid Token"));
}

/// Scenario: The body is not a feature collection
#[tokio::test]
async fn test_search_reports_malformed_body() {
    let (base_url, _) = stub_server("200 OK", "<html>gateway</html>").await;

    let err = client(&base_url, 5).search("Paris").await.unwrap_err();

    assert!(matches!(err, GeoSearchError::MalformedResponse(_)));
}

/// Scenario: Nothing is listening
#[tokio::test]
async fn test_search_reports_connection_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}"), 5)
        .search("Paris")
        .await
        .unwrap_err();

    assert!(matches!(err, GeoSearchError::Geocoding(_)));
}
