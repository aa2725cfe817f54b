//! Registry loading as seen through a running gateway.

use reqwest::{header, StatusCode};

mod common;

use common::{document, service_entry, services_dir, start_echo_backend, start_gateway};

#[tokio::test]
async fn invalid_documents_are_skipped_at_startup() {
    let backend = start_echo_backend().await;
    let good = document(
        &[service_entry("Good", &format!("http://{backend}"), "good.test")],
        &["api.good.test"],
    );
    let invalid = document(
        &[service_entry("Invalid", "not a url", "invalid.test")],
        &["api.invalid.test"],
    );

    let gateway = start_gateway(services_dir(&[
        ("a-invalid.yaml", &invalid),
        ("b-broken.yaml", "services: [[["),
        ("c-good.yaml", &good),
    ]))
    .await;
    let client = common::client();

    let resp = client
        .get(gateway.url("/"))
        .header(header::HOST, "good.test")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Services and API hostnames from the skipped file are absent.
    for host in ["invalid.test", "api.invalid.test"] {
        let resp = client
            .get(gateway.url("/"))
            .header(header::HOST, host)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
        assert!(resp.text().await.unwrap().contains("https://void.example/support"));
    }
}

#[tokio::test]
async fn earlier_file_wins_domain_conflicts() {
    let first = start_echo_backend().await;
    let second = start_echo_backend().await;

    let gateway = start_gateway(services_dir(&[
        (
            "10-first.yaml",
            &document(&[service_entry("First", &format!("http://{first}"), "dup.test")], &[]),
        ),
        (
            "20-second.yaml",
            &document(&[service_entry("Second", &format!("http://{second}"), "dup.test")], &[]),
        ),
    ]))
    .await;

    let resp = common::client()
        .get(gateway.url("/"))
        .header(header::HOST, "www.dup.test")
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["host"], first.to_string());
}

#[tokio::test]
async fn api_hostnames_apply_without_matching_service() {
    let doc = document(&[], &["api.orphan.test"]);
    let gateway = start_gateway(services_dir(&[("orphan.yaml", &doc)])).await;

    let resp = common::client()
        .get(gateway.url("/"))
        .header(header::HOST, "api.orphan.test")
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::REQUEST_TIMEOUT);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["service"]["Name"], "Void");
}
