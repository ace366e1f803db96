mod common;

use axum::http::header::RETRY_AFTER;
use axum::http::{Method, StatusCode};
use common::{from_client, request, TestApp};

#[tokio::test]
async fn exceeding_quota_returns_429_with_retry_after() {
    let app = TestApp::builder()
        .config("RATE_LIMIT_PER_MINUTE", "2")
        .build();
    let lookup = || {
        from_client(
            request(Method::GET, "/api/v1/session/unknown", None),
            [10, 1, 1, 1],
        )
    };

    assert_eq!(app.send(lookup()).await.status, StatusCode::NOT_FOUND);
    assert_eq!(app.send(lookup()).await.status, StatusCode::NOT_FOUND);

    let limited = app.send(lookup()).await;
    limited.assert_error(StatusCode::TOO_MANY_REQUESTS, "E004");
    let retry_after: u64 = limited.headers[RETRY_AFTER]
        .to_str()
        .unwrap()
        .parse()
        .unwrap();
    assert!(retry_after >= 1);
}

#[tokio::test]
async fn quota_is_tracked_per_client() {
    let app = TestApp::builder()
        .config("RATE_LIMIT_PER_MINUTE", "1")
        .build();
    let lookup = |ip| {
        from_client(
            request(Method::GET, "/api/v1/session/unknown", None),
            ip,
        )
    };

    assert_eq!(app.send(lookup([10, 0, 0, 1])).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.send(lookup([10, 0, 0, 1])).await.status,
        StatusCode::TOO_MANY_REQUESTS
    );
    assert_eq!(app.send(lookup([10, 0, 0, 2])).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_is_not_rate_limited() {
    let app = TestApp::builder()
        .config("RATE_LIMIT_PER_MINUTE", "1")
        .build();

    for _ in 0..5 {
        let response = app
            .send(from_client(
                request(Method::GET, "/api/v1/health", None),
                [10, 2, 2, 2],
            ))
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }
}
