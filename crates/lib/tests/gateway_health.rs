//! Integration test: serve the liveness router on a free port, GET /, assert "ok".
//! Does not require Discord, Hugging Face, or NewsAPI. The server task is aborted at the end.

use lib::gateway;
use std::time::Duration;

#[tokio::test]
async fn health_http_responds_with_ok() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind free port");
    let port = listener.local_addr().expect("local_addr").port();

    let server = tokio::spawn(async move {
        let _ = gateway::serve_health(listener).await;
    });

    let url = format!("http://127.0.0.1:{}/", port);
    let client = reqwest::Client::new();
    let mut last_err = None;
    for _ in 0..100 {
        match client.get(&url).send().await {
            Ok(resp) => {
                assert_eq!(resp.status(), reqwest::StatusCode::OK);
                assert_eq!(resp.text().await.expect("read body"), gateway::HEALTH_BODY);
                server.abort();
                return;
            }
            Err(e) => last_err = Some(e),
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    server.abort();
    panic!(
        "GET {} did not return 200 \"ok\" within 5s; last error: {:?}",
        url, last_err
    );
}

#[tokio::test]
async fn health_http_ignores_unknown_paths() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind free port");
    let port = listener.local_addr().expect("local_addr").port();
    let server = tokio::spawn(async move {
        let _ = gateway::serve_health(listener).await;
    });

    let resp = reqwest::get(format!("http://127.0.0.1:{}/elsewhere", port))
        .await
        .expect("request");
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    server.abort();
}
