use std::sync::{Arc, Mutex};

use resume_screener::{ResponseBody, SmokeClient, SmokeReport};
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A request as seen by the stand-in scoring service.
#[derive(Debug, Clone)]
struct Recorded {
    method: String,
    path: String,
    body: String,
}

type Handler = fn(&str, &str) -> (u16, &'static str, String);

/// Serves canned HTTP/1.1 responses on a local port and records every request.
async fn spawn_service(handler: Handler) -> (String, Arc<Mutex<Vec<Recorded>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&recorded);

    tokio::spawn(async move {
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };
            let log = Arc::clone(&log);
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 4096];
                let (head_end, content_length) = loop {
                    let n = socket.read(&mut chunk).await.unwrap_or(0);
                    if n == 0 {
                        return;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                    if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                        let head = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                        let length = head
                            .lines()
                            .find_map(|line| line.strip_prefix("content-length:"))
                            .and_then(|v| v.trim().parse::<usize>().ok())
                            .unwrap_or(0);
                        break (pos + 4, length);
                    }
                };
                while buf.len() < head_end + content_length {
                    let n = socket.read(&mut chunk).await.unwrap_or(0);
                    if n == 0 {
                        break;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }

                let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
                let mut request_line = head.lines().next().unwrap_or("").split_whitespace();
                let method = request_line.next().unwrap_or("").to_string();
                let path = request_line.next().unwrap_or("").to_string();
                let body = String::from_utf8_lossy(&buf[head_end..]).to_string();
                log.lock().unwrap().push(Recorded {
                    method: method.clone(),
                    path: path.clone(),
                    body,
                });

                let (status, content_type, payload) = handler(&method, &path);
                let response = format!(
                    "HTTP/1.1 {} Canned\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    content_type,
                    payload.len(),
                    payload
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{}", addr), recorded)
}

fn healthy_service(method: &str, path: &str) -> (u16, &'static str, String) {
    match (method, path) {
        ("GET", "/health") => (200, "application/json", json!({"status": "healthy"}).to_string()),
        ("POST", "/calculate-ats-only") => (
            200,
            "application/json",
            json!({"ats_score": 87.5, "matched_keywords": ["python", "django"]}).to_string(),
        ),
        _ => (404, "text/plain", "not found".to_string()),
    }
}

fn unhealthy_service(_: &str, _: &str) -> (u16, &'static str, String) {
    (503, "application/json", json!({"status": "degraded"}).to_string())
}

fn plain_text_service(_: &str, _: &str) -> (u16, &'static str, String) {
    (200, "text/plain", "OK".to_string())
}

#[tokio::test]
async fn test_health_check_passes_on_200() {
    let (base_url, recorded) = spawn_service(healthy_service).await;
    let client = SmokeClient::new(&base_url).unwrap();

    assert!(client.health_check().await);

    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/health");
}

#[tokio::test]
async fn test_health_check_fails_on_non_200() {
    let (base_url, _) = spawn_service(unhealthy_service).await;
    let client = SmokeClient::new(&base_url).unwrap();

    assert!(!client.health_check().await);
    let response = client.get_health().await.unwrap();
    assert_eq!(response.status.as_u16(), 503);
    assert_eq!(response.body, ResponseBody::Json(json!({"status": "degraded"})));
}

#[tokio::test]
async fn test_non_json_body_still_counts_status() {
    let (base_url, _) = spawn_service(plain_text_service).await;
    let client = SmokeClient::new(&base_url).unwrap();

    assert!(client.health_check().await);
    let response = client.get_health().await.unwrap();
    assert_eq!(response.body, ResponseBody::Text("OK".to_string()));
}

#[tokio::test]
async fn test_calculate_ats_only_posts_both_fields() {
    let (base_url, recorded) = spawn_service(healthy_service).await;
    let client = SmokeClient::new(&base_url).unwrap();

    assert!(client.calculate_ats_only().await);

    let requests = recorded.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/calculate-ats-only");
    let body: Value = serde_json::from_str(&requests[0].body).unwrap();
    assert!(body["job_description"].is_string());
    assert!(body["resume_text"].is_string());
}

#[tokio::test]
async fn test_run_scores_only_when_healthy() {
    let (base_url, recorded) = spawn_service(healthy_service).await;
    let report = SmokeClient::new(&base_url).unwrap().run().await;
    assert_eq!(
        report,
        SmokeReport {
            health_ok: true,
            ats_ok: Some(true)
        }
    );
    let paths: Vec<String> = recorded.lock().unwrap().iter().map(|r| r.path.clone()).collect();
    // /analyze-resume is documented, never called
    assert_eq!(paths, vec!["/health".to_string(), "/calculate-ats-only".to_string()]);

    let (base_url, recorded) = spawn_service(unhealthy_service).await;
    let report = SmokeClient::new(&base_url).unwrap().run().await;
    assert_eq!(
        report,
        SmokeReport {
            health_ok: false,
            ats_ok: None
        }
    );
    assert_eq!(recorded.lock().unwrap().len(), 1);
}
