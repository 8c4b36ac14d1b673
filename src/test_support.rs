// src/test_support.rs
// =============================================================================
// Helpers shared by the test modules.
//
// serve() starts a throwaway HTTP responder on 127.0.0.1 so the fetcher and
// the driver can be exercised without touching the real GitHub API.
// =============================================================================

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::github::FetchSettings;

/// Same retry budget as production, but no waiting between attempts
pub fn quick_settings() -> FetchSettings {
    FetchSettings {
        max_attempts: 3,
        rate_limit_wait: Duration::ZERO,
        network_wait: Duration::ZERO,
        timeout: Duration::from_secs(5),
    }
}

/// A complete HTTP/1.1 response with a JSON body
pub fn http_response(status: &str, headers: &[(&str, &str)], body: &str) -> String {
    let mut out = format!("HTTP/1.1 {}\r\n", status);
    for (name, value) in headers {
        out.push_str(&format!("{}: {}\r\n", name, value));
    }
    out.push_str(&format!(
        "content-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        body.len(),
        body
    ));
    out
}

// Serves the canned responses in order (repeating the last one) and
// records every raw request it receives.
pub async fn serve(responses: Vec<String>) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);

    tokio::spawn(async move {
        let mut served = 0usize;
        loop {
            let (mut socket, _) = match listener.accept().await {
                Ok(conn) => conn,
                Err(_) => return,
            };

            let mut raw = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                raw.extend_from_slice(&buf[..n]);
                if raw.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            seen.lock().unwrap().push(String::from_utf8_lossy(&raw).to_string());

            let response = &responses[served.min(responses.len() - 1)];
            served += 1;
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (base, requests)
}

/// A base URL where nothing is listening
pub async fn refused_base() -> String {
    // Grab a free port and close it again
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    base
}
