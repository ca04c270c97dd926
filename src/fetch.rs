use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info};

use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered {status}")]
    Status { url: String, status: StatusCode },
    #[error("could not read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

pub fn build_client(settings: &Settings) -> Result<Client, FetchError> {
    let client = Client::builder()
        .user_agent(settings.user_agent.as_str())
        .timeout(Duration::from_secs(settings.timeout_secs))
        .build()?;
    Ok(client)
}

/// Single best-effort GET of a live page; no retries.
pub async fn fetch_page(client: &Client, url: &str) -> Result<String, FetchError> {
    let start = Instant::now();
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| FetchError::Transport { url: url.to_string(), source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status { url: url.to_string(), status });
    }

    let body = response
        .text()
        .await
        .map_err(|source| FetchError::Body { url: url.to_string(), source })?;

    info!(
        "Fetched {} ({} bytes) in {:.2}s",
        url,
        body.len(),
        start.elapsed().as_secs_f64()
    );
    debug!(status = %status, "fetch ok");
    Ok(body)
}

/// Local HTTP server answering every request with `status` and `body`.
#[cfg(test)]
pub(crate) async fn serve_fixed(status: &'static str, body: String) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = socket.read(&mut buf).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    format!("http://{}/", addr)
}

#[cfg(test)]
pub(crate) fn test_settings(urls: Vec<String>) -> Settings {
    Settings {
        urls,
        db_path: std::path::PathBuf::from("unused.sqlite"),
        clock_marker: "Пер.".to_string(),
        timeout_secs: 5,
        user_agent: "live_odds-test".to_string(),
    }
}
