use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::{api::port::HomeworkApi, config::Config, domain::Cursor, errors::Error, Result};

/// Practicum homework status client (reqwest).
#[derive(Clone)]
pub struct PracticumClient {
    endpoint: String,
    token: String,
    http: reqwest::Client,
}

impl PracticumClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Configuration(format!("http client build failed: {e}")))?;
        Ok(Self {
            endpoint: endpoint.into(),
            token: token.into(),
            http,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(cfg.endpoint.clone(), cfg.practicum_token.clone(), cfg.http_timeout)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl HomeworkApi for PracticumClient {
    async fn fetch(&self, from_date: Cursor) -> Result<serde_json::Value> {
        tracing::debug!(from_date, endpoint = %self.endpoint, "requesting homework statuses");

        let resp = self
            .http
            .get(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| Error::Connectivity(e.to_string()))?;

        let status = resp.status();
        if status != StatusCode::OK {
            tracing::error!(status = status.as_u16(), endpoint = %self.endpoint, from_date, "homework api returned an unexpected status");
            return Err(Error::UnexpectedResponse {
                status: status.as_u16(),
                endpoint: self.endpoint.clone(),
            });
        }

        let body: serde_json::Value = resp.json().await.map_err(|e| {
            if e.is_decode() {
                Error::MalformedResponse(format!("body is not json: {e}"))
            } else {
                Error::Connectivity(e.to_string())
            }
        })?;

        tracing::debug!("homework api answered");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve exactly one canned HTTP response; the handle yields the raw request head.
    async fn one_shot_server(status_line: &str, body: &str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );

        let handle = tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = sock.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }
            sock.write_all(response.as_bytes()).await.unwrap();
            sock.shutdown().await.ok();
            String::from_utf8_lossy(&head).into_owned()
        });

        (format!("http://{addr}/api/user_api/homework_statuses/"), handle)
    }

    fn client(endpoint: &str) -> PracticumClient {
        PracticumClient::new(endpoint, "secret", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn sends_oauth_header_and_cursor() {
        let (endpoint, server) =
            one_shot_server("200 OK", r#"{"homeworks":[],"current_date":1000}"#).await;

        let body = client(&endpoint).fetch(1234).await.unwrap();
        assert_eq!(body["current_date"], 1000);

        let head = server.await.unwrap().to_lowercase();
        assert!(head.starts_with("get /api/user_api/homework_statuses/?from_date=1234 "));
        assert!(head.contains("authorization: oauth secret"));
    }

    #[tokio::test]
    async fn non_200_is_unexpected_response() {
        let (endpoint, server) = one_shot_server("503 Service Unavailable", "{}").await;

        let err = client(&endpoint).fetch(0).await.unwrap_err();
        match err {
            Error::UnexpectedResponse { status, endpoint: e } => {
                assert_eq!(status, 503);
                assert_eq!(e, endpoint);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let (endpoint, server) = one_shot_server("200 OK", "<html>oops</html>").await;

        let err = client(&endpoint).fetch(0).await.unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)), "{err:?}");
        server.await.unwrap();
    }

    #[tokio::test]
    async fn refused_connection_is_connectivity_error() {
        // Bind then drop to get a port nobody listens on.
        let addr = {
            let l = TcpListener::bind("127.0.0.1:0").await.unwrap();
            l.local_addr().unwrap()
        };

        let err = client(&format!("http://{addr}/"))
            .fetch(0)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Connectivity(_)), "{err:?}");
    }

    #[tokio::test]
    async fn silent_server_times_out_as_connectivity_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        // Accept and hold the connection without ever answering.
        let server = tokio::spawn(async move {
            let (_sock, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });

        let client =
            PracticumClient::new(format!("http://{addr}/"), "secret", Duration::from_millis(300))
                .unwrap();
        let err = client.fetch(0).await.unwrap_err();
        server.abort();

        assert!(matches!(err, Error::Connectivity(_)), "{err:?}");
    }
}
