//! HTTP Client Implementation using Reqwest

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{is_retryable_status, HttpClient, HttpMethod, HttpRequest, HttpResponse, RetryPolicy},
};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("lastfm-notion-sync/", env!("CARGO_PKG_VERSION"));

/// Query parameter names whose values never reach logs or error text
const SECRET_PARAMS: &[&str] = &["key", "token", "secret", "password", "signature"];

/// Reqwest-based HTTP client implementation
///
/// Provides HTTP operations with:
/// - Connection pooling via reqwest
/// - Retry with exponential backoff, only when the policy allows more than one attempt
/// - TLS support by default
pub struct ReqwestHttpClient {
    client: Client,
    policy: RetryPolicy,
}

impl ReqwestHttpClient {
    /// Create a new HTTP client with a 30 second timeout and no retries
    pub fn new() -> Result<Self> {
        Self::with_config(Duration::from_secs(30), RetryPolicy::none())
    }

    /// Create a new HTTP client with custom timeout and retry policy
    pub fn with_config(timeout: Duration, policy: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| {
                BridgeError::OperationFailed(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, policy })
    }

    /// Convert bridge HttpMethod to reqwest Method
    fn convert_method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }

    /// Build reqwest request from bridge request
    fn build_request(&self, request: HttpRequest) -> reqwest::RequestBuilder {
        let method = Self::convert_method(request.method);
        let mut req = self.client.request(method, &request.url);

        for (key, value) in request.headers {
            req = req.header(key, value);
        }

        if let Some(body) = request.body {
            req = req.body(body);
        }

        if let Some(timeout) = request.timeout {
            req = req.timeout(timeout);
        }

        req
    }

    async fn into_response(response: reqwest::Response) -> Result<HttpResponse> {
        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|s| (k.to_string(), s.to_string())))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(Self::convert_error)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    /// Map a transport error, dropping the request URL from its text
    fn convert_error(e: reqwest::Error) -> BridgeError {
        let e = e.without_url();
        if e.is_timeout() {
            BridgeError::OperationFailed("Request timed out".to_string())
        } else if e.is_connect() {
            BridgeError::OperationFailed(format!("Connection failed: {}", e))
        } else {
            BridgeError::OperationFailed(e.to_string())
        }
    }

    /// Execute request, retrying per policy
    ///
    /// With a single-attempt policy the first response is returned as-is,
    /// whatever its status.
    async fn execute_with_retry_internal(
        &self,
        request: HttpRequest,
        policy: &RetryPolicy,
    ) -> Result<HttpResponse> {
        let url = redacted_url(&request.url);
        let mut attempt = 0;

        loop {
            attempt += 1;
            debug!(
                attempt,
                max_attempts = policy.max_attempts,
                method = ?request.method,
                url = %url,
                "Executing HTTP request"
            );

            let last_attempt = attempt >= policy.max_attempts;

            match self.build_request(request.clone()).send().await {
                Ok(response) => {
                    let status = response.status().as_u16();
                    if last_attempt || !is_retryable_status(status) {
                        return Self::into_response(response).await;
                    }
                    warn!(status, attempt, "HTTP request failed with retryable status");
                }
                Err(e) => {
                    let error = Self::convert_error(e);
                    warn!(%error, attempt, "HTTP request failed");
                    if last_attempt {
                        return Err(error);
                    }
                }
            }

            let delay = policy.delay_for(attempt);
            debug!(delay_ms = delay.as_millis() as u64, "Retrying after delay");
            sleep(delay).await;
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.execute_with_retry_internal(request, &self.policy).await
    }
}

/// Replace the values of credential-like query parameters with `[REDACTED]`
fn redacted_url(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };

    let query = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, _)) if is_secret_param(name) => format!("{}=[REDACTED]", name),
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", base, query)
}

fn is_secret_param(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    SECRET_PARAMS.iter().any(|secret| name.contains(secret))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve every request with `status` and an empty body, counting requests
    async fn serve_status(status: u16) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&requests);

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut received = Vec::new();
                let mut buf = [0u8; 1024];
                while !received.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => received.extend_from_slice(&buf[..n]),
                    }
                }
                counter.fetch_add(1, Ordering::SeqCst);

                let response = format!(
                    "HTTP/1.1 {} Test\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
                    status
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}/2.0/?method=user.gettopalbums", addr), requests)
    }

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            base_delay: Duration::from_millis(1),
            ..RetryPolicy::with_attempts(max_attempts)
        }
    }

    #[tokio::test]
    async fn test_http_client_creation() {
        let client = ReqwestHttpClient::new().unwrap();
        assert_eq!(client.policy, RetryPolicy::none());
    }

    #[tokio::test]
    async fn test_method_conversion() {
        assert_eq!(
            ReqwestHttpClient::convert_method(HttpMethod::Get),
            reqwest::Method::GET
        );
        assert_eq!(
            ReqwestHttpClient::convert_method(HttpMethod::Post),
            reqwest::Method::POST
        );
    }

    #[tokio::test]
    async fn test_with_config_keeps_policy() {
        let client =
            ReqwestHttpClient::with_config(Duration::from_secs(5), RetryPolicy::with_attempts(3))
                .unwrap();
        assert!(client.policy.retries_enabled());
        assert_eq!(client.policy.max_attempts, 3);
    }

    #[tokio::test]
    async fn test_build_request_carries_headers_and_body() {
        let client = ReqwestHttpClient::new().unwrap();
        let request = HttpRequest::new(HttpMethod::Post, "https://api.notion.com/v1/pages")
            .bearer_token("secret")
            .header("Notion-Version", "2022-06-28")
            .body(bytes::Bytes::from_static(b"{}"));

        let built = client.build_request(request).build().unwrap();
        assert_eq!(built.method(), reqwest::Method::POST);
        assert_eq!(built.headers()["Notion-Version"], "2022-06-28");
        assert_eq!(built.headers()["Authorization"], "Bearer secret");
        assert_eq!(built.body().and_then(|b| b.as_bytes()), Some(&b"{}"[..]));
    }

    #[tokio::test]
    async fn test_default_policy_makes_single_request() {
        let (url, requests) = serve_status(503).await;
        let client = ReqwestHttpClient::new().unwrap();

        let response = client
            .execute(HttpRequest::new(HttpMethod::Get, url))
            .await
            .unwrap();

        assert_eq!(response.status, 503);
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_server_errors_up_to_attempt_budget() {
        let (url, requests) = serve_status(503).await;
        let client = ReqwestHttpClient::with_config(Duration::from_secs(5), fast_policy(3)).unwrap();

        let response = client
            .execute(HttpRequest::new(HttpMethod::Get, url))
            .await
            .unwrap();

        assert_eq!(response.status, 503);
        assert_eq!(requests.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_client_errors_are_not_retried() {
        let (url, requests) = serve_status(400).await;
        let client = ReqwestHttpClient::with_config(Duration::from_secs(5), fast_policy(3)).unwrap();

        let response = client
            .execute(HttpRequest::new(HttpMethod::Get, url))
            .await
            .unwrap();

        assert_eq!(response.status, 400);
        assert_eq!(requests.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_connection_error_omits_api_key() {
        let client = ReqwestHttpClient::new().unwrap();
        let request = HttpRequest::new(
            HttpMethod::Get,
            "http://127.0.0.1:1/2.0/?method=user.gettopalbums&api_key=SUPERSECRETKEY",
        );

        let err = client.execute(request).await.unwrap_err();
        let message = err.to_string();

        assert!(message.contains("Connection failed"), "{}", message);
        assert!(!message.contains("SUPERSECRETKEY"), "{}", message);
    }

    #[test]
    fn test_redacted_url_hides_credentials() {
        let url = "https://ws.audioscrobbler.com/2.0/?method=user.gettopalbums&user=rj&api_key=abc123&format=json";
        let redacted = redacted_url(url);

        assert_eq!(
            redacted,
            "https://ws.audioscrobbler.com/2.0/?method=user.gettopalbums&user=rj&api_key=[REDACTED]&format=json"
        );
        assert_eq!(
            redacted_url("https://api.notion.com/v1/pages"),
            "https://api.notion.com/v1/pages"
        );
    }
}
