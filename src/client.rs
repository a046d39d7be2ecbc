use std::time::Duration;

use reqwest::{header, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::time::sleep;

use crate::{ClientConfig, ClientError, Result};

/// Status line and fully-read body of one HTTP exchange.
#[derive(Debug)]
struct Reply {
    status: StatusCode,
    body: String,
}

impl Reply {
    /// Turns a non-2xx reply into [`ClientError::Http`].
    fn ensure_success(self) -> Result<String> {
        if self.status.is_success() {
            return Ok(self.body);
        }
        let trimmed = self.body.trim();
        let message = if trimmed.is_empty() {
            self.status
                .canonical_reason()
                .unwrap_or("No error message")
                .to_owned()
        } else {
            trimmed.to_owned()
        };
        Err(ClientError::Http {
            status: self.status.as_u16(),
            message,
        })
    }
}

#[derive(Clone, Debug)]
/// JSON REST client for the GameTrade backend.
///
/// Every call is retried on any failure, including non-2xx answers, up to
/// [`ClientConfig::max_retries`] attempts with linear backoff. Cloning is
/// cheap and shares the connection pool.
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Creates a client with connect and read timeouts taken from `config`.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .build()
            .map_err(ClientError::Transport)?;
        Ok(Self { http, config })
    }

    /// Creates a client from [`ClientConfig::load`].
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::load())
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Full URL for `path`; the path is appended verbatim.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Sends a GET and decodes the JSON body into `T`.
    ///
    /// An empty body decodes as JSON `null`, so `T = Option<_>` or `()`
    /// accept it and other shapes fail with [`ClientError::Decode`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send_with_retry(Method::GET, path, None::<&()>, decode_json::<T>)
            .await
    }

    /// Sends a GET and returns the body verbatim.
    pub async fn get_text(&self, path: &str) -> Result<String> {
        self.send_with_retry(Method::GET, path, None::<&()>, Ok)
            .await
    }

    /// Sends `body` as JSON with POST and decodes the JSON reply.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_with_retry(Method::POST, path, Some(body), decode_json::<T>)
            .await
    }

    /// POST whose reply body is read and discarded without parsing.
    pub async fn post_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send_with_retry(Method::POST, path, Some(body), |_| Ok(()))
            .await
    }

    /// POST returning the reply body verbatim, for plain-text acknowledgements.
    pub async fn post_text<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String> {
        self.send_with_retry(Method::POST, path, Some(body), Ok)
            .await
    }

    /// Sends `body` as JSON with PUT and decodes the JSON reply.
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.send_with_retry(Method::PUT, path, Some(body), decode_json::<T>)
            .await
    }

    pub async fn put_unit<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send_with_retry(Method::PUT, path, Some(body), |_| Ok(()))
            .await
    }

    pub async fn put_text<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<String> {
        self.send_with_retry(Method::PUT, path, Some(body), Ok)
            .await
    }

    /// Sends a DELETE and reports whether the server answered 200 or 204.
    ///
    /// Other statuses return `Ok(false)` immediately. Transport failures are
    /// retried like every other call and surfaced once attempts run out.
    pub async fn delete(&self, path: &str) -> Result<bool> {
        let url = self.url(path);
        let url_ref = url.as_str();
        self.retrying(&Method::DELETE, url_ref, || async move {
            let reply = self.send_once(Method::DELETE, url_ref, None::<&()>).await?;
            Ok(matches!(
                reply.status,
                StatusCode::OK | StatusCode::NO_CONTENT
            ))
        })
        .await
    }

    async fn send_with_retry<T, B, D>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        decode: D,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        D: Fn(String) -> Result<T>,
    {
        let url = self.url(path);
        let (url_ref, method_ref, decode) = (url.as_str(), &method, &decode);
        self.retrying(method_ref, url_ref, || async move {
            let reply = self.send_once(method_ref.clone(), url_ref, body).await?;
            decode(reply.ensure_success()?)
        })
        .await
    }

    /// Runs `attempt` until it succeeds or `max_retries` attempts have failed.
    ///
    /// Only the last error is returned.
    async fn retrying<T, A, Fut>(&self, method: &Method, url: &str, attempt: A) -> Result<T>
    where
        A: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_attempts = self.config.max_retries.max(1);
        let mut attempt_no = 1u32;
        loop {
            match attempt().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt_no < max_attempts => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        "{method} {url} failed on attempt {attempt_no}/{max_attempts}: {err}"
                    );
                    #[cfg(not(feature = "tracing"))]
                    let _ = (method, url, err);
                    self.wait_before_retry(attempt_no).await;
                    attempt_no += 1;
                }
                Err(err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!("{method} {url} failed after {attempt_no} attempt(s): {err}");
                    return Err(err);
                }
            }
        }
    }

    async fn send_once<B>(&self, method: Method, url: &str, body: Option<&B>) -> Result<Reply>
    where
        B: Serialize + ?Sized,
    {
        #[cfg(feature = "tracing")]
        tracing::debug!("API request: {method} {url}");

        let carries_body = method == Method::POST || method == Method::PUT;
        let mut request = self
            .http
            .request(method, url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");

        if let Some(body) = body.filter(|_| carries_body) {
            let payload = serde_json::to_vec(body)
                .map_err(|err| ClientError::Encode(format!("request body: {err}")))?;
            #[cfg(feature = "tracing")]
            tracing::trace!("request body: {}", String::from_utf8_lossy(&payload));
            request = request.body(payload);
        }

        let response = request.send().await.map_err(ClientError::Transport)?;
        let status = response.status();

        // The response is consumed here, returning the connection to the pool.
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) if status.is_success() => return Err(ClientError::Transport(err)),
            Err(_) => String::new(),
        };

        #[cfg(feature = "tracing")]
        log_reply(status, &body);

        Ok(Reply { status, body })
    }

    /// Sleeps `retry_delay_ms * failed_attempts` before the next attempt.
    async fn wait_before_retry(&self, failed_attempts: u32) {
        let delay = backoff_delay(self.config.retry_delay_ms, failed_attempts);

        #[cfg(feature = "tracing")]
        tracing::debug!("retrying request after {} ms", delay.as_millis());

        sleep(delay).await;
    }
}

#[cfg(feature = "tracing")]
fn log_reply(status: StatusCode, body: &str) {
    if status.is_success() {
        tracing::debug!("API response: {status}");
    } else {
        tracing::warn!("API response: {status} - {}", body.trim());
    }
}

/// Linear backoff: the wait before attempt `k` is `delay_ms * (k - 1)`.
fn backoff_delay(delay_ms: u64, failed_attempts: u32) -> Duration {
    Duration::from_millis(delay_ms.saturating_mul(u64::from(failed_attempts)))
}

fn decode_json<T: DeserializeOwned>(body: String) -> Result<T> {
    let text = if body.trim().is_empty() {
        "null"
    } else {
        body.as_str()
    };
    serde_json::from_str(text).map_err(|err| {
        ClientError::Decode(format!("invalid response JSON: {err}; body: {body}"))
    })
}
