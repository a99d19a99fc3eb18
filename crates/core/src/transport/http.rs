//! reqwest based image transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, Method, Response, Url};
use tracing::debug;

use super::config::TransportConfig;
use super::{ImageTransport, TransportError};

/// HTTP image transport with an explicit redirect cap.
pub struct HttpTransport {
    client: Client,
    max_redirects: u32,
}

impl HttpTransport {
    /// Create a new transport. reqwest's own redirect handling is disabled.
    pub fn new(config: &TransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(Policy::none())
            .build()?;

        Ok(Self {
            client,
            max_redirects: config.max_redirects,
        })
    }

    /// Issue a request, re-issuing it against each 3xx `Location` until a
    /// non-redirect response arrives. Fails on any terminal non-2xx status.
    async fn send_following(&self, method: Method, url: &str) -> Result<Response, TransportError> {
        let mut current = Url::parse(url).map_err(|e| TransportError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let mut redirects = 0u32;

        loop {
            let response = self.client.request(method.clone(), current.clone()).send().await?;
            let status = response.status();

            if status.is_redirection() {
                if let Some(location) = response.headers().get(LOCATION) {
                    if redirects >= self.max_redirects {
                        return Err(TransportError::TooManyRedirects {
                            limit: self.max_redirects,
                            url: url.to_string(),
                        });
                    }

                    let location = location.to_str().map_err(|e| TransportError::InvalidUrl {
                        url: current.to_string(),
                        reason: format!("unreadable Location header: {}", e),
                    })?;
                    let next = current.join(location).map_err(|e| TransportError::InvalidUrl {
                        url: location.to_string(),
                        reason: e.to_string(),
                    })?;

                    debug!("{} {} redirected ({}) to {}", method, current, status, next);
                    current = next;
                    redirects += 1;
                    continue;
                }
            }

            if !status.is_success() {
                return Err(TransportError::Status {
                    status: status.as_u16(),
                    url: current.to_string(),
                });
            }

            return Ok(response);
        }
    }
}

#[async_trait]
impl ImageTransport for HttpTransport {
    async fn download(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let response = self.send_following(Method::GET, url).await?;
        let bytes = response.bytes().await?;

        debug!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }

    async fn probe(&self, url: &str) -> Result<(), TransportError> {
        self.send_following(Method::HEAD, url).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use axum::routing::get;
    use axum::Router;

    const IMAGE_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0fake-jpeg-body";

    async fn spawn_server() -> String {
        let app = Router::new()
            .route("/image.jpg", get(|| async { IMAGE_BYTES }))
            .route(
                "/redirect",
                get(|| async { (StatusCode::FOUND, [(header::LOCATION, "/image.jpg")]) }),
            )
            .route(
                "/chain",
                get(|| async { (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, "redirect")]) }),
            )
            .route(
                "/loop",
                get(|| async { (StatusCode::FOUND, [(header::LOCATION, "/loop")]) }),
            )
            .route("/bare-redirect", get(|| async { StatusCode::FOUND }))
            .route("/missing.jpg", get(|| async { StatusCode::NOT_FOUND }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn transport(max_redirects: u32) -> HttpTransport {
        HttpTransport::new(&TransportConfig {
            max_redirects,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_download_direct() {
        let base = spawn_server().await;
        let bytes = transport(10)
            .download(&format!("{}/image.jpg", base))
            .await
            .unwrap();
        assert_eq!(bytes, IMAGE_BYTES);
    }

    #[tokio::test]
    async fn test_redirect_yields_same_bytes() {
        let base = spawn_server().await;
        let transport = transport(10);

        let direct = transport.download(&format!("{}/image.jpg", base)).await.unwrap();
        let redirected = transport.download(&format!("{}/redirect", base)).await.unwrap();
        let chained = transport.download(&format!("{}/chain", base)).await.unwrap();

        assert_eq!(direct, redirected);
        assert_eq!(direct, chained);
    }

    #[tokio::test]
    async fn test_terminal_status_carries_code() {
        let base = spawn_server().await;
        let err = transport(10)
            .download(&format!("{}/missing.jpg", base))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_redirect_without_location_is_status_error() {
        let base = spawn_server().await;
        let err = transport(10)
            .download(&format!("{}/bare-redirect", base))
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(302));
    }

    #[tokio::test]
    async fn test_redirect_loop_is_capped() {
        let base = spawn_server().await;
        let err = transport(3)
            .download(&format!("{}/loop", base))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::TooManyRedirects { limit: 3, .. }));
    }

    #[tokio::test]
    async fn test_chain_longer_than_cap_fails() {
        let base = spawn_server().await;
        let err = transport(1)
            .download(&format!("{}/chain", base))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::TooManyRedirects { .. }));
    }

    #[tokio::test]
    async fn test_probe() {
        let base = spawn_server().await;
        let transport = transport(10);

        assert!(transport.probe(&format!("{}/image.jpg", base)).await.is_ok());
        assert!(transport.probe(&format!("{}/redirect", base)).await.is_ok());
        assert!(transport.probe(&format!("{}/missing.jpg", base)).await.is_err());
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let err = transport(10).download("not a url").await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl { .. }));
    }
}
