// src/services/fetcher.rs

//! Listing page sources.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::error::{AppError, Result};
use crate::models::SiteConfig;
use crate::services::parser::extract_payload;
use crate::utils::http::fetch_page_async;

/// Result of fetching one listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageFetch {
    /// The embedded JSON payload
    Payload(String),
    /// The page or its embedded payload does not exist
    Missing,
    /// The page did not load within the timeout
    TimedOut,
}

/// Source of listing page payloads, addressed by 1-based page number.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch(&self, page: u32) -> Result<PageFetch>;
}

/// Fetches listing pages from the live site over HTTP.
pub struct HttpPageSource {
    client: Client,
    site: SiteConfig,
}

impl HttpPageSource {
    pub fn new(client: Client, site: SiteConfig) -> Self {
        Self { client, site }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self, page: u32) -> Result<PageFetch> {
        let url = self.site.page_url(page)?;
        log::info!("Navigating to page {}...", page);
        log::debug!("GET {}", url);

        match fetch_page_async(&self.client, url.as_str()).await {
            Ok(document) => Ok(match extract_payload(&document) {
                Some(payload) => PageFetch::Payload(payload),
                None => PageFetch::Missing,
            }),
            Err(AppError::Http(e)) if e.is_timeout() => Ok(PageFetch::TimedOut),
            Err(AppError::Http(e)) if e.status() == Some(StatusCode::NOT_FOUND) => {
                Ok(PageFetch::Missing)
            }
            Err(e) => Err(AppError::fetch(page, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::models::ScrapeConfig;
    use crate::utils::http::create_async_client;

    /// Minimal listing server keyed on the `page` query parameter.
    async fn spawn_listing_server() -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = [0u8; 2048];
                    let n = socket.read(&mut buf).await.unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..n]).to_string();

                    let (status, body) = if request.contains("page=1 ") {
                        ("404 Not Found", String::new())
                    } else if request.contains("page=2 ") {
                        ("500 Internal Server Error", String::new())
                    } else if request.contains("page=3 ") {
                        ("200 OK", "<html><body><div id=\"main\"></div></body></html>".into())
                    } else if request.contains("page=4 ") {
                        (
                            "200 OK",
                            r#"<html><body><div id="app" data-page='{"props":{}}'></div></body></html>"#
                                .into(),
                        )
                    } else {
                        tokio::time::sleep(Duration::from_secs(3)).await;
                        ("200 OK", String::new())
                    };

                    let response = format!(
                        "HTTP/1.1 {status}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        addr
    }

    fn source_for(addr: SocketAddr) -> HttpPageSource {
        let scrape = ScrapeConfig {
            timeout_secs: 1,
            ..ScrapeConfig::default()
        };
        let site = SiteConfig {
            base_url: format!("http://{addr}"),
            listing_path: "/tenders".to_string(),
            categories: None,
        };
        HttpPageSource::new(create_async_client(&scrape).unwrap(), site)
    }

    #[tokio::test]
    async fn test_not_found_is_missing() {
        let source = source_for(spawn_listing_server().await);
        assert_eq!(source.fetch(1).await.unwrap(), PageFetch::Missing);
    }

    #[tokio::test]
    async fn test_server_error_is_fetch_error() {
        let source = source_for(spawn_listing_server().await);
        let result = source.fetch(2).await;
        assert!(matches!(result, Err(AppError::Fetch { page: 2, .. })));
    }

    #[tokio::test]
    async fn test_page_without_root_is_missing() {
        let source = source_for(spawn_listing_server().await);
        assert_eq!(source.fetch(3).await.unwrap(), PageFetch::Missing);
    }

    #[tokio::test]
    async fn test_embedded_payload_is_returned() {
        let source = source_for(spawn_listing_server().await);
        assert_eq!(
            source.fetch(4).await.unwrap(),
            PageFetch::Payload(r#"{"props":{}}"#.to_string())
        );
    }

    #[tokio::test]
    async fn test_slow_page_times_out() {
        let source = source_for(spawn_listing_server().await);
        assert_eq!(source.fetch(5).await.unwrap(), PageFetch::TimedOut);
    }
}
