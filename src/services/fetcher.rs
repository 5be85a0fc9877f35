use crate::error::{ChapterSyncError, Result};
use crate::types::{CatalogMetadata, SourceType};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, info};
use url::Url;

const USER_AGENT: &str = concat!("chapter-sync/", env!("CARGO_PKG_VERSION"));

pub struct CatalogFetcher {
    client: reqwest::Client,
}

impl CatalogFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client })
    }

    /// Fetch the catalog page from a URL, or read a saved copy from disk.
    pub async fn fetch(&self, source: &str) -> Result<(String, CatalogMetadata)> {
        if Self::is_url(source) {
            self.fetch_from_url(source).await
        } else {
            Self::fetch_from_file(source).await
        }
    }

    async fn fetch_from_url(&self, url: &str) -> Result<(String, CatalogMetadata)> {
        info!("Fetching videos from: {}", url);

        Url::parse(url)?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ChapterSyncError::HttpStatus {
                status: response.status().as_u16(),
            });
        }

        let content = response.text().await?;
        debug!("Received {} bytes", content.len());

        let metadata = CatalogMetadata {
            source: url.to_string(),
            source_type: SourceType::Url,
            fetched_at: chrono::Utc::now().to_rfc3339(),
            total_bytes: content.len(),
        };

        Ok((content, metadata))
    }

    async fn fetch_from_file(file_path: &str) -> Result<(String, CatalogMetadata)> {
        info!("Reading saved catalog: {}", file_path);

        let path = Path::new(file_path);

        if !path.exists() {
            return Err(ChapterSyncError::FileNotFound {
                path: file_path.to_string(),
            });
        }

        let content = fs::read_to_string(path).await?;

        let metadata = CatalogMetadata {
            source: file_path.to_string(),
            source_type: SourceType::LocalFile,
            fetched_at: chrono::Utc::now().to_rfc3339(),
            total_bytes: content.len(),
        };

        Ok((content, metadata))
    }

    fn is_url(source: &str) -> bool {
        source.starts_with("http://") || source.starts_with("https://")
    }

    pub fn validate_source(source: &str) -> Result<()> {
        if Self::is_url(source) {
            Url::parse(source)?;
            Ok(())
        } else if Path::new(source).is_file() {
            Ok(())
        } else {
            Err(ChapterSyncError::FileNotFound {
                path: source.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_is_url() {
        assert!(CatalogFetcher::is_url("https://example.com/course"));
        assert!(CatalogFetcher::is_url("http://example.com"));
        assert!(!CatalogFetcher::is_url("./saved/course.html"));
    }

    #[test]
    fn test_validate_source() {
        assert!(CatalogFetcher::validate_source("https://example.com/course").is_ok());
        assert!(matches!(
            CatalogFetcher::validate_source("https://"),
            Err(ChapterSyncError::InvalidUrl(_))
        ));
        assert!(matches!(
            CatalogFetcher::validate_source("/definitely/not/here.html"),
            Err(ChapterSyncError::FileNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_fetch_from_saved_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("course.html");
        std::fs::write(&path, "<html><body></body></html>").unwrap();

        let fetcher = CatalogFetcher::new(5).unwrap();
        let (content, metadata) = fetcher.fetch(path.to_str().unwrap()).await.unwrap();

        assert!(content.contains("<body>"));
        assert_eq!(metadata.total_bytes, content.len());
        assert!(matches!(metadata.source_type, SourceType::LocalFile));
    }

    #[tokio::test]
    async fn test_fetch_missing_file() {
        let fetcher = CatalogFetcher::new(5).unwrap();
        let result = fetcher.fetch("missing-course.html").await;
        assert!(matches!(result, Err(ChapterSyncError::FileNotFound { .. })));
    }

    #[tokio::test]
    async fn test_fetch_from_url_returns_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/course"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>catalog</html>"))
            .mount(&mock_server)
            .await;

        let url = format!("{}/course", mock_server.uri());
        let fetcher = CatalogFetcher::new(5).unwrap();
        let (content, metadata) = fetcher.fetch(&url).await.unwrap();

        assert_eq!(content, "<html>catalog</html>");
        assert_eq!(metadata.source, url);
        assert!(matches!(metadata.source_type, SourceType::Url));
    }

    #[tokio::test]
    async fn test_fetch_from_url_server_error_is_fatal() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/course"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let fetcher = CatalogFetcher::new(5).unwrap();
        let err = fetcher
            .fetch(&format!("{}/course", mock_server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, ChapterSyncError::HttpStatus { status: 500 }));
        assert!(!err.is_skippable());
    }
}
