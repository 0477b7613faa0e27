//! Remote catalog

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::courses::{Course, Instructor};

use super::{COURSES_FILE, CatalogError, CatalogGateway, INSTRUCTORS_FILE};

/// Fetches listings over HTTP, e.g. from the static host serving the storefront.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    client: reqwest::Client,
    base_url: String,
    courses_path: String,
    instructors_path: String,
}

impl HttpCatalog {
    /// Catalog served under `base_url` using the default listing paths.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client can't be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self::with_client(base_url, client))
    }

    /// Catalog served under `base_url` using a preconfigured client.
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            courses_path: COURSES_FILE.to_string(),
            instructors_path: INSTRUCTORS_FILE.to_string(),
        }
    }

    /// Override the course listing path.
    #[must_use]
    pub fn with_courses_path(mut self, path: impl Into<String>) -> Self {
        self.courses_path = path.into();
        self
    }

    /// Override the instructor listing path.
    #[must_use]
    pub fn with_instructors_path(mut self, path: impl Into<String>) -> Self {
        self.instructors_path = path.into();
        self
    }

    /// Full URL for a listing path.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, CatalogError> {
        let url = self.url_for(path);

        debug!(%url, "fetching catalog listing");

        let listing = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(listing)
    }
}

#[async_trait]
impl CatalogGateway for HttpCatalog {
    async fn list_courses(&self) -> Result<Vec<Course>, CatalogError> {
        self.get(&self.courses_path).await
    }

    async fn list_instructors(&self) -> Result<Vec<Instructor>, CatalogError> {
        self.get(&self.instructors_path).await
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    /// Answers a single request with `status` and `body`, returning the base URL.
    async fn serve_once(status: &'static str, body: &'static str) -> TestResult<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };

            let mut request: Vec<u8> = Vec::new();
            let mut buf = [0_u8; 1024];

            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => return,
                    Ok(n) => request.extend(buf.iter().take(n)),
                }
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );

            _ = socket.write_all(response.as_bytes()).await;
            _ = socket.shutdown().await;
        });

        Ok(format!("http://{addr}"))
    }

    fn local_catalog(base_url: String) -> TestResult<HttpCatalog> {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()?;

        Ok(HttpCatalog::with_client(base_url, client))
    }

    #[tokio::test]
    async fn fetches_courses_over_http() -> TestResult {
        let base_url = serve_once(
            "200 OK",
            r#"[{"id":7,"name":"Rust Async","price":79.5,"image":"","description":"","duration":"3 weeks","level":"Advanced","instructor":"Ada Byron"}]"#,
        )
        .await?;

        let courses = local_catalog(base_url)?.list_courses().await?;

        let [course] = courses.as_slice() else {
            return Err("expected exactly one course".into());
        };

        assert_eq!(course.id.get(), 7);
        assert_eq!(course.name, "Rust Async");

        Ok(())
    }

    #[tokio::test]
    async fn error_status_is_http_error() -> TestResult {
        let base_url = serve_once("404 Not Found", "{}").await?;

        let result = local_catalog(base_url)?.list_instructors().await;

        assert!(matches!(result, Err(CatalogError::Http(_))));

        Ok(())
    }

    #[test]
    fn urls_join_without_doubled_slashes() -> TestResult {
        let catalog = HttpCatalog::new("https://shop.example/", Duration::from_secs(1))?;

        assert_eq!(
            catalog.url_for(COURSES_FILE),
            "https://shop.example/allCourses.json"
        );
        assert_eq!(
            catalog.url_for("/data/teachers.json"),
            "https://shop.example/data/teachers.json"
        );

        Ok(())
    }

    #[test]
    fn listing_paths_can_be_overridden() -> TestResult {
        let catalog = HttpCatalog::new("https://shop.example", Duration::from_secs(1))?
            .with_courses_path("v2/courses.json");

        assert_eq!(
            catalog.url_for(&catalog.courses_path),
            "https://shop.example/v2/courses.json"
        );

        Ok(())
    }
}
