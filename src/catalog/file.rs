//! Local catalog files

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::courses::{Course, Instructor};

use super::{COURSES_FILE, CatalogError, CatalogGateway, INSTRUCTORS_FILE};

/// Reads listings from a directory of JSON or YAML files.
///
/// Files ending in `.yml` or `.yaml` are parsed as YAML, anything else as JSON.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    dir: PathBuf,
    courses_file: String,
    instructors_file: String,
}

impl FileCatalog {
    /// Catalog rooted at `dir` using the default file names.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            courses_file: COURSES_FILE.to_string(),
            instructors_file: INSTRUCTORS_FILE.to_string(),
        }
    }

    /// Override the course listing file name.
    #[must_use]
    pub fn with_courses_file(mut self, name: impl Into<String>) -> Self {
        self.courses_file = name.into();
        self
    }

    /// Override the instructor listing file name.
    #[must_use]
    pub fn with_instructors_file(mut self, name: impl Into<String>) -> Self {
        self.instructors_file = name.into();
        self
    }

    /// Root directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn load<T: DeserializeOwned>(&self, name: &str) -> Result<Vec<T>, CatalogError> {
        let path = self.dir.join(name);

        debug!(path = %path.display(), "reading catalog file");

        let contents = tokio::fs::read_to_string(&path).await?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yml") || ext.eq_ignore_ascii_case("yaml"));

        if is_yaml {
            Ok(serde_norway::from_str(&contents)?)
        } else {
            Ok(serde_json::from_str(&contents)?)
        }
    }
}

#[async_trait]
impl CatalogGateway for FileCatalog {
    async fn list_courses(&self) -> Result<Vec<Course>, CatalogError> {
        self.load(&self.courses_file).await
    }

    async fn list_instructors(&self) -> Result<Vec<Instructor>, CatalogError> {
        self.load(&self.instructors_file).await
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use testresult::TestResult;

    use super::*;

    const COURSES: &str = r#"[
        {
            "id": 1,
            "name": "Rust Basics",
            "price": 49.99,
            "image": "/img/rust.png",
            "description": "Ownership and borrowing",
            "duration": "6 weeks",
            "level": "Beginner",
            "instructor": "Ada Byron"
        }
    ]"#;

    const INSTRUCTORS_YAML: &str = "
- id: 1
  name: Ada Byron
  photo: /img/ada.png
  specialization: Systems
  rating: 4.8
  students: 1200
";

    #[tokio::test]
    async fn reads_json_courses() -> TestResult {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(COURSES_FILE), COURSES)?;

        let courses = FileCatalog::new(dir.path()).list_courses().await?;

        assert_eq!(courses.len(), 1);
        assert_eq!(courses.first().map(|c| c.name.as_str()), Some("Rust Basics"));

        Ok(())
    }

    #[tokio::test]
    async fn reads_yaml_instructors_by_extension() -> TestResult {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("teachers.yml"), INSTRUCTORS_YAML)?;

        let instructors = FileCatalog::new(dir.path())
            .with_instructors_file("teachers.yml")
            .list_instructors()
            .await?;

        let [ada] = instructors.as_slice() else {
            return Err("expected exactly one instructor".into());
        };

        assert_eq!(ada.name, "Ada Byron");
        assert_eq!(ada.expertise, "Systems");
        assert_eq!(ada.students, Some(1200));

        Ok(())
    }

    #[tokio::test]
    async fn missing_file_is_io_error() -> TestResult {
        let dir = tempfile::tempdir()?;

        let result = FileCatalog::new(dir.path()).list_courses().await;

        assert!(matches!(result, Err(CatalogError::Io(_))));

        Ok(())
    }

    #[tokio::test]
    async fn malformed_json_is_parse_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join(COURSES_FILE), "{ not json")?;

        let result = FileCatalog::new(dir.path()).list_courses().await;

        assert!(matches!(result, Err(CatalogError::Json(_))));

        Ok(())
    }
}
