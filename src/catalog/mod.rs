//! Catalog
//!
//! Read-only access to the course and instructor listings. Gateways fetch the
//! raw records; [`Catalog`] adds timeouts and retries on top and turns
//! failures into an explicit [`Availability::Unavailable`] state so callers
//! can tell "no courses" apart from "couldn't load courses".

use std::{fmt, future::Future, io, str::FromStr, time::Duration};

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::{
    cart::Cart,
    courses::{Course, CourseError, CourseId, Instructor, Level},
};

mod file;
mod http;

pub use file::FileCatalog;
pub use http::HttpCatalog;

/// Default file holding the course listing.
pub const COURSES_FILE: &str = "allCourses.json";

/// Default file holding the instructor listing.
pub const INSTRUCTORS_FILE: &str = "teacherData.json";

/// Catalog fetch errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading a local catalog file failed.
    #[error("failed to read catalog file: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing error
    #[error("failed to parse catalog JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("failed to parse catalog YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Fetching a remote catalog failed.
    #[error("failed to fetch catalog: {0}")]
    Http(#[from] reqwest::Error),

    /// The fetch didn't finish in time.
    #[error("catalog fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// Source of catalog records.
#[automock]
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Fetch every course.
    async fn list_courses(&self) -> Result<Vec<Course>, CatalogError>;

    /// Fetch every instructor.
    async fn list_instructors(&self) -> Result<Vec<Instructor>, CatalogError>;
}

/// Outcome of a listing fetch.
#[derive(Debug)]
pub enum Availability<T> {
    /// Fetched. The listing itself may be empty.
    Ready(T),

    /// Couldn't be fetched, even after retrying.
    Unavailable(CatalogError),
}

impl<T> Availability<T> {
    /// The fetched value, if any.
    pub fn ready(self) -> Option<T> {
        match self {
            Availability::Ready(value) => Some(value),
            Availability::Unavailable(_) => None,
        }
    }

    /// Whether the fetch failed.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Availability::Unavailable(_))
    }

    /// Convert into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the fetch error when unavailable.
    pub fn into_result(self) -> Result<T, CatalogError> {
        match self {
            Availability::Ready(value) => Ok(value),
            Availability::Unavailable(err) => Err(err),
        }
    }
}

/// Outcome of looking up a single course.
#[derive(Debug)]
pub enum CourseLookup<T> {
    /// The course exists.
    Found(T),

    /// The catalog loaded, but has no course with that id.
    NotFound(CourseId),

    /// The catalog couldn't be fetched.
    Unavailable(CatalogError),
}

impl<T> CourseLookup<T> {
    /// The found value, if any.
    pub fn found(self) -> Option<T> {
        match self {
            CourseLookup::Found(value) => Some(value),
            CourseLookup::NotFound(_) | CourseLookup::Unavailable(_) => None,
        }
    }
}

/// A course with everything its detail view shows.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDetails {
    /// The course
    pub course: Course,

    /// Its instructor, if one could be matched
    pub instructor: Option<Instructor>,

    /// Whether the course is already in the cart
    pub in_cart: bool,

    /// Number of courses in the cart
    pub cart_count: usize,
}

/// Course level filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LevelFilter {
    /// Every course
    #[default]
    All,

    /// Only courses of one level
    Only(Level),
}

impl LevelFilter {
    /// Whether `course` passes the filter.
    pub fn matches(self, course: &Course) -> bool {
        match self {
            LevelFilter::All => true,
            LevelFilter::Only(level) => course.level == level,
        }
    }
}

impl FromStr for LevelFilter {
    type Err = CourseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(LevelFilter::All);
        }

        s.parse().map(LevelFilter::Only)
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelFilter::All => f.write_str("All"),
            LevelFilter::Only(level) => level.fmt(f),
        }
    }
}

/// Timeout and retry settings for catalog fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Limit on each attempt
    pub timeout: Duration,

    /// Attempts before giving up (at least one is always made)
    pub attempts: u32,

    /// Pause between attempts
    pub backoff: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            attempts: 3,
            backoff: Duration::from_millis(250),
        }
    }
}

/// Catalog service
#[derive(Debug)]
pub struct Catalog<G> {
    gateway: G,
    policy: FetchPolicy,
}

impl<G: CatalogGateway> Catalog<G> {
    /// Wrap a gateway with the default fetch policy.
    pub fn new(gateway: G) -> Self {
        Self::with_policy(gateway, FetchPolicy::default())
    }

    /// Wrap a gateway with a custom fetch policy.
    pub fn with_policy(gateway: G, policy: FetchPolicy) -> Self {
        Self { gateway, policy }
    }

    /// The wrapped gateway
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// List courses passing `filter`, in catalog order.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn courses(&self, filter: LevelFilter) -> Availability<Vec<Course>> {
        match self.fetch("courses", || self.gateway.list_courses()).await {
            Ok(courses) => Availability::Ready(
                courses
                    .into_iter()
                    .filter(|course| filter.matches(course))
                    .collect(),
            ),
            Err(err) => Availability::Unavailable(err),
        }
    }

    /// List instructors.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn instructors(&self) -> Availability<Vec<Instructor>> {
        match self
            .fetch("instructors", || self.gateway.list_instructors())
            .await
        {
            Ok(instructors) => Availability::Ready(instructors),
            Err(err) => Availability::Unavailable(err),
        }
    }

    /// Look up a single course.
    pub async fn course(&self, id: CourseId) -> CourseLookup<Course> {
        match self.courses(LevelFilter::All).await {
            Availability::Ready(courses) => courses
                .into_iter()
                .find(|course| course.id == id)
                .map_or(CourseLookup::NotFound(id), CourseLookup::Found),
            Availability::Unavailable(err) => CourseLookup::Unavailable(err),
        }
    }

    /// Look up a course with its instructor and cart status.
    ///
    /// An unavailable instructor listing leaves `instructor` empty rather than
    /// failing the lookup.
    #[tracing::instrument(level = "debug", skip(self, cart))]
    pub async fn course_details(&self, id: CourseId, cart: &Cart) -> CourseLookup<CourseDetails> {
        let course = match self.course(id).await {
            CourseLookup::Found(course) => course,
            CourseLookup::NotFound(id) => return CourseLookup::NotFound(id),
            CourseLookup::Unavailable(err) => return CourseLookup::Unavailable(err),
        };

        let instructor = match self.instructors().await {
            Availability::Ready(instructors) => find_instructor(&course, &instructors).cloned(),
            Availability::Unavailable(err) => {
                warn!(error = %err, "instructor listing unavailable");
                None
            }
        };

        CourseLookup::Found(CourseDetails {
            in_cart: cart.contains(course.id),
            cart_count: cart.len(),
            course,
            instructor,
        })
    }

    async fn fetch<T, F, Fut>(&self, what: &'static str, op: F) -> Result<T, CatalogError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, CatalogError>>,
    {
        let attempts = self.policy.attempts.max(1);
        let mut attempt = 1;

        loop {
            let result = match timeout(self.policy.timeout, op()).await {
                Ok(result) => result,
                Err(_elapsed) => Err(CatalogError::Timeout(self.policy.timeout)),
            };

            match result {
                Ok(value) => {
                    debug!(what, attempt, "fetched catalog listing");
                    return Ok(value);
                }
                Err(err) if attempt < attempts => {
                    warn!(what, attempt, error = %err, "catalog fetch failed; retrying");
                    sleep(self.policy.backoff).await;
                    attempt += 1;
                }
                Err(err) => {
                    warn!(what, attempt, error = %err, "catalog fetch failed; giving up");
                    return Err(err);
                }
            }
        }
    }
}

/// Find the instructor for a course.
///
/// Uses the course's `instructorId` when it has one. Courses without an id
/// fall back to matching the instructor's name, which breaks if an
/// instructor is renamed.
pub fn find_instructor<'a>(course: &Course, instructors: &'a [Instructor]) -> Option<&'a Instructor> {
    if let Some(id) = course.instructor_id {
        return instructors.iter().find(|instructor| instructor.id == id);
    }

    debug!(course_id = %course.id, "joining instructor by name");

    instructors
        .iter()
        .find(|instructor| instructor.name == course.instructor)
}
