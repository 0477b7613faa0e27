//! Courses
//!
//! Catalog records as published by the marketplace. The cart only ever holds
//! copies of these, captured at the moment a course is added.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prices::Price;

/// Errors raised when building course records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CourseError {
    /// Course identifiers start at 1.
    #[error("course id must be positive")]
    NonPositiveId,

    /// Instructor identifiers start at 1.
    #[error("instructor id must be positive")]
    NonPositiveInstructorId,

    /// Level text didn't match a known level.
    #[error("unknown course level: {0}")]
    UnknownLevel(String),
}

/// Course identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct CourseId(u32);

impl CourseId {
    /// Create a course id.
    ///
    /// # Errors
    ///
    /// Returns [`CourseError::NonPositiveId`] for `0`.
    pub fn new(id: u32) -> Result<Self, CourseError> {
        if id == 0 {
            return Err(CourseError::NonPositiveId);
        }

        Ok(Self(id))
    }

    /// Raw identifier value.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for CourseId {
    type Error = CourseError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CourseId> for u32 {
    fn from(id: CourseId) -> Self {
        id.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Instructor identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct InstructorId(u32);

impl InstructorId {
    /// Create an instructor id.
    ///
    /// # Errors
    ///
    /// Returns [`CourseError::NonPositiveInstructorId`] for `0`.
    pub fn new(id: u32) -> Result<Self, CourseError> {
        if id == 0 {
            return Err(CourseError::NonPositiveInstructorId);
        }

        Ok(Self(id))
    }
}

impl TryFrom<u32> for InstructorId {
    type Error = CourseError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<InstructorId> for u32 {
    fn from(id: InstructorId) -> Self {
        id.0
    }
}

/// Course difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    /// No prior knowledge assumed
    Beginner,

    /// Some prior knowledge assumed
    Intermediate,

    /// Expert material
    Advanced,
}

impl Level {
    /// All levels in display order.
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    /// Level name as shown to users.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Level {
    type Err = CourseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Level::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| CourseError::UnknownLevel(s.to_string()))
    }
}

/// Course record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Unique course identifier
    pub id: CourseId,

    /// Course title
    pub name: String,

    /// Course price
    pub price: Price,

    /// Image URI
    pub image: String,

    /// Short description
    pub description: String,

    /// Human readable duration, e.g. "8 weeks"
    pub duration: String,

    /// Difficulty
    pub level: Level,

    /// Instructor display name
    pub instructor: String,

    /// Stable instructor reference, when the catalog provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor_id: Option<InstructorId>,
}

/// Instructor record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instructor {
    /// Unique instructor identifier
    pub id: InstructorId,

    /// Display name
    pub name: String,

    /// Portrait URI
    #[serde(default, alias = "photo")]
    pub image: String,

    /// Area of expertise
    #[serde(default, alias = "specialization")]
    pub expertise: String,

    /// Average rating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,

    /// Number of students taught
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub students: Option<u32>,

    /// Biography
    #[serde(default, alias = "description")]
    pub bio: String,
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use super::*;

    const COURSE_JSON: &str = r#"{
        "id": 3,
        "name": "Rust for Web Developers",
        "price": 89.5,
        "image": "https://img.example/rust.png",
        "description": "Ownership without tears",
        "duration": "6 weeks",
        "level": "Intermediate",
        "instructor": "Ada Byron"
    }"#;

    #[test]
    fn course_id_rejects_zero() {
        assert_eq!(CourseId::new(0), Err(CourseError::NonPositiveId));
    }

    #[test]
    fn course_deserializes_without_instructor_id() -> TestResult {
        let course: Course = serde_json::from_str(COURSE_JSON)?;

        assert_eq!(course.id, CourseId::new(3)?);
        assert_eq!(*course.price, Decimal::new(895, 1));
        assert_eq!(course.level, Level::Intermediate);
        assert_eq!(course.instructor_id, None);

        Ok(())
    }

    #[test]
    fn course_serializes_legacy_field_set() -> TestResult {
        let course: Course = serde_json::from_str(COURSE_JSON)?;
        let value = serde_json::to_value(&course)?;

        let mut keys: Vec<_> = value
            .as_object()
            .map(|object| object.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();

        assert_eq!(
            keys,
            [
                "description",
                "duration",
                "id",
                "image",
                "instructor",
                "level",
                "name",
                "price"
            ]
        );

        Ok(())
    }

    #[test]
    fn course_with_zero_id_fails_to_deserialize() {
        let json = COURSE_JSON.replace("\"id\": 3", "\"id\": 0");

        assert!(serde_json::from_str::<Course>(&json).is_err());
    }

    #[test]
    fn instructor_accepts_legacy_aliases() -> TestResult {
        let instructor: Instructor = serde_json::from_str(
            r#"{
                "id": 1,
                "name": "Ada Byron",
                "photo": "https://img.example/ada.png",
                "specialization": "Systems",
                "description": "Writes compilers for fun"
            }"#,
        )?;

        assert_eq!(instructor.image, "https://img.example/ada.png");
        assert_eq!(instructor.expertise, "Systems");
        assert_eq!(instructor.bio, "Writes compilers for fun");
        assert_eq!(instructor.rating, None);

        Ok(())
    }

    #[test]
    fn level_parses_case_insensitively() -> TestResult {
        assert_eq!("advanced".parse::<Level>()?, Level::Advanced);
        assert!("Expert".parse::<Level>().is_err());

        Ok(())
    }
}
