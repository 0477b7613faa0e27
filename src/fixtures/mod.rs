//! Fixtures

use crate::{
    courses::{Course, CourseId, Instructor, InstructorId, Level},
    prices::Price,
};

/// A beginner course priced in whole dollars.
pub(crate) fn course(id: u32, price: u32) -> Course {
    Course {
        id: CourseId::new(id).expect("fixture course ids are positive"),
        name: format!("Course {id}"),
        price: Price::whole(price),
        image: format!("/images/course-{id}.png"),
        description: String::new(),
        duration: "4 weeks".to_string(),
        level: Level::Beginner,
        instructor: "Ada Byron".to_string(),
        instructor_id: None,
    }
}

/// An instructor with only the required fields set.
pub(crate) fn instructor(id: u32, name: &str) -> Instructor {
    Instructor {
        id: InstructorId::new(id).expect("fixture instructor ids are positive"),
        name: name.to_string(),
        image: String::new(),
        expertise: String::new(),
        rating: None,
        students: None,
        bio: String::new(),
    }
}
