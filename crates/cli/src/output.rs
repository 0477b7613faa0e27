//! Terminal output

use std::io::{self, Write};

use coursecart::{
    cart::Cart,
    catalog::CourseDetails,
    courses::{Course, Instructor},
    pricing::PricingState,
};
use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

/// Writes the course listing, marking courses already in the cart.
pub(crate) fn write_courses(
    out: &mut impl Write,
    courses: &[Course],
    cart: &Cart,
    currency: &'static Currency,
) -> io::Result<()> {
    if courses.is_empty() {
        return writeln!(out, "No courses found.");
    }

    let mut builder = Builder::default();

    builder.push_record(["ID", "Course", "Level", "Duration", "Instructor", "Price", ""]);

    for course in courses {
        builder.push_record([
            course.id.to_string(),
            course.name.clone(),
            course.level.to_string(),
            course.duration.clone(),
            course.instructor.clone(),
            course.price.to_money(currency).to_string(),
            if cart.contains(course.id) { "in cart" } else { "" }.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(5..6), Alignment::right());

    writeln!(out, "{table}")?;
    writeln!(out, " {} courses, {} in cart", courses.len(), cart.len())
}

/// Writes the instructor roster.
pub(crate) fn write_instructors(out: &mut impl Write, instructors: &[Instructor]) -> io::Result<()> {
    if instructors.is_empty() {
        return writeln!(out, "No instructors found.");
    }

    let mut builder = Builder::default();

    builder.push_record(["Instructor", "Expertise", "Rating", "Students"]);

    for instructor in instructors {
        builder.push_record([
            instructor.name.clone(),
            instructor.expertise.clone(),
            instructor
                .rating
                .map(|rating| format!("{rating:.1}"))
                .unwrap_or_default(),
            instructor
                .students
                .map(|students| students.to_string())
                .unwrap_or_default(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(2..4), Alignment::right());

    writeln!(out, "{table}")
}

/// Writes a single course with its instructor.
pub(crate) fn write_course_details(
    out: &mut impl Write,
    details: &CourseDetails,
    currency: &'static Currency,
) -> io::Result<()> {
    let course = &details.course;

    writeln!(out, "{} (#{})", course.name, course.id)?;
    writeln!(out, "  {} | {} | {}", course.level, course.duration, course.price.to_money(currency))?;

    if !course.description.is_empty() {
        writeln!(out, "\n  {}", course.description)?;
    }

    match &details.instructor {
        Some(instructor) => {
            writeln!(out, "\nInstructor: {}", instructor.name)?;

            if !instructor.expertise.is_empty() {
                writeln!(out, "  Expertise: {}", instructor.expertise)?;
            }

            if let Some(rating) = instructor.rating {
                writeln!(out, "  Rating: {rating:.1}")?;
            }

            if let Some(students) = instructor.students {
                writeln!(out, "  Students: {students}")?;
            }

            if !instructor.bio.is_empty() {
                writeln!(out, "  {}", instructor.bio)?;
            }
        }
        None => writeln!(out, "\nInstructor: {}", course.instructor)?,
    }

    let status = if details.in_cart { "In your cart" } else { "Not in your cart" };

    writeln!(out, "\n{status} ({} in cart)", details.cart_count)
}

/// Writes the cart contents followed by its pricing.
pub(crate) fn write_cart(out: &mut impl Write, cart: &Cart, pricing: &PricingState) -> io::Result<()> {
    if cart.is_empty() {
        return writeln!(out, "Your cart is empty!");
    }

    let mut builder = Builder::default();

    builder.push_record(["#", "ID", "Course", "Price"]);

    for (idx, entry) in cart.iter().enumerate() {
        let course = entry.course();

        builder.push_record([
            (idx + 1).to_string(),
            course.id.to_string(),
            course.name.clone(),
            course.price.to_money(cart.currency()).to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..4), Alignment::right());

    writeln!(out, "{table}")?;

    write_pricing(out, pricing)
}

/// Writes subtotal, discount and total.
pub(crate) fn write_pricing(out: &mut impl Write, pricing: &PricingState) -> io::Result<()> {
    writeln!(out, " Subtotal: {}", pricing.subtotal)?;

    if pricing.has_discount() {
        writeln!(out, " Discount: -{}", pricing.discount)?;
    }

    writeln!(out, " Total: {}", pricing.total)
}

#[cfg(test)]
mod tests {
    use coursecart::{
        cart::CartEntry,
        courses::{CourseId, InstructorId, Level},
        prices::Price,
    };
    use rusty_money::{Money, iso};
    use testresult::TestResult;

    use super::*;

    fn course(id: u32, price: u32) -> TestResult<Course> {
        Ok(Course {
            id: CourseId::new(id)?,
            name: format!("Course {id}"),
            price: Price::whole(price),
            image: String::new(),
            description: String::new(),
            duration: "2 weeks".to_string(),
            level: Level::Intermediate,
            instructor: "Grace Hopper".to_string(),
            instructor_id: None,
        })
    }

    #[test]
    fn course_listing_marks_cart_entries() -> TestResult {
        let courses = [course(1, 40)?, course(2, 90)?];
        let cart = Cart::with_entries([CartEntry::new(course(2, 90)?)], iso::USD);

        let mut out = Vec::new();
        write_courses(&mut out, &courses, &cart, iso::USD)?;
        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Course 1"), "{rendered}");
        assert!(rendered.contains("in cart"), "{rendered}");
        assert!(rendered.contains("2 courses, 1 in cart"), "{rendered}");

        Ok(())
    }

    #[test]
    fn instructor_roster_leaves_missing_stats_blank() -> TestResult {
        let instructors = [
            Instructor {
                id: InstructorId::new(1)?,
                name: "Michael Chen".to_string(),
                image: String::new(),
                expertise: "Data Science".to_string(),
                rating: Some(4.9),
                students: Some(8900),
                bio: String::new(),
            },
            Instructor {
                id: InstructorId::new(2)?,
                name: "Emily Davis".to_string(),
                image: String::new(),
                expertise: String::new(),
                rating: None,
                students: None,
                bio: String::new(),
            },
        ];

        let mut out = Vec::new();
        write_instructors(&mut out, &instructors)?;
        let rendered = String::from_utf8(out)?;

        assert!(rendered.contains("Michael Chen"), "{rendered}");
        assert!(rendered.contains("4.9"), "{rendered}");
        assert!(rendered.contains("8900"), "{rendered}");
        assert!(rendered.contains("Emily Davis"), "{rendered}");

        Ok(())
    }

    #[test]
    fn empty_listing_says_so() -> TestResult {
        let mut out = Vec::new();
        write_courses(&mut out, &[], &Cart::new(iso::USD), iso::USD)?;

        assert_eq!(String::from_utf8(out)?, "No courses found.\n");

        Ok(())
    }

    #[test]
    fn cart_shows_discount_line_only_when_discounted() -> TestResult {
        let cart = Cart::with_entries([CartEntry::new(course(1, 150)?)], iso::USD);

        let plain = PricingState::derive(&cart, None)?;
        let discounted = PricingState::derive(&cart, Some(Money::from_minor(20_00, iso::USD)))?;

        let mut out = Vec::new();
        write_cart(&mut out, &cart, &plain)?;
        assert!(!String::from_utf8(out)?.contains("Discount"), "no promo applied");

        let mut out = Vec::new();
        write_cart(&mut out, &cart, &discounted)?;
        assert!(String::from_utf8(out)?.contains("Discount"), "promo applied");

        Ok(())
    }
}
