//! Subcommands

use std::io::{self, Write};

use anyhow::{Context, bail};
use clap::Subcommand;
use tracing::{info, warn};

use coursecart::{
    cart::Cart,
    catalog::{Availability, Catalog, CatalogGateway, CourseLookup, FileCatalog, HttpCatalog, LevelFilter},
    courses::CourseId,
    storage::{CartStorage, FileStorage},
    store::{CartEvent, CartObserver, CartStore, CheckoutError},
};
use rusty_money::iso::Currency;

use crate::{config::CliConfig, output};

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List courses
    Courses {
        /// Only show courses of this level (All, Beginner, Intermediate, Advanced)
        #[arg(long, default_value_t = LevelFilter::All)]
        level: LevelFilter,
    },

    /// List instructors
    Instructors,

    /// Show a course and its instructor
    Course {
        /// Course id
        id: u32,
    },

    /// Add a course to the cart
    Add {
        /// Course id
        id: u32,
    },

    /// Remove a course from the cart
    Remove {
        /// Course id
        id: u32,
    },

    /// Show the cart and its pricing
    Cart,

    /// Check what a promo code would take off the cart
    Promo {
        /// Promo code
        code: String,
    },

    /// Pay for the cart and empty it
    Checkout {
        /// Promo code to apply first
        #[arg(long)]
        promo: Option<String>,
    },

    /// Empty the cart
    Clear,
}

/// Logs every cart change.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct LoggingObserver;

impl CartObserver for LoggingObserver {
    fn on_change(&mut self, event: &CartEvent, cart: &Cart) {
        match event {
            CartEvent::PersistFailed(reason) => {
                warn!(%reason, count = cart.len(), "cart change was not saved");
            }
            event => info!(?event, count = cart.len(), "cart changed"),
        }
    }
}

/// Run the configured subcommand against the configured catalog.
pub(crate) async fn run(config: &CliConfig) -> anyhow::Result<()> {
    let currency = config.storage.currency()?;
    let policy = config.catalog.fetch_policy();
    let store = CartStore::with_observer(
        FileStorage::new(&config.storage.data_dir),
        currency,
        LoggingObserver,
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Some(url) = &config.catalog.catalog_url {
        let gateway = HttpCatalog::new(url.as_str(), policy.timeout)?
            .with_courses_path(config.catalog.courses_file.as_str())
            .with_instructors_path(config.catalog.instructors_file.as_str());

        execute(&config.command, &Catalog::with_policy(gateway, policy), store, currency, &mut out).await
    } else {
        let gateway = FileCatalog::new(&config.catalog.catalog_dir)
            .with_courses_file(config.catalog.courses_file.as_str())
            .with_instructors_file(config.catalog.instructors_file.as_str());

        execute(&config.command, &Catalog::with_policy(gateway, policy), store, currency, &mut out).await
    }
}

/// Run one subcommand.
pub(crate) async fn execute<G, S, O>(
    command: &Command,
    catalog: &Catalog<G>,
    mut store: CartStore<S, O>,
    currency: &'static Currency,
    out: &mut impl Write,
) -> anyhow::Result<()>
where
    G: CatalogGateway,
    S: CartStorage,
    O: CartObserver,
{
    match command {
        Command::Courses { level } => match catalog.courses(*level).await {
            Availability::Ready(courses) => {
                output::write_courses(out, &courses, store.cart(), currency)?;
            }
            Availability::Unavailable(err) => {
                return Err(err).context("Course catalog is unavailable, please try again later");
            }
        },
        Command::Instructors => match catalog.instructors().await {
            Availability::Ready(instructors) => output::write_instructors(out, &instructors)?,
            Availability::Unavailable(err) => {
                return Err(err).context("Instructor listing is unavailable, please try again later");
            }
        },
        Command::Course { id } => {
            match catalog.course_details(CourseId::new(*id)?, store.cart()).await {
                CourseLookup::Found(details) => {
                    output::write_course_details(out, &details, currency)?;
                }
                CourseLookup::NotFound(id) => bail!("Course {id} not found"),
                CourseLookup::Unavailable(err) => {
                    return Err(err).context("Course catalog is unavailable, please try again later");
                }
            }
        }
        Command::Add { id } => match catalog.course(CourseId::new(*id)?).await {
            CourseLookup::Found(course) => {
                writeln!(out, "{}", store.add_course(course).message())?;
            }
            CourseLookup::NotFound(id) => bail!("Course {id} not found"),
            CourseLookup::Unavailable(err) => {
                return Err(err).context("Course catalog is unavailable, please try again later");
            }
        },
        Command::Remove { id } => {
            let id = CourseId::new(*id)?;

            match store.remove_course(id) {
                Some(entry) => writeln!(out, "Removed {} from cart", entry.course().name)?,
                None => writeln!(out, "Course {id} is not in your cart")?,
            }
        }
        Command::Cart => output::write_cart(out, store.cart(), &store.pricing())?,
        Command::Promo { code } => {
            let applied = store.apply_promo_code(code)?;

            writeln!(out, "{applied}")?;

            output::write_pricing(out, &store.pricing())?;
        }
        Command::Checkout { promo } => {
            if store.cart().is_empty() {
                bail!(CheckoutError::EmptyCart);
            }

            if let Some(code) = promo {
                let applied = store.apply_promo_code(code)?;

                writeln!(out, "{applied}")?;
            }

            store.checkout()?.write_to(&mut *out)?;

            writeln!(out, "\nThank you for your purchase!")?;
        }
        Command::Clear => {
            store.clear();

            writeln!(out, "Cart cleared")?;
        }
    }

    Ok(())
}
