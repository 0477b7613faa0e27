//! Coursecart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartEntry},
    catalog::{
        Availability, Catalog, CatalogError, CatalogGateway, CourseDetails, CourseLookup,
        FetchPolicy, FileCatalog, HttpCatalog, LevelFilter,
    },
    courses::{Course, CourseError, CourseId, Instructor, InstructorId, Level},
    prices::{Price, PriceError},
    pricing::{MINIMUM_ORDER_THRESHOLD, PricingState},
    promotions::{AppliedPromo, PromoCode, PromoError, PromoTable},
    receipt::{Receipt, ReceiptError},
    storage::{CART_STORAGE_KEY, CartStorage, FileStorage, MemoryStorage, StorageError},
    store::{AddOutcome, CartEvent, CartObserver, CartStore, CheckoutError, NoopObserver},
};
