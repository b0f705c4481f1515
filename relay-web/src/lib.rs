//! Price page acquisition.
//!
//! - [`page`]: fetches the price page and picks out the first `.price` element
//! - [`extract`]: HTML text extraction on top of the `scraper` parser
//!
//! Extraction follows the first matching element and does not try to survive
//! layout changes on the source page.

pub mod extract;
pub mod page;

pub use extract::extract_first_by_class;
pub use page::{DEFAULT_PRICE_SOURCE, PRICE_CLASS, PriceScraper, PriceSource, ScrapeError};
