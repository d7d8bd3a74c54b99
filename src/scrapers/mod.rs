//! HTML scraping against external sites.
//!
//! Two scrapers, both built on an ordered-selector-strategy pattern: try each
//! selector in a fixed list and keep the first non-empty match.
//!
//! - [`article`]: extracts title and body text for the selected candidate
//!   URL, with an RSS-summary fallback when structured extraction fails
//! - [`competitors`]: collects homepage heading text from competitor sites
//!   as a weak topic-coverage signal
//!
//! Both scrapers are infallible from the caller's perspective: per-site
//! failures are logged and absorbed.

pub mod article;
pub mod competitors;
