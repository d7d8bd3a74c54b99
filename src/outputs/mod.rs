//! Output generation for exported articles.
//!
//! # Submodules
//!
//! - [`seo`]: meta-tag assembly, truncation rules, reading time, JSON-LD
//!   structured data, and HTML escaping
//! - [`html`]: renders the complete self-contained document and writes it to
//!   a timestamp-named file under the output directory
//!
//! One run produces exactly one file:
//!
//! ```text
//! exports/
//! └── article_20250106T143000.html
//! ```

pub mod html;
pub mod seo;
