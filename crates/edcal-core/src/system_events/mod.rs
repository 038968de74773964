//! Deterministic system events.
//!
//! Yearly industry-date templates (fixed day or rule-computed) expanded
//! into concrete read-only calendar entries. Generation is a pure
//! function of (catalog, year) and is cheap enough to re-derive on every
//! query cycle instead of caching.

pub mod catalog;
pub mod generate;
pub mod template;

pub use catalog::default_catalog;
pub use generate::{generate_for_year, generate_window, resolve_template_date};
pub use template::{DynamicRule, Template};
