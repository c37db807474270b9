//! # Fundscope Analytics
//!
//! Period-over-period returns for an ETF's NAV, market price and benchmark
//! index.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** A pure logic crate with no knowledge of external systems.
//!   It depends only on `core-types` and the normalized `price-store` series.
//! - **Explicit clock:** `ReturnCalculator` is built `as_of` a date. Nothing in
//!   this crate reads the wall clock, which keeps every figure reproducible.
//! - **Undefined, not zero:** a return that cannot be computed is `None` and is
//!   displayed with the empty marker, never as `0.00`.
//!
//! ## Public API
//!
//! - `ReturnCalculator`: computes single figures and the full `ReturnReport`.
//! - `compute_return`, `percent_change`, `format_percent`: free-function forms.
//! - `AnalyticsError`: the error type for label parsing.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{
    closest_at_or_before, compute_return, format_percent, percent_change, ReturnCalculator,
};
pub use error::AnalyticsError;
pub use report::{ReturnReport, ReturnRow};
