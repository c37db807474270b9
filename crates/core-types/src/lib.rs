//! # Fundscope Core Types
//!
//! Layer 0 of the workspace. Every other crate speaks in these types: the daily
//! `PricePoint`, the `PriceField` selector, the lookback `Period`, and the derived
//! `ReturnFigure` / `HoverState` values handed to presentation code.

pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{Period, PriceField};
pub use error::CoreError;
pub use structs::{HoverState, PricePoint, ReturnFigure};
