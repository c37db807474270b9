//! # Fundscope Events
//!
//! This crate defines the events a chart instance publishes to the presentation
//! layer as the crosshair moves or the chart runs out of data.
//!
//! As a Layer 0 crate, it depends only on `core-types` and is the one vocabulary
//! the legend and the renderer share.

// Declare the modules that make up this crate.
pub mod error;
pub mod messages;

// Re-export the core types to provide a clean public API.
pub use error::EventsError;
pub use messages::{ChartEvent, ChartKind, HoverMoved};
