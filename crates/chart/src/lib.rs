//! # Fundscope Chart
//!
//! Draws price and fan charts onto a [`Surface`] and binds a crosshair to them.
//!
//! A [`Chart`] pairs a [`ChartModel`] with one surface. Once mounted through
//! [`attach`], it receives pointer events from its [`ChartContainer`], snaps
//! them to the nearest plotted bucket and publishes the resulting legend
//! values as [`events::ChartEvent`]s. The returned [`ChartHandle`] owns the
//! subscription; dropping or disposing it detaches the chart, and
//! [`ChartHandle::replace`] swaps the data without leaving a stale listener
//! behind.

pub mod binder;
pub mod crosshair;
pub mod error;
pub mod fan_view;
pub mod layout;
pub mod plot;
pub mod price_chart;
pub mod surface;

pub use binder::{
    attach, Chart, ChartContainer, ChartHandle, EventSink, PointerEvent, PointerListener,
    SubscriptionId,
};
pub use crosshair::{Crosshair, CrosshairState};
pub use error::RenderError;
pub use fan_view::FanChartView;
pub use layout::{Layout, ValueScale};
pub use plot::{ChartModel, Plot};
pub use price_chart::PriceChart;
pub use surface::{DrawOp, RecordingSurface, Stroke, Surface, SvgSurface, TextAnchor};
