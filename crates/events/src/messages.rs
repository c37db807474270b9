use crate::error::EventsError;
use chrono::NaiveDate;
use core_types::HoverState;
use serde::{Deserialize, Serialize};

/// Which kind of chart emitted an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// NAV / market / index return lines.
    Price,
    /// Monte Carlo percentile bands.
    Fan,
}

/// Payload of a crosshair move: the resolved bucket and the legend values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoverMoved {
    /// Index of the resolved time bucket in plotting order.
    pub bucket: usize,
    /// Horizontal pixel position of the bucket, for snapping the crosshair line.
    pub x: f64,
    pub trade_date: Option<NaiveDate>,
    pub state: HoverState,
}

/// The top-level chart event enum.
/// Everything the renderer tells the legend is one of these variants.
///
/// Serialized with `#[serde(tag = "type", content = "payload")]`, so a move
/// looks like `{ "type": "HoverMoved", "payload": { "bucket": 3, ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ChartEvent {
    /// The pointer resolved to a bucket and the legend must show new values.
    HoverMoved(HoverMoved),
    /// The pointer left the plot area; the legend falls back to the baseline.
    HoverCleared(HoverState),
    /// The chart has nothing to draw and shows its placeholder.
    EmptyState { kind: ChartKind, message: String },
}

impl ChartEvent {
    /// The legend values this event implies, if any.
    pub fn hover_state(&self) -> Option<&HoverState> {
        match self {
            ChartEvent::HoverMoved(moved) => Some(&moved.state),
            ChartEvent::HoverCleared(state) => Some(state),
            ChartEvent::EmptyState { .. } => None,
        }
    }

    pub fn to_json(&self) -> Result<String, EventsError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_moved_serializes_with_type_tag() {
        let event = ChartEvent::HoverMoved(HoverMoved {
            bucket: 2,
            x: 120.0,
            trade_date: NaiveDate::from_ymd_opt(2024, 1, 10),
            state: HoverState::default(),
        });
        let json: serde_json::Value = serde_json::from_str(&event.to_json().unwrap()).unwrap();
        assert_eq!(json["type"], "HoverMoved");
        assert_eq!(json["payload"]["bucket"], 2);
        assert_eq!(json["payload"]["trade_date"], "2024-01-10");
    }

    #[test]
    fn empty_state_has_no_hover_values() {
        let event = ChartEvent::EmptyState {
            kind: ChartKind::Fan,
            message: "No simulation data".to_string(),
        };
        assert!(event.hover_state().is_none());
        assert!(event.to_json().unwrap().contains("\"kind\":\"fan\""));
    }
}
