use crate::enums::PriceField;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading-day observation for a single ETF.
///
/// Every price is optional: the upstream service routinely omits fields or sends
/// values that do not parse, and those degrade to `None` at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub trade_date: NaiveDate,
    pub nav_price: Option<f64>,
    pub close_price: Option<f64>,
    pub index_value: Option<f64>,
}

impl PricePoint {
    /// Reads the price selected by `field`.
    pub fn price(&self, field: PriceField) -> Option<f64> {
        match field {
            PriceField::Nav => self.nav_price,
            PriceField::Market => self.close_price,
            PriceField::Index => self.index_value,
        }
    }

    /// True when none of the three prices is present.
    pub fn is_blank(&self) -> bool {
        self.nav_price.is_none() && self.close_price.is_none() && self.index_value.is_none()
    }
}

/// A period-over-period return, derived on demand and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnFigure {
    pub period_label: String,
    /// `None` means the return is undefined and is displayed as the empty marker.
    pub percent_change: Option<f64>,
    /// Price at the lookback observation.
    pub basis_price: Option<f64>,
    /// Price at the most recent observation.
    pub comparison_price: Option<f64>,
}

/// The values shown in the chart legend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HoverState {
    pub trade_date: Option<NaiveDate>,
    pub nav_return: Option<f64>,
    pub nav_price: Option<f64>,
    pub market_return: Option<f64>,
    pub market_price: Option<f64>,
    pub index_return: Option<f64>,
    pub index_price: Option<f64>,
}

impl HoverState {
    pub fn price(&self, field: PriceField) -> Option<f64> {
        match field {
            PriceField::Nav => self.nav_price,
            PriceField::Market => self.market_price,
            PriceField::Index => self.index_price,
        }
    }

    pub fn return_pct(&self, field: PriceField) -> Option<f64> {
        match field {
            PriceField::Nav => self.nav_return,
            PriceField::Market => self.market_return,
            PriceField::Index => self.index_return,
        }
    }

    pub fn set(&mut self, field: PriceField, price: Option<f64>, return_pct: Option<f64>) {
        match field {
            PriceField::Nav => {
                self.nav_price = price;
                self.nav_return = return_pct;
            }
            PriceField::Market => {
                self.market_price = price;
                self.market_return = return_pct;
            }
            PriceField::Index => {
                self.index_price = price;
                self.index_return = return_pct;
            }
        }
    }
}
