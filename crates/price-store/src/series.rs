use chrono::NaiveDate;
use core_types::{PriceField, PricePoint};
use std::collections::HashSet;
use std::iter::Rev;
use std::slice::Iter;

/// A chronologically sorted, date-unique list of daily observations.
///
/// Storage is always ascending. Plotting reads [`PriceSeries::ascending`];
/// return lookups read [`PriceSeries::descending`], which walks the same buffer
/// backwards instead of keeping a second copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series from points in wire order.
    ///
    /// When two points share a trade date the first one seen is kept.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = PricePoint>,
    {
        let mut seen = HashSet::new();
        let mut points: Vec<PricePoint> = points
            .into_iter()
            .filter(|p| seen.insert(p.trade_date))
            .collect();
        // Dates are unique at this point, so the sort order is total.
        points.sort_by_key(|p| p.trade_date);
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Oldest first.
    pub fn ascending(&self) -> &[PricePoint] {
        &self.points
    }

    /// Most recent first.
    pub fn descending(&self) -> Rev<Iter<'_, PricePoint>> {
        self.points.iter().rev()
    }

    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn earliest(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// The observation for exactly `date`, if that was a trading day.
    pub fn get(&self, date: NaiveDate) -> Option<&PricePoint> {
        self.position(date).map(|idx| &self.points[idx])
    }

    /// Ascending index of the observation for `date`.
    pub fn position(&self, date: NaiveDate) -> Option<usize> {
        self.points.binary_search_by_key(&date, |p| p.trade_date).ok()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.trade_date).collect()
    }

    /// One field across the series, oldest first.
    pub fn values(&self, field: PriceField) -> Vec<Option<f64>> {
        self.points.iter().map(|p| p.price(field)).collect()
    }

    /// Observations on or after `start`, oldest first.
    pub fn since(&self, start: NaiveDate) -> &[PricePoint] {
        let idx = self.points.partition_point(|p| p.trade_date < start);
        &self.points[idx..]
    }

    /// An owned series holding the observations on or after `start`.
    pub fn window_since(&self, start: NaiveDate) -> PriceSeries {
        PriceSeries {
            points: self.since(start).to_vec(),
        }
    }

    /// True when no observation carries any price at all.
    pub fn is_all_blank(&self) -> bool {
        self.points.iter().all(PricePoint::is_blank)
    }
}
