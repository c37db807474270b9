use chrono::NaiveDate;
use core_types::{Period, PriceField, ReturnFigure};
use serde::{Deserialize, Serialize};

/// One line of the returns table: a period across all three series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnRow {
    pub period: Period,
    pub nav: ReturnFigure,
    pub market: ReturnFigure,
    pub index: ReturnFigure,
}

impl ReturnRow {
    pub fn figure(&self, field: PriceField) -> &ReturnFigure {
        match field {
            PriceField::Nav => &self.nav,
            PriceField::Market => &self.market,
            PriceField::Index => &self.index,
        }
    }
}

/// Period returns for every selector entry, as of one date.
///
/// This is the data behind the returns table on the ETF detail page. It is
/// recomputed whenever the series is replaced and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnReport {
    pub as_of: NaiveDate,
    /// Date of the observation every figure is compared against.
    pub latest_date: Option<NaiveDate>,
    pub rows: Vec<ReturnRow>,
}

impl ReturnReport {
    pub fn figure(&self, period: Period, field: PriceField) -> Option<&ReturnFigure> {
        self.rows
            .iter()
            .find(|row| row.period == period)
            .map(|row| row.figure(field))
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::ReturnCalculator;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;
    use core_types::{Period, PriceField, PricePoint};
    use price_store::PriceSeries;

    #[test]
    fn report_has_a_row_per_period() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();
        let series = PriceSeries::from_points(vec![
            PricePoint {
                trade_date: today,
                nav_price: Some(110.0),
                close_price: Some(111.0),
                index_value: Some(220.0),
            },
            PricePoint {
                trade_date: NaiveDate::from_ymd_opt(2023, 12, 15).unwrap(),
                nav_price: Some(100.0),
                close_price: Some(100.0),
                index_value: Some(200.0),
            },
        ]);

        let report = ReturnCalculator::as_of(today).report(&series);
        assert_eq!(report.rows.len(), Period::ALL.len());
        assert_eq!(report.latest_date, Some(today));

        let month = report.figure(Period::OneMonth, PriceField::Index).unwrap();
        assert_relative_eq!(month.percent_change.unwrap(), 10.0);
        let week = report.figure(Period::OneWeek, PriceField::Market).unwrap();
        assert_relative_eq!(week.percent_change.unwrap(), 11.0);
        let year = report.figure(Period::OneYear, PriceField::Nav).unwrap();
        assert_eq!(year.percent_change, None);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["rows"][0]["nav"]["period_label"], "1주");
    }
}
