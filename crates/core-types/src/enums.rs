use crate::error::CoreError;
use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which of the three aligned price series an operation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceField {
    /// The fund's official net asset value (`nav_price`).
    Nav,
    /// The exchange closing price (`close_price`).
    Market,
    /// The benchmark index level (`obj_stk_prc_idx`).
    Index,
}

impl PriceField {
    pub const ALL: [PriceField; 3] = [PriceField::Nav, PriceField::Market, PriceField::Index];

    /// Short display name used in legends and tables.
    pub fn display_name(&self) -> &'static str {
        match self {
            PriceField::Nav => "NAV",
            PriceField::Market => "Market",
            PriceField::Index => "Index",
        }
    }
}

/// A named lookback duration selected from the period selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    OneWeek,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    ThreeYears,
    FiveYears,
}

impl Period {
    /// All periods in selector order, shortest first.
    pub const ALL: [Period; 7] = [
        Period::OneWeek,
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::ThreeYears,
        Period::FiveYears,
    ];

    /// The label shown on the period selector.
    pub fn label(&self) -> &'static str {
        match self {
            Period::OneWeek => "1주",
            Period::OneMonth => "1개월",
            Period::ThreeMonths => "3개월",
            Period::SixMonths => "6개월",
            Period::OneYear => "1년",
            Period::ThreeYears => "3년",
            Period::FiveYears => "5년",
        }
    }

    /// Parses either the selector label ("1년") or its short ASCII form ("1y").
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim() {
            "1주" | "1w" => Some(Period::OneWeek),
            "1개월" | "1m" => Some(Period::OneMonth),
            "3개월" | "3m" => Some(Period::ThreeMonths),
            "6개월" | "6m" => Some(Period::SixMonths),
            "1년" | "1y" => Some(Period::OneYear),
            "3년" | "3y" => Some(Period::ThreeYears),
            "5년" | "5y" => Some(Period::FiveYears),
            _ => None,
        }
    }

    /// The calendar date this period looks back to from `today`.
    ///
    /// Month arithmetic clamps to the end of the month, so 2024-03-31 minus one
    /// month is 2024-02-29. Returns `None` only if the date would underflow.
    pub fn target_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::OneWeek => today.checked_sub_days(Days::new(7)),
            Period::OneMonth => today.checked_sub_months(Months::new(1)),
            Period::ThreeMonths => today.checked_sub_months(Months::new(3)),
            Period::SixMonths => today.checked_sub_months(Months::new(6)),
            Period::OneYear => today.checked_sub_months(Months::new(12)),
            Period::ThreeYears => today.checked_sub_months(Months::new(36)),
            Period::FiveYears => today.checked_sub_months(Months::new(60)),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::parse(s).ok_or_else(|| CoreError::UnknownPeriod(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn labels_round_trip_through_parse() {
        for period in Period::ALL {
            assert_eq!(Period::parse(period.label()), Some(period));
        }
        assert_eq!(Period::parse("3y"), Some(Period::ThreeYears));
        assert_eq!(Period::parse("2주"), None);
    }

    #[test]
    fn unknown_label_is_an_error_not_a_panic() {
        let err = "10년".parse::<Period>().unwrap_err();
        assert_eq!(err, CoreError::UnknownPeriod("10년".to_string()));
    }

    #[test]
    fn one_week_looks_back_seven_days() {
        assert_eq!(
            Period::OneWeek.target_date(date("2024-01-17")),
            Some(date("2024-01-10"))
        );
    }

    #[test]
    fn month_lookback_clamps_to_month_end() {
        assert_eq!(
            Period::OneMonth.target_date(date("2024-03-31")),
            Some(date("2024-02-29"))
        );
        assert_eq!(
            Period::FiveYears.target_date(date("2024-02-29")),
            Some(date("2019-02-28"))
        );
    }
}
