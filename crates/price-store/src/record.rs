use chrono::NaiveDate;
use core_types::PricePoint;
use serde::Deserialize;
use serde_json::Value;

/// A daily record as it appears on the wire. Every field is kept untyped so a
/// bad value in one column never rejects the whole row.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawRecord {
    trade_date: Option<Value>,
    nav_price: Option<Value>,
    close_price: Option<Value>,
    #[serde(alias = "index_value")]
    obj_stk_prc_idx: Option<Value>,
}

/// Converts one wire record into a `PricePoint`.
///
/// Returns `None` when the record is not an object or carries no usable trade
/// date; numeric columns that fail to parse become `None` on the point.
pub fn parse_record(raw: &Value) -> Option<PricePoint> {
    let record = match RawRecord::deserialize(raw) {
        Ok(record) => record,
        Err(e) => {
            tracing::debug!(error = %e, "Skipping daily record that is not an object.");
            return None;
        }
    };

    let Some(trade_date) = record.trade_date.as_ref().and_then(parse_date) else {
        tracing::debug!(trade_date = ?record.trade_date, "Skipping daily record without a valid trade date.");
        return None;
    };

    Some(PricePoint {
        trade_date,
        nav_price: record.nav_price.as_ref().and_then(coerce_f64),
        close_price: record.close_price.as_ref().and_then(coerce_f64),
        index_value: record.obj_stk_prc_idx.as_ref().and_then(coerce_f64),
    })
}

/// Accepts `YYYY-MM-DD` and the compact `YYYYMMDD` form.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    let text = value.as_str()?.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y%m%d"))
        .ok()
}

/// Coerces a number or numeric string to a finite `f64`.
///
/// Strings may carry surrounding whitespace and `,` thousands separators.
/// Anything else, including NaN and infinities, yields `None`.
pub fn coerce_f64(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
            if cleaned.is_empty() {
                return None;
            }
            cleaned.parse::<f64>().ok()?
        }
        _ => return None,
    };
    number.is_finite().then_some(number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coerces_numbers_and_numeric_strings() {
        assert_eq!(coerce_f64(&json!(10250)), Some(10250.0));
        assert_eq!(coerce_f64(&json!("10,250.5")), Some(10250.5));
        assert_eq!(coerce_f64(&json!(" 99 ")), Some(99.0));
    }

    #[test]
    fn unparseable_values_become_none() {
        assert_eq!(coerce_f64(&json!("abc")), None);
        assert_eq!(coerce_f64(&json!("")), None);
        assert_eq!(coerce_f64(&json!("NaN")), None);
        assert_eq!(coerce_f64(&json!("inf")), None);
        assert_eq!(coerce_f64(&json!(null)), None);
        assert_eq!(coerce_f64(&json!(true)), None);
    }

    #[test]
    fn parses_both_date_forms() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 10);
        assert_eq!(parse_date(&json!("2024-01-10")), expected);
        assert_eq!(parse_date(&json!("20240110")), expected);
        assert_eq!(parse_date(&json!("2024/01/10")), None);
        assert_eq!(parse_date(&json!(20240110)), None);
    }

    #[test]
    fn record_keeps_good_columns_when_one_is_bad() {
        let point = parse_record(&json!({
            "trade_date": "2024-01-10",
            "nav_price": "10,012.34",
            "close_price": "--",
            "obj_stk_prc_idx": 2650.12,
            "volume": 1000,
        }))
        .unwrap();
        assert_eq!(point.nav_price, Some(10012.34));
        assert_eq!(point.close_price, None);
        assert_eq!(point.index_value, Some(2650.12));
    }

    #[test]
    fn index_value_alias_is_accepted() {
        let point = parse_record(&json!({ "trade_date": "2024-01-10", "index_value": "1.5" })).unwrap();
        assert_eq!(point.index_value, Some(1.5));
    }

    #[test]
    fn record_without_date_is_skipped() {
        assert!(parse_record(&json!({ "nav_price": 1 })).is_none());
        assert!(parse_record(&json!("2024-01-10")).is_none());
    }
}
