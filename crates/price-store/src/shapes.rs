use serde_json::Value;

/// Field names under which different API revisions nest the daily prices,
/// in the order they are tried.
pub const NESTED_FIELDS: [&str; 4] = ["daily_prices", "new_prices_daily", "prices_daily", "daily_price"];

/// The layout a price payload resolved to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PayloadShape<'a> {
    /// A list of daily records.
    Records(&'a [Value]),
    /// Exactly one daily record.
    Single(&'a Value),
}

impl<'a> PayloadShape<'a> {
    pub fn records(&self) -> &'a [Value] {
        match *self {
            PayloadShape::Records(records) => records,
            PayloadShape::Single(record) => std::slice::from_ref(record),
        }
    }
}

type Detector = for<'a> fn(&'a Value) -> Option<PayloadShape<'a>>;

/// Ordered shape detectors. The first one that matches decides the shape.
const DETECTORS: [(&str, Detector); 3] = [
    ("array", detect_array),
    ("nested", detect_nested),
    ("single", detect_single),
];

/// Resolves `raw` to a known payload shape, returning the detector name with it.
pub fn resolve(raw: &Value) -> Option<(&'static str, PayloadShape<'_>)> {
    DETECTORS
        .iter()
        .find_map(|(name, detect)| detect(raw).map(|shape| (*name, shape)))
}

fn detect_array(raw: &Value) -> Option<PayloadShape<'_>> {
    raw.as_array().map(|records| PayloadShape::Records(records))
}

fn detect_nested(raw: &Value) -> Option<PayloadShape<'_>> {
    let object = raw.as_object()?;
    NESTED_FIELDS.iter().find_map(|field| match object.get(*field)? {
        Value::Array(records) => Some(PayloadShape::Records(records)),
        record @ Value::Object(_) => Some(PayloadShape::Single(record)),
        _ => None,
    })
}

fn detect_single(raw: &Value) -> Option<PayloadShape<'_>> {
    raw.as_object()
        .filter(|object| object.contains_key("trade_date"))
        .map(|_| PayloadShape::Single(raw))
}
