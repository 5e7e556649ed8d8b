use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::trace;

use crate::core::{Category, MetricPoint};

/// Text used when a string field is absent or not textual.
pub const PLACEHOLDER_TEXT: &str = "unknown";

/// A record type decoded leniently from one flat JSON object.
pub trait RecordKind: Sized {
    fn from_fields(fields: &Map<String, Value>) -> Self;
}

/// A record type that contributes one point to a chart series.
pub trait SeriesRecord: RecordKind {
    fn to_point(&self) -> MetricPoint;
}

/// Numeric coercion of a JSON field.
///
/// Numbers pass through, numeric strings are parsed, booleans map to `1`/`0`;
/// anything else (absent, null, garbage, non-finite) becomes `0`.
#[must_use]
pub fn coerce_number(value: Option<&Value>) -> f64 {
    let coerced = match value {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Some(0.0)
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        Some(Value::Bool(flag)) => Some(if *flag { 1.0 } else { 0.0 }),
        Some(Value::Null) | None => Some(0.0),
        Some(Value::Array(_) | Value::Object(_)) => None,
    };

    match coerced {
        Some(number) if number.is_finite() => number,
        _ => {
            trace!(value = ?value, "numeric coercion fell back to 0");
            0.0
        }
    }
}

/// Text coercion of a JSON field; numbers and booleans are stringified.
#[must_use]
pub fn coerce_text(value: Option<&Value>, placeholder: &str) -> String {
    match value {
        Some(Value::String(text)) if !text.trim().is_empty() => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => placeholder.to_owned(),
    }
}

fn coerce_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => {
            matches!(text.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes")
        }
        other => coerce_number(other) != 0.0,
    }
}

fn non_negative(value: f64) -> f64 {
    if value < 0.0 {
        trace!(value, "negative metric clamped to 0");
        0.0
    } else {
        value
    }
}

/// Number of fraud cases for one customer age.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgeCount {
    pub age: f64,
    pub count: f64,
}

impl RecordKind for AgeCount {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            age: coerce_number(fields.get("age")),
            count: non_negative(coerce_number(fields.get("count"))),
        }
    }
}

impl SeriesRecord for AgeCount {
    fn to_point(&self) -> MetricPoint {
        MetricPoint::new(Category::number(self.age), self.count)
    }
}

/// Per-merchant fraud statistics; `fraud_rate` is a ratio in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantFraudRate {
    pub merchant: String,
    pub total_transactions: f64,
    pub fraud_count: f64,
    pub fraud_rate: f64,
}

impl RecordKind for MerchantFraudRate {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            merchant: coerce_text(fields.get("merchant"), PLACEHOLDER_TEXT),
            total_transactions: non_negative(coerce_number(fields.get("total_transactions"))),
            fraud_count: non_negative(coerce_number(fields.get("fraud_count"))),
            fraud_rate: non_negative(coerce_number(fields.get("fraud_rate"))),
        }
    }
}

impl SeriesRecord for MerchantFraudRate {
    fn to_point(&self) -> MetricPoint {
        MetricPoint::new(Category::text(self.merchant.clone()), self.fraud_rate)
    }
}

/// One named aggregate counter (e.g. total transactions, flagged frauds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateCount {
    pub name: String,
    pub count: f64,
}

impl RecordKind for AggregateCount {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        Self {
            name: coerce_text(fields.get("name"), PLACEHOLDER_TEXT),
            count: non_negative(coerce_number(fields.get("count"))),
        }
    }
}

impl SeriesRecord for AggregateCount {
    fn to_point(&self) -> MetricPoint {
        MetricPoint::new(Category::text(self.name.clone()), self.count)
    }
}

/// One point-of-sale transaction row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: String,
    pub first: String,
    pub last: String,
    pub gender: String,
    pub state: String,
    pub job: String,
    pub trans_date: String,
    pub unix_time: i64,
    pub category: String,
    pub amount: f64,
    pub merchant: String,
    pub is_fraud: bool,
}

impl TransactionRecord {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first, self.last)
    }
}

impl RecordKind for TransactionRecord {
    fn from_fields(fields: &Map<String, Value>) -> Self {
        let text = |key: &str| coerce_text(fields.get(key), PLACEHOLDER_TEXT);
        Self {
            transaction_id: text("transaction_id"),
            first: text("first"),
            last: text("last"),
            gender: text("gender"),
            state: text("state"),
            job: text("job"),
            trans_date: text("trans_date"),
            unix_time: coerce_number(fields.get("unix_time")).trunc() as i64,
            category: text("category"),
            amount: coerce_number(fields.get("amt")),
            merchant: text("merchant"),
            is_fraud: coerce_flag(fields.get("is_fraud")),
        }
    }
}
