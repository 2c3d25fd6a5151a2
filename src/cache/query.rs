//! Query Module
//!
//! Linear-scan filtering of decoded records by field predicates.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field that is compared as a point in time.
pub const TIMESTAMP_FIELD: &str = "timestamp";

// == Operator ==
/// Comparison operator. Anything unrecognized parses as `Unknown` and never matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Lt,
    #[serde(other)]
    Unknown,
}

// == Condition ==
/// `{ field, operator, value }` predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(alias = "key")]
    pub field: String,
    pub operator: Operator,
    pub value: Value,
}

impl Condition {
    pub fn new(field: impl Into<String>, operator: Operator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
        }
    }

    /// Evaluates this condition against one record.
    ///
    /// `timestamp` compares by UTC calendar day for `eq`/`ne` and by instant
    /// for `gt`/`lt`. Other fields compare their JSON values directly.
    pub fn matches(&self, record: &Value) -> bool {
        let actual = record.get(&self.field);
        if self.field == TIMESTAMP_FIELD {
            let left = actual.and_then(parse_instant);
            let right = parse_instant(&self.value);
            return match self.operator {
                Operator::Eq => same_day(left, right),
                Operator::Ne => !same_day(left, right),
                Operator::Gt => matches!((left, right), (Some(l), Some(r)) if l > r),
                Operator::Lt => matches!((left, right), (Some(l), Some(r)) if l < r),
                Operator::Unknown => false,
            };
        }

        match self.operator {
            Operator::Eq => actual.is_some_and(|a| values_equal(a, &self.value)),
            Operator::Ne => !actual.is_some_and(|a| values_equal(a, &self.value)),
            Operator::Gt => {
                actual.and_then(|a| compare_values(a, &self.value)) == Some(Ordering::Greater)
            }
            Operator::Lt => {
                actual.and_then(|a| compare_values(a, &self.value)) == Some(Ordering::Less)
            }
            Operator::Unknown => false,
        }
    }
}

/// Keeps the records satisfying every condition. No conditions keeps everything.
pub fn select<I>(records: I, conditions: &[Condition]) -> Vec<Value>
where
    I: IntoIterator<Item = Value>,
{
    records
        .into_iter()
        .filter(|record| conditions.iter().all(|c| c.matches(record)))
        .collect()
}

fn same_day(left: Option<DateTime<Utc>>, right: Option<DateTime<Utc>>) -> bool {
    matches!((left, right), (Some(l), Some(r)) if l.date_naive() == r.date_naive())
}

// Numbers are epoch milliseconds; strings are RFC 3339 or a bare date.
fn parse_instant(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?;
            Utc.timestamp_millis_opt(millis).single()
        }
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
                Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?))
            }),
        _ => None,
    }
}

// Numbers compare by value, so 30 and 30.0 are equal
fn values_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(_), Value::Number(_)) => {
            compare_values(left, right) == Some(Ordering::Equal)
        }
        _ => left == right,
    }
}

fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => l.as_f64()?.partial_cmp(&r.as_f64()?),
        (Value::String(l), Value::String(r)) => Some(l.cmp(r)),
        (Value::Bool(l), Value::Bool(r)) => Some(l.cmp(r)),
        _ => None,
    }
}
