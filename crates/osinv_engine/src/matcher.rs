use osinv_model::{FilterSpec, FilterValue, Scalar};
use serde::Serialize;
use serde_json::Value;

/// True when every key of `filters` is present on `record` with an equal
/// value, recursing into nested specs. Absent fields never match.
pub fn matches<R: Serialize>(record: &R, filters: &FilterSpec) -> bool {
    match serde_json::to_value(record) {
        Ok(value) => matches_value(&value, filters),
        Err(_) => false,
    }
}

pub fn matches_value(value: &Value, filters: &FilterSpec) -> bool {
    let Some(fields) = value.as_object() else {
        return filters.is_empty();
    };
    filters.iter().all(|(key, expected)| {
        fields
            .get(key)
            .map_or(false, |actual| value_matches(actual, expected))
    })
}

/// Linear scan keeping records that satisfy `filters`, in their original order.
pub fn filter_records<R: Serialize>(records: Vec<R>, filters: &FilterSpec) -> Vec<R> {
    records
        .into_iter()
        .filter(|record| matches(record, filters))
        .collect()
}

fn value_matches(actual: &Value, expected: &FilterValue) -> bool {
    match expected {
        FilterValue::Nested(nested) => actual.is_object() && matches_value(actual, nested),
        FilterValue::Scalar(scalar) => scalar_matches(actual, scalar),
    }
}

fn scalar_matches(actual: &Value, expected: &Scalar) -> bool {
    match (expected, actual) {
        (Scalar::Bool(expected), Value::Bool(actual)) => expected == actual,
        (Scalar::Str(expected), Value::String(actual)) => expected == actual,
        (Scalar::Int(expected), Value::Number(actual)) => match actual.as_i64() {
            Some(actual) => actual == *expected,
            None => actual.as_f64().map_or(false, |actual| {
                actual.fract() == 0.0 && actual == *expected as f64
            }),
        },
        _ => false,
    }
}
