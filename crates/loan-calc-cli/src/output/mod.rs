pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use loan_calc_core::format::{format_currency, parse_decimal};
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `result` object of a computation envelope, or the value itself.
pub(crate) fn result_of(value: &Value) -> &Value {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
}

/// Scalar fields of an object, nested objects flattened to dotted keys.
/// Arrays of objects (schedules, preset lists) are returned separately.
pub(crate) fn split_fields(map: &Map<String, Value>) -> (Vec<(String, Value)>, Vec<(String, Vec<Value>)>) {
    let mut scalars = Vec::new();
    let mut tables = Vec::new();
    flatten_into("", map, &mut scalars, &mut tables);
    (scalars, tables)
}

fn flatten_into(
    prefix: &str,
    map: &Map<String, Value>,
    scalars: &mut Vec<(String, Value)>,
    tables: &mut Vec<(String, Vec<Value>)>,
) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => flatten_into(&name, inner, scalars, tables),
            Value::Array(items) if items.first().is_some_and(Value::is_object) => {
                tables.push((name, items.clone()));
            }
            _ => scalars.push((name, val.clone())),
        }
    }
}

/// Human-readable cell: decimals rounded to cents and grouped.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => match parse_decimal(s) {
            Some(d) => format_currency(d),
            None => s.clone(),
        },
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "-".to_string(),
        Value::Array(arr) => arr.iter().map(display_value).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Raw cell for machine-readable output: no rounding.
pub(crate) fn raw_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
