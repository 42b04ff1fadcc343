use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{display_value, result_of, split_fields};

/// Format output as tables: result fields first, then one table per
/// embedded list (e.g. the amortization schedule), then warnings.
pub fn print_table(value: &Value) {
    match result_of(value) {
        Value::Object(result) => print_result(result),
        Value::Array(rows) => print_rows(rows),
        other => println!("{}", display_value(other)),
    }

    if let Some(envelope) = value.as_object() {
        print_envelope_notes(envelope);
    }
}

fn print_result(result: &Map<String, Value>) {
    let (scalars, tables) = split_fields(result);

    if !scalars.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in &scalars {
            builder.push_record([key.as_str(), &display_value(val)]);
        }
        println!("{}", Table::from(builder));
    }

    for (name, rows) in &tables {
        println!("\n{}:", name);
        print_rows(rows);
    }
}

fn print_rows(rows: &[Value]) {
    if rows.is_empty() {
        println!("(empty)");
        return;
    }

    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            println!("{}", display_value(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(display_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}
