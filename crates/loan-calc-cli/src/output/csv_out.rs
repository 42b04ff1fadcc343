use serde_json::Value;
use std::io;

use super::{raw_value, result_of, split_fields};

/// Write output as CSV to stdout.
///
/// A result carrying a list of rows (a schedule) is written as that list;
/// otherwise a two-column field/value sheet.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match result_of(value) {
        Value::Object(result) => {
            let (scalars, tables) = split_fields(result);
            if let Some((_, rows)) = tables.first() {
                write_rows(&mut wtr, rows);
            } else {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in &scalars {
                    let _ = wtr.write_record([key.as_str(), &raw_value(val)]);
                }
            }
        }
        Value::Array(rows) => write_rows(&mut wtr, rows),
        other => {
            let _ = wtr.write_record([&raw_value(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_rows(wtr: &mut csv::Writer<io::StdoutLock<'_>>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            let _ = wtr.write_record([&raw_value(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(raw_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
