use serde_json::Value;

use super::{display_value, result_of, split_fields};

/// Headline figures, in the order a borrower asks for them.
const PRIORITY_KEYS: &[&str] = &[
    "monthly_payment",
    "max_principal",
    "max_loan_amount",
    "max_monthly_payment",
    "total_affordable_price",
    "available_income",
];

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in priority order, falling back to the
/// first scalar field.
pub fn print_minimal(value: &Value) {
    let result = result_of(value);

    if let Value::Object(map) = result {
        let (scalars, _) = split_fields(map);

        for key in PRIORITY_KEYS {
            let hit = scalars
                .iter()
                .find(|(k, v)| (k.as_str() == *key || k.ends_with(&format!(".{key}"))) && !v.is_null());
            if let Some((_, val)) = hit {
                println!("{}", display_value(val));
                return;
            }
        }

        if let Some((key, val)) = scalars.first() {
            println!("{}: {}", key, display_value(val));
            return;
        }
    }

    println!("{}", display_value(result));
}
