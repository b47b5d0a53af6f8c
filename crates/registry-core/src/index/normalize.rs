//! Numeric-literal normalization for index serialization.
//!
//! YAML frequently leaves scientific-notation constants as strings (a quoted
//! `"1e-4"` learning rate, or a plain scalar the resolver declined to type).
//! The index must carry true numbers for downstream consumers, so accepted
//! items get a best-effort rewrite: any string containing an `e`/`E` that is
//! not a hex literal is tried as an f64 and replaced on success. Failure is
//! a no-op, never an error, which also makes the pass idempotent.

use serde_json::Value;

fn coerce_scalar(value: &mut Value) {
    let Some(s) = value.as_str() else { return };
    if !s.to_lowercase().contains('e') || s.starts_with("0x") {
        return;
    }
    if let Ok(parsed) = s.parse::<f64>() {
        if let Some(number) = serde_json::Number::from_f64(parsed) {
            *value = Value::Number(number);
        }
    }
}

/// Recursively rewrite scientific-notation string literals into numbers.
pub fn coerce_float_literals(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (_, v) in map.iter_mut() {
                if v.is_string() {
                    coerce_scalar(v);
                } else {
                    coerce_float_literals(v);
                }
            }
        }
        Value::Array(items) => {
            for v in items.iter_mut() {
                if v.is_string() {
                    coerce_scalar(v);
                } else {
                    coerce_float_literals(v);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scientific_notation_becomes_number() {
        let mut value = json!({"recipe": {"learning_rate": "1e-4"}});
        coerce_float_literals(&mut value);
        assert_eq!(value["recipe"]["learning_rate"], json!(0.0001));
    }

    #[test]
    fn test_uppercase_exponent_and_arrays() {
        let mut value = json!({"steps": ["5E-5", "2e3", "plain"]});
        coerce_float_literals(&mut value);
        assert_eq!(value["steps"][0], json!(0.00005));
        assert_eq!(value["steps"][1], json!(2000.0));
        assert_eq!(value["steps"][2], json!("plain"));
    }

    #[test]
    fn test_non_numeric_e_strings_untouched() {
        let mut value = json!({
            "name": "text_encoder",
            "note": "see readme",
            "hex": "0x1e4",
        });
        let before = value.clone();
        coerce_float_literals(&mut value);
        assert_eq!(value, before);
    }

    #[test]
    fn test_existing_numbers_and_scalars_untouched() {
        let mut value = json!({"size": 100, "ratio": 0.5, "flag": true, "none": null});
        let before = value.clone();
        coerce_float_literals(&mut value);
        assert_eq!(value, before);
    }

    #[test]
    fn test_idempotent() {
        let mut once = json!({
            "rate": "1e-4",
            "label": "level-e",
            "nested": [{"eta": "2.5e2"}],
        });
        coerce_float_literals(&mut once);
        let mut twice = once.clone();
        coerce_float_literals(&mut twice);
        assert_eq!(once, twice);
    }
}
