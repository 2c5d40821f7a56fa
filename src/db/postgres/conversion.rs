//! Type conversion utilities for the PostgreSQL backend.
//!
//! Rows come back through the simple-query protocol as text; the prepared
//! statement's column types decide how each cell becomes a JSON value.

use postgres::types::Type;
use serde_json::{Number, Value};

const INTEGER_TYPES: [Type; 4] = [Type::INT2, Type::INT4, Type::INT8, Type::OID];
const DECIMAL_TYPES: [Type; 3] = [Type::FLOAT4, Type::FLOAT8, Type::NUMERIC];
const JSON_TYPES: [Type; 2] = [Type::JSON, Type::JSONB];

/// Convert one text-format cell to JSON using its column type.
///
/// Unrecognized types, and values that fail to parse as their declared
/// type (e.g. `NaN`), stay as strings.
pub fn text_to_json(ty: &Type, text: Option<&str>) -> Value {
    let Some(text) = text else {
        return Value::Null;
    };

    if *ty == Type::BOOL {
        match text {
            "t" => Value::Bool(true),
            "f" => Value::Bool(false),
            other => Value::from(other),
        }
    } else if INTEGER_TYPES.contains(ty) {
        text.parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::from(text))
    } else if DECIMAL_TYPES.contains(ty) {
        decimal_to_json(text)
    } else if JSON_TYPES.contains(ty) {
        serde_json::from_str(text).unwrap_or_else(|_| Value::from(text))
    } else {
        Value::from(text)
    }
}

fn decimal_to_json(text: &str) -> Value {
    if let Ok(int) = text.parse::<i64>() {
        return Value::from(int);
    }
    text.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::from(text))
}
