//! Ordered JSON object builder.
//!
//! Entries are kept in insertion order and duplicate keys are written as-is.
//! Number literals are validated once here and then written from their
//! original source text, so `125.50` stays `125.50`.

use std::fmt::Write as _;

use serde_json::{Number, Value};

#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Value(Value),
    Number(String),
}

/// Builder for a flat JSON object with a fixed key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonObject {
    entries: Vec<(String, Entry)>,
}

impl JsonObject {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push_string(&mut self, key: &str, value: &str) {
        self.push_value(key, Value::String(value.to_string()));
    }

    pub fn push_bool(&mut self, key: &str, value: bool) {
        self.push_value(key, Value::Bool(value));
    }

    pub fn push_value(&mut self, key: &str, value: Value) {
        self.entries.push((key.to_string(), Entry::Value(value)));
    }

    /// Push `raw` as an unquoted number literal.
    ///
    /// Returns `false` and pushes nothing when `raw` is not a valid JSON number.
    pub fn push_number_literal(&mut self, key: &str, raw: &str) -> bool {
        let literal = raw.trim();
        if !is_number_literal(literal) {
            return false;
        }
        self.entries.push((key.to_string(), Entry::Number(literal.to_string())));
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as compact JSON text.
    pub fn to_json_string(&self) -> String {
        let mut out = String::with_capacity(64 * (self.entries.len() + 1));
        out.push('{');
        for (ix, (key, entry)) in self.entries.iter().enumerate() {
            if ix > 0 {
                out.push(',');
            }
            // Value's Display is infallible compact JSON; it also escapes the key.
            let _ = write!(out, "{}:", Value::String(key.clone()));
            match entry {
                Entry::Value(value) => {
                    let _ = write!(out, "{}", value);
                }
                Entry::Number(literal) => out.push_str(literal),
            }
        }
        out.push('}');
        out
    }
}

/// True when `text` is exactly one JSON number literal.
pub fn is_number_literal(text: &str) -> bool {
    !text.is_empty() && serde_json::from_str::<Number>(text).is_ok()
}
