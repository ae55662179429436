//! Type-directed XML → JSON projection.
//!
//! # Output Shape
//! ```text
//! {"documentLink": <document_url>, <field 1>, <field 2>, ...}
//! ```
//! Fields keep document order. A field with a rule is renamed and typed;
//! a field without one passes through as a string under its own name.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::convert::document::{EventDocument, EventField};
use crate::convert::json::JsonObject;
use crate::translation::{FieldRule, FieldType, TranslationTable};

/// Key of the synthetic first entry.
pub const DOCUMENT_LINK_KEY: &str = "documentLink";

/// chrono layouts for `date` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateLayouts {
    /// Layout the upstream classifier emits.
    pub input: String,
    /// Layout written to the JSON output.
    pub output: String,
}

impl Default for DateLayouts {
    fn default() -> Self {
        Self {
            input: "%m/%d/%Y".to_string(),
            output: "%Y-%m-%d".to_string(),
        }
    }
}

/// Converts event documents using a shared, read-only translation table.
#[derive(Debug, Clone)]
pub struct ConversionEngine {
    table: Arc<TranslationTable>,
    dates: DateLayouts,
}

impl ConversionEngine {
    pub fn new(table: Arc<TranslationTable>, dates: DateLayouts) -> Self {
        Self { table, dates }
    }

    pub fn table(&self) -> &TranslationTable {
        &self.table
    }

    /// Convert one document to JSON text.
    pub fn convert(&self, doc: &EventDocument) -> String {
        self.project(doc).to_json_string()
    }

    /// Build the ordered output object for one document.
    pub fn project(&self, doc: &EventDocument) -> JsonObject {
        let mut out = JsonObject::with_capacity(doc.fields.len() + 1);
        out.push_string(DOCUMENT_LINK_KEY, &doc.document_url);

        for field in &doc.fields {
            match self.table.get(&field.name) {
                Some(rule) => self.project_rule(&mut out, rule, field),
                None => {
                    tracing::debug!(
                        field = %field.name,
                        "No translation for field, passing it through as a string"
                    );
                    out.push_string(&field.name, field.value_str());
                }
            }
        }

        out
    }

    fn project_rule(&self, out: &mut JsonObject, rule: &FieldRule, field: &EventField) {
        if rule.omit_empty && field.is_empty() {
            return;
        }

        let key = rule.json_name.as_str();
        let value = field.value_str();
        match rule.field_type {
            FieldType::String => out.push_string(key, value),
            FieldType::Integer | FieldType::Numeric => {
                if !out.push_number_literal(key, value) {
                    if !value.is_empty() {
                        tracing::warn!(
                            field = %field.name,
                            value = %value,
                            "Numeric field is not a valid number, emitting it as a string"
                        );
                    }
                    out.push_string(key, value);
                }
            }
            FieldType::Boolean => out.push_bool(key, value.eq_ignore_ascii_case("true")),
            FieldType::Date => {
                let formatted = self.reformat_date(&field.name, value).unwrap_or_default();
                out.push_string(key, &formatted);
            }
        }
    }

    fn reformat_date(&self, field: &str, value: &str) -> Option<String> {
        if value.is_empty() {
            return None;
        }
        match NaiveDate::parse_from_str(value.trim(), &self.dates.input) {
            Ok(date) => Some(date.format(&self.dates.output).to_string()),
            Err(e) => {
                tracing::warn!(
                    field = %field,
                    value = %value,
                    layout = %self.dates.input,
                    error = %e,
                    "Could not parse date field, emitting an empty string"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::document::tests::SAMPLE_XML;
    use serde_json::Value;

    fn rule(xml: &str, json: &str, field_type: FieldType, omit_empty: bool) -> FieldRule {
        FieldRule {
            xml_name: xml.into(),
            json_name: json.into(),
            field_type,
            omit_empty,
        }
    }

    fn engine(rules: Vec<FieldRule>) -> ConversionEngine {
        let table = TranslationTable::from_rules(rules).unwrap();
        ConversionEngine::new(Arc::new(table), DateLayouts::default())
    }

    fn doc(fields: &[(&str, &str)]) -> EventDocument {
        EventDocument {
            document_url: "https://example.com/d/1".into(),
            fields: fields.iter().map(|(n, v)| EventField::new(*n, *v)).collect(),
            ..Default::default()
        }
    }

    fn keys(json: &str) -> Vec<String> {
        // Key order is recovered from where each key sits in the compact text.
        let parsed: serde_json::Map<String, Value> = serde_json::from_str(json).unwrap();
        let mut positions: Vec<(usize, String)> = parsed
            .keys()
            .map(|k| (json.find(&format!("\"{}\":", k)).unwrap(), k.clone()))
            .collect();
        positions.sort();
        positions.into_iter().map(|(_, k)| k).collect()
    }

    #[test]
    fn test_document_link_first_and_passthrough() {
        let engine = engine(vec![]);
        let json = engine.convert(&doc(&[("Total", "12.00"), ("Name", "ACME")]));
        assert_eq!(
            json,
            r#"{"documentLink":"https://example.com/d/1","Total":"12.00","Name":"ACME"}"#
        );
    }

    #[test]
    fn test_typed_projection() {
        let engine = engine(vec![
            rule("Invoice Number", "invoiceNumber", FieldType::String, false),
            rule("Invoice Total", "total", FieldType::Numeric, false),
            rule("Pages", "pages", FieldType::Integer, false),
            rule("Paid", "paid", FieldType::Boolean, false),
            rule("Disputed", "disputed", FieldType::Boolean, false),
            rule("Invoice Date", "invoiceDate", FieldType::Date, false),
        ]);
        let json = engine.convert(&doc(&[
            ("Invoice Number", "INV-1"),
            ("Invoice Total", "125.50"),
            ("Pages", "3"),
            ("Paid", "TRUE"),
            ("Disputed", "yes"),
            ("Invoice Date", "01/12/2024"),
        ]));
        assert_eq!(
            json,
            concat!(
                r#"{"documentLink":"https://example.com/d/1","invoiceNumber":"INV-1","#,
                r#""total":125.50,"pages":3,"paid":true,"disputed":false,"#,
                r#""invoiceDate":"2024-01-12"}"#
            )
        );
    }

    #[test]
    fn test_omit_empty_leaves_no_dangling_comma() {
        let engine = engine(vec![
            rule("A", "a", FieldType::String, false),
            rule("B", "b", FieldType::Numeric, true),
        ]);
        let json = engine.convert(&doc(&[("A", "x"), ("B", "")]));
        assert_eq!(json, r#"{"documentLink":"https://example.com/d/1","a":"x"}"#);

        let unset = EventDocument {
            fields: vec![EventField {
                name: "B".into(),
                value: None,
            }],
            ..Default::default()
        };
        assert_eq!(engine.convert(&unset), r#"{"documentLink":""}"#);
    }

    #[test]
    fn test_empty_value_kept_without_omit() {
        let engine = engine(vec![rule("C", "c", FieldType::String, false)]);
        let json = engine.convert(&doc(&[("C", "")]));
        assert_eq!(json, r#"{"documentLink":"https://example.com/d/1","c":""}"#);
    }

    #[test]
    fn test_bad_date_is_empty_string() {
        let engine = engine(vec![rule("D", "due", FieldType::Date, false)]);
        let json = engine.convert(&doc(&[("D", "next tuesday")]));
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["due"], "");
    }

    #[test]
    fn test_invalid_number_is_quoted() {
        let engine = engine(vec![rule("N", "n", FieldType::Integer, false)]);
        let json = engine.convert(&doc(&[("N", "1,200")]));
        assert_eq!(json, r#"{"documentLink":"https://example.com/d/1","n":"1,200"}"#);
    }

    #[test]
    fn test_sample_document_properties() {
        let engine = engine(vec![
            rule("Invoice Number", "invoiceNumber", FieldType::String, false),
            rule("Invoice Total", "total", FieldType::Numeric, false),
            rule("Cost Center", "costCenter", FieldType::String, true),
        ]);
        let document = EventDocument::from_xml(SAMPLE_XML).unwrap();

        let first = engine.convert(&document);
        let second = engine.convert(&document);
        assert_eq!(first, second);

        // 1 documentLink + 4 fields - 1 omitted
        assert_eq!(engine.project(&document).len(), 4);
        assert_eq!(keys(&first), ["documentLink", "invoiceNumber", "total", "Account"]);

        let parsed: Value = serde_json::from_str(&first).unwrap();
        assert_eq!(parsed["Account"], "0042");
        assert_eq!(parsed["documentLink"], "https://example.com/doc/12345");
    }
}
