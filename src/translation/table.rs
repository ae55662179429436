//! Translation table loading.
//!
//! # File Format
//! One rule per line, `xmlName;jsonName;type;omitEmpty`. Lines starting with
//! the comment marker and blank lines are ignored. A row whose first column is
//! `xmlname` (any case) is treated as a header and skipped.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::translation::rule::{FieldRule, FieldType};

/// Delimiter and comment marker used by the translation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFormat {
    pub delimiter: char,
    pub comment: char,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            delimiter: ';',
            comment: '`',
        }
    }
}

/// Fatal translation table errors.
#[derive(Debug, Error)]
pub enum TranslationError {
    /// Two rows claim the same source field.
    #[error("duplicate translation for field '{xml_name}' in {origin} (line {line})")]
    Duplicate {
        origin: String,
        xml_name: String,
        line: usize,
    },
}

/// Immutable lookup from XML field name to its rule.
#[derive(Debug, Clone, Default)]
pub struct TranslationTable {
    rules: HashMap<String, FieldRule>,
}

impl TranslationTable {
    /// A table with no rules; every field passes through unchanged.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from already-parsed rules.
    pub fn from_rules(rules: impl IntoIterator<Item = FieldRule>) -> Result<Self, TranslationError> {
        let mut table = Self::empty();
        for (ix, rule) in rules.into_iter().enumerate() {
            table.insert(rule, "<rules>", ix + 1)?;
        }
        Ok(table)
    }

    /// Load the table from `path`.
    ///
    /// An unset or unreadable path is not an error: the result is an empty
    /// table and a logged diagnostic. Only duplicate source names fail.
    pub fn load(path: Option<&Path>, format: &TableFormat) -> Result<Self, TranslationError> {
        let Some(path) = path else {
            tracing::info!("No field translation file configured, fields pass through unchanged");
            return Ok(Self::empty());
        };

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::error!(
                    path = %path.display(),
                    error = %e,
                    "Could not open field translation file, fields pass through unchanged"
                );
                return Ok(Self::empty());
            }
        };

        tracing::debug!(path = %path.display(), "Opened field translation file");
        let table = Self::parse(&content, &path.display().to_string(), format)?;

        tracing::info!(
            path = %path.display(),
            rules = table.len(),
            "Field translation table loaded"
        );
        for rule in table.rules.values() {
            tracing::debug!(rule = %rule, "Translation rule");
        }

        Ok(table)
    }

    /// Parse translation file content. `origin` names the source in diagnostics.
    pub fn parse(content: &str, origin: &str, format: &TableFormat) -> Result<Self, TranslationError> {
        let mut table = Self::empty();

        for (ix, raw) in content.lines().enumerate() {
            let line_no = ix + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with(format.comment) {
                continue;
            }

            let columns: Vec<&str> = line.split(format.delimiter).map(str::trim).collect();
            if columns[0].eq_ignore_ascii_case("xmlname") {
                continue;
            }

            if let Some(rule) = parse_row(&columns, origin, line_no) {
                table.insert(rule, origin, line_no)?;
            }
        }

        Ok(table)
    }

    fn insert(&mut self, rule: FieldRule, origin: &str, line: usize) -> Result<(), TranslationError> {
        if self.rules.contains_key(&rule.xml_name) {
            tracing::error!(
                origin = %origin,
                line,
                xml_name = %rule.xml_name,
                "Duplicate name in field translation file"
            );
            return Err(TranslationError::Duplicate {
                origin: origin.to_string(),
                xml_name: rule.xml_name,
                line,
            });
        }
        self.rules.insert(rule.xml_name.clone(), rule);
        Ok(())
    }

    /// Look up the rule for an XML field name.
    pub fn get(&self, xml_name: &str) -> Option<&FieldRule> {
        self.rules.get(xml_name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Turn one data row into a rule, or log why it was skipped.
fn parse_row(columns: &[&str], origin: &str, line: usize) -> Option<FieldRule> {
    if columns.len() < 4 {
        tracing::warn!(
            origin = %origin,
            line,
            columns = columns.len(),
            "Translation row needs 4 columns, skipping"
        );
        return None;
    }

    let (xml_name, json_name) = (columns[0], columns[1]);
    if xml_name.is_empty() || json_name.is_empty() {
        tracing::warn!(origin = %origin, line, "Translation row has an empty name, skipping");
        return None;
    }

    let field_type = FieldType::from_token(columns[2]).unwrap_or_else(|| {
        tracing::warn!(
            origin = %origin,
            line,
            token = %columns[2],
            "Unrecognized field type in translation file, treating it as a string"
        );
        FieldType::String
    });

    let omit_empty = match columns[3].to_ascii_lowercase().as_str() {
        "true" => true,
        "false" => false,
        other => {
            tracing::warn!(
                origin = %origin,
                line,
                token = %other,
                "Non-boolean omitEmpty value in translation file, treating it as false"
            );
            false
        }
    };

    Some(FieldRule {
        xml_name: xml_name.to_string(),
        json_name: json_name.to_string(),
        field_type,
        omit_empty,
    })
}
