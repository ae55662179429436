//! Translation rule definitions.

use std::fmt;

/// JSON projection type for a translated field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    #[default]
    String,
    Integer,
    Numeric,
    Boolean,
    Date,
}

impl FieldType {
    /// Match a type token from the translation file, case-insensitively.
    ///
    /// Returns `None` for unknown tokens so the caller can decide how to warn.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "string" => Some(Self::String),
            "numeric" | "number" => Some(Self::Numeric),
            "decimal" | "integer" => Some(Self::Integer),
            "boolean" | "bool" => Some(Self::Boolean),
            "date" => Some(Self::Date),
            _ => None,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Numeric => "numeric",
            Self::Boolean => "boolean",
            Self::Date => "date",
        };
        f.write_str(name)
    }
}

/// One row of the translation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule {
    /// Upstream XML field name (unique key).
    pub xml_name: String,

    /// Output JSON key.
    pub json_name: String,

    pub field_type: FieldType,

    /// Drop the field entirely when the source value is empty.
    pub omit_empty: bool,
}

impl fmt::Display for FieldRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} ({}, omit_empty={})",
            self.xml_name, self.json_name, self.field_type, self.omit_empty
        )
    }
}
