//! # Forms
//!
//! Every calculator page declares an ordered list of [`FieldSpec`]s. The raw
//! user input is kept as strings in [`FieldValues`] and converted to numbers
//! only when a calculation runs, so a bad entry is reported against the field
//! that holds it.
//!
//! Parsing rules:
//! - a blank entry means "absent"
//! - a decimal comma is accepted (`"2,5"` reads as `2.5`)
//! - a non-numeric entry in a numeric field is an `InvalidInput` error
//! - integer fields reject fractional values
//!
//! ## Example
//!
//! ```rust
//! use cao_core::forms::FieldValues;
//!
//! let mut values = FieldValues::default();
//! values.set("force", "1200");
//! values.set("section", "  ");
//! values.set("n_cyl", "2.5");
//!
//! assert_eq!(values.number("force").unwrap(), Some(1200.0));
//! assert_eq!(values.number("section").unwrap(), None);
//! assert!(values.integer("n_cyl").is_err());
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Kind of input widget a field needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    Integer,
    Text,
    /// Closed list of options
    Choice(&'static [&'static str]),
    /// One entry of the material property table
    Material,
}

/// Declaration of one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Stable key used in `FieldValues`, the CLI and session files
    pub key: &'static str,
    /// French label shown next to the input
    pub label: &'static str,
    /// Default text; empty means the field starts blank
    pub default: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn number(key: &'static str, label: &'static str, default: &'static str) -> Self {
        FieldSpec {
            key,
            label,
            default,
            kind: FieldKind::Number,
        }
    }

    pub const fn integer(key: &'static str, label: &'static str, default: &'static str) -> Self {
        FieldSpec {
            key,
            label,
            default,
            kind: FieldKind::Integer,
        }
    }

    pub const fn text(key: &'static str, label: &'static str, default: &'static str) -> Self {
        FieldSpec {
            key,
            label,
            default,
            kind: FieldKind::Text,
        }
    }

    pub const fn choice(
        key: &'static str,
        label: &'static str,
        default: &'static str,
        options: &'static [&'static str],
    ) -> Self {
        FieldSpec {
            key,
            label,
            default,
            kind: FieldKind::Choice(options),
        }
    }

    pub const fn material(key: &'static str, label: &'static str, default: &'static str) -> Self {
        FieldSpec {
            key,
            label,
            default,
            kind: FieldKind::Material,
        }
    }
}

/// Raw text entered in a form, keyed by field key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldValues(BTreeMap<String, String>);

impl FieldValues {
    /// Values pre-populated with every field's default text.
    pub fn from_specs(specs: &[FieldSpec]) -> Self {
        FieldValues(
            specs
                .iter()
                .map(|f| (f.key.to_string(), f.default.to_string()))
                .collect(),
        )
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Set `key` to a formatted number.
    pub fn set_number(&mut self, key: &str, value: f64, decimals: usize) {
        self.set(key, format!("{:.*}", decimals, value));
    }

    /// Raw text, unchanged.
    pub fn raw(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or("")
    }

    /// Trimmed text, `None` when blank or missing.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn is_blank(&self, key: &str) -> bool {
        self.get(key).is_none()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// Optional number.
    pub fn number(&self, key: &str) -> CalcResult<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(text) => parse_number(key, text).map(Some),
        }
    }

    /// Number with a fallback for blank entries.
    pub fn number_or(&self, key: &str, default: f64) -> CalcResult<f64> {
        Ok(self.number(key)?.unwrap_or(default))
    }

    /// Number that must be present.
    pub fn require_number(&self, key: &str) -> CalcResult<f64> {
        self.number(key)?.ok_or_else(|| CalcError::missing_field(key))
    }

    /// Optional integer; fractional values are rejected.
    pub fn integer(&self, key: &str) -> CalcResult<Option<i64>> {
        match self.number(key)? {
            None => Ok(None),
            Some(v) if v.fract() != 0.0 => Err(CalcError::invalid_input(key, v.to_string(), "Entier attendu")),
            Some(v) => Ok(Some(v as i64)),
        }
    }

    pub fn integer_or(&self, key: &str, default: i64) -> CalcResult<i64> {
        Ok(self.integer(key)?.unwrap_or(default))
    }

    pub fn require_integer(&self, key: &str) -> CalcResult<i64> {
        self.integer(key)?.ok_or_else(|| CalcError::missing_field(key))
    }

    /// Non-negative integer count.
    pub fn count_or(&self, key: &str, default: u32) -> CalcResult<u32> {
        let v = self.integer_or(key, default as i64)?;
        u32::try_from(v).map_err(|_| CalcError::invalid_input(key, v.to_string(), "Nombre entier positif attendu"))
    }

    /// Text with a fallback for blank entries.
    pub fn text_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }
}

impl FromIterator<(String, String)> for FieldValues {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        FieldValues(iter.into_iter().collect())
    }
}

fn parse_number(key: &str, text: &str) -> CalcResult<f64> {
    let normalized = text.replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CalcError::invalid_input(key, text, "Nombre attendu")),
    }
}

/// Split a `key=value` assignment as typed on the command line.
pub fn parse_assignment(text: &str) -> CalcResult<(String, String)> {
    let (key, value) = text
        .split_once('=')
        .ok_or_else(|| CalcError::invalid_input("field", text, "Format attendu : cle=valeur"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(CalcError::invalid_input("field", text, "Nom de champ vide"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPECS: [FieldSpec; 3] = [
        FieldSpec::number("force", "Force appliquée (N)", ""),
        FieldSpec::number("tol", "Tolérance (%)", "20"),
        FieldSpec::choice("gaz", "Type de gaz", "Air", &["Air", "Hélium"]),
    ];

    #[test]
    fn test_from_specs_defaults() {
        let values = FieldValues::from_specs(&SPECS);
        assert_eq!(values.number("force").unwrap(), None);
        assert_eq!(values.number("tol").unwrap(), Some(20.0));
        assert_eq!(values.text_or("gaz", "x"), "Air");
    }

    #[test]
    fn test_decimal_comma() {
        let mut values = FieldValues::default();
        values.set("e", "2,5");
        assert_eq!(values.number("e").unwrap(), Some(2.5));
    }

    #[test]
    fn test_invalid_number_names_field() {
        let mut values = FieldValues::default();
        values.set("pression", "abc");
        match values.number("pression").unwrap_err() {
            CalcError::InvalidInput { field, .. } => assert_eq!(field, "pression"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_require_number_missing() {
        let values = FieldValues::default();
        assert_eq!(values.require_number("d_cyl").unwrap_err().error_code(), "MISSING_FIELD");
    }

    #[test]
    fn test_count_rejects_negative() {
        let mut values = FieldValues::default();
        values.set("n", "-2");
        assert!(values.count_or("n", 4).is_err());
        values.set("n", "");
        assert_eq!(values.count_or("n", 4).unwrap(), 4);
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment(" rpm = 1400 ").unwrap(),
            ("rpm".to_string(), "1400".to_string())
        );
        assert!(parse_assignment("rpm").is_err());
        assert!(parse_assignment("=3").is_err());
    }
}
