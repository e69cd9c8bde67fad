//! # Session Data Structures
//!
//! The `Session` struct is the root container persisted between runs.
//! Sessions serialize to `.cao` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Session
//! ├── meta: SessionMetadata (version, author, timestamps)
//! ├── settings: Settings (tolerance, gravity, logo, CSV, mission base)
//! ├── memo: Option<EngineMemo> (last Stirling engine plan)
//! └── history: Vec<HistoryEntry> (calculations run, oldest first)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cao_core::calculations::{CalculationItem, GearboxInput};
//! use cao_core::session::Session;
//!
//! let mut session = Session::new("Atelier");
//! let item = CalculationItem::Gearbox(GearboxInput::default());
//! let output = item.run().unwrap();
//! session.record(item, &output);
//! assert_eq!(session.history.len(), 1);
//! assert!(session.memo.is_none());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{CalculationItem, CalculationOutput, Context};
use crate::errors::{require_positive, tolerance_fraction, CalcError, CalcResult};
use crate::export::MAX_CSV_DECIMALS;
use crate::forms::FieldValues;
use crate::memo::EngineMemo;

/// Current schema version for .cao files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Oldest entries are dropped beyond this many
pub const HISTORY_LIMIT: usize = 200;

/// Root session container, serialized to `.cao` files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub meta: SessionMetadata,
    #[serde(default)]
    pub settings: Settings,
    /// Written only by the engine plan
    #[serde(default)]
    pub memo: Option<EngineMemo>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl Session {
    pub fn new(author: impl Into<String>) -> Self {
        let now = Utc::now();
        Session {
            meta: SessionMetadata {
                version: SCHEMA_VERSION.to_string(),
                author: author.into(),
                created: now,
                modified: now,
            },
            settings: Settings::default(),
            memo: None,
            history: Vec::new(),
        }
    }

    /// Form context borrowing the session settings and memo.
    pub fn context(&self) -> Context<'_> {
        Context::new(&self.settings, self.memo.as_ref())
    }

    /// Append a calculation to the history and refresh the memo when the
    /// output is an engine plan.
    ///
    /// Returns the UUID assigned to the entry.
    pub fn record(&mut self, item: CalculationItem, output: &CalculationOutput) -> Uuid {
        if let Some(memo) = output.engine_memo() {
            tracing::debug!(bore_mm = memo.bore_mm, stroke_mm = memo.stroke_mm, "engine memo updated");
            self.memo = Some(memo);
        }
        let id = Uuid::new_v4();
        self.history.push(HistoryEntry {
            id,
            at: Utc::now(),
            item,
        });
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(..excess);
        }
        self.touch();
        id
    }

    pub fn get_entry(&self, id: &Uuid) -> Option<&HistoryEntry> {
        self.history.iter().find(|e| &e.id == id)
    }

    /// Forget the memo and the history, keeping the settings.
    pub fn reset(&mut self) {
        self.memo = None;
        self.history.clear();
        self.touch();
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new("")
    }
}

/// Session metadata stored in the file header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,
    pub author: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// One calculation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub at: DateTime<Utc>,
    pub item: CalculationItem,
}

/// User settings shared by every page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Default safety tolerance (%)
    pub tolerance_pct: f64,
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
    /// Logo shown on the home page, relative to the working directory
    pub logo_path: String,
    /// Decimals written in CSV exports
    pub csv_decimals: usize,
    /// Mission base latitude (degrees north)
    pub base_latitude: f64,
    /// Mission base longitude (degrees east)
    pub base_longitude: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            tolerance_pct: 20.0,
            gravity: 9.81,
            logo_path: "JN-BWF.png".to_string(),
            csv_decimals: 4,
            base_latitude: 44.933,
            base_longitude: 5.033,
        }
    }
}

impl Settings {
    /// Keys accepted by [`Settings::apply`], in display order.
    pub const KEYS: [&'static str; 6] = ["tol", "gravite", "logo", "csv_decimales", "latitude", "longitude"];

    /// Current value of a setting as text.
    pub fn get(&self, key: &str) -> Option<String> {
        Some(match key {
            "tol" => self.tolerance_pct.to_string(),
            "gravite" => self.gravity.to_string(),
            "logo" => self.logo_path.clone(),
            "csv_decimales" => self.csv_decimals.to_string(),
            "latitude" => self.base_latitude.to_string(),
            "longitude" => self.base_longitude.to_string(),
            _ => return None,
        })
    }

    /// Set one setting from text, validating it.
    pub fn apply(&mut self, key: &str, value: &str) -> CalcResult<()> {
        let mut form = FieldValues::default();
        form.set(key, value);
        match key {
            "tol" => {
                let pct = form.require_number(key)?;
                tolerance_fraction(key, pct)?;
                self.tolerance_pct = pct;
            }
            "gravite" => self.gravity = require_positive(key, form.require_number(key)?)?,
            "logo" => self.logo_path = value.trim().to_string(),
            "csv_decimales" => {
                let decimals = form.count_or(key, 4)? as usize;
                check_csv_decimals(key, decimals)?;
                self.csv_decimals = decimals;
            }
            "latitude" => self.base_latitude = check_latitude(key, form.require_number(key)?)?,
            "longitude" => self.base_longitude = form.require_number(key)?,
            _ => return Err(CalcError::invalid_input("parametre", key, "Paramètre inconnu")),
        }
        tracing::debug!(key, value, "setting changed");
        Ok(())
    }

    /// Check every setting with the rules of [`Settings::apply`]. Used on
    /// settings read back from a file.
    pub fn validate(&self) -> CalcResult<()> {
        tolerance_fraction("tol", self.tolerance_pct)?;
        require_positive("gravite", self.gravity)?;
        check_csv_decimals("csv_decimales", self.csv_decimals)?;
        check_latitude("latitude", self.base_latitude)?;
        if !self.base_longitude.is_finite() {
            return Err(CalcError::invalid_input("longitude", self.base_longitude.to_string(), "Nombre attendu"));
        }
        Ok(())
    }
}

fn check_csv_decimals(key: &str, decimals: usize) -> CalcResult<usize> {
    if decimals > MAX_CSV_DECIMALS {
        return Err(CalcError::invalid_input(key, decimals.to_string(), "12 décimales au plus"));
    }
    Ok(decimals)
}

fn check_latitude(key: &str, lat: f64) -> CalcResult<f64> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(CalcError::invalid_input(key, lat.to_string(), "La latitude doit être comprise entre -90° et 90°"));
    }
    Ok(lat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::EngineInput;

    #[test]
    fn test_apply_settings() {
        let mut settings = Settings::default();
        settings.apply("tol", "25").unwrap();
        settings.apply("gravite", "9,80665").unwrap();
        assert_eq!(settings.tolerance_pct, 25.0);
        assert_eq!(settings.gravity, 9.80665);
        assert_eq!(settings.get("gravite").unwrap(), "9.80665");

        assert!(settings.apply("tol", "100").is_err());
        assert!(settings.apply("latitude", "91").is_err());
        assert!(settings.apply("couleur", "rouge").is_err());
        assert_eq!(settings.tolerance_pct, 25.0);
    }

    #[test]
    fn test_validate_settings() {
        assert!(Settings::default().validate().is_ok());

        let mut settings = Settings::default();
        settings.tolerance_pct = 250.0;
        assert_eq!(settings.validate().unwrap_err().error_code(), "INVALID_INPUT");

        let mut settings = Settings::default();
        settings.gravity = -9.81;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.csv_decimals = 70_000;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.base_latitude = 120.0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_session_creation() {
        let session = Session::new("Atelier");
        assert_eq!(session.meta.author, "Atelier");
        assert_eq!(session.meta.version, SCHEMA_VERSION);
        assert_eq!(session.settings, Settings::default());
    }

    #[test]
    fn test_engine_run_updates_memo() {
        let mut session = Session::default();
        let item = CalculationItem::Engine(EngineInput::default());
        let output = item.run().unwrap();
        let id = session.record(item, &output);
        assert_eq!(session.memo.unwrap().cylinders, 8);
        assert!(session.get_entry(&id).is_some());
        assert!(session.context().memo.is_some());

        session.reset();
        assert!(session.memo.is_none());
        assert!(session.history.is_empty());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut session = Session::default();
        let item = CalculationItem::Gearbox(Default::default());
        let output = item.run().unwrap();
        for _ in 0..HISTORY_LIMIT + 5 {
            session.record(item.clone(), &output);
        }
        assert_eq!(session.history.len(), HISTORY_LIMIT);
    }

    #[test]
    fn test_missing_sections_default() {
        let json = r#"{"meta":{"version":"0.1.0","author":"","created":"2026-01-01T00:00:00Z","modified":"2026-01-01T00:00:00Z"}}"#;
        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.settings.csv_decimals, 4);
        assert!(session.history.is_empty());
    }

    #[test]
    fn test_session_roundtrip() {
        let mut session = Session::new("Atelier");
        session.settings.gravity = 9.80665;
        let json = serde_json::to_string_pretty(&session).unwrap();
        let back: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(back.settings.gravity, 9.80665);
        assert_eq!(back.meta.author, "Atelier");
    }
}
