//! # Materials Database
//!
//! Material definitions and property lookups used by the calculators.
//!
//! ## Tables
//!
//! - [`MATERIALS`]: the engineering property table (Young's modulus and
//!   yield strength, both in MPa) used by the RDM page and the crankshaft
//! - [`catalogue`]: the display catalogue shown on the materials page
//! - [`components`]: specialised tables for connecting rods and flywheels
//!
//! ## Example
//!
//! ```rust
//! use cao_core::materials::{lookup, MATERIALS};
//!
//! let steel = lookup("Acier").unwrap();
//! assert_eq!(steel.re_mpa, 235.0);
//! assert_eq!(MATERIALS.len(), 15);
//! assert!(lookup("Unobtainium").is_err());
//! ```

pub mod catalogue;
pub mod components;

pub use catalogue::{CatalogueCard, CATALOGUE};
pub use components::{FlywheelMaterial, RodMaterial, FLYWHEEL_MATERIALS, ROD_MATERIALS};

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::errors::{CalcError, CalcResult};

/// Mechanical properties of one table material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MaterialProps {
    /// Display name, also the lookup key
    pub name: &'static str,
    /// Young's modulus E (MPa)
    pub e_mpa: f64,
    /// Yield strength Re (MPa)
    pub re_mpa: f64,
}

impl MaterialProps {
    const fn new(name: &'static str, e_mpa: f64, re_mpa: f64) -> Self {
        MaterialProps { name, e_mpa, re_mpa }
    }

    /// Young's modulus in pascals
    pub fn e_pa(&self) -> f64 {
        self.e_mpa * 1.0e6
    }

    /// Admissible stress `(1 - tol) * Re` in MPa for a tolerance fraction.
    pub fn admissible_mpa(&self, tol: f64) -> f64 {
        (1.0 - tol) * self.re_mpa
    }
}

/// Engineering property table, in menu order.
pub const MATERIALS: [MaterialProps; 15] = [
    MaterialProps::new("Acier", 210e3, 235.0),
    MaterialProps::new("Inox", 193e3, 250.0),
    MaterialProps::new("Aluminium", 70e3, 120.0),
    MaterialProps::new("Aluminium 2017", 73e3, 395.0),
    MaterialProps::new("Titane", 116e3, 950.0),
    MaterialProps::new("Cuivre", 110e3, 210.0),
    MaterialProps::new("Laiton", 100e3, 200.0),
    MaterialProps::new("ABS", 2.3e3, 45.0),
    MaterialProps::new("Bakelite", 3.5e3, 90.0),
    MaterialProps::new("Composite Carbone", 150e3, 600.0),
    MaterialProps::new("PEEK", 3.6e3, 100.0),
    MaterialProps::new("Nylon", 2.5e3, 50.0),
    MaterialProps::new("PVC", 3e3, 60.0),
    MaterialProps::new("Verre", 70e3, 50.0),
    MaterialProps::new("Bois (chêne)", 11e3, 90.0),
];

/// Default material for material choice fields.
pub const DEFAULT_MATERIAL: &str = "Acier";

static INDEX: Lazy<HashMap<&'static str, &'static MaterialProps>> =
    Lazy::new(|| MATERIALS.iter().map(|m| (m.name, m)).collect());

/// Look up a material by its exact table name.
pub fn lookup(name: &str) -> CalcResult<&'static MaterialProps> {
    INDEX
        .get(name.trim())
        .copied()
        .ok_or_else(|| CalcError::material_not_found(name))
}

/// All table names, in menu order.
pub fn names() -> Vec<&'static str> {
    MATERIALS.iter().map(|m| m.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_every_entry() {
        for m in MATERIALS.iter() {
            let found = lookup(m.name).unwrap();
            assert_eq!(found, m);
        }
    }

    #[test]
    fn test_lookup_trims() {
        assert_eq!(lookup(" Titane ").unwrap().re_mpa, 950.0);
    }

    #[test]
    fn test_unknown_material() {
        let err = lookup("Acier S355").unwrap_err();
        assert_eq!(err.error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_admissible() {
        let alu = lookup("Aluminium").unwrap();
        assert!((alu.admissible_mpa(0.2) - 96.0).abs() < 1e-9);
        assert_eq!(alu.e_pa(), 70e9);
    }

    #[test]
    fn test_names_order() {
        let n = names();
        assert_eq!(n.first(), Some(&"Acier"));
        assert_eq!(n.last(), Some(&"Bois (chêne)"));
    }
}
