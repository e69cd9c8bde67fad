//! Specialised material tables for Stirling engine components.

use serde::Serialize;

/// Connecting rod material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RodMaterial {
    pub name: &'static str,
    /// Yield strength Re (MPa)
    pub re_mpa: f64,
    /// Ultimate strength Rm (MPa)
    pub rm_mpa: f64,
    /// Density (g/cm³)
    pub density: f64,
    pub usage: &'static str,
}

pub const ROD_MATERIALS: [RodMaterial; 4] = [
    RodMaterial {
        name: "Acier 42CrMo4",
        re_mpa: 900.0,
        rm_mpa: 1100.0,
        density: 7.85,
        usage: "standard / haute charge",
    },
    RodMaterial {
        name: "Acier S355",
        re_mpa: 355.0,
        rm_mpa: 510.0,
        density: 7.85,
        usage: "moyenne charge",
    },
    RodMaterial {
        name: "Alu 7075-T6",
        re_mpa: 500.0,
        rm_mpa: 560.0,
        density: 2.8,
        usage: "léger / compétition",
    },
    RodMaterial {
        name: "Titane Grade 5",
        re_mpa: 830.0,
        rm_mpa: 900.0,
        density: 4.4,
        usage: "haute perf / aviation",
    },
];

/// Flywheel material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlywheelMaterial {
    pub name: &'static str,
    /// Yield strength Re (MPa)
    pub re_mpa: f64,
    /// Density (g/cm³)
    pub density: f64,
    pub usage: &'static str,
}

impl FlywheelMaterial {
    /// Density in kg/m³
    pub fn density_kg_m3(&self) -> f64 {
        self.density * 1000.0
    }
}

pub const FLYWHEEL_MATERIALS: [FlywheelMaterial; 3] = [
    FlywheelMaterial {
        name: "Acier S235",
        re_mpa: 235.0,
        density: 7.85,
        usage: "standard, masse élevée",
    },
    FlywheelMaterial {
        name: "Fonte GGG40",
        re_mpa: 400.0,
        density: 7.1,
        usage: "inertie, anti-vibratoire",
    },
    FlywheelMaterial {
        name: "Alu 2017A",
        re_mpa: 380.0,
        density: 2.8,
        usage: "léger, petits moteurs",
    },
];
