//! # Calculations
//!
//! Every calculator follows the same pattern:
//!
//! - `*Input` - typed parameters (JSON-serializable), with `fields()` for the
//!   form, `from_values()` to parse it and an optional `prefill()` reading the
//!   engine memo
//! - `*Result` - typed results rendering as a French technical plan through
//!   `Display`
//! - `calculate(input) -> Result<*Result, CalcError>` - pure function
//!
//! [`CalculationItem`] and [`CalculationOutput`] wrap all of them so the
//! front ends and the session history can handle any calculator uniformly.
//!
//! ## Available Calculations
//!
//! - [`rdm`] - strength of materials and mass/force converter
//! - [`stirling`] - engine plan, Carnot sizing and component pages
//! - [`gearbox`] - dog-clutch gearbox ratios
//! - [`drone`] - NACA wing profile and propulsion
//! - [`iso_fit`] - hole/shaft ISO fits
//! - [`mission`] - drone range and action circle

pub mod drone;
pub mod gearbox;
pub mod iso_fit;
pub mod mission;
pub mod rdm;
pub mod stirling;

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::memo::EngineMemo;
use crate::schematic::Schematic;
use crate::session::Settings;

pub use drone::airfoil::{AirfoilInput, AirfoilProfile};
pub use drone::propulsion::{PropulsionInput, PropulsionResult};
pub use gearbox::{GearboxInput, GearboxResult};
pub use iso_fit::{FitInput, FitResult};
pub use mission::{MissionInput, MissionResult};
pub use rdm::{RdmInput, RdmResult};
pub use stirling::base_plate::{BasePlateInput, BasePlateResult};
pub use stirling::connecting_rod::{ConnectingRodInput, ConnectingRodResult};
pub use stirling::crankshaft::{CrankshaftInput, CrankshaftResult};
pub use stirling::cylinder::{CylinderInput, CylinderResult};
pub use stirling::engine::{EngineInput, EnginePlan};
pub use stirling::fasteners::{FastenersInput, FastenersResult};
pub use stirling::flywheel::{FlywheelInput, FlywheelResult};
pub use stirling::piston::{PistonInput, PistonResult};
pub use stirling::shaft::{ShaftInput, ShaftResult};
pub use stirling::sizing::{SizingInput, SizingResult};

/// What a form needs besides its own fields: session settings and, when an
/// engine plan has been computed, the engine memo.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    pub settings: &'a Settings,
    pub memo: Option<&'a EngineMemo>,
}

impl<'a> Context<'a> {
    pub fn new(settings: &'a Settings, memo: Option<&'a EngineMemo>) -> Self {
        Context { settings, memo }
    }
}

/// Enum wrapper for all calculation inputs.
///
/// This allows storing heterogeneous calculations in a single collection
/// while maintaining type safety and clean serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationItem {
    Rdm(RdmInput),
    Engine(EngineInput),
    Sizing(SizingInput),
    Piston(PistonInput),
    Cylinder(CylinderInput),
    Crankshaft(CrankshaftInput),
    ConnectingRod(ConnectingRodInput),
    Flywheel(FlywheelInput),
    Shaft(ShaftInput),
    BasePlate(BasePlateInput),
    Fasteners(FastenersInput),
    Gearbox(GearboxInput),
    Airfoil(AirfoilInput),
    Propulsion(PropulsionInput),
    IsoFit(FitInput),
    Mission(MissionInput),
}

impl CalculationItem {
    /// Get the calculation type as a string
    pub fn calc_type(&self) -> &'static str {
        match self {
            CalculationItem::Rdm(_) => "Rdm",
            CalculationItem::Engine(_) => "Engine",
            CalculationItem::Sizing(_) => "Sizing",
            CalculationItem::Piston(_) => "Piston",
            CalculationItem::Cylinder(_) => "Cylinder",
            CalculationItem::Crankshaft(_) => "Crankshaft",
            CalculationItem::ConnectingRod(_) => "ConnectingRod",
            CalculationItem::Flywheel(_) => "Flywheel",
            CalculationItem::Shaft(_) => "Shaft",
            CalculationItem::BasePlate(_) => "BasePlate",
            CalculationItem::Fasteners(_) => "Fasteners",
            CalculationItem::Gearbox(_) => "Gearbox",
            CalculationItem::Airfoil(_) => "Airfoil",
            CalculationItem::Propulsion(_) => "Propulsion",
            CalculationItem::IsoFit(_) => "IsoFit",
            CalculationItem::Mission(_) => "Mission",
        }
    }

    /// Run the wrapped calculator.
    pub fn run(&self) -> CalcResult<CalculationOutput> {
        use CalculationItem as I;
        use CalculationOutput as O;
        Ok(match self {
            I::Rdm(i) => O::Rdm(rdm::calculate(i)?),
            I::Engine(i) => O::Engine(stirling::engine::calculate(i)?),
            I::Sizing(i) => O::Sizing(stirling::sizing::calculate(i)?),
            I::Piston(i) => O::Piston(stirling::piston::calculate(i)?),
            I::Cylinder(i) => O::Cylinder(stirling::cylinder::calculate(i)?),
            I::Crankshaft(i) => O::Crankshaft(stirling::crankshaft::calculate(i)?),
            I::ConnectingRod(i) => O::ConnectingRod(stirling::connecting_rod::calculate(i)?),
            I::Flywheel(i) => O::Flywheel(stirling::flywheel::calculate(i)?),
            I::Shaft(i) => O::Shaft(stirling::shaft::calculate(i)?),
            I::BasePlate(i) => O::BasePlate(stirling::base_plate::calculate(i)?),
            I::Fasteners(i) => O::Fasteners(stirling::fasteners::calculate(i)?),
            I::Gearbox(i) => O::Gearbox(gearbox::calculate(i)?),
            I::Airfoil(i) => O::Airfoil(drone::airfoil::calculate(i)?),
            I::Propulsion(i) => O::Propulsion(drone::propulsion::calculate(i)?),
            I::IsoFit(i) => O::IsoFit(iso_fit::calculate(i)?),
            I::Mission(i) => O::Mission(mission::calculate(i)?),
        })
    }
}

/// Typed result of any calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculationOutput {
    Rdm(RdmResult),
    Engine(EnginePlan),
    Sizing(SizingResult),
    Piston(PistonResult),
    Cylinder(CylinderResult),
    Crankshaft(CrankshaftResult),
    ConnectingRod(ConnectingRodResult),
    Flywheel(FlywheelResult),
    Shaft(ShaftResult),
    BasePlate(BasePlateResult),
    Fasteners(FastenersResult),
    Gearbox(GearboxResult),
    Airfoil(AirfoilProfile),
    Propulsion(PropulsionResult),
    IsoFit(FitResult),
    Mission(MissionResult),
}

/// Column headers of an exported curve.
pub type CurveHeader = (&'static str, &'static str);

impl CalculationOutput {
    /// The French technical plan.
    pub fn plan(&self) -> String {
        use CalculationOutput as O;
        match self {
            O::Rdm(r) => r.to_string(),
            O::Engine(r) => r.to_string(),
            O::Sizing(r) => r.to_string(),
            O::Piston(r) => r.to_string(),
            O::Cylinder(r) => r.to_string(),
            O::Crankshaft(r) => r.to_string(),
            O::ConnectingRod(r) => r.to_string(),
            O::Flywheel(r) => r.to_string(),
            O::Shaft(r) => r.to_string(),
            O::BasePlate(r) => r.to_string(),
            O::Fasteners(r) => r.to_string(),
            O::Gearbox(r) => r.to_string(),
            O::Airfoil(r) => r.to_string(),
            O::Propulsion(r) => r.to_string(),
            O::IsoFit(r) => r.to_string(),
            O::Mission(r) => r.to_string(),
        }
    }

    pub fn schematic(&self) -> Option<Schematic> {
        use CalculationOutput as O;
        match self {
            O::Engine(r) => Some(r.schematic()),
            O::Piston(r) => Some(r.schematic()),
            O::Cylinder(r) => Some(r.schematic()),
            O::Crankshaft(r) => Some(r.schematic()),
            O::ConnectingRod(r) => Some(r.schematic()),
            O::Flywheel(r) => Some(r.schematic()),
            O::Shaft(r) => Some(r.schematic()),
            O::BasePlate(r) => Some(r.schematic()),
            O::Fasteners(r) => Some(r.schematic()),
            O::Airfoil(r) => Some(r.schematic()),
            O::Mission(r) => Some(r.schematic()),
            O::Rdm(_) | O::Sizing(_) | O::Gearbox(_) | O::Propulsion(_) | O::IsoFit(_) => None,
        }
    }

    /// Exportable curve with its column headers.
    pub fn curve(&self) -> Option<(CurveHeader, Vec<[f64; 2]>)> {
        match self {
            CalculationOutput::Airfoil(r) => Some((("X (mm)", "Y (mm)"), r.contour())),
            CalculationOutput::Gearbox(r) => Some((("Rapport", "Vitesse (tr/min)"), r.curve())),
            CalculationOutput::Mission(r) => Some((("Longitude (deg)", "Latitude (deg)"), r.curve())),
            _ => None,
        }
    }

    /// Memo written by the engine plan.
    pub fn engine_memo(&self) -> Option<EngineMemo> {
        match self {
            CalculationOutput::Engine(plan) => Some(plan.memo()),
            _ => None,
        }
    }

    /// Corrections, auto-completions and warnings to show beside the plan.
    pub fn notices(&self) -> Vec<String> {
        use CalculationOutput as O;
        match self {
            O::Engine(r) => r
                .corrections
                .iter()
                .map(ToString::to_string)
                .chain(r.warnings.iter().cloned())
                .collect(),
            O::Sizing(r) => r
                .auto_completed
                .iter()
                .map(|name| format!("{name} complété automatiquement"))
                .collect(),
            O::Piston(r) => r.warnings.clone(),
            O::Cylinder(r) => r.warnings.clone(),
            O::IsoFit(r) if r.out_of_range => vec!["Diamètre hors tables ISO (10 à 50 mm)".to_string()],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_serialization() {
        let item = CalculationItem::Gearbox(GearboxInput::default());
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains("\"type\":\"Gearbox\""));
        let back: CalculationItem = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
    }

    #[test]
    fn test_engine_writes_memo() {
        let out = CalculationItem::Engine(EngineInput::default()).run().unwrap();
        let memo = out.engine_memo().unwrap();
        assert_eq!(memo.cylinders, 8);
        assert!(out.schematic().is_some());
        assert!(out.plan().starts_with("PLAN MOTEUR STIRLING"));
    }

    #[test]
    fn test_curve_headers() {
        let out = CalculationItem::Gearbox(GearboxInput::default()).run().unwrap();
        let ((x, _), points) = out.curve().unwrap();
        assert_eq!(x, "Rapport");
        assert_eq!(points.len(), 4);
        assert!(out.engine_memo().is_none());
    }

    #[test]
    fn test_errors_propagate() {
        let item = CalculationItem::Gearbox(GearboxInput {
            module_mm: 0.0,
            ..GearboxInput::default()
        });
        assert_eq!(item.run().unwrap_err().error_code(), "INVALID_INPUT");
    }
}
