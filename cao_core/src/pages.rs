//! # Pages
//!
//! The fixed set of named pages shared by the GUI and the CLI, their forms,
//! and the navigation rules between them.
//!
//! ```rust
//! use cao_core::pages::Page;
//! use cao_core::session::Session;
//!
//! let session = Session::default();
//! let page: Page = "boite".parse().unwrap();
//! let values = page.defaults(&session.context());
//! assert_eq!(values.raw("nb_rapports"), "4");
//! let output = page.item(&values, &session.context()).unwrap().unwrap().run().unwrap();
//! assert!(output.plan().contains("1500 tr/min"));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::calculations::drone::airfoil::AirfoilInput;
use crate::calculations::drone::propulsion::PropulsionInput;
use crate::calculations::gearbox::GearboxInput;
use crate::calculations::iso_fit::FitInput;
use crate::calculations::mission::MissionInput;
use crate::calculations::rdm::RdmInput;
use crate::calculations::stirling::base_plate::BasePlateInput;
use crate::calculations::stirling::connecting_rod::ConnectingRodInput;
use crate::calculations::stirling::crankshaft::CrankshaftInput;
use crate::calculations::stirling::cylinder::CylinderInput;
use crate::calculations::stirling::engine::EngineInput;
use crate::calculations::stirling::fasteners::FastenersInput;
use crate::calculations::stirling::flywheel::FlywheelInput;
use crate::calculations::stirling::piston::PistonInput;
use crate::calculations::stirling::shaft::ShaftInput;
use crate::calculations::stirling::sizing::SizingInput;
use crate::calculations::{CalculationItem, CalculationOutput, Context};
use crate::errors::{CalcError, CalcResult};
use crate::forms::{FieldSpec, FieldValues};
use crate::memo::EngineMemo;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    #[default]
    Home,
    Rdm,
    Materials,
    Settings,
    Engine,
    Sizing,
    Piston,
    Cylinder,
    Crankshaft,
    ConnectingRod,
    Flywheel,
    Shaft,
    BasePlate,
    Fasteners,
    Gearbox,
    DroneStructure,
    DronePropulsion,
    IsoFit,
    Mission,
}

impl Page {
    pub const ALL: [Page; 19] = [
        Page::Home,
        Page::Rdm,
        Page::Materials,
        Page::Settings,
        Page::Engine,
        Page::Sizing,
        Page::Piston,
        Page::Cylinder,
        Page::Crankshaft,
        Page::ConnectingRod,
        Page::Flywheel,
        Page::Shaft,
        Page::BasePlate,
        Page::Fasteners,
        Page::Gearbox,
        Page::DroneStructure,
        Page::DronePropulsion,
        Page::IsoFit,
        Page::Mission,
    ];

    /// Detail pages reachable from the engine plan.
    pub const STIRLING_DETAILS: [Page; 8] = [
        Page::Piston,
        Page::Cylinder,
        Page::Crankshaft,
        Page::ConnectingRod,
        Page::Flywheel,
        Page::Shaft,
        Page::BasePlate,
        Page::Fasteners,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "Accueil",
            Page::Rdm => "RDM",
            Page::Materials => "Matériaux",
            Page::Settings => "Paramètres",
            Page::Engine => "Moteur Stirling",
            Page::Sizing => "Dimensionnement Stirling",
            Page::Piston => "Piston",
            Page::Cylinder => "Cylindre",
            Page::Crankshaft => "Vilebrequin",
            Page::ConnectingRod => "Bielle",
            Page::Flywheel => "Volant d'inertie",
            Page::Shaft => "Arbre de sortie",
            Page::BasePlate => "Embase",
            Page::Fasteners => "Visserie",
            Page::Gearbox => "Boîte à crabots",
            Page::DroneStructure => "Drone - structure",
            Page::DronePropulsion => "Drone - propulsion",
            Page::IsoFit => "Ajustements ISO",
            Page::Mission => "Simulation de mission",
        }
    }

    /// Stable identifier used on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            Page::Home => "accueil",
            Page::Rdm => "rdm",
            Page::Materials => "materiaux",
            Page::Settings => "parametres",
            Page::Engine => "stirling",
            Page::Sizing => "dimensionnement",
            Page::Piston => "piston",
            Page::Cylinder => "cylindre",
            Page::Crankshaft => "vilebrequin",
            Page::ConnectingRod => "bielle",
            Page::Flywheel => "volant",
            Page::Shaft => "arbre",
            Page::BasePlate => "embase",
            Page::Fasteners => "visserie",
            Page::Gearbox => "boite",
            Page::DroneStructure => "drone-structure",
            Page::DronePropulsion => "drone-propulsion",
            Page::IsoFit => "iso",
            Page::Mission => "mission",
        }
    }

    pub fn is_stirling_detail(self) -> bool {
        Page::STIRLING_DETAILS.contains(&self)
    }

    /// Pages with a calculator form.
    pub fn is_calculator(self) -> bool {
        !matches!(self, Page::Home | Page::Materials | Page::Settings)
    }

    pub fn calculators() -> impl Iterator<Item = Page> {
        Page::ALL.into_iter().filter(|p| p.is_calculator())
    }

    /// Form fields, empty for pages without a calculator.
    pub fn fields(self) -> Vec<FieldSpec> {
        match self {
            Page::Home | Page::Materials | Page::Settings => Vec::new(),
            Page::Rdm => RdmInput::fields(),
            Page::Engine => EngineInput::fields(),
            Page::Sizing => SizingInput::fields(),
            Page::Piston => PistonInput::fields(),
            Page::Cylinder => CylinderInput::fields(),
            Page::Crankshaft => CrankshaftInput::fields(),
            Page::ConnectingRod => ConnectingRodInput::fields(),
            Page::Flywheel => FlywheelInput::fields(),
            Page::Shaft => ShaftInput::fields(),
            Page::BasePlate => BasePlateInput::fields(),
            Page::Fasteners => FastenersInput::fields(),
            Page::Gearbox => GearboxInput::fields(),
            Page::DroneStructure => AirfoilInput::fields(),
            Page::DronePropulsion => PropulsionInput::fields(),
            Page::IsoFit => FitInput::fields(),
            Page::Mission => MissionInput::fields(),
        }
    }

    /// Form opened fresh: field defaults, the default safety tolerance, then
    /// the engine memo when one exists.
    pub fn defaults(self, ctx: &Context) -> FieldValues {
        let specs = self.fields();
        let mut values = FieldValues::from_specs(&specs);
        if specs.iter().any(|s| s.key == "tol") {
            values.set("tol", ctx.settings.tolerance_pct.to_string());
        }
        if let Some(memo) = ctx.memo {
            self.prefill(&mut values, memo);
        }
        values
    }

    fn prefill(self, values: &mut FieldValues, memo: &EngineMemo) {
        match self {
            Page::Piston => PistonInput::prefill(values, memo),
            Page::Cylinder => CylinderInput::prefill(values, memo),
            Page::Crankshaft => CrankshaftInput::prefill(values, memo),
            Page::ConnectingRod => ConnectingRodInput::prefill(values, memo),
            Page::Flywheel => FlywheelInput::prefill(values, memo),
            Page::Shaft => ShaftInput::prefill(values, memo),
            Page::Fasteners => FastenersInput::prefill(values, memo),
            Page::Gearbox => GearboxInput::prefill(values, memo),
            _ => {}
        }
    }

    /// Parse a form into a calculation; `None` for pages without one.
    pub fn item(self, values: &FieldValues, ctx: &Context) -> CalcResult<Option<CalculationItem>> {
        use CalculationItem as I;
        let item = match self {
            Page::Home | Page::Materials | Page::Settings => return Ok(None),
            Page::Rdm => I::Rdm(RdmInput::from_values(values, ctx)?),
            Page::Engine => I::Engine(EngineInput::from_values(values, ctx)?),
            Page::Sizing => I::Sizing(SizingInput::from_values(values, ctx)?),
            Page::Piston => I::Piston(PistonInput::from_values(values, ctx)?),
            Page::Cylinder => I::Cylinder(CylinderInput::from_values(values, ctx)?),
            Page::Crankshaft => I::Crankshaft(CrankshaftInput::from_values(values, ctx)?),
            Page::ConnectingRod => I::ConnectingRod(ConnectingRodInput::from_values(values, ctx)?),
            Page::Flywheel => I::Flywheel(FlywheelInput::from_values(values, ctx)?),
            Page::Shaft => I::Shaft(ShaftInput::from_values(values, ctx)?),
            Page::BasePlate => I::BasePlate(BasePlateInput::from_values(values, ctx)?),
            Page::Fasteners => I::Fasteners(FastenersInput::from_values(values, ctx)?),
            Page::Gearbox => I::Gearbox(GearboxInput::from_values(values, ctx)?),
            Page::DroneStructure => I::Airfoil(AirfoilInput::from_values(values, ctx)?),
            Page::DronePropulsion => I::Propulsion(PropulsionInput::from_values(values, ctx)?),
            Page::IsoFit => I::IsoFit(FitInput::from_values(values, ctx)?),
            Page::Mission => I::Mission(MissionInput::from_values(values, ctx)?),
        };
        Ok(Some(item))
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for Page {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Page::ALL
            .into_iter()
            .find(|p| p.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| CalcError::invalid_input("page", s, "Page inconnue"))
    }
}

/// Parse a page form, run it and record it in the session.
pub fn submit(page: Page, values: &FieldValues, session: &mut Session) -> CalcResult<Option<CalculationOutput>> {
    let Some(item) = page.item(values, &session.context())? else {
        return Ok(None);
    };
    let output = item.run()?;
    session.record(item, &output);
    Ok(Some(output))
}

/// Current page and the way back to the previous ones.
#[derive(Debug, Clone, Default)]
pub struct Navigator {
    current: Page,
    back: Vec<Page>,
}

impl Navigator {
    pub fn current(&self) -> Page {
        self.current
    }

    /// Show page `page`. Going from the engine page to one of its detail
    /// pages re-runs the engine plan first, from `engine_form`, so the
    /// detail form pre-fills from a fresh memo. The page changes even when
    /// that re-run fails; its error is returned for display on the new page.
    pub fn show(&mut self, page: Page, engine_form: &FieldValues, session: &mut Session) -> Option<CalcError> {
        let engine_error = if self.current == Page::Engine && page.is_stirling_detail() {
            submit(Page::Engine, engine_form, session).err()
        } else {
            None
        };
        if let Some(e) = &engine_error {
            tracing::warn!(code = e.error_code(), "engine plan not refreshed: {}", e);
        }
        if page != self.current {
            self.back.push(self.current);
            self.current = page;
        }
        tracing::debug!(page = page.slug(), "page shown");
        engine_error
    }

    /// Previous page, or home when there is none.
    pub fn back(&mut self) -> Page {
        self.current = self.back.pop().unwrap_or(Page::Home);
        self.current
    }

    pub fn home(&mut self) {
        self.back.clear();
        self.current = Page::Home;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugs_round_trip() {
        for page in Page::ALL {
            assert_eq!(page.slug().parse::<Page>().unwrap(), page);
        }
        assert!("inconnue".parse::<Page>().is_err());
    }

    #[test]
    fn test_calculator_pages_have_fields() {
        for page in Page::calculators() {
            assert!(!page.fields().is_empty(), "{page} has no fields");
        }
        assert_eq!(Page::calculators().count(), 16);
    }

    #[test]
    fn test_defaults_use_settings_tolerance() {
        let mut session = Session::default();
        session.settings.tolerance_pct = 35.0;
        let values = Page::Shaft.defaults(&session.context());
        assert_eq!(values.raw("tol"), "35");
    }

    #[test]
    fn test_memo_prefills_detail_pages() {
        let mut session = Session::default();
        assert!(Page::Piston.defaults(&session.context()).is_blank("d_cyl"));

        let engine = Page::Engine.defaults(&session.context());
        submit(Page::Engine, &engine, &mut session).unwrap();
        let bore = session.memo.unwrap().bore_mm;
        let piston = Page::Piston.defaults(&session.context());
        assert_eq!(piston.number("d_cyl").unwrap().map(|d| (d - bore).abs() < 0.01), Some(true));
    }

    #[test]
    fn test_detail_from_engine_refreshes_memo() {
        let mut session = Session::default();
        let mut nav = Navigator::default();
        let engine = Page::Engine.defaults(&session.context());
        assert!(nav.show(Page::Engine, &engine, &mut session).is_none());
        assert!(session.memo.is_none());

        assert!(nav.show(Page::Crankshaft, &engine, &mut session).is_none());
        assert!(session.memo.is_some());
        assert_eq!(nav.current(), Page::Crankshaft);
        assert_eq!(nav.back(), Page::Engine);
    }

    #[test]
    fn test_invalid_engine_form_still_opens_detail() {
        let mut session = Session::default();
        let mut nav = Navigator::default();
        let mut engine = Page::Engine.defaults(&session.context());
        assert!(nav.show(Page::Engine, &engine, &mut session).is_none());

        engine.set("puissance", "abc");
        let err = nav.show(Page::Piston, &engine, &mut session).unwrap();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert_eq!(nav.current(), Page::Piston);
        assert!(session.memo.is_none());
        assert_eq!(nav.back(), Page::Engine);
    }

    #[test]
    fn test_submit_reports_field_errors() {
        let mut session = Session::default();
        let mut values = Page::IsoFit.defaults(&session.context());
        values.set("diametre", "abc");
        let err = submit(Page::IsoFit, &values, &mut session).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
        assert!(session.history.is_empty());
        assert!(submit(Page::Home, &values, &mut session).unwrap().is_none());
    }
}
