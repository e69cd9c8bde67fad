//! # Dog-Clutch Gearbox
//!
//! Progressive ratios for an automatic dog-clutch gearbox driven by the
//! engine. Every stage uses a 20-tooth pinion; stage `i` has
//! `z2 = ⌊20·(1 + 0.25·i)⌋` teeth.
//!
//! ```rust
//! use cao_core::calculations::gearbox::{calculate, GearboxInput};
//!
//! let r = calculate(&GearboxInput::default()).unwrap();
//! assert_eq!(r.stages.last().unwrap().driven_teeth, 40);
//! assert!((r.centre_distance_mm - 60.0).abs() < 1e-9);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::Context;
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::forms::{FieldSpec, FieldValues};
use crate::memo::EngineMemo;

/// Pinion teeth
pub const PINION_TEETH: u32 = 20;
/// Ratio step per stage
pub const RATIO_STEP: f64 = 0.25;
pub const DEFAULT_INPUT_RPM: f64 = 1500.0;
pub const DEFAULT_SHAFT_MM: f64 = 20.0;
/// Most stages a gearbox may have
pub const MAX_RATIOS: u32 = 12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearboxInput {
    pub input_rpm: f64,
    pub ratios: u32,
    pub shaft_mm: f64,
    /// Gear module (mm)
    pub module_mm: f64,
}

impl Default for GearboxInput {
    fn default() -> Self {
        GearboxInput {
            input_rpm: DEFAULT_INPUT_RPM,
            ratios: 4,
            shaft_mm: DEFAULT_SHAFT_MM,
            module_mm: 2.0,
        }
    }
}

impl GearboxInput {
    pub fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::number("v_in", "Vitesse d'entrée (tr/min)", ""),
            FieldSpec::integer("nb_rapports", "Nombre de rapports", "4"),
            FieldSpec::number("d_arbre", "Diamètre de l'arbre (mm)", ""),
            FieldSpec::number("module", "Module des engrenages (mm)", "2.0"),
        ]
    }

    /// Input speed and shaft diameter from the engine crankshaft.
    pub fn prefill(values: &mut FieldValues, memo: &EngineMemo) {
        values.set_number("v_in", memo.rpm, 0);
        values.set_number("d_arbre", memo.crankpin_mm, 2);
    }

    /// Blank speed and diameter fall back to the memo, then to 1500 rpm and
    /// 20 mm.
    pub fn from_values(values: &FieldValues, ctx: &Context) -> CalcResult<Self> {
        let input_rpm = match values.number("v_in")? {
            Some(v) => v,
            None => ctx.memo.map_or(DEFAULT_INPUT_RPM, |m| m.rpm),
        };
        let shaft_mm = match values.number("d_arbre")? {
            Some(v) => v,
            None => ctx.memo.map_or(DEFAULT_SHAFT_MM, |m| m.crankpin_mm),
        };
        Ok(GearboxInput {
            input_rpm,
            ratios: values.count_or("nb_rapports", 4)?,
            shaft_mm,
            module_mm: values.number_or("module", 2.0)?,
        })
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_positive("v_in", self.input_rpm)?;
        require_positive("d_arbre", self.shaft_mm)?;
        require_positive("module", self.module_mm)?;
        if self.ratios == 0 {
            return Err(CalcError::invalid_input("nb_rapports", "0", "Au moins un rapport est nécessaire"));
        }
        if self.ratios > MAX_RATIOS {
            return Err(CalcError::invalid_input(
                "nb_rapports",
                self.ratios.to_string(),
                format!("{} rapports au plus", MAX_RATIOS),
            ));
        }
        Ok(())
    }
}

/// One gear stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub index: u32,
    pub pinion_teeth: u32,
    pub driven_teeth: u32,
    pub ratio: f64,
    pub output_rpm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearboxResult {
    pub input: GearboxInput,
    pub stages: Vec<Stage>,
    /// Centre distance of the last stage (mm)
    pub centre_distance_mm: f64,
}

impl GearboxResult {
    /// Output speed per ratio index.
    pub fn curve(&self) -> Vec<[f64; 2]> {
        self.stages
            .iter()
            .map(|s| [s.index as f64, s.output_rpm])
            .collect()
    }
}

pub fn calculate(input: &GearboxInput) -> CalcResult<GearboxResult> {
    input.validate()?;
    let stages: Vec<Stage> = (1..=input.ratios)
        .map(|i| {
            let driven = (PINION_TEETH as f64 * (1.0 + RATIO_STEP * i as f64)).floor() as u32;
            let ratio = driven as f64 / PINION_TEETH as f64;
            Stage {
                index: i,
                pinion_teeth: PINION_TEETH,
                driven_teeth: driven,
                ratio,
                output_rpm: input.input_rpm / ratio,
            }
        })
        .collect();
    let last_teeth = stages.last().map_or(PINION_TEETH, |s| s.driven_teeth);
    let centre_distance_mm = input.module_mm * (PINION_TEETH + last_teeth) as f64 / 2.0;
    tracing::debug!(ratios = input.ratios, centre_distance_mm, "gearbox computed");
    Ok(GearboxResult {
        input: input.clone(),
        stages,
        centre_distance_mm,
    })
}

impl fmt::Display for GearboxResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Boîte à crabots automatique - entrée {:.0} tr/min", self.input.input_rpm)?;
        writeln!(f)?;
        for s in &self.stages {
            writeln!(
                f,
                "Rapport {} : {} / {} = {:.2}",
                s.index, s.pinion_teeth, s.driven_teeth, s.ratio
            )?;
        }
        for s in &self.stages {
            writeln!(f, "Vitesse sortie {} : {:.1} tr/min", s.index, s.output_rpm)?;
        }
        writeln!(f)?;
        writeln!(f, "Diamètre d'arbre : {:.2} mm", self.input.shaft_mm)?;
        writeln!(f, "Module choisi : {} mm", self.input.module_mm)?;
        write!(
            f,
            "Entraxe estimé : {:.1} mm ({:.3} m)",
            self.centre_distance_mm,
            self.centre_distance_mm / 1000.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Settings;

    #[test]
    fn test_stages() {
        let r = calculate(&GearboxInput::default()).unwrap();
        let teeth: Vec<u32> = r.stages.iter().map(|s| s.driven_teeth).collect();
        assert_eq!(teeth, vec![25, 30, 35, 40]);
        assert!((r.stages[0].output_rpm - 1200.0).abs() < 1e-9);
        assert!((r.stages[3].output_rpm - 750.0).abs() < 1e-9);
    }

    #[test]
    fn test_centre_distance_uses_last_stage() {
        let input = GearboxInput {
            ratios: 2,
            module_mm: 3.0,
            ..GearboxInput::default()
        };
        // 3 · (20 + 30) / 2
        assert_eq!(calculate(&input).unwrap().centre_distance_mm, 75.0);
    }

    #[test]
    fn test_zero_ratios_rejected() {
        let input = GearboxInput {
            ratios: 0,
            ..GearboxInput::default()
        };
        assert!(calculate(&input).is_err());
    }

    #[test]
    fn test_ratio_count_is_capped() {
        let input = GearboxInput {
            ratios: MAX_RATIOS,
            ..GearboxInput::default()
        };
        assert_eq!(calculate(&input).unwrap().stages.len(), 12);

        let input = GearboxInput {
            ratios: u32::MAX,
            ..GearboxInput::default()
        };
        assert_eq!(calculate(&input).unwrap_err().error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_blank_fields_fall_back() {
        let settings = Settings::default();
        let values = FieldValues::from_specs(&GearboxInput::fields());

        let ctx = Context::new(&settings, None);
        let input = GearboxInput::from_values(&values, &ctx).unwrap();
        assert_eq!((input.input_rpm, input.shaft_mm), (1500.0, 20.0));

        let memo = crate::memo::sample();
        let ctx = Context::new(&settings, Some(&memo));
        let input = GearboxInput::from_values(&values, &ctx).unwrap();
        assert_eq!((input.input_rpm, input.shaft_mm), (1400.0, 6.0));
    }

    #[test]
    fn test_curve() {
        let r = calculate(&GearboxInput::default()).unwrap();
        assert_eq!(r.curve()[1], [2.0, 1000.0]);
    }
}
