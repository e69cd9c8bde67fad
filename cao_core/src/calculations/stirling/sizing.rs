//! # Stirling Sizing
//!
//! Thermodynamic sizing of a Stirling engine from its hot and cold source
//! temperatures, bounded by the Carnot efficiency `η = 1 - Tc/Th` (Kelvin).
//!
//! Missing geometry is completed before the calculation:
//! - bore and stroke both absent: bore 70 mm, stroke 1.2 × bore
//! - only one absent: stroke/bore ratio 1.2
//! - frequency absent: mean piston speed `2·s·f` of 2.5 m/s
//!
//! ```rust
//! use cao_core::calculations::stirling::sizing::{calculate, SizingInput};
//!
//! let result = calculate(&SizingInput::default()).unwrap();
//! assert_eq!(result.bore_mm, 70.0);
//! assert_eq!(result.auto_completed.len(), 3);
//! ```

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::torsion_diameter_mm;
use crate::calculations::Context;
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::forms::{FieldSpec, FieldValues};
use crate::units::{Bar, Celsius, Kelvin, Pascals};

/// Bore used when neither bore nor stroke is given (mm)
pub const DEFAULT_BORE_MM: f64 = 70.0;
/// Stroke/bore ratio used to complete the geometry
pub const STROKE_RATIO: f64 = 1.2;
/// Mean piston speed used to deduce the frequency (m/s)
pub const TARGET_PISTON_SPEED: f64 = 2.5;
/// Admissible shear stress of the output shaft (Pa)
pub const SHAFT_TAU_PA: f64 = 60e6;
/// Shaft length over diameter
pub const SHAFT_LENGTH_RATIO: f64 = 1.6;

pub const GASES: &[&str] = &["Air", "Hélium", "Hydrogène", "Azote"];

/// Carnot efficiency between two temperatures in °C.
pub fn carnot_efficiency(hot_c: f64, cold_c: f64) -> f64 {
    let hot: Kelvin = Celsius(hot_c).into();
    let cold: Kelvin = Celsius(cold_c).into();
    1.0 - cold.0 / hot.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingInput {
    pub hot_c: f64,
    pub cold_c: f64,
    pub pressure_bar: f64,
    pub bore_mm: Option<f64>,
    pub stroke_mm: Option<f64>,
    pub frequency_hz: Option<f64>,
    /// Working gas, reported only
    pub gas: String,
    /// Engine efficiency relative to Carnot (%)
    pub engine_eff_pct: f64,
    pub mechanical_eff_pct: f64,
    pub generator_eff_pct: f64,
    pub cylinders: u32,
}

impl Default for SizingInput {
    fn default() -> Self {
        SizingInput {
            hot_c: 650.0,
            cold_c: 40.0,
            pressure_bar: 20.0,
            bore_mm: None,
            stroke_mm: None,
            frequency_hz: None,
            gas: "Air".to_string(),
            engine_eff_pct: 35.0,
            mechanical_eff_pct: 80.0,
            generator_eff_pct: 90.0,
            cylinders: 1,
        }
    }
}

impl SizingInput {
    pub fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::number("t_chaude", "Température chaude (°C)", "650"),
            FieldSpec::number("t_froide", "Température froide (°C)", "40"),
            FieldSpec::number("pression", "Pression travail (bar)", "20"),
            FieldSpec::number("d_cyl", "Diamètre cylindre (mm)", ""),
            FieldSpec::number("course", "Course piston (mm)", ""),
            FieldSpec::number("freq", "Fréquence (Hz)", ""),
            FieldSpec::choice("gaz", "Type de gaz", "Air", GASES),
            FieldSpec::number("rendement_moteur", "Rendement moteur (%)", "35"),
            FieldSpec::number("rendement_mec", "Rendement mécanique (%)", "80"),
            FieldSpec::number("rendement_gen", "Rendement génératrice (%)", "90"),
            FieldSpec::integer("nb_cyl", "Nombre de cylindres", "1"),
        ]
    }

    pub fn from_values(values: &FieldValues, _ctx: &Context) -> CalcResult<Self> {
        Ok(SizingInput {
            hot_c: values.number_or("t_chaude", 650.0)?,
            cold_c: values.number_or("t_froide", 40.0)?,
            pressure_bar: values.number_or("pression", 20.0)?,
            bore_mm: values.number("d_cyl")?,
            stroke_mm: values.number("course")?,
            frequency_hz: values.number("freq")?,
            gas: values.text_or("gaz", "Air"),
            engine_eff_pct: values.number_or("rendement_moteur", 35.0)?,
            mechanical_eff_pct: values.number_or("rendement_mec", 80.0)?,
            generator_eff_pct: values.number_or("rendement_gen", 90.0)?,
            cylinders: values.count_or("nb_cyl", 1)?,
        })
    }

    pub fn validate(&self) -> CalcResult<()> {
        if self.hot_c <= self.cold_c {
            return Err(CalcError::invalid_input(
                "t_chaude",
                self.hot_c.to_string(),
                "La température chaude doit dépasser la température froide",
            ));
        }
        if Kelvin::from(Celsius(self.cold_c)).0 <= 0.0 {
            return Err(CalcError::invalid_input("t_froide", self.cold_c.to_string(), "Température sous le zéro absolu"));
        }
        require_positive("pression", self.pressure_bar)?;
        for (field, v) in [("d_cyl", self.bore_mm), ("course", self.stroke_mm), ("freq", self.frequency_hz)] {
            if let Some(v) = v {
                require_positive(field, v)?;
            }
        }
        for (field, pct) in [
            ("rendement_moteur", self.engine_eff_pct),
            ("rendement_mec", self.mechanical_eff_pct),
            ("rendement_gen", self.generator_eff_pct),
        ] {
            if !(pct > 0.0 && pct <= 100.0) {
                return Err(CalcError::invalid_input(field, pct.to_string(), "Le rendement doit être dans ]0, 100]"));
            }
        }
        if self.cylinders == 0 {
            return Err(CalcError::invalid_input("nb_cyl", "0", "Au moins un cylindre est nécessaire"));
        }
        if !GASES.contains(&self.gas.as_str()) {
            return Err(CalcError::invalid_input("gaz", self.gas.clone(), "Gaz inconnu"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    pub hot_c: f64,
    pub cold_c: f64,
    pub pressure_bar: f64,
    pub gas: String,
    pub cylinders: u32,
    pub bore_mm: f64,
    pub stroke_mm: f64,
    pub frequency_hz: f64,
    /// Names of the values completed automatically
    pub auto_completed: Vec<String>,
    pub carnot_efficiency: f64,
    pub real_efficiency: f64,
    pub swept_volume_cm3: f64,
    pub rpm: f64,
    pub thermal_power_w: f64,
    pub electric_power_w: f64,
    pub torque_nm: f64,
    pub shaft_diameter_mm: f64,
    pub shaft_length_mm: f64,
}

/// Run the sizing.
pub fn calculate(input: &SizingInput) -> CalcResult<SizingResult> {
    input.validate()?;

    let mut auto_completed = Vec::new();
    let (bore, stroke) = match (input.bore_mm, input.stroke_mm) {
        (Some(d), Some(s)) => (d, s),
        (None, None) => {
            auto_completed.push("diamètre cylindre".to_string());
            auto_completed.push("course piston".to_string());
            (DEFAULT_BORE_MM, STROKE_RATIO * DEFAULT_BORE_MM)
        }
        (None, Some(s)) => {
            auto_completed.push("diamètre cylindre".to_string());
            (s / STROKE_RATIO, s)
        }
        (Some(d), None) => {
            auto_completed.push("course piston".to_string());
            (d, STROKE_RATIO * d)
        }
    };
    let frequency = match input.frequency_hz {
        Some(f) => f,
        None => {
            auto_completed.push("fréquence".to_string());
            TARGET_PISTON_SPEED / (2.0 * stroke / 1000.0)
        }
    };
    if !auto_completed.is_empty() {
        tracing::warn!(
            target: "cao_core::stirling",
            completed = %auto_completed.join(", "),
            "sizing inputs completed automatically"
        );
    }

    let carnot = carnot_efficiency(input.hot_c, input.cold_c);
    let engine = input.engine_eff_pct / 100.0;
    let mech = input.mechanical_eff_pct / 100.0;
    let gen = input.generator_eff_pct / 100.0;

    let swept_m3 = PI * (bore / 2.0).powi(2) * stroke * 1e-9 * input.cylinders as f64;
    let p = Pascals::from(Bar(input.pressure_bar)).0;
    let thermal_power_w = p * swept_m3 * frequency * carnot * engine;
    let electric_power_w = thermal_power_w * mech * gen;
    let mechanical_power_w = electric_power_w / gen;
    let torque_nm = mechanical_power_w / (2.0 * PI * frequency);
    let shaft_diameter_mm = torsion_diameter_mm(torque_nm, SHAFT_TAU_PA);

    tracing::debug!(carnot, electric_power_w, torque_nm, "stirling sizing computed");

    Ok(SizingResult {
        hot_c: input.hot_c,
        cold_c: input.cold_c,
        pressure_bar: input.pressure_bar,
        gas: input.gas.clone(),
        cylinders: input.cylinders,
        bore_mm: bore,
        stroke_mm: stroke,
        frequency_hz: frequency,
        auto_completed,
        carnot_efficiency: carnot,
        real_efficiency: carnot * engine * mech * gen,
        swept_volume_cm3: swept_m3 * 1e6,
        rpm: frequency * 60.0,
        thermal_power_w,
        electric_power_w,
        torque_nm,
        shaft_diameter_mm,
        shaft_length_mm: SHAFT_LENGTH_RATIO * shaft_diameter_mm,
    })
}

impl fmt::Display for SizingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.auto_completed.is_empty() {
            writeln!(f, "Valeurs complétées automatiquement : {}", self.auto_completed.join(", "))?;
            writeln!(f)?;
        }
        writeln!(
            f,
            "Entrées : Tc={:.1} °C, Tf={:.1} °C, P={:.1} bar, d={:.1} mm, course={:.1} mm, f={:.2} Hz, gaz={}",
            self.hot_c, self.cold_c, self.pressure_bar, self.bore_mm, self.stroke_mm, self.frequency_hz, self.gas
        )?;
        writeln!(f, "Cylindres : {}", self.cylinders)?;
        writeln!(f)?;
        writeln!(f, "Rendement Carnot : {:.1} %", self.carnot_efficiency * 100.0)?;
        writeln!(f, "Rendement global réel : {:.2} %", self.real_efficiency * 100.0)?;
        writeln!(f)?;
        writeln!(f, "Volume balayé : {:.2} cm³", self.swept_volume_cm3)?;
        writeln!(f, "Tours/minute : {:.0}", self.rpm)?;
        writeln!(f, "Puissance nette électrique : {:.1} W", self.electric_power_w)?;
        writeln!(f, "Couple arbre : {:.2} Nm", self.torque_nm)?;
        writeln!(f)?;
        write!(
            f,
            "Dimension mini arbre : Ø {:.2} mm × {:.2} mm",
            self.shaft_diameter_mm, self.shaft_length_mm
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Settings;

    #[test]
    fn test_carnot_efficiency() {
        // 1 - 313.15 / 923.15 = 0.6608
        assert!((carnot_efficiency(650.0, 40.0) - 0.6608).abs() < 1e-4);
    }

    #[test]
    fn test_carnot_increases_with_hot_temperature() {
        let mut last = 0.0;
        for hot in [100.0, 200.0, 400.0, 650.0, 900.0] {
            let eta = carnot_efficiency(hot, 40.0);
            assert!(eta > last);
            last = eta;
        }
    }

    #[test]
    fn test_unknown_gas_rejected() {
        let settings = Settings::default();
        let mut values = FieldValues::from_specs(&SizingInput::fields());
        values.set("gaz", "Xenon");
        let input = SizingInput::from_values(&values, &Context::new(&settings, None)).unwrap();
        assert_eq!(calculate(&input).unwrap_err().error_code(), "INVALID_INPUT");

        values.set("gaz", "Hélium");
        let input = SizingInput::from_values(&values, &Context::new(&settings, None)).unwrap();
        assert!(calculate(&input).is_ok());
    }

    #[test]
    fn test_full_auto_completion() {
        let r = calculate(&SizingInput::default()).unwrap();
        assert_eq!(r.bore_mm, 70.0);
        assert!((r.stroke_mm - 84.0).abs() < 1e-9);
        // 2.5 / (2 · 0.084) = 14.88 Hz
        assert!((r.frequency_hz - 14.881).abs() < 1e-3);
        assert_eq!(r.auto_completed, vec!["diamètre cylindre", "course piston", "fréquence"]);
    }

    #[test]
    fn test_stroke_only_gives_bore() {
        let input = SizingInput {
            stroke_mm: Some(60.0),
            frequency_hz: Some(10.0),
            ..SizingInput::default()
        };
        let r = calculate(&input).unwrap();
        assert!((r.bore_mm - 50.0).abs() < 1e-9);
        assert_eq!(r.auto_completed, vec!["diamètre cylindre"]);
    }

    #[test]
    fn test_power_chain() {
        let input = SizingInput {
            bore_mm: Some(60.0),
            stroke_mm: Some(50.0),
            frequency_hz: Some(10.0),
            ..SizingInput::default()
        };
        let r = calculate(&input).unwrap();
        assert!(r.auto_completed.is_empty());
        let expected_v = PI * 30.0f64.powi(2) * 50.0 * 1e-9;
        assert!((r.swept_volume_cm3 - expected_v * 1e6).abs() < 1e-9);
        assert!((r.electric_power_w - r.thermal_power_w * 0.8 * 0.9).abs() < 1e-9);
        assert!((r.shaft_length_mm - 1.6 * r.shaft_diameter_mm).abs() < 1e-9);
        assert!(r.real_efficiency < r.carnot_efficiency);
    }

    #[test]
    fn test_hot_must_exceed_cold() {
        let input = SizingInput {
            hot_c: 40.0,
            cold_c: 40.0,
            ..SizingInput::default()
        };
        assert!(calculate(&input).is_err());
    }
}
