//! # Flywheel
//!
//! Solid-disc flywheel sized on the energy delivered per revolution and a
//! target speed fluctuation `δ = Δω/ω`:
//!
//! - `E = 2π·C`
//! - `J = E / (δ·ω²) · (1 + tol)`
//! - `M = J / (½·R²)` for a solid disc of radius `R`
//! - centre stress `σ = (3 + ν)/8 · ρ·ω²·R²`

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::torque_from_power;
use crate::calculations::Context;
use crate::errors::{require_positive, tolerance_fraction, CalcError, CalcResult};
use crate::forms::{FieldSpec, FieldValues};
use crate::materials::{FlywheelMaterial, FLYWHEEL_MATERIALS};
use crate::memo::EngineMemo;
use crate::schematic::{Rgb, Schematic};
use crate::units::{RadPerSec, Rpm};

/// Poisson's ratio used for the disc stress
pub const POISSON: f64 = 0.3;
/// Above this mass (kg) cast iron is preferred
pub const CAST_IRON_ABOVE_KG: f64 = 1.0;

/// Cast iron for heavy discs, steel otherwise.
pub fn flywheel_material(mass_kg: f64) -> &'static FlywheelMaterial {
    if mass_kg > CAST_IRON_ABOVE_KG {
        &FLYWHEEL_MATERIALS[1]
    } else {
        &FLYWHEEL_MATERIALS[0]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlywheelInput {
    pub power_w: Option<f64>,
    pub rpm: f64,
    pub torque_nm: Option<f64>,
    /// Speed fluctuation Δω/ω
    pub fluctuation: f64,
    /// Largest diameter available (mm)
    pub diameter_mm: f64,
    /// Target thickness (mm)
    pub thickness_mm: f64,
    pub tolerance_pct: f64,
}

impl FlywheelInput {
    pub fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::number("puissance", "Puissance moteur (W)", ""),
            FieldSpec::number("regime", "Régime cible (tr/min)", "300"),
            FieldSpec::number("couple", "Couple max moteur (Nm)", ""),
            FieldSpec::number("delta", "Ondulation max (Δω/ω, ex: 0.04)", "0.04"),
            FieldSpec::number("diametre", "Diamètre max dispo (mm)", "200"),
            FieldSpec::number("epaisseur", "Épaisseur cible (mm)", "18"),
            FieldSpec::number("tol", "Tolérance sécurité (%)", "20"),
        ]
    }

    pub fn prefill(values: &mut FieldValues, memo: &EngineMemo) {
        values.set_number("puissance", memo.power_w, 0);
        values.set_number("regime", memo.rpm, 0);
    }

    pub fn from_values(values: &FieldValues, ctx: &Context) -> CalcResult<Self> {
        Ok(FlywheelInput {
            power_w: values.number("puissance")?,
            rpm: values.number_or("regime", 300.0)?,
            torque_nm: values.number("couple")?,
            fluctuation: values.number_or("delta", 0.04)?,
            diameter_mm: values.number_or("diametre", 200.0)?,
            thickness_mm: values.number_or("epaisseur", 18.0)?,
            tolerance_pct: values.number_or("tol", ctx.settings.tolerance_pct)?,
        })
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_positive("regime", self.rpm)?;
        require_positive("delta", self.fluctuation)?;
        require_positive("diametre", self.diameter_mm)?;
        require_positive("epaisseur", self.thickness_mm)?;
        Ok(())
    }

    pub fn torque(&self) -> CalcResult<f64> {
        match (self.torque_nm, self.power_w) {
            (Some(c), _) => Ok(c),
            (None, Some(p)) => Ok(torque_from_power(p, self.rpm)),
            (None, None) => Err(CalcError::missing_field("puissance")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlywheelResult {
    pub input: FlywheelInput,
    pub torque_nm: f64,
    pub omega_rad_s: f64,
    pub energy_j: f64,
    pub inertia_kg_m2: f64,
    pub mass_kg: f64,
    pub material: String,
    pub material_re_mpa: f64,
    pub density: f64,
    /// Thickness giving `mass_kg` with the chosen material (mm)
    pub required_thickness_mm: f64,
    pub centre_stress_mpa: f64,
}

impl FlywheelResult {
    /// Side view of the disc.
    pub fn schematic(&self) -> Schematic {
        let d = self.input.diameter_mm;
        let e = self.input.thickness_mm;
        let mut s = Schematic::new(format!(
            "Croquis technique volant (vue de côté, masse ≈ {:.2} kg)",
            self.mass_kg
        ));
        s.rect(0.0, 0.0, e, d, Some(Rgb::GREY), Rgb::from_hex(0x333333));
        s.dashed(vec![[-e * 0.5, d / 2.0], [e * 1.5, d / 2.0]], Rgb::BLACK, 1.0);
        s.label(e / 2.0, d + 6.0, format!("Ø {:.0} mm", d), Rgb::from_hex(0x333333));
        s.label(e / 2.0, -8.0, format!("e {:.0} mm", e), Rgb::from_hex(0x333333));
        s
    }
}

pub fn calculate(input: &FlywheelInput) -> CalcResult<FlywheelResult> {
    input.validate()?;
    let tol = tolerance_fraction("tol", input.tolerance_pct)?;
    let torque = input.torque()?;
    if input.torque_nm.is_none() {
        tracing::warn!(target: "cao_core::stirling", torque, "flywheel torque derived from power");
    }

    let omega = RadPerSec::from(Rpm(input.rpm)).0;
    let energy = 2.0 * PI * torque.abs();
    let inertia = energy / (input.fluctuation * omega.powi(2)) * (1.0 + tol);
    let radius_m = input.diameter_mm / 2000.0;
    let mass = inertia / (0.5 * radius_m.powi(2));
    let mat = flywheel_material(mass);
    let rho = mat.density_kg_m3();
    let required_thickness_mm = mass / (rho * PI * radius_m.powi(2)) * 1000.0;
    let stress_pa = (3.0 + POISSON) / 8.0 * rho * omega.powi(2) * radius_m.powi(2);

    tracing::debug!(inertia, mass, material = mat.name, "flywheel computed");

    Ok(FlywheelResult {
        input: input.clone(),
        torque_nm: torque,
        omega_rad_s: omega,
        energy_j: energy,
        inertia_kg_m2: inertia,
        mass_kg: mass,
        material: mat.name.to_string(),
        material_re_mpa: mat.re_mpa,
        density: mat.density,
        required_thickness_mm,
        centre_stress_mpa: stress_pa / 1.0e6,
    })
}

impl fmt::Display for FlywheelResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let i = &self.input;
        writeln!(f, "Plan technique volant moteur Stirling")?;
        writeln!(f)?;
        writeln!(f, "- Ø volant : {:.1} mm", i.diameter_mm)?;
        writeln!(f, "- Largeur/épaisseur cible : {:.1} mm", i.thickness_mm)?;
        writeln!(f, "- Couple : {:.2} Nm | Énergie/tour : {:.1} J", self.torque_nm, self.energy_j)?;
        writeln!(f, "- Inertie requise (J) : {:.4} kg·m²", self.inertia_kg_m2)?;
        writeln!(f, "- Masse cible : {:.2} kg", self.mass_kg)?;
        writeln!(f, "- Épaisseur nécessaire : {:.1} mm", self.required_thickness_mm)?;
        writeln!(f, "- Régime : {:.0} tr/min", i.rpm)?;
        writeln!(
            f,
            "- Matériau recommandé : {} (Re={} MPa, ρ={} g/cm³)",
            self.material, self.material_re_mpa, self.density
        )?;
        writeln!(
            f,
            "- Tension max estimée (centre) : {:.2} MPa (tolérance {:.0}%)",
            self.centre_stress_mpa, i.tolerance_pct
        )?;
        writeln!(f, "- Moyeu alésé H7, rainure de clavette ou vis de pression.")?;
        writeln!(f, "- Fixation sur vilebrequin par clavette, vis M6/M8 (min 8.8).")?;
        writeln!(f)?;
        write!(f, "Conseil : si la masse est trop élevée, réduire D ou évider le moyeu. Vérifier le balourd avant montage.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> FlywheelInput {
        FlywheelInput {
            power_w: None,
            rpm: 300.0,
            torque_nm: Some(10.0),
            fluctuation: 0.04,
            diameter_mm: 200.0,
            thickness_mm: 18.0,
            tolerance_pct: 20.0,
        }
    }

    #[test]
    fn test_inertia_and_mass() {
        let r = calculate(&input()).unwrap();
        let omega = 2.0 * PI * 5.0;
        let j = 2.0 * PI * 10.0 / (0.04 * omega * omega) * 1.2;
        assert!((r.inertia_kg_m2 - j).abs() < 1e-12);
        // solid disc R = 0.1 m
        assert!((r.mass_kg - j / 0.005).abs() < 1e-9);
    }

    #[test]
    fn test_material_choice() {
        assert_eq!(flywheel_material(0.5).name, "Acier S235");
        assert_eq!(flywheel_material(3.0).name, "Fonte GGG40");
    }

    #[test]
    fn test_required_thickness_matches_mass() {
        let r = calculate(&input()).unwrap();
        let radius = 0.1;
        let volume = PI * radius * radius * r.required_thickness_mm / 1000.0;
        assert!((volume * r.density * 1000.0 - r.mass_kg).abs() < 1e-9);
    }

    #[test]
    fn test_stress() {
        let r = calculate(&input()).unwrap();
        let omega = 2.0 * PI * 5.0;
        let expected = 3.3 / 8.0 * r.density * 1000.0 * omega * omega * 0.01 / 1.0e6;
        assert!((r.centre_stress_mpa - expected).abs() < 1e-12);
    }

    #[test]
    fn test_torque_from_power() {
        let mut i = input();
        i.torque_nm = None;
        i.power_w = Some(100.0);
        let r = calculate(&i).unwrap();
        assert!((r.torque_nm - 100.0 / (2.0 * PI * 5.0)).abs() < 1e-9);
        i.power_w = None;
        assert_eq!(calculate(&i).unwrap_err().error_code(), "MISSING_FIELD");
    }
}
