//! # Output Shaft
//!
//! Torsion diameter of the engine output shaft, rounded up to a commercial
//! diameter with its ISO tolerance.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{torque_from_power, torsion_diameter_mm};
use crate::calculations::Context;
use crate::errors::{require_positive, tolerance_fraction, CalcResult};
use crate::forms::{FieldSpec, FieldValues};
use crate::memo::EngineMemo;
use crate::schematic::{Anchor, Rgb, Schematic};

pub const DEFAULT_MATERIAL: &str = "Acier 42CrMo4";
/// Commercial shaft diameters (mm)
pub const STANDARD_DIAMETERS: [f64; 8] = [15.0, 18.0, 20.0, 22.0, 25.0, 30.0, 35.0, 40.0];

/// Yield strength (MPa) from the steel name; 600 MPa when unknown.
pub fn steel_re_mpa(material: &str) -> f64 {
    let m = material.to_lowercase();
    if m.contains("42crmo4") {
        900.0
    } else if m.contains("355") {
        355.0
    } else {
        600.0
    }
}

/// Smallest standard diameter at least `d`, else `d + 2` rounded.
pub fn standard_diameter(d: f64) -> f64 {
    STANDARD_DIAMETERS
        .iter()
        .copied()
        .find(|&s| s >= d)
        .unwrap_or_else(|| (d + 2.0).round())
}

/// ISO shaft tolerance class for a nominal diameter.
pub fn fit_class(nominal_mm: f64) -> &'static str {
    if nominal_mm < 40.0 {
        "h6"
    } else {
        "h7"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaftInput {
    pub torque_nm: f64,
    pub length_mm: f64,
    pub tolerance_pct: f64,
    pub material: String,
}

impl ShaftInput {
    pub fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::number("couple", "Couple transmis (Nm)", ""),
            FieldSpec::number("longueur", "Longueur arbre (mm)", "110"),
            FieldSpec::number("tol", "Tolérance sécurité (%)", "20"),
            FieldSpec::text("materiau", "Matériau (ex: 42CrMo4 ou S355)", DEFAULT_MATERIAL),
        ]
    }

    /// Total engine torque at the memo speed.
    pub fn prefill(values: &mut FieldValues, memo: &EngineMemo) {
        if memo.rpm > 0.0 {
            values.set_number("couple", torque_from_power(memo.power_w, memo.rpm), 2);
        }
    }

    pub fn from_values(values: &FieldValues, ctx: &Context) -> CalcResult<Self> {
        Ok(ShaftInput {
            torque_nm: values.require_number("couple")?,
            length_mm: values.number_or("longueur", 110.0)?,
            tolerance_pct: values.number_or("tol", ctx.settings.tolerance_pct)?,
            material: values.text_or("materiau", DEFAULT_MATERIAL),
        })
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_positive("longueur", self.length_mm)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShaftResult {
    pub input: ShaftInput,
    pub re_mpa: f64,
    pub tau_adm_mpa: f64,
    pub min_diameter_mm: f64,
    pub nominal_diameter_mm: f64,
    pub fit: String,
}

impl ShaftResult {
    /// Side view of the shaft at its nominal diameter.
    pub fn schematic(&self) -> Schematic {
        let d = self.nominal_diameter_mm;
        let l = self.input.length_mm;
        let mut s = Schematic::new("Croquis technique arbre (vue latérale)");
        s.rect(0.0, -d / 2.0, l, d, Some(Rgb::from_hex(0xbbbbbb)), Rgb::from_hex(0x555555));
        s.dashed(vec![[-5.0, 0.0], [l + 5.0, 0.0]], Rgb::BLACK, 1.0);
        s.label(l / 2.0, d / 2.0 + 5.0, format!("{:.0} mm", l), Rgb::BLACK);
        s.label_at(l + 8.0, 0.0, format!("Ø {:.1} mm", d), Rgb::BLACK, Anchor::Start);
        s
    }
}

pub fn calculate(input: &ShaftInput) -> CalcResult<ShaftResult> {
    input.validate()?;
    let tol = tolerance_fraction("tol", input.tolerance_pct)?;
    let re = steel_re_mpa(&input.material);
    let tau = 0.5 * (1.0 - tol) * re;
    let d = torsion_diameter_mm(input.torque_nm, tau * 1.0e6);
    let nominal = standard_diameter(d);

    tracing::debug!(d, nominal, "output shaft computed");

    Ok(ShaftResult {
        input: input.clone(),
        re_mpa: re,
        tau_adm_mpa: tau,
        min_diameter_mm: d,
        nominal_diameter_mm: nominal,
        fit: fit_class(nominal).to_string(),
    })
}

impl fmt::Display for ShaftResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let i = &self.input;
        writeln!(f, "Plan technique arbre moteur Stirling")?;
        writeln!(f)?;
        writeln!(f, "- Couple à transmettre : {:.2} Nm", i.torque_nm)?;
        writeln!(f, "- Longueur arbre : {:.0} mm", i.length_mm)?;
        writeln!(f, "- Matériau conseillé : {} (Re={:.0} MPa)", i.material, self.re_mpa)?;
        writeln!(f, "- Contrainte admissible τ : {:.1} MPa", self.tau_adm_mpa)?;
        writeln!(f, "- Diamètre mini calculé : {:.2} mm", self.min_diameter_mm)?;
        writeln!(
            f,
            "- Ø nominal recommandé : {:.1} mm (tolérance {})",
            self.nominal_diameter_mm, self.fit
        )?;
        writeln!(f, "- Finition : surface usinée Ra ≤ 1.6 µm, congés aux épaulements")?;
        writeln!(
            f,
            "Prévoir un ajustement glissant ou serré selon montage : queue d'arbre {}, rainure de clavette pour volant/poulie si nécessaire.",
            self.fit
        )?;
        write!(f, "- Taraudage M8 en extrémité pour extraction ; graissage conseillé dans les paliers.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steel_lookup() {
        assert_eq!(steel_re_mpa("Acier 42CrMo4"), 900.0);
        assert_eq!(steel_re_mpa("S355J2"), 355.0);
        assert_eq!(steel_re_mpa("C45"), 600.0);
    }

    #[test]
    fn test_standard_diameter() {
        assert_eq!(standard_diameter(14.2), 15.0);
        assert_eq!(standard_diameter(20.0), 20.0);
        assert_eq!(standard_diameter(40.0), 40.0);
        assert_eq!(standard_diameter(41.3), 43.0);
        assert_eq!(fit_class(35.0), "h6");
        assert_eq!(fit_class(40.0), "h7");
    }

    #[test]
    fn test_shaft() {
        let input = ShaftInput {
            torque_nm: 100.0,
            length_mm: 110.0,
            tolerance_pct: 20.0,
            material: DEFAULT_MATERIAL.to_string(),
        };
        let r = calculate(&input).unwrap();
        // τ = 0.5 · 0.8 · 900 = 360 MPa, d = 11.23 mm
        assert!((r.tau_adm_mpa - 360.0).abs() < 1e-9);
        assert!((r.min_diameter_mm - 11.226).abs() < 0.001);
        assert_eq!(r.nominal_diameter_mm, 15.0);
        assert_eq!(r.fit, "h6");
    }

    #[test]
    fn test_prefill_total_torque() {
        let memo = crate::memo::sample();
        let mut values = FieldValues::from_specs(&ShaftInput::fields());
        ShaftInput::prefill(&mut values, &memo);
        // 15000 W at 1400 rpm = 102.31 N·m
        assert_eq!(values.number("couple").unwrap(), Some(102.31));
    }
}
