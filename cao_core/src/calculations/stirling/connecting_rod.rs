//! # Connecting Rod
//!
//! Section of a rectangular, lightened connecting rod and the lightest rod
//! material able to carry the peak piston force.
//!
//! The minimum section is taken on a 400 MPa reference steel with a 0.5
//! lightening factor and a 1.6 machining margin:
//! `A = 1.6·F / (0.5·400·(1 - tol))` (mm²).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::Context;
use crate::errors::{require_positive, tolerance_fraction, CalcError, CalcResult};
use crate::forms::{FieldSpec, FieldValues};
use crate::materials::{RodMaterial, ROD_MATERIALS};
use crate::memo::EngineMemo;
use crate::schematic::{Rgb, Schematic};

/// Reference yield strength for the section (MPa)
pub const REFERENCE_RE_MPA: f64 = 400.0;
/// Share of Re usable on a lightened section
pub const LIGHTENING_FACTOR: f64 = 0.5;
pub const MACHINING_MARGIN: f64 = 1.6;

/// Lightest rod material carrying `force_n` on `section_mm2` at `0.5·Re`;
/// the first table entry when none does.
pub fn best_rod_material(force_n: f64, section_mm2: f64) -> &'static RodMaterial {
    ROD_MATERIALS
        .iter()
        .filter(|m| LIGHTENING_FACTOR * m.re_mpa * section_mm2 >= force_n)
        .min_by(|a, b| a.density.total_cmp(&b.density))
        .unwrap_or(&ROD_MATERIALS[0])
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectingRodInput {
    pub bore_mm: f64,
    pub throw_mm: f64,
    pub force_n: f64,
    /// Centre distance between the eyes (mm)
    pub length_mm: f64,
    pub piston_eye_mm: f64,
    pub crank_eye_mm: f64,
    pub tolerance_pct: f64,
}

impl ConnectingRodInput {
    pub fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::number("d_cyl", "Diamètre cylindre (mm)", ""),
            FieldSpec::number("rayon_manivelle", "Rayon excentrique vilebrequin (mm)", ""),
            FieldSpec::number("f_max", "Effort max transmis (N)", ""),
            FieldSpec::number("longueur", "Longueur totale bielle (mm)", ""),
            FieldSpec::number("d_oeil_piston", "Diamètre œil côté piston (mm)", ""),
            FieldSpec::number("d_oeil_maneton", "Diamètre œil côté maneton (mm)", ""),
            FieldSpec::number("tol", "Tolérance sécurité (%)", "20"),
        ]
    }

    pub fn prefill(values: &mut FieldValues, memo: &EngineMemo) {
        let d = memo.bore_mm;
        let r = memo.crank_radius_mm();
        values.set_number("d_cyl", d, 2);
        values.set_number("rayon_manivelle", r, 2);
        values.set_number("longueur", 3.0 * r, 1);
        values.set_number("d_oeil_piston", (0.35 * d).max(10.0), 1);
        values.set_number("d_oeil_maneton", (0.3 * d).max(8.0), 1);
        values.set_number("f_max", memo.piston_force_n(), 1);
    }

    pub fn from_values(values: &FieldValues, ctx: &Context) -> CalcResult<Self> {
        Ok(ConnectingRodInput {
            bore_mm: values.require_number("d_cyl")?,
            throw_mm: values.require_number("rayon_manivelle")?,
            force_n: values.require_number("f_max")?,
            length_mm: values.require_number("longueur")?,
            piston_eye_mm: values.require_number("d_oeil_piston")?,
            crank_eye_mm: values.require_number("d_oeil_maneton")?,
            tolerance_pct: values.number_or("tol", ctx.settings.tolerance_pct)?,
        })
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_positive("d_cyl", self.bore_mm)?;
        require_positive("rayon_manivelle", self.throw_mm)?;
        require_positive("longueur", self.length_mm)?;
        require_positive("d_oeil_piston", self.piston_eye_mm)?;
        require_positive("d_oeil_maneton", self.crank_eye_mm)?;
        if self.force_n < 0.0 {
            return Err(CalcError::invalid_input("f_max", self.force_n.to_string(), "La valeur ne peut pas être négative"));
        }
        if self.length_mm <= 2.0 * self.throw_mm {
            tracing::warn!(
                target: "cao_core::stirling",
                length_mm = self.length_mm,
                throw_mm = self.throw_mm,
                "connecting rod shorter than the crank stroke"
            );
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectingRodResult {
    pub input: ConnectingRodInput,
    pub section_mm2: f64,
    pub width_mm: f64,
    pub thickness_mm: f64,
    pub material: RodChoice,
    pub mass_g: f64,
}

/// Owned copy of the selected rod material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RodChoice {
    pub name: String,
    pub re_mpa: f64,
    pub density: f64,
}

impl From<&RodMaterial> for RodChoice {
    fn from(m: &RodMaterial) -> Self {
        RodChoice {
            name: m.name.to_string(),
            re_mpa: m.re_mpa,
            density: m.density,
        }
    }
}

impl ConnectingRodResult {
    /// Top view: both eyes joined by the shank.
    pub fn schematic(&self) -> Schematic {
        let l = self.input.length_mm;
        let t = self.thickness_mm.max(self.width_mm);
        let rp = self.input.piston_eye_mm / 2.0;
        let rc = self.input.crank_eye_mm / 2.0;
        let mut s = Schematic::new("Croquis technique bielle (vue de dessus)");
        s.rect(0.0, -t / 2.0, l, t, Some(Rgb::from_hex(0xaaaaaa)), Rgb::from_hex(0x555555));
        s.circle(0.0, 0.0, rp, Some(Rgb::from_hex(0xb6cef2)), Rgb::from_hex(0x334455));
        s.circle(l, 0.0, rc, Some(Rgb::from_hex(0xef767a)), Rgb::from_hex(0xaa3333));
        s.label(0.0, rp + 3.0, "Œil piston", Rgb::from_hex(0x334455));
        s.label(l / 2.0, -t / 2.0 - 4.0, "Corps bielle", Rgb::from_hex(0x555555));
        s.label(l, rc + 3.0, "Œil maneton", Rgb::from_hex(0xaa3333));
        s.label(l / 2.0, t / 2.0 + 3.0, format!("{:.1} mm", l), Rgb::BLACK);
        s
    }
}

pub fn calculate(input: &ConnectingRodInput) -> CalcResult<ConnectingRodResult> {
    input.validate()?;
    let tol = tolerance_fraction("tol", input.tolerance_pct)?;
    let section_mm2 = MACHINING_MARGIN * input.force_n / (LIGHTENING_FACTOR * REFERENCE_RE_MPA * (1.0 - tol));
    let width_mm = (0.22 * input.bore_mm).max(8.0);
    let thickness_mm = (section_mm2 / width_mm).max(4.0);
    let material = best_rod_material(input.force_n, section_mm2);
    let mass_g = width_mm * thickness_mm * input.length_mm * material.density * 1e-3;

    tracing::debug!(section_mm2, material = material.name, "connecting rod computed");

    Ok(ConnectingRodResult {
        input: input.clone(),
        section_mm2,
        width_mm,
        thickness_mm,
        material: material.into(),
        mass_g,
    })
}

impl fmt::Display for ConnectingRodResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let i = &self.input;
        writeln!(f, "PLAN TECHNIQUE DE BIELLE - Moteur Stirling")?;
        writeln!(f)?;
        writeln!(f, "- Longueur axe à axe : {:.2} mm", i.length_mm)?;
        writeln!(f, "- Largeur bielle : {:.2} mm", self.width_mm)?;
        writeln!(f, "- Épaisseur bielle : {:.2} mm", self.thickness_mm)?;
        writeln!(f, "- Section mini utile : {:.2} mm²", self.section_mm2)?;
        writeln!(f, "- Diamètre œil piston : {:.2} mm", i.piston_eye_mm)?;
        writeln!(f, "- Diamètre œil maneton : {:.2} mm", i.crank_eye_mm)?;
        writeln!(f, "- Rayon excentrique : {:.2} mm", i.throw_mm)?;
        writeln!(f, "- Tolérance sécurité : {:.0}%", i.tolerance_pct)?;
        writeln!(
            f,
            "- Matière optimale : {} (Re={} MPa, densité={} g/cm³)",
            self.material.name, self.material.re_mpa, self.material.density
        )?;
        writeln!(f, "- Rainures de graissage, rayons généreux aux transitions.")?;
        writeln!(f, "- Circlips ou bagues pour axe/œil, perçage à tolérance h7/g6.")?;
        writeln!(f)?;
        writeln!(f, "Masse estimée : {:.1} g", self.mass_g)?;
        writeln!(f, "Usinage : ajourage possible pour allègement, visserie M6 ou M8 (classe 8.8 mini).")?;
        write!(f, "Surface recommandée Ra ≤ 1,6 µm.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> ConnectingRodInput {
        ConnectingRodInput {
            bore_mm: 60.0,
            throw_mm: 20.0,
            force_n: 5000.0,
            length_mm: 60.0,
            piston_eye_mm: 21.0,
            crank_eye_mm: 18.0,
            tolerance_pct: 20.0,
        }
    }

    #[test]
    fn test_section() {
        let r = calculate(&input()).unwrap();
        // 1.6 · 5000 / (0.5 · 400 · 0.8) = 50 mm²
        assert!((r.section_mm2 - 50.0).abs() < 1e-9);
        assert!((r.width_mm - 13.2).abs() < 1e-9);
        assert!((r.thickness_mm - 50.0 / 13.2).abs() < 1e-9);
    }

    #[test]
    fn test_minimum_thickness() {
        let mut i = input();
        i.force_n = 100.0;
        assert_eq!(calculate(&i).unwrap().thickness_mm, 4.0);
    }

    #[test]
    fn test_best_material_is_lightest_that_holds() {
        // 0.5 · Re · 50 >= 5000 needs Re >= 200 MPa: every entry holds
        assert_eq!(best_rod_material(5000.0, 50.0).name, "Alu 7075-T6");
        // Re >= 600 MPa: 42CrMo4 and titanium, titanium is lighter
        assert_eq!(best_rod_material(15000.0, 50.0).name, "Titane Grade 5");
        // nothing holds: first entry
        assert_eq!(best_rod_material(1.0e6, 50.0).name, "Acier 42CrMo4");
    }

    #[test]
    fn test_mass() {
        let r = calculate(&input()).unwrap();
        let expected = 13.2 * (50.0 / 13.2) * 60.0 * 2.8e-3;
        assert!((r.mass_g - expected).abs() < 1e-9);
    }

    #[test]
    fn test_prefill_uses_stroke_for_throw() {
        let memo = crate::memo::sample();
        let mut values = FieldValues::from_specs(&ConnectingRodInput::fields());
        ConnectingRodInput::prefill(&mut values, &memo);
        assert_eq!(values.number("rayon_manivelle").unwrap(), Some(20.0));
        assert_eq!(values.number("longueur").unwrap(), Some(60.0));
        assert_eq!(values.number("d_oeil_piston").unwrap(), Some(21.0));
        assert_eq!(values.number("d_oeil_maneton").unwrap(), Some(18.0));
    }
}
