//! # Crankshaft
//!
//! Crankpin and journal diameters of a multi-cylinder crankshaft sized in
//! torsion on the total torque, with the widths of one throw.
//!
//! `τadm = 0.6·(1 - tol)·Re`, crankpin `d = max((16·T/(π·τ))^(1/3), 12 mm)`,
//! journals `1.15·d`.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{torque_from_power, torsion_diameter_mm};
use crate::calculations::Context;
use crate::errors::{require_positive, tolerance_fraction, CalcError, CalcResult};
use crate::forms::{FieldSpec, FieldValues};
use crate::materials;
use crate::memo::EngineMemo;
use crate::schematic::{Rgb, Schematic};
use crate::units::{RadPerSec, Rpm};

/// Smallest crankpin diameter (mm)
pub const MIN_CRANKPIN_MM: f64 = 12.0;
/// Journal over crankpin diameter
pub const JOURNAL_RATIO: f64 = 1.15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrankshaftInput {
    pub cylinders: u32,
    pub power_w: Option<f64>,
    /// Torque per cylinder (N·m)
    pub torque_nm: Option<f64>,
    pub rpm: f64,
    /// Length between bearings (mm)
    pub length_mm: f64,
    /// Crank throw (mm)
    pub throw_mm: f64,
    /// Crankpin width b (mm)
    pub pin_width_mm: f64,
    pub tolerance_pct: f64,
    pub material: String,
}

impl CrankshaftInput {
    pub fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::integer("n_cyl", "Nombre de cylindres", "1"),
            FieldSpec::number("puissance", "Puissance transmise (W)", "1000"),
            FieldSpec::number("couple", "Couple transmis par cyl. (Nm)", ""),
            FieldSpec::number("vitesse", "Vitesse de rotation (tr/min)", "900"),
            FieldSpec::number("longueur", "Longueur entre paliers (mm)", "80"),
            FieldSpec::number("rayon_manivelle", "Rayon excentrique (mm)", "20"),
            FieldSpec::number("largeur_maneton", "Largeur maneton (mm)", "18"),
            FieldSpec::number("tol", "Tolérance sécurité (%)", "20"),
            FieldSpec::material("materiau", "Matériau", materials::DEFAULT_MATERIAL),
        ]
    }

    pub fn prefill(values: &mut FieldValues, memo: &EngineMemo) {
        values.set("n_cyl", memo.cylinders.to_string());
        values.set_number("puissance", memo.power_w, 0);
        values.set_number("couple", memo.torque_per_cylinder_nm(), 2);
        values.set_number("vitesse", memo.rpm, 0);
        values.set_number("longueur", (2.7 * memo.stroke_mm).max(80.0), 2);
        values.set_number("rayon_manivelle", memo.crank_radius_mm(), 2);
    }

    pub fn from_values(values: &FieldValues, ctx: &Context) -> CalcResult<Self> {
        Ok(CrankshaftInput {
            cylinders: values.count_or("n_cyl", 1)?,
            power_w: values.number("puissance")?,
            torque_nm: values.number("couple")?,
            rpm: values.number_or("vitesse", 900.0)?,
            length_mm: values.number_or("longueur", 80.0)?,
            throw_mm: values.number_or("rayon_manivelle", 20.0)?,
            pin_width_mm: values.number_or("largeur_maneton", 18.0)?,
            tolerance_pct: values.number_or("tol", ctx.settings.tolerance_pct)?,
            material: values.text_or("materiau", materials::DEFAULT_MATERIAL),
        })
    }

    pub fn validate(&self) -> CalcResult<()> {
        if self.cylinders == 0 {
            return Err(CalcError::invalid_input("n_cyl", "0", "Au moins un cylindre est nécessaire"));
        }
        require_positive("vitesse", self.rpm)?;
        require_positive("longueur", self.length_mm)?;
        require_positive("rayon_manivelle", self.throw_mm)?;
        require_positive("largeur_maneton", self.pin_width_mm)?;
        Ok(())
    }

    /// Torque per cylinder, given or derived from the power shared over the
    /// cylinders.
    pub fn torque_per_cylinder(&self) -> CalcResult<f64> {
        match (self.torque_nm, self.power_w) {
            (Some(c), _) => Ok(c),
            (None, Some(w)) => Ok(torque_from_power(w / self.cylinders as f64, self.rpm)),
            (None, None) => Err(CalcError::missing_field("couple")),
        }
    }
}

/// Widths along the shaft axis of one throw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrowWidths {
    pub journal_mm: f64,
    pub web_mm: f64,
    pub gap_mm: f64,
    pub pin_mm: f64,
}

impl ThrowWidths {
    pub fn from_pin_width(b: f64) -> Self {
        ThrowWidths {
            journal_mm: 0.9 * b,
            web_mm: 0.65 * b,
            gap_mm: 0.22 * b,
            pin_mm: b,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrankshaftResult {
    pub input: CrankshaftInput,
    pub torque_per_cylinder_nm: f64,
    pub total_torque_nm: f64,
    pub tau_adm_mpa: f64,
    pub crankpin_mm: f64,
    pub journal_mm: f64,
    pub widths: ThrowWidths,
    pub omega_rad_s: f64,
    pub radial_force_n: f64,
}

impl CrankshaftResult {
    /// Top view of one throw between two journals.
    pub fn schematic(&self) -> Schematic {
        let w = self.widths;
        let dp = self.journal_mm;
        let dm = self.crankpin_mm;
        let r = self.input.throw_mm;
        let x1 = w.journal_mm;
        let x2 = x1 + w.web_mm;
        let x3 = x2 + w.gap_mm;
        let x4 = x3 + w.pin_mm;
        let x5 = x4 + w.gap_mm;
        let x6 = x5 + w.web_mm;
        let x7 = x6 + w.journal_mm;
        let journal = Some(Rgb::from_hex(0xb6cef2));
        let web = Some(Rgb::from_hex(0xaaaaaa));
        let pin = Rgb::from_hex(0xef767a);

        let mut s = Schematic::new("Croquis industriel du vilebrequin - vue de dessus");
        s.rect(0.0, -dp / 2.0, w.journal_mm, dp, journal, Rgb::from_hex(0x334455));
        s.rect(x6, -dp / 2.0, w.journal_mm, dp, journal, Rgb::from_hex(0x334455));
        s.rect(x1, -dp / 2.0, w.web_mm, dp, web, Rgb::from_hex(0x555555));
        s.rect(x5, -dp / 2.0, w.web_mm, dp, web, Rgb::from_hex(0x555555));
        s.rect(x3, r - dm / 2.0, w.pin_mm, dm, Some(pin), Rgb::from_hex(0xaa3333));
        s.dashed(vec![[0.0, 0.0], [x7, 0.0]], Rgb::BLACK, 2.0);
        let pin_centre = x3 + w.pin_mm / 2.0;
        s.line(vec![[pin_centre, 0.0], [pin_centre, r]], Rgb::from_hex(0x222222), 2.0);
        s.label(x1 + w.web_mm / 2.0, dp / 2.0 + 3.0, "Bras de manivelle", Rgb::from_hex(0x555555));
        s.label(pin_centre, r + dm / 2.0 + 2.0, "Maneton (excentré)", Rgb::from_hex(0xaa3333));
        s.label(w.journal_mm / 2.0, -dp / 2.0 - 4.0, "Palier", Rgb::from_hex(0x334444));
        s.label(x6 + w.journal_mm / 2.0, -dp / 2.0 - 4.0, "Palier", Rgb::from_hex(0x334444));
        s
    }
}

pub fn calculate(input: &CrankshaftInput) -> CalcResult<CrankshaftResult> {
    input.validate()?;
    let tol = tolerance_fraction("tol", input.tolerance_pct)?;
    let mat = materials::lookup(&input.material)?;
    let torque = input.torque_per_cylinder()?;
    if input.torque_nm.is_none() {
        tracing::warn!(target: "cao_core::stirling", torque, "crankshaft torque derived from power");
    }

    let total = torque * input.cylinders as f64;
    let tau_adm_mpa = 0.6 * mat.admissible_mpa(tol);
    let crankpin = torsion_diameter_mm(total, tau_adm_mpa * 1.0e6).max(MIN_CRANKPIN_MM);
    let omega = RadPerSec::from(Rpm(input.rpm)).0;
    let radial_force_n = total.abs() * 1000.0 / input.throw_mm;

    tracing::debug!(total, crankpin, "crankshaft computed");

    Ok(CrankshaftResult {
        input: input.clone(),
        torque_per_cylinder_nm: torque,
        total_torque_nm: total,
        tau_adm_mpa,
        crankpin_mm: crankpin,
        journal_mm: JOURNAL_RATIO * crankpin,
        widths: ThrowWidths::from_pin_width(input.pin_width_mm),
        omega_rad_s: omega,
        radial_force_n,
    })
}

impl fmt::Display for CrankshaftResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let i = &self.input;
        let w = &self.widths;
        writeln!(f, "PLAN TECHNIQUE : VILEBREQUIN STIRLING MULTICYLINDRE")?;
        writeln!(f, "---------------------------------------------------")?;
        writeln!(f, "Nombre de cylindres : {}", i.cylinders)?;
        if let Some(p) = i.power_w {
            writeln!(f, "Puissance transmise totale : {:.1} W", p)?;
        }
        writeln!(f, "Couple transmis total : {:.2} Nm", self.total_torque_nm)?;
        writeln!(
            f,
            "Vitesse de rotation : {:.1} tr/min ({:.2} rad/s)",
            i.rpm, self.omega_rad_s
        )?;
        writeln!(f, "1. Longueur entre paliers (L) : {:.1} mm", i.length_mm)?;
        writeln!(f, "2. Diamètre maneton (Øm) : {:.2} mm (Tol. h7)", self.crankpin_mm)?;
        writeln!(f, "3. Largeur maneton : {:.1} mm", w.pin_mm)?;
        writeln!(f, "4. Diamètre paliers (Øp) : {:.2} mm (Tol. h7)", self.journal_mm)?;
        writeln!(f, "5. Largeur palier : {:.2} mm", w.journal_mm)?;
        writeln!(f, "6. Bras de manivelle : {:.2} mm chacun", w.web_mm)?;
        writeln!(f, "7. Rayon excentrique (manivelle) : {:.2} mm", i.throw_mm)?;
        writeln!(f, "8. Espace entre bras/maneton : {:.2} mm", w.gap_mm)?;
        writeln!(f, "9. Matériau recommandé : {}", i.material)?;
        writeln!(
            f,
            "10. Résistance admissible τ : {:.0} MPa (Sécurité {:.0}%)",
            self.tau_adm_mpa, i.tolerance_pct
        )?;
        writeln!(f, "11. Effort radial max : {:.2} N", self.radial_force_n)?;
        writeln!(f)?;
        writeln!(f, "Instructions CAO :")?;
        writeln!(f, "- Axe principal (Øp), extrusion sur toute la longueur.")?;
        writeln!(f, "- Maneton excentré (Øm, b) : centre à r = {:.2} mm de l'axe principal.", i.throw_mm)?;
        writeln!(f, "- Tolérance h7 pour montage sur roulements.")?;
        write!(f, "Vérifier l'équilibrage dynamique avant usinage.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CrankshaftInput {
        CrankshaftInput {
            cylinders: 4,
            power_w: None,
            torque_nm: Some(25.0),
            rpm: 900.0,
            length_mm: 100.0,
            throw_mm: 20.0,
            pin_width_mm: 18.0,
            tolerance_pct: 20.0,
            material: "Acier".to_string(),
        }
    }

    #[test]
    fn test_crankpin_diameter() {
        let r = calculate(&input()).unwrap();
        assert_eq!(r.total_torque_nm, 100.0);
        // τ = 0.6 · 0.8 · 235 = 112.8 MPa
        assert!((r.tau_adm_mpa - 112.8).abs() < 1e-9);
        // (16 · 100 / (π · 112.8e6))^(1/3) = 16.53 mm
        assert!((r.crankpin_mm - 16.53).abs() < 0.01);
        assert!((r.journal_mm - 1.15 * r.crankpin_mm).abs() < 1e-9);
        assert!((r.radial_force_n - 5000.0).abs() < 1e-9);
    }

    #[test]
    fn test_minimum_crankpin() {
        let mut i = input();
        i.torque_nm = Some(0.5);
        i.cylinders = 1;
        assert_eq!(calculate(&i).unwrap().crankpin_mm, MIN_CRANKPIN_MM);
    }

    #[test]
    fn test_torque_from_power() {
        let mut i = input();
        i.torque_nm = None;
        i.power_w = Some(4000.0);
        let r = calculate(&i).unwrap();
        let expected = 1000.0 / (2.0 * PI * 15.0);
        assert!((r.torque_per_cylinder_nm - expected).abs() < 1e-9);
    }

    #[test]
    fn test_missing_torque_and_power() {
        let mut i = input();
        i.torque_nm = None;
        assert!(calculate(&i).is_err());
    }

    #[test]
    fn test_widths() {
        let w = ThrowWidths::from_pin_width(20.0);
        assert_eq!((w.journal_mm, w.web_mm, w.gap_mm), (18.0, 13.0, 4.4));
    }

    #[test]
    fn test_unknown_material() {
        let mut i = input();
        i.material = "Unobtainium".to_string();
        assert_eq!(calculate(&i).unwrap_err().error_code(), "MATERIAL_NOT_FOUND");
    }

    #[test]
    fn test_prefill_from_memo() {
        let memo = crate::memo::sample();
        let mut values = FieldValues::from_specs(&CrankshaftInput::fields());
        CrankshaftInput::prefill(&mut values, &memo);
        assert_eq!(values.number("n_cyl").unwrap(), Some(8.0));
        assert_eq!(values.number("longueur").unwrap(), Some(108.0));
        assert_eq!(values.number("rayon_manivelle").unwrap(), Some(20.0));
    }
}
