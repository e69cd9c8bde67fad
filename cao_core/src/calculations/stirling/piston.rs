//! # Disc Piston
//!
//! Dimensions of a disc ("galette") piston for a given bore, with seal
//! grooves, estimated mass and the service temperature of its material.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::Context;
use crate::errors::{require_positive, CalcResult};
use crate::forms::{FieldSpec, FieldValues};
use crate::memo::EngineMemo;
use crate::schematic::{Rgb, Schematic};

pub const DEFAULT_MATERIAL: &str = "Alu 2017A / 6082 / Graphite";
/// Seal groove width (mm)
pub const GROOVE_WIDTH_MM: f64 = 2.4;
/// Seal groove depth (mm)
pub const GROOVE_DEPTH_MM: f64 = 1.6;
/// Aluminium density (g/mm³)
const DENSITY_G_MM3: f64 = 2.8e-3;

/// Piston thickness for a bore (mm).
pub fn thickness_mm(bore_mm: f64) -> f64 {
    (0.16 * bore_mm).max(8.0)
}

/// Maximum service temperature (°C) deduced from the material name.
pub fn max_temperature_c(material: &str) -> f64 {
    let m = material.to_lowercase();
    if m.contains("graphite") {
        300.0
    } else if m.contains("alu") {
        200.0
    } else if m.contains("acier") {
        500.0
    } else {
        200.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PistonInput {
    pub bore_mm: f64,
    /// Useful cylinder height (mm)
    pub useful_height_mm: f64,
    pub seals: u32,
    pub hot_c: f64,
    pub material: String,
}

impl PistonInput {
    pub fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::number("d_cyl", "Diamètre du cylindre (mm)", ""),
            FieldSpec::number("h_cyl_utile", "Hauteur utile du cylindre (mm)", ""),
            FieldSpec::integer("nb_joints", "Nombre de joints", "2"),
            FieldSpec::number("t_chaude", "Température chaude max (°C)", "650"),
            FieldSpec::text("materiau_piston", "Matériau du piston", DEFAULT_MATERIAL),
        ]
    }

    /// Bore and hot temperature from the engine; the useful height leaves
    /// room for the stroke plus one piston thickness.
    pub fn prefill(values: &mut FieldValues, memo: &EngineMemo) {
        values.set_number("d_cyl", memo.bore_mm, 2);
        values.set_number("h_cyl_utile", memo.stroke_mm + thickness_mm(memo.bore_mm), 2);
        values.set_number("t_chaude", memo.hot_c, 0);
    }

    pub fn from_values(values: &FieldValues, _ctx: &Context) -> CalcResult<Self> {
        Ok(PistonInput {
            bore_mm: values.require_number("d_cyl")?,
            useful_height_mm: values.require_number("h_cyl_utile")?,
            seals: values.count_or("nb_joints", 2)?,
            hot_c: values.number_or("t_chaude", 650.0)?,
            material: values.text_or("materiau_piston", "Aluminium 2017A"),
        })
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_positive("d_cyl", self.bore_mm)?;
        require_positive("h_cyl_utile", self.useful_height_mm)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PistonResult {
    pub material: String,
    pub seals: u32,
    pub side_clearance_mm: f64,
    pub diameter_mm: f64,
    pub thickness_mm: f64,
    pub crown_mm: f64,
    pub mass_g: f64,
    pub max_temperature_c: f64,
    pub warnings: Vec<String>,
}

impl PistonResult {
    /// Half section through the seal grooves.
    pub fn schematic(&self) -> Schematic {
        let r = self.diameter_mm / 2.0;
        let h = self.thickness_mm;
        let mut s = Schematic::new("Piston galette - coupe");
        s.rect(-r, 0.0, self.diameter_mm, h, Some(Rgb::from_hex(0xf7d6c1)), Rgb::from_hex(0xa36b19));
        let pitch = h / (self.seals as f64 + 1.0);
        for i in 1..=self.seals {
            let y = i as f64 * pitch - GROOVE_WIDTH_MM / 2.0;
            for x in [-r, r - GROOVE_DEPTH_MM] {
                s.rect(x, y, GROOVE_DEPTH_MM, GROOVE_WIDTH_MM, Some(Rgb::from_hex(0xffffff)), Rgb::BLACK);
            }
        }
        s.dashed(vec![[0.0, -2.0], [0.0, h + 2.0]], Rgb::GREY, 1.0);
        s.label(0.0, h + 4.0, format!("Ø {:.2}", self.diameter_mm), Rgb::BLACK);
        s
    }
}

pub fn calculate(input: &PistonInput) -> CalcResult<PistonResult> {
    input.validate()?;
    let d = input.bore_mm;
    let side_clearance_mm = (0.03 * d).max(0.03);
    let diameter_mm = d - 2.0 * side_clearance_mm;
    let thickness = thickness_mm(d);
    let area = PI * (diameter_mm / 2.0).powi(2);
    let mass_g = area * thickness * DENSITY_G_MM3;
    let max_temp = max_temperature_c(&input.material);

    let mut warnings = Vec::new();
    if thickness > input.useful_height_mm {
        warnings.push(format!(
            "Piston plus haut ({:.2} mm) que la hauteur utile du cylindre ({:.2} mm).",
            thickness, input.useful_height_mm
        ));
    }
    if input.hot_c > max_temp {
        warnings.push(format!(
            "Température chaude {:.0} °C au-delà de la limite du matériau ({:.0} °C) : isoler le piston.",
            input.hot_c, max_temp
        ));
    }
    for w in &warnings {
        tracing::warn!(target: "cao_core::stirling", "{w}");
    }
    tracing::debug!(diameter_mm, thickness, mass_g, "piston computed");

    Ok(PistonResult {
        material: input.material.clone(),
        seals: input.seals,
        side_clearance_mm,
        diameter_mm,
        thickness_mm: thickness,
        crown_mm: 0.12 * d,
        mass_g,
        max_temperature_c: max_temp,
        warnings,
    })
}

impl fmt::Display for PistonResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PLAN TECHNIQUE : PISTON GALETTE STIRLING")?;
        writeln!(f, "--------------------------------------------------")?;
        writeln!(f, "1. Forme : Cylindre (galette), arêtes légèrement chanfreinées")?;
        writeln!(f, "2. Ø extérieur piston (Øp) : {:.2} mm (Tol. H8)", self.diameter_mm)?;
        writeln!(f, "3. Épaisseur totale piston : {:.2} mm", self.thickness_mm)?;
        writeln!(f, "4. Épaisseur fond (côté froid) : {:.2} mm", self.crown_mm)?;
        writeln!(f, "5. Nombre de joints : {}", self.seals)?;
        writeln!(
            f,
            "6. Rainure(s) joint : {} x (largeur {:.1} mm × profondeur {:.1} mm),",
            self.seals, GROOVE_WIDTH_MM, GROOVE_DEPTH_MM
        )?;
        writeln!(f, "     décalée(s) de 2 mm du bord, symétriques")?;
        writeln!(f, "7. Matière : {}", self.material)?;
        writeln!(
            f,
            "8. Jeu latéral avec cylindre : {:.2} mm (Haut. piston < hauteur utile cylindre)",
            self.side_clearance_mm
        )?;
        writeln!(f, "9. Surface : poli-miroir, rugosité Ra ≤ 0.4 µm")?;
        writeln!(f, "10. Masse estimée : {:.1} g", self.mass_g)?;
        writeln!(f, "11. Température max piston : {:.0} °C", self.max_temperature_c)?;
        writeln!(f)?;
        writeln!(f, "Pour la CAO :")?;
        writeln!(
            f,
            "   . Disque Ø {:.2} mm, extrusion {:.2} mm",
            self.diameter_mm, self.thickness_mm
        )?;
        writeln!(f, "   . Rainures pour joints sur le côté latéral")?;
        writeln!(f, "   . Chanfrein de 0.5 mm sur toutes les arêtes vives")?;
        write!(f, "Recommandé : contrôler le jeu piston/cylindre avant assemblage définitif.")?;
        for w in &self.warnings {
            writeln!(f)?;
            write!(f, "⚠ {w}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(bore: f64) -> PistonInput {
        PistonInput {
            bore_mm: bore,
            useful_height_mm: 60.0,
            seals: 2,
            hot_c: 150.0,
            material: DEFAULT_MATERIAL.to_string(),
        }
    }

    #[test]
    fn test_geometry() {
        let r = calculate(&input(60.0)).unwrap();
        assert!((r.side_clearance_mm - 1.8).abs() < 1e-9);
        assert!((r.diameter_mm - 56.4).abs() < 1e-9);
        assert!((r.thickness_mm - 9.6).abs() < 1e-9);
        assert!((r.crown_mm - 7.2).abs() < 1e-9);
        // π · 28.2² · 9.6 · 2.8e-3 = 67.15 g
        assert!((r.mass_g - 67.155).abs() < 0.01);
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn test_minimum_thickness() {
        assert_eq!(thickness_mm(20.0), 8.0);
    }

    #[test]
    fn test_max_temperature_by_material() {
        assert_eq!(max_temperature_c("Alu 2017A / 6082 / Graphite"), 300.0);
        assert_eq!(max_temperature_c("Aluminium 6082"), 200.0);
        assert_eq!(max_temperature_c("Acier C45"), 500.0);
        assert_eq!(max_temperature_c("PEEK"), 200.0);
    }

    #[test]
    fn test_warnings() {
        let mut i = input(60.0);
        i.useful_height_mm = 5.0;
        i.hot_c = 650.0;
        let r = calculate(&i).unwrap();
        assert_eq!(r.warnings.len(), 2);
    }

    #[test]
    fn test_prefill_from_memo() {
        let memo = crate::memo::sample();
        let mut values = FieldValues::from_specs(&PistonInput::fields());
        PistonInput::prefill(&mut values, &memo);
        assert_eq!(values.number("d_cyl").unwrap(), Some(60.0));
        assert_eq!(values.number("h_cyl_utile").unwrap(), Some(49.6));
        assert_eq!(values.number("t_chaude").unwrap(), Some(650.0));
    }
}
