//! # Base Plate
//!
//! Mounting plate of the engine: mass, fixing screws and hole layout.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::Context;
use crate::errors::{require_positive, CalcResult};
use crate::forms::{FieldSpec, FieldValues};
use crate::schematic::{Rgb, Schematic};

pub const DEFAULT_MATERIAL: &str = "Alu 5083 ou Acier S235";
/// Hole inset from the plate edges (mm)
pub const HOLE_INSET_MM: f64 = 10.0;

/// Density (g/cm³): aluminium when the name mentions it, steel otherwise.
pub fn plate_density(material: &str) -> f64 {
    if material.to_lowercase().contains("alu") {
        2.7
    } else {
        7.85
    }
}

/// Hole centres: the four corners, then the centre for a fifth hole.
pub fn hole_positions(length_mm: f64, width_mm: f64, count: u32) -> Vec<[f64; 2]> {
    let i = HOLE_INSET_MM;
    let mut positions = vec![
        [i, i],
        [length_mm - i, i],
        [i, width_mm - i],
        [length_mm - i, width_mm - i],
    ];
    if count > 4 {
        positions.push([length_mm / 2.0, width_mm / 2.0]);
    }
    positions.truncate(count as usize);
    positions
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasePlateInput {
    pub width_mm: f64,
    pub length_mm: f64,
    pub thickness_mm: f64,
    pub holes: u32,
    pub hole_diameter_mm: f64,
    pub material: String,
}

impl BasePlateInput {
    pub fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::number("largeur", "Largeur emb. (mm)", "180"),
            FieldSpec::number("longueur", "Longueur emb. (mm)", "260"),
            FieldSpec::number("epaisseur", "Épaisseur plaque (mm)", "10"),
            FieldSpec::integer("nb_trous", "Nb trous fixation", "4"),
            FieldSpec::number("diam_trou", "Diamètre trous (mm)", "10"),
            FieldSpec::text("materiau", "Matériau", DEFAULT_MATERIAL),
        ]
    }

    pub fn from_values(values: &FieldValues, _ctx: &Context) -> CalcResult<Self> {
        Ok(BasePlateInput {
            width_mm: values.require_number("largeur")?,
            length_mm: values.require_number("longueur")?,
            thickness_mm: values.require_number("epaisseur")?,
            holes: values.count_or("nb_trous", 4)?,
            hole_diameter_mm: values.require_number("diam_trou")?,
            material: values.text_or("materiau", "Alu 5083"),
        })
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_positive("largeur", self.width_mm)?;
        require_positive("longueur", self.length_mm)?;
        require_positive("epaisseur", self.thickness_mm)?;
        require_positive("diam_trou", self.hole_diameter_mm)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasePlateResult {
    pub input: BasePlateInput,
    pub mass_kg: f64,
    pub screws: String,
    pub holes: Vec<[f64; 2]>,
}

impl BasePlateResult {
    /// Top view with the fixing holes.
    pub fn schematic(&self) -> Schematic {
        let i = &self.input;
        let mut s = Schematic::new("Croquis technique - Embase (vue de dessus)");
        s.rect(0.0, 0.0, i.length_mm, i.width_mm, Some(Rgb::from_hex(0xb6cef2)), Rgb::from_hex(0x334455));
        for [x, y] in &self.holes {
            s.circle(*x, *y, i.hole_diameter_mm / 2.0, Some(Rgb::from_hex(0xef767a)), Rgb::from_hex(0xaa3333));
        }
        s
    }
}

pub fn calculate(input: &BasePlateInput) -> CalcResult<BasePlateResult> {
    input.validate()?;
    let volume_mm3 = input.width_mm * input.length_mm * input.thickness_mm;
    let mass_kg = volume_mm3 * plate_density(&input.material) * 1e-3 / 1000.0;
    let screws = format!(
        "{}x Vis CHC M8x{} (classe 8.8) + rondelles larges Ø10, écrous Nylstop",
        input.holes,
        (input.thickness_mm * 1.2) as u32
    );
    let holes = hole_positions(input.length_mm, input.width_mm, input.holes);
    if (holes.len() as u32) < input.holes {
        tracing::warn!(
            target: "cao_core::stirling",
            requested = input.holes,
            placed = holes.len(),
            "only corner and centre holes are laid out"
        );
    }
    tracing::debug!(mass_kg, "base plate computed");
    Ok(BasePlateResult {
        input: input.clone(),
        mass_kg,
        screws,
        holes,
    })
}

impl fmt::Display for BasePlateResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let i = &self.input;
        writeln!(f, "Plan technique - Embase/support moteur Stirling")?;
        writeln!(f)?;
        writeln!(f, "- Dimensions extérieures : {:.0} x {:.0} mm", i.length_mm, i.width_mm)?;
        writeln!(f, "- Épaisseur plaque : {:.1} mm", i.thickness_mm)?;
        writeln!(
            f,
            "- {} trous Ø{:.1} mm, répartis aux angles et centre",
            i.holes, i.hole_diameter_mm
        )?;
        writeln!(f, "- Matériau : {}", i.material)?;
        writeln!(f, "- Masse estimée : {:.1} kg", self.mass_kg)?;
        writeln!(f, "- Visserie recommandée : {}", self.screws)?;
        writeln!(f, "- Tolérance générale : ±0,2 mm sur les cotes, trous H13")?;
        writeln!(f)?;
        write!(
            f,
            "Conseil : inserts filetés sur aluminium, lumières oblongues pour l'ajustage, longerons soudés au-delà de 1 kW."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> BasePlateInput {
        BasePlateInput {
            width_mm: 180.0,
            length_mm: 260.0,
            thickness_mm: 10.0,
            holes: 4,
            hole_diameter_mm: 10.0,
            material: DEFAULT_MATERIAL.to_string(),
        }
    }

    #[test]
    fn test_mass_by_material() {
        let r = calculate(&input()).unwrap();
        // 180 · 260 · 10 mm³ of aluminium = 1.2636 kg
        assert!((r.mass_kg - 1.2636).abs() < 1e-9);

        let mut steel = input();
        steel.material = "Acier S235".to_string();
        assert!((calculate(&steel).unwrap().mass_kg - 3.6738).abs() < 1e-9);
    }

    #[test]
    fn test_screws() {
        let r = calculate(&input()).unwrap();
        assert!(r.screws.starts_with("4x Vis CHC M8x12"));
    }

    #[test]
    fn test_hole_layout() {
        assert_eq!(hole_positions(260.0, 180.0, 4)[3], [250.0, 170.0]);
        let five = hole_positions(260.0, 180.0, 5);
        assert_eq!(five[4], [130.0, 90.0]);
        assert_eq!(hole_positions(260.0, 180.0, 2).len(), 2);
        assert_eq!(hole_positions(260.0, 180.0, 8).len(), 5);
    }
}
