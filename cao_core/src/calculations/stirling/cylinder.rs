//! # Cylinder
//!
//! Wall, mass and machining plan of a Stirling cylinder liner.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::piston;
use crate::calculations::Context;
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::forms::{FieldSpec, FieldValues};
use crate::memo::EngineMemo;
use crate::schematic::{Anchor, Rgb, Schematic};

pub const DEFAULT_MATERIAL: &str = "Inox 304L";
/// Recommended minimum wall (mm)
pub const MIN_WALL_MM: f64 = 4.0;
/// Temperature above which a refractory stainless steel is needed (°C)
pub const REFRACTORY_ABOVE_C: f64 = 400.0;
/// Stainless steel density (g/mm³)
const DENSITY_G_MM3: f64 = 8.0e-3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CylinderInput {
    pub bore_mm: f64,
    pub useful_height_mm: f64,
    pub wall_mm: f64,
    pub max_temperature_c: f64,
    /// Bore tolerance (µm)
    pub tolerance_um: f64,
    pub material: String,
}

impl CylinderInput {
    pub fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::number("d_cyl", "Diamètre intérieur (mm)", ""),
            FieldSpec::number("h_utile", "Hauteur utile (mm)", ""),
            FieldSpec::number("ep_cyl", "Épaisseur cylindre (mm)", "4"),
            FieldSpec::number("t_chaude", "Température max (°C)", ""),
            FieldSpec::number("tol_um", "Tolérance (µm)", "40"),
            FieldSpec::text("materiau", "Matériau", DEFAULT_MATERIAL),
        ]
    }

    pub fn prefill(values: &mut FieldValues, memo: &EngineMemo) {
        values.set_number("d_cyl", memo.bore_mm, 2);
        values.set_number("h_utile", memo.stroke_mm + piston::thickness_mm(memo.bore_mm), 2);
        values.set_number("t_chaude", memo.hot_c, 0);
    }

    pub fn from_values(values: &FieldValues, _ctx: &Context) -> CalcResult<Self> {
        Ok(CylinderInput {
            bore_mm: values.require_number("d_cyl")?,
            useful_height_mm: values.require_number("h_utile")?,
            wall_mm: values.require_number("ep_cyl")?,
            max_temperature_c: values.require_number("t_chaude")?,
            tolerance_um: values.require_number("tol_um")?,
            material: values.text_or("materiau", DEFAULT_MATERIAL),
        })
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_positive("d_cyl", self.bore_mm)?;
        require_positive("h_utile", self.useful_height_mm)?;
        require_positive("ep_cyl", self.wall_mm)?;
        if self.tolerance_um < 0.0 {
            return Err(CalcError::invalid_input("tol_um", self.tolerance_um.to_string(), "La valeur ne peut pas être négative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CylinderResult {
    pub input: CylinderInput,
    pub outer_diameter_mm: f64,
    pub piston_clearance_mm: f64,
    pub mass_g: f64,
    pub warnings: Vec<String>,
}

impl CylinderResult {
    /// Longitudinal section: two walls around the bore.
    pub fn schematic(&self) -> Schematic {
        let d = self.input.bore_mm;
        let ep = self.input.wall_mm;
        let h = self.input.useful_height_mm;
        let wall = Some(Rgb::GREY);
        let mut s = Schematic::new("Croquis industriel du cylindre - coupe longitudinale");
        s.rect(0.0, 0.0, ep, h, wall, Rgb::GREY);
        s.rect(ep, 0.0, d, h, Some(Rgb::from_hex(0x8ecae6)), Rgb::from_hex(0x8ecae6));
        s.rect(ep + d, 0.0, ep, h, wall, Rgb::GREY);
        s.label(ep + d / 2.0, h + 2.0, format!("Ø int. {:.1} mm", d), Rgb::from_hex(0x1976d2));
        s.label(
            self.outer_diameter_mm / 2.0,
            h + 7.0,
            format!("Ø ext. {:.1} mm", self.outer_diameter_mm),
            Rgb::from_hex(0x222222),
        );
        s.label(ep / 2.0, h / 2.0, format!("Ép. {:.1} mm", ep), Rgb::from_hex(0x333333));
        s.label_at(
            self.outer_diameter_mm + 2.0,
            h / 2.0,
            format!("Hauteur {:.1} mm", h),
            Rgb::from_hex(0x333333),
            Anchor::Start,
        );
        s
    }
}

pub fn calculate(input: &CylinderInput) -> CalcResult<CylinderResult> {
    input.validate()?;
    let d = input.bore_mm;
    let d_ext = d + 2.0 * input.wall_mm;
    let volume = PI * ((d_ext / 2.0).powi(2) - (d / 2.0).powi(2)) * input.useful_height_mm;

    let mut warnings = Vec::new();
    if input.wall_mm < MIN_WALL_MM {
        warnings.push(format!("Épaisseur {:.2} mm inférieure au minimum recommandé de 4 mm.", input.wall_mm));
    }
    if input.max_temperature_c > REFRACTORY_ABOVE_C {
        warnings.push("Utiliser un inox réfractaire au-delà de 400 °C.".to_string());
    }
    for w in &warnings {
        tracing::warn!(target: "cao_core::stirling", "{w}");
    }
    tracing::debug!(d_ext, "cylinder computed");

    Ok(CylinderResult {
        input: input.clone(),
        outer_diameter_mm: d_ext,
        piston_clearance_mm: 0.02 * d,
        mass_g: volume * DENSITY_G_MM3,
        warnings,
    })
}

impl fmt::Display for CylinderResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let i = &self.input;
        writeln!(f, "PLAN TECHNIQUE : CYLINDRE STIRLING")?;
        writeln!(f, "---------------------------------------------------")?;
        writeln!(f, "1. Ø intérieur (alésage) : {:.2} mm (tolérance -0/+{:.1} µm)", i.bore_mm, i.tolerance_um)?;
        writeln!(f, "2. Ø extérieur : {:.2} mm", self.outer_diameter_mm)?;
        writeln!(f, "3. Épaisseur : {:.2} mm (min 4 mm recommandé)", i.wall_mm)?;
        writeln!(f, "4. Hauteur utile : {:.2} mm", i.useful_height_mm)?;
        writeln!(f, "5. Température max service : {:.1} °C", i.max_temperature_c)?;
        writeln!(f, "6. Jeu piston/cylindre : {:.2} mm", self.piston_clearance_mm)?;
        writeln!(f, "7. Rugosité intérieure : Ra ≤ 0.4 µm")?;
        writeln!(f, "8. Masse cylindre estimée : {:.1} g", self.mass_g)?;
        writeln!(f, "9. Matériau recommandé : {}", i.material)?;
        writeln!(f)?;
        writeln!(f, "Usinage : alésage, honage final, polissage intérieur.")?;
        writeln!(f, "- Extrusion sur {:.2} mm, Ø intérieur {:.2} mm.", i.useful_height_mm, i.bore_mm)?;
        writeln!(f, "- Appliquer la tolérance (-0/+{:.1} µm) sur l'alésage.", i.tolerance_um)?;
        write!(f, "- Prévoir rainure(s) pour joints toriques si besoin.")?;
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

    fn input() -> CylinderInput {
        CylinderInput {
            bore_mm: 60.0,
            useful_height_mm: 50.0,
            wall_mm: 4.0,
            max_temperature_c: 350.0,
            tolerance_um: 40.0,
            material: DEFAULT_MATERIAL.to_string(),
        }
    }

    #[test]
    fn test_dimensions_and_mass() {
        let r = calculate(&input()).unwrap();
        assert_eq!(r.outer_diameter_mm, 68.0);
        assert!((r.piston_clearance_mm - 1.2).abs() < 1e-9);
        // π · (34² - 30²) · 50 · 8e-3 = 321.7 g
        assert!((r.mass_g - 321.70).abs() < 0.01);
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn test_thin_wall_and_hot_warnings() {
        let mut i = input();
        i.wall_mm = 3.0;
        i.max_temperature_c = 650.0;
        let r = calculate(&i).unwrap();
        assert_eq!(r.warnings.len(), 2);
        assert!(r.to_string().contains("réfractaire"));
    }

    #[test]
    fn test_schematic_walls() {
        let r = calculate(&input()).unwrap();
        let b = r.schematic().bounds().unwrap();
        assert!(b.max_x >= r.outer_diameter_mm);
    }

    #[test]
    fn test_missing_height() {
        let ctx_settings = crate::session::Settings::default();
        let ctx = Context::new(&ctx_settings, None);
        let mut values = FieldValues::from_specs(&CylinderInput::fields());
        values.set("d_cyl", "60");
        values.set("t_chaude", "650");
        let err = CylinderInput::from_values(&values, &ctx).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }
}
