//! # RDM (Strength of Materials)
//!
//! Quick checks for a straight member: traction, bending, torsion and Euler
//! buckling, plus the section needed to carry a force with a safety margin.
//!
//! Missing inputs are deduced in a fixed order:
//!
//! 1. force absent or zero and mass present: `F = m·g`
//! 2. section absent or zero and force present: `A = F / ((1 - tol)·Re)`
//! 3. force absent or zero and section present: `F = A·(1 - tol)·Re`
//!
//! Units: mm, mm², mm⁴, N, N·m, MPa (= N/mm²).
//!
//! ## Example
//!
//! ```rust
//! use cao_core::calculations::rdm::{calculate, RdmInput};
//!
//! let input = RdmInput {
//!     force_n: Some(9400.0),
//!     ..RdmInput::default()
//! };
//! let result = calculate(&input).unwrap();
//! // Acier, Re = 235 MPa, tolerance 20 %: A = 9400 / 188 = 50 mm²
//! assert!((result.section_mm2 - 50.0).abs() < 1e-9);
//! assert_eq!(result.best.unwrap().name, "Titane");
//! ```

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::Context;
use crate::errors::{require_positive, tolerance_fraction, CalcError, CalcResult};
use crate::forms::{FieldSpec, FieldValues};
use crate::materials::{self, MATERIALS};
use crate::units::{KiloNewtons, Kilograms, Newtons};

/// Default member length when none is given (mm)
pub const DEFAULT_LENGTH_MM: f64 = 1000.0;
/// Default second moment of area when none is given (mm⁴)
pub const DEFAULT_INERTIA_MM4: f64 = 1.0e8;
/// Section used when neither section nor force is known (mm²)
pub const DEFAULT_SECTION_MM2: f64 = 1.0;

/// Result of the mass converter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForceConversion {
    pub mass_kg: f64,
    pub newtons: f64,
    pub kilonewtons: f64,
}

impl fmt::Display for ForceConversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} N | {:.3} kN", self.newtons, self.kilonewtons)
    }
}

/// Convert a mass to its weight under gravity `g`.
///
/// ```rust
/// use cao_core::calculations::rdm::mass_to_force;
///
/// let c = mass_to_force(10.0, 9.81).unwrap();
/// assert_eq!(c.to_string(), "98.10 N | 0.098 kN");
/// ```
pub fn mass_to_force(mass_kg: f64, g: f64) -> CalcResult<ForceConversion> {
    if !mass_kg.is_finite() || mass_kg < 0.0 {
        return Err(CalcError::invalid_input("masse", mass_kg.to_string(), "La masse ne peut pas être négative"));
    }
    require_positive("g", g)?;
    let newtons = Kilograms(mass_kg).weight(g);
    let kilonewtons: KiloNewtons = newtons.into();
    Ok(ForceConversion {
        mass_kg,
        newtons: newtons.0,
        kilonewtons: kilonewtons.0,
    })
}

/// Input parameters for a member check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RdmInput {
    /// Material name from the property table
    pub material: String,
    /// Safety tolerance (%)
    pub tolerance_pct: f64,
    /// Mass carried (kg), used to deduce a missing force
    pub mass_kg: Option<f64>,
    /// Applied axial force (N)
    pub force_n: Option<f64>,
    /// Cross-section area (mm²)
    pub section_mm2: Option<f64>,
    /// Member length (mm)
    pub length_mm: Option<f64>,
    /// Bending moment (N·m)
    pub moment_nm: Option<f64>,
    /// Torque (N·m)
    pub torque_nm: Option<f64>,
    /// Second moment of area (mm⁴)
    pub inertia_mm4: Option<f64>,
    /// Distance from the neutral axis to the extreme fibre (mm), defaults to L/2
    pub fiber_mm: Option<f64>,
    /// Gravity (m/s²)
    pub gravity: f64,
}

impl Default for RdmInput {
    fn default() -> Self {
        RdmInput {
            material: materials::DEFAULT_MATERIAL.to_string(),
            tolerance_pct: 20.0,
            mass_kg: None,
            force_n: None,
            section_mm2: None,
            length_mm: None,
            moment_nm: None,
            torque_nm: None,
            inertia_mm4: None,
            fiber_mm: None,
            gravity: 9.81,
        }
    }
}

impl RdmInput {
    pub fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::material("materiau", "Matériau", materials::DEFAULT_MATERIAL),
            FieldSpec::number("tol", "Tolérance (%)", "20"),
            FieldSpec::number("masse", "Masse (kg)", ""),
            FieldSpec::number("section", "Section (mm²)", ""),
            FieldSpec::number("longueur", "Longueur (mm)", ""),
            FieldSpec::number("force", "Force appliquée (N)", ""),
            FieldSpec::number("moment", "Moment appliqué (Nm)", ""),
            FieldSpec::number("couple", "Couple appliqué (Nm)", ""),
            FieldSpec::number("inertie", "Module d’inertie (mm⁴)", ""),
            FieldSpec::number("fibre", "Distance fibre extrême (mm)", ""),
        ]
    }

    pub fn from_values(values: &FieldValues, ctx: &Context) -> CalcResult<Self> {
        Ok(RdmInput {
            material: values.text_or("materiau", materials::DEFAULT_MATERIAL),
            tolerance_pct: values.number_or("tol", ctx.settings.tolerance_pct)?,
            mass_kg: values.number("masse")?,
            force_n: values.number("force")?,
            section_mm2: values.number("section")?,
            length_mm: values.number("longueur")?,
            moment_nm: values.number("moment")?,
            torque_nm: values.number("couple")?,
            inertia_mm4: values.number("inertie")?,
            fiber_mm: values.number("fibre")?,
            gravity: ctx.settings.gravity,
        })
    }

    pub fn validate(&self) -> CalcResult<()> {
        let non_negative = [
            ("masse", self.mass_kg),
            ("force", self.force_n),
            ("section", self.section_mm2),
        ];
        for (field, value) in non_negative {
            if let Some(v) = value {
                if v < 0.0 {
                    return Err(CalcError::invalid_input(field, v.to_string(), "La valeur ne peut pas être négative"));
                }
            }
        }
        for (field, value) in [
            ("longueur", self.length_mm),
            ("inertie", self.inertia_mm4),
            ("fibre", self.fiber_mm),
        ] {
            if let Some(v) = value {
                require_positive(field, v)?;
            }
        }
        require_positive("g", self.gravity)?;
        Ok(())
    }
}

/// Lightest section among all table materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestMaterial {
    pub name: String,
    pub section_mm2: f64,
}

/// Results of a member check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RdmResult {
    pub material: String,
    pub tolerance_pct: f64,
    /// Human-readable log of deduced values
    pub deductions: Vec<String>,
    pub force_n: f64,
    pub section_mm2: f64,
    pub length_mm: f64,
    pub fiber_mm: f64,
    pub inertia_mm4: f64,
    /// σ = F/A (MPa)
    pub traction_mpa: f64,
    /// σ = M·c/I (MPa)
    pub bending_mpa: f64,
    /// τ = T·c/I (MPa)
    pub torsion_mpa: f64,
    /// Pcr = π²·E·I/L² (N)
    pub buckling_n: f64,
    pub re_mpa: f64,
    /// (1 - tol)·Re (MPa)
    pub admissible_mpa: f64,
    /// Section needed with the selected material (mm²)
    pub required_section_mm2: f64,
    pub best: Option<BestMaterial>,
}

impl RdmResult {
    /// Traction stress over admissible stress.
    pub fn utilisation(&self) -> f64 {
        if self.admissible_mpa > 0.0 {
            self.traction_mpa / self.admissible_mpa
        } else {
            f64::INFINITY
        }
    }
}

/// Section needed to carry `force_n` at `(1 - tol)·Re`.
pub fn required_section_mm2(force_n: f64, re_mpa: f64, tol: f64) -> f64 {
    force_n / ((1.0 - tol) * re_mpa)
}

fn absent_or_zero(v: Option<f64>) -> bool {
    v.map_or(true, |x| x == 0.0)
}

/// Run the member check.
pub fn calculate(input: &RdmInput) -> CalcResult<RdmResult> {
    input.validate()?;
    let tol = tolerance_fraction("tol", input.tolerance_pct)?;
    let mat = materials::lookup(&input.material)?;

    let mut deductions = Vec::new();
    let mut force = input.force_n;
    let mut section = input.section_mm2;

    if absent_or_zero(force) {
        if let Some(m) = input.mass_kg {
            let f = Kilograms(m).weight(input.gravity);
            force = Some(f.0);
            deductions.push(format!("Force déduite de la masse : {:.3} N", f.0));
        }
    }

    if absent_or_zero(section) {
        if let Some(f) = force.filter(|f| *f > 0.0) {
            let a = required_section_mm2(f, mat.re_mpa, tol);
            section = Some(a);
            deductions.push(format!("Section calculée à partir de la force : {:.1} mm²", a));
        }
    }

    if absent_or_zero(force) {
        if let Some(a) = section.filter(|a| *a > 0.0) {
            let f = Newtons(a * mat.admissible_mpa(tol));
            force = Some(f.0);
            deductions.push(format!("Force max admissible recalculée : {:.1} N", f.0));
        }
    }

    for line in &deductions {
        tracing::warn!(target: "cao_core::rdm", "{line}");
    }

    let force_n = force.unwrap_or(0.0);
    let section_mm2 = section.filter(|a| *a > 0.0).unwrap_or(DEFAULT_SECTION_MM2);
    let length_mm = input.length_mm.unwrap_or(DEFAULT_LENGTH_MM);
    let inertia_mm4 = input.inertia_mm4.unwrap_or(DEFAULT_INERTIA_MM4);
    let fiber_mm = input.fiber_mm.unwrap_or(length_mm / 2.0);
    let moment_nmm = input.moment_nm.unwrap_or(0.0) * 1000.0;
    let torque_nmm = input.torque_nm.unwrap_or(0.0) * 1000.0;

    let traction_mpa = force_n / section_mm2;
    let bending_mpa = moment_nmm * fiber_mm / inertia_mm4;
    let torsion_mpa = torque_nmm * fiber_mm / inertia_mm4;
    let buckling_n = PI.powi(2) * mat.e_mpa * inertia_mm4 / length_mm.powi(2);

    let best = if force_n > 0.0 {
        MATERIALS
            .iter()
            .filter(|m| m.re_mpa > 0.0)
            .map(|m| (m.name, required_section_mm2(force_n, m.re_mpa, tol)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(name, section_mm2)| BestMaterial {
                name: name.to_string(),
                section_mm2,
            })
    } else {
        None
    };

    tracing::debug!(
        material = mat.name,
        force_n,
        section_mm2,
        traction_mpa,
        "rdm check computed"
    );

    Ok(RdmResult {
        material: mat.name.to_string(),
        tolerance_pct: input.tolerance_pct,
        deductions,
        force_n,
        section_mm2,
        length_mm,
        fiber_mm,
        inertia_mm4,
        traction_mpa,
        bending_mpa,
        torsion_mpa,
        buckling_n,
        re_mpa: mat.re_mpa,
        admissible_mpa: mat.admissible_mpa(tol),
        required_section_mm2: required_section_mm2(force_n, mat.re_mpa, tol),
        best,
    })
}

impl fmt::Display for RdmResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.deductions.is_empty() {
            writeln!(f, "Données déduites automatiquement :")?;
            for line in &self.deductions {
                writeln!(f, "- {line}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "Contrainte de traction : {:.2} MPa", self.traction_mpa)?;
        writeln!(f, "Contrainte de flexion : {:.2} MPa", self.bending_mpa)?;
        writeln!(f, "Contrainte de torsion : {:.2} MPa", self.torsion_mpa)?;
        writeln!(f, "Charge critique de flambement : {:.2} N", self.buckling_n)?;
        writeln!(
            f,
            "Résistance limite du matériau : {:.2} MPa (admissible {:.2} MPa)",
            self.re_mpa, self.admissible_mpa
        )?;
        writeln!(f, "Taux de travail en traction : {:.0} %", self.utilisation() * 100.0)?;
        writeln!(f)?;
        write!(
            f,
            "Section requise avec {} : {:.1} mm² (tolérance {:.0}%)",
            self.material, self.required_section_mm2, self.tolerance_pct
        )?;
        if let Some(best) = &self.best {
            writeln!(f)?;
            writeln!(f)?;
            writeln!(f, "Meilleur matériau : {}", best.name)?;
            write!(f, "Section minimale requise : {:.2} mm²", best.section_mm2)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_mass_to_force() {
        let c = mass_to_force(2.0, 9.81).unwrap();
        assert!(close(c.newtons, 19.62, 1e-9));
        assert!(close(c.kilonewtons, 0.01962, 1e-12));
        assert_eq!(c.to_string(), "19.62 N | 0.020 kN");
        assert!(mass_to_force(-1.0, 9.81).is_err());
    }

    #[test]
    fn test_force_from_mass_then_section() {
        let input = RdmInput {
            mass_kg: Some(100.0),
            ..RdmInput::default()
        };
        let r = calculate(&input).unwrap();
        assert!(close(r.force_n, 981.0, 1e-9));
        // 981 / (0.8 · 235)
        assert!(close(r.section_mm2, 5.218, 1e-3));
        assert_eq!(r.deductions.len(), 2);
    }

    #[test]
    fn test_admissible_force_from_section() {
        let input = RdmInput {
            section_mm2: Some(100.0),
            ..RdmInput::default()
        };
        let r = calculate(&input).unwrap();
        assert!(close(r.force_n, 18800.0, 1e-6));
        assert!(r.deductions[0].starts_with("Force max admissible"));
        assert!(close(r.utilisation(), 1.0, 1e-12));
    }

    #[test]
    fn test_traction_linear_in_force() {
        let base = RdmInput {
            section_mm2: Some(50.0),
            force_n: Some(1000.0),
            ..RdmInput::default()
        };
        let doubled = RdmInput {
            force_n: Some(2000.0),
            ..base.clone()
        };
        let a = calculate(&base).unwrap();
        let b = calculate(&doubled).unwrap();
        assert!(close(a.traction_mpa, 20.0, 1e-12));
        assert!(close(b.traction_mpa, 2.0 * a.traction_mpa, 1e-12));
    }

    #[test]
    fn test_section_increases_with_tolerance() {
        let mut last = 0.0;
        for tol in [0.0, 10.0, 20.0, 50.0, 90.0] {
            let input = RdmInput {
                force_n: Some(5000.0),
                tolerance_pct: tol,
                ..RdmInput::default()
            };
            let r = calculate(&input).unwrap();
            assert!(r.required_section_mm2 > last);
            last = r.required_section_mm2;
        }
    }

    #[test]
    fn test_bending_torsion_buckling() {
        let input = RdmInput {
            force_n: Some(1000.0),
            section_mm2: Some(100.0),
            length_mm: Some(2000.0),
            moment_nm: Some(500.0),
            torque_nm: Some(100.0),
            inertia_mm4: Some(1.0e6),
            ..RdmInput::default()
        };
        let r = calculate(&input).unwrap();
        // c = L/2 = 1000 mm; σ = 500e3 · 1000 / 1e6 = 500 MPa
        assert!(close(r.bending_mpa, 500.0, 1e-9));
        assert!(close(r.torsion_mpa, 100.0, 1e-9));
        // π² · 210e3 · 1e6 / 2000² = 518 154 N
        assert!(close(r.buckling_n, 518_154.2, 1.0));
    }

    #[test]
    fn test_defaults_without_force() {
        let r = calculate(&RdmInput::default()).unwrap();
        assert_eq!(r.force_n, 0.0);
        assert_eq!(r.section_mm2, DEFAULT_SECTION_MM2);
        assert!(r.best.is_none());
        assert!(!r.to_string().contains("Meilleur matériau"));
    }

    #[test]
    fn test_errors() {
        let bad_tol = RdmInput {
            tolerance_pct: 100.0,
            ..RdmInput::default()
        };
        assert!(calculate(&bad_tol).is_err());

        let bad_mat = RdmInput {
            material: "Adamantium".to_string(),
            ..RdmInput::default()
        };
        let err = calculate(&bad_mat).unwrap_err();
        assert!(err.user_message().starts_with("Erreur : Matériau inconnu"));

        let negative = RdmInput {
            force_n: Some(-1.0),
            ..RdmInput::default()
        };
        assert!(calculate(&negative).is_err());
    }
}
