//! # ISO Fits
//!
//! Clearance between a hole and a shaft tolerance class for nominal
//! diameters from 10 to 50 mm.
//!
//! ```rust
//! use cao_core::calculations::iso_fit::{calculate, FitClass, FitInput, HoleClass, ShaftClass};
//!
//! let r = calculate(&FitInput::new(20.0, HoleClass::H7, ShaftClass::G6)).unwrap();
//! assert_eq!(r.class, FitClass::Clearance);
//! assert!((r.clearance_min_mm - 0.004).abs() < 1e-12);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calculations::Context;
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::forms::{FieldSpec, FieldValues};

/// Diameter range covered by the deviation tables (mm)
pub const TABLE_RANGE_MM: (f64, f64) = (10.0, 50.0);

/// Lower and upper deviation (µm).
pub type Deviation = (i32, i32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HoleClass {
    H6,
    H7,
    H8,
}

impl HoleClass {
    pub const ALL: [HoleClass; 3] = [HoleClass::H7, HoleClass::H8, HoleClass::H6];

    pub fn deviation_um(self) -> Deviation {
        match self {
            HoleClass::H6 => (0, 13),
            HoleClass::H7 => (0, 21),
            HoleClass::H8 => (0, 33),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HoleClass::H6 => "H6",
            HoleClass::H7 => "H7",
            HoleClass::H8 => "H8",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShaftClass {
    G6,
    F7,
    K6,
    M6,
}

impl ShaftClass {
    pub const ALL: [ShaftClass; 4] = [ShaftClass::G6, ShaftClass::F7, ShaftClass::K6, ShaftClass::M6];

    pub fn deviation_um(self) -> Deviation {
        match self {
            ShaftClass::G6 => (-14, -4),
            ShaftClass::F7 => (-20, -6),
            ShaftClass::K6 => (2, 10),
            ShaftClass::M6 => (8, 20),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShaftClass::G6 => "g6",
            ShaftClass::F7 => "f7",
            ShaftClass::K6 => "k6",
            ShaftClass::M6 => "m6",
        }
    }
}

impl FromStr for HoleClass {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HoleClass::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| CalcError::invalid_input("alesage", s, "Classe d'alésage inconnue"))
    }
}

impl FromStr for ShaftClass {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShaftClass::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| CalcError::invalid_input("arbre", s, "Classe d'arbre inconnue"))
    }
}

impl fmt::Display for HoleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for ShaftClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of fit from the clearance interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FitClass {
    /// Maximum clearance negative
    Interference,
    /// Minimum clearance positive
    Clearance,
    Transition,
}

impl FitClass {
    /// Every interval lands in exactly one class.
    pub fn classify(clearance_min: f64, clearance_max: f64) -> Self {
        if clearance_max < 0.0 {
            FitClass::Interference
        } else if clearance_min > 0.0 {
            FitClass::Clearance
        } else {
            FitClass::Transition
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FitClass::Interference => "Serré",
            FitClass::Clearance => "Libre",
            FitClass::Transition => "Incertain / glissant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitInput {
    pub diameter_mm: f64,
    pub hole: HoleClass,
    pub shaft: ShaftClass,
}

impl FitInput {
    pub fn new(diameter_mm: f64, hole: HoleClass, shaft: ShaftClass) -> Self {
        FitInput { diameter_mm, hole, shaft }
    }

    pub fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::number("diametre", "Diamètre nominal (mm)", ""),
            FieldSpec::choice("alesage", "Classe alésage", "H7", &["H7", "H8", "H6"]),
            FieldSpec::choice("arbre", "Classe arbre", "g6", &["g6", "f7", "k6", "m6"]),
        ]
    }

    pub fn from_values(values: &FieldValues, _ctx: &Context) -> CalcResult<Self> {
        Ok(FitInput {
            diameter_mm: values.require_number("diametre")?,
            hole: values.text_or("alesage", "H7").parse()?,
            shaft: values.text_or("arbre", "g6").parse()?,
        })
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_positive("diametre", self.diameter_mm)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub input: FitInput,
    pub hole_mm: (f64, f64),
    pub shaft_mm: (f64, f64),
    pub clearance_min_mm: f64,
    pub clearance_max_mm: f64,
    pub class: FitClass,
    /// Diameter outside the tabulated range
    pub out_of_range: bool,
}

pub fn calculate(input: &FitInput) -> CalcResult<FitResult> {
    input.validate()?;
    let (h_lo, h_hi) = input.hole.deviation_um();
    let (s_lo, s_hi) = input.shaft.deviation_um();
    let clearance_min_mm = (h_lo - s_hi) as f64 / 1000.0;
    let clearance_max_mm = (h_hi - s_lo) as f64 / 1000.0;
    let d = input.diameter_mm;
    let out_of_range = d < TABLE_RANGE_MM.0 || d > TABLE_RANGE_MM.1;
    if out_of_range {
        tracing::warn!(diameter_mm = d, "deviation tables only cover 10 to 50 mm");
    }
    let class = FitClass::classify(clearance_min_mm, clearance_max_mm);
    tracing::debug!(hole = %input.hole, shaft = %input.shaft, ?class, "fit computed");
    Ok(FitResult {
        input: input.clone(),
        hole_mm: (d + h_lo as f64 / 1000.0, d + h_hi as f64 / 1000.0),
        shaft_mm: (d + s_lo as f64 / 1000.0, d + s_hi as f64 / 1000.0),
        clearance_min_mm,
        clearance_max_mm,
        class,
        out_of_range,
    })
}

impl fmt::Display for FitResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let i = &self.input;
        writeln!(f, "Ajustement Ø{:.2} {}/{}", i.diameter_mm, i.hole, i.shaft)?;
        writeln!(f)?;
        writeln!(f, "Alésage : {:.3} à {:.3} mm", self.hole_mm.0, self.hole_mm.1)?;
        writeln!(f, "Arbre : {:.3} à {:.3} mm", self.shaft_mm.0, self.shaft_mm.1)?;
        writeln!(f, "Jeu min : {:.3} mm", self.clearance_min_mm)?;
        writeln!(f, "Jeu max : {:.3} mm", self.clearance_max_mm)?;
        write!(f, "Type d’ajustement : {}", self.class.label())?;
        if self.out_of_range {
            writeln!(f)?;
            write!(f, "Attention : tables valables de 10 à 50 mm seulement.")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_class_reachable() {
        let class = |h, s| calculate(&FitInput::new(25.0, h, s)).unwrap().class;
        assert_eq!(class(HoleClass::H7, ShaftClass::G6), FitClass::Clearance);
        assert_eq!(class(HoleClass::H7, ShaftClass::K6), FitClass::Transition);
        assert_eq!(class(HoleClass::H6, ShaftClass::M6), FitClass::Transition);
        assert_eq!(class(HoleClass::H7, ShaftClass::M6), FitClass::Transition);
    }

    #[test]
    fn test_classification_partition() {
        assert_eq!(FitClass::classify(-0.02, -0.001), FitClass::Interference);
        assert_eq!(FitClass::classify(0.001, 0.03), FitClass::Clearance);
        assert_eq!(FitClass::classify(0.0, 0.03), FitClass::Transition);
        assert_eq!(FitClass::classify(-0.01, 0.0), FitClass::Transition);
        // the same interval always lands in the same class
        for (lo, hi) in [(-0.02, -0.01), (-0.01, 0.01), (0.01, 0.02)] {
            assert_eq!(FitClass::classify(lo, hi), FitClass::classify(lo, hi));
        }
    }

    #[test]
    fn test_h8_f7_clearances() {
        let r = calculate(&FitInput::new(30.0, HoleClass::H8, ShaftClass::F7)).unwrap();
        assert!((r.clearance_min_mm - 0.006).abs() < 1e-12);
        assert!((r.clearance_max_mm - 0.053).abs() < 1e-12);
        assert!((r.shaft_mm.0 - 29.98).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_flagged() {
        let r = calculate(&FitInput::new(60.0, HoleClass::H7, ShaftClass::G6)).unwrap();
        assert!(r.out_of_range);
        assert!(r.to_string().contains("10 à 50 mm"));
    }

    #[test]
    fn test_unknown_class() {
        assert!("H9".parse::<HoleClass>().is_err());
        assert_eq!("k6".parse::<ShaftClass>().unwrap(), ShaftClass::K6);
    }
}
