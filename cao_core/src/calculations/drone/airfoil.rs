//! # NACA 4-Digit Wing Profile
//!
//! Upper and lower surfaces of a NACA 4-digit profile scaled to a chord in
//! millimetres. The closed contour runs along the upper surface from the
//! leading edge to the trailing edge, then back along the lower surface.
//!
//! Half-thickness, with `t = thickness / chord` and `x` in `[0, 1]`:
//!
//! ```text
//! yt = 5t·(0.2969·√x − 0.1260·x − 0.3516·x² + 0.2843·x³ − 0.1015·x⁴)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use cao_core::calculations::drone::airfoil::{calculate, AirfoilInput};
//!
//! let profile = calculate(&AirfoilInput::new(1000.0, 120.0)).unwrap();
//! assert_eq!(profile.contour().len(), 400);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::Context;
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::forms::{FieldSpec, FieldValues};
use crate::schematic::{Rgb, Schematic};

/// Stations along the chord, both ends included
pub const STATIONS: usize = 200;
/// Rows in the text preview
pub const PREVIEW_ROWS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirfoilInput {
    pub chord_mm: f64,
    /// Maximum thickness (mm)
    pub thickness_mm: f64,
    /// Maximum camber (% of chord)
    pub camber_pct: f64,
    /// Position of maximum camber (% of chord)
    pub camber_pos_pct: f64,
}

impl AirfoilInput {
    /// Default 2 % camber at 40 % chord.
    pub fn new(chord_mm: f64, thickness_mm: f64) -> Self {
        AirfoilInput {
            chord_mm,
            thickness_mm,
            camber_pct: 2.0,
            camber_pos_pct: 40.0,
        }
    }

    pub fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::number("corde", "Longueur de la corde (mm)", ""),
            FieldSpec::number("epaisseur", "Épaisseur max (mm)", ""),
            FieldSpec::number("cambrure", "Cambrure max (%)", "2.0"),
            FieldSpec::number("pos_cambrure", "Position cambrure max (%)", "40"),
        ]
    }

    pub fn from_values(values: &FieldValues, _ctx: &Context) -> CalcResult<Self> {
        Ok(AirfoilInput {
            chord_mm: values.require_number("corde")?,
            thickness_mm: values.require_number("epaisseur")?,
            camber_pct: values.number_or("cambrure", 2.0)?,
            camber_pos_pct: values.number_or("pos_cambrure", 40.0)?,
        })
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_positive("corde", self.chord_mm)?;
        require_positive("epaisseur", self.thickness_mm)?;
        if self.camber_pct < 0.0 {
            return Err(CalcError::invalid_input("cambrure", self.camber_pct.to_string(), "La valeur ne peut pas être négative"));
        }
        if self.camber_pct > 0.0 && !(self.camber_pos_pct > 0.0 && self.camber_pos_pct < 100.0) {
            return Err(CalcError::invalid_input(
                "pos_cambrure",
                self.camber_pos_pct.to_string(),
                "La position de cambrure doit être strictement entre 0 et 100 %",
            ));
        }
        Ok(())
    }
}

/// Half-thickness distribution at `x ∈ [0, 1]`, relative to the chord.
pub fn half_thickness(t: f64, x: f64) -> f64 {
    5.0 * t * (0.2969 * x.sqrt() - 0.1260 * x - 0.3516 * x.powi(2) + 0.2843 * x.powi(3) - 0.1015 * x.powi(4))
}

/// Mean camber line height and slope at `x ∈ [0, 1]`, relative to the chord.
pub fn camber_line(m: f64, p: f64, x: f64) -> (f64, f64) {
    if m == 0.0 {
        return (0.0, 0.0);
    }
    if x < p {
        let yc = m / p.powi(2) * (2.0 * p * x - x.powi(2));
        let slope = 2.0 * m / p.powi(2) * (p - x);
        (yc, slope)
    } else {
        let yc = m / (1.0 - p).powi(2) * ((1.0 - 2.0 * p) + 2.0 * p * x - x.powi(2));
        let slope = 2.0 * m / (1.0 - p).powi(2) * (p - x);
        (yc, slope)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirfoilProfile {
    pub input: AirfoilInput,
    /// Upper surface, leading edge first (mm)
    pub upper: Vec<[f64; 2]>,
    /// Lower surface, leading edge first (mm)
    pub lower: Vec<[f64; 2]>,
}

impl AirfoilProfile {
    /// Closed contour: upper surface then the lower surface reversed.
    pub fn contour(&self) -> Vec<[f64; 2]> {
        self.upper
            .iter()
            .copied()
            .chain(self.lower.iter().rev().copied())
            .collect()
    }

    /// About ten evenly spaced contour points.
    pub fn preview(&self) -> Vec<[f64; 2]> {
        let contour = self.contour();
        let step = (contour.len() / PREVIEW_ROWS).max(1);
        contour.into_iter().step_by(step).collect()
    }

    pub fn schematic(&self) -> Schematic {
        let i = &self.input;
        let mut s = Schematic::new(format!(
            "Profil NACA - Corde={:.1}mm, Ép.={:.1}mm, Cambrure={:.1}%",
            i.chord_mm, i.thickness_mm, i.camber_pct
        ));
        s.line(self.upper.clone(), Rgb::from_hex(0x1f4fd8), 1.5);
        s.line(self.lower.clone(), Rgb::from_hex(0xd81f1f), 1.5);
        s.dashed(vec![[0.0, 0.0], [i.chord_mm, 0.0]], Rgb::GREY, 1.0);
        s
    }
}

pub fn calculate(input: &AirfoilInput) -> CalcResult<AirfoilProfile> {
    input.validate()?;
    let chord = input.chord_mm;
    let t = input.thickness_mm / chord;
    let m = input.camber_pct / 100.0;
    let p = input.camber_pos_pct / 100.0;

    let mut upper = Vec::with_capacity(STATIONS);
    let mut lower = Vec::with_capacity(STATIONS);
    for k in 0..STATIONS {
        let xr = k as f64 / (STATIONS - 1) as f64;
        let x = xr * chord;
        let yt = half_thickness(t, xr) * chord;
        let (yc, slope) = camber_line(m, p, xr);
        let yc = yc * chord;
        let theta = slope.atan();
        upper.push([x - yt * theta.sin(), yc + yt * theta.cos()]);
        lower.push([x + yt * theta.sin(), yc - yt * theta.cos()]);
    }
    tracing::debug!(chord, t, m, p, "airfoil generated");
    Ok(AirfoilProfile {
        input: input.clone(),
        upper,
        lower,
    })
}

impl fmt::Display for AirfoilProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let i = &self.input;
        writeln!(
            f,
            "Profil NACA - corde {:.1} mm, épaisseur {:.1} mm ({:.1} %), cambrure {:.1} % à {:.0} %",
            i.chord_mm,
            i.thickness_mm,
            i.thickness_mm / i.chord_mm * 100.0,
            i.camber_pct,
            i.camber_pos_pct
        )?;
        writeln!(f, "{} points (extrados puis intrados)", self.upper.len() + self.lower.len())?;
        writeln!(f)?;
        write!(f, "x (mm)\ty (mm)")?;
        for [x, y] in self.preview() {
            writeln!(f)?;
            write!(f, "{:.2}\t{:.2}", x, y)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_thickness_peak() {
        // NACA 00xx reaches its maximum thickness near 30 % chord
        let t = 0.12;
        let at_30 = 2.0 * half_thickness(t, 0.3);
        assert!((at_30 - t).abs() < 0.001);
        assert_eq!(half_thickness(t, 0.0), 0.0);
    }

    #[test]
    fn test_symmetric_when_uncambered() {
        let input = AirfoilInput {
            camber_pct: 0.0,
            ..AirfoilInput::new(500.0, 60.0)
        };
        let p = calculate(&input).unwrap();
        for (u, l) in p.upper.iter().zip(&p.lower) {
            assert_eq!(u[0], l[0]);
            assert!((u[1] + l[1]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_stations_span_the_chord() {
        let p = calculate(&AirfoilInput::new(1000.0, 120.0)).unwrap();
        assert_eq!(p.upper.len(), STATIONS);
        assert_eq!(p.upper[0], [0.0, 0.0]);
        assert!((p.upper[STATIONS - 1][0] - 1000.0).abs() < 1.0);
    }

    #[test]
    fn test_contour_order() {
        let p = calculate(&AirfoilInput::new(1000.0, 120.0)).unwrap();
        let c = p.contour();
        assert_eq!(c[0], p.upper[0]);
        assert_eq!(c[STATIONS], p.lower[STATIONS - 1]);
        assert_eq!(c[c.len() - 1], p.lower[0]);
        assert_eq!(p.preview().len(), 10);
    }

    #[test]
    fn test_cambered_upper_above_lower() {
        let p = calculate(&AirfoilInput::new(1000.0, 120.0)).unwrap();
        for (u, l) in p.upper.iter().zip(&p.lower).skip(1).take(STATIONS - 2) {
            assert!(u[1] > l[1]);
        }
    }

    #[test]
    fn test_camber_position_required() {
        let mut input = AirfoilInput::new(1000.0, 120.0);
        input.camber_pos_pct = 0.0;
        assert!(calculate(&input).is_err());
    }
}
