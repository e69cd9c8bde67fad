//! # Exports
//!
//! CSV for generated curves (airfoil contour, gearbox speeds, action circle)
//! and SVG for schematics. Both go through [`write_atomic`].

use std::fmt::Write as _;
use std::path::Path;

use crate::calculations::CurveHeader;
use crate::errors::CalcResult;
use crate::file_io::write_atomic;
use crate::schematic::Schematic;

/// Default SVG size (px)
pub const SVG_SIZE: (f64, f64) = (800.0, 600.0);

/// Most decimals a CSV cell carries; larger requests are clamped
pub const MAX_CSV_DECIMALS: usize = 12;

/// Two-column CSV with a header line and fixed decimals, at most
/// [`MAX_CSV_DECIMALS`].
///
/// ```rust
/// use cao_core::export::curve_to_csv;
///
/// let csv = curve_to_csv(("X (mm)", "Y (mm)"), &[[0.0, 0.0], [1.5, -0.25]], 4);
/// assert_eq!(csv, "X (mm),Y (mm)\n0.0000,0.0000\n1.5000,-0.2500\n");
/// ```
pub fn curve_to_csv(header: CurveHeader, points: &[[f64; 2]], decimals: usize) -> String {
    let decimals = decimals.min(MAX_CSV_DECIMALS);
    let mut out = String::with_capacity(16 * (points.len() + 1));
    let _ = writeln!(out, "{},{}", header.0, header.1);
    for [x, y] in points {
        let _ = writeln!(out, "{:.*},{:.*}", decimals, x, decimals, y);
    }
    out
}

pub fn write_csv(path: &Path, header: CurveHeader, points: &[[f64; 2]], decimals: usize) -> CalcResult<()> {
    write_atomic(path, &curve_to_csv(header, points, decimals))?;
    tracing::info!(path = %path.display(), rows = points.len(), "curve exported");
    Ok(())
}

pub fn write_svg(path: &Path, schematic: &Schematic) -> CalcResult<()> {
    write_atomic(path, &schematic.to_svg(SVG_SIZE.0, SVG_SIZE.1))?;
    tracing::info!(path = %path.display(), shapes = schematic.shapes.len(), "schematic exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::drone::airfoil::{calculate, AirfoilInput};

    #[test]
    fn test_airfoil_csv() {
        let profile = calculate(&AirfoilInput::new(1000.0, 120.0)).unwrap();
        let csv = curve_to_csv(("X (mm)", "Y (mm)"), &profile.contour(), 4);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "X (mm),Y (mm)");
        assert_eq!(lines.len(), 401);
        assert_eq!(lines[1], "0.0000,0.0000");
    }

    #[test]
    fn test_csv_decimals_are_clamped() {
        let csv = curve_to_csv(("a", "b"), &[[0.5, 2.0]], 70_000);
        assert_eq!(csv, "a,b\n0.500000000000,2.000000000000\n");
    }

    #[test]
    fn test_write_csv_file() {
        let path = std::env::temp_dir().join(format!("cao_export_{}.csv", std::process::id()));
        write_csv(&path, ("a", "b"), &[[1.0, 2.0]], 1).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a,b\n1.0,2.0\n");
        let _ = std::fs::remove_file(&path);
    }
}
