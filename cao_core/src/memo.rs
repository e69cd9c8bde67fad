//! # Engine Memo
//!
//! The last-computed Stirling engine parameters. Only the engine calculator
//! writes it; the detail pages (piston, cylinder, crankshaft, ...) and the
//! gearbox read it to pre-fill their forms.
//!
//! The memo is a plain value owned by the front end (or by the session file)
//! and passed by reference, never a global.

use serde::{Deserialize, Serialize};

/// Snapshot of a Stirling engine plan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineMemo {
    /// Total power (W)
    pub power_w: f64,
    /// Number of cylinders
    pub cylinders: u32,
    /// Service pressure (bar)
    pub pressure_bar: f64,
    /// Rotational speed (rpm)
    pub rpm: f64,
    /// Hot source temperature (°C)
    pub hot_c: f64,
    /// Cold sink temperature (°C)
    pub cold_c: f64,
    /// Cylinder bore (mm)
    pub bore_mm: f64,
    /// Piston stroke (mm)
    pub stroke_mm: f64,
    /// Power per cylinder (W)
    pub power_per_cylinder_w: f64,
    /// Minimum crankpin diameter (mm)
    pub crankpin_mm: f64,
}

impl EngineMemo {
    /// Nominal torque per cylinder (N·m) at the memo speed.
    pub fn torque_per_cylinder_nm(&self) -> f64 {
        let f = self.rpm / 60.0;
        if f > 0.0 {
            self.power_per_cylinder_w / (2.0 * std::f64::consts::PI * f)
        } else {
            0.0
        }
    }

    /// Crank throw, half the stroke (mm).
    pub fn crank_radius_mm(&self) -> f64 {
        self.stroke_mm / 2.0
    }

    /// Peak gas force on one piston (N).
    pub fn piston_force_n(&self) -> f64 {
        let area_m2 = std::f64::consts::PI / 4.0 * (self.bore_mm / 1000.0).powi(2);
        self.pressure_bar * 1.0e5 * area_m2
    }
}

#[cfg(test)]
pub(crate) fn sample() -> EngineMemo {
    EngineMemo {
        power_w: 15000.0,
        cylinders: 8,
        pressure_bar: 20.0,
        rpm: 1400.0,
        hot_c: 650.0,
        cold_c: 40.0,
        bore_mm: 60.0,
        stroke_mm: 40.0,
        power_per_cylinder_w: 1875.0,
        crankpin_mm: 6.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_torque_per_cylinder() {
        let memo = sample();
        // 1875 / (2π · 23.33) = 12.79 N·m
        assert!((memo.torque_per_cylinder_nm() - 12.79).abs() < 0.01);
    }

    #[test]
    fn test_piston_force() {
        let memo = sample();
        // 20e5 · π/4 · 0.06² = 5654.9 N
        assert!((memo.piston_force_n() - 5654.87).abs() < 0.1);
        assert_eq!(memo.crank_radius_mm(), 20.0);
    }

    #[test]
    fn test_serialization() {
        let memo = sample();
        let json = serde_json::to_string(&memo).unwrap();
        let roundtrip: EngineMemo = serde_json::from_str(&json).unwrap();
        assert_eq!(memo, roundtrip);
    }
}
