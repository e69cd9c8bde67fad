//! # Stirling Engine Design
//!
//! The engine plan ([`engine`]) sizes a multi-cylinder engine from its power
//! and writes the [`EngineMemo`](crate::memo::EngineMemo). The detail pages
//! size each component and pre-fill their forms from that memo.
//!
//! - [`engine`] - multi-cylinder plan, input sanitisation, memo
//! - [`sizing`] - Carnot-based thermodynamic sizing
//! - [`piston`], [`cylinder`], [`crankshaft`], [`connecting_rod`],
//!   [`flywheel`], [`shaft`], [`base_plate`], [`fasteners`] - components

pub mod base_plate;
pub mod connecting_rod;
pub mod crankshaft;
pub mod cylinder;
pub mod engine;
pub mod fasteners;
pub mod flywheel;
pub mod piston;
pub mod shaft;
pub mod sizing;

use std::f64::consts::PI;

/// Minimum diameter (mm) of a solid round shaft carrying `torque_nm` in pure
/// torsion at admissible shear `tau_pa`: `d = (16·T / (π·τ))^(1/3)`.
pub fn torsion_diameter_mm(torque_nm: f64, tau_pa: f64) -> f64 {
    (16.0 * torque_nm.abs() / (PI * tau_pa)).cbrt() * 1000.0
}

/// Torque (N·m) delivered by `power_w` at `rpm`.
pub fn torque_from_power(power_w: f64, rpm: f64) -> f64 {
    power_w / (2.0 * PI * rpm / 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_torsion_diameter() {
        // 16 · 100 / (π · 60e6) = 8.488e-6 m³ -> 20.4 mm
        let d = torsion_diameter_mm(100.0, 60e6);
        assert!((d - 20.40).abs() < 0.01);
    }

    #[test]
    fn test_torque_from_power() {
        let c = torque_from_power(1000.0, 600.0);
        assert!((c - 15.915).abs() < 1e-3);
    }
}
