//! # Unit Types
//!
//! Type-safe wrappers for the SI units used across the calculators. They are
//! plain `f64` newtypes that serialize as bare numbers.
//!
//! Conventions:
//! - Length: millimetres (mm) for geometry, metres (m) inside formulas
//! - Force: newtons (N), kilonewtons (kN)
//! - Stress/pressure: megapascals (MPa), pascals (Pa), bar
//! - Torque: newton-metres (N·m)
//! - Rotation: revolutions per minute (rpm), hertz (Hz), rad/s
//! - Temperature: degrees Celsius (°C), kelvin (K)
//!
//! ## Example
//!
//! ```rust
//! use cao_core::units::{Bar, Celsius, Kelvin, Pascals, Rpm, Hertz};
//!
//! let hot: Kelvin = Celsius(650.0).into();
//! assert!((hot.0 - 923.15).abs() < 1e-9);
//!
//! let p: Pascals = Bar(10.0).into();
//! assert_eq!(p.0, 1.0e6);
//!
//! let f: Hertz = Rpm(600.0).into();
//! assert_eq!(f.0, 10.0);
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Length Units
// ============================================================================

/// Length in millimetres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Millimeters(pub f64);

/// Length in metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Meters(pub f64);

impl From<Millimeters> for Meters {
    fn from(mm: Millimeters) -> Self {
        Meters(mm.0 / 1000.0)
    }
}

impl From<Meters> for Millimeters {
    fn from(m: Meters) -> Self {
        Millimeters(m.0 * 1000.0)
    }
}

// ============================================================================
// Force and Mass Units
// ============================================================================

/// Force in newtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Newtons(pub f64);

/// Force in kilonewtons
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KiloNewtons(pub f64);

impl From<Newtons> for KiloNewtons {
    fn from(n: Newtons) -> Self {
        KiloNewtons(n.0 / 1000.0)
    }
}

impl From<KiloNewtons> for Newtons {
    fn from(kn: KiloNewtons) -> Self {
        Newtons(kn.0 * 1000.0)
    }
}

/// Mass in kilograms
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilograms(pub f64);

impl Kilograms {
    /// Weight under gravity `g` (m/s²)
    pub fn weight(self, g: f64) -> Newtons {
        Newtons(self.0 * g)
    }
}

// ============================================================================
// Stress and Pressure Units
// ============================================================================

/// Stress or pressure in pascals
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pascals(pub f64);

/// Stress in megapascals (N/mm²)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MegaPascals(pub f64);

/// Pressure in bar
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bar(pub f64);

impl From<MegaPascals> for Pascals {
    fn from(mpa: MegaPascals) -> Self {
        Pascals(mpa.0 * 1.0e6)
    }
}

impl From<Pascals> for MegaPascals {
    fn from(pa: Pascals) -> Self {
        MegaPascals(pa.0 / 1.0e6)
    }
}

impl From<Bar> for Pascals {
    fn from(bar: Bar) -> Self {
        Pascals(bar.0 * 1.0e5)
    }
}

impl From<Bar> for MegaPascals {
    fn from(bar: Bar) -> Self {
        MegaPascals(bar.0 / 10.0)
    }
}

// ============================================================================
// Torque and Power Units
// ============================================================================

/// Torque in newton-metres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NewtonMeters(pub f64);

/// Power in watts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watts(pub f64);

// ============================================================================
// Rotation Units
// ============================================================================

/// Rotational speed in revolutions per minute
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rpm(pub f64);

/// Frequency in hertz (revolutions per second)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hertz(pub f64);

/// Angular speed in radians per second
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RadPerSec(pub f64);

impl From<Rpm> for Hertz {
    fn from(rpm: Rpm) -> Self {
        Hertz(rpm.0 / 60.0)
    }
}

impl From<Hertz> for Rpm {
    fn from(hz: Hertz) -> Self {
        Rpm(hz.0 * 60.0)
    }
}

impl From<Rpm> for RadPerSec {
    fn from(rpm: Rpm) -> Self {
        RadPerSec(2.0 * PI * rpm.0 / 60.0)
    }
}

impl From<Hertz> for RadPerSec {
    fn from(hz: Hertz) -> Self {
        RadPerSec(2.0 * PI * hz.0)
    }
}

// ============================================================================
// Temperature Units
// ============================================================================

/// Temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Celsius(pub f64);

/// Absolute temperature in kelvin
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kelvin(pub f64);

impl From<Celsius> for Kelvin {
    fn from(c: Celsius) -> Self {
        Kelvin(c.0 + 273.15)
    }
}

impl From<Kelvin> for Celsius {
    fn from(k: Kelvin) -> Self {
        Celsius(k.0 - 273.15)
    }
}

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Millimeters);
impl_arithmetic!(Meters);
impl_arithmetic!(Newtons);
impl_arithmetic!(KiloNewtons);
impl_arithmetic!(Kilograms);
impl_arithmetic!(Pascals);
impl_arithmetic!(MegaPascals);
impl_arithmetic!(Bar);
impl_arithmetic!(NewtonMeters);
impl_arithmetic!(Watts);
impl_arithmetic!(Rpm);
impl_arithmetic!(Hertz);
impl_arithmetic!(RadPerSec);
impl_arithmetic!(Kelvin);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_to_m() {
        let m: Meters = Millimeters(1500.0).into();
        assert_eq!(m.0, 1.5);
    }

    #[test]
    fn test_celsius_kelvin_roundtrip() {
        let k: Kelvin = Celsius(40.0).into();
        let c: Celsius = k.into();
        assert!((c.0 - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_rpm_to_rad_per_sec() {
        let w: RadPerSec = Rpm(60.0).into();
        assert!((w.0 - 2.0 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_weight() {
        let w = Kilograms(2.0).weight(9.81);
        let kn: KiloNewtons = w.into();
        assert!((kn.0 - 0.01962).abs() < 1e-12);
    }

    #[test]
    fn test_arithmetic() {
        let a = Millimeters(10.0);
        let b = Millimeters(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 2.0).0, 20.0);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let p = Bar(12.5);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "12.5");

        let roundtrip: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(p, roundtrip);
    }
}
