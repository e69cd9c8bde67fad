//! # Drone Propulsion
//!
//! Hover power and battery sizing from the take-off mass and the target
//! endurance. The hover power assumes a thrust margin of 5 over the
//! weight and a propulsive efficiency of 0.7 on a 6S pack.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::Context;
use crate::errors::{require_positive, CalcResult};
use crate::forms::{FieldSpec, FieldValues};

/// Nominal 6S pack voltage (V)
pub const PACK_VOLTAGE: f64 = 22.2;
/// Power per newton of weight (W/N)
pub const POWER_FACTOR: f64 = 5.0;
pub const EFFICIENCY: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropulsionInput {
    pub mass_kg: f64,
    pub endurance_min: f64,
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
}

impl PropulsionInput {
    pub fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::number("masse", "Masse du drone (kg)", ""),
            FieldSpec::number("autonomie", "Autonomie souhaitée (min)", ""),
        ]
    }

    pub fn from_values(values: &FieldValues, ctx: &Context) -> CalcResult<Self> {
        Ok(PropulsionInput {
            mass_kg: values.require_number("masse")?,
            endurance_min: values.require_number("autonomie")?,
            gravity: ctx.settings.gravity,
        })
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_positive("masse", self.mass_kg)?;
        require_positive("autonomie", self.endurance_min)?;
        require_positive("gravite", self.gravity)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropulsionResult {
    pub input: PropulsionInput,
    pub power_w: f64,
    pub energy_wh: f64,
    pub capacity_ah: f64,
    /// Hover current draw (A)
    pub current_a: f64,
}

pub fn calculate(input: &PropulsionInput) -> CalcResult<PropulsionResult> {
    input.validate()?;
    let power_w = input.mass_kg * input.gravity * POWER_FACTOR / EFFICIENCY;
    let energy_wh = power_w * input.endurance_min / 60.0;
    let capacity_ah = energy_wh / PACK_VOLTAGE;
    let current_a = power_w / PACK_VOLTAGE;
    tracing::debug!(power_w, energy_wh, "propulsion sized");
    Ok(PropulsionResult {
        input: input.clone(),
        power_w,
        energy_wh,
        capacity_ah,
        current_a,
    })
}

impl fmt::Display for PropulsionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Propulsion drone - {:.2} kg, {:.0} min d'autonomie",
            self.input.mass_kg, self.input.endurance_min
        )?;
        writeln!(f)?;
        writeln!(f, "Puissance requise : {:.1} W", self.power_w)?;
        writeln!(f, "Énergie nécessaire : {:.1} Wh", self.energy_wh)?;
        writeln!(f, "Batterie 6S ({} V) : {:.2} Ah", PACK_VOLTAGE, self.capacity_ah)?;
        write!(f, "Courant en stationnaire : {:.1} A", self.current_a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Settings;

    #[test]
    fn test_two_kilo_twenty_minutes() {
        let r = calculate(&PropulsionInput {
            mass_kg: 2.0,
            endurance_min: 20.0,
            gravity: 9.81,
        })
        .unwrap();
        // 2 · 9.81 · 5 / 0.7
        assert!((r.power_w - 140.142857).abs() < 1e-5);
        assert!((r.energy_wh - 46.714286).abs() < 1e-5);
        assert!((r.capacity_ah - 2.104247).abs() < 1e-5);
        assert!((r.current_a - 6.312741).abs() < 1e-5);
    }

    #[test]
    fn test_gravity_from_settings() {
        let settings = Settings {
            gravity: 1.62,
            ..Settings::default()
        };
        let mut values = FieldValues::from_specs(&PropulsionInput::fields());
        values.set("masse", "1");
        values.set("autonomie", "10");
        let input = PropulsionInput::from_values(&values, &Context::new(&settings, None)).unwrap();
        assert_eq!(input.gravity, 1.62);
    }

    #[test]
    fn test_missing_mass() {
        let settings = Settings::default();
        let values = FieldValues::from_specs(&PropulsionInput::fields());
        let err = PropulsionInput::from_values(&values, &Context::new(&settings, None)).unwrap_err();
        assert_eq!(err.error_code(), "MISSING_FIELD");
    }
}
