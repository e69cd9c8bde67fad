//! # Stirling Engine Plan
//!
//! Sizes a multi-cylinder Stirling engine from its total power. Unrealistic
//! inputs are first clamped and snapped to values taken from recommendation
//! tables; every change is recorded as a [`Correction`].
//!
//! ## Sizing
//!
//! - swept volume per cylinder `V = P_cyl / (p·f·η)` with `η = 0.22`
//! - bore from `V` with a stroke/bore ratio of 0.85
//! - while the mean piston speed `2·s·f` exceeds 1.8 m/s the stroke is
//!   shortened by 4 % and the bore widened to keep `V` (at most 15 steps)
//!
//! ## Example
//!
//! ```rust
//! use cao_core::calculations::stirling::engine::{calculate, EngineInput};
//!
//! let plan = calculate(&EngineInput::default()).unwrap();
//! assert!(plan.piston_speed_m_s <= 1.8);
//! assert_eq!(plan.memo().cylinders, 8);
//! ```

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::torsion_diameter_mm;
use crate::calculations::Context;
use crate::errors::{require_positive, CalcResult};
use crate::forms::{FieldSpec, FieldValues};
use crate::memo::EngineMemo;
use crate::schematic::{Rgb, Schematic};
use crate::units::{Bar, Celsius, Hertz, Kelvin, Pascals, Rpm};

/// Global efficiency used for the swept volume
pub const EFFICIENCY: f64 = 0.22;
/// Mean piston speed limit (m/s)
pub const MAX_PISTON_SPEED: f64 = 1.8;
/// Initial stroke/bore ratio
pub const STROKE_BORE_RATIO: f64 = 0.85;
/// Stroke reduction factor per correction step
pub const STROKE_STEP: f64 = 0.96;
pub const MAX_STROKE_STEPS: usize = 15;
/// Connecting rod obliquity used for the crankpin force (degrees)
pub const ROD_ANGLE_DEG: f64 = 17.0;
/// Admissible shear stress of the crankpin (Pa)
pub const CRANKPIN_TAU_PA: f64 = 160e6;
/// Ideal gas constant (J/(mol·K))
pub const GAS_CONSTANT: f64 = 8.314;
/// Molar mass of air (g/mol)
pub const AIR_MOLAR_MASS: f64 = 29.0;

/// Recommended cylinder count for a total power (W).
pub fn recommended_cylinders(power_w: f64) -> u32 {
    match power_w {
        p if p < 200.0 => 1,
        p if p < 1000.0 => 2,
        p if p < 4000.0 => 4,
        p if p < 12000.0 => 6,
        p if p < 25000.0 => 8,
        p if p < 70000.0 => 12,
        p if p < 150000.0 => 16,
        _ => 24,
    }
}

/// Recommended service pressure (bar) for a total power (W).
pub fn recommended_pressure_bar(power_w: f64) -> f64 {
    match power_w {
        p if p < 300.0 => 10.0,
        p if p < 1000.0 => 15.0,
        p if p < 5000.0 => 20.0,
        p if p < 20000.0 => 28.0,
        p if p < 70000.0 => 38.0,
        _ => 55.0,
    }
}

/// Recommended speed (rpm) for a total power (W).
pub fn recommended_rpm(power_w: f64) -> f64 {
    match power_w {
        p if p < 1000.0 => 1600.0,
        p if p < 5000.0 => 1500.0,
        p if p < 20000.0 => 1400.0,
        p if p < 50000.0 => 1200.0,
        p if p < 120000.0 => 950.0,
        _ => 700.0,
    }
}

/// Standard hot source temperature (°C)
pub const RECOMMENDED_HOT_C: f64 = 650.0;
/// Standard cold sink temperature (°C)
pub const RECOMMENDED_COLD_C: f64 = 40.0;

/// Input parameters for the engine plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineInput {
    /// Total power (W)
    pub power_w: f64,
    /// Requested cylinder count (sanitised)
    pub cylinders: i64,
    /// Service pressure (bar)
    pub pressure_bar: f64,
    /// Target speed (rpm)
    pub rpm: f64,
    /// Hot source temperature (°C)
    pub hot_c: f64,
    /// Cold sink temperature (°C)
    pub cold_c: f64,
}

impl Default for EngineInput {
    fn default() -> Self {
        EngineInput {
            power_w: 15000.0,
            cylinders: 8,
            pressure_bar: 20.0,
            rpm: 1400.0,
            hot_c: RECOMMENDED_HOT_C,
            cold_c: RECOMMENDED_COLD_C,
        }
    }
}

impl EngineInput {
    pub fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::number("puissance", "Puissance totale (W)", "15000"),
            FieldSpec::integer("n_cyl", "Nombre de cylindres", "8"),
            FieldSpec::number("pression", "Pression service (bar)", "20"),
            FieldSpec::number("rpm", "Régime cible (tr/min)", "1400"),
            FieldSpec::number("t_chaude", "Température chaude (°C)", "650"),
            FieldSpec::number("t_froide", "Température froide (°C)", "40"),
        ]
    }

    pub fn from_values(values: &FieldValues, _ctx: &Context) -> CalcResult<Self> {
        Ok(EngineInput {
            power_w: values.require_number("puissance")?,
            cylinders: values.require_integer("n_cyl")?,
            pressure_bar: values.require_number("pression")?,
            rpm: values.require_number("rpm")?,
            hot_c: values.require_number("t_chaude")?,
            cold_c: values.require_number("t_froide")?,
        })
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_positive("puissance", self.power_w)?;
        Ok(())
    }
}

/// One adjustment made by the sanitiser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub field: String,
    pub from: f64,
    pub to: f64,
}

impl fmt::Display for Correction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} corrigé : {} -> {}", self.field, trim_float(self.from), trim_float(self.to))
    }
}

fn trim_float(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{:.0}", v)
    } else {
        format!("{:.2}", v)
    }
}

/// Realistic operating point after sanitisation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperatingPoint {
    pub power_w: f64,
    pub cylinders: u32,
    pub pressure_bar: f64,
    pub rpm: f64,
    pub hot_c: f64,
    pub cold_c: f64,
}

/// Clamp and snap raw inputs to realistic values.
pub fn sanitize(input: &EngineInput) -> (OperatingPoint, Vec<Correction>) {
    let mut corrections = Vec::new();
    let mut record = |field: &str, from: f64, to: f64| {
        if (from - to).abs() > 1e-9 {
            corrections.push(Correction {
                field: field.to_string(),
                from,
                to,
            });
        }
    };
    let power = input.power_w;

    let rec_cyl = recommended_cylinders(power);
    let mut cylinders = input.cylinders.clamp(1, 32) as u32;
    if cylinders > 2 * rec_cyl {
        cylinders = rec_cyl;
    }
    record("Cylindres", input.cylinders as f64, cylinders as f64);

    let rec_p = recommended_pressure_bar(power);
    let mut pressure = input.pressure_bar.clamp(6.0, rec_p * 1.2);
    if (pressure - rec_p).abs() > rec_p * 0.5 {
        pressure = rec_p;
    }
    record("Pression", input.pressure_bar, pressure);

    let rec_rpm = recommended_rpm(power);
    let mut rpm = input.rpm.clamp(400.0, rec_rpm * 1.25);
    if rpm > rec_rpm * 1.15 {
        rpm = rec_rpm;
    }
    record("Régime", input.rpm, rpm);

    let cold = input.cold_c.clamp(-20.0, 90.0);
    let mut hot = input.hot_c.clamp(450.0, 800.0);
    if hot < cold + 100.0 {
        hot = cold + 120.0;
    }
    record("T° chaude", input.hot_c, hot);
    record("T° froide", input.cold_c, cold);

    (
        OperatingPoint {
            power_w: power,
            cylinders,
            pressure_bar: pressure,
            rpm,
            hot_c: hot,
            cold_c: cold,
        },
        corrections,
    )
}

/// The engine plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnginePlan {
    pub point: OperatingPoint,
    pub corrections: Vec<Correction>,
    pub power_per_cylinder_w: f64,
    pub swept_volume_cm3: f64,
    pub bore_mm: f64,
    pub stroke_mm: f64,
    pub piston_speed_m_s: f64,
    /// False when the piston speed is still above the limit after every step
    pub speed_ok: bool,
    pub torque_per_cylinder_nm: f64,
    pub piston_force_n: f64,
    pub crankpin_force_n: f64,
    pub crankpin_diameter_mm: f64,
    pub air_mass_g: f64,
    pub warnings: Vec<String>,
}

impl EnginePlan {
    /// Memo snapshot for the detail pages.
    pub fn memo(&self) -> EngineMemo {
        EngineMemo {
            power_w: self.point.power_w,
            cylinders: self.point.cylinders,
            pressure_bar: self.point.pressure_bar,
            rpm: self.point.rpm,
            hot_c: self.point.hot_c,
            cold_c: self.point.cold_c,
            bore_mm: self.bore_mm,
            stroke_mm: self.stroke_mm,
            power_per_cylinder_w: self.power_per_cylinder_w,
            crankpin_mm: self.crankpin_diameter_mm,
        }
    }

    /// Disc piston thickness used in the bill of materials (mm).
    pub fn piston_thickness_mm(&self) -> f64 {
        0.16 * self.bore_mm
    }

    /// Connecting rod length used in the bill of materials (mm).
    pub fn rod_length_mm(&self) -> f64 {
        2.3 * self.stroke_mm
    }

    /// In-line cylinder layout, section view.
    pub fn schematic(&self) -> Schematic {
        let n = self.point.cylinders;
        let bore = self.bore_mm;
        let stroke = self.stroke_mm;
        let pitch = 1.4 * bore;
        let piston = self.piston_thickness_mm();
        let mut s = Schematic::new(format!("Implantation {n} cyl. - vue coupe"));
        for i in 0..n {
            let x = 1.0 + i as f64 * pitch;
            s.rect(x, 1.0, stroke, bore, Some(Rgb::from_hex(0xdde3f8)), Rgb::BLACK);
            s.rect(
                x + stroke - piston,
                1.0,
                piston,
                bore,
                Some(Rgb::from_hex(0xf7d6c1)),
                Rgb::from_hex(0xa36b19),
            );
            s.label(x + stroke / 2.0, 1.0 + bore + 5.0, format!("Cyl {}", i + 1), Rgb::from_hex(0x117755));
        }
        s
    }
}

/// Compute the engine plan.
pub fn calculate(input: &EngineInput) -> CalcResult<EnginePlan> {
    input.validate()?;
    let (point, corrections) = sanitize(input);
    for c in &corrections {
        tracing::warn!(target: "cao_core::stirling", "{c}");
    }

    let f = Hertz::from(Rpm(point.rpm)).0;
    let p = Pascals::from(Bar(point.pressure_bar)).0;
    let power_per_cylinder_w = point.power_w / point.cylinders as f64;

    let swept_m3 = power_per_cylinder_w / (p * f * EFFICIENCY);
    let mut bore_m = (4.0 * swept_m3 / (PI * STROKE_BORE_RATIO)).cbrt();
    let mut stroke_m = STROKE_BORE_RATIO * bore_m;
    let mut speed = 2.0 * stroke_m * f;
    let mut speed_ok = speed <= MAX_PISTON_SPEED;
    let mut steps = 0;
    while !speed_ok && steps < MAX_STROKE_STEPS {
        stroke_m *= STROKE_STEP;
        bore_m = (4.0 * swept_m3 / (PI * stroke_m)).sqrt();
        speed = 2.0 * stroke_m * f;
        speed_ok = speed <= MAX_PISTON_SPEED;
        steps += 1;
    }

    let piston_area = PI / 4.0 * bore_m.powi(2);
    let piston_force_n = p * piston_area;
    let crankpin_force_n = piston_force_n / ROD_ANGLE_DEG.to_radians().cos();
    let torque_per_cylinder_nm = power_per_cylinder_w / (2.0 * PI * f);
    let crankpin_diameter_mm = torsion_diameter_mm(torque_per_cylinder_nm, CRANKPIN_TAU_PA);
    let hot_k: Kelvin = Celsius(point.hot_c).into();
    let air_mass_g = p * swept_m3 / (GAS_CONSTANT * hot_k.0) * AIR_MOLAR_MASS;

    let mut warnings = Vec::new();
    if !speed_ok {
        warnings.push("Limite de vitesse piston atteinte, dimensions réduites automatiquement.".to_string());
    } else if steps > 0 {
        warnings.push(format!("Course réduite en {steps} étape(s) pour respecter {MAX_PISTON_SPEED} m/s."));
    }
    if corrections.iter().any(|c| c.field == "T° chaude" && c.to > c.from) {
        warnings.push("T° chaude augmentée pour assurer un fonctionnement efficace.".to_string());
    }

    tracing::debug!(
        cylinders = point.cylinders,
        bore_mm = bore_m * 1000.0,
        stroke_mm = stroke_m * 1000.0,
        steps,
        "stirling engine plan computed"
    );

    Ok(EnginePlan {
        point,
        corrections,
        power_per_cylinder_w,
        swept_volume_cm3: swept_m3 * 1.0e6,
        bore_mm: bore_m * 1000.0,
        stroke_mm: stroke_m * 1000.0,
        piston_speed_m_s: speed,
        speed_ok,
        torque_per_cylinder_nm,
        piston_force_n,
        crankpin_force_n,
        crankpin_diameter_mm,
        air_mass_g,
        warnings,
    })
}

impl fmt::Display for EnginePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pt = &self.point;
        writeln!(f, "PLAN MOTEUR STIRLING MULTICYLINDRE - CALCULS INDUSTRIELS")?;
        writeln!(f, "-------------------------------------------------------")?;
        writeln!(f, "Puissance totale : {:.0} W - Cylindres : {}", pt.power_w, pt.cylinders)?;
        writeln!(f, "Pression service corrigée : {:.1} bar", pt.pressure_bar)?;
        writeln!(
            f,
            "T° Chaude corrigée : {:.1} °C | T° froide corrigée : {:.1} °C",
            pt.hot_c, pt.cold_c
        )?;
        writeln!(
            f,
            "Régime corrigé : {:.0} tr/min | Rendement estimé : {:.1}%",
            pt.rpm,
            EFFICIENCY * 100.0
        )?;
        writeln!(f, "Puissance/cylindre : {:.1} W", self.power_per_cylinder_w)?;
        writeln!(f, "Volume balayé/cylindre : {:.1} cm³", self.swept_volume_cm3)?;
        writeln!(
            f,
            "Diamètre cylindre : {:.3} mm | Course piston : {:.3} mm",
            self.bore_mm, self.stroke_mm
        )?;
        writeln!(
            f,
            "Vitesse linéaire piston : {:.3} m/s (max : {} m/s)",
            self.piston_speed_m_s, MAX_PISTON_SPEED
        )?;
        writeln!(f, "Couple/cylindre : {:.2} Nm", self.torque_per_cylinder_nm)?;
        writeln!(
            f,
            "Effort piston max : {:.1} N | Effort maneton : {:.1} N",
            self.piston_force_n, self.crankpin_force_n
        )?;
        writeln!(f, "Diamètre min maneton vilebrequin : {:.2} mm", self.crankpin_diameter_mm)?;
        writeln!(f, "Masse air/cycle/cylindre : {:.2} g", self.air_mass_g)?;
        writeln!(f)?;
        writeln!(f, "NOMENCLATURE (par cylindre) :")?;
        writeln!(f, "- Cylindre Ø {:.3} mm, course {:.3} mm", self.bore_mm, self.stroke_mm)?;
        writeln!(f, "- Piston galette épaisseur {:.2} mm", self.piston_thickness_mm())?;
        writeln!(f, "- Bielle L = {:.2} mm", self.rod_length_mm())?;
        writeln!(f, "- Vilebrequin Ø {:.2} mm (maneton)", self.crankpin_diameter_mm)?;
        write!(f, "- Refroidissement, embases, visserie : à détailler selon conception")?;
        if !self.corrections.is_empty() {
            writeln!(f)?;
            writeln!(f)?;
            write!(f, "Entrées corrigées :")?;
            for c in &self.corrections {
                writeln!(f)?;
                write!(f, "- {c}")?;
            }
        }
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

    #[test]
    fn test_recommendation_tables() {
        assert_eq!(recommended_cylinders(150.0), 1);
        assert_eq!(recommended_cylinders(15000.0), 8);
        assert_eq!(recommended_cylinders(1.0e6), 24);
        assert_eq!(recommended_pressure_bar(15000.0), 28.0);
        assert_eq!(recommended_rpm(15000.0), 1400.0);
    }

    #[test]
    fn test_default_inputs_are_not_corrected() {
        let (point, corrections) = sanitize(&EngineInput::default());
        assert!(corrections.is_empty());
        assert_eq!(point.cylinders, 8);
        assert_eq!(point.pressure_bar, 20.0);
    }

    #[test]
    fn test_sanitize_snaps_unrealistic_values() {
        let input = EngineInput {
            power_w: 500.0,
            cylinders: 40,
            pressure_bar: 2.0,
            rpm: 5000.0,
            hot_c: 2000.0,
            cold_c: -50.0,
        };
        let (point, corrections) = sanitize(&input);
        // 40 clamped to 32, above 2·2 -> recommended 2
        assert_eq!(point.cylinders, 2);
        // 2 bar clamped to 6, |6 - 15| > 7.5 -> 15
        assert_eq!(point.pressure_bar, 15.0);
        // 5000 clamped to 2000, above 1840 -> 1600
        assert_eq!(point.rpm, 1600.0);
        assert_eq!(point.hot_c, 800.0);
        assert_eq!(point.cold_c, -20.0);
        assert_eq!(corrections.len(), 5);
    }

    #[test]
    fn test_negative_cylinders_clamped() {
        let input = EngineInput {
            cylinders: -3,
            ..EngineInput::default()
        };
        let (point, corrections) = sanitize(&input);
        assert_eq!(point.cylinders, 1);
        assert_eq!(corrections[0].to, 1.0);
    }

    #[test]
    fn test_plan_respects_piston_speed() {
        let plan = calculate(&EngineInput::default()).unwrap();
        assert!(plan.speed_ok);
        assert!(plan.piston_speed_m_s <= MAX_PISTON_SPEED);
        // 1875 W / (20e5 Pa · 23.33 Hz · 0.22) = 182.6 cm³
        assert!((plan.swept_volume_cm3 - 182.63).abs() < 0.05);
        // bore widening keeps the swept volume
        let v = PI / 4.0 * plan.bore_mm.powi(2) * plan.stroke_mm / 1000.0;
        assert!((v - plan.swept_volume_cm3).abs() < 1e-6);
        assert!(plan.stroke_mm < STROKE_BORE_RATIO * plan.bore_mm);
    }

    #[test]
    fn test_plan_outputs() {
        let plan = calculate(&EngineInput::default()).unwrap();
        let expected_torque = 1875.0 / (2.0 * PI * 1400.0 / 60.0);
        assert!((plan.torque_per_cylinder_nm - expected_torque).abs() < 1e-9);
        assert!(plan.crankpin_force_n > plan.piston_force_n);
        assert!(plan.air_mass_g > 0.0);

        let memo = plan.memo();
        assert_eq!(memo.bore_mm, plan.bore_mm);
        assert_eq!(memo.crankpin_mm, plan.crankpin_diameter_mm);
    }

    #[test]
    fn test_zero_power_is_an_error() {
        let input = EngineInput {
            power_w: 0.0,
            ..EngineInput::default()
        };
        assert!(calculate(&input).is_err());
    }

    #[test]
    fn test_schematic_has_one_label_per_cylinder() {
        let plan = calculate(&EngineInput::default()).unwrap();
        let s = plan.schematic();
        // two rectangles and one label per cylinder
        assert_eq!(s.shapes.len(), 8 * 3);
        assert!(plan.to_string().starts_with("PLAN MOTEUR STIRLING"));
    }
}
