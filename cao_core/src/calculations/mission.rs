//! # Mission Range
//!
//! Endurance and range of a drone from its battery and power draw, and the
//! action circle around the base plotted as a great circle of 360 points.
//!
//! ```rust
//! use cao_core::calculations::mission::{calculate, MissionInput, Trip};
//!
//! let input = MissionInput::new(200.0, 400.0, 60.0, Trip::RoundTrip, (44.933, 5.033));
//! let r = calculate(&input).unwrap();
//! // 200 Wh / 400 W = 0.5 h, halved for the way back
//! assert!((r.endurance_h - 0.25).abs() < 1e-12);
//! assert!((r.range_km - 15.0).abs() < 1e-12);
//! ```

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::calculations::Context;
use crate::errors::{require_positive, CalcError, CalcResult};
use crate::forms::{FieldSpec, FieldValues};
use crate::schematic::{Rgb, Schematic};

/// Mean Earth radius (km)
pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const CIRCLE_POINTS: usize = 360;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trip {
    OneWay,
    RoundTrip,
}

impl Trip {
    pub fn as_str(self) -> &'static str {
        match self {
            Trip::OneWay => "aller",
            Trip::RoundTrip => "aller-retour",
        }
    }

    fn parse(s: &str) -> CalcResult<Self> {
        match s.trim() {
            "aller" => Ok(Trip::OneWay),
            "aller-retour" => Ok(Trip::RoundTrip),
            other => Err(CalcError::invalid_input("mode", other, "Attendu : 'aller' ou 'aller-retour'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionInput {
    pub battery_wh: f64,
    pub power_w: f64,
    pub speed_kmh: f64,
    pub trip: Trip,
    /// Base latitude and longitude (degrees)
    pub base: (f64, f64),
}

impl MissionInput {
    pub fn new(battery_wh: f64, power_w: f64, speed_kmh: f64, trip: Trip, base: (f64, f64)) -> Self {
        MissionInput {
            battery_wh,
            power_w,
            speed_kmh,
            trip,
            base,
        }
    }

    pub fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::number("batterie", "Capacité batterie (Wh)", ""),
            FieldSpec::number("puissance", "Consommation moyenne (W)", ""),
            FieldSpec::number("vitesse", "Vitesse de croisière (km/h)", ""),
            FieldSpec::choice("mode", "Trajet", "aller-retour", &["aller", "aller-retour"]),
        ]
    }

    pub fn from_values(values: &FieldValues, ctx: &Context) -> CalcResult<Self> {
        Ok(MissionInput {
            battery_wh: values.require_number("batterie")?,
            power_w: values.require_number("puissance")?,
            speed_kmh: values.require_number("vitesse")?,
            trip: Trip::parse(&values.text_or("mode", "aller-retour"))?,
            base: (ctx.settings.base_latitude, ctx.settings.base_longitude),
        })
    }

    pub fn validate(&self) -> CalcResult<()> {
        require_positive("batterie", self.battery_wh)?;
        require_positive("puissance", self.power_w)?;
        require_positive("vitesse", self.speed_kmh)?;
        if !(-90.0..=90.0).contains(&self.base.0) {
            return Err(CalcError::invalid_input(
                "latitude",
                self.base.0.to_string(),
                "La latitude doit être comprise entre -90° et 90°",
            ));
        }
        Ok(())
    }
}

/// Point at `distance_km` from `(lat, lon)` along `bearing` (radians).
pub fn destination(lat_deg: f64, lon_deg: f64, bearing: f64, distance_km: f64) -> [f64; 2] {
    let lat1 = lat_deg.to_radians();
    let lon1 = lon_deg.to_radians();
    let delta = distance_km / EARTH_RADIUS_KM;
    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();
    let lon2 = lon1 + (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());
    [lat2.to_degrees(), lon2.to_degrees()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissionResult {
    pub input: MissionInput,
    pub endurance_h: f64,
    pub range_km: f64,
    /// Action circle as `[lat, lon]` points (degrees)
    pub circle: Vec<[f64; 2]>,
}

impl MissionResult {
    /// Action circle as `[lon, lat]`, ready to plot or export.
    pub fn curve(&self) -> Vec<[f64; 2]> {
        self.circle.iter().map(|[lat, lon]| [*lon, *lat]).collect()
    }

    pub fn schematic(&self) -> Schematic {
        let (lat, lon) = self.input.base;
        let mut s = Schematic::new(format!("Rayon d'action : {:.1} km", self.range_km));
        s.line(self.curve(), Rgb::from_hex(0x1f4fd8), 1.5);
        let r = (self.range_km / EARTH_RADIUS_KM).to_degrees() * 0.03;
        s.circle(lon, lat, r.max(1e-4), Some(Rgb::from_hex(0xd81f1f)), Rgb::from_hex(0xd81f1f));
        s.label(lon, lat, "Base", Rgb::BLACK);
        s
    }
}

pub fn calculate(input: &MissionInput) -> CalcResult<MissionResult> {
    input.validate()?;
    let mut endurance_h = input.battery_wh / input.power_w;
    if input.trip == Trip::RoundTrip {
        endurance_h /= 2.0;
    }
    let range_km = endurance_h * input.speed_kmh;
    let (lat, lon) = input.base;
    let circle = (0..CIRCLE_POINTS)
        .map(|k| {
            let bearing = 2.0 * PI * k as f64 / (CIRCLE_POINTS - 1) as f64;
            destination(lat, lon, bearing, range_km)
        })
        .collect();
    tracing::debug!(endurance_h, range_km, trip = input.trip.as_str(), "mission computed");
    Ok(MissionResult {
        input: input.clone(),
        endurance_h,
        range_km,
        circle,
    })
}

impl fmt::Display for MissionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lat, lon) = self.input.base;
        writeln!(f, "Simulation de mission ({})", self.input.trip.as_str())?;
        writeln!(f)?;
        writeln!(f, "Autonomie : {:.2} h ({:.0} min)", self.endurance_h, self.endurance_h * 60.0)?;
        writeln!(f, "Rayon d'action : {:.1} km", self.range_km)?;
        write!(f, "Base : {:.3}° N, {:.3}° E", lat, lon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(trip: Trip) -> MissionInput {
        MissionInput::new(300.0, 150.0, 50.0, trip, (44.933, 5.033))
    }

    #[test]
    fn test_round_trip_halves_range() {
        let one = calculate(&input(Trip::OneWay)).unwrap();
        let back = calculate(&input(Trip::RoundTrip)).unwrap();
        assert!((one.range_km - 100.0).abs() < 1e-9);
        assert!((back.range_km - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_circle_stays_at_range() {
        let r = calculate(&input(Trip::OneWay)).unwrap();
        assert_eq!(r.circle.len(), CIRCLE_POINTS);
        // due north first, closed loop
        let north = r.circle[0];
        assert!((north[1] - 5.033).abs() < 1e-9);
        assert!((north[0] - 44.933 - (100.0 / EARTH_RADIUS_KM).to_degrees()).abs() < 1e-9);
        let last = r.circle[CIRCLE_POINTS - 1];
        assert!((last[0] - north[0]).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_trip() {
        assert!(Trip::parse("retour").is_err());
        assert_eq!(Trip::parse("aller").unwrap(), Trip::OneWay);
    }

    #[test]
    fn test_zero_power_rejected() {
        let mut i = input(Trip::OneWay);
        i.power_w = 0.0;
        assert_eq!(calculate(&i).unwrap_err().error_code(), "INVALID_INPUT");
    }
}
