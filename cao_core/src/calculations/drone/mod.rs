//! # Drone
//!
//! - [`airfoil`] - NACA 4-digit wing profile with CSV export
//! - [`propulsion`] - motor power and battery sizing for a target endurance

pub mod airfoil;
pub mod propulsion;
