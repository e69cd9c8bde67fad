//! # cao_core - Mechanical Design Calculation Engine
//!
//! `cao_core` is the computational heart of Assistant CAO: strength of
//! materials, Stirling engine design, gearbox, drone and ISO fit
//! calculators with a clean, JSON-serializable API shared by the desktop
//! window and the command line.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: pure functions that take input and return results
//! - **JSON-First**: all inputs and results implement Serialize/Deserialize
//! - **Rich Errors**: structured error types, shown to users as `Erreur : ...`
//! - **One memo**: the last engine plan is a plain value in the [`session`],
//!   passed by reference to the pages that pre-fill from it
//!
//! ## Quick Start
//!
//! ```rust
//! use cao_core::pages::{submit, Page};
//! use cao_core::session::Session;
//!
//! let mut session = Session::new("Atelier");
//! let form = Page::Engine.defaults(&session.context());
//! let plan = submit(Page::Engine, &form, &mut session).unwrap().unwrap();
//! println!("{}", plan.plan());
//!
//! // the crankshaft form now starts from the engine plan
//! let crank = Page::Crankshaft.defaults(&session.context());
//! let memo = session.memo.unwrap();
//! assert_eq!(crank.raw("n_cyl"), memo.cylinders.to_string());
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - every calculator, plus the item/output wrappers
//! - [`pages`] - named pages, form defaults and navigation
//! - [`forms`] - field declarations and raw form values
//! - [`memo`] - last-computed engine parameters
//! - [`materials`] - material property tables and catalogue
//! - [`schematic`] - backend-neutral drawings with SVG rendering
//! - [`session`] - settings, memo and history container
//! - [`file_io`] - atomic saves and locking for session files
//! - [`export`] - CSV curves and SVG schematics
//! - [`units`] - type-safe unit wrappers
//! - [`errors`] - structured error types

pub mod calculations;
pub mod errors;
pub mod export;
pub mod file_io;
pub mod forms;
pub mod materials;
pub mod memo;
pub mod pages;
pub mod schematic;
pub mod session;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{CalculationItem, CalculationOutput, Context};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_session, load_session_or_default, save_session, FileLock};
pub use memo::EngineMemo;
pub use pages::{Navigator, Page};
pub use session::{Session, Settings};
