//! UI module for the Assistant de CAO window
//!
//! # Panel Structure
//! - `toolbar` - Session file operations, back and home
//! - `nav_panel` - Left sidebar: every page, grouped by domain
//! - `input_panel` - Center panel: dispatches to the page views below
//! - `results_panel` - Right panel: plan text, notices, schematic, exports
//! - `status_bar` - Bottom status messages
//!
//! # Input Panel Children
//! - `input_form` - Generic calculator form built from the page fields
//! - `input_settings` - Settings page
//! - `home` - Logo and page shortcuts
//! - `materials` - Material table and catalogue cards
//!
//! # Shared Components
//! - `shared/palette` - Colours and widget styles
//! - `shared/schematic` - Canvas program drawing a `Schematic`

// Top-level panels
pub mod input_panel;
pub mod nav_panel;
pub mod results_panel;
pub mod status_bar;
pub mod toolbar;

// Input panel children
pub mod home;
pub mod input_form;
pub mod input_settings;
pub mod materials;

// Shared components
pub mod shared;
