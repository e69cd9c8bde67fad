//! Shared UI components reusable across panels
//!
//! Contains:
//! - `palette` - Window colours and button/container styles
//! - `schematic` - Canvas drawing of core schematics

pub mod palette;
pub mod schematic;
