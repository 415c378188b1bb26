//! Presentation layer handling terminal UI and user input.
//!
//! This module renders the setup and counting screens with ratatui and
//! maps key presses onto application operations.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
