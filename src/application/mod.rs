//! Application layer managing state and user workflows.
//!
//! This module coordinates between the domain session and the presentation
//! layer, turning rejected operations into status messages.

pub mod state;

pub use state::*;
