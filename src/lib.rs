//! tally - Station Counter Library
//!
//! A terminal tally counter for named stations, with an offline asset cache.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
