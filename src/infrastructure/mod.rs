//! Infrastructure layer providing external service integrations.
//!
//! File export, configuration, logging, and the offline asset cache with
//! its storage and network seams.

pub mod asset_cache;
pub mod config;
pub mod errors;
pub mod export;
pub mod logging;
pub mod network;
pub mod storage;

pub use asset_cache::*;
pub use config::*;
pub use errors::*;
pub use export::*;
pub use network::*;
pub use storage::*;
