pub mod models;
pub mod session;
pub mod errors;

pub use models::*;
pub use session::*;
pub use errors::*;
