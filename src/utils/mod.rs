//! Utility modules
//!
//! Provides logging setup and well-known filesystem locations.

pub mod logging;
pub mod paths;

pub use logging::init_logging;
