//! Earshot CLI
//!
//! Configuration loading and a simulated listening session used by the
//! `earshot` binary.

pub mod config;
pub mod session;
pub mod simulated;

pub use config::EarshotConfig;
pub use session::{listen, ListenOptions, ListenSummary};
pub use simulated::{SimulatedClock, SimulatedMedia};
