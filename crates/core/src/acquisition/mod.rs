//! Acquisition orchestration.
//!
//! Selects a random artwork from the active source, downloads it, stores it as
//! the current image, and promotes it to desktop background on request.

mod config;
mod orchestrator;
mod types;

pub use config::AcquisitionConfig;
pub use orchestrator::AcquisitionOrchestrator;
pub use types::{AcquisitionError, AcquisitionState, NO_IMAGE_LOADED};
