//! Synchronization pipeline: ports, transformation and orchestration.

pub mod orchestrator;
pub mod ports;
pub mod transformer;
