//! EAM (Datastream MP0810) integration
//!
//! - **Envelope**: `EnvelopeBuilder` renders a transaction into the SOAP body
//! - **Client**: `EamSubmitter` posts it and classifies the answer

pub mod client;
pub mod envelope;

pub use client::EamSubmitter;
pub use envelope::EnvelopeBuilder;
