//! External service integrations

pub mod eam;
pub mod source;
