//! Ports (interfaces) for the application layer
//!
//! These traits define the boundaries between the application layer
//! and the infrastructure/presentation layers.

pub mod model_client;
pub mod progress;
