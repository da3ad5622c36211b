//! Progress display for the reasoning cycle

pub mod reporter;
