//! Output formatting for cycle results

pub mod console;
pub mod formatter;
