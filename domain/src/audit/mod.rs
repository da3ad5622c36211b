//! Constraint audit: sufficiency reports, wall-clock budget, and outcome summary.

pub mod budget;
pub mod report;
pub mod summary;
