//! Use cases (application services)

pub mod critic;
pub mod run_cycle;

#[cfg(test)]
pub(crate) mod test_support;
