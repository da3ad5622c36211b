//! Candidate-answer evaluation: the cheap heuristic gate and judge verdicts.

pub mod heuristics;
pub mod verdict;
