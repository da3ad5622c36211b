//! Output-quality predicates used to guard synthesis and to route backtracks.

pub mod confusion;
pub mod deficiency;
