//! Trip planning.
//!
//! The query engine over the transit index: direct single-leg search,
//! one-transfer search, ranking, and the `plan_trip` entry point that ties
//! them together. Every query is a pure function of the index and its
//! parameters; nothing here holds state between calls.

mod config;
mod direct;
mod rank;
mod search;
mod transfer;

#[cfg(test)]
pub(crate) mod testutil;

pub use config::PlanConfig;
pub use direct::{Candidate, find_direct};
pub use rank::rank;
pub use search::{Endpoint, PlanRequest, PlanStatus, QueryError, TripPlan, plan_trip};
pub use transfer::find_with_transfer;
