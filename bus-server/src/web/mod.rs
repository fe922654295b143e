//! Web layer for the bus trip planner.
//!
//! Serves the map frontend and the JSON API over the shared transit index.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
