//! Web layer for the transit dashboard.
//!
//! A JSON API over [`Dashboard`](crate::dashboard::Dashboard). "No data"
//! answers are `null` or empty lists with status 200, never errors.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
