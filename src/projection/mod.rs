//! Projection series builder for household balance and income projections

mod state;
mod engine;
mod series;

pub use state::ProjectionState;
pub use engine::{ProjectionEngine, ProjectionConfig};
pub use series::{AccountBalance, ProjectionPoint, ProjectionResult, ProjectionSummary};
