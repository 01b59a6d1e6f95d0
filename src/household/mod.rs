//! Household data structures and snapshot loading

mod data;
pub mod loader;

pub use data::{normalize_jurisdiction, Account, BenefitElection, FilingStatus, PlanInputs};
pub use loader::{load_plan_batch, load_plan_inputs, load_plan_inputs_from_reader};
