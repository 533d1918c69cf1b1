//! Aggregate views over a decoded replay: who spent what and when, what got
//! built, how fast everybody was clicking, and which faction a player
//! actually drew.
//!
//! Everything in here is derived from the command stream alone. The replay
//! never records game state, so the spend and production figures come from
//! replaying the production commands through `sage-prodsim` and are exactly
//! as approximate as that reconstruction.

mod apm;
mod factions;
mod resources;

use sage_prodsim::SimError;
use thiserror::Error;

pub use apm::{ApmAnalyzer, ApmReport};
pub use factions::resolve_faction;
pub use resources::{ResourceAnalyzer, ResourceReport};

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Sim(#[from] SimError),
}

pub(crate) type Result<T> = std::result::Result<T, AnalysisError>;
