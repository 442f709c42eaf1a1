//! Type definitions for finops-lens

mod analysis;
mod error;
mod inventory;
mod recommendation;
mod snapshot;

pub use analysis::*;
pub use error::*;
pub use inventory::*;
pub use recommendation::*;
pub use snapshot::*;
