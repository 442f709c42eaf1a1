//! Cloud cost-optimization analysis: collects spend, resource inventory and
//! advisor findings from a provider, normalizes and deduplicates them, and
//! produces a prioritized savings report.

pub mod cli;
pub mod config;
pub mod export;
pub mod providers;
pub mod services;
pub mod types;
