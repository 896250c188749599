//! Population search over budget-constrained seed sets.
//!
//! Each epoch evaluates every individual with the diffusion engine, keeps
//! the better half, injects fresh candidates from the configured ordering
//! strategy and recombines consecutive pairs of survivors.
//!
//! Individuals are mutated in place by evaluation: after its first epoch
//! an individual's members are its own influenced closure, so a retained
//! individual keeps its score in later epochs.
//!
//! # Key Types
//!
//! - [`SearchConfig`]: budget, population size, epochs, strategy, presets
//! - [`SearchRunner`]: executes the loop
//! - [`SearchResult`]: final population, best score, epoch score table

mod config;
mod runner;
mod selection;

pub use config::SearchConfig;
pub use runner::{SearchResult, SearchRunner};
pub use selection::{select_top, select_top_half};
