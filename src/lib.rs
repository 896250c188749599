//! Budget-constrained influence maximization under a linear threshold model.
//!
//! Every node carries a purchase cost and an activation threshold. A seed
//! set bought within a budget spreads influence synchronously: a node
//! activates once at least `threshold` of its neighbors are active. The
//! crate searches for seed sets that maximize the final number of active
//! nodes.
//!
//! - **Diffusion**: synchronous threshold cascade to a fixed point.
//! - **Seed sets**: budget fill over node orderings (random, degree,
//!   degree/cost), distinct batches, disjoint partitions.
//! - **Recombination**: position-averaged merge of two parent orderings.
//! - **Search**: generational loop of evaluation, truncation selection,
//!   random injection and pairwise recombination.
//! - **Baselines**: single-shot degree and degree/cost heuristics.
//! - **Experiments**: baselines against the genetic variants, with
//!   retries and per-epoch comparison charts.
//!
//! # Architecture
//!
//! The core is generic over the [`graph::Graph`] trait and draws all
//! randomness from a caller-supplied RNG. Logging goes through `tracing`;
//! [`logging::init`] installs a subscriber for binaries.

pub mod baseline;
pub mod diffusion;
pub mod error;
pub mod experiment;
pub mod graph;
pub mod logging;
pub mod model;
pub mod random;
pub mod recombine;
pub mod search;
pub mod seed;

pub use error::{InfluenceError, Result};
