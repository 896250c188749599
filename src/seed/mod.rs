//! Seed sets and the budget-constrained generators that build them.
//!
//! Every generator reduces to the same procedure: produce a total node
//! ordering, then walk it with [`budget_fill`] to pick nodes that fit the
//! cost budget. Orderings differ by [`OrderingStrategy`]:
//!
//! - [`OrderingStrategy::Random`]: uniform shuffle
//! - [`OrderingStrategy::Degree`]: descending scaled degree
//! - [`OrderingStrategy::DegreeCost`]: descending scaled degree/cost ratio
//!
//! [`partition_fill`] splits one ordering into disjoint seed sets for the
//! non-genetic baselines, and [`SeedSetGenerator::generate_distinct`] builds
//! deduplicated batches with a bounded number of attempts.

mod fill;
mod generator;
mod ordering;
mod types;

pub use fill::{budget_fill, partition_fill};
pub use generator::{collect_distinct, SeedSetGenerator, ATTEMPTS_PER_SEED_SET};
pub use ordering::{
    degree_cost_key, degree_cost_order, degree_key, degree_order, random_permutation,
    sort_by_key_desc, KeyScaling, OrderingStrategy,
};
pub use types::SeedSet;
