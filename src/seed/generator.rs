//! Budget-constrained candidate generation.

use super::fill::{budget_fill, partition_fill};
use super::ordering::{KeyScaling, OrderingStrategy};
use super::types::SeedSet;
use crate::error::{InfluenceError, Result};
use crate::graph::{Graph, Node};
use crate::model::NodeCosts;
use rand::Rng;
use std::collections::HashSet;

/// Attempts allowed per requested seed set in batch generation.
pub const ATTEMPTS_PER_SEED_SET: usize = 5;

/// Produces seed sets of a fixed budget from one ordering strategy.
///
/// # Examples
///
/// ```
/// use u_influence::graph::AdjacencyGraph;
/// use u_influence::model::NodeCosts;
/// use u_influence::random::create_rng;
/// use u_influence::seed::{OrderingStrategy, SeedSetGenerator};
///
/// let graph = AdjacencyGraph::path(6);
/// let costs: NodeCosts<usize> = (0..6).map(|n| (n, 1)).collect();
/// let generator = SeedSetGenerator::new(&graph, &costs, 2, OrderingStrategy::Random);
///
/// let mut rng = create_rng(42);
/// let sets = generator.generate_distinct(3, false, &mut rng).unwrap();
/// assert_eq!(sets.len(), 3);
/// assert!(sets.iter().all(|s| s.len() == 2));
/// ```
pub struct SeedSetGenerator<'a, G: Graph> {
    graph: &'a G,
    costs: &'a NodeCosts<G::Node>,
    budget: u64,
    strategy: OrderingStrategy,
    scaling: KeyScaling,
}

impl<'a, G: Graph> SeedSetGenerator<'a, G> {
    /// Creates a generator with unscaled keys.
    pub fn new(
        graph: &'a G,
        costs: &'a NodeCosts<G::Node>,
        budget: u64,
        strategy: OrderingStrategy,
    ) -> Self {
        Self {
            graph,
            costs,
            budget,
            strategy,
            scaling: KeyScaling::UNSCALED,
        }
    }

    /// Sets the key multiplier ranges.
    pub fn with_scaling(mut self, scaling: KeyScaling) -> Self {
        self.scaling = scaling;
        self
    }

    /// The cost budget every generated set respects.
    pub fn budget(&self) -> u64 {
        self.budget
    }

    /// The ordering strategy.
    pub fn strategy(&self) -> OrderingStrategy {
        self.strategy
    }

    /// One seed set from a fresh ordering.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<SeedSet<G::Node>> {
        self.generate_with(self.scaling, rng)
    }

    /// One seed set with `a = b = 1`, the unscaled baseline individual.
    pub fn generate_total<R: Rng>(&self, rng: &mut R) -> Result<SeedSet<G::Node>> {
        self.generate_with(KeyScaling::UNSCALED, rng)
    }

    fn generate_with<R: Rng>(
        &self,
        scaling: KeyScaling,
        rng: &mut R,
    ) -> Result<SeedSet<G::Node>> {
        let ordering = self.strategy.order(self.graph, self.costs, scaling, rng);
        let seed_set = budget_fill(ordering, self.costs, self.budget)?;
        tracing::trace!(
            strategy = self.strategy.label(),
            members = seed_set.len(),
            cost = seed_set.cost(self.costs),
            "seed set created"
        );
        Ok(seed_set)
    }

    /// `n` pairwise-distinct seed sets in at most `5n` attempts.
    ///
    /// With `with_first_total`, the first attempt uses unscaled keys so the
    /// batch always contains the plain degree (or degree/cost) candidate.
    ///
    /// # Errors
    /// [`InfluenceError::GenerationExhausted`] when the attempts run out,
    /// or any error from [`budget_fill`].
    pub fn generate_distinct<R: Rng>(
        &self,
        n: usize,
        with_first_total: bool,
        rng: &mut R,
    ) -> Result<Vec<SeedSet<G::Node>>> {
        let sets = collect_distinct(n, n * ATTEMPTS_PER_SEED_SET, &[], |attempt| {
            if attempt == 0 && with_first_total {
                self.generate_total(rng)
            } else {
                self.generate(rng)
            }
        })?;
        tracing::debug!(
            strategy = self.strategy.label(),
            count = sets.len(),
            budget = self.budget,
            "generated distinct seed sets"
        );
        Ok(sets)
    }

    /// Up to `count` disjoint seed sets carved from one unscaled ordering.
    pub fn partition<R: Rng>(&self, count: usize, rng: &mut R) -> Result<Vec<SeedSet<G::Node>>> {
        let ordering = self
            .strategy
            .order(self.graph, self.costs, KeyScaling::UNSCALED, rng);
        partition_fill(ordering, self.costs, self.budget, count)
    }
}

/// Collects `n` seed sets that differ from each other and from `existing`.
///
/// `make` receives the attempt index. Returns in creation order.
///
/// # Errors
/// [`InfluenceError::GenerationExhausted`] after `max_attempts` calls to
/// `make` without reaching `n`; errors from `make` propagate unchanged.
pub fn collect_distinct<N, F>(
    n: usize,
    max_attempts: usize,
    existing: &[SeedSet<N>],
    mut make: F,
) -> Result<Vec<SeedSet<N>>>
where
    N: Node,
    F: FnMut(usize) -> Result<SeedSet<N>>,
{
    let mut seen: HashSet<SeedSet<N>> = existing.iter().cloned().collect();
    let mut sets = Vec::with_capacity(n);
    let mut attempts = 0;

    while sets.len() < n {
        if attempts >= max_attempts {
            tracing::warn!(
                requested = n,
                produced = sets.len(),
                attempts,
                "no attempts left to generate distinct seed sets"
            );
            return Err(InfluenceError::GenerationExhausted {
                requested: n,
                produced: sets.len(),
                attempts,
            });
        }
        let candidate = make(attempts)?;
        attempts += 1;
        if seen.insert(candidate.clone()) {
            sets.push(candidate);
        }
    }

    Ok(sets)
}
