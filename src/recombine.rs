//! Position-averaged recombination of two seed sets.
//!
//! A child is derived in two stages:
//!
//! 1. [`position_combine`] merges the parents' permutations into one
//!    ordering keyed by the floor-average of each node's two ranks.
//! 2. The merged ordering is optionally re-keyed by degree or degree/cost
//!    ([`GenerationOption`]) and then walked by the same budget fill that
//!    builds every other seed set.
//!
//! The child is therefore always a budget-respecting subset of the shared
//! node universe.

use crate::error::{InfluenceError, Result};
use crate::graph::{Graph, Node};
use crate::model::NodeCosts;
use crate::random::draw_multiplier;
use crate::seed::{budget_fill, degree_cost_key, degree_key, sort_by_key_desc, KeyScaling, SeedSet};
use rand::Rng;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// Which key orders the merged permutation before the budget fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GenerationOption {
    /// Use the merged order as is.
    #[default]
    Recombined,
    /// Stable re-sort of the merged order by scaled degree.
    Degree,
    /// Stable re-sort of the merged order by scaled degree/cost.
    DegreeCost,
}

/// Merges two permutations by averaged rank.
///
/// # Algorithm
///
/// For every node of `p1`, the key is `(rank in p1 + rank in p2) / 2` with
/// floor division. Nodes come out of a max-heap, highest key first. Equal
/// keys are ordered by a random salt, so repeated merges of the same pair
/// may differ only in how ties fall.
///
/// # Complexity
/// O(n log n)
///
/// # Errors
/// [`InfluenceError::UncomparableOrderings`] when the two slices are not
/// permutations of the same node set.
pub fn position_combine<N: Node, R: Rng>(p1: &[N], p2: &[N], rng: &mut R) -> Result<Vec<N>> {
    if p1.len() != p2.len() {
        return Err(InfluenceError::UncomparableOrderings {
            reason: format!("lengths differ ({} vs {})", p1.len(), p2.len()),
        });
    }

    rank_index(p1)?;
    let rank2 = rank_index(p2)?;

    let mut heap = BinaryHeap::with_capacity(p1.len());
    for (i, &node) in p1.iter().enumerate() {
        let j = *rank2
            .get(&node)
            .ok_or_else(|| InfluenceError::UncomparableOrderings {
                reason: format!("{node:?} missing from second ordering"),
            })?;
        let key = (i + j) / 2;
        let salt: u32 = rng.random();
        heap.push((key, salt, i));
    }

    let mut merged = Vec::with_capacity(p1.len());
    while let Some((_, _, i)) = heap.pop() {
        merged.push(p1[i]);
    }
    Ok(merged)
}

fn rank_index<N: Node>(ordering: &[N]) -> Result<HashMap<N, usize>> {
    let mut ranks = HashMap::with_capacity(ordering.len());
    for (i, &node) in ordering.iter().enumerate() {
        if ranks.insert(node, i).is_some() {
            return Err(InfluenceError::UncomparableOrderings {
                reason: format!("{node:?} appears twice"),
            });
        }
    }
    Ok(ranks)
}

/// Derives children of a fixed budget from pairs of parents.
pub struct Recombiner<'a, G: Graph> {
    graph: &'a G,
    costs: &'a NodeCosts<G::Node>,
    budget: u64,
    option: GenerationOption,
    scaling: KeyScaling,
}

impl<'a, G: Graph> Recombiner<'a, G> {
    /// Creates a recombiner with unscaled keys.
    pub fn new(
        graph: &'a G,
        costs: &'a NodeCosts<G::Node>,
        budget: u64,
        option: GenerationOption,
    ) -> Self {
        Self {
            graph,
            costs,
            budget,
            option,
            scaling: KeyScaling::UNSCALED,
        }
    }

    /// Sets the multiplier ranges used by the re-keying options.
    pub fn with_scaling(mut self, scaling: KeyScaling) -> Self {
        self.scaling = scaling;
        self
    }

    /// Attempts allowed per pair: twice the budget.
    pub fn attempts_per_pair(&self) -> usize {
        usize::try_from(self.budget.saturating_mul(2)).unwrap_or(usize::MAX)
    }

    /// One child from two parents.
    ///
    /// # Errors
    /// [`InfluenceError::UncomparableOrderings`] for mismatched parents,
    /// [`InfluenceError::InfeasibleBudget`] from the budget fill.
    pub fn recombine<R: Rng>(
        &self,
        p1: &SeedSet<G::Node>,
        p2: &SeedSet<G::Node>,
        rng: &mut R,
    ) -> Result<SeedSet<G::Node>> {
        let merged = position_combine(p1.permutation(), p2.permutation(), rng)?;
        let ordering = self.rekey(merged, rng);
        budget_fill(ordering, self.costs, self.budget)
    }

    fn rekey<R: Rng>(&self, merged: Vec<G::Node>, rng: &mut R) -> Vec<G::Node> {
        let KeyScaling { a_range, b_range } = self.scaling;
        match self.option {
            GenerationOption::Recombined => merged,
            GenerationOption::Degree => sort_by_key_desc(merged, |n| {
                degree_key(self.graph.degree(n), draw_multiplier(a_range, rng))
            }),
            GenerationOption::DegreeCost => sort_by_key_desc(merged, |n| {
                let a = draw_multiplier(a_range, rng);
                let b = draw_multiplier(b_range, rng);
                degree_cost_key(self.graph.degree(n), self.costs.cost(n), a, b)
            }),
        }
    }

    /// A child not contained in `taken`, within [`attempts_per_pair`](Self::attempts_per_pair)
    /// attempts.
    ///
    /// `Ok(None)` means every attempt produced a duplicate; the pair simply
    /// contributes nothing this generation.
    pub fn distinct_child<R: Rng>(
        &self,
        p1: &SeedSet<G::Node>,
        p2: &SeedSet<G::Node>,
        taken: &HashSet<SeedSet<G::Node>>,
        rng: &mut R,
    ) -> Result<Option<SeedSet<G::Node>>> {
        for _ in 0..self.attempts_per_pair() {
            let child = self.recombine(p1, p2, rng)?;
            if !taken.contains(&child) {
                return Ok(Some(child));
            }
        }
        Ok(None)
    }
}
