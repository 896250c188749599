//! Linear-threshold cascade.
//!
//! The cascade is synchronous: every pass counts influenced neighbors
//! against the active set as it stood at the start of the pass, so a node
//! activated in step `k` only contributes to its neighbors' counts from
//! step `k + 1` on. An asynchronous sweep can reach a larger fixed point;
//! the two are not interchangeable.
//!
//! # Complexity
//! At most |V| passes, each O(|V| + |E|).

use crate::graph::{Graph, Node};
use crate::model::{InfluenceState, NodeThresholds};
use std::collections::HashSet;

/// Outcome of one cascade.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diffusion<N> {
    /// Every node influenced at the fixed point, sorted.
    pub influenced: Vec<N>,

    /// Number of passes that grew the active set.
    pub steps: usize,

    /// Active-set size after seeding and after each growing pass.
    ///
    /// Always `steps + 1` entries, non-decreasing.
    pub history: Vec<usize>,

    /// Nodes newly activated by each growing pass, sorted.
    ///
    /// The active set after pass `k` is the seeds plus
    /// `activations[..=k]`, so each pass contains the one before it.
    pub activations: Vec<Vec<N>>,
}

impl<N> Diffusion<N> {
    /// Size of the influenced set, used as the score of a seed set.
    pub fn score(&self) -> usize {
        self.influenced.len()
    }
}

/// Marks every seed as influenced.
pub fn influence_nodes<N: Node>(seeds: &[N], state: &mut InfluenceState<N>) {
    for &node in seeds {
        state.mark(node);
    }
}

/// Runs the cascade from `seeds` to its fixed point.
///
/// Seeds are marked in `state`, and so is every node activated later.
/// Nodes missing from `thresholds` never activate through the cascade.
pub fn threshold_diffusion<G: Graph>(
    graph: &G,
    seeds: &[G::Node],
    state: &mut InfluenceState<G::Node>,
    thresholds: &NodeThresholds<G::Node>,
) -> Diffusion<G::Node> {
    influence_nodes(seeds, state);

    let nodes: Vec<G::Node> = graph.nodes().collect();
    let mut active: HashSet<G::Node> = seeds.iter().copied().collect();
    let mut history = vec![active.len()];
    let mut steps = 0;
    let mut activations = Vec::new();

    loop {
        let mut next = active.clone();
        let mut activated = Vec::new();

        for &node in &nodes {
            if active.contains(&node) {
                continue;
            }
            let Some(threshold) = thresholds.threshold(node) else {
                continue;
            };
            let influenced_neighbors = graph
                .neighbors(node)
                .filter(|n| active.contains(n))
                .count();
            if influenced_neighbors >= threshold {
                state.mark(node);
                next.insert(node);
                activated.push(node);
            }
        }

        if next.len() == active.len() {
            break;
        }

        active = next;
        activated.sort_unstable();
        activations.push(activated);
        steps += 1;
        history.push(active.len());
        tracing::trace!(step = steps, active = active.len(), "diffusion step");
    }

    let mut influenced: Vec<G::Node> = active.into_iter().collect();
    influenced.sort_unstable();

    tracing::debug!(
        seeds = seeds.len(),
        influenced = influenced.len(),
        steps,
        "diffusion reached fixed point"
    );

    Diffusion {
        influenced,
        steps,
        history,
        activations,
    }
}
