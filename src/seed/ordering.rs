//! Node orderings that feed the budget fill.
//!
//! Key-based orderings sort descending with a stable sort over the graph's
//! node enumeration, so equal keys keep enumeration order. The
//! degree/cost key is an integer division of two floored products and
//! produces many ties among mid-degree nodes; stability keeps those
//! reproducible.

use crate::graph::{Graph, Node};
use crate::model::NodeCosts;
use crate::random::draw_multiplier;
use rand::seq::SliceRandom;
use rand::Rng;

/// How a candidate's node ordering is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OrderingStrategy {
    /// Uniform random shuffle.
    #[default]
    Random,
    /// Descending `floor(degree · a)`.
    Degree,
    /// Descending `floor(degree · a) / floor(cost · b)`.
    DegreeCost,
}

impl OrderingStrategy {
    /// Short label used in logs and charts.
    pub fn label(&self) -> &'static str {
        match self {
            OrderingStrategy::Random => "random",
            OrderingStrategy::Degree => "degree",
            OrderingStrategy::DegreeCost => "degree/cost",
        }
    }

    /// Produces a total ordering of the graph's nodes.
    pub fn order<G: Graph, R: Rng>(
        &self,
        graph: &G,
        costs: &NodeCosts<G::Node>,
        scaling: KeyScaling,
        rng: &mut R,
    ) -> Vec<G::Node> {
        match self {
            OrderingStrategy::Random => random_permutation(graph, rng),
            OrderingStrategy::Degree => degree_order(graph, scaling.a_range, rng),
            OrderingStrategy::DegreeCost => {
                degree_cost_order(graph, costs, scaling.a_range, scaling.b_range, rng)
            }
        }
    }
}

/// Ranges for the per-node random multipliers applied to ordering keys.
///
/// `a` scales the degree, `b` scales the cost. Each node draws its own
/// multipliers, which is what lets repeated degree-based candidates differ.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyScaling {
    /// Inclusive range for `a`.
    pub a_range: (f64, f64),
    /// Inclusive range for `b`.
    pub b_range: (f64, f64),
}

impl KeyScaling {
    /// `a = b = 1`: the plain degree and degree/cost keys.
    pub const UNSCALED: KeyScaling = KeyScaling {
        a_range: (1.0, 1.0),
        b_range: (1.0, 1.0),
    };

    /// Creates a scaling from both ranges.
    pub fn new(a_range: (f64, f64), b_range: (f64, f64)) -> Self {
        Self { a_range, b_range }
    }

    /// Validates that both ranges are positive and ordered.
    pub fn validate(&self) -> Result<(), String> {
        for (name, (lo, hi)) in [("a_range", self.a_range), ("b_range", self.b_range)] {
            if lo.is_nan() || lo <= 0.0 || !hi.is_finite() {
                return Err(format!("{name} must be positive and finite"));
            }
            if lo > hi {
                return Err(format!("{name} minimum exceeds maximum"));
            }
        }
        Ok(())
    }
}

impl Default for KeyScaling {
    fn default() -> Self {
        Self::UNSCALED
    }
}

/// Degree key: `floor(degree · a)`.
pub fn degree_key(degree: usize, a: f64) -> u64 {
    (degree as f64 * a).floor() as u64
}

/// Degree/cost key: `floor(degree · a) / floor(cost · b)`, denominator at least 1.
pub fn degree_cost_key(degree: usize, cost: u64, a: f64, b: f64) -> u64 {
    let denom = ((cost as f64 * b).floor() as u64).max(1);
    degree_key(degree, a) / denom
}

/// Uniformly shuffled node list.
pub fn random_permutation<G: Graph, R: Rng>(graph: &G, rng: &mut R) -> Vec<G::Node> {
    let mut nodes: Vec<G::Node> = graph.nodes().collect();
    nodes.shuffle(rng);
    nodes
}

/// Nodes by descending scaled degree.
pub fn degree_order<G: Graph, R: Rng>(
    graph: &G,
    a_range: (f64, f64),
    rng: &mut R,
) -> Vec<G::Node> {
    let nodes: Vec<G::Node> = graph.nodes().collect();
    sort_by_key_desc(nodes, |n| {
        degree_key(graph.degree(n), draw_multiplier(a_range, rng))
    })
}

/// Nodes by descending scaled degree/cost ratio.
pub fn degree_cost_order<G: Graph, R: Rng>(
    graph: &G,
    costs: &NodeCosts<G::Node>,
    a_range: (f64, f64),
    b_range: (f64, f64),
    rng: &mut R,
) -> Vec<G::Node> {
    let nodes: Vec<G::Node> = graph.nodes().collect();
    sort_by_key_desc(nodes, |n| {
        let a = draw_multiplier(a_range, rng);
        let b = draw_multiplier(b_range, rng);
        degree_cost_key(graph.degree(n), costs.cost(n), a, b)
    })
}

/// Stable descending sort of `nodes` by a key computed once per node.
pub fn sort_by_key_desc<N: Node>(nodes: Vec<N>, mut key: impl FnMut(N) -> u64) -> Vec<N> {
    let mut keyed: Vec<(u64, N)> = nodes.into_iter().map(|n| (key(n), n)).collect();
    keyed.sort_by(|x, y| y.0.cmp(&x.0));
    keyed.into_iter().map(|(_, n)| n).collect()
}
