//! Per-node acquisition costs, activation thresholds and influence state.
//!
//! Costs and thresholds are generated once per experiment and then shared
//! read-only by every strategy, so scores from different strategies are
//! comparable.

use crate::graph::{Graph, Node};
use rand::Rng;
use std::collections::HashMap;

/// Node → positive integer acquisition cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCosts<N: Node> {
    costs: HashMap<N, u64>,
    total: u64,
}

impl<N: Node> NodeCosts<N> {
    /// Wraps an explicit cost map.
    pub fn new(costs: HashMap<N, u64>) -> Self {
        let total = costs.values().sum();
        Self { costs, total }
    }

    /// Cost of `node`, 0 when unknown.
    pub fn cost(&self, node: N) -> u64 {
        self.costs.get(&node).copied().unwrap_or(0)
    }

    /// Sum over every node.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Summed cost of a collection of nodes.
    pub fn cost_of<'a>(&self, nodes: impl IntoIterator<Item = &'a N>) -> u64 {
        nodes.into_iter().map(|&n| self.cost(n)).sum()
    }

    /// Number of nodes with a cost.
    pub fn len(&self) -> usize {
        self.costs.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }
}

impl<N: Node> FromIterator<(N, u64)> for NodeCosts<N> {
    fn from_iter<I: IntoIterator<Item = (N, u64)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Node → number of influenced neighbors required to flip the node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeThresholds<N: Node> {
    thresholds: HashMap<N, usize>,
}

impl<N: Node> NodeThresholds<N> {
    /// Wraps an explicit threshold map.
    pub fn new(thresholds: HashMap<N, usize>) -> Self {
        Self { thresholds }
    }

    /// Every node of `graph` gets the same threshold.
    pub fn uniform<G: Graph<Node = N>>(graph: &G, threshold: usize) -> Self {
        Self::new(graph.nodes().map(|n| (n, threshold)).collect())
    }

    /// Threshold of `node`, `None` when unknown.
    pub fn threshold(&self, node: N) -> Option<usize> {
        self.thresholds.get(&node).copied()
    }

    /// Number of nodes with a threshold.
    pub fn len(&self) -> usize {
        self.thresholds.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.thresholds.is_empty()
    }
}

impl<N: Node> FromIterator<(N, usize)> for NodeThresholds<N> {
    fn from_iter<I: IntoIterator<Item = (N, usize)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Node → "currently influenced" flag for one diffusion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InfluenceState<N: Node> {
    influenced: HashMap<N, bool>,
}

impl<N: Node> InfluenceState<N> {
    /// All nodes of `graph`, none influenced.
    pub fn new<G: Graph<Node = N>>(graph: &G) -> Self {
        Self {
            influenced: graph.nodes().map(|n| (n, false)).collect(),
        }
    }

    /// Marks `node` as influenced.
    pub fn mark(&mut self, node: N) {
        self.influenced.insert(node, true);
    }

    /// Whether `node` is influenced.
    pub fn is_influenced(&self, node: N) -> bool {
        self.influenced.get(&node).copied().unwrap_or(false)
    }

    /// Number of influenced nodes.
    pub fn influenced_count(&self) -> usize {
        self.influenced.values().filter(|&&v| v).count()
    }

    /// Clears every flag.
    pub fn reset(&mut self) {
        for flag in self.influenced.values_mut() {
            *flag = false;
        }
    }
}

/// How activation thresholds are drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ThresholdMode {
    /// Uniform in `[min, max]`, independent of the graph.
    Uniform {
        /// Lower bound.
        min: usize,
        /// Upper bound.
        max: usize,
    },
    /// Uniform in `[min, degree(node)]`.
    DegreeBounded {
        /// Lower bound, also used when the degree is below it.
        min: usize,
    },
    /// `ceil(degree / 2)`, at least 1.
    Majority,
}

impl Default for ThresholdMode {
    fn default() -> Self {
        ThresholdMode::DegreeBounded { min: 1 }
    }
}

/// Parameters for generating one experiment's cost and threshold maps.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostModelConfig {
    /// Inclusive cost range.
    pub cost_range: (u64, u64),
    /// Threshold generation mode.
    pub threshold_mode: ThresholdMode,
}

impl Default for CostModelConfig {
    fn default() -> Self {
        Self {
            cost_range: (1, 100),
            threshold_mode: ThresholdMode::default(),
        }
    }
}

impl CostModelConfig {
    /// Sets the inclusive cost range.
    pub fn with_cost_range(mut self, min: u64, max: u64) -> Self {
        self.cost_range = (min, max);
        self
    }

    /// Sets the threshold mode.
    pub fn with_threshold_mode(mut self, mode: ThresholdMode) -> Self {
        self.threshold_mode = mode;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        let (lo, hi) = self.cost_range;
        if lo == 0 {
            return Err("costs must be positive".into());
        }
        if lo > hi {
            return Err("cost_range minimum exceeds maximum".into());
        }
        match self.threshold_mode {
            ThresholdMode::Uniform { min, max } if min == 0 || min > max => {
                Err("uniform threshold range must be positive and ordered".into())
            }
            ThresholdMode::DegreeBounded { min: 0 } => {
                Err("degree-bounded threshold minimum must be positive".into())
            }
            _ => Ok(()),
        }
    }

    /// Draws costs and thresholds for every node of `graph`.
    pub fn generate<G: Graph, R: Rng>(
        &self,
        graph: &G,
        rng: &mut R,
    ) -> (NodeCosts<G::Node>, NodeThresholds<G::Node>) {
        let (lo, hi) = self.cost_range;
        let costs = generate_nodes_cost(graph.nodes(), lo, hi, rng);
        let thresholds = match self.threshold_mode {
            ThresholdMode::Uniform { min, max } => {
                generate_nodes_threshold(graph.nodes(), min, max, rng)
            }
            ThresholdMode::DegreeBounded { min } => {
                generate_nodes_threshold_with_node_degrees(graph, min, rng)
            }
            ThresholdMode::Majority => generate_majority_thresholds(graph),
        };
        (costs, thresholds)
    }
}

/// Independent uniform costs in `[min, max]`.
pub fn generate_nodes_cost<N: Node, R: Rng>(
    nodes: impl IntoIterator<Item = N>,
    min: u64,
    max: u64,
    rng: &mut R,
) -> NodeCosts<N> {
    let max = max.max(min);
    nodes
        .into_iter()
        .map(|n| (n, rng.random_range(min..=max)))
        .collect()
}

/// Independent uniform thresholds in `[min, max]`.
pub fn generate_nodes_threshold<N: Node, R: Rng>(
    nodes: impl IntoIterator<Item = N>,
    min: usize,
    max: usize,
    rng: &mut R,
) -> NodeThresholds<N> {
    let max = max.max(min);
    nodes
        .into_iter()
        .map(|n| (n, rng.random_range(min..=max)))
        .collect()
}

/// Thresholds uniform in `[min, degree(node)]`.
///
/// A node whose degree is below `min` gets exactly `min`; such a node can
/// only become influenced by being seeded.
pub fn generate_nodes_threshold_with_node_degrees<G: Graph, R: Rng>(
    graph: &G,
    min: usize,
    rng: &mut R,
) -> NodeThresholds<G::Node> {
    graph
        .nodes()
        .map(|n| {
            let degree = graph.degree(n);
            let t = if degree <= min {
                min
            } else {
                rng.random_range(min..=degree)
            };
            (n, t)
        })
        .collect()
}

/// Majority thresholds: half the degree, rounded up, at least 1.
pub fn generate_majority_thresholds<G: Graph>(graph: &G) -> NodeThresholds<G::Node> {
    graph
        .nodes()
        .map(|n| (n, graph.degree(n).div_ceil(2).max(1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencyGraph;
    use crate::random::create_rng;

    #[test]
    fn test_costs_within_range_and_total() {
        let g = AdjacencyGraph::path(50);
        let mut rng = create_rng(11);
        let costs = generate_nodes_cost(g.nodes(), 1, 100, &mut rng);
        assert_eq!(costs.len(), 50);
        let mut sum = 0;
        for n in g.nodes() {
            let c = costs.cost(n);
            assert!((1..=100).contains(&c));
            sum += c;
        }
        assert_eq!(costs.total(), sum);
    }

    #[test]
    fn test_degree_bounded_thresholds() {
        let mut g = AdjacencyGraph::path(6);
        g.add_node(42);
        let mut rng = create_rng(5);
        let th = generate_nodes_threshold_with_node_degrees(&g, 1, &mut rng);
        for n in g.nodes() {
            let t = th.threshold(n).unwrap();
            assert!(t >= 1);
            assert!(t <= g.degree(n).max(1));
        }
        // isolated node gets the floor
        assert_eq!(th.threshold(42), Some(1));
    }

    #[test]
    fn test_majority_thresholds() {
        let g = AdjacencyGraph::from_edges([(0, 1), (0, 2), (0, 3), (1, 2)]);
        let th = generate_majority_thresholds(&g);
        assert_eq!(th.threshold(0), Some(2)); // degree 3
        assert_eq!(th.threshold(1), Some(1)); // degree 2
        assert_eq!(th.threshold(3), Some(1)); // degree 1
    }

    #[test]
    fn test_influence_state_reset() {
        let g = AdjacencyGraph::path(4);
        let mut state = InfluenceState::new(&g);
        state.mark(1);
        state.mark(2);
        assert_eq!(state.influenced_count(), 2);
        assert!(state.is_influenced(1));
        state.reset();
        assert_eq!(state.influenced_count(), 0);
    }

    #[test]
    fn test_cost_model_validate() {
        assert!(CostModelConfig::default().validate().is_ok());
        assert!(CostModelConfig::default()
            .with_cost_range(0, 10)
            .validate()
            .is_err());
        assert!(CostModelConfig::default()
            .with_cost_range(10, 5)
            .validate()
            .is_err());
        assert!(CostModelConfig::default()
            .with_threshold_mode(ThresholdMode::Uniform { min: 3, max: 2 })
            .validate()
            .is_err());
    }

    #[test]
    fn test_cost_model_generate_covers_graph() {
        let g = AdjacencyGraph::path(8);
        let mut rng = create_rng(9);
        let (costs, th) = CostModelConfig::default()
            .with_threshold_mode(ThresholdMode::Majority)
            .generate(&g, &mut rng);
        assert_eq!(costs.len(), 8);
        assert_eq!(th.len(), 8);
    }
}
