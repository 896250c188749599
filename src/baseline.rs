//! Single-shot comparison strategies.
//!
//! A baseline orders nodes once by an unscaled key, fills the budget, and
//! diffuses the resulting seed set a single time. Baselines are reference
//! points for the genetic search, not part of it.

use crate::diffusion::threshold_diffusion;
use crate::error::Result;
use crate::graph::{Graph, Node};
use crate::model::{InfluenceState, NodeCosts, NodeThresholds};
use crate::seed::{budget_fill, degree_cost_key, partition_fill, sort_by_key_desc, SeedSet};

/// Non-genetic strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Baseline {
    /// Highest degree first.
    Degree,
    /// Highest `degree / cost` (integer division) first.
    DegreeCost,
}

/// Outcome of one baseline seed set.
#[derive(Debug, Clone)]
pub struct BaselineResult<N: Node> {
    /// The seed set that was diffused. Its current members are the
    /// influenced closure; its initial members are the bought seeds.
    pub seed_set: SeedSet<N>,

    /// Number of influenced nodes.
    pub score: usize,

    /// Diffusion steps to the fixed point.
    pub steps: usize,
}

impl Baseline {
    /// Short label used in logs and charts.
    pub fn label(&self) -> &'static str {
        match self {
            Baseline::Degree => "degree",
            Baseline::DegreeCost => "degree/cost",
        }
    }

    /// The baseline's node ordering. Ties keep the graph's node order.
    pub fn ordering<G: Graph>(&self, graph: &G, costs: &NodeCosts<G::Node>) -> Vec<G::Node> {
        let nodes: Vec<G::Node> = graph.nodes().collect();
        match self {
            Baseline::Degree => sort_by_key_desc(nodes, |n| graph.degree(n) as u64),
            Baseline::DegreeCost => sort_by_key_desc(nodes, |n| {
                degree_cost_key(graph.degree(n), costs.cost(n), 1.0, 1.0)
            }),
        }
    }

    /// The baseline's seed set under `budget`.
    pub fn seed_set<G: Graph>(
        &self,
        graph: &G,
        costs: &NodeCosts<G::Node>,
        budget: u64,
    ) -> Result<SeedSet<G::Node>> {
        budget_fill(self.ordering(graph, costs), costs, budget)
    }

    /// Builds (or takes) one seed set and diffuses it once.
    ///
    /// `starting` replaces the generated seed set, e.g. with the best
    /// individual of a genetic run.
    pub fn run<G: Graph>(
        &self,
        graph: &G,
        costs: &NodeCosts<G::Node>,
        thresholds: &NodeThresholds<G::Node>,
        budget: u64,
        starting: Option<SeedSet<G::Node>>,
    ) -> Result<BaselineResult<G::Node>> {
        let seed_set = match starting {
            Some(s) => {
                tracing::info!(
                    baseline = self.label(),
                    seeds = s.len(),
                    "using provided starting seed set"
                );
                s
            }
            None => self.seed_set(graph, costs, budget)?,
        };
        let result = diffuse_once(graph, thresholds, seed_set);
        tracing::info!(
            baseline = self.label(),
            score = result.score,
            steps = result.steps,
            "baseline evaluated"
        );
        Ok(result)
    }

    /// Splits the baseline ordering into up to `count` disjoint seed sets
    /// and diffuses each once.
    pub fn run_partitioned<G: Graph>(
        &self,
        graph: &G,
        costs: &NodeCosts<G::Node>,
        thresholds: &NodeThresholds<G::Node>,
        budget: u64,
        count: usize,
    ) -> Result<Vec<BaselineResult<G::Node>>> {
        let sets = partition_fill(self.ordering(graph, costs), costs, budget, count)?;
        Ok(sets
            .into_iter()
            .map(|s| diffuse_once(graph, thresholds, s))
            .collect())
    }
}

fn diffuse_once<G: Graph>(
    graph: &G,
    thresholds: &NodeThresholds<G::Node>,
    mut seed_set: SeedSet<G::Node>,
) -> BaselineResult<G::Node> {
    let mut state = InfluenceState::new(graph);
    let seeds = seed_set.member_vec();
    let diffusion = threshold_diffusion(graph, &seeds, &mut state, thresholds);
    let score = diffusion.score();
    seed_set.replace_members(diffusion.influenced);
    BaselineResult {
        seed_set,
        score,
        steps: diffusion.steps,
    }
}
