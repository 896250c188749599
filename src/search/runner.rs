//! Generational search loop.
//!
//! [`SearchRunner`] drives one run:
//! init → (evaluate → select → repopulate) × epochs.

use super::config::SearchConfig;
use super::selection::select_top_half;
use crate::diffusion::threshold_diffusion;
use crate::error::{InfluenceError, Result};
use crate::graph::{Graph, Node};
use crate::model::{InfluenceState, NodeCosts, NodeThresholds};
use crate::random::rng_from;
use crate::recombine::Recombiner;
use crate::seed::{collect_distinct, SeedSet, SeedSetGenerator, ATTEMPTS_PER_SEED_SET};
use rand::Rng;
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of a search run.
#[derive(Debug, Clone)]
pub struct SearchResult<N: Node> {
    /// Population after the last repopulation.
    pub population: Vec<SeedSet<N>>,

    /// Highest score seen in any epoch.
    pub best_score: usize,

    /// The individual that first reached `best_score`, as evaluated.
    ///
    /// Its current members are the influenced closure; its initial members
    /// are the seed set that was actually bought.
    pub best: SeedSet<N>,

    /// Best score of each epoch, which may go down between epochs.
    pub epoch_scores: BTreeMap<usize, usize>,

    /// Whether the run was cancelled before its last epoch.
    pub cancelled: bool,
}

impl<N: Node> SearchResult<N> {
    /// The bought seed set of the best individual, with its permutation.
    pub fn best_seed_set(&self) -> SeedSet<N> {
        SeedSet::new(
            self.best.initial_members().iter().copied(),
            self.best.permutation().to_vec(),
        )
    }
}

/// Executes the search loop.
///
/// # Usage
///
/// ```
/// use u_influence::graph::AdjacencyGraph;
/// use u_influence::model::{NodeCosts, NodeThresholds};
/// use u_influence::search::{SearchConfig, SearchRunner};
///
/// let graph = AdjacencyGraph::path(30);
/// let costs: NodeCosts<usize> = (0..30).map(|n| (n, 1 + n as u64 % 3)).collect();
/// let thresholds = NodeThresholds::uniform(&graph, 1);
///
/// let config = SearchConfig::random(4).with_population_size(8).with_epochs(3).with_seed(42);
/// let result = SearchRunner::run(&graph, &costs, &thresholds, &config).unwrap();
/// assert_eq!(result.best_score, 30);
/// ```
pub struct SearchRunner;

impl SearchRunner {
    /// Runs the search with the RNG described by `config.seed`.
    ///
    /// # Errors
    /// [`InfluenceError::InvalidConfig`] for a configuration that fails
    /// validation; any generation error from initialization or random
    /// injection ends the run.
    pub fn run<G: Graph>(
        graph: &G,
        costs: &NodeCosts<G::Node>,
        thresholds: &NodeThresholds<G::Node>,
        config: &SearchConfig,
    ) -> Result<SearchResult<G::Node>> {
        let mut rng = rng_from(config.seed);
        Self::run_with_rng(graph, costs, thresholds, config, &mut rng)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// The flag is checked after every epoch, so at least one epoch runs.
    /// Once it is set the run returns the best individual found so far.
    pub fn run_with_cancel<G: Graph>(
        graph: &G,
        costs: &NodeCosts<G::Node>,
        thresholds: &NodeThresholds<G::Node>,
        config: &SearchConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SearchResult<G::Node>> {
        let mut rng = rng_from(config.seed);
        Self::run_inner(graph, costs, thresholds, config, &mut rng, cancel)
    }

    /// Runs the search drawing from a caller-supplied RNG.
    pub fn run_with_rng<G: Graph, R: Rng>(
        graph: &G,
        costs: &NodeCosts<G::Node>,
        thresholds: &NodeThresholds<G::Node>,
        config: &SearchConfig,
        rng: &mut R,
    ) -> Result<SearchResult<G::Node>> {
        Self::run_inner(graph, costs, thresholds, config, rng, None)
    }

    fn run_inner<G: Graph, R: Rng>(
        graph: &G,
        costs: &NodeCosts<G::Node>,
        thresholds: &NodeThresholds<G::Node>,
        config: &SearchConfig,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SearchResult<G::Node>> {
        config.validate().map_err(InfluenceError::InvalidConfig)?;

        let generator = SeedSetGenerator::new(graph, costs, config.budget, config.strategy)
            .with_scaling(config.scaling);
        let recombiner =
            Recombiner::new(graph, costs, config.budget, config.generation_option)
                .with_scaling(config.scaling);

        tracing::info!(
            strategy = config.strategy.label(),
            budget = config.budget,
            population = config.population_size,
            epochs = config.epochs,
            "starting search"
        );

        let mut population =
            generator.generate_distinct(config.population_size, config.with_first_total, rng)?;

        let mut best_score = 0;
        let mut best: Option<SeedSet<G::Node>> = None;
        let mut epoch_scores = BTreeMap::new();
        let mut cancelled = false;

        for epoch in 0..config.epochs {
            let scores = evaluate_population(graph, thresholds, &mut population, config.parallel);

            let (best_idx, epoch_best) = scores
                .iter()
                .copied()
                .enumerate()
                .fold((0, 0), |acc, (i, s)| if s > acc.1 { (i, s) } else { acc });

            if best.is_none() || epoch_best > best_score {
                best_score = epoch_best;
                best = population.get(best_idx).cloned();
            }
            epoch_scores.insert(epoch, epoch_best);

            tracing::info!(epoch, epoch_best, best_score, "epoch evaluated");

            population = next_generation(
                population,
                &scores,
                config.population_size,
                &generator,
                &recombiner,
                rng,
            )?;

            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) && epoch + 1 < config.epochs {
                    tracing::info!(epoch, "search cancelled");
                    cancelled = true;
                    break;
                }
            }
        }

        let best = best.ok_or(InfluenceError::GenerationExhausted {
            requested: config.population_size,
            produced: 0,
            attempts: 0,
        })?;

        tracing::info!(
            best_score,
            best_initial = ?best.initial_members(),
            "search finished"
        );

        Ok(SearchResult {
            population,
            best_score,
            best,
            epoch_scores,
            cancelled,
        })
    }
}

/// Diffuses every individual from its current members, replaces the
/// members with the influenced closure, and returns the scores.
fn evaluate_population<G: Graph>(
    graph: &G,
    thresholds: &NodeThresholds<G::Node>,
    population: &mut [SeedSet<G::Node>],
    parallel: bool,
) -> Vec<usize> {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            use rayon::prelude::*;
            return population
                .par_iter_mut()
                .map(|ind| evaluate(graph, thresholds, ind))
                .collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    population
        .iter_mut()
        .map(|ind| evaluate(graph, thresholds, ind))
        .collect()
}

fn evaluate<G: Graph>(
    graph: &G,
    thresholds: &NodeThresholds<G::Node>,
    individual: &mut SeedSet<G::Node>,
) -> usize {
    let mut state = InfluenceState::new(graph);
    let seeds = individual.member_vec();
    let diffusion = threshold_diffusion(graph, &seeds, &mut state, thresholds);
    individual.replace_members(diffusion.influenced.iter().copied());
    diffusion.score()
}

/// Retained top half, then fresh candidates, then one child per pair.
fn next_generation<G: Graph, R: Rng>(
    population: Vec<SeedSet<G::Node>>,
    scores: &[usize],
    population_size: usize,
    generator: &SeedSetGenerator<'_, G>,
    recombiner: &Recombiner<'_, G>,
    rng: &mut R,
) -> Result<Vec<SeedSet<G::Node>>> {
    let top: Vec<SeedSet<G::Node>> = select_top_half(scores)
        .into_iter()
        .map(|i| population[i].clone())
        .collect();

    let random_len = population_size.saturating_sub(top.len()) / 2;
    let fresh = collect_distinct(
        random_len,
        random_len * ATTEMPTS_PER_SEED_SET,
        &top,
        |_| generator.generate(rng),
    )?;

    let mut taken: HashSet<SeedSet<G::Node>> = top.iter().chain(&fresh).cloned().collect();
    let mut children = Vec::with_capacity(top.len() / 2);
    for (pair_idx, pair) in top.chunks_exact(2).enumerate() {
        match recombiner.distinct_child(&pair[0], &pair[1], &taken, rng)? {
            Some(child) => {
                taken.insert(child.clone());
                children.push(child);
            }
            None => tracing::debug!(pair = pair_idx, "no distinct child for pair"),
        }
    }

    tracing::debug!(
        retained = top.len(),
        fresh = fresh.len(),
        children = children.len(),
        "new population"
    );

    let mut next = top;
    next.extend(fresh);
    next.extend(children);
    Ok(next)
}
