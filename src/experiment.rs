//! Experiment driver: baselines against the genetic variants.
//!
//! One experiment performs `runs` independent runs on the same graph. Each
//! run draws a fresh cost and threshold model, then evaluates the two
//! baselines and the three genetic searches under the same budget. Scores
//! are collected into a [`ComparisonChart`] per run.
//!
//! # Usage
//!
//! ```
//! use u_influence::experiment::{Experiment, ExperimentConfig};
//! use u_influence::graph::AdjacencyGraph;
//!
//! let graph = AdjacencyGraph::path(40);
//! let config = ExperimentConfig::new("path")
//!     .with_budget(10)
//!     .with_population_size(6)
//!     .with_epochs(2)
//!     .with_cost_range(1, 3)
//!     .with_seed(3);
//!
//! let reports = Experiment::new(config).run(&graph).unwrap();
//! assert_eq!(reports.len(), 1);
//! assert_eq!(reports[0].chart.series.len(), 5);
//! ```

use crate::baseline::{Baseline, BaselineResult};
use crate::error::{InfluenceError, Result};
use crate::graph::{max_degree, Graph, Node};
use crate::model::{CostModelConfig, NodeCosts, NodeThresholds, ThresholdMode};
use crate::random::rng_from;
use crate::search::{SearchConfig, SearchResult, SearchRunner};
use rand::Rng;
use std::collections::BTreeMap;

/// Runs `f` until it succeeds, at most `max_attempts` times.
///
/// `f` receives the zero-based attempt number. Each failure is logged at
/// `warn`; after the last one the final error is wrapped in
/// [`InfluenceError::RetriesExhausted`].
///
/// # Examples
///
/// ```
/// use u_influence::error::InfluenceError;
/// use u_influence::experiment::retry;
///
/// let value = retry(3, |attempt| {
///     if attempt < 2 {
///         Err(InfluenceError::InvalidConfig("not yet".into()))
///     } else {
///         Ok(attempt)
///     }
/// });
/// assert_eq!(value, Ok(2));
/// ```
pub fn retry<T>(max_attempts: usize, mut f: impl FnMut(usize) -> Result<T>) -> Result<T> {
    let mut last = None;
    for attempt in 0..max_attempts {
        match f(attempt) {
            Ok(value) => return Ok(value),
            Err(err) => {
                tracing::warn!(attempt, error = %err, "attempt failed");
                last = Some(err);
            }
        }
    }
    let last = last.unwrap_or_else(|| {
        InfluenceError::InvalidConfig("max_attempts must be at least 1".into())
    });
    Err(InfluenceError::RetriesExhausted {
        attempts: max_attempts,
        last: Box::new(last),
    })
}

/// Configuration of an experiment.
///
/// # Builder Pattern
///
/// ```
/// use u_influence::experiment::ExperimentConfig;
///
/// let config = ExperimentConfig::new("karate")
///     .with_budget(500)
///     .with_runs(3)
///     .with_majority_thresholds(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExperimentConfig {
    /// Name used in logs and chart titles.
    pub name: String,

    /// Cost budget shared by every strategy.
    pub budget: u64,

    /// Population size of the genetic searches.
    pub population_size: usize,

    /// Epochs of the genetic searches.
    pub epochs: usize,

    /// Number of independent runs.
    pub runs: usize,

    /// Use `ceil(degree / 2)` thresholds instead of random ones.
    pub majority_thresholds: bool,

    /// Seed each baseline with the best individual of the matching
    /// genetic search instead of its own ordering.
    pub best_as_baseline_seed: bool,

    /// Attempts granted to the degree/cost genetic search.
    pub max_retries: usize,

    /// Inclusive range of node costs.
    pub cost_range: (u64, u64),

    /// Random seed for reproducibility. `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            name: "experiment".into(),
            budget: 500,
            population_size: 20,
            epochs: 50,
            runs: 1,
            majority_thresholds: false,
            best_as_baseline_seed: false,
            max_retries: 10,
            cost_range: (1, 100),
            seed: None,
        }
    }
}

impl ExperimentConfig {
    /// Default configuration with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the cost budget.
    pub fn with_budget(mut self, budget: u64) -> Self {
        self.budget = budget;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of epochs.
    pub fn with_epochs(mut self, n: usize) -> Self {
        self.epochs = n;
        self
    }

    /// Sets the number of runs.
    pub fn with_runs(mut self, n: usize) -> Self {
        self.runs = n;
        self
    }

    /// Enables or disables majority thresholds.
    pub fn with_majority_thresholds(mut self, enabled: bool) -> Self {
        self.majority_thresholds = enabled;
        self
    }

    /// Enables or disables seeding baselines with the genetic best.
    pub fn with_best_as_baseline_seed(mut self, enabled: bool) -> Self {
        self.best_as_baseline_seed = enabled;
        self
    }

    /// Sets the retry cap of the degree/cost search.
    pub fn with_max_retries(mut self, n: usize) -> Self {
        self.max_retries = n;
        self
    }

    /// Sets the inclusive cost range.
    pub fn with_cost_range(mut self, min: u64, max: u64) -> Self {
        self.cost_range = (min, max);
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Cost model drawn at the start of every run.
    pub fn cost_model(&self) -> CostModelConfig {
        let mode = if self.majority_thresholds {
            ThresholdMode::Majority
        } else {
            ThresholdMode::default()
        };
        CostModelConfig::default()
            .with_cost_range(self.cost_range.0, self.cost_range.1)
            .with_threshold_mode(mode)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.runs == 0 {
            return Err("runs must be at least 1".into());
        }
        if self.max_retries == 0 {
            return Err("max_retries must be at least 1".into());
        }
        self.cost_model().validate()?;
        self.search_config(SearchConfig::random(self.budget)).validate()
    }

    fn search_config(&self, preset: SearchConfig) -> SearchConfig {
        preset
            .with_population_size(self.population_size)
            .with_epochs(self.epochs)
    }
}

/// One line of a comparison chart.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrategySeries {
    /// Strategy name.
    pub name: String,
    /// Color tag for plotting.
    pub color: String,
    /// Score per epoch.
    pub epoch_scores: BTreeMap<usize, usize>,
}

impl StrategySeries {
    /// Series of a genetic search.
    pub fn from_search<N: Node>(name: &str, color: &str, result: &SearchResult<N>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            epoch_scores: result.epoch_scores.clone(),
        }
    }

    /// A single score held flat over `epochs` epochs.
    pub fn flat(name: &str, color: &str, score: usize, epochs: usize) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            epoch_scores: (0..epochs).map(|e| (e, score)).collect(),
        }
    }

    /// Highest score of the series.
    pub fn best(&self) -> Option<usize> {
        self.epoch_scores.values().copied().max()
    }
}

/// Score-per-epoch series of every strategy in a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComparisonChart {
    /// Chart title.
    pub title: String,
    /// One series per strategy, in insertion order.
    pub series: Vec<StrategySeries>,
}

impl ComparisonChart {
    /// Empty chart.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            series: Vec::new(),
        }
    }

    /// Appends a series.
    pub fn push(&mut self, series: StrategySeries) {
        self.series.push(series);
    }

    /// Looks up a series by name.
    pub fn get(&self, name: &str) -> Option<&StrategySeries> {
        self.series.iter().find(|s| s.name == name)
    }

    /// Name and best score of the strongest series.
    pub fn winner(&self) -> Option<(&str, usize)> {
        self.series
            .iter()
            .filter_map(|s| s.best().map(|b| (s.name.as_str(), b)))
            .fold(None, |acc, (name, b)| match acc {
                Some((_, best)) if best >= b => acc,
                _ => Some((name, b)),
            })
    }
}

/// Everything produced by one run.
#[derive(Debug, Clone)]
pub struct RunReport<N: Node> {
    /// Zero-based run index.
    pub run: usize,
    /// Node costs drawn for this run.
    pub costs: NodeCosts<N>,
    /// Node thresholds drawn for this run.
    pub thresholds: NodeThresholds<N>,
    /// Degree baseline.
    pub degree: BaselineResult<N>,
    /// Degree/cost baseline.
    pub degree_cost: BaselineResult<N>,
    /// Random-permutation genetic search.
    pub genetic_random: SearchResult<N>,
    /// Degree genetic search.
    pub genetic_degree: SearchResult<N>,
    /// Degree/cost genetic search.
    pub genetic_degree_cost: SearchResult<N>,
    /// Series of all five strategies.
    pub chart: ComparisonChart,
}

/// Runs an [`ExperimentConfig`] on a graph.
#[derive(Debug, Clone)]
pub struct Experiment {
    config: ExperimentConfig,
}

impl Experiment {
    /// Creates an experiment.
    pub fn new(config: ExperimentConfig) -> Self {
        Self { config }
    }

    /// The experiment's configuration.
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Executes every run.
    ///
    /// # Errors
    /// [`InfluenceError::InvalidConfig`] for an invalid configuration. Any
    /// error from a baseline or from the random and degree searches ends
    /// the experiment; the degree/cost search fails only after
    /// `max_retries` attempts.
    pub fn run<G: Graph>(&self, graph: &G) -> Result<Vec<RunReport<G::Node>>> {
        self.config.validate().map_err(InfluenceError::InvalidConfig)?;

        let _span = tracing::info_span!("experiment", name = %self.config.name).entered();
        tracing::info!(
            nodes = graph.number_of_nodes(),
            edges = graph.number_of_edges(),
            max_degree = max_degree(graph),
            "starting experiment"
        );

        let mut rng = rng_from(self.config.seed);
        let reports = (0..self.config.runs)
            .map(|run| self.run_once(graph, run, &mut rng))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(runs = reports.len(), "experiment finished");
        Ok(reports)
    }

    fn run_once<G: Graph, R: Rng>(
        &self,
        graph: &G,
        run: usize,
        rng: &mut R,
    ) -> Result<RunReport<G::Node>> {
        let cfg = &self.config;
        let _span = tracing::info_span!("run", run).entered();

        let (costs, thresholds) = cfg.cost_model().generate(graph, rng);
        tracing::info!(total_cost = costs.total(), budget = cfg.budget, "cost model drawn");

        let genetic_random = SearchRunner::run(
            graph,
            &costs,
            &thresholds,
            &cfg.search_config(SearchConfig::random(cfg.budget)).with_seed(rng.random()),
        )?;
        let genetic_degree = SearchRunner::run(
            graph,
            &costs,
            &thresholds,
            &cfg.search_config(SearchConfig::degree(cfg.budget)).with_seed(rng.random()),
        )?;
        let genetic_degree_cost = retry(cfg.max_retries, |attempt| {
            let seed: u64 = rng.random();
            tracing::debug!(attempt, seed, "degree/cost search attempt");
            SearchRunner::run(
                graph,
                &costs,
                &thresholds,
                &cfg.search_config(SearchConfig::degree_cost(cfg.budget)).with_seed(seed),
            )
        })?;

        let (degree_start, degree_cost_start) = if cfg.best_as_baseline_seed {
            (
                Some(genetic_degree.best_seed_set()),
                Some(genetic_degree_cost.best_seed_set()),
            )
        } else {
            (None, None)
        };
        let degree = Baseline::Degree.run(graph, &costs, &thresholds, cfg.budget, degree_start)?;
        let degree_cost = Baseline::DegreeCost.run(
            graph,
            &costs,
            &thresholds,
            cfg.budget,
            degree_cost_start,
        )?;

        let mut chart = ComparisonChart::new(format!("{} (run {})", cfg.name, run));
        chart.push(StrategySeries::flat("degree", "red", degree.score, cfg.epochs));
        chart.push(StrategySeries::flat(
            "degree/cost",
            "orange",
            degree_cost.score,
            cfg.epochs,
        ));
        chart.push(StrategySeries::from_search("genetic", "blue", &genetic_random));
        chart.push(StrategySeries::from_search(
            "genetic degree",
            "green",
            &genetic_degree,
        ));
        chart.push(StrategySeries::from_search(
            "genetic degree/cost",
            "purple",
            &genetic_degree_cost,
        ));

        if let Some((name, score)) = chart.winner() {
            tracing::info!(winner = name, score, "run finished");
        }

        Ok(RunReport {
            run,
            costs,
            thresholds,
            degree,
            degree_cost,
            genetic_random,
            genetic_degree,
            genetic_degree_cost,
            chart,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencyGraph;
    use crate::random::create_rng;

    fn small_config() -> ExperimentConfig {
        ExperimentConfig::new("test")
            .with_budget(8)
            .with_population_size(6)
            .with_epochs(3)
            .with_cost_range(1, 3)
            .with_seed(11)
    }

    fn graph() -> AdjacencyGraph<usize> {
        let mut rng = create_rng(5);
        AdjacencyGraph::gnp(40, 0.1, &mut rng)
    }

    #[test]
    fn test_retry_succeeds_eventually() {
        let mut calls = 0;
        let r = retry(5, |attempt| {
            calls += 1;
            if attempt == 3 {
                Ok("done")
            } else {
                Err(InfluenceError::InvalidConfig("x".into()))
            }
        });
        assert_eq!(r, Ok("done"));
        assert_eq!(calls, 4);
    }

    #[test]
    fn test_retry_exhausted_keeps_last_error() {
        let r: Result<()> = retry(3, |attempt| {
            Err(InfluenceError::GenerationExhausted {
                requested: 4,
                produced: attempt,
                attempts: 20,
            })
        });
        match r {
            Err(InfluenceError::RetriesExhausted { attempts, last }) => {
                assert_eq!(attempts, 3);
                assert_eq!(
                    *last,
                    InfluenceError::GenerationExhausted {
                        requested: 4,
                        produced: 2,
                        attempts: 20
                    }
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_retry_zero_attempts() {
        let r: Result<()> = retry(0, |_| Ok(()));
        assert!(matches!(r, Err(InfluenceError::RetriesExhausted { attempts: 0, .. })));
    }

    #[test]
    fn test_config_defaults() {
        let c = ExperimentConfig::default();
        assert_eq!(c.max_retries, 10);
        assert_eq!(c.runs, 1);
        assert!(!c.majority_thresholds);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(small_config().with_runs(0).validate().is_err());
        assert!(small_config().with_max_retries(0).validate().is_err());
        assert!(small_config().with_cost_range(5, 1).validate().is_err());
        assert!(small_config().with_population_size(1).validate().is_err());
    }

    #[test]
    fn test_majority_switches_threshold_mode() {
        let c = small_config().with_majority_thresholds(true);
        assert_eq!(c.cost_model().threshold_mode, ThresholdMode::Majority);
    }

    #[test]
    fn test_run_produces_chart_per_run() {
        let g = graph();
        let reports = Experiment::new(small_config().with_runs(2)).run(&g).unwrap();
        assert_eq!(reports.len(), 2);
        for (i, r) in reports.iter().enumerate() {
            assert_eq!(r.run, i);
            assert_eq!(r.chart.series.len(), 5);
            let degree = r.chart.get("degree").unwrap();
            assert_eq!(degree.epoch_scores.len(), 3);
            assert_eq!(degree.best(), Some(r.degree.score));
            assert_eq!(
                r.chart.get("genetic").unwrap().best(),
                Some(r.genetic_random.best_score)
            );
        }
    }

    #[test]
    fn test_run_is_reproducible() {
        let g = graph();
        let a = Experiment::new(small_config()).run(&g).unwrap();
        let b = Experiment::new(small_config()).run(&g).unwrap();
        assert_eq!(a[0].chart, b[0].chart);
    }

    #[test]
    fn test_best_as_baseline_seed() {
        let g = graph();
        let reports = Experiment::new(small_config().with_best_as_baseline_seed(true))
            .run(&g)
            .unwrap();
        let r = &reports[0];
        assert_eq!(r.degree.score, r.genetic_degree.best_score);
        assert_eq!(r.degree_cost.score, r.genetic_degree_cost.best_score);
    }

    #[test]
    fn test_infeasible_budget_fails() {
        let g = graph();
        let err = Experiment::new(small_config().with_budget(10_000))
            .run(&g)
            .unwrap_err();
        assert!(matches!(err, InfluenceError::InfeasibleBudget { .. }));
    }

    #[test]
    fn test_chart_winner() {
        let mut chart = ComparisonChart::new("t");
        chart.push(StrategySeries::flat("a", "red", 3, 2));
        chart.push(StrategySeries::flat("b", "blue", 7, 2));
        chart.push(StrategySeries::flat("c", "green", 7, 2));
        assert_eq!(chart.winner(), Some(("b", 7)));
        assert!(ComparisonChart::new("empty").winner().is_none());
    }
}
