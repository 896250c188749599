//! Search configuration.
//!
//! [`SearchConfig`] holds every parameter of one genetic search run.

use crate::recombine::GenerationOption;
use crate::seed::{KeyScaling, OrderingStrategy};

/// Configuration for the population search loop.
///
/// # Defaults
///
/// ```
/// use u_influence::search::SearchConfig;
///
/// let config = SearchConfig::default();
/// assert_eq!(config.population_size, 20);
/// assert_eq!(config.epochs, 10);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_influence::search::SearchConfig;
///
/// let config = SearchConfig::degree_cost(500)
///     .with_population_size(40)
///     .with_epochs(50)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchConfig {
    /// Cost budget of every candidate seed set.
    pub budget: u64,

    /// Number of individuals generated at start-up.
    ///
    /// Also sizes the random injection of every generation:
    /// `(population_size - retained) / 2` fresh candidates.
    pub population_size: usize,

    /// Number of evaluate/select/repopulate cycles.
    pub epochs: usize,

    /// Ordering used for the initial population and the random injection.
    pub strategy: OrderingStrategy,

    /// Key applied to recombined orderings before the budget fill.
    pub generation_option: GenerationOption,

    /// Ranges of the per-node key multipliers.
    ///
    /// Only the degree-based strategies and generation options read them.
    /// With unscaled keys those orderings are deterministic and the search
    /// cannot find enough distinct candidates.
    pub scaling: KeyScaling,

    /// Whether the first initial candidate uses unscaled keys.
    pub with_first_total: bool,

    /// Whether to run the diffusions of one generation in parallel.
    ///
    /// Only takes effect with the `parallel` feature; diffusion is
    /// deterministic, so results do not depend on it.
    pub parallel: bool,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            budget: 50,
            population_size: 20,
            epochs: 10,
            strategy: OrderingStrategy::Random,
            generation_option: GenerationOption::Recombined,
            scaling: KeyScaling::new((0.5, 1.5), (0.5, 1.5)),
            with_first_total: true,
            parallel: false,
            seed: None,
        }
    }
}

impl SearchConfig {
    /// Random-permutation search: shuffled candidates, raw recombined order.
    pub fn random(budget: u64) -> Self {
        Self {
            budget,
            ..Self::default()
        }
    }

    /// Degree search: degree-ordered candidates, children re-keyed by degree.
    pub fn degree(budget: u64) -> Self {
        Self {
            budget,
            strategy: OrderingStrategy::Degree,
            generation_option: GenerationOption::Degree,
            ..Self::default()
        }
    }

    /// Degree/cost search: candidates and children keyed by degree/cost.
    pub fn degree_cost(budget: u64) -> Self {
        Self {
            budget,
            strategy: OrderingStrategy::DegreeCost,
            generation_option: GenerationOption::DegreeCost,
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

    /// Sets the ordering strategy.
    pub fn with_strategy(mut self, strategy: OrderingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets the generation option for recombined children.
    pub fn with_generation_option(mut self, option: GenerationOption) -> Self {
        self.generation_option = option;
        self
    }

    /// Sets the key multiplier ranges.
    pub fn with_scaling(mut self, scaling: KeyScaling) -> Self {
        self.scaling = scaling;
        self
    }

    /// Enables or disables the unscaled first candidate.
    pub fn with_first_total(mut self, enabled: bool) -> Self {
        self.with_first_total = enabled;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.budget == 0 {
            return Err("budget must be positive".into());
        }
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.epochs == 0 {
            return Err("epochs must be at least 1".into());
        }
        self.scaling.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.budget, 50);
        assert_eq!(config.population_size, 20);
        assert_eq!(config.epochs, 10);
        assert_eq!(config.strategy, OrderingStrategy::Random);
        assert_eq!(config.generation_option, GenerationOption::Recombined);
        assert!(config.with_first_total);
        assert!(!config.parallel);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_presets() {
        let d = SearchConfig::degree(100);
        assert_eq!(d.budget, 100);
        assert_eq!(d.strategy, OrderingStrategy::Degree);
        assert_eq!(d.generation_option, GenerationOption::Degree);

        let dc = SearchConfig::degree_cost(100);
        assert_eq!(dc.strategy, OrderingStrategy::DegreeCost);
        assert_eq!(dc.generation_option, GenerationOption::DegreeCost);
        assert!(dc.validate().is_ok());
    }

    #[test]
    fn test_validate_ok() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        let config = SearchConfig::default().with_population_size(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_epochs() {
        let config = SearchConfig::default().with_epochs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_budget() {
        let config = SearchConfig::default().with_budget(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_inverted_scaling() {
        let config =
            SearchConfig::default().with_scaling(KeyScaling::new((1.0, 2.0), (3.0, 1.0)));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_chainable() {
        let config = SearchConfig::degree(30).with_population_size(8).with_seed(42);
        assert_eq!(config.population_size, 8);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.strategy, OrderingStrategy::Degree);
    }
}
