//! GA configuration.
//!
//! [`GaConfig`] holds all parameters that control the generational loop.

use super::selection::Selection;
use crate::error::TimetableError;

/// Configuration for the genetic algorithm.
///
/// # Defaults
///
/// The defaults reproduce the reference timetabling scenario: 150
/// individuals for 80 generations, tournament of 3, crossover 0.7,
/// per-offspring mutation 0.2 with a per-gene rate of 0.08.
///
/// ```
/// use u_timetable::ga::GaConfig;
///
/// let config = GaConfig::default();
/// assert_eq!(config.population_size, 150);
/// assert_eq!(config.max_generations, 80);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::ga::{GaConfig, Selection};
///
/// let config = GaConfig::default()
///     .with_population_size(200)
///     .with_selection(Selection::Tournament(5))
///     .with_gene_mutation_rate(0.05)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GaConfig {
    /// Number of individuals in the population.
    pub population_size: usize,

    /// Number of generations to run. Zero returns the best initial individual.
    pub max_generations: usize,

    /// Parent selection strategy.
    pub selection: Selection,

    /// Fraction of the population copied unchanged into the next generation.
    ///
    /// Defaults to 0.0: the best-ever individual is kept in the hall of fame
    /// regardless, so in-population elitism is optional.
    pub elite_ratio: f64,

    /// Probability that a breeding pair is recombined (0.0–1.0).
    pub crossover_rate: f64,

    /// Probability that an offspring is passed through mutation (0.0–1.0).
    pub mutation_rate: f64,

    /// Per-gene probability of change once an offspring is mutated (0.0–1.0).
    pub gene_mutation_rate: f64,

    /// Whether to evaluate individuals in parallel using rayon.
    ///
    /// Ignored when the crate is built without the `parallel` feature.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` draws a fresh seed.
    pub seed: Option<u64>,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 150,
            max_generations: 80,
            selection: Selection::default(),
            elite_ratio: 0.0,
            crossover_rate: 0.7,
            mutation_rate: 0.2,
            gene_mutation_rate: 0.08,
            parallel: true,
            seed: None,
        }
    }
}

impl GaConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the selection strategy.
    pub fn with_selection(mut self, sel: Selection) -> Self {
        self.selection = sel;
        self
    }

    /// Convenience for `.with_selection(Selection::Tournament(k))`.
    pub fn with_tournament_size(self, k: usize) -> Self {
        self.with_selection(Selection::Tournament(k))
    }

    /// Sets the elite ratio.
    pub fn with_elite_ratio(mut self, ratio: f64) -> Self {
        self.elite_ratio = ratio.clamp(0.0, 1.0);
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-offspring mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-gene mutation rate.
    pub fn with_gene_mutation_rate(mut self, rate: f64) -> Self {
        self.gene_mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of individuals copied unchanged each generation.
    pub fn elite_count(&self) -> usize {
        (self.population_size as f64 * self.elite_ratio) as usize
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TimetableError::InvalidConfig`] when the population has
    /// fewer than two individuals, the tournament is empty, a rate or the
    /// elite ratio is not a number in `[0, 1]`, or elites would fill the
    /// whole population.
    pub fn validate(&self) -> Result<(), TimetableError> {
        if self.population_size < 2 {
            return Err(TimetableError::InvalidConfig(
                "population_size must be at least 2".into(),
            ));
        }
        if let Selection::Tournament(0) = self.selection {
            return Err(TimetableError::InvalidConfig(
                "tournament size must be at least 1".into(),
            ));
        }
        for (name, value) in [
            ("elite_ratio", self.elite_ratio),
            ("crossover_rate", self.crossover_rate),
            ("mutation_rate", self.mutation_rate),
            ("gene_mutation_rate", self.gene_mutation_rate),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TimetableError::InvalidConfig(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.elite_count() >= self.population_size {
            return Err(TimetableError::InvalidConfig(
                "elite_ratio too high: elites fill entire population".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GaConfig::default();
        assert_eq!(config.population_size, 150);
        assert_eq!(config.max_generations, 80);
        assert_eq!(config.selection, Selection::Tournament(3));
        assert!((config.elite_ratio - 0.0).abs() < 1e-15);
        assert!((config.crossover_rate - 0.7).abs() < 1e-10);
        assert!((config.mutation_rate - 0.2).abs() < 1e-10);
        assert!((config.gene_mutation_rate - 0.08).abs() < 1e-10);
        assert!(config.parallel);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_builder_pattern() {
        let config = GaConfig::default()
            .with_population_size(40)
            .with_max_generations(10)
            .with_selection(Selection::Rank)
            .with_elite_ratio(0.1)
            .with_crossover_rate(0.8)
            .with_mutation_rate(0.5)
            .with_gene_mutation_rate(0.1)
            .with_parallel(false)
            .with_seed(42);

        assert_eq!(config.population_size, 40);
        assert_eq!(config.max_generations, 10);
        assert_eq!(config.selection, Selection::Rank);
        assert_eq!(config.elite_count(), 4);
        assert!((config.crossover_rate - 0.8).abs() < 1e-10);
        assert!((config.mutation_rate - 0.5).abs() < 1e-10);
        assert!((config.gene_mutation_rate - 0.1).abs() < 1e-10);
        assert!(!config.parallel);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_validate_ok() {
        assert!(GaConfig::default().validate().is_ok());
        assert!(GaConfig::default().with_max_generations(0).validate().is_ok());
    }

    #[test]
    fn test_validate_population_too_small() {
        let err = GaConfig::default().with_population_size(1).validate();
        assert!(matches!(err, Err(TimetableError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_empty_tournament() {
        let config = GaConfig::default().with_tournament_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_elite_too_high() {
        let config = GaConfig::default()
            .with_population_size(10)
            .with_elite_ratio(1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan_rates() {
        let configs = [
            GaConfig::default().with_gene_mutation_rate(f64::NAN),
            GaConfig::default().with_mutation_rate(f64::NAN),
            GaConfig::default().with_crossover_rate(f64::NAN),
            GaConfig::default().with_elite_ratio(f64::NAN),
        ];
        for config in configs {
            let err = config.validate();
            assert!(matches!(err, Err(TimetableError::InvalidConfig(_))), "{config:?}");
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range_fields() {
        let mut config = GaConfig::default();
        config.crossover_rate = 1.5;
        assert!(config.validate().is_err());

        let mut config = GaConfig::default();
        config.gene_mutation_rate = -0.1;
        assert!(config.validate().is_err());

        let mut config = GaConfig::default();
        config.mutation_rate = f64::INFINITY;
        let Err(TimetableError::InvalidConfig(msg)) = config.validate() else {
            panic!("infinite mutation rate accepted");
        };
        assert!(msg.contains("mutation_rate"));
    }

    #[test]
    fn test_clamp_rates() {
        let config = GaConfig::default()
            .with_elite_ratio(1.5)
            .with_crossover_rate(-0.5)
            .with_mutation_rate(2.0)
            .with_gene_mutation_rate(-1.0);

        assert!((config.elite_ratio - 1.0).abs() < 1e-10);
        assert!((config.crossover_rate - 0.0).abs() < 1e-10);
        assert!((config.mutation_rate - 1.0).abs() < 1e-10);
        assert!((config.gene_mutation_rate - 0.0).abs() < 1e-10);
    }
}
