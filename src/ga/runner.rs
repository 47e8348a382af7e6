//! Generational loop execution.
//!
//! [`GaRunner`] drives the search through
//! initialization → evaluation → selection → variation → evaluation → …
//! for a fixed number of generations, keeping the best individual ever seen
//! in a size-1 hall of fame that survives population turnover.

use super::config::GaConfig;
use super::types::{Fitness, GaProblem, Individual};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Fitness summary of one generation's population.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStats {
    /// Generation number; 0 is the initial population.
    pub generation: usize,
    /// Lowest fitness in the population.
    pub best: f64,
    /// Mean fitness of the population.
    pub mean: f64,
    /// Highest fitness in the population.
    pub worst: f64,
}

impl GenerationStats {
    fn from_population<I: Individual>(generation: usize, population: &[I]) -> Self {
        let mut best = f64::INFINITY;
        let mut worst = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for ind in population {
            let f = ind.fitness().to_f64();
            best = best.min(f);
            worst = worst.max(f);
            sum += f;
        }
        Self {
            generation,
            best,
            mean: sum / population.len() as f64,
            worst,
        }
    }
}

/// Result of a GA run.
#[derive(Debug, Clone)]
pub struct GaResult<I: Individual> {
    /// Hall of fame: the best individual found during the entire run.
    pub best: I,

    /// Best fitness value (same as `best.fitness()`).
    pub best_fitness: I::Fitness,

    /// Number of completed generations (excluding the initial population).
    pub generations: usize,

    /// Whether the run was cancelled externally.
    pub cancelled: bool,

    /// Best-so-far fitness after the initial population and each generation.
    pub fitness_history: Vec<f64>,

    /// Population statistics for the initial population and each generation.
    pub stats: Vec<GenerationStats>,
}

/// Executes the generational loop.
///
/// # Usage
///
/// ```ignore
/// let problem = MyProblem::new();
/// let config = GaConfig::default().with_seed(42);
/// let result = GaRunner::run(&problem, &config);
/// println!("Best fitness: {:?}", result.best_fitness);
/// ```
pub struct GaRunner;

impl GaRunner {
    /// Runs the GA.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call [`GaConfig::validate`] first
    /// to get a descriptive error).
    pub fn run<P: GaProblem>(problem: &P, config: &GaConfig) -> GaResult<P::Individual> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs the GA with an optional cancellation token.
    ///
    /// The flag is checked between generations only; a generation that has
    /// started always completes, so the hall of fame is never observed in a
    /// half-updated state.
    pub fn run_with_cancel<P: GaProblem>(
        problem: &P,
        config: &GaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> GaResult<P::Individual> {
        if let Err(e) = config.validate() {
            panic!("invalid GaConfig: {e}");
        }

        let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));

        // 1. Initialize population
        let mut population: Vec<P::Individual> = (0..config.population_size)
            .map(|_| problem.create_individual(&mut rng))
            .collect();

        // 2. Evaluate initial population
        evaluate_all(problem, &mut population, config.parallel);

        // 3. Hall of fame
        let mut best = find_best(&population).clone();
        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        let mut stats = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(best.fitness().to_f64());
        stats.push(GenerationStats::from_population(0, &population));

        let elite_count = config.elite_count();
        let mut completed = 0usize;
        let mut cancelled = false;

        // 4. Generational loop
        for gen in 1..=config.max_generations {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            let mut next_gen: Vec<P::Individual> = Vec::with_capacity(config.population_size);
            if elite_count > 0 {
                population.sort_by(|a, b| {
                    a.fitness()
                        .partial_cmp(&b.fitness())
                        .unwrap_or(std::cmp::Ordering::Equal)
                });
                next_gen.extend_from_slice(&population[..elite_count]);
            }

            // Selection: fill the breeding pool
            let mut pool: Vec<P::Individual> = (elite_count..config.population_size)
                .map(|_| population[config.selection.select(&population, &mut rng)].clone())
                .collect();
            let mut dirty = vec![false; pool.len()];

            // Variation: crossover on consecutive pairs
            for i in (1..pool.len()).step_by(2) {
                if rng.random_range(0.0..1.0) < config.crossover_rate {
                    let mut children = problem
                        .crossover(&pool[i - 1], &pool[i], &mut rng)
                        .into_iter();
                    if let Some(c1) = children.next() {
                        pool[i - 1] = c1;
                        dirty[i - 1] = true;
                    }
                    if let Some(c2) = children.next() {
                        pool[i] = c2;
                        dirty[i] = true;
                    }
                }
            }

            // Variation: mutation per offspring
            for (child, changed) in pool.iter_mut().zip(dirty.iter_mut()) {
                if rng.random_range(0.0..1.0) < config.mutation_rate {
                    problem.mutate(child, &mut rng);
                    *changed = true;
                }
            }

            // Re-evaluate only offspring that changed
            let mut offspring: Vec<&mut P::Individual> = pool
                .iter_mut()
                .zip(dirty.iter())
                .filter_map(|(ind, &d)| d.then_some(ind))
                .collect();
            evaluate_refs(problem, &mut offspring, config.parallel);

            next_gen.append(&mut pool);
            population = next_gen;

            // Hall of fame update, single writer after the fan-in
            let gen_best = find_best(&population);
            if gen_best.fitness() < best.fitness() {
                best = gen_best.clone();
            }

            let gen_stats = GenerationStats::from_population(gen, &population);
            debug!(
                generation = gen,
                best = best.fitness().to_f64(),
                population_best = gen_stats.best,
                mean = gen_stats.mean,
                "generation complete"
            );
            fitness_history.push(best.fitness().to_f64());
            stats.push(gen_stats);
            completed = gen;

            problem.on_generation(gen, best.fitness());
        }

        GaResult {
            best_fitness: best.fitness(),
            best,
            generations: completed,
            cancelled,
            fitness_history,
            stats,
        }
    }
}

/// Evaluate every individual in the population.
fn evaluate_all<P: GaProblem>(problem: &P, population: &mut [P::Individual], parallel: bool) {
    let mut refs: Vec<&mut P::Individual> = population.iter_mut().collect();
    evaluate_refs(problem, &mut refs, parallel);
}

/// Evaluate a set of individuals, fanning out over rayon when enabled.
fn evaluate_refs<P: GaProblem>(problem: &P, individuals: &mut [&mut P::Individual], parallel: bool) {
    #[cfg(feature = "parallel")]
    {
        if parallel {
            individuals.par_iter_mut().for_each(|ind| {
                let f = problem.evaluate(ind);
                ind.set_fitness(f);
            });
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    for ind in individuals.iter_mut() {
        let f = problem.evaluate(ind);
        ind.set_fitness(f);
    }
}

/// Find the individual with the best (lowest) fitness.
fn find_best<I: Individual>(population: &[I]) -> &I {
    population
        .iter()
        .min_by(|a, b| {
            a.fitness()
                .partial_cmp(&b.fitness())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .expect("population must not be empty")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::Selection;

    // ---- OneMax: minimize the number of false bits ----

    #[derive(Clone, Debug)]
    struct BitString {
        bits: Vec<bool>,
        fitness: f64,
    }

    impl Individual for BitString {
        type Fitness = f64;
        fn fitness(&self) -> f64 {
            self.fitness
        }
        fn set_fitness(&mut self, f: f64) {
            self.fitness = f;
        }
    }

    struct OneMaxProblem {
        n: usize,
    }

    impl GaProblem for OneMaxProblem {
        type Individual = BitString;

        fn create_individual<R: Rng>(&self, rng: &mut R) -> BitString {
            BitString {
                bits: (0..self.n).map(|_| rng.random_bool(0.5)).collect(),
                fitness: f64::INFINITY,
            }
        }

        fn evaluate(&self, ind: &BitString) -> f64 {
            ind.bits.iter().filter(|&&b| !b).count() as f64
        }

        fn crossover<R: Rng>(&self, p1: &BitString, p2: &BitString, rng: &mut R) -> Vec<BitString> {
            let point = rng.random_range(0..self.n);
            let mut c1 = p1.clone();
            let mut c2 = p2.clone();
            c1.bits[point..].copy_from_slice(&p2.bits[point..]);
            c2.bits[point..].copy_from_slice(&p1.bits[point..]);
            vec![c1, c2]
        }

        fn mutate<R: Rng>(&self, ind: &mut BitString, rng: &mut R) {
            let idx = rng.random_range(0..self.n);
            ind.bits[idx] = !ind.bits[idx];
        }
    }

    fn sequential(config: GaConfig) -> GaConfig {
        config.with_seed(42).with_parallel(false)
    }

    #[test]
    fn test_onemax_convergence() {
        let problem = OneMaxProblem { n: 20 };
        let config = sequential(
            GaConfig::default()
                .with_population_size(50)
                .with_max_generations(100)
                .with_mutation_rate(0.5),
        );

        let result = GaRunner::run(&problem, &config);

        assert!(
            result.best_fitness <= 3.0,
            "expected at most 3 false bits, got {}",
            result.best_fitness
        );
        assert_eq!(result.generations, 100);
        assert!(!result.cancelled);
    }

    #[test]
    fn test_hall_of_fame_is_monotone_without_elitism() {
        let problem = OneMaxProblem { n: 16 };
        let config = sequential(
            GaConfig::default()
                .with_population_size(20)
                .with_max_generations(40)
                .with_mutation_rate(1.0),
        );

        let result = GaRunner::run(&problem, &config);

        for window in result.fitness_history.windows(2) {
            assert!(
                window[1] <= window[0],
                "hall of fame regressed: {} > {}",
                window[1],
                window[0]
            );
        }
        let best_seen = result
            .stats
            .iter()
            .map(|s| s.best)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(result.best_fitness, best_seen);
    }

    #[test]
    fn test_zero_generations_returns_best_initial() {
        let problem = OneMaxProblem { n: 12 };
        let config = sequential(GaConfig::default().with_population_size(30).with_max_generations(0));

        let result = GaRunner::run(&problem, &config);

        assert_eq!(result.generations, 0);
        assert_eq!(result.stats.len(), 1);
        assert_eq!(result.fitness_history, vec![result.stats[0].best]);
        assert_eq!(result.best_fitness, problem.evaluate(&result.best));
    }

    #[test]
    fn test_history_lengths() {
        let problem = OneMaxProblem { n: 10 };
        let config = sequential(GaConfig::default().with_population_size(20).with_max_generations(30));

        let result = GaRunner::run(&problem, &config);

        assert_eq!(result.fitness_history.len(), 31);
        assert_eq!(result.stats.len(), 31);
        assert_eq!(result.stats[30].generation, 30);
        for s in &result.stats {
            assert!(s.best <= s.mean && s.mean <= s.worst);
        }
    }

    #[test]
    fn test_same_seed_same_result() {
        let problem = OneMaxProblem { n: 24 };
        let config = sequential(GaConfig::default().with_population_size(30).with_max_generations(20));

        let a = GaRunner::run(&problem, &config);
        let b = GaRunner::run(&problem, &config);

        assert_eq!(a.best.bits, b.best.bits);
        assert_eq!(a.fitness_history, b.fitness_history);
    }

    #[test]
    fn test_cancellation_before_first_generation() {
        let problem = OneMaxProblem { n: 20 };
        let config = sequential(GaConfig::default().with_population_size(20).with_max_generations(1000));

        let cancel = Arc::new(AtomicBool::new(true));
        let result = GaRunner::run_with_cancel(&problem, &config, Some(cancel));

        assert!(result.cancelled);
        assert_eq!(result.generations, 0);
        assert_eq!(result.fitness_history.len(), 1);
    }

    #[test]
    fn test_elitism_keeps_population_best() {
        let problem = OneMaxProblem { n: 10 };
        let config = sequential(
            GaConfig::default()
                .with_population_size(20)
                .with_max_generations(30)
                .with_elite_ratio(0.1),
        );

        let result = GaRunner::run(&problem, &config);

        for window in result.stats.windows(2) {
            assert!(window[1].best <= window[0].best);
        }
    }

    #[test]
    fn test_rank_selection_runs() {
        let problem = OneMaxProblem { n: 10 };
        let config = sequential(
            GaConfig::default()
                .with_population_size(30)
                .with_max_generations(30)
                .with_selection(Selection::Rank),
        );

        let result = GaRunner::run(&problem, &config);
        assert!(result.best_fitness < 5.0);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let problem = OneMaxProblem { n: 20 };
        let config = GaConfig::default()
            .with_population_size(40)
            .with_max_generations(25)
            .with_seed(9);

        let seq = GaRunner::run(&problem, &config.clone().with_parallel(false));
        let par = GaRunner::run(&problem, &config.with_parallel(true));

        // Evaluation is pure and the RNG is only used on the coordinating
        // thread, so both runs follow the same trajectory.
        assert_eq!(seq.fitness_history, par.fitness_history);
        assert_eq!(seq.best.bits, par.best.bits);
    }

    #[test]
    #[should_panic(expected = "invalid GaConfig")]
    fn test_invalid_config_panics() {
        let problem = OneMaxProblem { n: 4 };
        let config = GaConfig::default().with_population_size(1);
        GaRunner::run(&problem, &config);
    }
}
