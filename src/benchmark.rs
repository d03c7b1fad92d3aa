//! Benchmarking and experimentation module.
//!
//! Runs every algorithm allowed by the size limits on a set of instances,
//! collects timing and cost results, and compares heuristic tours against
//! the exact optimum.

use crate::error::Result;
use crate::instance::{GeneratorConfig, Instance};
use crate::solver::{Algorithm, SolverConfig};

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Result of running a single algorithm on an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmResult {
    /// Algorithm name
    pub algorithm: String,
    /// Instance name
    pub instance: String,
    /// Number of stops besides home
    pub stops: usize,
    /// Route cost
    pub cost: f64,
    /// Route as `A -> B -> A`
    pub route: String,
    /// Computation time in seconds
    pub time: f64,
    /// Gap to the exact optimum in percent (if an exact algorithm ran)
    pub gap_to_optimal: Option<f64>,
    /// When the run finished (RFC 3339)
    pub timestamp: String,
}

/// Aggregated statistics for an algorithm
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmStatistics {
    pub algorithm: String,
    pub num_instances: usize,
    pub avg_cost: f64,
    pub best_cost: f64,
    pub worst_cost: f64,
    pub std_cost: f64,
    pub avg_time: f64,
    pub total_time: f64,
    pub avg_gap: Option<f64>,
    /// Instances where the route cost matched the optimum
    pub num_optimal: usize,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Size limits for the exact algorithms
    pub solver: SolverConfig,
    /// Solve instances in parallel
    pub parallel: bool,
    /// Show a progress bar
    pub show_progress: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            solver: SolverConfig::default(),
            parallel: true,
            show_progress: false,
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<AlgorithmResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
        }
    }

    /// Run all permitted algorithms on one instance
    pub fn run_instance(&self, instance: &Instance) -> Result<Vec<AlgorithmResult>> {
        log::info!("Running benchmark on instance: {}", instance.name);

        let runs = self
            .config
            .solver
            .run_all(&instance.matrix, &instance.home, &instance.visit)?;

        let optimal = runs
            .iter()
            .filter(|run| run.algorithm.is_exact())
            .map(|run| run.solution.cost)
            .reduce(f64::min);

        let timestamp = chrono::Local::now().to_rfc3339();

        Ok(runs
            .into_iter()
            .map(|run| AlgorithmResult {
                algorithm: run.algorithm.name().to_string(),
                instance: instance.name.clone(),
                stops: instance.num_stops(),
                cost: run.solution.cost,
                route: run.solution.route.join(" -> "),
                time: run.elapsed,
                gap_to_optimal: optimal.map(|opt| gap_percent(run.solution.cost, opt)),
                timestamp: timestamp.clone(),
            })
            .collect())
    }

    /// Run the benchmark on multiple instances
    pub fn run_on_instances(&mut self, instances: &[Instance]) -> Result<()> {
        let progress = if self.config.show_progress {
            let bar = ProgressBar::new(instances.len() as u64);
            bar.set_style(ProgressStyle::default_bar());
            bar
        } else {
            ProgressBar::hidden()
        };

        let outcomes: Vec<Result<Vec<AlgorithmResult>>> = if self.config.parallel {
            instances
                .par_iter()
                .map(|instance| {
                    let outcome = self.run_instance(instance);
                    progress.inc(1);
                    outcome
                })
                .collect()
        } else {
            instances
                .iter()
                .map(|instance| {
                    let outcome = self.run_instance(instance);
                    progress.inc(1);
                    outcome
                })
                .collect()
        };

        progress.finish_and_clear();

        for outcome in outcomes {
            self.results.extend(outcome?);
        }
        Ok(())
    }

    /// Generate `count` random instances from `base` (seeds `base.seed`, `base.seed + 1`, ... wrapping at `u64::MAX`) and run them
    pub fn run_random(&mut self, base: &GeneratorConfig, count: usize) -> Result<()> {
        let instances = (0..count as u64)
            .map(|offset| {
                Instance::random(&GeneratorConfig {
                    seed: base.seed.wrapping_add(offset),
                    ..base.clone()
                })
            })
            .collect::<Result<Vec<_>>>()?;
        self.run_on_instances(&instances)
    }

    /// Compute statistics for each algorithm
    pub fn compute_statistics(&self) -> Vec<AlgorithmStatistics> {
        let mut by_algorithm: HashMap<&str, Vec<&AlgorithmResult>> = HashMap::new();
        for result in &self.results {
            by_algorithm
                .entry(result.algorithm.as_str())
                .or_default()
                .push(result);
        }

        let mut statistics: Vec<AlgorithmStatistics> = by_algorithm
            .into_iter()
            .map(|(algorithm, results)| {
                let costs: Vec<f64> = results.iter().map(|r| r.cost).collect();
                let times: Vec<f64> = results.iter().map(|r| r.time).collect();
                let gaps: Vec<f64> = results.iter().filter_map(|r| r.gap_to_optimal).collect();

                let std_cost = if costs.len() > 1 { costs.iter().std_dev() } else { 0.0 };

                AlgorithmStatistics {
                    algorithm: algorithm.to_string(),
                    num_instances: results.len(),
                    avg_cost: costs.iter().mean(),
                    best_cost: costs.iter().cloned().fold(f64::INFINITY, f64::min),
                    worst_cost: costs.iter().cloned().fold(0.0, f64::max),
                    std_cost,
                    avg_time: times.iter().mean(),
                    total_time: times.iter().sum(),
                    avg_gap: (!gaps.is_empty()).then(|| gaps.iter().mean()),
                    num_optimal: gaps.iter().filter(|&&g| g.abs() < 1e-9).count(),
                }
            })
            .collect();

        statistics.sort_by(|a, b| a.avg_cost.total_cmp(&b.avg_cost).then_with(|| a.algorithm.cmp(&b.algorithm)));
        statistics
    }

    /// Export results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_writer(File::create(path)?);
        for result in &self.results {
            writer.serialize(result)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Export statistics to CSV
    pub fn export_statistics_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_writer(File::create(path)?);
        for stat in self.compute_statistics() {
            writer.serialize(stat)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("          TSP Benchmark Report\n");
        report.push_str("========================================\n\n");

        report.push_str("Algorithm Performance Summary:\n");
        report.push_str("-".repeat(88).as_str());
        report.push('\n');
        report.push_str(&format!(
            "{:<22} {:>10} {:>12} {:>12} {:>10} {:>8} {:>10}\n",
            "Algorithm", "Instances", "Avg Cost", "Best Cost", "Avg Gap%", "Optimal", "Avg Time"
        ));
        report.push_str("-".repeat(88).as_str());
        report.push('\n');

        for stat in self.compute_statistics() {
            let gap_str = stat
                .avg_gap
                .map(|g| format!("{:.2}%", g))
                .unwrap_or_else(|| "-".to_string());

            report.push_str(&format!(
                "{:<22} {:>10} {:>12.2} {:>12.2} {:>10} {:>8} {:>10.6}\n",
                stat.algorithm,
                stat.num_instances,
                stat.avg_cost,
                stat.best_cost,
                gap_str,
                stat.num_optimal,
                stat.avg_time
            ));
        }

        report.push_str("-".repeat(88).as_str());
        report.push('\n');

        report.push_str("\nComplexity:\n");
        for algorithm in Algorithm::ALL {
            report.push_str(&format!("  {:<22} {}\n", algorithm.name(), algorithm.complexity()));
        }

        report.push_str("\nBest Routes per Instance:\n");
        let mut instance_best: Vec<(&str, &AlgorithmResult)> = Vec::new();
        for result in &self.results {
            match instance_best.iter_mut().find(|(name, _)| *name == result.instance) {
                Some(entry) if result.cost < entry.1.cost => entry.1 = result,
                Some(_) => {}
                None => instance_best.push((result.instance.as_str(), result)),
            }
        }
        for (instance, best) in instance_best {
            report.push_str(&format!(
                "  {}: {:.2} ({}) {}\n",
                instance, best.cost, best.algorithm, best.route
            ));
        }

        report
    }

    /// Get all results
    pub fn results(&self) -> &[AlgorithmResult] {
        &self.results
    }
}

fn gap_percent(cost: f64, optimal: f64) -> f64 {
    if optimal > 0.0 {
        (cost - optimal) / optimal * 100.0
    } else {
        0.0
    }
}

/// Load every `*.json` instance in a directory, smallest first
pub fn load_instances_from_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<Instance>> {
    let mut instances = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            match Instance::from_file(&path) {
                Ok(instance) => instances.push(instance),
                Err(e) => log::warn!("Skipping {:?}: {}", path, e),
            }
        }
    }

    instances.sort_by(|a, b| a.num_stops().cmp(&b.num_stops()).then_with(|| a.name.cmp(&b.name)));

    Ok(instances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::CostModel;

    fn small_config() -> GeneratorConfig {
        GeneratorConfig {
            num_cities: 8,
            num_stops: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_benchmark_config() {
        let config = BenchmarkConfig::default();
        assert!(config.parallel);
        assert_eq!(config.solver.max_brute_force, 10);
    }

    #[test]
    fn test_run_random() {
        let mut benchmark = Benchmark::new(BenchmarkConfig::default());
        benchmark.run_random(&small_config(), 6).unwrap();

        assert_eq!(benchmark.results().len(), 18);
        for result in benchmark.results() {
            let gap = result.gap_to_optimal.unwrap();
            assert!(gap >= -1e-9);
            if result.algorithm != "Nearest Neighbor" {
                assert!(gap.abs() < 1e-9);
            }
        }

        let stats = benchmark.compute_statistics();
        assert_eq!(stats.len(), 3);
        let dp = stats.iter().find(|s| s.algorithm == "Dynamic Programming").unwrap();
        assert_eq!(dp.num_instances, 6);
        assert_eq!(dp.num_optimal, 6);
        assert!(stats[0].avg_cost <= stats[2].avg_cost);

        let report = benchmark.generate_report();
        assert!(report.contains("Nearest Neighbor"));
        assert!(report.contains("O(n²·2ⁿ)"));
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let instances: Vec<Instance> = (0..3)
            .map(|seed| Instance::random(&GeneratorConfig { seed, ..small_config() }).unwrap())
            .collect();

        let mut parallel = Benchmark::new(BenchmarkConfig::default());
        parallel.run_on_instances(&instances).unwrap();
        let mut sequential = Benchmark::new(BenchmarkConfig {
            parallel: false,
            ..Default::default()
        });
        sequential.run_on_instances(&instances).unwrap();

        let costs = |b: &Benchmark| b.results().iter().map(|r| r.cost).collect::<Vec<_>>();
        assert_eq!(costs(&parallel), costs(&sequential));
    }

    #[test]
    fn test_limits_skip_exact_algorithms() {
        let config = BenchmarkConfig {
            solver: SolverConfig {
                max_brute_force: 3,
                max_dynamic_programming: 3,
            },
            ..Default::default()
        };
        let mut benchmark = Benchmark::new(config);
        benchmark.run_random(&small_config(), 2).unwrap();

        assert_eq!(benchmark.results().len(), 2);
        assert!(benchmark.results().iter().all(|r| r.gap_to_optimal.is_none()));
    }

    #[test]
    fn test_run_random_seed_wraps() {
        let mut benchmark = Benchmark::new(BenchmarkConfig::default());
        let base = GeneratorConfig {
            seed: u64::MAX,
            ..small_config()
        };
        benchmark.run_random(&base, 2).unwrap();
        assert_eq!(benchmark.results().len(), 6);

        let names: Vec<&str> = benchmark.results().iter().map(|r| r.instance.as_str()).collect();
        assert_eq!(names[0], format!("random-8-5-{}", u64::MAX));
        assert_eq!(names[3], "random-8-5-0");
    }

    #[test]
    fn test_export_and_load() {
        let dir = tempfile::tempdir().unwrap();
        for seed in 0..2 {
            let config = GeneratorConfig {
                seed,
                cost_model: CostModel::Euclidean,
                ..small_config()
            };
            Instance::random(&config)
                .unwrap()
                .to_file(dir.path().join(format!("inst{}.json", seed)))
                .unwrap();
        }
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let instances = load_instances_from_dir(dir.path()).unwrap();
        assert_eq!(instances.len(), 2);

        let mut benchmark = Benchmark::new(BenchmarkConfig::default());
        benchmark.run_on_instances(&instances).unwrap();

        let results_path = dir.path().join("results.csv");
        benchmark.export_to_csv(&results_path).unwrap();
        benchmark.export_statistics_csv(dir.path().join("statistics.csv")).unwrap();

        let csv = std::fs::read_to_string(&results_path).unwrap();
        assert!(csv.starts_with("algorithm,instance,stops,cost,route,time,gap_to_optimal,timestamp"));
        assert_eq!(csv.lines().count(), 7);
    }
}
