//! TSP Solver - Command Line Interface
//!
//! Solves, generates, analyzes and benchmarks TSP instances.

use clap::{Parser, Subcommand, ValueEnum};
use tsp_solver::benchmark::{load_instances_from_dir, Benchmark, BenchmarkConfig};
use tsp_solver::instance::{CostModel, GeneratorConfig, Instance};
use tsp_solver::solver::{best_run, Algorithm, SolverConfig};
use tsp_solver::{Result, TspError};

use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "tsp-solver")]
#[command(author = "M2 AI2D Student")]
#[command(version = "1.0")]
#[command(about = "Exact and heuristic solvers for the Traveling Salesman Problem")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Parameters of a generated instance
#[derive(clap::Args)]
struct GeneratorArgs {
    /// Number of cities of a generated instance
    #[arg(long, default_value = "10")]
    cities: usize,

    /// Number of cities to visit in a generated instance
    #[arg(long, default_value = "4")]
    stops: usize,

    /// Cost model of a generated instance
    #[arg(long, value_enum, default_value = "uniform")]
    cost_model: CostModelArg,

    /// Random seed
    #[arg(short, long, default_value = "42")]
    seed: u64,
}

impl GeneratorArgs {
    fn config(&self) -> GeneratorConfig {
        GeneratorConfig {
            num_cities: self.cities,
            num_stops: self.stops,
            cost_model: self.cost_model.into(),
            seed: self.seed,
            ..Default::default()
        }
    }
}

/// Where an instance comes from
#[derive(clap::Args)]
struct InstanceArgs {
    /// Path to a JSON instance file (a random instance is generated when omitted)
    #[arg(short, long)]
    instance: Option<PathBuf>,

    #[command(flatten)]
    generator: GeneratorArgs,
}

impl InstanceArgs {
    fn load(&self) -> Result<Instance> {
        match &self.instance {
            Some(path) => {
                println!("Loading instance from {:?}...", path);
                Instance::from_file(path)
            }
            None => Instance::random(&self.generator.config()),
        }
    }
}

/// Size limits for the exact algorithms
#[derive(clap::Args)]
struct LimitArgs {
    /// Largest number of stops handed to brute force
    #[arg(long, default_value = "10")]
    max_brute_force: usize,

    /// Largest number of stops handed to dynamic programming
    #[arg(long, default_value = "20")]
    max_dynamic_programming: usize,
}

impl From<&LimitArgs> for SolverConfig {
    fn from(args: &LimitArgs) -> Self {
        SolverConfig {
            max_brute_force: args.max_brute_force,
            max_dynamic_programming: args.max_dynamic_programming,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Solve one instance
    Solve {
        #[command(flatten)]
        source: InstanceArgs,

        #[command(flatten)]
        limits: LimitArgs,

        /// Algorithm to use
        #[arg(short, long, value_enum, default_value = "all")]
        algorithm: AlgorithmArg,

        /// Output solution(s) to a JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Generate a random instance and write it as JSON
    Generate {
        #[command(flatten)]
        generator: GeneratorArgs,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Analyze an instance
    Analyze {
        #[command(flatten)]
        source: InstanceArgs,
    },

    /// Run every algorithm on a directory of instances or on random instances
    Benchmark {
        /// Directory containing JSON instance files
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Number of random instances when no directory is given
        #[arg(short, long, default_value = "20")]
        count: usize,

        #[command(flatten)]
        generator: GeneratorArgs,

        #[command(flatten)]
        limits: LimitArgs,

        /// Output directory for results
        #[arg(short, long, default_value = "results")]
        output: PathBuf,

        /// Solve instances one after another
        #[arg(long)]
        sequential: bool,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum AlgorithmArg {
    /// Brute force (exact)
    Bf,
    /// Held-Karp dynamic programming (exact)
    Dp,
    /// Nearest Neighbor (heuristic)
    Nn,
    /// All of the above
    All,
}

impl AlgorithmArg {
    fn algorithm(self) -> Option<Algorithm> {
        match self {
            AlgorithmArg::Bf => Some(Algorithm::BruteForce),
            AlgorithmArg::Dp => Some(Algorithm::DynamicProgramming),
            AlgorithmArg::Nn => Some(Algorithm::NearestNeighbor),
            AlgorithmArg::All => None,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum CostModelArg {
    /// Euclidean distance between random coordinates
    Euclidean,
    /// Random directed costs between 50 and 100
    Uniform,
}

impl From<CostModelArg> for CostModel {
    fn from(arg: CostModelArg) -> Self {
        match arg {
            CostModelArg::Euclidean => CostModel::Euclidean,
            CostModelArg::Uniform => CostModel::default(),
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Solve { source, limits, algorithm, output, verbose } => {
            solve_instance(&source, &limits, algorithm, output.as_deref(), verbose)
        }

        Commands::Generate { generator, output } => generate_instance(&generator, &output),

        Commands::Analyze { source } => analyze_instance(&source),

        Commands::Benchmark { dir, count, generator, limits, output, sequential } => {
            run_benchmark(dir.as_deref(), count, &generator, &limits, &output, sequential)
        }
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn solve_instance(
    source: &InstanceArgs,
    limits: &LimitArgs,
    algorithm: AlgorithmArg,
    output: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let instance = source.load()?;
    let config = SolverConfig::from(limits);

    if verbose {
        println!("{}", instance.statistics());
        for city in &instance.cities {
            println!("  {}", city);
        }
    }

    println!("Home city: {}", instance.home);
    println!("Cities to visit: {}", instance.visit.join(", "));

    let runs = match algorithm.algorithm() {
        Some(algorithm) => vec![config.run(algorithm, &instance.matrix, &instance.home, &instance.visit)?],
        None => config.run_all(&instance.matrix, &instance.home, &instance.visit)?,
    };

    for run in &runs {
        println!("\n{} Algorithm:", run.algorithm);
        println!("Route: {}", run.solution.route.join(" -> "));
        println!("Total cost: {:.2}", run.solution.cost);
        println!("Execution time: {:.6} seconds", run.elapsed);
    }

    let best = best_run(&runs).ok_or_else(|| {
        TspError::InvalidInstance("no algorithm was allowed to run".to_string())
    })?;

    if runs.len() > 1 {
        println!("\n========== Results ==========");
        println!("Shortest route found by {}: {}", best.algorithm, best.solution.route.join(" -> "));
        println!("Cost: {:.2}", best.solution.cost);
    }

    if let Some(out_path) = output {
        let solutions: Vec<_> = runs
            .iter()
            .map(|run| {
                serde_json::json!({
                    "algorithm": run.algorithm,
                    "route": run.solution.route,
                    "cost": run.solution.cost,
                    "time": run.elapsed,
                })
            })
            .collect();
        std::fs::write(out_path, serde_json::to_string_pretty(&solutions)?)?;
        println!("\nSolution saved to {:?}", out_path);
    }

    Ok(())
}

fn generate_instance(generator: &GeneratorArgs, output: &Path) -> Result<()> {
    let instance = Instance::random(&generator.config())?;
    instance.to_file(output)?;
    println!("{}", instance.statistics());
    println!("Instance saved to {:?}", output);
    Ok(())
}

fn analyze_instance(source: &InstanceArgs) -> Result<()> {
    let instance = source.load()?;

    println!("========== Instance Analysis ==========\n");
    println!("{}", instance.statistics());

    println!("Algorithm Complexity:");
    for algorithm in Algorithm::ALL {
        println!("  {:<20} {}", algorithm.name(), algorithm.complexity());
    }

    let nn = instance.solve(Algorithm::NearestNeighbor)?;
    println!("\nQuick Solution Estimates:");
    println!("  Nearest Neighbor: {:.2} (upper bound)", nn.cost);

    let config = SolverConfig::default();
    if config.allows(Algorithm::DynamicProgramming, instance.num_stops()) {
        let optimal = instance.solve(Algorithm::DynamicProgramming)?;
        let gap = if optimal.cost > 0.0 {
            (nn.cost - optimal.cost) / optimal.cost * 100.0
        } else {
            0.0
        };
        println!("  Optimal: {:.2} (nearest neighbor gap {:.2}%)", optimal.cost, gap);
    }

    Ok(())
}

fn run_benchmark(
    dir: Option<&Path>,
    count: usize,
    generator: &GeneratorArgs,
    limits: &LimitArgs,
    output: &Path,
    sequential: bool,
) -> Result<()> {
    std::fs::create_dir_all(output)?;

    let config = BenchmarkConfig {
        solver: SolverConfig::from(limits),
        parallel: !sequential,
        show_progress: true,
    };
    let mut benchmark = Benchmark::new(config);

    match dir {
        Some(dir) => {
            println!("Loading instances from {:?}...", dir);
            let instances = load_instances_from_dir(dir)?;
            println!("Found {} instances", instances.len());
            if instances.is_empty() {
                eprintln!("No instances found!");
                return Ok(());
            }
            benchmark.run_on_instances(&instances)?;
        }
        None => {
            println!(
                "Generating {} random instances ({} cities, {} stops)...",
                count, generator.cities, generator.stops
            );
            benchmark.run_random(&generator.config(), count)?;
        }
    }

    let results_path = output.join("results.csv");
    benchmark.export_to_csv(&results_path)?;
    println!("\nResults exported to {:?}", results_path);

    let stats_path = output.join("statistics.csv");
    benchmark.export_statistics_csv(&stats_path)?;
    println!("Statistics exported to {:?}", stats_path);

    let report = benchmark.generate_report();
    println!("\n{}", report);

    let report_path = output.join("report.txt");
    std::fs::write(&report_path, &report)?;
    println!("Report saved to {:?}", report_path);

    Ok(())
}
