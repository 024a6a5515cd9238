use clap::Parser;
use rde::{ClosureCost, Constraint, DEConfigBuilder, DifferentialEvolution, Termination};
use rde_testfunctions::{FunctionMetadata, get_function_metadata};
use std::error::Error;
use std::process;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(name = "run_de", about = "Minimize a benchmark function with Differential Evolution")]
struct Cli {
    /// Name of the benchmark function to optimize (use --list-functions to see available options)
    #[arg(long, default_value = "quadratic_cosine")]
    function: String,

    /// Dimensionality of the problem
    #[arg(long, default_value_t = 4)]
    dim: usize,

    /// Number of candidates in the population (>= 4)
    #[arg(long, default_value_t = 50)]
    population: usize,

    /// Number of generations
    #[arg(long, default_value_t = 1000)]
    iterations: usize,

    /// Random seed for reproducibility
    #[arg(long, default_value_t = rde::DEFAULT_SEED)]
    seed: u64,

    /// Differential weight F in [0, 2]
    #[arg(long, default_value_t = 0.8)]
    f: f64,

    /// Crossover probability CR in [0, 1]
    #[arg(long, default_value_t = 0.9)]
    cr: f64,

    /// Disable the bounds of the benchmark function
    #[arg(long)]
    no_constraints: bool,

    /// Report the run as met when the best cost is at or below this value
    #[arg(long)]
    target: Option<f64>,

    /// Only log the final result
    #[arg(long)]
    quiet: bool,

    /// Print the final report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Print the final population
    #[arg(long)]
    dump: bool,

    /// List all available functions and exit
    #[arg(long)]
    list_functions: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();
    let metadata = get_function_metadata();

    if args.list_functions {
        list_available_functions(&metadata);
        return;
    }

    let Some(meta) = metadata.get(args.function.trim()) else {
        eprintln!(
            "Error: function '{}' not found. Use --list-functions to inspect available names.",
            args.function
        );
        process::exit(2);
    };

    if let Err(e) = run(&args, meta) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(args: &Cli, meta: &FunctionMetadata) -> Result<(), Box<dyn Error>> {
    let (lower, upper) = meta.bounds;
    let constraint = Constraint::new(lower, upper, !args.no_constraints);
    let cost = ClosureCost::new(meta.function, vec![constraint; args.dim]);

    let mut builder = DEConfigBuilder::new()
        .population_size(args.population)
        .seed(args.seed)
        .f(args.f)
        .cr(args.cr)
        .enforce_constraints(!args.no_constraints)
        .callback(|view| {
            log::info!(
                "callback: generation {} best_f={:.6e} after {} evaluations",
                view.generation,
                view.best_cost,
                view.nfev
            )
        });
    if let Some(target) = args.target {
        builder = builder.termination(move |view| view.best_cost <= target);
    }
    let config = builder.build()?;

    log::info!(
        "Running DE on '{}' ({}D, population={}, F={}, CR={}, seed={})",
        meta.name,
        args.dim,
        args.population,
        args.f,
        args.cr,
        args.seed
    );

    let start = Instant::now();
    let mut de = DifferentialEvolution::new(&cost, config)?;
    let report = de.optimize_step(args.iterations, !args.quiet)?;
    let elapsed = start.elapsed();

    if args.dump {
        print!("{}", de.population_dump());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let (_, f_min) = (meta.global_minimum)(args.dim);
        println!("Optimization completed in {:.2?}", elapsed);
        println!("Status: {}", report.message);
        println!("Generations: {} | Evaluations: {}", report.nit, report.nfev);
        println!("Best objective: {:.6e} (known minimum {:.6e})", report.fun, f_min);
        println!("Best parameters: {}", report.x);
    }

    if args.target.is_some() && report.termination != Termination::ConditionMet {
        process::exit(1);
    }
    Ok(())
}

fn list_available_functions(metadata: &std::collections::HashMap<String, FunctionMetadata>) {
    let mut names: Vec<&String> = metadata.keys().collect();
    names.sort();
    println!("Available test functions ({}):", names.len());
    for name in names {
        let meta = &metadata[name];
        println!("- {name}: {} (bounds {:?})", meta.description, meta.bounds);
    }
}
