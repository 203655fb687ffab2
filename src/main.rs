//! Jigsaw Ambiguity Search
//!
//! Searches for 5x5 jigsaw puzzles whose pieces fit together in exactly one
//! other way, and rewards that other way for being as different from the
//! original picture as possible.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use log::error;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use jigsaw_search::evolution::{run_evolutionary_search, Candidate, SearchConfig};
use jigsaw_search::puzzle::{format_layout, Puzzle};
use jigsaw_search::solution::format_solution;
use jigsaw_search::solver::SearchContext;

/// Searches for jigsaw puzzles with a single, maximally different alternate
/// solution.
#[derive(Parser)]
#[command(name = "jigsaw")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the evolutionary search and print every new best puzzle.
    Search(SearchArgs),
    /// Solve random puzzles and report their alternate solutions.
    Solve {
        /// Number of distinct connector shapes.
        #[arg(short = 'k', long, default_value_t = 7)]
        unique_connectors: usize,
        /// Number of puzzles to generate and solve.
        #[arg(short = 'n', long, default_value_t = 10)]
        count: usize,
        /// Seed for the random number generator.
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Print the pieces of one random puzzle.
    Layout {
        /// Number of distinct connector shapes.
        #[arg(short = 'k', long, default_value_t = 10)]
        unique_connectors: usize,
        /// Seed for the random number generator.
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

#[derive(Parser)]
struct SearchArgs {
    /// Number of distinct connector shapes.
    #[arg(short = 'k', long, default_value_t = 10)]
    unique_connectors: usize,
    /// Puzzles per generation.
    #[arg(long, default_value_t = 5000)]
    generation_size: usize,
    /// Number of generations to run.
    #[arg(long, default_value_t = 10)]
    generations: usize,
    /// Best puzzles carried into the next generation.
    #[arg(long, default_value_t = 5)]
    survivors: usize,
    /// Mutated children bred from each survivor.
    #[arg(long, default_value_t = 800)]
    children: usize,
    /// Fewest boundary swaps per mutation.
    #[arg(long, default_value_t = 1)]
    min_mutations: usize,
    /// Most boundary swaps per mutation.
    #[arg(long, default_value_t = 6)]
    max_mutations: usize,
    /// Seed for the random number generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

impl SearchArgs {
    fn config(&self) -> SearchConfig {
        SearchConfig {
            unique_connectors: self.unique_connectors,
            generation_size: self.generation_size,
            num_generations: self.generations,
            num_survivors: self.survivors,
            num_children: self.children,
            min_mutations: self.min_mutations,
            max_mutations: self.max_mutations,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Some(Command::Search(args)) => run_search(&args),
        Some(Command::Solve {
            unique_connectors,
            count,
            seed,
        }) => run_solve(unique_connectors, count, seed),
        Some(Command::Layout {
            unique_connectors,
            seed,
        }) => run_layout(unique_connectors, seed),
        // default: search with the standard parameters
        None => run_search(&SearchArgs::parse_from(["search"])),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the evolutionary search, printing each new best as it is found.
fn run_search(args: &SearchArgs) -> jigsaw_search::Result<()> {
    let config = args.config();
    let mut rng = Pcg32::seed_from_u64(args.seed);

    let report = run_evolutionary_search(&config, &mut rng, print_candidate)?;

    match report.best {
        Some(best) => println!(
            "Best fitness {} from generation {} ({:?} phase at the end)",
            best.fitness,
            best.generation + 1,
            report.phase
        ),
        None => println!("No puzzle with exactly one alternate solution was found"),
    }
    Ok(())
}

fn print_candidate(candidate: &Candidate) {
    println!(
        "Generation {}: fitness {}, side distance {}, index distance {}",
        candidate.generation + 1,
        candidate.fitness,
        candidate.side_distance,
        candidate.index_distance
    );
    println!("Connections: {:?}", candidate.connections);
    print!("{}", format_solution(&candidate.solution));
    println!();
}

/// Solves `count` random puzzles and prints how ambiguous each one is.
fn run_solve(unique_connectors: usize, count: usize, seed: u64) -> jigsaw_search::Result<()> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let mut context = SearchContext::new();

    for i in 0..count {
        let puzzle = Puzzle::new(unique_connectors, &mut rng)?;
        let summary = context.summarize_alternates(&puzzle);
        println!(
            "Puzzle {}: {} alternates, max side distance {}, max index distance {}",
            i + 1,
            summary.alternates,
            summary.max_side_distance,
            summary.max_index_distance
        );
    }
    Ok(())
}

/// Prints every piece of a single random puzzle.
fn run_layout(unique_connectors: usize, seed: u64) -> jigsaw_search::Result<()> {
    let mut rng = Pcg32::seed_from_u64(seed);
    let puzzle = Puzzle::new(unique_connectors, &mut rng)?;
    print!("{}", format_layout(&puzzle));
    Ok(())
}
