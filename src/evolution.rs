//! Evolutionary search for puzzles with exactly one, maximally different,
//! alternate solution.
//!
//! Each generation every individual is solved (stopping after two
//! alternates), scored, and sorted. The survivors are kept, each produces a
//! batch of mutated children, and any remaining slots are refilled with
//! fresh random puzzles.
//!
//! Fitness is 0 unless a puzzle has exactly one alternate. While no
//! individual has reached the maximum side distance it is that side
//! distance; afterwards it is side distance plus index distance.

use log::{debug, info};
use rand::Rng;
use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::grid::NUM_BOUNDARIES;
use crate::pieces::Connector;
use crate::puzzle::{validate_shuffled_connectors, Puzzle};
use crate::solution::PuzzleSolution;
use crate::solver::SearchContext;

/// Largest possible index or side distance.
pub const MAX_DISTANCE: u32 = NUM_BOUNDARIES as u32;

/// Parameters of one search run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    pub unique_connectors: usize,
    pub generation_size: usize,
    pub num_generations: usize,
    pub num_survivors: usize,
    /// Mutated children per survivor.
    pub num_children: usize,
    /// Fewest boundary swaps per mutation.
    pub min_mutations: usize,
    /// Most boundary swaps per mutation.
    pub max_mutations: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            unique_connectors: 10,
            generation_size: 5000,
            num_generations: 10,
            num_survivors: 5,
            num_children: 800,
            min_mutations: 1,
            max_mutations: 6,
        }
    }
}

impl SearchConfig {
    /// Rejects configurations the search cannot run.
    pub fn validate(&self) -> Result<()> {
        validate_shuffled_connectors(self.unique_connectors)?;

        if self.generation_size == 0 {
            return Err(Error::InvalidSearch("generation size must be positive".into()));
        }
        if self.num_generations == 0 {
            return Err(Error::InvalidSearch("at least one generation is required".into()));
        }
        if self.num_survivors == 0 {
            return Err(Error::InvalidSearch("at least one survivor is required".into()));
        }
        let occupied = self
            .num_survivors
            .checked_mul(self.num_children + 1)
            .unwrap_or(usize::MAX);
        if occupied > self.generation_size {
            return Err(Error::InvalidSearch(format!(
                "{} survivors with {} children each need {} slots, generation has {}",
                self.num_survivors, self.num_children, occupied, self.generation_size
            )));
        }
        if self.min_mutations == 0 || self.min_mutations > self.max_mutations {
            return Err(Error::InvalidSearch(format!(
                "mutation range {}..={} must be non-empty and start at 1 or more",
                self.min_mutations, self.max_mutations
            )));
        }
        Ok(())
    }
}

/// What the fitness currently rewards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Side distance only.
    SideDistance,
    /// Side distance plus index distance; entered once any individual
    /// reaches the maximum side distance.
    Combined,
}

impl Phase {
    /// Scores an evaluation; 0 unless there is exactly one alternate.
    pub fn fitness(self, evaluation: &Evaluation) -> u32 {
        if evaluation.solution.is_none() {
            return 0;
        }
        match self {
            Phase::SideDistance => evaluation.side_distance,
            Phase::Combined => evaluation.side_distance + evaluation.index_distance,
        }
    }

    /// The phase for the next generation, given the largest side distance
    /// in this one. The combined phase is never left.
    pub fn next(self, max_side_distance: u32) -> Self {
        if max_side_distance == MAX_DISTANCE {
            Phase::Combined
        } else {
            self
        }
    }
}

/// Solver outcome for one puzzle, reduced to what the search needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Evaluation {
    /// The alternate, when there is exactly one.
    pub solution: Option<PuzzleSolution>,
    pub index_distance: u32,
    pub side_distance: u32,
}

/// Solves `puzzle` far enough to tell zero, one or several alternates apart.
pub fn evaluate(context: &mut SearchContext, puzzle: &Puzzle) -> Evaluation {
    let solutions = context.find_valid_solutions(puzzle, Some(2));
    match solutions.alternates.as_slice() {
        [only] => Evaluation {
            solution: Some(only.solution),
            index_distance: only.similarity.index_distance(),
            side_distance: only.similarity.side_distance(),
        },
        _ => Evaluation::default(),
    }
}

/// A puzzle that set a new best fitness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Candidate {
    /// Zero-based generation it was found in.
    pub generation: usize,
    pub phase: Phase,
    pub fitness: u32,
    pub index_distance: u32,
    pub side_distance: u32,
    pub connections: [Connector; NUM_BOUNDARIES],
    /// Its single alternate solution.
    pub solution: PuzzleSolution,
}

/// Summary of a finished run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchReport {
    pub best: Option<Candidate>,
    /// Best fitness seen so far, recorded after each generation.
    pub best_fitness_history: Vec<u32>,
    pub phase: Phase,
}

struct Individual {
    puzzle: Puzzle,
    evaluation: Evaluation,
    fitness: u32,
}

/// Runs the evolutionary search to completion.
///
/// `on_new_best` is called each time a generation's top individual beats
/// every earlier one. All randomness comes from `rng`, in a fixed order:
/// the initial population, then per generation the mutations and reshuffles
/// in population order.
pub fn run_evolutionary_search<R, F>(
    config: &SearchConfig,
    rng: &mut R,
    mut on_new_best: F,
) -> Result<SearchReport>
where
    R: Rng + ?Sized,
    F: FnMut(&Candidate),
{
    let mut search = Search::new(config, rng)?;
    for generation in 0..config.num_generations {
        search.run_generation(generation, &mut on_new_best);
        if generation + 1 < config.num_generations {
            search.breed(rng)?;
        }
    }
    Ok(search.into_report())
}

/// Population and bookkeeping carried from one generation to the next.
struct Search<'a> {
    config: &'a SearchConfig,
    population: Vec<Individual>,
    context: SearchContext,
    evaluated: FxHashMap<[Connector; NUM_BOUNDARIES], Evaluation>,
    phase: Phase,
    best: Option<Candidate>,
    best_fitness_history: Vec<u32>,
}

impl<'a> Search<'a> {
    fn new<R: Rng + ?Sized>(config: &'a SearchConfig, rng: &mut R) -> Result<Self> {
        config.validate()?;

        let mut population = Vec::with_capacity(config.generation_size);
        for _ in 0..config.generation_size {
            population.push(Individual {
                puzzle: Puzzle::new(config.unique_connectors, rng)?,
                evaluation: Evaluation::default(),
                fitness: 0,
            });
        }

        Ok(Self {
            config,
            population,
            context: SearchContext::new(),
            evaluated: FxHashMap::default(),
            phase: Phase::SideDistance,
            best: None,
            best_fitness_history: Vec::with_capacity(config.num_generations),
        })
    }

    /// Scores and sorts the population, records a new best, then picks the
    /// phase the next generation is scored in.
    fn run_generation<F: FnMut(&Candidate)>(&mut self, generation: usize, on_new_best: &mut F) {
        let context = &mut self.context;
        let evaluated = &mut self.evaluated;
        for individual in &mut self.population {
            let puzzle = &individual.puzzle;
            let evaluation = *evaluated
                .entry(*puzzle.connections())
                .or_insert_with(|| evaluate(context, puzzle));
            individual.fitness = self.phase.fitness(&evaluation);
            individual.evaluation = evaluation;
        }

        // stable, so ties keep population order
        self.population.sort_by(|a, b| b.fitness.cmp(&a.fitness));

        let top = &self.population[0];
        let best_fitness = self.best_fitness();
        if let Some(solution) = top.evaluation.solution.filter(|_| top.fitness > best_fitness) {
            let candidate = Candidate {
                generation,
                phase: self.phase,
                fitness: top.fitness,
                index_distance: top.evaluation.index_distance,
                side_distance: top.evaluation.side_distance,
                connections: *top.puzzle.connections(),
                solution,
            };
            info!(
                "generation {}/{}: new best fitness {} (side distance {}, index distance {})",
                generation + 1,
                self.config.num_generations,
                candidate.fitness,
                candidate.side_distance,
                candidate.index_distance
            );
            on_new_best(&candidate);
            self.best = Some(candidate);
        }
        self.best_fitness_history.push(self.best_fitness());

        let unique = self
            .population
            .iter()
            .filter(|individual| individual.evaluation.solution.is_some())
            .count();
        let total: u64 = self.population.iter().map(|i| u64::from(i.fitness)).sum();
        debug!(
            "generation {}: {} of {} with a single alternate, mean fitness {:.2}",
            generation + 1,
            unique,
            self.population.len(),
            total as f64 / self.population.len() as f64
        );

        let max_side_distance = self
            .population
            .iter()
            .map(|individual| individual.evaluation.side_distance)
            .max()
            .unwrap_or(0);
        let next = self.phase.next(max_side_distance);
        if next != self.phase {
            info!("maximum side distance reached; now also rewarding index distance");
            self.phase = next;
        }
    }

    /// Breeds the next generation and forgets every evaluation except the
    /// survivors'.
    fn breed<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        breed(&mut self.population, self.config, rng)?;
        self.evaluated = self.population[..self.config.num_survivors]
            .iter()
            .map(|survivor| (*survivor.puzzle.connections(), survivor.evaluation))
            .collect();
        Ok(())
    }

    fn best_fitness(&self) -> u32 {
        self.best.as_ref().map_or(0, |candidate| candidate.fitness)
    }

    fn into_report(self) -> SearchReport {
        SearchReport {
            best: self.best,
            best_fitness_history: self.best_fitness_history,
            phase: self.phase,
        }
    }
}

/// Keeps the survivors, overwrites the following slots with their mutated
/// children, and reshuffles whatever is left.
fn breed<R: Rng + ?Sized>(
    population: &mut [Individual],
    config: &SearchConfig,
    rng: &mut R,
) -> Result<()> {
    let (survivors, rest) = population.split_at_mut(config.num_survivors);
    let mut slots = rest.iter_mut();

    for parent in survivors.iter() {
        for child in slots.by_ref().take(config.num_children) {
            child.puzzle.mutate_from(
                &parent.puzzle,
                config.min_mutations,
                config.max_mutations,
                rng,
            )?;
        }
    }
    for individual in slots {
        individual.puzzle.shuffle(rng)?;
    }
    Ok(())
}
