//! Finds every way a puzzle's pieces reassemble other than the original.
//!
//! The search runs in stages:
//! - enumerate edge strips, then assemble complete borders for each of the
//!   six distinct corner arrangements
//! - per border, enumerate rotated center rows, then assemble 3x3 blocks
//! - merge each border/block pair and score it against the original layout;
//!   keep everything that is not the original
//!
//! All intermediate lists live in a [`SearchContext`] so repeated solves
//! reuse their allocations.

use std::ops::ControlFlow;

use log::{debug, warn};

use crate::border::{find_edge_solutions, BorderCandidates, EdgeSolution, TripleIndex};
use crate::center::{assemble_center, enumerate_center_rows, CenterCandidates, CenterSolution};
use crate::puzzle::Puzzle;
use crate::solution::{score_against_canonical, PuzzleSolution, Similarity};

/// Alternates [`SearchContext::find_valid_solutions`] keeps in memory by
/// default. Single-shape puzzles have billions.
pub const MAX_STORED_ALTERNATES: usize = 1 << 20;

/// A reassembly that differs from the original layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlternateSolution {
    pub solution: PuzzleSolution,
    pub similarity: Similarity,
}

/// Result of [`SearchContext::find_valid_solutions`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Solutions {
    pub alternates: Vec<AlternateSolution>,
    /// Largest index distance among the alternates (0 if there are none).
    pub max_index_distance: u32,
    /// Largest side distance among the alternates (0 if there are none).
    pub max_side_distance: u32,
    /// Set when more alternates exist than the context was allowed to store.
    pub truncated: bool,
}

impl Solutions {
    fn push(&mut self, alternate: AlternateSolution) {
        self.max_index_distance = self
            .max_index_distance
            .max(alternate.similarity.index_distance());
        self.max_side_distance = self
            .max_side_distance
            .max(alternate.similarity.side_distance());
        self.alternates.push(alternate);
    }
}

/// Alternate count and distances, gathered without storing the alternates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SolutionSummary {
    pub alternates: u64,
    pub max_index_distance: u32,
    pub max_side_distance: u32,
}

/// Scratch storage for the solver, grown on demand and reused across calls.
#[derive(Debug)]
pub struct SearchContext {
    border_triples: Vec<TripleIndex>,
    border_candidates: BorderCandidates,
    edge_solutions: Vec<EdgeSolution>,
    center_rows: Vec<TripleIndex>,
    center_candidates: CenterCandidates,
    center_solutions: Vec<CenterSolution>,
    alternate_cap: usize,
}

impl Default for SearchContext {
    fn default() -> Self {
        Self::with_alternate_cap(MAX_STORED_ALTERNATES)
    }
}

impl SearchContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context that stores at most `alternate_cap` alternates per
    /// call to [`find_valid_solutions`](Self::find_valid_solutions).
    pub fn with_alternate_cap(alternate_cap: usize) -> Self {
        Self {
            border_triples: Vec::new(),
            border_candidates: Default::default(),
            edge_solutions: Vec::new(),
            center_rows: Vec::new(),
            center_candidates: Default::default(),
            center_solutions: Vec::new(),
            alternate_cap,
        }
    }

    /// Enumerates the alternate solutions of `puzzle`, handing each to
    /// `visit` until it breaks or the search is exhausted.
    pub fn for_each_alternate<F>(&mut self, puzzle: &Puzzle, mut visit: F)
    where
        F: FnMut(&AlternateSolution) -> ControlFlow<()>,
    {
        find_edge_solutions(
            puzzle,
            &mut self.border_triples,
            &mut self.border_candidates,
            &mut self.edge_solutions,
        );

        let mut assemblies = 0usize;
        let mut visited = 0u64;
        'borders: for edges in &self.edge_solutions {
            enumerate_center_rows(puzzle, edges, &mut self.center_rows);
            self.center_solutions.clear();
            assemble_center(
                puzzle,
                edges,
                &self.center_rows,
                &mut self.center_candidates,
                &mut self.center_solutions,
            );
            assemblies += self.center_solutions.len();

            for centers in &self.center_solutions {
                let solution = PuzzleSolution::merge(edges, centers);
                let similarity = score_against_canonical(&solution);
                if similarity.is_canonical() {
                    continue;
                }

                visited += 1;
                let alternate = AlternateSolution {
                    solution,
                    similarity,
                };
                if visit(&alternate).is_break() {
                    break 'borders;
                }
            }
        }

        debug!(
            "{} strips, {} borders, {} assemblies, {} alternates",
            self.border_triples.len(),
            self.edge_solutions.len(),
            assemblies,
            visited
        );
    }

    /// Finds the alternate solutions of `puzzle`.
    ///
    /// With `max_alternates` set, the search stops as soon as that many have
    /// been found; `None` enumerates all of them. Either way no more than
    /// the context's cap are stored, and [`Solutions::truncated`] reports
    /// when the cap cut the search short.
    pub fn find_valid_solutions(
        &mut self,
        puzzle: &Puzzle,
        max_alternates: Option<usize>,
    ) -> Solutions {
        let mut solutions = Solutions::default();
        let limit = max_alternates.unwrap_or(usize::MAX);
        if limit == 0 {
            return solutions;
        }

        let cap = self.alternate_cap;
        self.for_each_alternate(puzzle, |alternate| {
            if solutions.alternates.len() >= cap {
                solutions.truncated = true;
                return ControlFlow::Break(());
            }
            solutions.push(*alternate);
            if solutions.alternates.len() >= limit {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        if solutions.truncated {
            warn!("stopped after storing {cap} alternates; more exist");
        }
        solutions
    }

    /// Counts every alternate of `puzzle` and tracks the largest distances,
    /// keeping nothing else in memory.
    pub fn summarize_alternates(&mut self, puzzle: &Puzzle) -> SolutionSummary {
        let mut summary = SolutionSummary::default();
        self.for_each_alternate(puzzle, |alternate| {
            summary.alternates += 1;
            summary.max_index_distance = summary
                .max_index_distance
                .max(alternate.similarity.index_distance());
            summary.max_side_distance = summary
                .max_side_distance
                .max(alternate.similarity.side_distance());
            ControlFlow::Continue(())
        });
        summary
    }
}

/// Finds every alternate solution of `puzzle` with a fresh context.
pub fn find_valid_solutions(puzzle: &Puzzle) -> Solutions {
    SearchContext::new().find_valid_solutions(puzzle, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::NUM_BOUNDARIES;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_distinct_connectors_have_no_alternates() {
        let connections = std::array::from_fn(|slot| {
            let shape = slot as i8 + 1;
            if slot % 3 == 0 {
                -shape
            } else {
                shape
            }
        });
        let puzzle = Puzzle::from_connections(NUM_BOUNDARIES, connections).unwrap();
        let solutions = find_valid_solutions(&puzzle);

        assert!(solutions.alternates.is_empty());
        assert_eq!(solutions.max_index_distance, 0);
        assert_eq!(solutions.max_side_distance, 0);
    }

    #[test]
    fn test_alternates_are_never_canonical() {
        let mut rng = Pcg32::seed_from_u64(21);
        let mut context = SearchContext::new();
        for unique in [4, 5, 6, 8] {
            for _ in 0..5 {
                let puzzle = Puzzle::new(unique, &mut rng).unwrap();
                let solutions = context.find_valid_solutions(&puzzle, None);
                for alternate in &solutions.alternates {
                    assert!(!alternate.similarity.is_canonical());
                    assert_ne!(alternate.solution, PuzzleSolution::identity());
                }
            }
        }
    }

    #[test]
    fn test_distances_are_bounded() {
        let mut rng = Pcg32::seed_from_u64(22);
        let mut context = SearchContext::new();
        for _ in 0..20 {
            let puzzle = Puzzle::new(5, &mut rng).unwrap();
            let solutions = context.find_valid_solutions(&puzzle, None);
            for alternate in &solutions.alternates {
                let index_distance = alternate.similarity.index_distance();
                let side_distance = alternate.similarity.side_distance();
                assert!(index_distance > 0);
                assert!(index_distance <= side_distance);
                assert!(side_distance <= 40);
                assert!(index_distance <= solutions.max_index_distance);
                assert!(side_distance <= solutions.max_side_distance);
            }
        }
    }

    #[test]
    fn test_single_shape_is_highly_ambiguous() {
        let mut rng = Pcg32::seed_from_u64(23);
        let puzzle = Puzzle::new(1, &mut rng).unwrap();
        let mut context = SearchContext::new();
        let solutions = context.find_valid_solutions(&puzzle, Some(50));

        assert_eq!(solutions.alternates.len(), 50);
        assert!(!solutions.truncated);
        assert!(solutions.alternates.iter().all(|a| !a.similarity.is_canonical()));
    }

    #[test]
    fn test_single_shape_enumerates_every_border_and_block() {
        let mut rng = Pcg32::seed_from_u64(5);
        let puzzle = Puzzle::new(1, &mut rng).unwrap();
        let mut triples = Vec::new();
        let mut borders = Vec::new();
        find_edge_solutions(&puzzle, &mut triples, &mut Default::default(), &mut borders);
        assert_eq!(triples.len(), 376);
        assert_eq!(borders.len(), 483_840);

        let mut rows = Vec::new();
        let mut blocks = Vec::new();
        enumerate_center_rows(&puzzle, &borders[0], &mut rows);
        assemble_center(&puzzle, &borders[0], &rows, &mut Default::default(), &mut blocks);
        assert_eq!(rows.len(), 4700);
        assert_eq!(blocks.len(), 7680);
    }

    #[test]
    fn test_unlimited_search_stops_at_the_cap() {
        let mut rng = Pcg32::seed_from_u64(5);
        let puzzle = Puzzle::new(1, &mut rng).unwrap();
        let mut context = SearchContext::with_alternate_cap(1000);

        let solutions = context.find_valid_solutions(&puzzle, None);
        assert!(solutions.truncated);
        assert_eq!(solutions.alternates.len(), 1000);

        let limited = context.find_valid_solutions(&puzzle, Some(10));
        assert!(!limited.truncated);
        assert_eq!(limited.alternates[..], solutions.alternates[..10]);
    }

    #[test]
    fn test_visitor_can_stop_the_search() {
        let mut rng = Pcg32::seed_from_u64(5);
        let puzzle = Puzzle::new(1, &mut rng).unwrap();
        let mut context = SearchContext::new();

        let mut visited = 0;
        context.for_each_alternate(&puzzle, |_| {
            visited += 1;
            if visited == 20_000 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(visited, 20_000);
    }

    #[test]
    fn test_summary_matches_stored_alternates() {
        let mut rng = Pcg32::seed_from_u64(26);
        let mut context = SearchContext::new();
        for unique in [4, 5, 6] {
            for _ in 0..5 {
                let puzzle = Puzzle::new(unique, &mut rng).unwrap();
                let solutions = context.find_valid_solutions(&puzzle, None);
                let summary = context.summarize_alternates(&puzzle);

                assert!(!solutions.truncated);
                assert_eq!(summary.alternates, solutions.alternates.len() as u64);
                assert_eq!(summary.max_index_distance, solutions.max_index_distance);
                assert_eq!(summary.max_side_distance, solutions.max_side_distance);
            }
        }
    }

    #[test]
    fn test_limit_stops_early() {
        let mut rng = Pcg32::seed_from_u64(24);
        let puzzle = Puzzle::new(2, &mut rng).unwrap();
        let mut context = SearchContext::new();

        let all = context.find_valid_solutions(&puzzle, None);
        let limited = context.find_valid_solutions(&puzzle, Some(2));
        assert_eq!(limited.alternates.len(), all.alternates.len().min(2));
        assert_eq!(limited.alternates[..], all.alternates[..limited.alternates.len()]);
        assert!(context.find_valid_solutions(&puzzle, Some(0)).alternates.is_empty());
    }

    #[test]
    fn test_context_reuse_matches_fresh_context() {
        let mut rng = Pcg32::seed_from_u64(25);
        let mut context = SearchContext::new();
        for _ in 0..10 {
            let puzzle = Puzzle::new(4, &mut rng).unwrap();
            assert_eq!(
                context.find_valid_solutions(&puzzle, None),
                find_valid_solutions(&puzzle)
            );
        }
    }
}
