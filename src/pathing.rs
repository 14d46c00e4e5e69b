use std::collections::VecDeque;

use bit_set::BitSet;
use fnv::FnvHashMap;
use tracing::{debug, trace};

use crate::cells::CellIndex;
use crate::edges::{EdgeSet, PassageEdge};
use crate::generators::SpanningTree;

/// Which end of the frontier the next cell comes from.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum SearchOrder {
    /// Newest first: the frontier is a stack.
    DepthFirst,
    /// Oldest first: the frontier is a queue.
    BreadthFirst,
}

#[derive(Eq, PartialEq, Clone, Debug)]
pub enum StepResult {
    /// Nothing to do: no active search or an empty frontier.
    Idle,
    /// One frontier entry was consumed and the exit has not been reached.
    Continuing,
    /// The exit was reached. The path runs from the exit back to the entry.
    FoundPath(Vec<CellIndex>),
}

/// The resumable state of one search over a maze's passages.
///
/// All progress happens inside `step`, which consumes at most one frontier entry, so a
/// search can be paused between steps, resumed later, or dropped.
#[derive(Clone, Debug)]
pub struct Traversal {
    entry: CellIndex,
    exit: CellIndex,
    frontier: VecDeque<CellIndex>,
    discovered: FnvHashMap<CellIndex, PassageEdge>,
    visited: BitSet,
    visit_order: Vec<CellIndex>,
    path: Option<Vec<CellIndex>>,
}

impl Traversal {
    /// A fresh search with only the entry cell on the frontier.
    pub fn new(entry: CellIndex, exit: CellIndex) -> Traversal {
        let mut frontier = VecDeque::new();
        frontier.push_back(entry);
        Traversal {
            entry,
            exit,
            frontier,
            discovered: FnvHashMap::default(),
            visited: BitSet::new(),
            visit_order: vec![],
            path: None,
        }
    }

    #[inline]
    pub fn entry(&self) -> CellIndex {
        self.entry
    }

    #[inline]
    pub fn exit(&self) -> CellIndex {
        self.exit
    }

    /// Cells waiting to be processed, oldest first.
    #[inline]
    pub fn frontier(&self) -> &VecDeque<CellIndex> {
        &self.frontier
    }

    /// Fully processed cells in the order they were processed.
    #[inline]
    pub fn visited_cells(&self) -> &[CellIndex] {
        &self.visit_order
    }

    #[inline]
    pub fn is_visited(&self, cell: CellIndex) -> bool {
        self.visited.contains(cell.0)
    }

    /// The passage through which `cell` was first reached, pointing back: `first` is
    /// `cell` and `second` is the cell it was reached from.
    #[inline]
    pub fn discovered_via(&self, cell: CellIndex) -> Option<&PassageEdge> {
        self.discovered.get(&cell)
    }

    #[inline]
    pub fn discovered_count(&self) -> usize {
        self.discovered.len()
    }

    /// The exit to entry path once the exit has been reached.
    #[inline]
    pub fn path(&self) -> Option<&[CellIndex]> {
        self.path.as_ref().map(|p| p.as_slice())
    }

    /// True once the exit was found or the frontier ran dry.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.path.is_some() || self.frontier.is_empty()
    }

    /// Consume one frontier entry.
    pub fn step(&mut self, order: SearchOrder, tree: &SpanningTree, edges: &EdgeSet) -> StepResult {
        let next = match order {
            SearchOrder::DepthFirst => self.frontier.pop_back(),
            SearchOrder::BreadthFirst => self.frontier.pop_front(),
        };
        let cell = match next {
            Some(cell) => cell,
            None => return StepResult::Idle,
        };

        if self.visited.contains(cell.0) {
            trace!(cell = cell.0, "already visited");
            return StepResult::Continuing;
        }

        if cell == self.exit {
            let path = reconstruct_path(&self.discovered, self.entry, cell);
            self.frontier.clear();
            debug!(steps = self.visit_order.len(), path_len = path.len(), "search reached the exit");
            self.path = Some(path.clone());
            return StepResult::FoundPath(path);
        }

        for id in tree.passages_at(cell) {
            let passage = edges.get(*id);
            let neighbour = passage.other(cell);
            self.frontier.push_back(neighbour);
            self.discovered
                .entry(neighbour)
                .or_insert_with(|| passage.reached_from(cell));
        }
        let _ = self.visited.insert(cell.0);
        self.visit_order.push(cell);
        trace!(cell = cell.0, frontier = self.frontier.len(), "visited");

        if self.frontier.is_empty() {
            debug!(visited = self.visit_order.len(), "search exhausted without reaching the exit");
        }
        StepResult::Continuing
    }

    /// Step until the search finishes. Returns the path if the exit was reached.
    pub fn run_to_completion(&mut self,
                             order: SearchOrder,
                             tree: &SpanningTree,
                             edges: &EdgeSet)
                             -> Option<Vec<CellIndex>> {
        loop {
            match self.step(order, tree, edges) {
                StepResult::FoundPath(path) => return Some(path),
                StepResult::Idle => return None,
                StepResult::Continuing => {}
            }
        }
    }
}

/// Depth first search from `entry` to `exit` with its own scratch state.
///
/// Returns the path from the exit back to the entry, or an empty path when the exit cannot
/// be reached.
pub fn solve(entry: CellIndex, exit: CellIndex, tree: &SpanningTree, edges: &EdgeSet) -> Vec<CellIndex> {
    Traversal::new(entry, exit)
        .run_to_completion(SearchOrder::DepthFirst, tree, edges)
        .unwrap_or_else(Vec::new)
}

/// Walk the discovery map back from `from` to `entry`.
fn reconstruct_path(discovered: &FnvHashMap<CellIndex, PassageEdge>,
                    entry: CellIndex,
                    from: CellIndex)
                    -> Vec<CellIndex> {
    let mut path = vec![from];
    let mut current = from;
    while current != entry {
        let via = discovered.get(&current)
            .expect("Discovered cell has no route back to the entry.");
        current = via.second;
        path.push(current);
    }
    path
}

#[cfg(test)]
mod tests {

    use quickcheck::{quickcheck, TestResult};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::edges::tests::{ScriptedWeights, FOUR_BY_TWO_WEIGHTS, TWO_BY_TWO_WEIGHTS};
    use crate::edges::EdgeId;
    use crate::generators::kruskal;
    use crate::grid::Grid;
    use crate::units::{Height, Width};

    fn maze_parts(w: usize, h: usize, weights: &[u32]) -> (Grid, EdgeSet, SpanningTree) {
        let g = Grid::new(Width(w), Height(h)).expect("valid dimensions");
        let edges = EdgeSet::generate(&g, &mut ScriptedWeights::new(weights));
        let tree = kruskal(&g, &edges);
        (g, edges, tree)
    }

    fn random_maze_parts(w: usize, h: usize, seed: u64) -> (Grid, EdgeSet, SpanningTree) {
        let g = Grid::new(Width(w), Height(h)).expect("valid dimensions");
        let edges = EdgeSet::generate(&g, &mut StdRng::seed_from_u64(seed));
        let tree = kruskal(&g, &edges);
        (g, edges, tree)
    }

    fn cells(raw: &[usize]) -> Vec<CellIndex> {
        raw.iter().map(|i| CellIndex(*i)).collect()
    }

    #[test]
    fn two_by_two_depth_first_steps() {
        let (g, edges, tree) = maze_parts(2, 2, &TWO_BY_TWO_WEIGHTS);
        let mut search = Traversal::new(g.entry(), g.exit());

        assert_eq!(search.step(SearchOrder::DepthFirst, &tree, &edges), StepResult::Continuing);
        assert_eq!(search.visited_cells(), &cells(&[0])[..]);
        assert_eq!(search.frontier().iter().cloned().collect::<Vec<_>>(), cells(&[1, 2]));

        assert_eq!(search.step(SearchOrder::DepthFirst, &tree, &edges), StepResult::Continuing);
        assert_eq!(search.visited_cells(), &cells(&[0, 2])[..]);

        // n4 was reached from n3 through e4, n3 from n1 through e1
        let via = search.discovered_via(CellIndex(3)).unwrap();
        assert_eq!((via.id, via.first, via.second), (EdgeId(3), CellIndex(3), CellIndex(2)));
        let via = search.discovered_via(CellIndex(2)).unwrap();
        assert_eq!((via.id, via.first, via.second), (EdgeId(0), CellIndex(2), CellIndex(0)));

        assert_eq!(search.step(SearchOrder::DepthFirst, &tree, &edges),
                   StepResult::FoundPath(cells(&[3, 2, 0])));
        assert!(search.frontier().is_empty());
        assert!(search.is_finished());
        assert_eq!(search.path(), Some(&cells(&[3, 2, 0])[..]));

        assert_eq!(search.step(SearchOrder::DepthFirst, &tree, &edges), StepResult::Idle);
    }

    #[test]
    fn solve_two_by_two() {
        let (g, edges, tree) = maze_parts(2, 2, &TWO_BY_TWO_WEIGHTS);
        assert_eq!(solve(g.entry(), g.exit(), &tree, &edges), cells(&[3, 2, 0]));
    }

    #[test]
    fn four_by_two_depth_first_visit_order() {
        let (g, edges, tree) = maze_parts(4, 2, &FOUR_BY_TWO_WEIGHTS);
        let mut search = Traversal::new(g.entry(), g.exit());
        let mut steps = 0;
        let path = loop {
            steps += 1;
            match search.step(SearchOrder::DepthFirst, &tree, &edges) {
                StepResult::FoundPath(path) => break path,
                StepResult::Continuing => {}
                StepResult::Idle => panic!("search went idle before the exit"),
            }
        };
        assert_eq!(steps, 8);
        assert_eq!(search.visited_cells(), &cells(&[0, 2, 3, 1, 5])[..]);
        assert_eq!(path, cells(&[7, 5, 3, 2, 0]));
    }

    #[test]
    fn four_by_two_breadth_first_visit_order() {
        let (g, edges, tree) = maze_parts(4, 2, &FOUR_BY_TWO_WEIGHTS);
        let mut search = Traversal::new(g.entry(), g.exit());

        let expected_visits: &[&[usize]] = &[&[0],
                                             &[0, 2],
                                             &[0, 2, 4],
                                             &[0, 2, 4, 3],
                                             &[0, 2, 4, 3],
                                             &[0, 2, 4, 3, 6],
                                             &[0, 2, 4, 3, 6],
                                             &[0, 2, 4, 3, 6],
                                             &[0, 2, 4, 3, 6, 5],
                                             &[0, 2, 4, 3, 6, 5, 1],
                                             &[0, 2, 4, 3, 6, 5, 1],
                                             &[0, 2, 4, 3, 6, 5, 1]];
        for visits in expected_visits {
            assert_eq!(search.step(SearchOrder::BreadthFirst, &tree, &edges),
                       StepResult::Continuing);
            assert_eq!(search.visited_cells(), &cells(visits)[..]);
        }
        assert_eq!(search.step(SearchOrder::BreadthFirst, &tree, &edges),
                   StepResult::FoundPath(cells(&[7, 5, 3, 2, 0])));
    }

    #[test]
    fn entry_gets_a_discovery_entry_from_its_neighbour() {
        let (g, edges, tree) = maze_parts(2, 2, &TWO_BY_TWO_WEIGHTS);
        let mut search = Traversal::new(g.entry(), g.exit());
        let _ = search.step(SearchOrder::DepthFirst, &tree, &edges);
        assert!(search.discovered_via(CellIndex(0)).is_none());
        let _ = search.step(SearchOrder::DepthFirst, &tree, &edges);
        let via = search.discovered_via(CellIndex(0)).unwrap();
        assert_eq!((via.first, via.second), (CellIndex(0), CellIndex(2)));
    }

    #[test]
    fn single_cell_is_solved_immediately() {
        let (g, edges, tree) = random_maze_parts(1, 1, 9);
        assert_eq!(solve(g.entry(), g.exit(), &tree, &edges), cells(&[0]));
    }

    #[test]
    fn unreachable_exit_gives_empty_path() {
        let (g, edges, tree) = maze_parts(1, 2, &[5]);
        let mut search = Traversal::new(g.entry(), g.exit());
        assert_eq!(search.step(SearchOrder::BreadthFirst, &tree, &edges), StepResult::Continuing);
        assert!(search.is_finished());
        assert_eq!(search.path(), None);
        assert_eq!(search.step(SearchOrder::BreadthFirst, &tree, &edges), StepResult::Idle);
        assert!(solve(g.entry(), g.exit(), &tree, &edges).is_empty());
    }

    #[test]
    fn paused_search_resumes_where_it_stopped() {
        let (g, edges, tree) = random_maze_parts(6, 6, 11);
        let mut straight = Traversal::new(g.entry(), g.exit());
        let expected = straight.run_to_completion(SearchOrder::BreadthFirst, &tree, &edges);

        let mut paused = Traversal::new(g.entry(), g.exit());
        for _ in 0..5 {
            let _ = paused.step(SearchOrder::BreadthFirst, &tree, &edges);
        }
        let saved = paused.clone();
        let _ = solve(g.entry(), g.exit(), &tree, &edges);
        assert_eq!(paused.visited_cells(), saved.visited_cells());
        assert_eq!(paused.run_to_completion(SearchOrder::BreadthFirst, &tree, &edges), expected);
        assert_eq!(paused.visited_cells(), straight.visited_cells());
    }

    fn is_valid_path(g: &Grid, tree: &SpanningTree, path: &[CellIndex]) -> bool {
        let mut seen = BitSet::new();
        path.first() == Some(&g.exit()) &&
        path.last() == Some(&g.entry()) &&
        path.windows(2).all(|pair| tree.is_linked(pair[0], pair[1])) &&
        path.iter().all(|c| seen.insert(c.0))
    }

    #[test]
    fn quickcheck_solved_paths_follow_passages() {
        fn p(w: u8, h: u8, seed: u64) -> bool {
            let (w, h) = (w as usize % 15 + 2, h as usize % 15 + 2);
            let (g, edges, tree) = random_maze_parts(w, h, seed);
            let path = solve(g.entry(), g.exit(), &tree, &edges);
            is_valid_path(&g, &tree, &path)
        }
        quickcheck(p as fn(u8, u8, u64) -> bool)
    }

    #[test]
    fn quickcheck_stepping_agrees_with_solve() {
        fn p(w: u8, h: u8, seed: u64, breadth: bool) -> TestResult {
            let (w, h) = (w as usize % 15 + 2, h as usize % 15 + 2);
            let (g, edges, tree) = random_maze_parts(w, h, seed);
            let order = if breadth {
                SearchOrder::BreadthFirst
            } else {
                SearchOrder::DepthFirst
            };
            let mut search = Traversal::new(g.entry(), g.exit());
            let stepped = search.run_to_completion(order, &tree, &edges);
            let solved = solve(g.entry(), g.exit(), &tree, &edges);

            // each cell is processed at most once
            let mut seen = BitSet::new();
            let visited_once = search.visited_cells().iter().all(|c| seen.insert(c.0));
            TestResult::from_bool(stepped == Some(solved) && visited_once)
        }
        quickcheck(p as fn(u8, u8, u64, bool) -> TestResult)
    }
}
