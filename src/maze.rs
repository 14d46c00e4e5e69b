use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::cells::{CellIndex, CompassPrimary};
use crate::edges::{EdgeSet, PassageEdge, WeightSource};
use crate::errors::*;
use crate::generators::{kruskal, SpanningTree};
use crate::grid::Grid;
use crate::pathing::{self, SearchOrder, StepResult, Traversal};
use crate::units::{Height, Width};

/// The two independent search toggles. Depth first wins when both are on.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Default)]
pub struct TraversalModes {
    pub depth_first: bool,
    pub breadth_first: bool,
}

impl TraversalModes {
    pub fn active(&self) -> Option<SearchOrder> {
        if self.depth_first {
            Some(SearchOrder::DepthFirst)
        } else if self.breadth_first {
            Some(SearchOrder::BreadthFirst)
        } else {
            None
        }
    }
}

/// A generated maze, a player walking it and an optional step by step search.
pub struct Maze {
    grid: Grid,
    edges: EdgeSet,
    tree: SpanningTree,
    player: CellIndex,
    trail: Vec<CellIndex>,
    modes: TraversalModes,
    traversal: Traversal,
    solution: Vec<CellIndex>,
    rng: StdRng,
}

impl fmt::Debug for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
               "Maze :: grid: {:?}, passages: {}, walls: {}, player: {:?}, modes: {:?}",
               self.grid,
               self.tree.links_count(),
               self.tree.walls().len(),
               self.player,
               self.modes)
    }
}

impl Maze {
    /// Generate a `width * height` maze. The same seed always gives the same maze.
    pub fn generate(width: usize, height: usize, seed: Option<u64>) -> Result<Maze> {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        let (grid, edges, tree) = build(width, height, &mut rng)?;
        Ok(Maze::assemble(grid, edges, tree, rng))
    }

    /// Generate a maze whose edge weights come from `weights`. Later resets draw from
    /// fresh entropy.
    pub fn with_weight_source<W: WeightSource>(width: usize,
                                               height: usize,
                                               weights: &mut W)
                                               -> Result<Maze> {
        let (grid, edges, tree) = build(width, height, weights)?;
        Ok(Maze::assemble(grid, edges, tree, StdRng::from_entropy()))
    }

    fn assemble(grid: Grid, edges: EdgeSet, tree: SpanningTree, rng: StdRng) -> Maze {
        let traversal = Traversal::new(grid.entry(), grid.exit());
        Maze {
            player: grid.entry(),
            grid,
            edges,
            tree,
            trail: vec![],
            modes: TraversalModes::default(),
            traversal,
            solution: vec![],
            rng,
        }
    }

    /// Throw away the edges, passages, player progress and any search, and carve a new maze
    /// with the same dimensions.
    pub fn reset(&mut self) {
        let (Width(width), Height(height)) = (self.grid.width(), self.grid.height());
        let grid = self.grid.clone();
        let edges = EdgeSet::generate(&grid, &mut self.rng);
        let tree = kruskal(&grid, &edges);
        debug!(width, height, "maze reset");
        let rng = self.rng.clone();
        *self = Maze::assemble(grid, edges, tree, rng);
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn edges(&self) -> &EdgeSet {
        &self.edges
    }

    #[inline]
    pub fn spanning_tree(&self) -> &SpanningTree {
        &self.tree
    }

    /// The open passages, in the order they were carved.
    pub fn passages(&self) -> impl Iterator<Item = &PassageEdge> + '_ {
        self.tree.passages().iter().map(move |id| self.edges.get(*id))
    }

    /// The edges left standing as walls.
    pub fn walls(&self) -> impl Iterator<Item = &PassageEdge> + '_ {
        self.tree.walls().iter().map(move |id| self.edges.get(*id))
    }

    #[inline]
    pub fn player(&self) -> CellIndex {
        self.player
    }

    /// Cells the player has stepped off, oldest first.
    #[inline]
    pub fn trail(&self) -> &[CellIndex] {
        &self.trail
    }

    /// Move the player through an open passage. Returns false, leaving the player where it
    /// is, when a wall or the grid boundary is in the way.
    pub fn move_player(&mut self, direction: CompassPrimary) -> bool {
        let target = self.grid.neighbour(self.player, direction);
        if target == self.player || !self.tree.is_linked(self.player, target) {
            return false;
        }
        self.trail.push(self.player);
        self.player = target;
        true
    }

    #[inline]
    pub fn is_at_exit(&self) -> bool {
        self.player == self.grid.exit()
    }

    /// If the player is on the exit, store the winning path for display and return true.
    pub fn finish_if_at_exit(&mut self) -> bool {
        if !self.is_at_exit() {
            return false;
        }
        self.solution = self.solve();
        true
    }

    #[inline]
    pub fn traversal_modes(&self) -> TraversalModes {
        self.modes
    }

    /// The search order `step` will use, if any.
    #[inline]
    pub fn traversal_mode(&self) -> Option<SearchOrder> {
        self.modes.active()
    }

    /// Switch to exactly one search order, or none.
    pub fn set_traversal_mode(&mut self, mode: Option<SearchOrder>) {
        self.modes = TraversalModes {
            depth_first: mode == Some(SearchOrder::DepthFirst),
            breadth_first: mode == Some(SearchOrder::BreadthFirst),
        };
    }

    pub fn toggle_depth_first(&mut self) {
        self.modes.depth_first = !self.modes.depth_first;
    }

    pub fn toggle_breadth_first(&mut self) {
        self.modes.breadth_first = !self.modes.breadth_first;
    }

    /// The current or most recently finished search.
    #[inline]
    pub fn traversal(&self) -> &Traversal {
        &self.traversal
    }

    /// The path shown once a search or the player reaches the exit, exit first.
    #[inline]
    pub fn solution(&self) -> &[CellIndex] {
        &self.solution
    }

    /// Advance the active search by one frontier entry.
    ///
    /// A finished search is replaced by a fresh one on the first step after a mode is
    /// switched back on; an unfinished one carries on from where it paused. Reaching the
    /// exit or emptying the frontier switches both modes off.
    pub fn step(&mut self) -> StepResult {
        let order = match self.modes.active() {
            Some(order) => order,
            None => return StepResult::Idle,
        };

        if self.traversal.is_finished() {
            debug!(?order, "starting a new search");
            self.traversal = Traversal::new(self.grid.entry(), self.grid.exit());
            self.solution.clear();
        }

        let result = self.traversal.step(order, &self.tree, &self.edges);
        match result {
            StepResult::FoundPath(ref path) => {
                self.solution = path.clone();
                self.modes = TraversalModes::default();
            }
            StepResult::Idle => {
                self.modes = TraversalModes::default();
            }
            StepResult::Continuing => {
                if self.traversal.is_finished() {
                    self.modes = TraversalModes::default();
                }
            }
        }
        result
    }

    /// Depth first search from entry to exit that leaves any stepped search untouched.
    /// The path runs from the exit back to the entry and is empty if there is none.
    pub fn solve(&self) -> Vec<CellIndex> {
        pathing::solve(self.grid.entry(), self.grid.exit(), &self.tree, &self.edges)
    }
}

fn build<W: WeightSource>(width: usize,
                          height: usize,
                          weights: &mut W)
                          -> Result<(Grid, EdgeSet, SpanningTree)> {
    let grid = Grid::new(Width(width), Height(height))?;
    let edges = EdgeSet::generate(&grid, weights);
    let tree = kruskal(&grid, &edges);
    debug!(width, height, passages = tree.links_count(), "maze generated");
    Ok((grid, edges, tree))
}
