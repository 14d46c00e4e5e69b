use rand::rngs::StdRng;
use rand::Rng;

use crate::cells::CellIndex;
use crate::grid::Grid;
use crate::units::{EdgesCount, Height, Width};

pub const MIN_WEIGHT: u32 = 1;
pub const MAX_WEIGHT: u32 = 1000;

/// Generation order of an edge within its `EdgeSet`.
///
/// Two edges are the same edge only if their ids match; endpoint equality says nothing.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct EdgeId(pub usize);

/// A potential passage between two adjacent cells.
///
/// Freshly generated edges always have `first` above or to the left of `second`.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct PassageEdge {
    pub id: EdgeId,
    pub first: CellIndex,
    pub second: CellIndex,
    pub weight: u32,
}

impl PassageEdge {
    #[inline]
    pub fn connects(&self, a: CellIndex, b: CellIndex) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }

    #[inline]
    pub fn touches(&self, cell: CellIndex) -> bool {
        self.first == cell || self.second == cell
    }

    /// The endpoint that is not `cell`.
    /// Panics if `cell` is not an endpoint of this edge.
    pub fn other(&self, cell: CellIndex) -> CellIndex {
        if self.first == cell {
            self.second
        } else if self.second == cell {
            self.first
        } else {
            panic!("{:?} is not an endpoint of {:?}", cell, self)
        }
    }

    /// The same edge pointing back at `from`: `first` is the cell reached, `second` is `from`.
    pub fn reached_from(&self, from: CellIndex) -> PassageEdge {
        PassageEdge {
            id: self.id,
            first: self.other(from),
            second: from,
            weight: self.weight,
        }
    }
}

/// Supplies edge weights in `[MIN_WEIGHT, MAX_WEIGHT]`, one call per generated edge.
pub trait WeightSource {
    fn next_weight(&mut self) -> u32;
}

impl WeightSource for StdRng {
    fn next_weight(&mut self) -> u32 {
        self.gen_range(MIN_WEIGHT..=MAX_WEIGHT)
    }
}

/// Every horizontal and vertical adjacency in a grid, each with a random weight.
#[derive(Clone, Debug)]
pub struct EdgeSet {
    edges: Vec<PassageEdge>,
}

impl EdgeSet {
    /// Walk the cells in column-major order emitting the rightward edge, then the downward
    /// edge, of each cell. That order is the tie-break when sorting equal weights.
    pub fn generate<W: WeightSource>(grid: &Grid, weights: &mut W) -> EdgeSet {
        let (Width(width), Height(height)) = (grid.width(), grid.height());
        let (_, EdgesCount(edges_count)) = grid.graph_size();
        let rightward_limit = height * (width - 1);

        let mut edges = Vec::with_capacity(edges_count);
        let mut push_edge = |first: usize, second: usize, weight: u32| {
            let id = EdgeId(edges.len());
            edges.push(PassageEdge {
                id,
                first: CellIndex(first),
                second: CellIndex(second),
                weight,
            });
        };

        for i in 0..grid.size() {
            if i < rightward_limit {
                push_edge(i, i + height, weights.next_weight());
            }
            if (i + 1) % height != 0 {
                push_edge(i, i + 1, weights.next_weight());
            }
        }

        EdgeSet { edges }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Panics if the id is not from this set.
    #[inline]
    pub fn get(&self, id: EdgeId) -> &PassageEdge {
        &self.edges[id.0]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<PassageEdge> {
        self.edges.iter()
    }

    /// Edge ids stably sorted by ascending weight.
    pub fn sorted_by_weight(&self) -> Vec<EdgeId> {
        let mut ids = self.edges.iter().map(|e| e.id).collect::<Vec<_>>();
        ids.sort_by_key(|id| self.edges[id.0].weight);
        ids
    }
}
