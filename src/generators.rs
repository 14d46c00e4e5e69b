use bit_set::BitSet;
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use smallvec::SmallVec;
use tracing::debug;

use crate::cells::CellIndex;
use crate::disjoint_set::DisjointSet;
use crate::edges::{EdgeId, EdgeSet};
use crate::grid::Grid;

pub type PassageSmallVec = SmallVec<[EdgeId; 4]>;

/// The passages of a maze and, by complement, its walls.
#[derive(Clone, Debug)]
pub struct SpanningTree {
    passages: Vec<EdgeId>,
    walls: Vec<EdgeId>,
    // Passages touching each cell, in the order they were selected.
    incident: Vec<PassageSmallVec>,
    links: UnGraph<(), EdgeId>,
}

impl SpanningTree {
    fn new(cells_count: usize,
           edges: &EdgeSet,
           passages: Vec<EdgeId>,
           walls: Vec<EdgeId>)
           -> SpanningTree {

        let mut incident = vec![PassageSmallVec::new(); cells_count];
        let mut links = UnGraph::with_capacity(cells_count, passages.len());
        for _ in 0..cells_count {
            let _ = links.add_node(());
        }

        for id in &passages {
            let edge = edges.get(*id);
            incident[edge.first.0].push(*id);
            incident[edge.second.0].push(*id);
            let _ = links.add_edge(NodeIndex::new(edge.first.0), NodeIndex::new(edge.second.0), *id);
        }

        SpanningTree {
            passages,
            walls,
            incident,
            links,
        }
    }

    /// Open passages in the order Kruskal's algorithm selected them.
    #[inline]
    pub fn passages(&self) -> &[EdgeId] {
        &self.passages
    }

    /// Every edge that is not a passage, in ascending weight order.
    #[inline]
    pub fn walls(&self) -> &[EdgeId] {
        &self.walls
    }

    #[inline]
    pub fn links_count(&self) -> usize {
        self.passages.len()
    }

    /// Passages touching `cell`, in selection order.
    #[inline]
    pub fn passages_at(&self, cell: CellIndex) -> &[EdgeId] {
        &self.incident[cell.0]
    }

    /// The passage joining two cells, if one exists.
    pub fn passage_between(&self, a: CellIndex, b: CellIndex) -> Option<EdgeId> {
        if a == b || a.0 >= self.incident.len() || b.0 >= self.incident.len() {
            return None;
        }
        self.links
            .find_edge(NodeIndex::new(a.0), NodeIndex::new(b.0))
            .map(|edge_index| self.links[edge_index])
    }

    /// Are two cells joined by a passage?
    #[inline]
    pub fn is_linked(&self, a: CellIndex, b: CellIndex) -> bool {
        self.passage_between(a, b).is_some()
    }

    /// A perfect maze: one connected component and no cycles.
    pub fn is_perfect(&self) -> bool {
        let cells_count = self.incident.len();
        connected_components(&self.links) == 1 && self.passages.len() + 1 == cells_count
    }

    /// Passages as pairs of cell indices, in selection order.
    pub fn iter_links(&self) -> impl Iterator<Item = (CellIndex, CellIndex)> + '_ {
        self.links
            .raw_edges()
            .iter()
            .map(|edge| (CellIndex(edge.source().index()), CellIndex(edge.target().index())))
    }
}

/// Build a maze from the weighted edges of a grid with Kruskal's algorithm.
pub fn kruskal(grid: &Grid, edges: &EdgeSet) -> SpanningTree {
    kruskal_with_components(grid, edges).0
}

/// Kruskal's algorithm, also handing back the disjoint set in its final state.
///
/// The scan stops once `edges.len() - 1` edges have been examined or `grid.size()` unions
/// have happened, whichever comes first. Grids at least two cells wide and tall never need
/// the heaviest edge, so the result is a true spanning tree. A single row or column needs
/// every edge, and the heaviest one is never examined: those mazes come out split in two.
pub fn kruskal_with_components(grid: &Grid, edges: &EdgeSet) -> (SpanningTree, DisjointSet) {
    let sorted = edges.sorted_by_weight();
    let mut components = DisjointSet::new(grid.iter_coordinates());

    let total_cells = grid.size();
    let examine_limit = edges.len().saturating_sub(1);
    let mut edges_examined = 0;
    let mut vertices_unioned = 0;
    let mut passages = Vec::with_capacity(total_cells.saturating_sub(1));
    let mut selected = BitSet::with_capacity(edges.len());

    while edges_examined < examine_limit && vertices_unioned < total_cells {
        let edge = edges.get(sorted[edges_examined]);
        let root_a = components.find(grid.coordinate(edge.first));
        let root_b = components.find(grid.coordinate(edge.second));

        if root_a != root_b {
            passages.push(edge.id);
            let _ = selected.insert(edge.id.0);
            components.union(root_a, root_b);
            vertices_unioned += 1;
        }
        edges_examined += 1;
    }

    let walls = sorted.into_iter()
        .filter(|id| !selected.contains(id.0))
        .collect::<Vec<_>>();

    debug!(cells = total_cells,
           edges = edges.len(),
           examined = edges_examined,
           passages = passages.len(),
           walls = walls.len(),
           "kruskal spanning tree built");

    (SpanningTree::new(total_cells, edges, passages, walls), components)
}

#[cfg(test)]
mod tests {

    use quickcheck::{quickcheck, TestResult};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::cells::Cartesian2DCoordinate;
    use crate::edges::tests::{ScriptedWeights, FOUR_BY_TWO_WEIGHTS, TWO_BY_TWO_WEIGHTS};
    use crate::units::{Height, Width};

    fn grid(w: usize, h: usize) -> Grid {
        Grid::new(Width(w), Height(h)).expect("valid dimensions")
    }

    fn ids(raw: &[usize]) -> Vec<EdgeId> {
        raw.iter().map(|i| EdgeId(*i)).collect()
    }

    fn gc(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x, y)
    }

    #[test]
    fn two_by_two_tree_and_walls() {
        let g = grid(2, 2);
        let edges = EdgeSet::generate(&g, &mut ScriptedWeights::new(&TWO_BY_TWO_WEIGHTS));
        let (tree, components) = kruskal_with_components(&g, &edges);

        // e2, e1, e4 selected; e3 joins n2 and n4 which are already connected through n1
        assert_eq!(tree.passages(), &ids(&[1, 0, 3])[..]);
        assert_eq!(tree.walls(), &ids(&[2])[..]);
        assert!(tree.is_perfect());

        assert_eq!(components.points_to(gc(0, 0)), Some(gc(0, 1)));
        assert_eq!(components.points_to(gc(1, 0)), Some(gc(1, 1)));
        assert_eq!(components.points_to(gc(0, 1)), Some(gc(1, 0)));
        assert_eq!(components.points_to(gc(1, 1)), Some(gc(1, 1)));
    }

    #[test]
    fn four_by_two_tree_walls_and_snapshot() {
        let g = grid(4, 2);
        let edges = EdgeSet::generate(&g, &mut ScriptedWeights::new(&FOUR_BY_TWO_WEIGHTS));
        assert_eq!(edges.sorted_by_weight(), ids(&[6, 3, 4, 5, 2, 0, 8, 9, 1, 7]));

        let (tree, components) = kruskal_with_components(&g, &edges);
        assert_eq!(tree.passages(), &ids(&[6, 3, 4, 5, 2, 0, 8])[..]);
        assert_eq!(tree.walls(), &ids(&[9, 1, 7])[..]);
        assert!(tree.is_perfect());

        let expected = [(gc(0, 0), gc(2, 1)),
                        (gc(1, 0), gc(3, 0)),
                        (gc(2, 0), gc(3, 0)),
                        (gc(3, 0), gc(1, 1)),
                        (gc(0, 1), gc(2, 1)),
                        (gc(1, 1), gc(2, 1)),
                        (gc(2, 1), gc(3, 1)),
                        (gc(3, 1), gc(3, 1))];
        assert_eq!(components.len(), expected.len());
        for &(key, target) in &expected {
            assert_eq!(components.points_to(key), Some(target), "key {:?}", key);
            assert_eq!(components.find(key), gc(3, 1));
        }
    }

    #[test]
    fn passages_at_follow_selection_order() {
        let g = grid(4, 2);
        let edges = EdgeSet::generate(&g, &mut ScriptedWeights::new(&FOUR_BY_TWO_WEIGHTS));
        let tree = kruskal(&g, &edges);
        assert_eq!(tree.passages_at(CellIndex(2)), &ids(&[3, 4, 0])[..]);
        assert_eq!(tree.passages_at(CellIndex(3)), &ids(&[4, 5, 2])[..]);
        assert_eq!(tree.passages_at(CellIndex(7)), &ids(&[8])[..]);
    }

    #[test]
    fn linked_cells() {
        let g = grid(2, 2);
        let edges = EdgeSet::generate(&g, &mut ScriptedWeights::new(&TWO_BY_TWO_WEIGHTS));
        let tree = kruskal(&g, &edges);
        let (n1, n2, n3, n4) = (CellIndex(0), CellIndex(1), CellIndex(2), CellIndex(3));

        assert!(tree.is_linked(n1, n2) && tree.is_linked(n2, n1));
        assert!(tree.is_linked(n1, n3) && tree.is_linked(n3, n1));
        assert!(tree.is_linked(n3, n4) && tree.is_linked(n4, n3));
        assert!(!tree.is_linked(n2, n4));
        assert!(!tree.is_linked(n1, n4));
        assert!(!tree.is_linked(n1, n1));
        assert!(!tree.is_linked(n1, CellIndex(99)));
        assert_eq!(tree.passage_between(n3, n4), Some(EdgeId(3)));
        assert_eq!(tree.iter_links().count(), 3);
    }

    #[test]
    fn single_cell_has_no_passages() {
        let g = grid(1, 1);
        let mut rng = StdRng::seed_from_u64(3);
        let edges = EdgeSet::generate(&g, &mut rng);
        let tree = kruskal(&g, &edges);
        assert!(tree.passages().is_empty());
        assert!(tree.walls().is_empty());
        assert!(tree.is_perfect());
    }

    #[test]
    fn single_row_mazes_drop_their_heaviest_edge() {
        // Every edge of a single row is a bridge, but the scan stops one edge short.
        let g = grid(4, 1);
        let edges = EdgeSet::generate(&g, &mut ScriptedWeights::new(&[10, 30, 20]));
        let tree = kruskal(&g, &edges);
        assert_eq!(tree.passages(), &ids(&[0, 2])[..]);
        assert_eq!(tree.walls(), &ids(&[1])[..]);
        assert!(!tree.is_perfect());

        let pair = grid(1, 2);
        let edges = EdgeSet::generate(&pair, &mut ScriptedWeights::new(&[5]));
        let tree = kruskal(&pair, &edges);
        assert!(tree.passages().is_empty());
        assert_eq!(tree.walls(), &ids(&[0])[..]);
    }

    #[test]
    fn quickcheck_two_dimensional_grids_give_perfect_mazes() {
        fn p(w: u8, h: u8, seed: u64) -> TestResult {
            let (w, h) = (w as usize % 12 + 2, h as usize % 12 + 2);
            let g = grid(w, h);
            let edges = EdgeSet::generate(&g, &mut StdRng::seed_from_u64(seed));
            let (tree, components) = kruskal_with_components(&g, &edges);

            let one_root = g.iter_coordinates()
                .map(|c| components.find(c))
                .all(|root| root == components.find(gc(0, 0)));
            TestResult::from_bool(tree.is_perfect() &&
                                  tree.links_count() == w * h - 1 &&
                                  tree.links_count() + tree.walls().len() == edges.len() &&
                                  one_root)
        }
        quickcheck(p as fn(u8, u8, u64) -> TestResult)
    }

    #[test]
    fn quickcheck_single_lines_are_one_passage_short() {
        fn p(len: u8, vertical: bool, seed: u64) -> TestResult {
            let len = len as usize % 30 + 2;
            let g = if vertical { grid(1, len) } else { grid(len, 1) };
            let edges = EdgeSet::generate(&g, &mut StdRng::seed_from_u64(seed));
            let tree = kruskal(&g, &edges);
            let heaviest = *edges.sorted_by_weight().last().unwrap();
            TestResult::from_bool(tree.links_count() == len - 2 &&
                                  tree.walls() == &[heaviest][..])
        }
        quickcheck(p as fn(u8, bool, u64) -> TestResult)
    }
}
