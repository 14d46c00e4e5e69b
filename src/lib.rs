//! **mazes** generates perfect mazes on a rectangular grid with Kruskal's algorithm over
//! randomly weighted edges, and walks them with step-at-a-time depth or breadth first
//! searches.

pub mod cells;
pub mod disjoint_set;
pub mod edges;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod maze;
pub mod pathing;
pub mod units;
