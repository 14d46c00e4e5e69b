#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Width(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Height(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct NodesCount(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct EdgesCount(pub usize);

/// Count of cells and adjacency edges in a fully connected `width * height` grid.
///
/// Every column but the last contributes `height` rightward edges and every column
/// contributes `height - 1` downward edges.
pub fn graph_size(Width(width): Width, Height(height): Height) -> (NodesCount, EdgesCount) {
    let nodes = width * height;
    let edges = height * width.saturating_sub(1) + width * height.saturating_sub(1);
    (NodesCount(nodes), EdgesCount(edges))
}
