use std::fmt;
use std::ops::Range;
use std::u32;

use crate::cells::{Cartesian2DCoordinate, Cell, CellIndex, CompassPrimary};
use crate::errors::*;
use crate::units::{graph_size, EdgesCount, Height, NodesCount, Width};

/// A `width * height` arena of cells laid out column by column.
///
/// The cell at `(x, y)` lives at index `x * height + y`. Neighbour relations are stored
/// as indices into the arena.
#[derive(Clone)]
pub struct Grid {
    width: Width,
    height: Height,
    cells: Vec<Cell>,
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: width: {:?}, height: {:?}, cells: {}",
               self.width, self.height, self.cells.len())
    }
}

impl Grid {
    pub fn new(width: Width, height: Height) -> Result<Grid> {
        let (Width(w), Height(h)) = (width, height);
        if w < 1 || h < 1 {
            bail!(ErrorKind::InvalidDimensions(w, h));
        }
        if w > u32::MAX as usize || h > u32::MAX as usize || w.checked_mul(h).is_none() {
            bail!(ErrorKind::DimensionsTooLarge(w, h));
        }

        let (NodesCount(nodes), _) = graph_size(width, height);
        let mut cells = Vec::with_capacity(nodes);
        for x in 0..w {
            for y in 0..h {
                let index = CellIndex(cells.len());
                cells.push(Cell::new(index, Cartesian2DCoordinate::new(x as u32, y as u32)));
            }
        }

        for (i, cell) in cells.iter_mut().enumerate() {
            let Cartesian2DCoordinate { x, y } = cell.coordinate();
            let (x, y) = (x as usize, y as usize);
            if x != 0 {
                cell.set_neighbour(CompassPrimary::West, CellIndex(i - h));
            }
            if x != w - 1 {
                cell.set_neighbour(CompassPrimary::East, CellIndex(i + h));
            }
            if y != 0 {
                cell.set_neighbour(CompassPrimary::North, CellIndex(i - 1));
            }
            if y != h - 1 {
                cell.set_neighbour(CompassPrimary::South, CellIndex(i + 1));
            }
        }

        Ok(Grid { width, height, cells })
    }

    #[inline]
    pub fn width(&self) -> Width {
        self.width
    }

    #[inline]
    pub fn height(&self) -> Height {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn graph_size(&self) -> (NodesCount, EdgesCount) {
        graph_size(self.width, self.height)
    }

    /// The top left cell where the player starts and every search begins.
    #[inline]
    pub fn entry(&self) -> CellIndex {
        CellIndex(0)
    }

    /// The bottom right cell.
    #[inline]
    pub fn exit(&self) -> CellIndex {
        CellIndex(self.cells.len() - 1)
    }

    /// Panics if the index is not from this grid.
    #[inline]
    pub fn cell(&self, index: CellIndex) -> &Cell {
        &self.cells[index.0]
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn coordinate(&self, index: CellIndex) -> Cartesian2DCoordinate {
        self.cell(index).coordinate()
    }

    #[inline]
    pub fn neighbour(&self, index: CellIndex, direction: CompassPrimary) -> CellIndex {
        self.cell(index).neighbour(direction)
    }

    /// Convert a grid coordinate to its column-major index.
    /// Returns None if the grid coordinate is invalid.
    pub fn grid_coordinate_to_index(&self, coord: Cartesian2DCoordinate) -> Option<CellIndex> {
        if self.is_valid_coordinate(coord) {
            Some(CellIndex(coord.x as usize * self.height.0 + coord.y as usize))
        } else {
            None
        }
    }

    #[inline]
    pub fn is_valid_coordinate(&self, coord: Cartesian2DCoordinate) -> bool {
        (coord.x as usize) < self.width.0 && (coord.y as usize) < self.height.0
    }

    /// Cell indices in generation (column-major) order.
    pub fn iter(&self) -> CellIter {
        CellIter { indices: 0..self.cells.len() }
    }

    pub fn iter_coordinates<'a>(&'a self) -> impl Iterator<Item = Cartesian2DCoordinate> + 'a {
        self.cells.iter().map(Cell::coordinate)
    }
}

#[derive(Clone, Debug)]
pub struct CellIter {
    indices: Range<usize>,
}

impl Iterator for CellIter {
    type Item = CellIndex;

    fn next(&mut self) -> Option<Self::Item> {
        self.indices.next().map(CellIndex)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}
impl ExactSizeIterator for CellIter {} // default impl using size_hint()
