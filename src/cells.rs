use std::convert::From;

/// Position of a cell in the grid's column-major storage, `x * height + y`.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct CellIndex(pub usize);

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

/// North is up the screen (towards `y == 0`), West is left (towards `x == 0`).
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::South,
                                          CompassPrimary::East,
                                          CompassPrimary::West];

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    fn slot(self) -> usize {
        match self {
            CompassPrimary::North => 0,
            CompassPrimary::South => 1,
            CompassPrimary::East => 2,
            CompassPrimary::West => 3,
        }
    }
}

/// A maze cell and the four cells around it.
///
/// A cell on the grid boundary is its own neighbour in the direction that leaves the
/// grid, so `neighbour(dir) == index` means "no cell that way", never "unlinked".
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Cell {
    index: CellIndex,
    coordinate: Cartesian2DCoordinate,
    neighbours: [CellIndex; 4],
}

impl Cell {
    pub(crate) fn new(index: CellIndex, coordinate: Cartesian2DCoordinate) -> Cell {
        Cell {
            index,
            coordinate,
            neighbours: [index; 4],
        }
    }

    pub(crate) fn set_neighbour(&mut self, direction: CompassPrimary, neighbour: CellIndex) {
        self.neighbours[direction.slot()] = neighbour;
    }

    #[inline]
    pub fn index(&self) -> CellIndex {
        self.index
    }

    #[inline]
    pub fn coordinate(&self) -> Cartesian2DCoordinate {
        self.coordinate
    }

    #[inline]
    pub fn neighbour(&self, direction: CompassPrimary) -> CellIndex {
        self.neighbours[direction.slot()]
    }

    /// The neighbour in `direction` unless that direction leaves the grid.
    pub fn neighbour_at_direction(&self, direction: CompassPrimary) -> Option<CellIndex> {
        let neighbour = self.neighbour(direction);
        if neighbour != self.index {
            Some(neighbour)
        } else {
            None
        }
    }

    /// Which way `other` lies from this cell, if it is adjacent.
    pub fn direction_to(&self, other: CellIndex) -> Option<CompassPrimary> {
        if other == self.index {
            return None;
        }
        CompassPrimary::ALL
            .iter()
            .cloned()
            .find(|dir| self.neighbour(*dir) == other)
    }
}
