use std::fmt;

use bit_set::BitSet;

use crate::cells::{CellIndex, CompassPrimary};
use crate::maze::Maze;
use crate::pathing::Traversal;
use crate::units::{Height, Width};

pub trait GridDisplay {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: CellIndex) -> String {
        String::from("   ")
    }
}

fn blank_body(body: &str) -> bool {
    body.chars().all(char::is_whitespace)
}

fn cell_set(cells: &[CellIndex]) -> BitSet {
    cells.iter().map(|c| c.0).collect()
}

#[derive(Debug)]
pub struct PathDisplay {
    on_path: BitSet,
}
impl PathDisplay {
    pub fn new(path: &[CellIndex]) -> Self {
        PathDisplay { on_path: cell_set(path) }
    }
}
impl GridDisplay for PathDisplay {
    fn render_cell_body(&self, cell: CellIndex) -> String {
        if self.on_path.contains(cell.0) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}

#[derive(Debug)]
pub struct StartEndPointsDisplay {
    start: CellIndex,
    end: CellIndex,
}
impl StartEndPointsDisplay {
    pub fn new(start: CellIndex, end: CellIndex) -> StartEndPointsDisplay {
        StartEndPointsDisplay { start, end }
    }
}
impl GridDisplay for StartEndPointsDisplay {
    fn render_cell_body(&self, cell: CellIndex) -> String {
        if cell == self.start {
            String::from(" S ")
        } else if cell == self.end {
            String::from(" E ")
        } else {
            String::from("   ")
        }
    }
}

/// Cells a search has processed, and those still waiting on its frontier.
#[derive(Debug)]
pub struct VisitedDisplay {
    visited: BitSet,
    pending: BitSet,
}
impl VisitedDisplay {
    pub fn new(traversal: &Traversal) -> Self {
        VisitedDisplay {
            visited: cell_set(traversal.visited_cells()),
            pending: traversal.frontier().iter().map(|c| c.0).collect(),
        }
    }
}
impl GridDisplay for VisitedDisplay {
    fn render_cell_body(&self, cell: CellIndex) -> String {
        if self.visited.contains(cell.0) {
            String::from(" ~ ")
        } else if self.pending.contains(cell.0) {
            String::from(" ? ")
        } else {
            String::from("   ")
        }
    }
}

#[derive(Debug)]
pub struct PlayerDisplay {
    player: CellIndex,
    trail: BitSet,
}
impl PlayerDisplay {
    pub fn new(player: CellIndex, trail: &[CellIndex]) -> Self {
        PlayerDisplay {
            player,
            trail: cell_set(trail),
        }
    }
}
impl GridDisplay for PlayerDisplay {
    fn render_cell_body(&self, cell: CellIndex) -> String {
        if cell == self.player {
            String::from(" @ ")
        } else if self.trail.contains(cell.0) {
            String::from(" ~ ")
        } else {
            String::from("   ")
        }
    }
}

/// Stack of displays where the first layer with something to show for a cell wins.
#[derive(Default)]
pub struct LayeredDisplay<'a> {
    layers: Vec<&'a dyn GridDisplay>,
}
impl<'a> LayeredDisplay<'a> {
    pub fn new() -> Self {
        LayeredDisplay { layers: vec![] }
    }

    pub fn layer(mut self, display: &'a dyn GridDisplay) -> Self {
        self.layers.push(display);
        self
    }
}
impl<'a> GridDisplay for LayeredDisplay<'a> {
    fn render_cell_body(&self, cell: CellIndex) -> String {
        self.layers
            .iter()
            .map(|layer| layer.render_cell_body(cell))
            .find(|body| !blank_body(body))
            .unwrap_or_else(|| String::from("   "))
    }
}

/// Draw the maze walls with box drawing glyphs, asking `display` for each cell body.
pub fn render(maze: &Maze, display: &dyn GridDisplay) -> String {
    const WALL_L: &str = "╴";
    const WALL_R: &str = "╶";
    const WALL_U: &str = "╵";
    const WALL_D: &str = "╷";
    const WALL_LR_3: &str = "───";
    const WALL_LR: &str = "─";
    const WALL_UD: &str = "│";
    const WALL_LD: &str = "┐";
    const WALL_RU: &str = "└";
    const WALL_LU: &str = "┘";
    const WALL_RD: &str = "┌";
    const WALL_LRU: &str = "┴";
    const WALL_LRD: &str = "┬";
    const WALL_LRUD: &str = "┼";
    const WALL_RUD: &str = "├";
    const WALL_LUD: &str = "┤";

    let grid = maze.grid();
    let tree = maze.spanning_tree();
    let (Width(columns_count), Height(rows_count)) = (grid.width(), grid.height());
    let cell_at = |x: usize, y: usize| CellIndex(x * rows_count + y);

    let is_neighbour_linked = |cell: CellIndex, direction: CompassPrimary| {
        grid.cell(cell)
            .neighbour_at_direction(direction)
            .map_or(false, |neighbour| tree.is_linked(cell, neighbour))
    };

    // Start by special case rendering the text for the north most boundary
    let mut output = String::from(WALL_RD);
    for x in 0..columns_count {
        output.push_str(WALL_LR_3);
        if is_neighbour_linked(cell_at(x, 0), CompassPrimary::East) {
            output.push_str(WALL_LR);
        } else if x == columns_count - 1 {
            output.push_str(WALL_LD);
        } else {
            output.push_str(WALL_LRD);
        }
    }
    output.push('\n');

    for y in 0..rows_count {
        let is_last_row = y == rows_count - 1;

        // The top section of each cell is drawn by the previous row.
        let mut row_middle_section_render = String::from(WALL_UD);
        let mut row_bottom_section_render = String::new();

        for x in 0..columns_count {
            let cell = cell_at(x, y);
            let is_last_column = x == columns_count - 1;
            let east_open = is_neighbour_linked(cell, CompassPrimary::East);
            let south_open = is_neighbour_linked(cell, CompassPrimary::South);

            row_middle_section_render.push_str(&display.render_cell_body(cell));
            row_middle_section_render.push_str(if east_open { " " } else { WALL_UD });

            if x == 0 {
                row_bottom_section_render.push_str(if is_last_row {
                    WALL_RU
                } else if south_open {
                    WALL_UD
                } else {
                    WALL_RUD
                });
            }
            row_bottom_section_render.push_str(if south_open { "   " } else { WALL_LR_3 });

            let corner = match (is_last_row, is_last_column) {
                (true, true) => WALL_LU,
                (true, false) => if east_open { WALL_LR } else { WALL_LRU },
                (false, true) => if south_open { WALL_UD } else { WALL_LUD },
                (false, false) => {
                    let access_se_from_east =
                        is_neighbour_linked(cell_at(x + 1, y), CompassPrimary::South);
                    let access_se_from_south =
                        is_neighbour_linked(cell_at(x, y + 1), CompassPrimary::East);
                    let show_right_section = !access_se_from_east;
                    let show_down_section = !access_se_from_south;
                    let show_up_section = !east_open;
                    let show_left_section = !south_open;

                    match (show_left_section,
                           show_right_section,
                           show_up_section,
                           show_down_section) {
                        (true, true, true, true) => WALL_LRUD,
                        (true, true, true, false) => WALL_LRU,
                        (true, true, false, true) => WALL_LRD,
                        (true, false, true, true) => WALL_LUD,
                        (false, true, true, true) => WALL_RUD,
                        (true, true, false, false) => WALL_LR,
                        (false, false, true, true) => WALL_UD,
                        (false, true, true, false) => WALL_RU,
                        (true, false, false, true) => WALL_LD,
                        (true, false, true, false) => WALL_LU,
                        (false, true, false, true) => WALL_RD,
                        (true, false, false, false) => WALL_L,
                        (false, true, false, false) => WALL_R,
                        (false, false, true, false) => WALL_U,
                        (false, false, false, true) => WALL_D,
                        _ => " ",
                    }
                }
            };
            row_bottom_section_render.push_str(corner);
        }

        output.push_str(&row_middle_section_render);
        output.push('\n');
        output.push_str(&row_bottom_section_render);
        output.push('\n');
    }

    output
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let player = PlayerDisplay::new(self.player(), self.trail());
        let solution = PathDisplay::new(self.solution());
        let start_end = StartEndPointsDisplay::new(self.grid().entry(), self.grid().exit());
        let display = LayeredDisplay::new()
            .layer(&solution)
            .layer(&player)
            .layer(&start_end);
        write!(f, "{}", render(self, &display))
    }
}
