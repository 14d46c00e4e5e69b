use std::{thread, time::Duration};

use docopt::Docopt;
use serde_derive::Deserialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use mazes::{
    cells::{CellIndex, CompassPrimary},
    grid_displays::{self, LayeredDisplay, PathDisplay, PlayerDisplay, StartEndPointsDisplay,
                    VisitedDisplay},
    maze::Maze,
    pathing::{SearchOrder, StepResult},
};

const USAGE: &str = "Kruskal Mazes

Usage:
    mazes_driver -h | --help
    mazes_driver [--width=<w>] [--height=<h>] [--seed=<s>] [--solve]
    mazes_driver search (depth|breadth) [--width=<w>] [--height=<h>] [--seed=<s>] [--show-steps] [--tick-ms=<n>]
    mazes_driver play <moves> [--width=<w>] [--height=<h>] [--seed=<s>]

Options:
    -h --help          Show this screen.
    --width=<w>        The grid width in a w*h grid [default: 20].
    --height=<h>       The grid height in a w*h grid [default: 10].
    --seed=<s>         Seed for the edge weights. Fresh entropy is used if not specified.
    --solve            Show the path from the entry (top left) to the exit (bottom right).
    --show-steps       Print the maze after every search step that visits a new cell.
    --tick-ms=<n>      Milliseconds to wait between search steps [default: 0].

Moves are a string of u/d/l/r (or n/s/w/e) characters, e.g. `play ddrrd`.
Logging is controlled with the RUST_LOG environment variable.
";
#[derive(Debug, Deserialize)]
struct MazeArgs {
    flag_width: usize,
    flag_height: usize,
    flag_seed: Option<u64>,
    flag_solve: bool,
    cmd_search: bool,
    cmd_depth: bool,
    cmd_breadth: bool,
    flag_show_steps: bool,
    flag_tick_ms: u64,
    cmd_play: bool,
    arg_moves: String,
}

mod errors {
    use error_chain::*;
    error_chain! {
        links {
            Maze(::mazes::errors::Error, ::mazes::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
        }

        errors {
            UnknownMove(c: char) {
                description("unknown move")
                display("unknown move '{}', expected one of u d l r n s w e", c)
            }
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;
    debug!(?args, "parsed arguments");

    let mut maze = Maze::generate(args.flag_width, args.flag_height, args.flag_seed)?;

    if args.cmd_search {
        let order = if args.cmd_depth {
            SearchOrder::DepthFirst
        } else {
            debug_assert!(args.cmd_breadth);
            SearchOrder::BreadthFirst
        };
        run_search(&mut maze, order, args.flag_show_steps, args.flag_tick_ms);
    } else if args.cmd_play {
        let moves = parse_moves(&args.arg_moves)?;
        play(&mut maze, &moves);
    } else if args.flag_solve {
        let path = maze.solve();
        print_with_path(&maze, &path);
    } else {
        print!("{}", maze);
    }

    Ok(())
}

fn run_search(maze: &mut Maze, order: SearchOrder, show_steps: bool, tick_ms: u64) {
    maze.set_traversal_mode(Some(order));
    let mut steps = 0usize;

    while maze.traversal_mode().is_some() {
        let visited_before = maze.traversal().visited_cells().len();
        let result = maze.step();
        steps += 1;

        if show_steps && maze.traversal().visited_cells().len() != visited_before {
            print_search(maze);
        }
        if let StepResult::FoundPath(ref path) = result {
            info!(steps, path_len = path.len(), "exit found");
        }
        if tick_ms > 0 {
            thread::sleep(Duration::from_millis(tick_ms));
        }
    }

    if maze.solution().is_empty() {
        info!(steps, "search exhausted without reaching the exit");
    }
    print_search(maze);
    println!("{:?} search: {} steps, {} cells visited, path length {}",
             order,
             steps,
             maze.traversal().visited_cells().len(),
             maze.solution().len());
}

fn parse_moves(moves: &str) -> Result<Vec<CompassPrimary>> {
    moves.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| -> Result<CompassPrimary> {
            match c.to_ascii_lowercase() {
                'u' | 'n' => Ok(CompassPrimary::North),
                'd' | 's' => Ok(CompassPrimary::South),
                'l' | 'w' => Ok(CompassPrimary::West),
                'r' | 'e' => Ok(CompassPrimary::East),
                _ => Err(ErrorKind::UnknownMove(c).into()),
            }
        })
        .collect()
}

fn play(maze: &mut Maze, moves: &[CompassPrimary]) {
    for (n, direction) in moves.iter().enumerate() {
        if !maze.move_player(*direction) {
            println!("Move {} ({:?}) is blocked.", n + 1, direction);
        }
    }

    if maze.finish_if_at_exit() {
        print!("{}", maze);
        println!("You win!");
    } else {
        print!("{}", maze);
        println!("Player at {:?}, {} moves taken.",
                 maze.grid().coordinate(maze.player()),
                 maze.trail().len());
    }
}

fn print_search(maze: &Maze) {
    let path = PathDisplay::new(maze.solution());
    let visited = VisitedDisplay::new(maze.traversal());
    let start_end = StartEndPointsDisplay::new(maze.grid().entry(), maze.grid().exit());
    let display = LayeredDisplay::new()
        .layer(&path)
        .layer(&start_end)
        .layer(&visited);
    println!("{}", grid_displays::render(maze, &display));
}

fn print_with_path(maze: &Maze, path_cells: &[CellIndex]) {
    let path = PathDisplay::new(path_cells);
    let player = PlayerDisplay::new(maze.player(), maze.trail());
    let start_end = StartEndPointsDisplay::new(maze.grid().entry(), maze.grid().exit());
    let display = LayeredDisplay::new()
        .layer(&start_end)
        .layer(&path)
        .layer(&player);
    print!("{}", grid_displays::render(maze, &display));
}
