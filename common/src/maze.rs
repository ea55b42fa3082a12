pub mod maker;

use std::fmt;

use glam::{Vec2, vec2};
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::error::MazeError;
use maker::MazeMaker;

pub const MIN_DIMENSION: usize = 3;
pub const MAX_DIMENSION: usize = 1001;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Wall,
    Open,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Orthogonal neighbors that don't underflow. Upper bounds are the
    /// caller's business.
    pub fn orthogonal(&self) -> impl Iterator<Item = Position> + use<> {
        let Position { x, y } = *self;
        [
            x.checked_add(1).map(|x| Position::new(x, y)),
            x.checked_sub(1).map(|x| Position::new(x, y)),
            y.checked_add(1).map(|y| Position::new(x, y)),
            y.checked_sub(1).map(|y| Position::new(x, y)),
        ]
        .into_iter()
        .flatten()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct Maze {
    pub grid: Vec<Vec<Tile>>,
    pub spaces: Vec<Position>,
    pub cell_size: f32,
}

impl Maze {
    /// Carves a new perfect maze. The same `seed` always yields the same
    /// layout; `None` draws a fresh seed from the OS.
    pub fn new(
        cols: usize,
        rows: usize,
        cell_size: f32,
        seed: Option<u64>,
    ) -> Result<Self, MazeError> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::carve(cols, rows, cell_size, &mut rng)
    }

    pub fn carve(
        cols: usize,
        rows: usize,
        cell_size: f32,
        rng: &mut StdRng,
    ) -> Result<Self, MazeError> {
        let allowed = MIN_DIMENSION..=MAX_DIMENSION;
        if !allowed.contains(&cols) || !allowed.contains(&rows) {
            return Err(MazeError::InvalidGridDimensions { cols, rows });
        }

        let maker = MazeMaker::new(cols, rows, rng);
        let maze = Self::from_grid(maker.grid, cell_size);

        tracing::debug!(
            cols,
            rows,
            open = maze.spaces.len(),
            connections = maze.connections(),
            "maze carved"
        );

        Ok(maze)
    }

    pub fn from_grid(grid: Vec<Vec<Tile>>, cell_size: f32) -> Self {
        let mut spaces = Vec::new();

        for (y, row) in grid.iter().enumerate() {
            for (x, &tile) in row.iter().enumerate() {
                if tile == Tile::Open {
                    spaces.push(Position::new(x, y));
                }
            }
        }

        Self {
            grid,
            spaces,
            cell_size,
        }
    }

    pub fn cols(&self) -> usize {
        self.grid.first().map_or(0, Vec::len)
    }

    pub fn rows(&self) -> usize {
        self.grid.len()
    }

    pub fn start(&self) -> Position {
        Position::new(1, 1)
    }

    pub fn tile(&self, position: Position) -> Option<Tile> {
        self.grid
            .get(position.y)
            .and_then(|row| row.get(position.x))
            .copied()
    }

    pub fn is_open(&self, position: Position) -> bool {
        self.tile(position) == Some(Tile::Open)
    }

    pub fn open_neighbors(&self, position: Position) -> impl Iterator<Item = Position> + '_ {
        position.orthogonal().filter(|&p| self.is_open(p))
    }

    /// Number of open-to-open adjacencies. For a perfect maze this is one
    /// less than the number of open cells.
    pub fn connections(&self) -> usize {
        self.spaces
            .iter()
            .map(|p| {
                let right = self.is_open(Position::new(p.x + 1, p.y));
                let down = self.is_open(Position::new(p.x, p.y + 1));
                right as usize + down as usize
            })
            .sum()
    }

    pub fn center_of(&self, position: Position) -> Vec2 {
        vec2(
            (position.x as f32 + 0.5) * self.cell_size,
            (position.y as f32 + 0.5) * self.cell_size,
        )
    }

    pub fn cell_at(&self, point: Vec2) -> Option<Position> {
        let col = (point.x / self.cell_size).floor();
        let row = (point.y / self.cell_size).floor();

        if col < 0.0 || row < 0.0 {
            return None;
        }

        let position = Position::new(col as usize, row as usize);
        if position.y >= self.rows() || position.x >= self.cols() {
            return None;
        }

        Some(position)
    }

    /// Whether `point` lies in an open cell. Points outside the grid are
    /// blocked: the border walls enclose everything.
    pub fn is_way_clear(&self, point: Vec2) -> bool {
        self.cell_at(point).is_some_and(|p| self.is_open(p))
    }

    pub fn log(&self) -> String {
        self.grid
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&tile| if tile == Tile::Open { "  " } else { "██" })
                    .collect::<String>()
            })
            .collect::<Vec<String>>()
            .join("\n")
    }
}

impl fmt::Debug for Maze {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.log())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use disjoint::DisjointSet;

    use super::*;

    const CELL_SIZE: f32 = 40.0;

    #[test]
    fn test_backtrack_all_spaces_are_connected() {
        for _ in 0..64 {
            let maze = Maze::new(31, 31, CELL_SIZE, None).expect("valid dimensions");
            assert_all_spaces_are_connected(&maze);
        }
    }

    #[test]
    fn test_backtrack_carves_a_tree() {
        for seed in 0..64 {
            let maze = Maze::new(30, 30, CELL_SIZE, Some(seed)).expect("valid dimensions");
            assert_no_cycles(&maze);
            assert_eq!(
                maze.connections(),
                maze.spaces.len() - 1,
                "a perfect maze has one connection fewer than open cells:\n{}",
                maze.log()
            );
        }
    }

    #[test]
    fn test_border_cells_stay_walls() {
        for (cols, rows) in [(3, 3), (4, 7), (30, 30), (31, 17)] {
            let maze = Maze::new(cols, rows, CELL_SIZE, None).expect("valid dimensions");
            for x in 0..cols {
                assert_eq!(maze.grid[0][x], Tile::Wall);
                assert_eq!(maze.grid[rows - 1][x], Tile::Wall);
            }
            for y in 0..rows {
                assert_eq!(maze.grid[y][0], Tile::Wall);
                assert_eq!(maze.grid[y][cols - 1], Tile::Wall);
            }
        }
    }

    #[test]
    fn test_start_is_always_open() {
        let maze = Maze::new(3, 3, CELL_SIZE, None).expect("valid dimensions");
        assert!(maze.is_open(maze.start()));
        assert_eq!(maze.spaces, vec![Position::new(1, 1)]);
        assert_eq!(maze.connections(), 0);
    }

    #[test]
    fn test_same_seed_reproduces_the_same_maze() {
        let first = Maze::new(5, 5, CELL_SIZE, Some(7)).expect("valid dimensions");
        let second = Maze::new(5, 5, CELL_SIZE, Some(7)).expect("valid dimensions");
        assert_eq!(first.grid, second.grid);

        let first = Maze::new(41, 25, CELL_SIZE, Some(2024)).expect("valid dimensions");
        let second = Maze::new(41, 25, CELL_SIZE, Some(2024)).expect("valid dimensions");
        assert_eq!(first.grid, second.grid);
    }

    #[test]
    fn test_5x5_maze_opens_every_room() {
        let maze = Maze::new(5, 5, CELL_SIZE, Some(1)).expect("valid dimensions");

        for room in [(1, 1), (3, 1), (1, 3), (3, 3)] {
            assert!(maze.is_open(Position::new(room.0, room.1)));
        }
        // Four rooms joined by three carved walls.
        assert_eq!(maze.spaces.len(), 7);
        assert_eq!(maze.grid[2][2], Tile::Wall, "pillars are never carved");
    }

    #[test]
    fn test_rejects_grids_out_of_range() {
        assert_eq!(
            Maze::new(2, 10, CELL_SIZE, None).unwrap_err(),
            MazeError::InvalidGridDimensions { cols: 2, rows: 10 }
        );
        assert_eq!(
            Maze::new(10, 0, CELL_SIZE, Some(3)).unwrap_err(),
            MazeError::InvalidGridDimensions { cols: 10, rows: 0 }
        );
        assert_eq!(
            Maze::new(100_000, 100_000, CELL_SIZE, Some(3)).unwrap_err(),
            MazeError::InvalidGridDimensions {
                cols: 100_000,
                rows: 100_000,
            }
        );
        assert!(Maze::new(MAX_DIMENSION, 3, CELL_SIZE, Some(3)).is_ok());
    }

    #[test]
    fn test_world_coordinates_round_trip_through_cells() {
        let maze = Maze::new(9, 9, CELL_SIZE, Some(5)).expect("valid dimensions");
        let center = maze.center_of(Position::new(3, 5));

        assert_eq!(center, vec2(140.0, 220.0));
        assert_eq!(maze.cell_at(center), Some(Position::new(3, 5)));
        assert_eq!(maze.cell_at(vec2(-1.0, 10.0)), None);
        assert_eq!(maze.cell_at(vec2(10.0, 9.0 * CELL_SIZE)), None);
    }

    #[test]
    fn test_is_way_clear() {
        let grid = vec![
            vec![Tile::Wall, Tile::Wall, Tile::Wall],
            vec![Tile::Wall, Tile::Open, Tile::Wall],
            vec![Tile::Wall, Tile::Wall, Tile::Wall],
        ];
        let maze = Maze::from_grid(grid, CELL_SIZE);

        assert!(maze.is_way_clear(vec2(60.0, 60.0)));
        assert!(!maze.is_way_clear(vec2(39.0, 60.0)));
        assert!(!maze.is_way_clear(vec2(-10.0, -10.0)));
    }

    fn assert_no_cycles(maze: &Maze) {
        let index = |p: Position| p.y * maze.cols() + p.x;
        let mut sets = DisjointSet::with_len(maze.cols() * maze.rows());

        for &p in &maze.spaces {
            for q in [Position::new(p.x + 1, p.y), Position::new(p.x, p.y + 1)] {
                if maze.is_open(q) {
                    assert!(
                        sets.join(index(p), index(q)),
                        "cycle through {} and {}:\n{}",
                        p,
                        q,
                        maze.log()
                    );
                }
            }
        }
    }

    fn assert_all_spaces_are_connected(maze: &Maze) {
        let height = maze.rows();
        let width = maze.cols();
        let start = maze.start();

        assert!(maze.is_open(start), "start should be open");

        let mut visited = vec![vec![false; width]; height];
        let mut queue: VecDeque<Position> = VecDeque::new();
        let mut visited_count = 0;

        queue.push_back(start);
        visited[start.y][start.x] = true;

        while let Some(cell) = queue.pop_front() {
            visited_count += 1;

            for next in maze.open_neighbors(cell) {
                if !visited[next.y][next.x] {
                    visited[next.y][next.x] = true;
                    queue.push_back(next);
                }
            }
        }

        assert!(
            maze.spaces.len() == visited_count,
            "all spaces should be connected:\n{}",
            maze.log()
        );
    }
}
