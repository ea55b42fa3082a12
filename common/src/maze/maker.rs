use rand::{Rng, seq::SliceRandom};

use super::{Position, Tile};

// Two-step offsets: from one room to the next, jumping over the wall between.
const ROOM_STEPS: [(isize, isize); 4] = [(2, 0), (-2, 0), (0, 2), (0, -2)];

pub struct MazeMaker<R: Rng> {
    pub grid: Vec<Vec<Tile>>,
    rng: R,
    width: usize,
    height: usize,
}

impl<R: Rng> MazeMaker<R> {
    /// Carves a perfect maze into a `width` by `height` grid of walls,
    /// starting from `(1, 1)`. Dimensions are assumed to be validated by the
    /// caller.
    pub fn new(width: usize, height: usize, rng: R) -> Self {
        debug_assert!(width >= 3 && height >= 3, "maze is too small to carve");

        let grid = vec![vec![Tile::Wall; width]; height];
        let mut maze = MazeMaker {
            grid,
            rng,
            width,
            height,
        };
        maze.backtrack();
        maze
    }

    // Iterative depth-first carving. A room is only ever joined to the room
    // it was discovered from, so the open cells form a tree.
    fn backtrack(&mut self) {
        let start = Position::new(1, 1);
        self.visit_cell(start);

        let mut stack = vec![start];

        while let Some(cell) = stack.pop() {
            for neighbor in self.get_neighbors(cell) {
                if self.is_visited(neighbor) {
                    continue;
                }

                self.visit_cell(neighbor);
                self.remove_wall_between(cell, neighbor);
                stack.push(neighbor);
            }
        }
    }

    // Interior rooms two steps away, in a uniformly shuffled order.
    fn get_neighbors(&mut self, cell: Position) -> Vec<Position> {
        let mut steps = ROOM_STEPS;
        steps.shuffle(&mut self.rng);

        let mut neighbors = Vec::with_capacity(steps.len());

        for (dx, dy) in steps {
            let nx = cell.x as isize + dx;
            let ny = cell.y as isize + dy;

            let in_bounds =
                nx > 0 && nx < self.width as isize - 1 && ny > 0 && ny < self.height as isize - 1;
            if !in_bounds {
                continue;
            }

            neighbors.push(Position::new(nx as usize, ny as usize));
        }

        neighbors
    }

    fn visit_cell(&mut self, cell: Position) {
        self.grid[cell.y][cell.x] = Tile::Open;
    }

    fn is_visited(&self, cell: Position) -> bool {
        self.grid[cell.y][cell.x] == Tile::Open
    }

    fn remove_wall_between(&mut self, cell_1: Position, cell_2: Position) {
        let x = (cell_1.x + cell_2.x) / 2;
        let y = (cell_1.y + cell_2.y) / 2;
        self.grid[y][x] = Tile::Open;
    }
}
