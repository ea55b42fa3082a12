use glam::{Vec2, vec2};
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::maze::Maze;

/// Half-width of an enemy, used to find the point that touches walls first.
pub const RADIUS: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Direction {
    #[strum(to_string = "patrolling left")]
    Left,
    #[strum(to_string = "patrolling right")]
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Horizontal turning points in world units: `2 * cell_size` on the left and
/// `(cols - 2) * cell_size` on the right.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatrolBounds {
    pub min_x: f32,
    pub max_x: f32,
}

impl PatrolBounds {
    pub fn new(cols: usize, cell_size: f32) -> Self {
        Self {
            min_x: 2.0 * cell_size,
            max_x: cols.saturating_sub(2) as f32 * cell_size,
        }
    }

    pub fn for_maze(maze: &Maze) -> Self {
        Self::new(maze.cols(), maze.cell_size)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub position: Vec2,
    pub velocity: Vec2,
    pub direction: Direction,
    pub speed: f32,
}

impl Enemy {
    /// New enemies always set off to the right.
    pub fn new(position: Vec2, speed: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            direction: Direction::Right,
            speed,
        }
    }

    /// One tick of patrol: move at constant speed in the current direction,
    /// then turn around if a patrol bound has been passed. Motion is purely
    /// horizontal.
    pub fn advance(&mut self, bounds: &PatrolBounds, dt: f32) {
        self.velocity = vec2(self.direction.sign() * self.speed, 0.0);
        self.position += self.velocity * dt;

        match self.direction {
            Direction::Right if self.position.x > bounds.max_x => {
                self.direction = Direction::Left;
            }
            Direction::Left if self.position.x < bounds.min_x => {
                self.direction = Direction::Right;
            }
            _ => {}
        }
    }

    /// Reverses on contact with a wall, whichever way the enemy was going.
    pub fn on_wall_contact(&mut self) {
        self.direction = self.direction.reversed();
    }

    /// Advances through `maze`, standing in for a physics host: a step that
    /// would push the leading edge into a wall is undone and counts as wall
    /// contact. Returns whether the enemy hit a wall.
    pub fn patrol(&mut self, maze: &Maze, bounds: &PatrolBounds, dt: f32) -> bool {
        let previous = self.position;
        let moving = self.direction;

        self.advance(bounds, dt);

        let leading_edge = self.position + vec2(moving.sign() * RADIUS, 0.0);
        if maze.is_way_clear(leading_edge) {
            return false;
        }

        self.position = previous;
        // A bound may already have turned it around this tick.
        if self.direction == moving {
            self.on_wall_contact();
        }
        true
    }
}
