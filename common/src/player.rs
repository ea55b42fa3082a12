use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{input::Intent, maze::Maze};

pub const RADIUS: f32 = 8.0;

/// A kinematic stand-in for a host-owned player body, for hosts without a
/// physics engine of their own.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Vec2,
    pub velocity: Vec2,
}

impl Player {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
        }
    }

    /// Moves by `intent` for one tick, unless the point the player leads with
    /// would end up inside a wall, in which case the player stops.
    pub fn advance(&mut self, maze: &Maze, intent: &Intent, speed: f32, dt: f32) {
        self.velocity = intent.velocity(speed);

        if self.velocity.length_squared() < 0.001 {
            self.velocity = Vec2::ZERO;
            return;
        }

        let new_position = self.position + self.velocity * dt;
        let contact_point = new_position + self.velocity.normalize() * RADIUS;

        if maze.is_way_clear(contact_point) {
            self.position = new_position;
        } else {
            self.velocity = Vec2::ZERO;
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::vec2;

    use super::*;
    use crate::maze::{Position, Tile};

    const CELL_SIZE: f32 = 40.0;
    const SPEED: f32 = 160.0;
    const DT: f32 = 1.0 / 60.0;

    fn corridor() -> Maze {
        let w = Tile::Wall;
        let o = Tile::Open;
        let grid = vec![
            vec![w, w, w, w, w],
            vec![w, o, o, o, w],
            vec![w, w, w, w, w],
        ];
        Maze::from_grid(grid, CELL_SIZE)
    }

    #[test]
    fn moves_along_open_corridor() {
        let maze = corridor();
        let start = maze.center_of(Position::new(1, 1));
        let mut player = Player::new(start);
        let intent = Intent {
            right: true,
            ..Intent::default()
        };

        player.advance(&maze, &intent, SPEED, DT);

        assert!(player.position.x > start.x);
        assert_eq!(player.position.y, start.y);
        assert_eq!(player.velocity, vec2(SPEED, 0.0));
    }

    #[test]
    fn stops_at_walls() {
        let maze = corridor();
        let start = maze.center_of(Position::new(1, 1));
        let mut player = Player::new(start);
        let intent = Intent {
            up: true,
            ..Intent::default()
        };

        for _ in 0..60 {
            player.advance(&maze, &intent, SPEED, DT);
        }

        assert!(maze.is_way_clear(player.position - vec2(0.0, RADIUS)));
        assert_eq!(player.velocity, Vec2::ZERO);
    }

    #[test]
    fn idle_intent_keeps_player_still() {
        let maze = corridor();
        let start = maze.center_of(Position::new(2, 1));
        let mut player = Player::new(start);

        player.advance(&maze, &Intent::default(), SPEED, DT);

        assert_eq!(player.position, start);
        assert_eq!(player.velocity, Vec2::ZERO);
    }
}
