use std::collections::{HashMap, HashSet, VecDeque, hash_map::Entry};

use common::{
    input::{Intent, KeyBindings, toward},
    maze::{Maze, Position},
    session::Session,
};
use glam::{Vec2, vec2};

/// Where the autopilot is heading: every collectible still in play, or the
/// exit once it is open.
pub fn goals(session: &Session) -> HashSet<Position> {
    let exit = session.exit();
    if exit.unlocked {
        return HashSet::from([exit.position]);
    }

    session.collectibles().iter().map(|c| c.position).collect()
}

/// The first cell on a shortest path from `from` to the nearest goal, or
/// `from` itself when it is a goal. `None` when no goal can be reached.
pub fn first_step(maze: &Maze, from: Position, goals: &HashSet<Position>) -> Option<Position> {
    if goals.contains(&from) {
        return Some(from);
    }

    let mut came_from = HashMap::from([(from, from)]);
    let mut queue = VecDeque::from([from]);

    while let Some(cell) = queue.pop_front() {
        if goals.contains(&cell) {
            let mut step = cell;
            while came_from[&step] != from {
                step = came_from[&step];
            }
            return Some(step);
        }

        for next in maze.open_neighbors(cell) {
            if let Entry::Vacant(entry) = came_from.entry(next) {
                entry.insert(cell);
                queue.push_back(next);
            }
        }
    }

    None
}

// Absorbs float drift when comparing offsets against one tick of movement.
const EPSILON: f32 = 1e-3;

/// Where to head this tick. The player keeps going while the path runs
/// straight and lines up with the next corridor before it turns, so it never
/// cuts a corner into a wall. `tolerance` should be at least one tick of
/// movement.
pub fn steer(maze: &Maze, player: Vec2, goals: &HashSet<Position>, tolerance: f32) -> Intent {
    let Some(cell) = maze.cell_at(player) else {
        return Intent::default();
    };
    let Some(next) = first_step(maze, cell, goals) else {
        return Intent::default();
    };

    let slack = tolerance + EPSILON;
    let here = maze.center_of(cell);
    if next == cell {
        return toward(player, here, slack);
    }

    let there = maze.center_of(next);
    let horizontal = next.y == cell.y;

    let lined_up = if horizontal {
        vec2(player.x, here.y)
    } else {
        vec2(here.x, player.y)
    };
    if player.distance(lined_up) > slack {
        return toward(player, lined_up, slack);
    }

    let ahead = if horizontal {
        vec2(there.x, player.y)
    } else {
        vec2(player.x, there.y)
    };
    toward(player, ahead, slack)
}

/// The keys a player would hold down for `intent`.
pub fn press(intent: &Intent, bindings: &KeyBindings) -> Vec<char> {
    [
        (intent.up, bindings.up),
        (intent.down, bindings.down),
        (intent.left, bindings.left),
        (intent.right, bindings.right),
    ]
    .into_iter()
    .filter_map(|(held, key)| held.then_some(key))
    .collect()
}
