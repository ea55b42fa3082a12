use std::collections::HashSet;

use rand::{Rng, seq::IteratorRandom};

use crate::{
    error::PlacementError,
    maze::{Maze, Position},
};

/// Rejection-sampling draws allowed per requested cell before the picker
/// stops guessing and samples the remaining candidates directly.
pub const ATTEMPTS_PER_CELL: usize = 64;

/// Minimum number of open orthogonal neighbors for an enemy spawn, which
/// keeps enemies out of dead ends.
pub const MIN_SPAWN_NEIGHBORS: usize = 3;

/// Picks `count` distinct open cells, none of them in `exclude`.
///
/// Cells are drawn uniformly over the whole grid and rejected until enough
/// are accepted. The number of draws is bounded: asking for more cells than
/// are available is an error, and a run of unlucky draws falls back to
/// sampling from the cells that remain.
pub fn pick_positions<R: Rng>(
    maze: &Maze,
    count: usize,
    exclude: &HashSet<Position>,
    rng: &mut R,
) -> Result<Vec<Position>, PlacementError> {
    let available = maze
        .spaces
        .iter()
        .filter(|p| !exclude.contains(p))
        .count();

    if count > available {
        return Err(PlacementError::InsufficientOpenCells {
            requested: count,
            available,
        });
    }

    let mut positions = Vec::with_capacity(count);
    let mut chosen = HashSet::with_capacity(count);
    let max_attempts = count.saturating_mul(ATTEMPTS_PER_CELL);
    let mut attempts = 0;

    while positions.len() < count && attempts < max_attempts {
        attempts += 1;

        let candidate = Position::new(
            rng.random_range(0..maze.cols()),
            rng.random_range(0..maze.rows()),
        );

        if maze.is_open(candidate) && !exclude.contains(&candidate) && chosen.insert(candidate) {
            positions.push(candidate);
        }
    }

    if positions.len() < count {
        tracing::debug!(
            attempts,
            missing = count - positions.len(),
            "rejection sampling exhausted; sampling remaining cells"
        );

        let remaining = count - positions.len();
        let rest = maze
            .spaces
            .iter()
            .filter(|p| !exclude.contains(p) && !chosen.contains(p))
            .copied()
            .choose_multiple(rng, remaining);
        positions.extend(rest);
    }

    Ok(positions)
}

/// Picks up to `count` spawn cells with at least three open neighbors.
/// Returns fewer when not enough cells qualify.
pub fn pick_enemy_spawns<R: Rng>(
    maze: &Maze,
    count: usize,
    exclude: &HashSet<Position>,
    rng: &mut R,
) -> Vec<Position> {
    let mut candidates: Vec<Position> = maze
        .spaces
        .iter()
        .copied()
        .filter(|p| !exclude.contains(p))
        .filter(|&p| maze.open_neighbors(p).count() >= MIN_SPAWN_NEIGHBORS)
        .collect();

    let mut spawns = Vec::with_capacity(count.min(candidates.len()));

    while spawns.len() < count {
        let Some(cell) = pick_out_cell(&mut candidates, rng) else {
            tracing::debug!(
                requested = count,
                placed = spawns.len(),
                "not enough junctions for every enemy"
            );
            break;
        };
        spawns.push(cell);
    }

    spawns
}

/// The start cell and its orthogonal neighbors, so nothing is placed right
/// next to the player.
pub fn start_area(maze: &Maze) -> HashSet<Position> {
    let start = maze.start();
    std::iter::once(start).chain(start.orthogonal()).collect()
}

fn pick_out_cell<R: Rng>(cells: &mut Vec<Position>, rng: &mut R) -> Option<Position> {
    if cells.is_empty() {
        return None;
    }

    let i = rng.random_range(0..cells.len());
    Some(cells.swap_remove(i))
}
