use std::time::Duration;

// Maze:
pub const DEFAULT_COLS: usize = 30;
pub const DEFAULT_ROWS: usize = 30;
pub const DEFAULT_CELL_SIZE: f32 = 40.0; // World units (pixels) per grid cell.

// Entities:
pub const DEFAULT_COLLECTIBLES: usize = 5;
pub const DEFAULT_ENEMIES: usize = 5;
pub const DEFAULT_ENEMY_SPEED: f32 = 100.0; // Units per second.
pub const DEFAULT_PLAYER_SPEED: f32 = 160.0; // Units per second.

// Overlap radii, as fractions of a cell.
pub const PICKUP_REACH: f32 = 0.5;
pub const ENEMY_REACH: f32 = 0.45;

// Deferred effects:
pub const MESSAGE_DURATION: Duration = Duration::from_secs(2);
pub const END_TRANSITION_DELAY: Duration = Duration::from_secs(2); // Fade before returning to the menu.
