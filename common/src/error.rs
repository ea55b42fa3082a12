use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MazeError {
    #[error("maze must be between 3x3 and 1001x1001 cells, got {cols}x{rows}")]
    InvalidGridDimensions { cols: usize, rows: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlacementError {
    #[error("requested {requested} cells but only {available} are open and free")]
    InsufficientOpenCells { requested: usize, available: usize },
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("inventory storage failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode inventory: {0}")]
    Encode(String),
    #[error("failed to decode inventory: {0}")]
    Decode(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
    #[error("maze must be between 3x3 and 1001x1001 cells, got {cols}x{rows}")]
    InvalidDimensions { cols: usize, rows: usize },
    #[error("{name} must be positive, got {value}")]
    InvalidSpeed { name: &'static str, value: f32 },
}

/// Anything that stops a session from being set up. The controller never
/// starts with a partially built maze.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Maze(#[from] MazeError),
    #[error(transparent)]
    Placement(#[from] PlacementError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}
