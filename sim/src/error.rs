use std::io;

use common::error::{ConfigError, SessionError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("no data directory for the inventory file; set SIM_STORE")]
    NoDataDir,
    #[error("failed to draw the status line: {0}")]
    Terminal(#[from] io::Error),
}
