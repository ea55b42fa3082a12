use std::{
    fs, io,
    path::{Path, PathBuf},
};

use bincode::{
    config::standard,
    serde::{decode_from_slice, encode_to_vec},
};
use common::{
    error::PersistenceError,
    persistence::{Inventory, PersistenceStore},
};

const APP_DIR: &str = "maze-sim";
const FILE_NAME: &str = "inventory.bin";

/// Keeps the inventory in a bincode file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The platform's per-user data directory, if there is one.
    pub fn in_data_dir() -> Option<Self> {
        dirs::data_dir().map(|dir| Self::new(dir.join(APP_DIR).join(FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceStore for FileStore {
    fn load(&mut self) -> Result<Option<Inventory>, PersistenceError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let (inventory, _) = decode_from_slice::<Inventory, _>(&bytes, standard())
            .map_err(|e| PersistenceError::Decode(e.to_string()))?;

        Ok(Some(inventory))
    }

    fn save(&mut self, inventory: &Inventory) -> Result<(), PersistenceError> {
        let bytes =
            encode_to_vec(inventory, standard()).map_err(|e| PersistenceError::Encode(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, bytes)?;

        Ok(())
    }
}
