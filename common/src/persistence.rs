use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};

use crate::{collectible::CollectibleKind, error::PersistenceError};

/// Every kind the player has picked up, oldest first. Survives replays and,
/// through a store, restarts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub items: Vec<CollectibleKind>,
}

impl Inventory {
    pub fn push(&mut self, kind: CollectibleKind) {
        self.items.push(kind);
    }

    pub fn count_of(&self, kind: CollectibleKind) -> usize {
        self.items.iter().filter(|&&item| item == kind).count()
    }
}

pub trait PersistenceStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&mut self) -> Result<Option<Inventory>, PersistenceError>;
    fn save(&mut self, inventory: &Inventory) -> Result<(), PersistenceError>;
}

/// Keeps the inventory in memory. Clones share it.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    saved: Rc<RefCell<Option<Inventory>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inventory(inventory: Inventory) -> Self {
        Self {
            saved: Rc::new(RefCell::new(Some(inventory))),
        }
    }

    pub fn saved(&self) -> Option<Inventory> {
        self.saved.borrow().clone()
    }
}

impl PersistenceStore for MemoryStore {
    fn load(&mut self) -> Result<Option<Inventory>, PersistenceError> {
        Ok(self.saved.borrow().clone())
    }

    fn save(&mut self, inventory: &Inventory) -> Result<(), PersistenceError> {
        *self.saved.borrow_mut() = Some(inventory.clone());
        Ok(())
    }
}
