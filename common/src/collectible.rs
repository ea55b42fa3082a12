use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

use crate::maze::Position;

/// Type tag carried by each collectible and recorded in the inventory.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumCount,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
pub enum CollectibleKind {
    Key,
    Gem,
    Scroll,
    Potion,
    Lantern,
}

impl CollectibleKind {
    /// Kinds dealt round-robin, so the classic five objects are all different.
    pub fn dealt(count: usize) -> impl Iterator<Item = CollectibleKind> {
        CollectibleKind::iter().cycle().take(count)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: usize,
    pub kind: CollectibleKind,
    pub position: Position,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_dealt_round_robin() {
        let kinds: Vec<_> = CollectibleKind::dealt(CollectibleKind::COUNT + 2).collect();

        assert_eq!(kinds.len(), 7);
        assert_eq!(kinds[0], CollectibleKind::Key);
        assert_eq!(kinds[4], CollectibleKind::Lantern);
        assert_eq!(kinds[5], CollectibleKind::Key);
        assert_eq!(kinds[6], CollectibleKind::Gem);
    }

    #[test]
    fn kinds_display_in_lowercase() {
        assert_eq!(CollectibleKind::Lantern.to_string(), "lantern");
    }
}
