use std::fmt;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::maze::Position;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    #[strum(to_string = "in progress")]
    InProgress,
    #[strum(to_string = "won")]
    Won,
    #[strum(to_string = "lost")]
    Lost,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// The exit stays hidden and locked until every collectible is in hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exit {
    pub position: Position,
    pub unlocked: bool,
}

/// What a single collection did to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Collected {
    pub count: usize,
    pub total: usize,
    pub door_revealed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Progress {
    collected: usize,
    total: usize,
    door_announced: bool,
    outcome: Outcome,
    exit: Exit,
}

impl Progress {
    /// With nothing to collect the exit starts unlocked and there is no door
    /// to announce.
    pub fn new(total: usize, exit: Position) -> Self {
        let nothing_to_collect = total == 0;

        Self {
            collected: 0,
            total,
            door_announced: nothing_to_collect,
            outcome: Outcome::InProgress,
            exit: Exit {
                position: exit,
                unlocked: nothing_to_collect,
            },
        }
    }

    pub fn collected(&self) -> usize {
        self.collected
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn exit(&self) -> &Exit {
        &self.exit
    }

    pub fn door_announced(&self) -> bool {
        self.door_announced
    }

    /// Counts one collection. The exit unlocks, and the door is announced,
    /// the first time the count reaches the total. Returns `None` once the
    /// outcome is settled.
    pub fn collect(&mut self) -> Option<Collected> {
        if self.outcome.is_terminal() {
            tracing::debug!(outcome = %self.outcome, "collection after session end ignored");
            return None;
        }

        self.collected = (self.collected + 1).min(self.total);

        let mut door_revealed = false;
        if self.collected == self.total && !self.door_announced {
            self.exit.unlocked = true;
            self.door_announced = true;
            door_revealed = true;
        }

        Some(Collected {
            count: self.collected,
            total: self.total,
            door_revealed,
        })
    }

    /// Wins if the exit is unlocked. Returns whether this call settled the
    /// outcome.
    pub fn reach_exit(&mut self) -> bool {
        if self.outcome.is_terminal() || !self.exit.unlocked {
            return false;
        }

        self.outcome = Outcome::Won;
        true
    }

    /// Loses, whatever has been collected. Returns whether this call settled
    /// the outcome.
    pub fn enemy_contact(&mut self) -> bool {
        if self.outcome.is_terminal() {
            return false;
        }

        self.outcome = Outcome::Lost;
        true
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collected, self.total)
    }
}
