use std::{mem, time::Duration};

use glam::Vec2;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    collectible::{Collectible, CollectibleKind},
    config::SessionConfig,
    constants::{ENEMY_REACH, PICKUP_REACH},
    enemy::{Enemy, PatrolBounds},
    error::SessionError,
    maze::{Maze, Position},
    persistence::{Inventory, PersistenceStore},
    placement::{pick_enemy_spawns, pick_positions, start_area},
    progress::{Exit, Outcome, Progress},
    time::{Clock, DeferredAction, TimerService, TimerTicket, format_elapsed},
};

/// Capabilities the host lends to a session.
pub struct Services {
    pub clock: Box<dyn Clock>,
    pub timers: Box<dyn TimerService>,
    pub store: Box<dyn PersistenceStore>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Collected {
        id: usize,
        kind: CollectibleKind,
        collected: usize,
        total: usize,
    },
    DoorRevealed {
        exit: Position,
    },
    MessageDismissed,
    Won {
        elapsed: Duration,
    },
    Lost {
        elapsed: Duration,
    },
    ReturnToMenu,
}

struct Layout {
    maze: Maze,
    collectibles: Vec<Collectible>,
    exit: Position,
    enemies: Vec<Enemy>,
}

impl Layout {
    // Objects first, then the exit, then enemies; nothing shares a cell and
    // nothing lands next to the start.
    fn build(config: &SessionConfig, rng: &mut StdRng) -> Result<Self, SessionError> {
        let maze = Maze::carve(config.cols, config.rows, config.cell_size, rng)?;

        let mut taken = start_area(&maze);

        let object_cells = pick_positions(&maze, config.collectibles, &taken, rng)?;
        taken.extend(object_cells.iter().copied());

        let exit = pick_positions(&maze, 1, &taken, rng)?[0];
        taken.insert(exit);

        let spawns = pick_enemy_spawns(&maze, config.enemies, &taken, rng);

        let collectibles = object_cells
            .into_iter()
            .zip(CollectibleKind::dealt(config.collectibles))
            .enumerate()
            .map(|(id, (position, kind))| Collectible { id, kind, position })
            .collect();

        let enemies = spawns
            .into_iter()
            .map(|cell| Enemy::new(maze.center_of(cell), config.enemy_speed))
            .collect();

        Ok(Self {
            maze,
            collectibles,
            exit,
            enemies,
        })
    }
}

/// One play-through, from a freshly carved maze to a win or a loss.
///
/// The host drives it: `tick` once per frame with the player's position,
/// explicit `on_*` calls for contacts its own physics detects, and `fire`
/// for every timer ticket that comes due. Whatever happened is queued as
/// [`SessionEvent`]s for the host to drain.
pub struct Session {
    config: SessionConfig,
    services: Services,
    rng: StdRng,
    generation: u64,
    maze: Maze,
    bounds: PatrolBounds,
    collectibles: Vec<Collectible>,
    enemies: Vec<Enemy>,
    progress: Progress,
    inventory: Inventory,
    started_at: Duration,
    finished_after: Option<Duration>,
    message_visible: bool,
    ended: bool,
    events: Vec<SessionEvent>,
}

impl Session {
    pub fn new(config: SessionConfig, mut services: Services) -> Result<Self, SessionError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let layout = Layout::build(&config, &mut rng)?;
        let inventory = services.store.load()?.unwrap_or_default();
        let started_at = services.clock.now();

        let session = Self {
            bounds: PatrolBounds::for_maze(&layout.maze),
            progress: Progress::new(layout.collectibles.len(), layout.exit),
            maze: layout.maze,
            collectibles: layout.collectibles,
            enemies: layout.enemies,
            config,
            services,
            rng,
            generation: 1,
            inventory,
            started_at,
            finished_after: None,
            message_visible: false,
            ended: false,
            events: Vec::new(),
        };
        session.log_ready();

        Ok(session)
    }

    /// Starts over in a new maze. Timers scheduled by earlier play-throughs
    /// are ignored from here on. On error the current play-through is left
    /// as it was.
    pub fn replay(&mut self) -> Result<(), SessionError> {
        let layout = Layout::build(&self.config, &mut self.rng)?;

        self.generation += 1;
        self.bounds = PatrolBounds::for_maze(&layout.maze);
        self.progress = Progress::new(layout.collectibles.len(), layout.exit);
        self.maze = layout.maze;
        self.collectibles = layout.collectibles;
        self.enemies = layout.enemies;
        self.started_at = self.services.clock.now();
        self.finished_after = None;
        self.message_visible = false;
        self.ended = false;
        self.events.clear();

        self.log_ready();
        Ok(())
    }

    /// Advances enemies by `dt` seconds and resolves every overlap with a
    /// player standing at `player`. Does nothing once the outcome is settled.
    pub fn tick(&mut self, dt: f32, player: Vec2) {
        if self.progress.outcome().is_terminal() {
            return;
        }

        for enemy in &mut self.enemies {
            enemy.patrol(&self.maze, &self.bounds, dt);
        }

        let pickup_reach = self.config.cell_size * PICKUP_REACH;
        let touched: Vec<usize> = self
            .collectibles
            .iter()
            .filter(|c| self.maze.center_of(c.position).distance(player) < pickup_reach)
            .map(|c| c.id)
            .collect();
        for id in touched {
            self.on_collect(id);
        }

        let enemy_reach = self.config.cell_size * ENEMY_REACH;
        if self
            .enemies
            .iter()
            .any(|enemy| enemy.position.distance(player) < enemy_reach)
        {
            self.on_enemy_contact();
            return;
        }

        let exit = self.maze.center_of(self.progress.exit().position);
        if self.progress.exit().unlocked && exit.distance(player) < pickup_reach {
            self.on_reach_exit();
        }
    }

    /// The player picked up collectible `id`. Unknown or already collected
    /// ids are ignored.
    pub fn on_collect(&mut self, id: usize) {
        if self.progress.outcome().is_terminal() {
            tracing::debug!(id, "collection after session end ignored");
            return;
        }

        let Some(index) = self.collectibles.iter().position(|c| c.id == id) else {
            tracing::debug!(id, "collectible is not in play");
            return;
        };

        let Some(collected) = self.progress.collect() else {
            return;
        };
        let collectible = self.collectibles.remove(index);

        self.inventory.push(collectible.kind);
        if let Err(e) = self.services.store.save(&self.inventory) {
            tracing::warn!(error = %e, "failed to save inventory");
        }

        tracing::debug!(
            kind = %collectible.kind,
            progress = %self.progress,
            "collected"
        );
        self.events.push(SessionEvent::Collected {
            id,
            kind: collectible.kind,
            collected: collected.count,
            total: collected.total,
        });

        if collected.door_revealed {
            let exit = self.progress.exit().position;
            tracing::info!(%exit, "the exit is open");

            self.events.push(SessionEvent::DoorRevealed { exit });
            self.message_visible = true;
            self.schedule(self.config.message_duration, DeferredAction::DismissMessage);
        }
    }

    /// The player stands on the exit. Only wins once the exit is unlocked.
    pub fn on_reach_exit(&mut self) {
        if self.progress.reach_exit() {
            self.finish();
        }
    }

    /// The player touched an enemy. Loses, whatever has been collected.
    pub fn on_enemy_contact(&mut self) {
        if self.progress.enemy_contact() {
            self.finish();
        }
    }

    /// For hosts whose physics reports enemy and wall contact itself.
    pub fn on_enemy_wall_contact(&mut self, index: usize) {
        if let Some(enemy) = self.enemies.get_mut(index) {
            enemy.on_wall_contact();
        }
    }

    /// Runs a deferred action. Tickets from an earlier play-through are
    /// dropped.
    pub fn fire(&mut self, ticket: TimerTicket) {
        if ticket.generation != self.generation {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                action = ?ticket.action,
                "stale timer ignored"
            );
            return;
        }

        match ticket.action {
            DeferredAction::DismissMessage => {
                if mem::take(&mut self.message_visible) {
                    self.events.push(SessionEvent::MessageDismissed);
                }
            }
            DeferredAction::ReturnToMenu => {
                if !self.ended {
                    self.ended = true;
                    self.events.push(SessionEvent::ReturnToMenu);
                }
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        mem::take(&mut self.events)
    }

    /// Time since the play-through started, frozen once it is won or lost.
    pub fn elapsed(&self) -> Duration {
        self.finished_after.unwrap_or_else(|| {
            self.services
                .clock
                .now()
                .saturating_sub(self.started_at)
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn player_start(&self) -> Vec2 {
        self.maze.center_of(self.maze.start())
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.collectibles
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn exit(&self) -> &Exit {
        self.progress.exit()
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn outcome(&self) -> Outcome {
        self.progress.outcome()
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn is_message_visible(&self) -> bool {
        self.message_visible
    }

    /// Whether the return to the menu has happened.
    pub fn has_ended(&self) -> bool {
        self.ended
    }

    fn finish(&mut self) {
        let elapsed = self
            .services
            .clock
            .now()
            .saturating_sub(self.started_at);
        self.finished_after = Some(elapsed);

        let event = match self.progress.outcome() {
            Outcome::Won => SessionEvent::Won { elapsed },
            Outcome::Lost => SessionEvent::Lost { elapsed },
            Outcome::InProgress => return,
        };

        tracing::info!(
            outcome = %self.progress.outcome(),
            elapsed = %format_elapsed(elapsed),
            progress = %self.progress,
            "session over"
        );
        self.events.push(event);
        self.schedule(self.config.end_transition_delay, DeferredAction::ReturnToMenu);
    }

    fn schedule(&mut self, delay: Duration, action: DeferredAction) {
        let ticket = TimerTicket {
            generation: self.generation,
            action,
        };
        self.services.timers.schedule_after(delay, ticket);
    }

    fn log_ready(&self) {
        tracing::info!(
            generation = self.generation,
            cols = self.maze.cols(),
            rows = self.maze.rows(),
            collectibles = self.collectibles.len(),
            enemies = self.enemies.len(),
            "session ready"
        );
    }
}
