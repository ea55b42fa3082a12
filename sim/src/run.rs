use std::{
    env,
    io::stdout,
    path::PathBuf,
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::{Duration, Instant},
};

use common::{
    collectible::CollectibleKind,
    config::SessionConfig,
    error::{ConfigError, SessionError},
    input::Intent,
    persistence::PersistenceStore,
    player::Player,
    progress::Outcome,
    session::{Services, Session, SessionEvent},
    time::{Clock, MonotonicClock, TICK, TICK_RATE, TICK_SECS, TickTimers, format_elapsed},
};
use crossterm::{
    cursor::MoveToColumn,
    execute,
    style::Print,
    terminal::{Clear, ClearType},
};
use strum::IntoEnumIterator;

use crate::{autopilot, error::SimError, store::FileStore};

// Ten minutes of simulated play before a stuck session is abandoned.
const MAX_TICKS_PER_SESSION: u64 = TICK_RATE as u64 * 600;

#[derive(Clone, Debug, PartialEq)]
pub struct SimOptions {
    pub sessions: usize,
    pub store_path: Option<PathBuf>,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            sessions: 1,
            store_path: None,
        }
    }
}

impl SimOptions {
    /// `SIM_SESSIONS` play-throughs, inventory kept at `SIM_STORE` or in the
    /// user data directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let sessions = match get("SIM_SESSIONS") {
            None => 1,
            Some(value) => match value.parse() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "SIM_SESSIONS".to_string(),
                        value,
                    });
                }
            },
        };

        Ok(Self {
            sessions,
            store_path: get("SIM_STORE").map(PathBuf::from),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Report {
    pub generation: u64,
    pub outcome: Outcome,
    pub elapsed: Duration,
    pub ticks: u64,
}

/// A session played by the autopilot, one fixed tick at a time.
pub struct Driver {
    session: Session,
    timers: TickTimers,
    player: Player,
    keys: Vec<char>,
    ticks: u64,
}

impl Driver {
    pub fn new(
        config: SessionConfig,
        clock: Box<dyn Clock>,
        store: Box<dyn PersistenceStore>,
    ) -> Result<Self, SessionError> {
        let timers = TickTimers::new();
        let services = Services {
            clock,
            timers: Box::new(timers.clone()),
            store,
        };

        let session = Session::new(config, services)?;
        let player = Player::new(session.player_start());

        Ok(Self {
            session,
            timers,
            player,
            keys: Vec::new(),
            ticks: 0,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Keys the autopilot held down on the last tick.
    pub fn keys(&self) -> &[char] {
        &self.keys
    }

    /// Moves the player, runs the session and fires due timers. Returns what
    /// happened during the tick. A `dt` that is not a positive, finite number
    /// of seconds is skipped.
    pub fn step(&mut self, dt: f32) -> Vec<SessionEvent> {
        let Ok(elapsed) = Duration::try_from_secs_f32(dt) else {
            tracing::warn!(dt, "tick skipped: invalid time step");
            return Vec::new();
        };
        if elapsed.is_zero() {
            return Vec::new();
        }

        if !self.session.outcome().is_terminal() {
            let config = self.session.config();
            let speed = config.player_speed;
            let maze = self.session.maze();
            let goals = autopilot::goals(&self.session);
            let wanted = autopilot::steer(maze, self.player.position, &goals, speed * dt);

            self.keys = autopilot::press(&wanted, &config.key_bindings);
            let intent = Intent::from_keys(&config.key_bindings, &self.keys);

            self.player.advance(maze, &intent, speed, dt);
            self.session.tick(dt, self.player.position);
        } else {
            self.keys.clear();
        }

        for ticket in self.timers.advance(elapsed) {
            self.session.fire(ticket);
        }

        self.ticks += 1;
        self.session.drain_events()
    }

    pub fn replay(&mut self) -> Result<(), SessionError> {
        self.session.replay()?;
        self.player = Player::new(self.session.player_start());
        self.keys.clear();
        self.ticks = 0;
        Ok(())
    }

    pub fn report(&self) -> Report {
        Report {
            generation: self.session.generation(),
            outcome: self.session.outcome(),
            elapsed: self.session.elapsed(),
            ticks: self.ticks,
        }
    }
}

/// Plays `options.sessions` sessions in real time until they are all over
/// or `running` is cleared.
pub fn run(
    config: SessionConfig,
    options: &SimOptions,
    running: &AtomicBool,
) -> Result<Vec<Report>, SimError> {
    let store = match &options.store_path {
        Some(path) => FileStore::new(path),
        None => FileStore::in_data_dir().ok_or(SimError::NoDataDir)?,
    };
    tracing::info!(path = %store.path().display(), "inventory store");

    let mut driver = Driver::new(config, Box::new(MonotonicClock::new()), Box::new(store))?;
    let mut reports = Vec::with_capacity(options.sessions);

    for n in 0..options.sessions {
        if n > 0 {
            driver.replay()?;
        }

        if !play(&mut driver, running)? {
            break;
        }
        reports.push(driver.report());
    }

    clear_status()?;
    print_inventory(&driver);
    Ok(reports)
}

// Returns false when interrupted.
fn play(driver: &mut Driver, running: &AtomicBool) -> Result<bool, SimError> {
    while !driver.session().has_ended() {
        if !running.load(Ordering::SeqCst) {
            clear_status()?;
            println!("Interrupted.");
            return Ok(false);
        }

        if driver.ticks() >= MAX_TICKS_PER_SESSION {
            tracing::warn!(
                generation = driver.session().generation(),
                ticks = driver.ticks(),
                "session abandoned"
            );
            break;
        }

        let started = Instant::now();

        for event in driver.step(TICK_SECS) {
            announce(&event)?;
        }
        draw_status(driver)?;

        thread::sleep(TICK.saturating_sub(started.elapsed()));
    }

    Ok(true)
}

fn announce(event: &SessionEvent) -> Result<(), SimError> {
    let line = match event {
        SessionEvent::Collected {
            kind,
            collected,
            total,
            ..
        } => format!("Picked up a {} ({}/{}).", kind, collected, total),
        SessionEvent::DoorRevealed { exit } => format!("The door has appeared at {}!", exit),
        SessionEvent::MessageDismissed => return Ok(()),
        SessionEvent::Won { elapsed } => format!("You escaped in {}.", format_elapsed(*elapsed)),
        SessionEvent::Lost { elapsed } => {
            format!("Caught after {}.", format_elapsed(*elapsed))
        }
        SessionEvent::ReturnToMenu => "Back to the menu.".to_string(),
    };

    clear_status()?;
    println!("{}", line);
    Ok(())
}

fn draw_status(driver: &Driver) -> Result<(), SimError> {
    let session = driver.session();
    let keys: String = driver.keys().iter().collect();
    let output = format!(
        "Session {} | {} | collected {} | {} | keys {:<2}",
        session.generation(),
        session.outcome(),
        session.progress(),
        format_elapsed(session.elapsed()),
        keys,
    );

    execute!(
        stdout(),
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(output)
    )?;
    Ok(())
}

fn clear_status() -> Result<(), SimError> {
    execute!(stdout(), MoveToColumn(0), Clear(ClearType::CurrentLine))?;
    Ok(())
}

fn print_inventory(driver: &Driver) {
    let inventory = driver.session().inventory();
    println!("Inventory ({} items):", inventory.items.len());
    for kind in CollectibleKind::iter() {
        println!("  {:<8} {}", kind, inventory.count_of(kind));
    }
}
