//! Drop session: wires the resolver, the trajectory and the collaborators
//! into a state machine the host polls once per animation frame.
//!
//! ```text
//! Idle --drop_command--> Falling --landed--> (Idle | Generating --card--> Idle)
//! ```
//!
//! `GameState::is_dropping` is raised by `drop_command` and lowered only when
//! the outcome (or a refund) is applied, so no second drop can start while
//! one is falling or waiting for its card.

use crate::collectible::CollectibleCatalog;
use crate::config::GameConfig;
use crate::counter::CoinCounter;
use crate::error::{CatalogError, DropError, DropResult};
use crate::events::NotificationSink;
use crate::resolver::{self, DropOutcome, DropTicket, PendingHero, Prize, Resolution};
use crate::rng::RandomSource;
use crate::slots::SLOT_COUNT;
use crate::state::GameState;
use crate::trajectory::{Trajectory, Waypoint};

/// Catalog attempts per hero landing (first try plus one retry).
const MAX_CATALOG_ATTEMPTS: u8 = 2;

enum Phase {
    Idle,
    Falling {
        ticket: DropTicket,
        trajectory: Trajectory,
        started_ms: f64,
        position: Waypoint,
    },
    Generating {
        pending: PendingHero,
        attempts: u8,
    },
}

/// Something the host must react to (persist, show a modal).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Resolved(DropOutcome),
    /// The drop could not be completed and its coin was returned.
    Refunded(String),
}

pub struct DropSession<C: CollectibleCatalog, N: NotificationSink> {
    state: GameState,
    config: GameConfig,
    rng: Box<dyn RandomSource>,
    catalog: C,
    sink: N,
    phase: Phase,
    paused: bool,
    counter: CoinCounter,
    last_outcome: Option<DropOutcome>,
}

impl<C: CollectibleCatalog, N: NotificationSink> DropSession<C, N> {
    pub fn new(
        state: GameState,
        config: GameConfig,
        rng: Box<dyn RandomSource>,
        catalog: C,
        sink: N,
    ) -> Self {
        let state = state.normalized();
        let counter = CoinCounter::new(state.coins, config.counter_step_ms);
        Self {
            state,
            config,
            rng,
            catalog,
            sink,
            phase: Phase::Idle,
            paused: false,
            counter,
            last_outcome: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn sink(&self) -> &N {
        &self.sink
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        log::info!("game {}", if self.paused { "paused" } else { "resumed" });
        self.paused
    }

    pub fn can_drop(&self) -> bool {
        !self.paused && self.state.can_drop()
    }

    pub fn is_generating(&self) -> bool {
        matches!(self.phase, Phase::Generating { .. })
    }

    /// Lucky flag of the drop currently in flight.
    pub fn lucky_active(&self) -> bool {
        match &self.phase {
            Phase::Falling { ticket, .. } => ticket.lucky,
            Phase::Generating { pending, .. } => pending.ticket().lucky,
            Phase::Idle => false,
        }
    }

    /// Coin position while it is falling.
    pub fn coin_position(&self) -> Option<Waypoint> {
        match &self.phase {
            Phase::Falling { position, .. } => Some(*position),
            _ => None,
        }
    }

    pub fn target_slot(&self) -> Option<usize> {
        match &self.phase {
            Phase::Falling { ticket, .. } => Some(ticket.target_slot),
            _ => None,
        }
    }

    pub fn last_outcome(&self) -> Option<&DropOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn displayed_coins(&self) -> u32 {
        self.counter.shown()
    }

    pub fn drop_button_label(&self) -> &'static str {
        if self.state.is_dropping {
            "Processing..."
        } else if self.paused {
            "Paused"
        } else if self.state.coins == 0 {
            "Vault Empty"
        } else {
            "Drop Coin"
        }
    }

    /// Starts a drop. Precondition failures leave everything untouched.
    pub fn drop_command(&mut self, now_ms: f64) -> DropResult<()> {
        if self.paused {
            return Err(DropError::Paused);
        }
        let ticket = resolver::begin_drop(&mut self.state, &self.config, self.rng.as_mut())?;
        let trajectory = match Trajectory::start(
            ticket.target_slot,
            SLOT_COUNT,
            self.config.drop_duration_ms,
            self.rng.as_mut(),
        ) {
            Ok(t) => t,
            Err(e) => {
                log::error!("cannot animate drop: {e}");
                self.state.refund_drop();
                return Err(e);
            }
        };
        self.last_outcome = None;
        self.phase = Phase::Falling {
            ticket,
            position: trajectory.sample(0.0),
            trajectory,
            started_ms: now_ms,
        };
        self.sink.on_drop_start();
        if ticket.lucky {
            log::info!("lucky drop toward slot {}", ticket.target_slot);
        }
        Ok(())
    }

    /// Advances the session to `now_ms`. Returns an event whenever the game
    /// state changed in a way the host should persist.
    pub fn frame(&mut self, now_ms: f64) -> Option<SessionEvent> {
        let event = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => None,
            Phase::Falling {
                ticket,
                mut trajectory,
                started_ms,
                ..
            } => {
                let frame = trajectory.tick(now_ms - started_ms);
                for _ in 0..frame.boundaries_crossed {
                    self.sink.on_tick();
                }
                if frame.landed {
                    self.land(&ticket, now_ms)
                } else {
                    self.phase = Phase::Falling {
                        ticket,
                        trajectory,
                        started_ms,
                        position: frame.position,
                    };
                    None
                }
            }
            Phase::Generating { pending, attempts } => self.poll_catalog(pending, attempts, now_ms),
        };
        self.counter.update(self.state.coins, now_ms, self.paused);
        event
    }

    fn land(&mut self, ticket: &DropTicket, now_ms: f64) -> Option<SessionEvent> {
        match resolver::resolve_landing(ticket, self.state.streak, &self.config) {
            Ok(Resolution::Ready(outcome)) => Some(self.finish(outcome)),
            Ok(Resolution::AwaitingCollectible(pending)) => {
                self.catalog.request(now_ms);
                self.phase = Phase::Generating {
                    pending,
                    attempts: 1,
                };
                None
            }
            Err(e) => {
                log::error!("landing could not be resolved: {e}");
                self.state.refund_drop();
                Some(SessionEvent::Refunded(e.to_string()))
            }
        }
    }

    fn poll_catalog(
        &mut self,
        pending: PendingHero,
        attempts: u8,
        now_ms: f64,
    ) -> Option<SessionEvent> {
        match self.catalog.poll(now_ms) {
            None => {
                self.phase = Phase::Generating { pending, attempts };
                None
            }
            Some(Ok(card)) => Some(self.finish(pending.complete(card))),
            Some(Err(e)) if attempts < MAX_CATALOG_ATTEMPTS => {
                log::warn!("catalog fetch failed, retrying: {e}");
                self.catalog.request(now_ms);
                self.phase = Phase::Generating {
                    pending,
                    attempts: attempts + 1,
                };
                None
            }
            Some(Err(e)) => Some(self.give_up(e)),
        }
    }

    fn give_up(&mut self, e: CatalogError) -> SessionEvent {
        log::error!("catalog fetch failed twice, refunding drop: {e}");
        self.state.refund_drop();
        SessionEvent::Refunded(e.to_string())
    }

    fn finish(&mut self, outcome: DropOutcome) -> SessionEvent {
        self.state.apply_outcome(&outcome);
        match &outcome.prize {
            Prize::Empty => self.sink.on_miss(),
            Prize::Coins { .. } => self.sink.on_win_coins(outcome.coins_awarded),
            Prize::Hero(card) => self.sink.on_win_hero(card),
        }
        log::info!(
            "drop resolved: slot={} prize={:?} coins=+{} streak={}",
            outcome.effective_slot_index,
            outcome.prize.kind(),
            outcome.coins_awarded,
            outcome.streak
        );
        self.last_outcome = Some(outcome.clone());
        SessionEvent::Resolved(outcome)
    }

    /// Restores the starting state. Refused while a drop is in flight.
    pub fn reset(&mut self) -> DropResult<()> {
        if self.state.is_dropping {
            return Err(DropError::DropAlreadyInProgress);
        }
        self.state.reset(self.config.initial_coins);
        self.counter.snap(self.state.coins);
        self.paused = false;
        self.last_outcome = None;
        log::info!("game reset");
        Ok(())
    }
}
