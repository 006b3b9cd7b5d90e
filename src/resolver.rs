//! Drop outcome resolution.
//!
//! `begin_drop` charges the coin and draws every random value the drop will
//! ever need into a [`DropTicket`]. `resolve_landing` is then a pure function
//! of the ticket and the streak, so replaying a landing gives the same
//! result.

use crate::collectible::{Collectible, LUCKY_NAME_PREFIX, Rarity};
use crate::config::GameConfig;
use crate::error::{DropError, DropResult};
use crate::rng::RandomSource;
use crate::slots::{LUCKY_RESCUE_SLOTS, PrizeKind, SLOT_COUNT, SlotPrize, slot};
use crate::state::GameState;

/// All random draws for one drop, fixed at drop start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropTicket {
    pub target_slot: usize,
    pub lucky: bool,
    /// Slot an empty lucky landing is moved to.
    pub rescue_slot: usize,
    /// Rarity a lucky hero card is upgraded to.
    pub lucky_rarity: Rarity,
}

impl DropTicket {
    /// Ticket for an already decided target and lucky flag; only the
    /// auxiliary draws come from `rng`.
    pub fn with_draws(target_slot: usize, lucky: bool, rng: &mut dyn RandomSource) -> Self {
        let rescue_slot = if rng.next_f64() < 0.5 {
            LUCKY_RESCUE_SLOTS[0]
        } else {
            LUCKY_RESCUE_SLOTS[1]
        };
        let lucky_rarity = if rng.next_f64() > 0.5 {
            Rarity::Mythic
        } else {
            Rarity::Legendary
        };
        Self {
            target_slot,
            lucky,
            rescue_slot,
            lucky_rarity,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prize {
    Empty,
    Coins { base: u32, lucky_bonus: u32 },
    Hero(Collectible),
}

impl Prize {
    pub fn kind(&self) -> PrizeKind {
        match self {
            Prize::Empty => PrizeKind::Empty,
            Prize::Coins { .. } => PrizeKind::Coins,
            Prize::Hero(_) => PrizeKind::Hero,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropOutcome {
    /// Slot the token physically landed in.
    pub slot_index: usize,
    /// Slot that paid out, after any lucky rescue.
    pub effective_slot_index: usize,
    pub lucky: bool,
    pub prize: Prize,
    /// Total coins credited, streak bonus included.
    pub coins_awarded: u32,
    pub streak_bonus: u32,
    /// Streak after this drop.
    pub streak: u32,
}

/// A hero landing waiting for its card from the catalog.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingHero {
    ticket: DropTicket,
    effective_slot: usize,
    streak: u32,
    streak_bonus: u32,
}

impl PendingHero {
    pub fn ticket(&self) -> &DropTicket {
        &self.ticket
    }

    pub fn complete(self, mut card: Collectible) -> DropOutcome {
        if self.ticket.lucky {
            card.rarity = self.ticket.lucky_rarity;
            card.name = format!("{LUCKY_NAME_PREFIX}{}", card.name);
        }
        DropOutcome {
            slot_index: self.ticket.target_slot,
            effective_slot_index: self.effective_slot,
            lucky: self.ticket.lucky,
            prize: Prize::Hero(card),
            coins_awarded: self.streak_bonus,
            streak_bonus: self.streak_bonus,
            streak: self.streak,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Ready(DropOutcome),
    AwaitingCollectible(PendingHero),
}

/// Starts a drop against `state`: checks preconditions, draws the ticket,
/// charges one coin and raises the in-progress flag.
pub fn begin_drop(
    state: &mut GameState,
    config: &GameConfig,
    rng: &mut dyn RandomSource,
) -> DropResult<DropTicket> {
    if state.is_dropping {
        return Err(DropError::DropAlreadyInProgress);
    }
    if state.coins == 0 {
        return Err(DropError::InsufficientBalance);
    }

    let lucky = rng.next_f64() < config.lucky_chance;
    let target = rng.next_index(SLOT_COUNT);
    let ticket = DropTicket::with_draws(target, lucky, rng);

    state.coins -= 1;
    state.is_dropping = true;
    state.last_reward = None;
    log::debug!(
        "drop started: target={} lucky={} coins_left={}",
        ticket.target_slot,
        ticket.lucky,
        state.coins
    );
    Ok(ticket)
}

/// Flat bonus for a win that brings the streak to `new_streak`.
pub fn streak_bonus(new_streak: u32, config: &GameConfig) -> u32 {
    if new_streak >= config.streak_threshold {
        config.streak_bonus
    } else {
        0
    }
}

/// Resolves where a landed drop pays out.
pub fn resolve_landing(
    ticket: &DropTicket,
    current_streak: u32,
    config: &GameConfig,
) -> DropResult<Resolution> {
    let nominal = slot(ticket.target_slot).ok_or(DropError::InvalidSlotIndex {
        index: ticket.target_slot,
        count: SLOT_COUNT,
    })?;

    let effective = if ticket.lucky && nominal.prize == SlotPrize::Empty {
        slot(ticket.rescue_slot).ok_or(DropError::InvalidSlotIndex {
            index: ticket.rescue_slot,
            count: SLOT_COUNT,
        })?
    } else {
        nominal
    };

    let new_streak = current_streak.saturating_add(1);
    let bonus = streak_bonus(new_streak, config);

    let resolution = match effective.prize {
        SlotPrize::Empty => Resolution::Ready(DropOutcome {
            slot_index: ticket.target_slot,
            effective_slot_index: effective.id,
            lucky: ticket.lucky,
            prize: Prize::Empty,
            coins_awarded: 0,
            streak_bonus: 0,
            streak: 0,
        }),
        SlotPrize::Coins { amount } => {
            let lucky_bonus = if ticket.lucky { config.lucky_coin_bonus } else { 0 };
            Resolution::Ready(DropOutcome {
                slot_index: ticket.target_slot,
                effective_slot_index: effective.id,
                lucky: ticket.lucky,
                prize: Prize::Coins {
                    base: amount,
                    lucky_bonus,
                },
                coins_awarded: amount.saturating_add(lucky_bonus).saturating_add(bonus),
                streak_bonus: bonus,
                streak: new_streak,
            })
        }
        SlotPrize::Hero => Resolution::AwaitingCollectible(PendingHero {
            ticket: *ticket,
            effective_slot: effective.id,
            streak: new_streak,
            streak_bonus: bonus,
        }),
    };
    Ok(resolution)
}
