//! Persisted game state and the transitions the drop core applies to it.

use serde::{Deserialize, Serialize};

use crate::collectible::Collectible;
use crate::resolver::{DropOutcome, Prize};
use crate::slots::PrizeKind;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub coins: u32,
    pub collection: Vec<Collectible>,
    #[serde(default)]
    pub is_dropping: bool,
    #[serde(default)]
    pub last_reward: Option<PrizeKind>,
    #[serde(default)]
    pub streak: u32,
}

impl GameState {
    pub fn new(initial_coins: u32) -> Self {
        Self {
            coins: initial_coins,
            collection: Vec::new(),
            is_dropping: false,
            last_reward: None,
            streak: 0,
        }
    }

    /// State restored from storage can never be mid-drop: the animation that
    /// owned the flag did not survive the reload.
    pub fn normalized(mut self) -> Self {
        self.is_dropping = false;
        self
    }

    pub fn can_drop(&self) -> bool {
        self.coins > 0 && !self.is_dropping
    }

    /// Applies a resolved drop. Clearing `is_dropping` happens here, in the
    /// same step that credits the reward.
    pub fn apply_outcome(&mut self, outcome: &DropOutcome) {
        self.is_dropping = false;
        self.last_reward = Some(outcome.prize.kind());
        self.streak = outcome.streak;
        self.coins = self.coins.saturating_add(outcome.coins_awarded);
        if let Prize::Hero(card) = &outcome.prize {
            self.collection.push(card.clone());
        }
    }

    /// Returns the coin charged for an abandoned drop and releases the
    /// in-progress flag without touching the streak.
    pub fn refund_drop(&mut self) {
        self.is_dropping = false;
        self.coins = self.coins.saturating_add(1);
    }

    pub fn reset(&mut self, initial_coins: u32) {
        *self = GameState::new(initial_coins);
    }
}
