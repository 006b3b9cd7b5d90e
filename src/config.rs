//! Tunable game constants.
//!
//! Every field defaults to the shipped balance; a host may override any
//! subset by passing JSON to `start_game_with_config`.

use serde::{Deserialize, Serialize};

pub const INITIAL_COINS: u32 = 20;
pub const STORAGE_KEY: &str = "super_hero_coin_drop_v7";
pub const DROP_DURATION_MS: f64 = 3000.0;
pub const LUCKY_CHANCE: f64 = 0.07;
pub const STREAK_THRESHOLD: u32 = 3;
pub const STREAK_BONUS: u32 = 2;
pub const LUCKY_COIN_BONUS: u32 = 40;
pub const CATALOG_LATENCY_MS: f64 = 800.0;
pub const COUNTER_STEP_MS: f64 = 40.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub initial_coins: u32,
    pub storage_key: String,
    pub drop_duration_ms: f64,
    pub lucky_chance: f64,
    pub streak_threshold: u32,
    pub streak_bonus: u32,
    pub lucky_coin_bonus: u32,
    pub catalog_latency_ms: f64,
    pub counter_step_ms: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_coins: INITIAL_COINS,
            storage_key: STORAGE_KEY.to_string(),
            drop_duration_ms: DROP_DURATION_MS,
            lucky_chance: LUCKY_CHANCE,
            streak_threshold: STREAK_THRESHOLD,
            streak_bonus: STREAK_BONUS,
            lucky_coin_bonus: LUCKY_COIN_BONUS,
            catalog_latency_ms: CATALOG_LATENCY_MS,
            counter_step_ms: COUNTER_STEP_MS,
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = GameConfig::from_json(r#"{"initialCoins": 5, "luckyChance": 0.5}"#).unwrap();
        assert_eq!(cfg.initial_coins, 5);
        assert!((cfg.lucky_chance - 0.5).abs() < 1e-12);
        assert_eq!(cfg.streak_threshold, STREAK_THRESHOLD);
        assert_eq!(cfg.storage_key, STORAGE_KEY);
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(GameConfig::from_json("{}").unwrap(), GameConfig::default());
    }
}
