//! Static prize-slot table. The board is split into `SLOT_COUNT` equal
//! columns; both the resolver and the trajectory generator index into it.

use serde::{Deserialize, Serialize};

/// Tag-only prize kind, as recorded in `GameState::last_reward`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrizeKind {
    Empty,
    Coins,
    Hero,
}

/// What a slot pays out before any lucky override.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotPrize {
    Empty,
    Coins { amount: u32 },
    Hero,
}

impl SlotPrize {
    pub fn kind(&self) -> PrizeKind {
        match self {
            SlotPrize::Empty => PrizeKind::Empty,
            SlotPrize::Coins { .. } => PrizeKind::Coins,
            SlotPrize::Hero => PrizeKind::Hero,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    pub id: usize,
    pub prize: SlotPrize,
    pub label: &'static str,
    pub color: &'static str,
}

pub const SLOT_COUNT: usize = 7;

pub static SLOTS: [Slot; SLOT_COUNT] = [
    Slot { id: 0, prize: SlotPrize::Empty, label: "Empty Vault", color: "#334155" },
    Slot { id: 1, prize: SlotPrize::Coins { amount: 5 }, label: "+5 Coins", color: "#d97706" },
    Slot { id: 2, prize: SlotPrize::Hero, label: "Recruit Hero!", color: "#4f46e5" },
    Slot { id: 3, prize: SlotPrize::Empty, label: "Empty Vault", color: "#334155" },
    Slot { id: 4, prize: SlotPrize::Coins { amount: 10 }, label: "+10 Coins", color: "#b45309" },
    Slot { id: 5, prize: SlotPrize::Hero, label: "Recruit Hero!", color: "#4338ca" },
    Slot { id: 6, prize: SlotPrize::Empty, label: "Empty Vault", color: "#334155" },
];

/// Slots a lucky drop can be rescued into when it lands on an empty vault:
/// the first hero slot or the big coin slot, chosen 50/50.
pub const LUCKY_RESCUE_SLOTS: [usize; 2] = [2, 4];

pub fn slot(index: usize) -> Option<&'static Slot> {
    SLOTS.get(index)
}

/// Width of one slot column in percent of the board.
pub fn slot_width(slot_count: usize) -> f64 {
    100.0 / slot_count as f64
}

/// Horizontal centre of a slot column in percent of the board.
pub fn slot_center_x(index: usize, slot_count: usize) -> f64 {
    let w = slot_width(slot_count);
    index as f64 * w + w / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_positions() {
        for (i, s) in SLOTS.iter().enumerate() {
            assert_eq!(s.id, i);
        }
    }

    #[test]
    fn table_has_two_coin_and_two_hero_slots() {
        let coins: Vec<u32> = SLOTS
            .iter()
            .filter_map(|s| match s.prize {
                SlotPrize::Coins { amount } => Some(amount),
                _ => None,
            })
            .collect();
        assert_eq!(coins, vec![5, 10]);
        assert_eq!(SLOTS.iter().filter(|s| s.prize == SlotPrize::Hero).count(), 2);
    }

    #[test]
    fn rescue_slots_are_never_empty() {
        for idx in LUCKY_RESCUE_SLOTS {
            assert_ne!(SLOTS[idx].prize.kind(), PrizeKind::Empty);
        }
        assert_eq!(SLOTS[LUCKY_RESCUE_SLOTS[0]].prize.kind(), PrizeKind::Hero);
        assert_eq!(SLOTS[LUCKY_RESCUE_SLOTS[1]].prize.kind(), PrizeKind::Coins);
    }

    #[test]
    fn slot_centres() {
        assert!((slot_center_x(0, 7) - 100.0 / 14.0).abs() < 1e-9);
        assert!((slot_center_x(2, 7) - 35.714_285_714).abs() < 1e-6);
        assert!((slot_center_x(6, 7) - (100.0 - 100.0 / 14.0)).abs() < 1e-9);
    }

    #[test]
    fn prize_kind_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&PrizeKind::Hero).unwrap(), "\"HERO\"");
        let k: PrizeKind = serde_json::from_str("\"EMPTY\"").unwrap();
        assert_eq!(k, PrizeKind::Empty);
    }
}
