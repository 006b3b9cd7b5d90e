// Integration tests for the static tables: slot layout and hero database.
// These tests are native-friendly and avoid wasm/browser APIs.

use std::collections::HashSet;

use steel_drop::collectible::HERO_DATABASE;
use steel_drop::{PrizeKind, Rarity, SLOT_COUNT, SLOTS, SlotPrize};

#[test]
fn hero_database_entries_are_unique_and_filled() {
    let mut seen = HashSet::new();
    for (name, power, _rarity, description) in HERO_DATABASE {
        assert!(seen.insert(*name), "duplicate hero '{}'", name);
        assert!(!power.is_empty(), "hero '{}' has no power", name);
        assert!(!description.is_empty(), "hero '{}' has no description", name);
    }
    assert_eq!(HERO_DATABASE.len(), 10);
}

#[test]
fn hero_database_covers_every_rarity() {
    let rarities: HashSet<Rarity> = HERO_DATABASE.iter().map(|(_, _, r, _)| *r).collect();
    for r in [Rarity::Common, Rarity::Rare, Rarity::Epic, Rarity::Legendary, Rarity::Mythic] {
        assert!(rarities.contains(&r), "no hero with rarity {}", r.as_str());
    }
}

#[test]
fn slot_table_layout() {
    assert_eq!(SLOTS.len(), SLOT_COUNT);
    let kinds: Vec<PrizeKind> = SLOTS.iter().map(|s| s.prize.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            PrizeKind::Empty,
            PrizeKind::Coins,
            PrizeKind::Hero,
            PrizeKind::Empty,
            PrizeKind::Coins,
            PrizeKind::Hero,
            PrizeKind::Empty,
        ]
    );
    assert_eq!(SLOTS[1].prize, SlotPrize::Coins { amount: 5 });
    assert_eq!(SLOTS[4].prize, SlotPrize::Coins { amount: 10 });
}

#[test]
fn slot_labels_are_present() {
    for s in SLOTS.iter() {
        assert!(!s.label.is_empty(), "slot {} has no label", s.id);
        assert!(s.color.starts_with('#'), "slot {} colour '{}' is not hex", s.id, s.color);
    }
}
