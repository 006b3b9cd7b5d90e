//! Collectible hero cards and the catalog they are drawn from.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::rng::RandomSource;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl Rarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "Common",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Mythic => "Mythic",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collectible {
    pub id: String,
    pub name: String,
    pub power: String,
    pub rarity: Rarity,
    pub description: String,
    pub image_url: String,
}

/// Marker prepended to the name of a card upgraded by a lucky drop.
pub const LUCKY_NAME_PREFIX: &str = "✨ ";

/// Source of collectible records. Fetching is split into `request` and
/// `poll` so the frame loop can wait for a slow catalog without blocking.
pub trait CollectibleCatalog {
    fn request(&mut self, now_ms: f64);
    /// `None` while the record is still on its way.
    fn poll(&mut self, now_ms: f64) -> Option<Result<Collectible, CatalogError>>;
}

/// (name, power, rarity, description)
pub const HERO_DATABASE: &[(&str, &str, Rarity, &str)] = &[
    ("Steel Titan", "Flight, total invulnerability and laser vision", Rarity::Mythic,
        "Last survivor of a distant planet and humanity's ultimate guardian."),
    ("Dark Sentinel", "Martial arts, advanced gadgets and peak intellect", Rarity::Epic,
        "A billionaire turned vigilante who hides in the shadows of the big city."),
    ("Thunder King", "Command of lightning and a cosmic hammer", Rarity::Legendary,
        "A prince of a celestial realm defending Earth with the fury of the skies."),
    ("Star Warrior", "Superhuman strength and a lasso of truth", Rarity::Epic,
        "A warrior princess from a hidden island, sent to bring peace to the world."),
    ("Volt Runner", "Movement at the speed of light", Rarity::Rare,
        "Crosses continents in seconds and can run back through time."),
    ("Deep Sovereign", "Speaks with sea creatures and commands the currents", Rarity::Rare,
        "Ruler of the seven seas who can summon the power of the ocean."),
    ("Arrow Ghost", "Perfect aim and razor-sharp senses", Rarity::Common,
        "A skilled hunter who never misses a target."),
    ("Gamma Titan", "Limitless strength fuelled by rage", Rarity::Epic,
        "A scientist turned unstoppable monster after a radiation accident."),
    ("Spider Weaver", "Wall climbing and a sixth sense", Rarity::Common,
        "A young hero with spider powers who protects the neighbourhood."),
    ("Cosmic Mystic", "Manipulation of time and space", Rarity::Legendary,
        "Guardian of our dimension against incomprehensible cosmic threats."),
];

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_LEN: usize = 9;
const IMAGE_SEEDS: usize = 5000;

/// Builds a fresh card from the database with a random id and artwork seed.
pub fn random_card(rng: &mut dyn RandomSource) -> Collectible {
    let (name, power, rarity, description) = HERO_DATABASE[rng.next_index(HERO_DATABASE.len())];
    let id: String = (0..ID_LEN)
        .map(|_| ID_ALPHABET[rng.next_index(ID_ALPHABET.len())] as char)
        .collect();
    let seed = rng.next_index(IMAGE_SEEDS);
    Collectible {
        id,
        name: name.to_string(),
        power: power.to_string(),
        rarity,
        description: description.to_string(),
        image_url: format!("https://picsum.photos/seed/{seed}/400/600"),
    }
}

/// In-process catalog backed by `HERO_DATABASE`, answering after a fixed
/// latency measured on the caller's clock.
pub struct LocalCatalog {
    rng: Box<dyn RandomSource>,
    latency_ms: f64,
    ready_at: Option<f64>,
}

impl LocalCatalog {
    pub fn new(rng: Box<dyn RandomSource>, latency_ms: f64) -> Self {
        Self {
            rng,
            latency_ms,
            ready_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.ready_at.is_some()
    }
}

impl CollectibleCatalog for LocalCatalog {
    fn request(&mut self, now_ms: f64) {
        self.ready_at = Some(now_ms + self.latency_ms);
    }

    fn poll(&mut self, now_ms: f64) -> Option<Result<Collectible, CatalogError>> {
        match self.ready_at {
            Some(at) if now_ms >= at => {
                self.ready_at = None;
                Some(Ok(random_card(self.rng.as_mut())))
            }
            Some(_) => None,
            None => Some(Err(CatalogError::Unavailable(
                "poll without a pending request".to_string(),
            ))),
        }
    }
}
