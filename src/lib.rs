//! Steel Drop core crate.
//!
//! A coin-drop mini-game: each drop costs one coin, falls along a randomized
//! path and lands in one of seven prize slots (empty vault, coins or a hero
//! card). The drop engine (`resolver`, `trajectory`, `session`) is plain Rust
//! and runs natively under `cargo test`; the `web` module hosts it in the
//! browser through wasm-bindgen.

use wasm_bindgen::prelude::*;

pub mod collectible;
pub mod config;
pub mod counter;
pub mod error;
pub mod events;
pub mod resolver;
pub mod rng;
pub mod session;
pub mod slots;
pub mod state;
pub mod store;
pub mod trajectory;
mod web;

pub use collectible::{Collectible, CollectibleCatalog, LocalCatalog, Rarity};
pub use config::GameConfig;
pub use error::{CatalogError, DropError, StoreError};
pub use events::{NotificationSink, RecordingSink};
pub use resolver::{DropOutcome, DropTicket, Prize, Resolution, begin_drop, resolve_landing};
pub use session::{DropSession, SessionEvent};
pub use slots::{PrizeKind, SLOT_COUNT, SLOTS, Slot, SlotPrize};
pub use state::GameState;
pub use trajectory::{Trajectory, TrajectoryFrame, Waypoint, compute_waypoints};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn start_game() -> Result<(), JsValue> {
    web::start(GameConfig::default())
}

/// Same as `start_game` with a partial JSON `GameConfig` override.
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    let config = GameConfig::from_json(json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    web::start(config)
}

#[wasm_bindgen]
pub fn drop_coin() {
    web::drop_coin();
}

/// Returns the new paused state.
#[wasm_bindgen]
pub fn toggle_pause() -> bool {
    web::toggle_pause()
}

#[wasm_bindgen]
pub fn reset_game() {
    web::reset_game();
}
