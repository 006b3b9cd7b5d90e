//! Browser host: canvas board, DOM overlays, input wiring and the
//! `requestAnimationFrame` loop that polls the drop session.
//!
//! All game decisions live in `DropSession`; this module only draws the
//! session's current view, forwards commands and persists state after every
//! change.
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, KeyboardEvent, window};

use crate::collectible::{Collectible, CollectibleCatalog, LocalCatalog, Rarity};
use crate::config::GameConfig;
use crate::events::NotificationSink;
use crate::resolver::{DropOutcome, Prize};
use crate::rng::ChaChaSource;
use crate::session::{DropSession, SessionEvent};
use crate::slots::{SLOT_COUNT, SLOTS, slot_width};
use crate::store::{StateStore, load_or_new};

pub mod audio;
pub mod console;
pub mod storage;

use audio::ToneSink;
use storage::LocalStorageStore;

const CANVAS_W: u32 = 560;
const CANVAS_H: u32 = 640;
/// Fraction of the board height taken by the slot row.
const SLOT_ROW: f64 = 0.12;
const COIN_RADIUS: f64 = 16.0;

struct WebGame {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    session: DropSession<LocalCatalog, ToneSink>,
    store: LocalStorageStore,
    /// Collection size the gallery was last built for.
    gallery_len: Option<usize>,
}

thread_local! {
    static GAME: std::cell::RefCell<Option<WebGame>> = const { std::cell::RefCell::new(None) };
    // listeners and the frame loop outlive restarts and read whatever GAME holds
    static INSTALLED: std::cell::Cell<bool> = const { std::cell::Cell::new(false) };
}

type FrameCallback = std::rc::Rc<std::cell::RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

pub fn start(config: GameConfig) -> Result<(), JsValue> {
    console::init(log::LevelFilter::Info);
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    // Create / reuse the board canvas
    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id("sd-board") {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id("sd-board");
        c.set_width(CANVAS_W);
        c.set_height(CANVAS_H);
        c.set_attribute(
            "style",
            "display:block; margin:24px auto; border-radius:18px; border:2px solid #222; background:#020617;",
        )
        .ok();
        let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;
        body.append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    ctx.set_text_align("center");

    let store = LocalStorageStore::new(&config.storage_key);
    let state = load_or_new(&store, config.initial_coins);
    log::info!(
        "loaded game: {} coins, {} heroes, streak {}",
        state.coins,
        state.collection.len(),
        state.streak
    );
    let catalog = LocalCatalog::new(
        Box::new(ChaChaSource::from_entropy()),
        config.catalog_latency_ms,
    );
    let session = DropSession::new(
        state,
        config,
        Box::new(ChaChaSource::from_entropy()),
        catalog,
        ToneSink::new(),
    );

    GAME.with(|g| {
        g.replace(Some(WebGame {
            canvas,
            ctx,
            session,
            store,
            gallery_len: None,
        }))
    });
    with_game(refresh_gallery);
    if !INSTALLED.with(|i| i.get()) {
        install_input()?;
        start_loop();
        INSTALLED.with(|i| i.set(true));
    }
    Ok(())
}

/// Forwards the drop command. Ignored (logged at debug) when a drop is not
/// currently allowed.
pub fn drop_coin() {
    let now = now_ms();
    with_game(|game| match game.session.drop_command(now) {
        Ok(()) => persist(game),
        Err(e) if e.is_precondition() => log::debug!("drop ignored: {e}"),
        Err(e) => log::error!("drop failed: {e}"),
    });
}

pub fn toggle_pause() -> bool {
    let mut paused = false;
    with_game(|game| paused = game.session.toggle_pause());
    paused
}

pub fn reset_game() {
    let confirmed = window()
        .and_then(|w| w.confirm_with_message("Reset your vault and all collected heroes?").ok())
        .unwrap_or(false);
    if !confirmed {
        return;
    }
    with_game(|game| {
        if let Err(e) = game.session.reset() {
            log::warn!("reset refused: {e}");
            return;
        }
        if let Err(e) = game.store.clear() {
            log::warn!("could not clear saved game: {e}");
        }
        hide_reward();
    });
}

fn with_game(f: impl FnOnce(&mut WebGame)) {
    GAME.with(|cell| {
        if let Some(game) = cell.borrow_mut().as_mut() {
            f(game);
        }
    });
}

fn persist(game: &mut WebGame) {
    if let Err(e) = game.store.save(game.session.state()) {
        log::warn!("could not save game: {e}");
    }
}

fn install_input() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let on_key = Closure::<dyn FnMut(KeyboardEvent)>::new(|e: KeyboardEvent| {
        match e.key().to_lowercase().as_str() {
            "w" | "s" | " " => drop_coin(),
            "p" => {
                toggle_pause();
            }
            _ => {}
        }
    });
    win.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;
    on_key.forget();

    if let Some(doc) = win.document() {
        bind_click(&doc, "sd-drop", drop_coin)?;
        bind_click(&doc, "sd-pause", || {
            toggle_pause();
        })?;
        bind_click(&doc, "sd-reset", reset_game)?;
        bind_click(&doc, "sd-reward-close", hide_reward)?;
    }
    Ok(())
}

fn bind_click(doc: &web_sys::Document, id: &str, f: fn()) -> Result<(), JsValue> {
    if let Some(el) = doc.get_element_by_id(id) {
        let cb = Closure::<dyn FnMut()>::new(f);
        el.add_event_listener_with_callback("click", cb.as_ref().unchecked_ref())?;
        cb.forget();
    }
    Ok(())
}

fn start_loop() {
    let f: FrameCallback = std::rc::Rc::new(std::cell::RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        with_game(|game| game_frame(game, ts));
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

// --- Frame ------------------------------------------------------------------

fn game_frame(game: &mut WebGame, now: f64) {
    match game.session.frame(now) {
        Some(SessionEvent::Resolved(outcome)) => {
            persist(game);
            show_reward(&outcome);
        }
        Some(SessionEvent::Refunded(reason)) => {
            persist(game);
            show_message("Recruitment failed", &format!("Your coin was returned ({reason})."));
        }
        None => {}
    }
    if game.session.is_generating() {
        show_message("Generating hero...", "");
    }
    render_board(game);
    update_overlays(&game.session);
    refresh_gallery(game);
}

fn render_board(game: &WebGame) {
    let ctx = &game.ctx;
    let w = game.canvas.width() as f64;
    let h = game.canvas.height() as f64;
    ctx.set_fill_style(&JsValue::from_str("#020617"));
    ctx.fill_rect(0.0, 0.0, w, h);

    // Peg field (decorative)
    ctx.set_fill_style(&JsValue::from_str("#1e293b"));
    for row in 1..12 {
        let y = h * (row as f64 / 12.0) * 0.8 + h * 0.05;
        let offset = if row % 2 == 0 { 0.5 } else { 0.0 };
        for col in 0..SLOT_COUNT {
            let x = w * ((col as f64 + offset + 0.25) / SLOT_COUNT as f64);
            ctx.begin_path();
            ctx.arc(x, y, 3.0, 0.0, std::f64::consts::TAU).ok();
            ctx.fill();
        }
    }

    // Slot row
    let sw = w * slot_width(SLOT_COUNT) / 100.0;
    let row_y = h * (1.0 - SLOT_ROW);
    let target = game.session.target_slot();
    ctx.set_font("bold 13px sans-serif");
    for s in SLOTS.iter() {
        let x = s.id as f64 * sw;
        ctx.set_fill_style(&JsValue::from_str(s.color));
        ctx.fill_rect(x + 2.0, row_y, sw - 4.0, h * SLOT_ROW - 2.0);
        if target == Some(s.id) {
            ctx.set_stroke_style(&JsValue::from_str("#fbbf24"));
            ctx.set_line_width(3.0);
            ctx.stroke_rect(x + 2.0, row_y, sw - 4.0, h * SLOT_ROW - 2.0);
        }
        ctx.set_fill_style(&JsValue::from_str("#f8fafc"));
        ctx.fill_text(s.label, x + sw / 2.0, row_y + h * SLOT_ROW / 2.0 + 4.0).ok();
    }

    // Falling coin
    if let Some(p) = game.session.coin_position() {
        let cx = w * p.x / 100.0;
        // y=100 is the floor of the board, i.e. the middle of the slot row
        let cy = (h * (1.0 - SLOT_ROW / 2.0)) * p.y / 100.0;
        ctx.save();
        ctx.translate(cx, cy).ok();
        ctx.rotate(p.rotation.to_radians()).ok();
        let face = if game.session.lucky_active() { "#f472b6" } else { "#fbbf24" };
        ctx.set_fill_style(&JsValue::from_str(face));
        ctx.begin_path();
        ctx.arc(0.0, 0.0, COIN_RADIUS, 0.0, std::f64::consts::TAU).ok();
        ctx.fill();
        ctx.set_fill_style(&JsValue::from_str("#78350f"));
        ctx.set_font("bold 16px sans-serif");
        ctx.fill_text("$", 0.0, 6.0).ok();
        ctx.restore();
    }
}

// --- DOM overlays -----------------------------------------------------------

fn set_text(id: &str, text: &str) {
    if let Some(el) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
    {
        el.set_text_content(Some(text));
    }
}

fn set_visible(id: &str, visible: bool) {
    if let Some(el) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(id))
    {
        let style = if visible { "" } else { "display:none" };
        el.set_attribute("style", style).ok();
    }
}

fn update_overlays<C: CollectibleCatalog, N: NotificationSink>(session: &DropSession<C, N>) {
    let state = session.state();
    set_text("sd-coins", &session.displayed_coins().to_string());
    set_text("sd-heroes", &state.collection.len().to_string());
    set_text(
        "sd-streak",
        &if state.streak > 0 {
            format!("STREAK: {}", state.streak)
        } else {
            String::new()
        },
    );
    set_visible("sd-streak-bonus", state.streak >= session.config().streak_threshold);
    set_visible("sd-lucky", session.lucky_active());
    set_visible("sd-paused", session.is_paused());
    set_text("sd-drop", session.drop_button_label());
    set_text("sd-pause", if session.is_paused() { "Resume" } else { "Pause" });
}

/// Rebuilds the hero gallery when the collection size changed. Card fields
/// come from storage the user can edit, so they only ever land in text nodes
/// and attributes.
fn refresh_gallery(game: &mut WebGame) {
    let len = game.session.state().collection.len();
    if game.gallery_len == Some(len) {
        return;
    }
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    let Some(el) = doc.get_element_by_id("sd-gallery") else {
        return;
    };
    match build_gallery(&doc, &el, &game.session.state().collection) {
        Ok(()) => game.gallery_len = Some(len),
        Err(e) => log::warn!("could not build gallery: {e:?}"),
    }
}

fn build_gallery(doc: &Document, el: &Element, cards: &[Collectible]) -> Result<(), JsValue> {
    el.set_text_content(None);
    for card in cards.iter().rev() {
        let item = doc.create_element("div")?;
        item.set_class_name("sd-card");
        item.set_attribute("style", &format!("border-color:{}", rarity_color(card.rarity)))?;
        let img = doc.create_element("img")?;
        if card.image_url.starts_with("https://") {
            img.set_attribute("src", &card.image_url)?;
        }
        img.set_attribute("alt", "")?;
        let name = doc.create_element("b")?;
        name.set_text_content(Some(&card.name));
        let rarity = doc.create_element("span")?;
        rarity.set_text_content(Some(card.rarity.as_str()));
        item.append_child(&img)?;
        item.append_child(&name)?;
        item.append_child(&rarity)?;
        el.append_child(&item)?;
    }
    Ok(())
}

fn rarity_color(r: Rarity) -> &'static str {
    match r {
        Rarity::Mythic => "#dc2626",
        Rarity::Legendary => "#f59e0b",
        Rarity::Epic => "#9333ea",
        Rarity::Rare => "#4f46e5",
        Rarity::Common => "#334155",
    }
}

fn show_message(title: &str, body: &str) {
    set_text("sd-reward-title", title);
    set_text("sd-reward-body", body);
    set_visible("sd-reward", true);
}

fn show_reward(outcome: &DropOutcome) {
    let title = if outcome.lucky {
        "Huge luck!"
    } else {
        match outcome.prize {
            Prize::Hero(_) => "Recruited!",
            Prize::Coins { .. } => "Bonus!",
            Prize::Empty => "Empty",
        }
    };
    let body = match &outcome.prize {
        Prize::Hero(card) => format!(
            "{} ({}) - {}{}",
            card.name,
            card.rarity.as_str(),
            card.power,
            streak_note(outcome.streak_bonus)
        ),
        Prize::Coins { .. } => format!(
            "+{} coins{}",
            outcome.coins_awarded,
            streak_note(outcome.streak_bonus)
        ),
        Prize::Empty => "The vault was empty this time.".to_string(),
    };
    show_message(title, &body);
}

fn streak_note(bonus: u32) -> String {
    if bonus > 0 {
        format!(" (+{bonus} streak bonus)")
    } else {
        String::new()
    }
}

fn hide_reward() {
    set_visible("sd-reward", false);
}
