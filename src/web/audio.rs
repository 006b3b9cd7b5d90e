//! Sound cues synthesized with Web Audio oscillators.
use wasm_bindgen::JsValue;
use web_sys::{AudioContext, AudioScheduledSourceNode, OscillatorType};

use crate::collectible::Collectible;
use crate::events::NotificationSink;

/// One scheduled note: frequency (Hz), waveform, length (s), peak gain,
/// start offset (s).
#[derive(Clone, Copy)]
struct Tone {
    freq: f32,
    wave: OscillatorType,
    duration: f64,
    volume: f32,
    offset: f64,
}

const fn tone(freq: f32, wave: OscillatorType, duration: f64, volume: f32, offset: f64) -> Tone {
    Tone {
        freq,
        wave,
        duration,
        volume,
        offset,
    }
}

const DROP: [Tone; 2] = [
    tone(440.0, OscillatorType::Sine, 0.2, 0.1, 0.0),
    tone(880.0, OscillatorType::Sine, 0.1, 0.05, 0.05),
];
const TICK: [Tone; 1] = [tone(150.0, OscillatorType::Square, 0.05, 0.02, 0.0)];
const WIN_COINS: [Tone; 3] = [
    tone(523.25, OscillatorType::Triangle, 0.3, 0.1, 0.0),
    tone(659.25, OscillatorType::Triangle, 0.3, 0.1, 0.1),
    tone(783.99, OscillatorType::Triangle, 0.3, 0.1, 0.2),
];
const WIN_HERO: [Tone; 4] = [
    tone(440.0, OscillatorType::Sawtooth, 0.5, 0.05, 0.0),
    tone(554.37, OscillatorType::Sawtooth, 0.5, 0.05, 0.15),
    tone(659.25, OscillatorType::Sawtooth, 0.5, 0.05, 0.3),
    tone(880.0, OscillatorType::Sawtooth, 0.5, 0.05, 0.45),
];
const MISS: [Tone; 1] = [tone(110.0, OscillatorType::Sine, 0.5, 0.1, 0.0)];

pub struct ToneSink {
    ctx: Option<AudioContext>,
}

impl ToneSink {
    pub fn new() -> Self {
        let ctx = match AudioContext::new() {
            Ok(ctx) => Some(ctx),
            Err(e) => {
                log::warn!("audio disabled: {e:?}");
                None
            }
        };
        Self { ctx }
    }

    fn play(&self, tones: &[Tone]) {
        let Some(ctx) = &self.ctx else { return };
        for t in tones {
            if let Err(e) = schedule(ctx, t) {
                log::debug!("tone dropped: {e:?}");
            }
        }
    }
}

fn schedule(ctx: &AudioContext, t: &Tone) -> Result<(), JsValue> {
    let at = ctx.current_time() + t.offset;
    let osc = ctx.create_oscillator()?;
    let gain = ctx.create_gain()?;
    osc.set_type(t.wave);
    osc.frequency().set_value_at_time(t.freq, at)?;
    gain.gain().set_value_at_time(t.volume, at)?;
    gain.gain()
        .exponential_ramp_to_value_at_time(0.0001, at + t.duration)?;
    osc.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;
    let source: &AudioScheduledSourceNode = &osc;
    source.start_with_when(at)?;
    source.stop_with_when(at + t.duration)?;
    Ok(())
}

impl NotificationSink for ToneSink {
    fn on_drop_start(&mut self) {
        self.play(&DROP);
    }
    fn on_tick(&mut self) {
        self.play(&TICK);
    }
    fn on_win_coins(&mut self, _coins: u32) {
        self.play(&WIN_COINS);
    }
    fn on_win_hero(&mut self, _card: &Collectible) {
        self.play(&WIN_HERO);
    }
    fn on_miss(&mut self) {
        self.play(&MISS);
    }
}
