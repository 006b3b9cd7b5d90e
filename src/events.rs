//! Fire-and-forget notifications emitted at discrete moments of a drop.
//! Sinks cannot fail; a sink that hits trouble internally just drops the cue.

use crate::collectible::Collectible;

pub trait NotificationSink {
    fn on_drop_start(&mut self) {}
    fn on_tick(&mut self) {}
    fn on_win_coins(&mut self, _coins: u32) {}
    fn on_win_hero(&mut self, _card: &Collectible) {}
    fn on_miss(&mut self) {}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    DropStart,
    Tick,
    WinCoins(u32),
    WinHero(String),
    Miss,
}

/// Records every notification in order.
#[derive(Default, Debug)]
pub struct RecordingSink {
    pub events: Vec<Notification>,
}

impl RecordingSink {
    pub fn count(&self, wanted: &Notification) -> usize {
        self.events.iter().filter(|e| *e == wanted).count()
    }
}

impl NotificationSink for RecordingSink {
    fn on_drop_start(&mut self) {
        self.events.push(Notification::DropStart);
    }
    fn on_tick(&mut self) {
        self.events.push(Notification::Tick);
    }
    fn on_win_coins(&mut self, coins: u32) {
        self.events.push(Notification::WinCoins(coins));
    }
    fn on_win_hero(&mut self, card: &Collectible) {
        self.events.push(Notification::WinHero(card.name.clone()));
    }
    fn on_miss(&mut self) {
        self.events.push(Notification::Miss);
    }
}
