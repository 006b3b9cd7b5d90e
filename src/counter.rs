//! Displayed coin balance that counts toward the real balance one coin at a
//! time, so wins and charges visibly tick up or down.

#[derive(Clone, Debug)]
pub struct CoinCounter {
    shown: u32,
    step_ms: f64,
    last_step_ms: Option<f64>,
}

impl CoinCounter {
    pub fn new(initial: u32, step_ms: f64) -> Self {
        Self {
            shown: initial,
            step_ms,
            last_step_ms: None,
        }
    }

    pub fn shown(&self) -> u32 {
        self.shown
    }

    /// Jump straight to `value` (used after a reset).
    pub fn snap(&mut self, value: u32) {
        self.shown = value;
        self.last_step_ms = None;
    }

    /// Moves at most one coin toward `target` per `step_ms`. Frozen while
    /// `paused`.
    pub fn update(&mut self, target: u32, now_ms: f64, paused: bool) -> u32 {
        if paused || self.shown == target {
            self.last_step_ms = None;
            return self.shown;
        }
        let due = match self.last_step_ms {
            None => {
                // first frame of a change only arms the timer
                self.last_step_ms = Some(now_ms);
                false
            }
            Some(last) => now_ms - last >= self.step_ms,
        };
        if due {
            if target > self.shown {
                self.shown += 1;
            } else {
                self.shown -= 1;
            }
            self.last_step_ms = Some(now_ms);
        }
        self.shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_up_one_per_step() {
        let mut c = CoinCounter::new(10, 40.0);
        assert_eq!(c.update(13, 0.0, false), 10);
        assert_eq!(c.update(13, 20.0, false), 10);
        assert_eq!(c.update(13, 40.0, false), 11);
        assert_eq!(c.update(13, 80.0, false), 12);
        assert_eq!(c.update(13, 120.0, false), 13);
        assert_eq!(c.update(13, 500.0, false), 13);
    }

    #[test]
    fn counts_down_and_freezes_when_paused() {
        let mut c = CoinCounter::new(5, 40.0);
        c.update(3, 0.0, false);
        assert_eq!(c.update(3, 40.0, false), 4);
        assert_eq!(c.update(3, 400.0, true), 4);
        c.update(3, 410.0, false);
        assert_eq!(c.update(3, 450.0, false), 3);
    }

    #[test]
    fn snap_jumps() {
        let mut c = CoinCounter::new(5, 40.0);
        c.snap(20);
        assert_eq!(c.shown(), 20);
    }
}
