//! Session clock: elapsed gameplay time used to gate timed spawns.
//!
//! Every live tick is recorded into a bucket according to the phase it was
//! spent in. Paused and console time are subtracted from the elapsed value.
//! Shop time is tracked separately but still counts as elapsed.

use gollux_core::enums::GamePhase;

#[derive(Debug, Clone, Default)]
pub struct SessionClock {
    total_secs: f64,
    paused_secs: f64,
    console_secs: f64,
    shop_secs: f64,
    offset_secs: f64,
}

impl SessionClock {
    /// Account one tick of `dt` seconds spent in `phase`.
    /// Phases outside a live session are not recorded.
    pub fn record(&mut self, phase: GamePhase, dt: f64) {
        match phase {
            GamePhase::Active | GamePhase::VictoryFlash => {}
            GamePhase::Paused => self.paused_secs += dt,
            GamePhase::Console => self.console_secs += dt,
            GamePhase::Shop => self.shop_secs += dt,
            GamePhase::Lobby | GamePhase::GameOver | GamePhase::Victory | GamePhase::Aborted => {
                return
            }
        }
        self.total_secs += dt;
    }

    /// Admin time skip. Moves the elapsed value forward without simulating.
    pub fn skip(&mut self, secs: f64) {
        self.offset_secs += secs;
    }

    /// Gameplay seconds: total minus paused and console time, plus any skip.
    pub fn elapsed_secs(&self) -> f64 {
        (self.total_secs - self.paused_secs - self.console_secs + self.offset_secs).max(0.0)
    }

    pub fn paused_secs(&self) -> f64 {
        self.paused_secs
    }

    pub fn console_secs(&self) -> f64 {
        self.console_secs
    }

    pub fn shop_secs(&self) -> f64 {
        self.shop_secs
    }

    pub fn total_secs(&self) -> f64 {
        self.total_secs
    }
}
