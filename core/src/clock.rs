//! Shift clock: simulated seconds, pause state, and playback pacing.
//!
//! The clock only counts. It never sleeps; a presentation layer asks
//! `real_ms_per_tick()` how long to wait between `tick()` calls.

use crate::types::{Millis, RunId, Tick, TICK_MS};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SimSpeed {
    #[default]
    Normal,
    /// One generation window per real second.
    Accelerated,
    FastForward,
}

impl SimSpeed {
    pub fn ticks_per_real_second(self) -> u32 {
        match self {
            Self::Normal      => 1,
            Self::Accelerated => 5,
            Self::FastForward => 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimClock {
    pub run_id:       RunId,
    pub current_tick: Tick,
    pub speed:        SimSpeed,
    pub paused:       bool,
}

impl SimClock {
    /// A fresh shift starts paused at tick 0.
    pub fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            current_tick: 0,
            speed: SimSpeed::default(),
            paused: true,
        }
    }

    /// Step one simulated second and return the new tick.
    /// Panics while paused; the engine checks first.
    pub fn advance(&mut self) -> Tick {
        assert!(!self.paused, "advance() called on paused clock");
        self.current_tick += 1;
        self.current_tick
    }

    pub fn now_ms(&self) -> Millis {
        self.current_tick * TICK_MS
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn set_speed(&mut self, speed: SimSpeed) {
        log::debug!("tick={} clock: speed {speed:?}", self.current_tick);
        self.speed = speed;
    }

    pub fn ticks_per_real_second(&self) -> u32 {
        self.speed.ticks_per_real_second()
    }

    /// Ticks owed for `real_ms` of wall time at the current speed.
    /// Nothing is owed while paused.
    pub fn ticks_for_real_ms(&self, real_ms: u64) -> u64 {
        if self.paused {
            return 0;
        }
        real_ms * u64::from(self.ticks_per_real_second()) / 1_000
    }

    /// Real milliseconds a display loop should wait between ticks.
    pub fn real_ms_per_tick(&self) -> u64 {
        1_000 / u64::from(self.ticks_per_real_second())
    }

    /// Shift time as `MM:SS`; minutes keep counting past an hour.
    pub fn elapsed_label(&self) -> String {
        format!("{:02}:{:02}", self.current_tick / 60, self.current_tick % 60)
    }
}
