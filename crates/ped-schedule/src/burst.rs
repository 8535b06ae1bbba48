//! Finite bursts: `count` emissions spaced `interval_secs` apart.
//!
//! Train doors use one burst per arrival to let passengers off.  The first
//! emission is immediate; each later one is a timer entry `interval_secs`
//! after the previous.

use crate::{ScheduleError, ScheduleResult};

#[derive(Clone, Debug, PartialEq)]
pub struct Burst {
    remaining: u32,
    interval_secs: f32,
    emitted: u32,
}

impl Burst {
    pub fn new(count: u32, interval_secs: f32) -> ScheduleResult<Self> {
        if !(interval_secs.is_finite() && interval_secs >= 0.0) {
            return Err(ScheduleError::InvalidBurst(interval_secs));
        }
        Ok(Self { remaining: count, interval_secs, emitted: 0 })
    }

    /// A burst that is already complete.
    pub fn finished() -> Self {
        Self { remaining: 0, interval_secs: 0.0, emitted: 0 }
    }

    /// Consume one emission.  Returns the delay until the next one, or `None`
    /// if this was the last (or nothing was left).
    pub fn emit(&mut self) -> Option<f32> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        self.emitted += 1;
        (self.remaining > 0).then_some(self.interval_secs)
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    pub fn emitted(&self) -> u32 {
        self.emitted
    }
}
