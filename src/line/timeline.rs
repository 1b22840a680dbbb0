//! Repeating tween timeline
//!
//! The timeline clock is independent of the display refresh: callers feed it
//! elapsed time through `advance`. Renderers read the channel values whenever
//! they like.

use serde::{Deserialize, Serialize};

use super::ease::Ease;
use crate::lerp;
use crate::settings::TimingSettings;

/// Animated scalar driven by a timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Fraction of the path revealed
    Draw,
    /// Fraction of the path removed
    Erase,
}

/// A single eased transition at a fixed offset within one cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub channel: Channel,
    pub from: f32,
    pub to: f32,
    /// Offset from the start of the cycle (seconds)
    pub start: f32,
    pub duration: f32,
    pub ease: Ease,
}

impl Tween {
    pub fn new(channel: Channel, from: f32, to: f32, start: f32, duration: f32, ease: Ease) -> Self {
        Self {
            channel,
            from,
            to,
            start: start.max(0.0),
            duration: duration.max(0.0),
            ease,
        }
    }

    #[inline]
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }

    /// Value at `local` seconds into the cycle
    pub fn sample(&self, local: f32) -> f32 {
        if local >= self.end() && local > self.start {
            self.to
        } else if local <= self.start {
            self.from
        } else {
            let t = (local - self.start) / self.duration;
            lerp(self.from, self.to, self.ease.apply(t))
        }
    }
}

/// Outcome of advancing a scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Still inside the initial start delay
    Waiting,
    /// Inside a cycle
    Running,
    /// Crossed at least one repeat boundary; carries the new cycle index
    Repeated(u64),
    /// Cancelled; nothing happened
    Stopped,
}

/// Minimal scheduling contract for a repeating two-channel animation
///
/// `Timeline` implements this by plain frame-loop interpolation. Any other
/// clock (a platform animation API, a recorded trace) can stand in.
pub trait Scheduler {
    /// Move the clock forward by `dt` seconds
    fn advance(&mut self, dt: f32) -> Advance;
    /// Current value of a channel
    fn value(&self, channel: Channel) -> f32;
    /// Stop the timeline and discard all pending transitions
    fn cancel(&mut self);
    fn is_active(&self) -> bool;
}

/// A set of tweens that repeats forever after an initial delay
#[derive(Debug, Clone)]
pub struct Timeline {
    tweens: Vec<Tween>,
    repeat_delay: f32,
    delay_remaining: f32,
    /// Seconds into the current cycle
    local: f32,
    cycle: u64,
    active: bool,
}

impl Timeline {
    pub fn new(start_delay: f32, repeat_delay: f32) -> Self {
        Self {
            tweens: Vec::new(),
            repeat_delay: repeat_delay.max(0.0),
            delay_remaining: start_delay.max(0.0),
            local: 0.0,
            cycle: 0,
            active: true,
        }
    }

    /// Append a tween (builder style)
    pub fn tween(mut self, tween: Tween) -> Self {
        self.tweens.push(tween);
        self.tweens.sort_by(|a, b| a.start.total_cmp(&b.start));
        self
    }

    /// The draw-then-erase cycle of a neon line
    ///
    /// The erase hold is measured from the start of the draw phase.
    pub fn neon(start_delay: f32, timing: &TimingSettings) -> Self {
        Self::new(start_delay, timing.repeat_delay)
            .tween(Tween::new(
                Channel::Draw,
                0.0,
                1.0,
                0.0,
                timing.draw_duration,
                timing.ease,
            ))
            .tween(Tween::new(
                Channel::Erase,
                0.0,
                timing.erase_target,
                timing.hold,
                timing.erase_duration,
                timing.ease,
            ))
    }

    /// Length of one cycle, excluding the repeat pause
    pub fn cycle_duration(&self) -> f32 {
        self.tweens.iter().map(Tween::end).fold(0.0, f32::max)
    }

    /// Cycle plus repeat pause
    pub fn period(&self) -> f32 {
        self.cycle_duration() + self.repeat_delay
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn local_time(&self) -> f32 {
        self.local
    }

    pub fn is_waiting(&self) -> bool {
        self.delay_remaining > 0.0
    }
}

impl Scheduler for Timeline {
    fn advance(&mut self, dt: f32) -> Advance {
        if !self.active {
            return Advance::Stopped;
        }

        // Non-finite steps are dropped
        let mut dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        if self.delay_remaining > 0.0 {
            if dt < self.delay_remaining {
                self.delay_remaining -= dt;
                return Advance::Waiting;
            }
            dt -= self.delay_remaining;
            self.delay_remaining = 0.0;
        }

        let period = self.period();
        if period <= f32::EPSILON {
            self.local += dt;
            return Advance::Running;
        }

        // Wrap the step first so `local` stays within one period
        let mut wraps = (dt / period).floor();
        self.local += dt.rem_euclid(period);
        if self.local >= period {
            self.local -= period;
            wraps += 1.0;
        }

        if wraps >= 1.0 {
            self.cycle = self.cycle.saturating_add(wraps as u64);
            return Advance::Repeated(self.cycle);
        }

        Advance::Running
    }

    fn value(&self, channel: Channel) -> f32 {
        let mut tweens = self.tweens.iter().filter(|t| t.channel == channel);
        let Some(first) = tweens.next() else {
            return 0.0;
        };

        // Later tweens take over once they have started
        let mut value = first.sample(self.local);
        for tween in tweens {
            if self.local > tween.start {
                value = tween.sample(self.local);
            }
        }
        value
    }

    fn cancel(&mut self) {
        if self.active {
            log::debug!("Timeline cancelled at cycle {}", self.cycle);
        }
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
