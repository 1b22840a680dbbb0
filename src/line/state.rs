//! Per-line animation state
//!
//! Each `NeonLine` exclusively owns its path, its timeline and its RNG.
//! Nothing here is shared between lines.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::path::{self, Path, SurfaceSize, Zone};
use super::timeline::{Advance, Channel, Scheduler, Timeline};
use crate::consts::HEAD_ERASE_CUTOFF;
use crate::settings::{LineSpec, TimingSettings};

/// The two progress scalars read by the renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    /// 0..=1
    pub draw_progress: f32,
    /// 0..=erase target (1.1 by default)
    pub erase_progress: f32,
}

impl AnimationState {
    pub fn new(draw_progress: f32, erase_progress: f32) -> Self {
        Self {
            draw_progress,
            erase_progress,
        }
    }

    /// Whether the point at normalized position `t` is on screen
    ///
    /// Nothing is visible before drawing starts, even the point at t = 0.
    #[inline]
    pub fn is_visible(&self, t: f32) -> bool {
        self.draw_progress > 0.0 && self.erase_progress <= t && t <= self.draw_progress
    }

    /// Erase has meaningfully started
    #[inline]
    pub fn erasing(&self) -> bool {
        self.erase_progress >= HEAD_ERASE_CUTOFF
    }
}

/// One animated neon line
pub struct NeonLine<S: Scheduler = Timeline> {
    spec: LineSpec,
    timing: TimingSettings,
    point_count: usize,
    size: SurfaceSize,
    path: Path,
    scheduler: S,
    rng: Pcg32,
    generation: u64,
}

impl NeonLine<Timeline> {
    pub fn new(
        spec: LineSpec,
        timing: TimingSettings,
        point_count: usize,
        size: SurfaceSize,
        rng: Pcg32,
    ) -> Self {
        let timeline = Timeline::neon(spec.delay, &timing);
        Self::with_scheduler(spec, timing, point_count, size, rng, timeline)
    }

    /// Tear down the running timeline and start a new one, delay included
    fn restart(&mut self) {
        self.scheduler.cancel();
        self.scheduler = Timeline::neon(self.spec.delay, &self.timing);
        self.regenerate();
    }

    /// React to a new surface size
    ///
    /// Small changes are ignored. A meaningful change cancels the timeline and
    /// derives a fresh path right away.
    pub fn resize(&mut self, size: SurfaceSize) {
        if !self.size.differs_from(&size) {
            return;
        }
        log::debug!(
            "Line ({}) resized to {}x{}",
            self.spec.zone.as_str(),
            size.width,
            size.height
        );
        self.size = size;
        self.restart();
    }

    /// Move the line to another vertical zone
    pub fn set_zone(&mut self, zone: Zone) {
        if zone == self.spec.zone {
            return;
        }
        self.spec.zone = zone;
        self.restart();
    }
}

impl<S: Scheduler> NeonLine<S> {
    pub fn with_scheduler(
        spec: LineSpec,
        timing: TimingSettings,
        point_count: usize,
        size: SurfaceSize,
        rng: Pcg32,
        scheduler: S,
    ) -> Self {
        let mut line = Self {
            spec,
            timing,
            point_count,
            size,
            path: Path::empty(),
            scheduler,
            rng,
            generation: 0,
        };
        line.regenerate();
        line
    }

    /// Replace the path wholesale
    fn regenerate(&mut self) {
        self.path =
            path::generate_with_points(self.size, self.spec.zone, self.point_count, &mut self.rng);
        self.generation += 1;
    }

    /// Advance the timeline; a repeat swaps in a fresh path
    pub fn advance(&mut self, dt: f32) -> Advance {
        let advance = self.scheduler.advance(dt);
        if let Advance::Repeated(cycle) = advance {
            log::debug!("Line ({}) repeat, cycle {}", self.spec.zone.as_str(), cycle);
            self.regenerate();
        }
        advance
    }

    /// Current progress scalars
    pub fn state(&self) -> AnimationState {
        AnimationState::new(
            self.scheduler.value(Channel::Draw),
            self.scheduler.value(Channel::Erase),
        )
    }

    /// Stop the timeline; the line stays frozen until dropped
    pub fn teardown(&mut self) {
        self.scheduler.cancel();
    }

    pub fn is_active(&self) -> bool {
        self.scheduler.is_active()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn spec(&self) -> &LineSpec {
        &self.spec
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Number of paths generated so far (1 after construction)
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
