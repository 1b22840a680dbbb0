//! The field of concurrently animated lines

use rand_pcg::Pcg32;

use super::path::{SurfaceSize, Zone};
use super::state::NeonLine;
use super::timeline::Advance;
use crate::error::BackdropResult;
use crate::renderer::shade::{LineStyle, shade_path};
use crate::renderer::shapes::line_strip;
use crate::renderer::vertex::Vertex;
use crate::settings::Settings;

pub struct Backdrop {
    lines: Vec<NeonLine>,
    size: SurfaceSize,
    style: LineStyle,
    line_width: f32,
}

impl Backdrop {
    /// Build one line per configured `LineSpec`
    ///
    /// Every line draws from its own PCG stream of `seed`.
    pub fn new(settings: &Settings, size: SurfaceSize, seed: u64) -> BackdropResult<Self> {
        let settings = settings.validated();
        let style = settings.line_style()?;

        let lines = settings
            .lines
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                NeonLine::new(
                    *spec,
                    settings.timing,
                    settings.point_count,
                    size,
                    Pcg32::new(seed, index as u64),
                )
            })
            .collect::<Vec<_>>();

        log::info!(
            "Backdrop created: {} lines, {}x{}, seed {}",
            lines.len(),
            size.width,
            size.height,
            seed
        );

        Ok(Self {
            lines,
            size,
            style,
            line_width: settings.line_width,
        })
    }

    /// Advance every line's timeline; returns how many lines repeated
    pub fn advance(&mut self, dt: f32) -> usize {
        let mut repeated = 0;
        for line in &mut self.lines {
            if let Advance::Repeated(_) = line.advance(dt) {
                repeated += 1;
            }
        }
        repeated
    }

    pub fn resize(&mut self, size: SurfaceSize) {
        if !self.size.differs_from(&size) {
            return;
        }
        log::info!("Backdrop resized to {}x{}", size.width, size.height);
        self.size = size;
        for line in &mut self.lines {
            line.resize(size);
        }
    }

    /// Move line `index` to another zone; false if there is no such line
    pub fn set_zone(&mut self, index: usize, zone: Zone) -> bool {
        match self.lines.get_mut(index) {
            Some(line) => {
                line.set_zone(zone);
                true
            }
            None => false,
        }
    }

    /// Cancel every timeline
    pub fn teardown(&mut self) {
        for line in &mut self.lines {
            line.teardown();
        }
        log::info!("Backdrop torn down");
    }

    pub fn is_active(&self) -> bool {
        self.lines.iter().any(NeonLine::is_active)
    }

    pub fn lines(&self) -> &[NeonLine] {
        &self.lines
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn style(&self) -> &LineStyle {
        &self.style
    }

    /// Shade and tessellate every line for the current frame
    pub fn frame_vertices(&self) -> Vec<Vertex> {
        let mut vertices = Vec::new();
        for line in &self.lines {
            let colors = shade_path(line.path(), &line.state(), &self.style);
            vertices.extend(line_strip(&line.path().points, &colors, self.line_width));
        }
        vertices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backdrop() -> Backdrop {
        Backdrop::new(&Settings::default(), SurfaceSize::new(1000.0, 800.0), 1234).unwrap()
    }

    #[test]
    fn test_default_lines_are_staggered() {
        let b = backdrop();
        let specs: Vec<_> = b.lines().iter().map(|l| *l.spec()).collect();
        assert_eq!(specs.len(), 3);
        assert_eq!((specs[0].delay, specs[0].zone), (0.0, Zone::Middle));
        assert_eq!((specs[1].delay, specs[1].zone), (3.0, Zone::Top));
        assert_eq!((specs[2].delay, specs[2].zone), (6.0, Zone::Bottom));
    }

    #[test]
    fn test_lines_do_not_share_rng() {
        let b = backdrop();
        assert_ne!(b.lines()[0].path(), b.lines()[1].path());
    }

    #[test]
    fn test_nothing_drawn_at_start() {
        let b = backdrop();
        assert!(b.frame_vertices().is_empty());
    }

    #[test]
    fn test_only_started_lines_draw() {
        let mut b = backdrop();
        b.advance(1.0);
        let first = b.frame_vertices();
        assert!(!first.is_empty());

        // Line 2 starts at t = 3
        b.advance(2.5);
        let states: Vec<_> = b.lines().iter().map(|l| l.state()).collect();
        assert!(states[1].draw_progress > 0.0);
        assert_eq!(states[2].draw_progress, 0.0);
    }

    #[test]
    fn test_repeats_are_counted() {
        let mut b = backdrop();
        assert_eq!(b.advance(5.0), 1);
    }

    #[test]
    fn test_teardown_cancels_all() {
        let mut b = backdrop();
        assert!(b.is_active());
        b.teardown();
        assert!(!b.is_active());
        assert_eq!(b.advance(50.0), 0);
    }

    #[test]
    fn test_resize_propagates() {
        let mut b = backdrop();
        b.resize(SurfaceSize::new(400.0, 300.0));
        assert_eq!(b.size(), SurfaceSize::new(400.0, 300.0));
        assert!(b.lines().iter().all(|l| l.size() == SurfaceSize::new(400.0, 300.0)));
        assert!(b.lines().iter().all(|l| l.generation() == 2));
    }

    #[test]
    fn test_set_zone_by_index() {
        let mut b = backdrop();
        assert!(b.set_zone(1, Zone::Bottom));
        assert_eq!(b.lines()[1].spec().zone, Zone::Bottom);
        assert_eq!(b.lines()[1].generation(), 2);
        assert_eq!(b.lines()[0].generation(), 1);
        assert!(!b.set_zone(7, Zone::Top));
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let settings = Settings {
            neon_color: "cyan-ish".into(),
            ..Settings::default()
        };
        assert!(Backdrop::new(&settings, SurfaceSize::new(10.0, 10.0), 0).is_err());
    }
}
