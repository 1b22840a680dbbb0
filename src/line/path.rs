//! Randomized neon line paths
//!
//! A path is a left-to-right polyline with one or two bends ("breaks").
//! World coordinates are centered on the surface with y pointing up, and
//! the line starts and ends just off-screen.

use std::str::FromStr;

use glam::Vec2;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::BackdropError;

/// Uniform random source in [0, 1)
///
/// Every `rand` generator qualifies, so a seeded `Pcg32` can be passed in
/// directly. Tests can feed fixed sequences.
pub trait UnitRandom {
    fn next_unit(&mut self) -> f32;
}

impl<R: RngCore> UnitRandom for R {
    #[inline]
    fn next_unit(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Vertical band a line starts in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    Top,
    #[default]
    Middle,
    Bottom,
}

impl Zone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Top => "top",
            Zone::Middle => "middle",
            Zone::Bottom => "bottom",
        }
    }

    /// Draw a starting height for this zone
    pub fn start_y<R: UnitRandom + ?Sized>(&self, height: f32, rng: &mut R) -> f32 {
        let u = rng.next_unit();
        match self {
            Zone::Top => (u * 0.3 + 0.1) * height,
            Zone::Bottom => -(u * 0.3 + 0.1) * height,
            Zone::Middle => (u * 0.6 - 0.3) * height,
        }
    }
}

impl FromStr for Zone {
    type Err = BackdropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "top" => Ok(Zone::Top),
            "middle" | "mid" => Ok(Zone::Middle),
            "bottom" => Ok(Zone::Bottom),
            _ => Err(BackdropError::invalid_zone(s)),
        }
    }
}

/// Drawing surface dimensions in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    /// Degenerate extents (zero, negative, NaN) are raised to `MIN_SURFACE_EXTENT`
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(MIN_SURFACE_EXTENT),
            height: height.max(MIN_SURFACE_EXTENT),
        }
    }

    /// Off-screen overshoot on each side
    #[inline]
    pub fn margin(&self) -> f32 {
        self.width * MARGIN_FRACTION
    }

    /// Allowed y range after clamping
    ///
    /// Collapses to the center line when the margin exceeds half the height.
    pub fn y_bounds(&self) -> (f32, f32) {
        let lo = -self.height / 2.0 + self.margin();
        let hi = self.height / 2.0 - self.margin();
        if lo > hi { (0.0, 0.0) } else { (lo, hi) }
    }

    /// Clamp a y value into `y_bounds`
    #[inline]
    pub fn clamp_y(&self, y: f32) -> f32 {
        let (lo, hi) = self.y_bounds();
        y.clamp(lo, hi)
    }

    /// Whether `other` is different enough to warrant a new path
    pub fn differs_from(&self, other: &SurfaceSize) -> bool {
        (self.width - other.width).abs() > RESIZE_EPSILON
            || (self.height - other.height).abs() > RESIZE_EPSILON
    }
}

/// A bend in the path, used only during generation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Break {
    /// Normalized position where the bend begins
    pub position: f32,
    /// Signed vertical offset reached at the end of the ramp
    pub size: f32,
}

impl Break {
    /// Vertical offset contributed at normalized position `t`
    #[inline]
    pub fn offset_at(&self, t: f32) -> f32 {
        if t <= self.position {
            0.0
        } else if t >= self.position + BREAK_RAMP {
            self.size
        } else {
            self.size * (t - self.position) / BREAK_RAMP
        }
    }
}

/// Draw 1-2 breaks, sorted by position
///
/// Base positions are evenly spaced over (0.1, 0.9) and jittered by up to 0.1.
pub fn generate_breaks<R: UnitRandom + ?Sized>(width: f32, rng: &mut R) -> Vec<Break> {
    let count = ((rng.next_unit() * 2.0) as usize).min(1) + 1;

    let mut positions: Vec<f32> = (0..count)
        .map(|i| 0.1 + (0.8 / count as f32) * i as f32 + rng.next_unit() * 0.1)
        .collect();
    positions.sort_by(|a, b| a.total_cmp(b));

    positions
        .into_iter()
        .map(|position| {
            let direction = if rng.next_unit() > 0.5 { 1.0 } else { -1.0 };
            let size = width * (0.05 + rng.next_unit() * 0.15) * direction;
            Break { position, size }
        })
        .collect()
}

/// An immutable generated polyline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Path {
    pub points: Vec<Vec2>,
}

impl Path {
    /// Placeholder before the first generation
    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Flat xyz buffer (z = 0) for vertex upload
    pub fn positions(&self) -> Vec<f32> {
        self.points.iter().flat_map(|p| [p.x, p.y, 0.0]).collect()
    }

    /// Normalized position of point `index`
    #[inline]
    pub fn param(&self, index: usize) -> f32 {
        normalized_param(index, self.points.len())
    }
}

/// `index / (count - 1)`, 0 for single-point paths
#[inline]
pub fn normalized_param(index: usize, count: usize) -> f32 {
    if count < 2 {
        0.0
    } else {
        index as f32 / (count - 1) as f32
    }
}

/// Generate a path with the default point count
pub fn generate<R: UnitRandom + ?Sized>(size: SurfaceSize, zone: Zone, rng: &mut R) -> Path {
    generate_with_points(size, zone, PATH_POINTS, rng)
}

/// Generate a path with `num_points` samples (at least 2)
pub fn generate_with_points<R: UnitRandom + ?Sized>(
    size: SurfaceSize,
    zone: Zone,
    num_points: usize,
    rng: &mut R,
) -> Path {
    let num_points = num_points.max(2);
    let start_y = zone.start_y(size.height, rng);
    let breaks = generate_breaks(size.width, rng);

    let margin = size.margin();
    let full_width = size.width + margin * 2.0;
    let left = -size.width / 2.0 - margin;

    let points = (0..num_points)
        .map(|i| {
            let t = normalized_param(i, num_points);
            let y = breaks.iter().fold(start_y, |y, b| y + b.offset_at(t));
            Vec2::new(left + t * full_width, size.clamp_y(y))
        })
        .collect();

    Path { points }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::UnitRandom;

    /// Replays a fixed list of unit values, cycling when exhausted
    pub struct FixedUnits {
        values: Vec<f32>,
        index: usize,
    }

    impl FixedUnits {
        pub fn new(values: &[f32]) -> Self {
            Self {
                values: values.to_vec(),
                index: 0,
            }
        }
    }

    impl UnitRandom for FixedUnits {
        fn next_unit(&mut self) -> f32 {
            let v = self.values[self.index % self.values.len()];
            self.index += 1;
            v
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::FixedUnits;
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_golden_middle_path() {
        // start, count, jitter x2, (direction, size) x2
        let mut rng = FixedUnits::new(&[0.25, 0.75, 0.0, 0.5, 0.9, 0.2, 0.1, 0.6]);
        let size = SurfaceSize::new(1000.0, 800.0);
        let path = generate(size, Zone::Middle, &mut rng);

        assert_eq!(path.len(), PATH_POINTS);
        let first = path.points[0];
        let last = path.points[PATH_POINTS - 1];
        assert!((first.x + 550.0).abs() < 1e-3);
        assert!((last.x - 550.0).abs() < 1e-3);

        // start_y = (0.25 * 0.6 - 0.3) * 800
        assert!((first.y + 120.0).abs() < 1e-3);
        // +80 at 0.1 (full by 0.3), -140 at 0.55 (full by 0.75)
        let mid = path.points[99];
        assert!((mid.y + 40.0).abs() < 1e-3, "mid y = {}", mid.y);
        assert!((last.y + 180.0).abs() < 1e-3, "last y = {}", last.y);
    }

    #[test]
    fn test_golden_breaks() {
        let mut rng = FixedUnits::new(&[0.75, 0.0, 0.5, 0.9, 0.2, 0.1, 0.6]);
        let breaks = generate_breaks(1000.0, &mut rng);
        assert_eq!(breaks.len(), 2);
        assert!((breaks[0].position - 0.1).abs() < 1e-6);
        assert!((breaks[1].position - 0.55).abs() < 1e-6);
        assert!((breaks[0].size - 80.0).abs() < 1e-3);
        assert!((breaks[1].size + 140.0).abs() < 1e-3);
    }

    #[test]
    fn test_single_break_when_count_draw_low() {
        let mut rng = FixedUnits::new(&[0.2, 0.5, 0.9, 0.0]);
        let breaks = generate_breaks(500.0, &mut rng);
        assert_eq!(breaks.len(), 1);
        assert!((breaks[0].position - 0.15).abs() < 1e-6);
        assert!((breaks[0].size - 25.0).abs() < 1e-3);
    }

    #[test]
    fn test_break_ramp() {
        let b = Break {
            position: 0.5,
            size: 10.0,
        };
        assert_eq!(b.offset_at(0.4), 0.0);
        assert_eq!(b.offset_at(0.5), 0.0);
        assert!((b.offset_at(0.6) - 5.0).abs() < 1e-4);
        assert!((b.offset_at(0.7) - 10.0).abs() < 1e-4);
        assert_eq!(b.offset_at(0.71), 10.0);
        assert_eq!(b.offset_at(1.0), 10.0);
    }

    #[test]
    fn test_break_holds_full_size_after_ramp() {
        // Past the ramp the offset is the exact size
        let b = Break {
            position: 0.1,
            size: -140.0,
        };
        for t in [0.31, 0.5, 0.75, 1.0] {
            assert_eq!(b.offset_at(t), -140.0);
        }
    }

    #[test]
    fn test_degenerate_surface_is_clamped() {
        let size = SurfaceSize::new(0.0, -5.0);
        assert_eq!(size.width, MIN_SURFACE_EXTENT);
        assert_eq!(size.height, MIN_SURFACE_EXTENT);

        let nan = SurfaceSize::new(f32::NAN, 10.0);
        assert_eq!(nan.width, MIN_SURFACE_EXTENT);

        let mut rng = Pcg32::seed_from_u64(7);
        let path = generate(size, Zone::Top, &mut rng);
        assert_eq!(path.len(), PATH_POINTS);
        assert!(path.points.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn test_wide_short_surface_collapses_bounds() {
        // margin 50 exceeds half height 20
        let size = SurfaceSize::new(1000.0, 40.0);
        assert_eq!(size.y_bounds(), (0.0, 0.0));
        let mut rng = Pcg32::seed_from_u64(3);
        let path = generate(size, Zone::Bottom, &mut rng);
        assert!(path.points.iter().all(|p| p.y == 0.0));
    }

    #[test]
    fn test_positions_buffer() {
        let path = Path {
            points: vec![Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)],
        };
        assert_eq!(path.positions(), vec![1.0, 2.0, 0.0, 3.0, 4.0, 0.0]);
        assert_eq!(path.param(0), 0.0);
        assert_eq!(path.param(1), 1.0);
    }

    #[test]
    fn test_differs_from() {
        let a = SurfaceSize::new(800.0, 600.0);
        assert!(!a.differs_from(&SurfaceSize::new(800.2, 600.0)));
        assert!(a.differs_from(&SurfaceSize::new(801.0, 600.0)));
        assert!(a.differs_from(&SurfaceSize::new(800.0, 500.0)));
    }

    #[test]
    fn test_zone_parse() {
        assert_eq!("TOP".parse::<Zone>().unwrap(), Zone::Top);
        assert_eq!(" bottom ".parse::<Zone>().unwrap(), Zone::Bottom);
        assert!(matches!(
            "sideways".parse::<Zone>(),
            Err(BackdropError::InvalidZone(_))
        ));
        for zone in [Zone::Top, Zone::Middle, Zone::Bottom] {
            assert_eq!(zone.as_str().parse::<Zone>().unwrap(), zone);
        }
    }

    #[test]
    fn test_same_seed_same_path() {
        let size = SurfaceSize::new(1280.0, 720.0);
        let a = generate(size, Zone::Middle, &mut Pcg32::seed_from_u64(42));
        let b = generate(size, Zone::Middle, &mut Pcg32::seed_from_u64(42));
        assert_eq!(a, b);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn any_zone() -> impl Strategy<Value = Zone> {
        prop_oneof![Just(Zone::Top), Just(Zone::Middle), Just(Zone::Bottom)]
    }

    proptest! {
        #[test]
        fn path_shape_holds(
            seed in any::<u64>(),
            width in 50.0f32..4000.0,
            height in 50.0f32..4000.0,
            zone in any_zone(),
        ) {
            let size = SurfaceSize::new(width, height);
            let path = generate(size, zone, &mut Pcg32::seed_from_u64(seed));
            let (lo, hi) = size.y_bounds();

            prop_assert_eq!(path.len(), PATH_POINTS);
            for pair in path.points.windows(2) {
                prop_assert!(pair[1].x > pair[0].x);
            }
            for p in &path.points {
                prop_assert!(p.y >= lo && p.y <= hi);
            }
            prop_assert!(path.points[0].x < -width / 2.0);
            prop_assert!(path.points[PATH_POINTS - 1].x > width / 2.0);
        }

        #[test]
        fn start_band_matches_zone(seed in any::<u64>(), height in 10.0f32..4000.0) {
            let mut rng = Pcg32::seed_from_u64(seed);
            prop_assert!(Zone::Top.start_y(height, &mut rng) > 0.0);
            prop_assert!(Zone::Bottom.start_y(height, &mut rng) < 0.0);
            let mid = Zone::Middle.start_y(height, &mut rng);
            prop_assert!(mid >= -0.3 * height && mid <= 0.3 * height);
        }

        #[test]
        fn clamp_is_idempotent(
            width in 1.0f32..4000.0,
            height in 1.0f32..4000.0,
            y in -10000.0f32..10000.0,
        ) {
            let size = SurfaceSize::new(width, height);
            let once = size.clamp_y(y);
            prop_assert_eq!(size.clamp_y(once), once);
        }

        #[test]
        fn breaks_are_sorted(seed in any::<u64>(), width in 1.0f32..4000.0) {
            let breaks = generate_breaks(width, &mut Pcg32::seed_from_u64(seed));
            prop_assert!(!breaks.is_empty() && breaks.len() <= 2);
            for pair in breaks.windows(2) {
                prop_assert!(pair[0].position <= pair[1].position);
            }
            for b in &breaks {
                prop_assert!(b.position > 0.0 && b.position < 1.0);
                let magnitude = b.size.abs();
                // width * (0.05 + U * 0.15), as the stock backdrop draws it
                prop_assert!(magnitude >= width * 0.05 - 1e-3);
                prop_assert!(magnitude <= width * 0.2 + 1e-3);
            }
        }
    }
}
