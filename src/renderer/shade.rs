//! Per-point line shading
//!
//! Recomputed from scratch every display refresh. The only inputs are the
//! path length and the two progress scalars, so stale-but-valid scalars are
//! always safe to render.

use serde::{Deserialize, Serialize};

use crate::blend_to_white;
use crate::consts::{HEAD_ERASE_CUTOFF, HEAD_SIZE};
use crate::line::path::{Path, normalized_param};
use crate::line::state::AnimationState;

/// RGBA for a hidden point
pub const INVISIBLE: [f32; 4] = [0.0, 0.0, 0.0, 0.0];

/// Cyan (#00ffff)
pub const NEON_CYAN: [f32; 3] = [0.0, 1.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineStyle {
    /// Linear RGB base color
    pub base_color: [f32; 3],
    /// Half-width of the bright head around the draw front
    pub head_size: f32,
    /// Head is only drawn while erase progress is below this
    pub head_erase_cutoff: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            base_color: NEON_CYAN,
            head_size: HEAD_SIZE,
            head_erase_cutoff: HEAD_ERASE_CUTOFF,
        }
    }
}

/// Color and opacity of the point at normalized position `t`
pub fn shade_point(t: f32, state: &AnimationState, style: &LineStyle) -> [f32; 4] {
    if !state.is_visible(t) {
        return INVISIBLE;
    }

    let head_distance = (t - state.draw_progress).abs();
    let near_head = style.head_size > 0.0
        && head_distance < style.head_size
        && state.erase_progress < style.head_erase_cutoff;

    let [r, g, b] = if near_head {
        blend_to_white(style.base_color, 1.0 - head_distance / style.head_size)
    } else {
        style.base_color
    };
    [r, g, b, 1.0]
}

/// Fresh RGBA buffer for `point_count` evenly spaced points
pub fn shade(point_count: usize, state: &AnimationState, style: &LineStyle) -> Vec<[f32; 4]> {
    (0..point_count)
        .map(|i| shade_point(normalized_param(i, point_count), state, style))
        .collect()
}

/// Shade a generated path; an empty path yields an empty buffer
pub fn shade_path(path: &Path, state: &AnimationState, style: &LineStyle) -> Vec<[f32; 4]> {
    shade(path.len(), state, style)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn visibility_matches_window(
            draw in 0.0f32..=1.0,
            erase in 0.0f32..=1.1,
            t in 0.0f32..=1.0,
        ) {
            let state = AnimationState::new(draw, erase);
            let c = shade_point(t, &state, &LineStyle::default());
            let visible = draw > 0.0 && erase <= t && t <= draw;
            prop_assert_eq!(c[3] == 1.0, visible);
            if !visible {
                prop_assert_eq!(c, INVISIBLE);
            }
        }

        #[test]
        fn head_only_inside_window(
            draw in 0.0f32..=1.0,
            erase in 0.0f32..=1.1,
            t in 0.0f32..=1.0,
        ) {
            let style = LineStyle::default();
            let state = AnimationState::new(draw, erase);
            let c = shade_point(t, &state, &style);
            let in_head = erase < 0.1 && (t - draw).abs() < 0.03;
            if c[3] == 1.0 && !in_head {
                prop_assert_eq!(c, [0.0, 1.0, 1.0, 1.0]);
            }
            if c[3] == 1.0 {
                prop_assert!(c[0] >= 0.0 && c[0] <= 1.0);
            }
        }
    }
}
