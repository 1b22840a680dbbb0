//! Backdrop settings
//!
//! Persisted in LocalStorage on the web; defaults reproduce the stock
//! three-line cyan backdrop.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{BackdropError, BackdropResult};
use crate::line::{Ease, Zone};
use crate::renderer::shade::LineStyle;

/// One animated line: when it first appears and where it starts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSpec {
    /// Initial start delay (seconds)
    pub delay: f32,
    pub zone: Zone,
}

/// Phase timing shared by every line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    pub draw_duration: f32,
    /// Delay from draw start to erase start
    pub hold: f32,
    pub erase_duration: f32,
    pub erase_target: f32,
    /// Pause between cycles
    pub repeat_delay: f32,
    pub ease: Ease,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            draw_duration: DRAW_DURATION,
            hold: ERASE_HOLD,
            erase_duration: ERASE_DURATION,
            erase_target: ERASE_TARGET,
            repeat_delay: REPEAT_DELAY,
            ease: Ease::default(),
        }
    }
}

/// Backdrop settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub lines: Vec<LineSpec>,
    /// Hex line color
    pub neon_color: String,
    /// Hex clear color
    pub background: String,
    /// Line thickness in world units
    pub line_width: f32,
    /// Samples per path
    pub point_count: usize,
    /// Head highlight half-width (normalized length)
    pub head_size: f32,
    pub timing: TimingSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lines: vec![
                LineSpec {
                    delay: 0.0,
                    zone: Zone::Middle,
                },
                LineSpec {
                    delay: 3.0,
                    zone: Zone::Top,
                },
                LineSpec {
                    delay: 6.0,
                    zone: Zone::Bottom,
                },
            ],
            neon_color: "#00ffff".to_string(),
            background: "#1a1a1a".to_string(),
            line_width: 3.0,
            point_count: PATH_POINTS,
            head_size: HEAD_SIZE,
            timing: TimingSettings::default(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "neon_backdrop_settings";

    pub fn from_json(json: &str) -> BackdropResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> BackdropResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Copy with out-of-range values pulled back into range
    pub fn validated(&self) -> Self {
        let mut s = self.clone();
        for line in &mut s.lines {
            line.delay = line.delay.max(0.0);
        }
        s.line_width = s.line_width.max(0.0);
        s.point_count = s.point_count.max(2);
        s.head_size = s.head_size.clamp(0.0, 1.0);
        s.timing.draw_duration = s.timing.draw_duration.max(0.0);
        s.timing.hold = s.timing.hold.max(0.0);
        s.timing.erase_duration = s.timing.erase_duration.max(0.0);
        s.timing.repeat_delay = s.timing.repeat_delay.max(0.0);
        s
    }

    /// Shading style from the configured color and head size
    pub fn line_style(&self) -> BackdropResult<LineStyle> {
        Ok(LineStyle {
            base_color: parse_hex_color(&self.neon_color)?,
            head_size: self.head_size,
            head_erase_cutoff: HEAD_ERASE_CUTOFF,
        })
    }

    pub fn background_color(&self) -> BackdropResult<[f32; 3]> {
        parse_hex_color(&self.background)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = self.to_json() {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Parse `#rgb` or `#rrggbb` into RGB in [0, 1]
pub fn parse_hex_color(s: &str) -> BackdropResult<[f32; 3]> {
    let hex = s.trim().trim_start_matches('#');
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return Err(BackdropError::invalid_color(s)),
    };

    let channel = |i: usize| {
        expanded
            .get(i..i + 2)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .map(|v| v as f32 / 255.0)
            .ok_or_else(|| BackdropError::invalid_color(s))
    };

    Ok([channel(0)?, channel(2)?, channel(4)?])
}
