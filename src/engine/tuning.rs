//
// Copyright 2025 Jeff Bush
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

// Data-driven game balance.
//
// Velocities are in pixels per nominal frame. A frame of `d_t` seconds moves
// an actor by `velocity * d_t * time_scale`, so with the default time scale
// of 125 a frame at 120 fps moves about one velocity unit.

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // Frame rate the frame loop is limited to
    pub target_fps: u32,
    // Multiplier converting `velocity * d_t` into pixels
    pub time_scale: f32,
    // Horizontal walking speed
    pub player_speed: f32,
    // Vertical velocity set by a jump (negative is up)
    pub jump_impulse: f32,
    // Added to vertical velocity each nominal frame while airborne
    pub gravity: f32,
    // Gravity stops accumulating past this fall speed
    pub max_fall_speed: f32,
    // Vertical velocity of a fast-fall
    pub dunk_speed: f32,
    // Ghost acceleration toward the player
    pub ghost_acceleration: f32,
    // Ghost speed cap
    pub ghost_max_speed: f32,
    // Seconds each animation frame is shown
    pub frame_time: f32,
    // Player sprite and collision box size
    pub player_size: (u32, u32),
    // Ghost sprite size
    pub ghost_size: (u32, u32),
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            target_fps: 120,
            time_scale: 125.0,
            player_speed: 3.0,
            jump_impulse: -6.5,
            gravity: 0.1,
            max_fall_speed: 10.0,
            dunk_speed: 12.0,
            ghost_acceleration: 0.04,
            ghost_max_speed: 1.6,
            frame_time: 0.1,
            player_size: (15 * 3, 17 * 3),
            ghost_size: (48, 48),
        }
    }
}

impl Tuning {
    // Read tuning overrides from a JSON file. Fields the file leaves out keep
    // their defaults; a missing file means all defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::info!("No tuning file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading tuning file {}", path.display()))?;
        let tuning = Self::from_json(&json)
            .with_context(|| format!("parsing tuning file {}", path.display()))?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn frame_duration(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "jump_impulse": -8.0, "target_fps": 60 }"#).unwrap();
        assert_eq!(tuning.jump_impulse, -8.0);
        assert_eq!(tuning.target_fps, 60);
        assert_eq!(tuning.gravity, Tuning::default().gravity);
        assert_eq!(tuning.player_size, (45, 51));
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Tuning::from_json("{ jump_impulse: ").is_err());
        assert!(Tuning::from_json(r#"{ "gravity": "heavy" }"#).is_err());
    }

    #[test]
    fn test_missing_file_is_default() {
        let tuning = Tuning::load(Path::new("/nonexistent/tuning.json")).unwrap();
        assert_eq!(tuning, Tuning::default());
    }

    #[test]
    fn test_round_trip_through_file() {
        let path = std::env::temp_dir().join(format!("tuning-{}.json", std::process::id()));
        let mut tuning = Tuning::default();
        tuning.ghost_max_speed = 2.5;
        std::fs::write(&path, serde_json::to_string(&tuning).unwrap()).unwrap();
        let loaded = Tuning::load(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, tuning);
    }

    #[test]
    fn test_frame_duration() {
        let tuning = Tuning {
            target_fps: 120,
            ..Default::default()
        };
        assert!((tuning.frame_duration() - 1.0 / 120.0).abs() < 1e-6);
    }
}
