use std::path::{Path, PathBuf};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use crate::error::{EngineError, Result};

/// Engine configuration. Every field has a default, so a config file only
/// needs to name what it changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Virtual screen width in pixels.
    pub screen_width: f32,
    /// Virtual screen height in pixels.
    pub screen_height: f32,
    /// Gravity in meters per second squared. The world is y-up, so downward
    /// gravity has a negative Y.
    pub gravity: Vec2,
    /// Path to the Aseprite sprite-atlas JSON.
    pub atlas_path: PathBuf,
    /// Directory that holds scene files.
    pub scenes_dir: PathBuf,
    /// Scene file the Play button loads, relative to `scenes_dir`.
    pub start_scene: String,
    /// Name of the object the play state steers with WASD.
    pub player_name: String,
    /// Player speed in pixels per second.
    pub player_speed: f32,
    /// Emit collider outlines into the frame buffer.
    pub debug_physics: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            screen_width: 800.0,
            screen_height: 600.0,
            gravity: Vec2::new(0.0, -10.0),
            atlas_path: PathBuf::from("assets/textures/sprites.json"),
            scenes_dir: PathBuf::from("scenes"),
            start_scene: "mainMenu.json".to_string(),
            player_name: "player".to_string(),
            player_speed: 200.0,
            debug_physics: false,
        }
    }
}

impl EngineConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| EngineError::io(path, e))?;
        Self::from_json(&text).map_err(|e| EngineError::json(path, e))
    }

    /// Full path of a scene file inside `scenes_dir`.
    pub fn scene_path(&self, name: &str) -> PathBuf {
        self.scenes_dir.join(name)
    }

    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width, self.screen_height)
    }
}
