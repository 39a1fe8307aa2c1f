//! Render settings, loaded from an optional JSON file.

use anyhow::{Context, Result};
use lumen_renderer::{CameraConfig, RenderConfig, Vec3};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

/// Everything the `lumen` binary needs to produce an image.
///
/// Fields missing from the settings file keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub render: RenderConfig,
    /// Fields given here override the demo view one by one
    #[serde(deserialize_with = "camera_over_demo_view")]
    pub camera: CameraConfig,
    /// Seed for scene construction and rendering; the clock is used when absent
    pub seed: Option<u32>,
    /// Output PNG path
    pub output: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            camera: demo_camera(),
            seed: None,
            output: PathBuf::from("render.png"),
        }
    }
}

/// The demo scene's view: low over the sphere field, focused on its target.
fn demo_camera() -> CameraConfig {
    let look_from = Vec3::new(9.5, 2.0, 2.5);
    let look_at = Vec3::new(3.0, 0.5, 0.65);

    CameraConfig::default()
        .with_position(look_from, look_at, Vec3::Y)
        .with_lens(25.0, 0.01, (look_from - look_at).length())
        .with_aspect_ratio(RenderConfig::default().aspect_ratio())
}

/// Deserialize a camera object as a set of overrides on [`demo_camera`].
fn camera_over_demo_view<'de, D>(deserializer: D) -> std::result::Result<CameraConfig, D::Error>
where
    D: Deserializer<'de>,
{
    let overrides = serde_json::Value::deserialize(deserializer)?;
    let mut merged = serde_json::to_value(demo_camera()).map_err(D::Error::custom)?;

    match (&mut merged, overrides) {
        (serde_json::Value::Object(fields), serde_json::Value::Object(given)) => {
            fields.extend(given)
        }
        (_, other) => {
            return Err(D::Error::custom(format!(
                "camera must be an object, got {}",
                other
            )))
        }
    }

    serde_json::from_value(merged).map_err(D::Error::custom)
}

impl Settings {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Invalid settings file {}", path.display()))
    }

    /// Parse settings from a JSON string.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Camera matching the configured image shape.
    pub fn camera(&self) -> CameraConfig {
        self.camera.with_aspect_ratio(self.render.aspect_ratio())
    }
}
