//! TOML configuration for the diagram tool.
//!
//! Every section and field is optional:
//! ```toml
//! [physics]
//! speed_of_light = "exact"
//!
//! [view]
//! width = 750
//! height = 500
//! pixels_per_unit = 25
//! light_cone = true
//! labels = true
//!
//! [files]
//! diagram = "twins.diagram"
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::relativity::SpeedOfLight;
use crate::render::DiagramView;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub files: FilesConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct PhysicsConfig {
    #[serde(default)]
    pub speed_of_light: SpeedOfLight,
}

/// Drawing-area settings.
#[derive(Debug, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default = "default_height")]
    pub height: f64,
    #[serde(default = "default_pixels_per_unit")]
    pub pixels_per_unit: f64,
    #[serde(default)]
    pub light_cone: bool,
    #[serde(default = "default_true")]
    pub labels: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            pixels_per_unit: default_pixels_per_unit(),
            light_cone: false,
            labels: true,
        }
    }
}

impl From<&ViewConfig> for DiagramView {
    fn from(view: &ViewConfig) -> Self {
        DiagramView {
            width: view.width,
            height: view.height,
            pixels_per_unit: view.pixels_per_unit,
            light_cone: view.light_cone,
            labels: view.labels,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FilesConfig {
    /// Diagram opened when no file is given on the command line.
    pub diagram: Option<PathBuf>,
}

fn default_width() -> f64 {
    750.0
}
fn default_height() -> f64 {
    500.0
}
fn default_pixels_per_unit() -> f64 {
    25.0
}
fn default_true() -> bool {
    true
}

/// Load and parse a TOML configuration file.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("parsing config {}", path.display()))?;
    log::debug!("loaded config from {}: {config:?}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.physics.speed_of_light, SpeedOfLight::Normalized);
        assert_eq!(DiagramView::from(&config.view), DiagramView::default());
        assert!(config.files.diagram.is_none());
    }

    #[test]
    fn test_partial_config() {
        let config: Config = toml::from_str(
            r#"
            [physics]
            speed_of_light = "exact"

            [view]
            light_cone = true
            pixels_per_unit = 10

            [files]
            diagram = "twins.diagram"
            "#,
        )
        .unwrap();
        assert_eq!(config.physics.speed_of_light, SpeedOfLight::Exact);
        assert!(config.view.light_cone);
        assert!(config.view.labels);
        assert_eq!(config.view.pixels_per_unit, 10.0);
        assert_eq!(config.view.width, 750.0);
        assert_eq!(config.files.diagram.as_deref(), Some(Path::new("twins.diagram")));
    }

    #[test]
    fn test_unknown_speed_of_light_is_rejected() {
        assert!(toml::from_str::<Config>("[physics]\nspeed_of_light = \"warp\"\n").is_err());
    }
}
