// SPDX-License-Identifier: MIT
//
// Copyright (c) 2025 Alexandre Severino
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::{error, info};

use crate::map::Layers;
use crate::point::Point;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Clone, Debug, Deserialize)]
pub struct Settings {
    pub window: WindowSettings,
    pub map: MapSettings,
    pub camera: CameraSettings,
    pub layers: LayerSettings,
    pub assets: AssetSettings,
}

#[derive(Clone, Debug, Deserialize)]
pub struct WindowSettings {
    pub title: String,
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct MapSettings {
    pub width: i32,
    pub height: i32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CameraSettings {
    pub zoom: f32,
    /// Iso coordinate to center on at startup.
    pub center: Option<[i32; 2]>,
}

impl CameraSettings {
    pub fn center_point(&self) -> Option<Point> {
        self.center.map(|[x, y]| Point::new(x, y))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct LayerSettings {
    pub floor: bool,
    pub grid: bool,
    pub buildings: bool,
}

impl LayerSettings {
    pub fn layers(&self) -> Layers {
        let mut layers = Layers::empty();
        layers.set(Layers::FLOOR, self.floor);
        layers.set(Layers::GRID, self.grid);
        layers.set(Layers::BUILDINGS, self.buildings);
        layers
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct AssetSettings {
    pub tileset: String,
    pub heightmap: Option<String>,
}

/// Reads settings from `path` (optional) on top of built-in defaults, then
/// applies `ISOCITY_*` environment overrides, e.g. `ISOCITY_MAP__WIDTH=64`.
pub fn load_settings(path: &str) -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", path);

    let settings = Config::builder()
        .set_default("window.title", "isocity")?
        .set_default("window.width", 1280)?
        .set_default("window.height", 720)?
        .set_default("map.width", 32)?
        .set_default("map.height", 32)?
        .set_default("camera.zoom", 1.0)?
        .set_default("layers.floor", true)?
        .set_default("layers.grid", false)?
        .set_default("layers.buildings", true)?
        .set_default("assets.tileset", "assets/tileset.json")?
        .add_source(File::new(path, FileFormat::Toml).required(false))
        .add_source(Environment::with_prefix("ISOCITY").prefix_separator("_").separator("__"))
        .build()
        .and_then(|config| config.try_deserialize::<Settings>());

    match settings {
        Ok(settings) => {
            info!("Successfully loaded configuration: {:?}", settings);
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_apply_without_a_file() {
        let settings = load_settings("does/not/exist.toml").unwrap();
        assert_eq!(settings.map.width, 32);
        assert_eq!(settings.camera.zoom, 1.0);
        assert_eq!(settings.layers.layers(), Layers::default());
        assert!(settings.assets.heightmap.is_none());
        assert!(settings.camera.center_point().is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[map]
width = 16
height = 12

[camera]
zoom = 2.0
center = [8, 6]

[layers]
grid = true
floor = false

[assets]
tileset = "custom.json"
heightmap = "maps/demo.json"
"#
        )
        .unwrap();

        let settings = load_settings(file.path().to_str().unwrap()).unwrap();
        assert_eq!((settings.map.width, settings.map.height), (16, 12));
        assert_eq!(settings.camera.center_point(), Some(Point::new(8, 6)));
        assert_eq!(settings.layers.layers(), Layers::GRID | Layers::BUILDINGS);
        assert_eq!(settings.assets.heightmap.as_deref(), Some("maps/demo.json"));
        assert_eq!(settings.window.title, "isocity");
    }

    #[test]
    fn malformed_values_are_reported() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(file, "[map]\nwidth = \"wide\"").unwrap();
        assert!(load_settings(file.path().to_str().unwrap()).is_err());
    }
}
