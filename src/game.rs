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

use anyhow::{Context, anyhow};
use macroquad::prelude::*;
use tracing::{error, info};

use isocity::config::Settings;
use isocity::graphics::{TileSprite, Tileset};
use isocity::map::map_data::MapData;
use isocity::map::{Layers, Map};
use isocity::point::Point;

const BACKGROUND: Color = Color::new(0.08, 0.09, 0.12, 1.0);
const DEMO_BUILDING: (&str, Point) = ("house", Point::new(1, 1));

async fn setup(settings: &Settings) -> anyhow::Result<(Map<TileSprite>, Tileset)> {
    let mut tileset = Tileset::load(&settings.assets.tileset)
        .await
        .with_context(|| format!("loading tileset {}", settings.assets.tileset))?;

    let screen = (screen_width() as i32, screen_height() as i32);
    let mut map = Map::new(settings.map.width, settings.map.height, screen, &mut tileset)?;

    if let Some(path) = &settings.assets.heightmap {
        let json = load_string(path)
            .await
            .map_err(|e| anyhow!("failed to read {path}: {e}"))?;
        map.apply_heights(&MapData::from_json(&json)?)?;
    }

    let (texture, pos) = DEMO_BUILDING;
    if tileset.contains(texture) && map.check_boundaries(pos) {
        map.place_building(pos, texture, &mut tileset)?;
    }

    map.set_zoom_level(settings.camera.zoom)?;
    map.disable_layer(Layers::all());
    map.enable_layer(settings.layers.layers());

    let center = settings
        .camera
        .center_point()
        .unwrap_or_else(|| Point::new(map.width() / 2, map.height() / 2));
    map.center_screen_on_point(center);

    Ok((map, tileset))
}

pub async fn run(settings: Settings) {
    let (map, mut tileset) = match setup(&settings).await {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("Failed to set up the map: {:#}", e);
            return;
        }
    };
    info!(layers = ?map.active_layers(), zoom = map.zoom_level(), "rendering map");

    loop {
        clear_background(BACKGROUND);
        map.render(&mut tileset);
        next_frame().await;
    }
}
