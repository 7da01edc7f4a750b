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

use std::collections::HashMap;

use futures::future::join_all;
use macroquad::prelude::*;
use serde::Deserialize;
use serde_json::from_str;
use tracing::{info, warn};

use crate::graphics::{GraphicsError, TileSprite};
use crate::point::Point;
use crate::sprite::SpriteFactory;

/// One texture of the tileset as described in the manifest.
///
/// A texture is a sprite sheet of equally sized frames laid out in `columns`
/// columns. `variants` maps tile ids to frame numbers; ids without an entry use
/// frame 0.
#[derive(Clone, Debug, Deserialize)]
pub struct TextureDef {
    pub id: String,
    pub path: String,
    #[serde(default = "default_frame_size")]
    pub frame_width: f32,
    #[serde(default = "default_frame_size")]
    pub frame_height: f32,
    #[serde(default = "default_columns")]
    pub columns: u32,
    #[serde(default)]
    pub variants: HashMap<i32, u32>,
    /// Drawn as a plain diamond when the image could not be loaded.
    #[serde(default = "default_color")]
    pub color: [u8; 3],
}

fn default_frame_size() -> f32 {
    32.0
}

fn default_columns() -> u32 {
    1
}

fn default_color() -> [u8; 3] {
    [128, 128, 128]
}

impl TextureDef {
    pub fn frame_rect(&self, tile_index: i32) -> Rect {
        let frame = self.variants.get(&tile_index).copied().unwrap_or(0);
        let columns = self.columns.max(1);
        Rect::new(
            (frame % columns) as f32 * self.frame_width,
            (frame / columns) as f32 * self.frame_height,
            self.frame_width,
            self.frame_height,
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct TilesetManifest {
    pub textures: Vec<TextureDef>,
}

#[derive(Debug)]
struct TextureEntry {
    def: TextureDef,
    texture: Option<Texture2D>,
}

/// Texture cache keyed by texture id. This is the render context of
/// [`TileSprite`].
#[derive(Debug, Default)]
pub struct Tileset {
    entries: HashMap<String, TextureEntry>,
}

impl Tileset {
    /// Tileset with the manifest's definitions but no images yet.
    pub fn from_manifest(manifest: TilesetManifest) -> Self {
        let entries = manifest
            .textures
            .into_iter()
            .map(|def| (def.id.clone(), TextureEntry { def, texture: None }))
            .collect();
        Self { entries }
    }

    pub async fn load(manifest_path: &str) -> Result<Self, GraphicsError> {
        let file = load_string(manifest_path)
            .await
            .map_err(|e| GraphicsError::File {
                path: manifest_path.to_string(),
                message: e.to_string(),
            })?;
        let manifest: TilesetManifest = from_str(&file).map_err(|source| GraphicsError::Manifest {
            path: manifest_path.to_string(),
            source,
        })?;

        let mut tileset = Self::from_manifest(manifest);
        let loads = tileset.entries.values().map(|entry| {
            let id = entry.def.id.clone();
            let path = entry.def.path.clone();
            async move {
                match load_texture(&path).await {
                    Ok(texture) => {
                        texture.set_filter(FilterMode::Nearest);
                        Some((id, texture))
                    }
                    Err(e) => {
                        warn!(texture = %id, %path, error = %e, "texture not loaded, drawing placeholder");
                        None
                    }
                }
            }
        });

        let loaded: Vec<_> = join_all(loads).await.into_iter().flatten().collect();
        info!(textures = tileset.entries.len(), loaded = loaded.len(), "tileset loaded");
        for (id, texture) in loaded {
            if let Some(entry) = tileset.entries.get_mut(&id) {
                entry.texture = Some(texture);
            }
        }
        Ok(tileset)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn definition(&self, id: &str) -> Option<&TextureDef> {
        self.entries.get(id).map(|entry| &entry.def)
    }

    /// Loaded image and source rectangle for `tile_index` of texture `id`.
    pub fn frame(&self, id: &str, tile_index: i32) -> Option<(&Texture2D, Rect)> {
        let entry = self.entries.get(id)?;
        let texture = entry.texture.as_ref()?;
        Some((texture, entry.def.frame_rect(tile_index)))
    }

    pub fn placeholder_color(&self, id: &str) -> Color {
        let [r, g, b] = self.definition(id).map(|def| def.color).unwrap_or_else(default_color);
        Color::from_rgba(r, g, b, 255)
    }
}

impl SpriteFactory for Tileset {
    type Sprite = TileSprite;

    fn create(&mut self, texture: &str, position: Point) -> TileSprite {
        if !self.contains(texture) {
            warn!(texture, "sprite uses a texture missing from the tileset");
        }
        TileSprite::new(texture, position)
    }
}
