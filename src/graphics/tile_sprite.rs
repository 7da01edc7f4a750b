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

use macroquad::prelude::*;

use crate::graphics::Tileset;
use crate::map::projection::{self, TILE_SIZE};
use crate::point::Point;
use crate::sprite::Sprite;

/// Macroquad sprite drawing one frame of a tileset texture at an iso coordinate.
#[derive(Clone, Debug)]
pub struct TileSprite {
    texture: String,
    position: Point,
    tile_index: i32,
    elevation: i32,
}

impl TileSprite {
    pub fn new(texture: &str, position: Point) -> Self {
        Self {
            texture: texture.to_string(),
            position,
            tile_index: 0,
            elevation: 0,
        }
    }

    pub fn texture(&self) -> &str {
        &self.texture
    }

    pub fn tile_index(&self) -> i32 {
        self.tile_index
    }

    /// Top-left corner and edge length of the sprite on screen.
    pub fn screen_rect(&self, camera_offset: Point, zoom: f32) -> Rect {
        let anchor = projection::iso_to_screen(self.position, zoom, Some(camera_offset));
        let size = TILE_SIZE * zoom;
        Rect::new(
            anchor.x as f32,
            anchor.y as f32 - self.elevation as f32 * zoom,
            size,
            size,
        )
    }
}

impl Sprite for TileSprite {
    type Context = Tileset;

    fn position(&self) -> Point {
        self.position
    }

    fn render(&self, tileset: &mut Tileset, camera_offset: Point, zoom: f32) {
        let dest = self.screen_rect(camera_offset, zoom);
        if dest.x > screen_width() || dest.y > screen_height() || dest.right() < 0.0 || dest.bottom() < 0.0 {
            return;
        }

        match tileset.frame(&self.texture, self.tile_index) {
            Some((texture, source)) => draw_texture_ex(
                texture,
                dest.x,
                dest.y,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(dest.w, dest.h)),
                    source: Some(source),
                    ..Default::default()
                },
            ),
            None => {
                // Diamond in the lower half of the tile square.
                let color = tileset.placeholder_color(&self.texture);
                let top = vec2(dest.x + dest.w * 0.5, dest.y + dest.h * 0.5);
                let right = vec2(dest.right(), dest.y + dest.h * 0.75);
                let bottom = vec2(dest.x + dest.w * 0.5, dest.bottom());
                let left = vec2(dest.x, dest.y + dest.h * 0.75);
                draw_triangle(top, right, bottom, color);
                draw_triangle(top, bottom, left, color);
                draw_triangle_lines(top, right, bottom, 1.0, Color::new(0.0, 0.0, 0.0, 0.25));
            }
        }
    }

    fn change_texture(&mut self, tile_index: i32) {
        self.tile_index = tile_index;
    }

    fn set_elevation(&mut self, pixels: i32) {
        self.elevation = pixels;
    }
}
