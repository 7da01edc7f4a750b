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

//! Isometric projection between grid coordinates and screen pixels.
//!
//! A tile is drawn into a `TILE_SIZE * zoom` square whose top-left corner is
//! the projected anchor; the diamond fills the lower half of that square, so
//! its visual center sits at `(0.5, 0.75)` of the square.

use crate::point::Point;

pub const TILE_SIZE: f32 = 32.0;

fn scale(zoom: f32) -> f64 {
    (TILE_SIZE * zoom) as f64
}

/// Projects an iso coordinate to the top-left pixel of its tile sprite.
/// Subtracts `camera_offset` when one is given.
pub fn iso_to_screen(iso: Point, zoom: f32, camera_offset: Option<Point>) -> Point {
    let scale = scale(zoom);
    let (ix, iy) = (iso.x as f64, iso.y as f64);
    let mut x = scale * ix * 0.5 + scale * iy * 0.5;
    let mut y = scale * ix * 0.25 - scale * iy * 0.25;
    if let Some(offset) = camera_offset {
        x -= offset.x as f64;
        y -= offset.y as f64;
    }
    Point::new(x as i32, y as i32)
}

/// Maps a screen pixel back to the iso coordinate of the tile under it.
///
/// The `-1.5` / `+1.5` terms shift the result by half a tile so that the
/// visual center of a tile lands on that tile under truncation.
pub fn screen_to_iso(screen: Point, zoom: f32, camera_offset: Option<Point>) -> Point {
    let scale = scale(zoom);
    let (mut sx, mut sy) = (screen.x as f64, screen.y as f64);
    if let Some(offset) = camera_offset {
        sx += offset.x as f64;
        sy += offset.y as f64;
    }
    let x = (sx + 2.0 * sy) / scale - 1.5;
    let y = (sx - 2.0 * sy) / scale + 1.5;
    Point::new(x as i32, y as i32)
}

/// Offset from a tile's anchor to the visual center of its diamond.
pub fn tile_center(zoom: f32) -> Point {
    let scale = scale(zoom);
    Point::new((scale * 0.5) as i32, (scale * 0.75) as i32)
}
