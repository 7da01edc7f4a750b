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

use crate::point::Point;

/// A drawable tile image placed at an iso coordinate.
///
/// The core never loads textures itself. It only asks a sprite to draw into a
/// render context and to switch to another texture variant.
pub trait Sprite {
    /// Whatever the backend needs to draw: a texture cache, a draw list, ...
    type Context;

    fn position(&self) -> Point;

    fn render(&self, ctx: &mut Self::Context, camera_offset: Point, zoom: f32);

    fn change_texture(&mut self, tile_index: i32);

    /// Lifts the sprite by `pixels` at zoom 1.0.
    fn set_elevation(&mut self, _pixels: i32) {}
}

/// Produces sprites for a texture identifier at a cell position.
pub trait SpriteFactory {
    type Sprite: Sprite;

    fn create(&mut self, texture: &str, position: Point) -> Self::Sprite;
}
