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

use crate::error::{MapError, Result};
use crate::point::Point;

/// Fixed-size grid of optional slots addressed by `(x, y)`.
///
/// Every map layer is one of these. Slots are stored column by column, so the
/// slot for `(x, y)` sits at `x * height + y`.
#[derive(Clone, Debug)]
pub struct TileMatrix<T> {
    width: usize,
    height: usize,
    slots: Vec<Option<T>>,
}

impl<T> TileMatrix<T> {
    pub fn new(width: usize, height: usize) -> Self {
        let mut slots = Vec::with_capacity(width * height);
        slots.resize_with(width * height, || None);
        Self {
            width,
            height,
            slots,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, pos: Point) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    fn index_of(&self, pos: Point) -> Result<usize> {
        if !self.in_bounds(pos) {
            return Err(MapError::OutOfBounds {
                x: pos.x,
                y: pos.y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(pos.x as usize * self.height + pos.y as usize)
    }

    /// Stores `item` at `pos`, returning what was there before.
    pub fn add_sprite(&mut self, pos: Point, item: Option<T>) -> Result<Option<T>> {
        let idx = self.index_of(pos)?;
        Ok(std::mem::replace(&mut self.slots[idx], item))
    }

    pub fn take(&mut self, pos: Point) -> Result<Option<T>> {
        let idx = self.index_of(pos)?;
        Ok(self.slots[idx].take())
    }

    pub fn get(&self, pos: Point) -> Result<Option<&T>> {
        let idx = self.index_of(pos)?;
        Ok(self.slots[idx].as_ref())
    }

    pub fn get_mut(&mut self, pos: Point) -> Result<Option<&mut T>> {
        let idx = self.index_of(pos)?;
        Ok(self.slots[idx].as_mut())
    }

    /// In-bounds coordinates adjacent to `pos`, in [`crate::point::Direction::ALL`] order.
    pub fn find_neighbors(&self, pos: Point) -> Result<Vec<Point>> {
        self.index_of(pos)?;
        Ok(pos
            .points_around()
            .into_iter()
            .filter(|p| self.in_bounds(*p))
            .collect())
    }

    /// Every coordinate of the matrix, column by column.
    pub fn positions(&self) -> impl Iterator<Item = Point> + use<T> {
        let (width, height) = (self.width as i32, self.height as i32);
        (0..width).flat_map(move |x| (0..height).map(move |y| Point::new(x, y)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Point, &T)> {
        self.positions()
            .zip(self.slots.iter())
            .filter_map(|(pos, slot)| slot.as_ref().map(|item| (pos, item)))
    }
}
