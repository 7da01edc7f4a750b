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

use serde::Deserialize;
use serde_json::from_str;

use crate::error::Result;
use crate::point::Point;

/// Height (and optionally the expected tile id) of one map coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HeightRecord {
    pub x: i32,
    pub y: i32,
    pub height: i32,
    #[serde(default)]
    pub tile_id: Option<i32>,
}

impl HeightRecord {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// External map contents: a flat list of per-coordinate records.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MapData {
    #[serde(default)]
    pub cells: Vec<HeightRecord>,
}

impl MapData {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(from_str(json)?)
    }

    /// Builds records from rows of heights, `rows[y][x]`.
    pub fn from_height_rows(rows: &[Vec<i32>]) -> Self {
        let cells = rows
            .iter()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter().enumerate().map(move |(x, &height)| HeightRecord {
                    x: x as i32,
                    y: y as i32,
                    height,
                    tile_id: None,
                })
            })
            .collect();
        Self { cells }
    }
}
