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

use bitflags::bitflags;
use tracing::debug;

use crate::error::{MapError, Result};
use crate::point::{Direction, Point};
use crate::sprite::Sprite;
use crate::tile_matrix::TileMatrix;

pub const MIN_HEIGHT: i32 = 0;
pub const MAX_CELL_HEIGHT: i32 = 32;
/// Vertical pixel distance between two height levels at zoom 1.0.
pub const HEIGHT_OFFSET: i32 = 20;

bitflags! {
    /// One bit per direction, in [`Direction::ALL`] order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DirectionFlags: u8 {
        const NORTH      = 0b0000_0001;
        const EAST       = 0b0000_0010;
        const SOUTH      = 0b0000_0100;
        const WEST       = 0b0000_1000;
        const NORTH_EAST = 0b0001_0000;
        const SOUTH_EAST = 0b0010_0000;
        const SOUTH_WEST = 0b0100_0000;
        const NORTH_WEST = 0b1000_0000;
    }
}

impl From<Direction> for DirectionFlags {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::North => DirectionFlags::NORTH,
            Direction::East => DirectionFlags::EAST,
            Direction::South => DirectionFlags::SOUTH,
            Direction::West => DirectionFlags::WEST,
            Direction::NorthEast => DirectionFlags::NORTH_EAST,
            Direction::SouthEast => DirectionFlags::SOUTH_EAST,
            Direction::SouthWest => DirectionFlags::SOUTH_WEST,
            Direction::NorthWest => DirectionFlags::NORTH_WEST,
        }
    }
}

/// Visual shape of a cell relative to its neighbors.
///
/// `slopes` marks directions where the neighbor is exactly one level higher,
/// so the cell ramps up toward it. `edges` marks directions where the neighbor
/// is exactly one level lower. Larger steps set no bit at all: cliffs and
/// retaining walls are not resolved here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileShape {
    pub slopes: DirectionFlags,
    pub edges: DirectionFlags,
}

impl TileShape {
    pub const FLAT: TileShape = TileShape {
        slopes: DirectionFlags::empty(),
        edges: DirectionFlags::empty(),
    };

    pub fn from_heights(height: i32, neighbors: impl IntoIterator<Item = (Direction, i32)>) -> Self {
        let mut shape = TileShape::FLAT;
        for (direction, neighbor_height) in neighbors {
            match neighbor_height - height {
                1 => shape.slopes |= DirectionFlags::from(direction),
                -1 => shape.edges |= DirectionFlags::from(direction),
                _ => {}
            }
        }
        shape
    }

    pub fn tile_id(self) -> i32 {
        self.slopes.bits() as i32 | (self.edges.bits() as i32) << 8
    }

    pub fn from_tile_id(id: i32) -> Self {
        Self {
            slopes: DirectionFlags::from_bits_truncate((id & 0xff) as u8),
            edges: DirectionFlags::from_bits_truncate(((id >> 8) & 0xff) as u8),
        }
    }

    /// Every neighbor sits one level below.
    pub fn is_raised(self) -> bool {
        self.slopes.is_empty() && self.edges.is_all()
    }

    pub fn slopes_toward(self, direction: Direction) -> bool {
        self.slopes.contains(direction.into())
    }
}

/// One map tile. Cells are owned by the floor matrix; neighbors are stored as
/// coordinates and resolved through that matrix.
#[derive(Clone, Debug)]
pub struct Cell<S> {
    iso_coordinates: Point,
    sprite: S,
    tile_id: i32,
    height: i32,
    neighbors: Vec<Point>,
}

impl<S: Sprite> Cell<S> {
    pub fn new(iso_coordinates: Point, sprite: S) -> Self {
        Self {
            iso_coordinates,
            sprite,
            tile_id: 0,
            height: MIN_HEIGHT,
            neighbors: Vec::new(),
        }
    }

    pub fn coordinates(&self) -> Point {
        self.iso_coordinates
    }

    pub fn sprite(&self) -> &S {
        &self.sprite
    }

    pub fn tile_id(&self) -> i32 {
        self.tile_id
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn neighbors(&self) -> &[Point] {
        &self.neighbors
    }

    pub fn shape(&self) -> TileShape {
        TileShape::from_tile_id(self.tile_id)
    }

    // The sprite is switched with the id being replaced, then the new id is kept.
    pub fn set_tile_id(&mut self, tile_id: i32) {
        self.sprite.change_texture(self.tile_id);
        self.tile_id = tile_id;
    }

    pub fn set_neighbors(&mut self, neighbors: Vec<Point>) {
        self.neighbors = neighbors;
    }

    /// Sets the height, clamped to the valid range. Returns whether it changed.
    pub fn set_height(&mut self, height: i32) -> bool {
        let height = height.clamp(MIN_HEIGHT, MAX_CELL_HEIGHT);
        if height == self.height {
            return false;
        }
        self.height = height;
        self.sprite.set_elevation(height * HEIGHT_OFFSET);
        true
    }

    pub fn render(&self, ctx: &mut S::Context, camera_offset: Point, zoom: f32) {
        self.sprite.render(ctx, camera_offset, zoom);
    }
}

impl<S: Sprite> TileMatrix<Cell<S>> {
    /// Raises the cell at `pos` one level and re-tiles it and its neighbors.
    /// Does nothing at [`MAX_CELL_HEIGHT`].
    pub fn increase_height(&mut self, pos: Point) -> Result<()> {
        self.shift_height(pos, 1)
    }

    /// Lowers the cell at `pos` one level and re-tiles it and its neighbors.
    /// Does nothing at [`MIN_HEIGHT`].
    pub fn decrease_height(&mut self, pos: Point) -> Result<()> {
        self.shift_height(pos, -1)
    }

    fn shift_height(&mut self, pos: Point, delta: i32) -> Result<()> {
        let cell = self.get_mut(pos)?.ok_or(MapError::MissingCell(pos))?;
        if !cell.set_height(cell.height + delta) {
            return Ok(());
        }
        debug!(x = pos.x, y = pos.y, height = cell.height, "cell height changed");

        let neighbors = cell.neighbors.clone();
        self.determine_tile(pos)?;
        for neighbor in neighbors {
            self.draw_surrounding_tiles(neighbor)?;
        }
        Ok(())
    }

    /// Picks the tile id of the cell at `pos` from its own height and the
    /// heights of its neighbors. Empty slots are left alone.
    pub fn determine_tile(&mut self, pos: Point) -> Result<()> {
        let Some(cell) = self.get(pos)? else {
            return Ok(());
        };

        let mut around = Vec::with_capacity(cell.neighbors.len());
        for &neighbor in &cell.neighbors {
            let Some(direction) = Direction::between(pos, neighbor) else {
                continue;
            };
            if let Some(other) = self.get(neighbor)? {
                around.push((direction, other.height));
            }
        }
        let tile_id = TileShape::from_heights(cell.height, around).tile_id();

        if let Some(cell) = self.get_mut(pos)? {
            if cell.tile_id != tile_id {
                cell.set_tile_id(tile_id);
            }
        }
        Ok(())
    }

    /// Re-tiles the cell at `pos` after one of its neighbors changed height.
    pub fn draw_surrounding_tiles(&mut self, pos: Point) -> Result<()> {
        self.determine_tile(pos)
    }

    /// Points every cell at its in-bounds neighbors. Run once all cells exist.
    pub fn wire_neighbors(&mut self) -> Result<()> {
        for pos in self.positions() {
            let neighbors = self.find_neighbors(pos)?;
            if let Some(cell) = self.get_mut(pos)? {
                cell.set_neighbors(neighbors);
            }
        }
        Ok(())
    }

    pub fn refresh_tiles(&mut self) -> Result<()> {
        for pos in self.positions() {
            self.determine_tile(pos)?;
        }
        Ok(())
    }
}
