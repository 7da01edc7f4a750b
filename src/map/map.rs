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

use tracing::{debug, info, warn};

use crate::cell::Cell;
use crate::error::{MapError, Result};
use crate::map::map_data::MapData;
use crate::map::projection::{self, TILE_SIZE};
use crate::map::{FLOOR_TEXTURE, GRID_TEXTURE, Layers};
use crate::point::Point;
use crate::sprite::{Sprite, SpriteFactory};
use crate::tile_matrix::TileMatrix;

/// The tile map: three index-aligned layers, camera state and the transforms
/// between grid and screen space.
///
/// `width` and `height` are the largest valid coordinates, so every layer holds
/// `(width + 1) * (height + 1)` slots and `(width, height)` is a real tile.
#[derive(Debug)]
pub struct Map<S> {
    width: i32,
    height: i32,
    floor: TileMatrix<Cell<S>>,
    grid: TileMatrix<S>,
    buildings: TileMatrix<S>,
    active_layers: Layers,
    camera_offset: Point,
    zoom: f32,
    screen_width: i32,
    screen_height: i32,
}

impl<S: Sprite> Map<S> {
    /// Builds a flat map with a floor cell and a grid sprite on every tile.
    /// `screen_size` is the window size, read once here.
    pub fn new<F>(width: i32, height: i32, screen_size: (i32, i32), factory: &mut F) -> Result<Self>
    where
        F: SpriteFactory<Sprite = S>,
    {
        if width <= 0 || height <= 0 {
            return Err(MapError::InvalidDimensions { width, height });
        }

        let (columns, rows) = (width as usize + 1, height as usize + 1);
        let mut floor = TileMatrix::new(columns, rows);
        let mut grid = TileMatrix::new(columns, rows);
        let buildings = TileMatrix::new(columns, rows);

        for x in 0..=width {
            for y in (0..=height).rev() {
                let pos = Point::new(x, y);
                floor.add_sprite(pos, Some(Cell::new(pos, factory.create(FLOOR_TEXTURE, pos))))?;
                grid.add_sprite(pos, Some(factory.create(GRID_TEXTURE, pos)))?;
            }
        }
        floor.wire_neighbors()?;
        floor.refresh_tiles()?;

        info!(width, height, "map created");

        Ok(Self {
            width,
            height,
            floor,
            grid,
            buildings,
            active_layers: Layers::default(),
            camera_offset: Point::default(),
            zoom: 1.0,
            screen_width: screen_size.0,
            screen_height: screen_size.1,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell(&self, pos: Point) -> Result<Option<&Cell<S>>> {
        self.floor.get(pos)
    }

    pub fn grid_sprite(&self, pos: Point) -> Result<Option<&S>> {
        self.grid.get(pos)
    }

    pub fn building(&self, pos: Point) -> Result<Option<&S>> {
        self.buildings.get(pos)
    }

    /// Puts a building sprite on `pos`, replacing any building already there.
    pub fn place_building<F>(&mut self, pos: Point, texture: &str, factory: &mut F) -> Result<Option<S>>
    where
        F: SpriteFactory<Sprite = S>,
    {
        self.buildings.add_sprite(pos, Some(factory.create(texture, pos)))
    }

    pub fn remove_building(&mut self, pos: Point) -> Result<Option<S>> {
        self.buildings.take(pos)
    }

    pub fn increase_height(&mut self, pos: Point) -> Result<()> {
        self.floor.increase_height(pos)
    }

    pub fn decrease_height(&mut self, pos: Point) -> Result<()> {
        self.floor.decrease_height(pos)
    }

    pub fn find_neighbors(&self, pos: Point) -> Result<Vec<Point>> {
        self.floor.find_neighbors(pos)
    }

    /// Loads heights from external map data and re-tiles the whole map.
    ///
    /// Every record is checked before any height changes, so a rejected batch
    /// leaves the map untouched.
    pub fn apply_heights(&mut self, data: &MapData) -> Result<()> {
        for record in &data.cells {
            let pos = record.position();
            self.floor.get(pos)?.ok_or(MapError::MissingCell(pos))?;
        }

        for record in &data.cells {
            let pos = record.position();
            let Some(cell) = self.floor.get_mut(pos)? else {
                continue;
            };
            cell.set_height(record.height);
            if cell.height() != record.height {
                warn!(x = pos.x, y = pos.y, height = record.height, "height out of range, clamped");
            }
        }
        self.floor.refresh_tiles()?;

        for record in &data.cells {
            let Some(expected) = record.tile_id else {
                continue;
            };
            if let Some(cell) = self.floor.get(record.position())? {
                if cell.tile_id() != expected {
                    warn!(
                        x = record.x,
                        y = record.y,
                        expected,
                        computed = cell.tile_id(),
                        "tile id in map data disagrees with terrain"
                    );
                }
            }
        }
        info!(cells = data.cells.len(), "map data applied");
        Ok(())
    }

    /// Draws every active layer, back to front.
    pub fn render(&self, ctx: &mut S::Context) {
        for x in 0..=self.width {
            for y in (0..=self.height).rev() {
                let pos = Point::new(x, y);
                if self.active_layers.contains(Layers::FLOOR) {
                    if let Ok(Some(cell)) = self.floor.get(pos) {
                        cell.render(ctx, self.camera_offset, self.zoom);
                    }
                }
                if self.active_layers.contains(Layers::GRID) {
                    if let Ok(Some(sprite)) = self.grid.get(pos) {
                        sprite.render(ctx, self.camera_offset, self.zoom);
                    }
                }
                if self.active_layers.contains(Layers::BUILDINGS) {
                    if let Ok(Some(sprite)) = self.buildings.get(pos) {
                        sprite.render(ctx, self.camera_offset, self.zoom);
                    }
                }
            }
        }
    }

    /// Screen pixel to iso coordinate. With `with_offset` the camera offset is
    /// added back first.
    pub fn screen_to_iso(&self, screen: Point, with_offset: bool) -> Point {
        projection::screen_to_iso(screen, self.zoom, with_offset.then_some(self.camera_offset))
    }

    /// Iso coordinate to the top-left pixel of its tile sprite.
    pub fn iso_to_screen(&self, iso: Point, with_offset: bool) -> Point {
        projection::iso_to_screen(iso, self.zoom, with_offset.then_some(self.camera_offset))
    }

    /// Moves the camera so the tile at `iso` sits in the middle of the screen.
    pub fn center_screen_on_point(&mut self, iso: Point) {
        let screen = self.iso_to_screen(iso, false);
        let tile = (TILE_SIZE * self.zoom) as f64;
        let x = screen.x as f64 + tile * 0.5 - self.screen_width as f64 * 0.5;
        let y = screen.y as f64 + tile * 0.75 - self.screen_height as f64 * 0.5;
        self.camera_offset = Point::new(x as i32, y as i32);
        debug!(x = iso.x, y = iso.y, offset = ?self.camera_offset, "camera centered");
    }

    /// Inclusive on both ends: `(width, height)` is on the map.
    pub fn check_boundaries(&self, iso: Point) -> bool {
        (0..=self.width).contains(&iso.x) && (0..=self.height).contains(&iso.y)
    }

    pub fn camera_offset(&self) -> Point {
        self.camera_offset
    }

    pub fn set_camera_offset(&mut self, offset: Point) {
        self.camera_offset = offset;
    }

    pub fn zoom_level(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom_level(&mut self, zoom: f32) -> Result<()> {
        if !zoom.is_finite() || zoom <= 0.0 {
            warn!(zoom, "rejected zoom level");
            return Err(MapError::InvalidZoom(zoom));
        }
        self.zoom = zoom;
        Ok(())
    }

    pub fn active_layers(&self) -> Layers {
        self.active_layers
    }

    pub fn enable_layer(&mut self, layer: Layers) {
        self.active_layers |= layer;
    }

    pub fn disable_layer(&mut self, layer: Layers) {
        self.active_layers &= !layer;
    }

    pub fn toggle_layer(&mut self, layer: Layers) {
        self.active_layers ^= layer;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::testing::{DrawCall, RecordingFactory, RecordingSprite};

    fn map(size: i32) -> Map<RecordingSprite> {
        Map::new(size, size, (800, 600), &mut RecordingFactory::default()).unwrap()
    }

    fn textures(calls: &[DrawCall]) -> Vec<&str> {
        calls.iter().map(|c| c.texture.as_str()).collect()
    }

    #[test]
    fn construction_fills_floor_and_grid_inclusively() {
        let mut factory = RecordingFactory::default();
        let map: Map<RecordingSprite> = Map::new(16, 16, (800, 600), &mut factory).unwrap();
        assert_eq!(factory.created, 2 * 17 * 17);
        let corner = map.cell(Point::new(16, 16)).unwrap().unwrap();
        assert_eq!(corner.coordinates(), Point::new(16, 16));
        assert_eq!(corner.neighbors().len(), 3);
        assert!(map.grid_sprite(Point::new(16, 0)).unwrap().is_some());
        assert!(map.building(Point::new(1, 1)).unwrap().is_none());
        assert!(map.cell(Point::new(17, 0)).is_err());
        assert_eq!(map.active_layers(), Layers::FLOOR | Layers::BUILDINGS);
    }

    #[test]
    fn rejects_empty_maps() {
        let result: Result<Map<RecordingSprite>> = Map::new(0, 4, (800, 600), &mut RecordingFactory::default());
        assert!(matches!(result, Err(MapError::InvalidDimensions { width: 0, height: 4 })));
    }

    #[test]
    fn boundaries_are_inclusive() {
        let map = map(16);
        assert!(map.check_boundaries(Point::new(16, 16)));
        assert!(map.check_boundaries(Point::new(0, 0)));
        assert!(!map.check_boundaries(Point::new(17, 0)));
        assert!(!map.check_boundaries(Point::new(0, -1)));
    }

    #[test]
    fn render_order_is_x_ascending_then_y_descending() {
        let mut map = map(2);
        map.disable_layer(Layers::BUILDINGS);
        let mut calls = Vec::new();
        map.render(&mut calls);
        let order: Vec<Point> = calls.iter().map(|c| c.position).collect();
        assert_eq!(
            order,
            vec![
                Point::new(0, 2), Point::new(0, 1), Point::new(0, 0),
                Point::new(1, 2), Point::new(1, 1), Point::new(1, 0),
                Point::new(2, 2), Point::new(2, 1), Point::new(2, 0),
            ]
        );
    }

    #[test]
    fn layers_stack_floor_grid_buildings_per_tile() {
        let mut factory = RecordingFactory::default();
        let mut map = Map::new(1, 1, (800, 600), &mut factory).unwrap();
        map.place_building(Point::new(1, 1), "house", &mut factory).unwrap();
        map.enable_layer(Layers::GRID);
        map.set_camera_offset(Point::new(-40, 12));
        map.set_zoom_level(2.0).unwrap();

        let mut calls = Vec::new();
        map.render(&mut calls);
        assert_eq!(
            textures(&calls),
            vec!["floor", "grid", "floor", "grid", "floor", "grid", "house", "floor", "grid"]
        );
        assert!(calls.iter().all(|c| c.camera_offset == Point::new(-40, 12) && c.zoom == 2.0));
    }

    #[test]
    fn layer_switches_use_or_and_not_xor() {
        let mut map = map(3);
        map.enable_layer(Layers::GRID);
        assert_eq!(map.active_layers(), Layers::all());
        map.disable_layer(Layers::FLOOR | Layers::BUILDINGS);
        assert_eq!(map.active_layers(), Layers::GRID);
        map.toggle_layer(Layers::GRID | Layers::FLOOR);
        assert_eq!(map.active_layers(), Layers::FLOOR);

        let mut calls = Vec::new();
        map.render(&mut calls);
        assert!(textures(&calls).iter().all(|t| *t == "floor"));
        assert_eq!(calls.len(), 16);
    }

    #[test]
    fn rendering_twice_draws_the_same_frame() {
        let map = map(4);
        let (mut first, mut second) = (Vec::new(), Vec::new());
        map.render(&mut first);
        map.render(&mut second);
        assert_eq!(first, second);
    }

    #[test]
    fn removing_a_building_clears_its_slot() {
        let mut factory = RecordingFactory::default();
        let mut map = Map::new(3, 3, (800, 600), &mut factory).unwrap();
        assert!(map.place_building(Point::new(4, 0), "house", &mut factory).is_err());
        map.place_building(Point::new(2, 2), "house", &mut factory).unwrap();
        let removed = map.remove_building(Point::new(2, 2)).unwrap().unwrap();
        assert_eq!(removed.texture, "house");
        assert!(map.building(Point::new(2, 2)).unwrap().is_none());
    }

    #[test]
    fn screen_round_trip_through_tile_centers() {
        let mut map = map(16);
        map.set_zoom_level(1.5).unwrap();
        map.center_screen_on_point(Point::new(8, 8));
        let center = projection::tile_center(map.zoom_level());
        for with_offset in [false, true] {
            for x in 0..=16 {
                for y in 0..=16 {
                    let iso = Point::new(x, y);
                    let anchor = map.iso_to_screen(iso, with_offset);
                    let picked = map.screen_to_iso(Point::new(anchor.x + center.x, anchor.y + center.y), with_offset);
                    assert_eq!(picked, iso);
                }
            }
        }
    }

    #[test]
    fn centering_puts_the_tile_center_mid_screen() {
        let mut map = map(16);
        map.center_screen_on_point(Point::new(4, 2));
        // anchor (96, 16) + center (16, 24) - half screen (400, 300)
        assert_eq!(map.camera_offset(), Point::new(-288, -260));
        let on_screen = map.iso_to_screen(Point::new(4, 2), true);
        assert_eq!(on_screen, Point::new(400 - 16, 300 - 24));
        assert_eq!(map.screen_to_iso(Point::new(400, 300), true), Point::new(4, 2));
    }

    #[test]
    fn invalid_zoom_is_rejected() {
        let mut map = map(2);
        assert!(matches!(map.set_zoom_level(0.0), Err(MapError::InvalidZoom(_))));
        assert!(map.set_zoom_level(f32::NAN).is_err());
        assert!(map.set_zoom_level(-1.0).is_err());
        assert_eq!(map.zoom_level(), 1.0);
    }

    #[test]
    fn raising_three_three_on_a_sixteen_map() {
        let mut map = map(16);
        let untouched = map.cell(Point::new(0, 0)).unwrap().unwrap().tile_id();
        map.increase_height(Point::new(3, 3)).unwrap();

        let raised = map.cell(Point::new(3, 3)).unwrap().unwrap();
        assert_eq!(raised.height(), 1);
        assert!(raised.shape().is_raised());
        for neighbor in map.find_neighbors(Point::new(3, 3)).unwrap() {
            let cell = map.cell(neighbor).unwrap().unwrap();
            let toward = crate::point::Direction::between(neighbor, Point::new(3, 3)).unwrap();
            assert!(cell.shape().slopes_toward(toward));
        }
        assert_eq!(map.cell(Point::new(0, 0)).unwrap().unwrap().tile_id(), untouched);
    }

    #[test]
    fn apply_heights_retiles_the_map() {
        let mut map = map(4);
        let data = MapData::from_json(
            r#"{ "cells": [
                { "x": 2, "y": 2, "height": 1, "tile_id": 65280 },
                { "x": 0, "y": 0, "height": 99 }
            ] }"#,
        )
        .unwrap();
        map.apply_heights(&data).unwrap();
        assert_eq!(map.cell(Point::new(2, 2)).unwrap().unwrap().tile_id(), 0xff00);
        assert_eq!(map.cell(Point::new(0, 0)).unwrap().unwrap().height(), crate::cell::MAX_CELL_HEIGHT);
        assert!(map.cell(Point::new(1, 2)).unwrap().unwrap().shape().slopes_toward(crate::point::Direction::East));

        let outside = MapData::from_height_rows(&[vec![0; 6]]);
        assert!(matches!(map.apply_heights(&outside), Err(MapError::OutOfBounds { .. })));
    }

    #[test]
    fn rejected_map_data_leaves_heights_and_tiles_alone() {
        let mut map = map(4);
        let data = MapData::from_json(
            r#"{ "cells": [
                { "x": 2, "y": 2, "height": 1 },
                { "x": 9, "y": 9, "height": 0 }
            ] }"#,
        )
        .unwrap();
        assert!(matches!(map.apply_heights(&data), Err(MapError::OutOfBounds { x: 9, y: 9, .. })));

        for x in 0..=4 {
            for y in 0..=4 {
                let cell = map.cell(Point::new(x, y)).unwrap().unwrap();
                assert_eq!(cell.height(), 0);
                assert_eq!(cell.tile_id(), 0);
            }
        }
    }
}
