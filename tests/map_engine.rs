use isocity::cell::{MAX_CELL_HEIGHT, TileShape};
use isocity::map::map_data::MapData;
use isocity::map::{Layers, Map};
use isocity::point::{Direction, Point};
use isocity::sprite::{Sprite, SpriteFactory};

#[derive(Debug)]
struct CountingSprite {
    texture: &'static str,
    position: Point,
}

#[derive(Debug, Default)]
struct Frame {
    drawn: Vec<(&'static str, Point)>,
}

impl Sprite for CountingSprite {
    type Context = Frame;

    fn position(&self) -> Point {
        self.position
    }

    fn render(&self, frame: &mut Frame, _camera_offset: Point, _zoom: f32) {
        frame.drawn.push((self.texture, self.position));
    }

    fn change_texture(&mut self, _tile_index: i32) {}
}

struct Factory;

impl SpriteFactory for Factory {
    type Sprite = CountingSprite;

    fn create(&mut self, texture: &str, position: Point) -> CountingSprite {
        let texture = match texture {
            "floor" => "floor",
            "grid" => "grid",
            _ => "building",
        };
        CountingSprite { texture, position }
    }
}

fn count(frame: &Frame, texture: &str) -> usize {
    frame.drawn.iter().filter(|(t, _)| *t == texture).count()
}

fn assert_tiles_consistent(map: &Map<CountingSprite>) {
    for x in 0..=map.width() {
        for y in 0..=map.height() {
            let pos = Point::new(x, y);
            let cell = map.cell(pos).unwrap().unwrap();
            let around = cell.neighbors().iter().map(|&n| {
                let direction = Direction::between(pos, n).unwrap();
                (direction, map.cell(n).unwrap().unwrap().height())
            });
            let expected = TileShape::from_heights(cell.height(), around).tile_id();
            assert_eq!(cell.tile_id(), expected, "tile at {pos:?}");
            assert!(cell.tile_id() >= 0);
        }
    }
}

#[test]
fn grid_layer_is_drawn_only_while_enabled() {
    let mut map = Map::new(16, 16, (1024, 768), &mut Factory).unwrap();
    let tiles = 17 * 17;

    let mut frame = Frame::default();
    map.render(&mut frame);
    assert_eq!(count(&frame, "floor"), tiles);
    assert_eq!(count(&frame, "grid"), 0);

    map.enable_layer(Layers::GRID);
    let mut frame = Frame::default();
    map.render(&mut frame);
    assert_eq!(count(&frame, "grid"), tiles);

    map.disable_layer(Layers::GRID);
    let mut frame = Frame::default();
    map.render(&mut frame);
    assert_eq!(count(&frame, "grid"), 0);

    map.toggle_layer(Layers::GRID);
    map.toggle_layer(Layers::FLOOR);
    let mut frame = Frame::default();
    map.render(&mut frame);
    assert_eq!(count(&frame, "grid"), tiles);
    assert_eq!(count(&frame, "floor"), 0);
}

#[test]
fn buildings_are_drawn_after_the_ground_of_their_tile() {
    let mut map = Map::new(4, 4, (1024, 768), &mut Factory).unwrap();
    map.place_building(Point::new(1, 1), "house", &mut Factory).unwrap();

    let mut frame = Frame::default();
    map.render(&mut frame);
    let building = frame.drawn.iter().position(|(t, _)| *t == "building").unwrap();
    assert_eq!(frame.drawn[building - 1], ("floor", Point::new(1, 1)));
    assert_eq!(frame.drawn[building + 1], ("floor", Point::new(1, 0)));
}

#[test]
fn demo_heightmap_keeps_every_tile_consistent() {
    let data = MapData::from_json(include_str!("../assets/maps/demo.json")).unwrap();
    assert_eq!(data.cells.len(), 256);

    let mut map = Map::new(16, 16, (1024, 768), &mut Factory).unwrap();
    map.apply_heights(&data).unwrap();
    assert_eq!(map.cell(Point::new(4, 5)).unwrap().unwrap().height(), 4);
    assert_tiles_consistent(&map);

    for _ in 0..3 {
        map.increase_height(Point::new(8, 8)).unwrap();
        map.decrease_height(Point::new(3, 4)).unwrap();
    }
    map.increase_height(Point::new(16, 16)).unwrap();
    assert_tiles_consistent(&map);
}

#[test]
fn raising_to_the_ceiling_and_back_down() {
    let mut map = Map::new(6, 6, (1024, 768), &mut Factory).unwrap();
    let pos = Point::new(2, 2);
    for _ in 0..MAX_CELL_HEIGHT + 5 {
        map.increase_height(pos).unwrap();
    }
    assert_eq!(map.cell(pos).unwrap().unwrap().height(), MAX_CELL_HEIGHT);
    for _ in 0..MAX_CELL_HEIGHT + 5 {
        map.decrease_height(pos).unwrap();
    }
    assert_eq!(map.cell(pos).unwrap().unwrap().height(), 0);
    assert_tiles_consistent(&map);
}

#[test]
fn clicking_a_tile_center_picks_that_tile() {
    let mut map = Map::new(16, 16, (1024, 768), &mut Factory).unwrap();
    map.set_zoom_level(2.0).unwrap();
    map.center_screen_on_point(Point::new(8, 8));
    assert_eq!(map.screen_to_iso(Point::new(512, 384), true), Point::new(8, 8));

    let target = Point::new(11, 3);
    let anchor = map.iso_to_screen(target, true);
    let click = Point::new(anchor.x + 32, anchor.y + 48);
    let picked = map.screen_to_iso(click, true);
    assert_eq!(picked, target);
    assert!(map.check_boundaries(picked));
    assert!(!map.check_boundaries(Point::new(17, 0)));
}
