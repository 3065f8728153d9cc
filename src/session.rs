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

use std::collections::HashSet;

use bitflags::bitflags;
use tracing::{debug, info, warn};

use crate::camera::Camera;
use crate::collision::ObstacleSet;
use crate::config::Config;
use crate::creature::Creature;
use crate::cursor::{Cursor, CursorState};
use crate::error::GameError;
use crate::position::{Direction, GridPosition};
use crate::reachable::reachable_area;
use crate::rect::Rect;
use crate::render::{DrawCall, DrawKind};
use crate::tile_map::MapSource;
use crate::unit::UnitArena;

pub const COLLISION_LAYER: &str = "collision";
pub const CURSOR_MARKER: &str = "cursor";
pub const UNIT_MARKERS: &[&str] = &["player", "unit"];

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SessionFlags: u32 {
        const NONE          = 0;
        const PAUSED        = 0b0001;
        const DEBUG_OVERLAY = 0b0010;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Action,
    ToggleDebug,
    TogglePause,
    Reset,
    Quit,
}

/// What the frame loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Reset,
    Quit,
}

/// One play-through of a level. Owns every entity; nothing outside holds a
/// reference into it between frames.
pub struct Session {
    pub config: Config,
    pub map_size: (i32, i32),
    pub obstacles: ObstacleSet,
    pub units: UnitArena,
    pub cursor: Cursor,
    pub camera: Camera,
    reachable: HashSet<GridPosition>,
    flags: SessionFlags,
}

impl Session {
    pub fn new(config: Config, map: &impl MapSource) -> Result<Self, GameError> {
        let tile_size = config.tile_size;
        if map.tile_size() != tile_size {
            return Err(GameError::InvalidMap(format!(
                "map tiles are {} px, config expects {} px",
                map.tile_size(),
                tile_size
            )));
        }

        let map_size = map.pixel_size();
        let map_tiles = (map_size.0 / tile_size, map_size.1 / tile_size);
        if map_tiles.0 <= 0 || map_tiles.1 <= 0 {
            return Err(GameError::InvalidMap(format!(
                "{}x{} px map holds no {} px tile",
                map_size.0, map_size.1, tile_size
            )));
        }
        let inside = |pos: GridPosition| {
            pos.x >= 0 && pos.y >= 0 && pos.x < map_tiles.0 && pos.y < map_tiles.1
        };

        let obstacles = match map.layer_tiles(COLLISION_LAYER) {
            Some(tiles) => {
                if let Some(pos) = tiles.iter().find(|&&pos| !inside(pos)) {
                    return Err(GameError::InvalidMap(format!(
                        "obstacle {:?} outside the {}x{} tile map",
                        pos, map_tiles.0, map_tiles.1
                    )));
                }
                ObstacleSet::new(tiles, tile_size)
            }
            None => {
                warn!("map has no '{}' layer, nothing blocks movement", COLLISION_LAYER);
                ObstacleSet::default()
            }
        };

        let mut units = UnitArena::new();
        let mut cursor_pos = None;
        for marker in map.markers() {
            let pos = GridPosition::from_world(marker.center.0, marker.center.1, tile_size);
            if !inside(pos) {
                return Err(GameError::InvalidMap(format!(
                    "marker '{}' at {:?} outside the map",
                    marker.name, pos
                )));
            }
            if marker.name == CURSOR_MARKER {
                cursor_pos = Some(pos);
            } else if UNIT_MARKERS.contains(&marker.name.as_str()) {
                let budget = marker.movement.unwrap_or(config.default_movement);
                units.spawn(&marker.name, pos, budget);
            } else {
                debug!(name = %marker.name, "ignoring marker");
            }
        }

        let cursor_pos = cursor_pos
            .or_else(|| units.iter().next().map(|u| u.position))
            .unwrap_or_default();

        let camera = Camera::new(config.viewport_size(), map_size);

        info!(
            obstacles = obstacles.len(),
            units = units.len(),
            cursor = ?cursor_pos,
            "session started"
        );

        let mut session = Self {
            config,
            map_size,
            obstacles,
            units,
            cursor: Cursor::new(cursor_pos, map_tiles),
            camera,
            reachable: HashSet::new(),
            flags: SessionFlags::NONE,
        };
        session.update();
        Ok(session)
    }

    pub fn is_paused(&self) -> bool {
        self.flags.contains(SessionFlags::PAUSED)
    }

    pub fn is_debug_overlay(&self) -> bool {
        self.flags.contains(SessionFlags::DEBUG_OVERLAY)
    }

    pub fn handle(&mut self, command: Command) -> Flow {
        match command {
            Command::Quit => return Flow::Quit,
            Command::Reset => {
                info!("session reset requested");
                return Flow::Reset;
            }
            Command::TogglePause => {
                self.flags.toggle(SessionFlags::PAUSED);
                info!(paused = self.is_paused(), "pause toggled");
                return Flow::Continue;
            }
            _ => {}
        }

        if self.is_paused() {
            return Flow::Continue;
        }

        let tile_size = self.config.tile_size;
        match command {
            Command::Move(direction) => {
                let (dx, dy) = direction.delta();
                self.cursor
                    .try_move(dx, dy, &self.obstacles, &self.units, tile_size);
            }
            Command::Action => match self.cursor.state() {
                CursorState::Idle => {
                    self.cursor.select(&self.units, tile_size);
                }
                CursorState::Escorting => {
                    self.cursor.confirm(&mut self.units, tile_size);
                }
            },
            Command::ToggleDebug => {
                self.flags.toggle(SessionFlags::DEBUG_OVERLAY);
                info!(debug = self.is_debug_overlay(), "debug overlay toggled");
            }
            Command::Quit | Command::Reset | Command::TogglePause => {}
        }
        Flow::Continue
    }

    /// Per-frame step: follow the cursor with the camera and rebuild the
    /// reachable overlay. Frozen while paused.
    pub fn update(&mut self) {
        if self.is_paused() {
            return;
        }

        let tile_size = self.config.tile_size;
        self.camera.update(&self.cursor.hitbox(tile_size));

        self.reachable = match self.cursor.selection() {
            Some(selection) => reachable_area(
                selection.anchor,
                selection.budget(&self.units),
                &self.obstacles,
                tile_size,
            ),
            None => HashSet::new(),
        };
    }

    fn push(&self, calls: &mut Vec<DrawCall>, kind: DrawKind, world: Rect) {
        calls.push(DrawCall {
            kind,
            world,
            screen: self.camera.apply(&world),
        });
    }

    fn tile_rect(&self, pos: GridPosition) -> Rect {
        let tile_size = self.config.tile_size;
        let (x, y) = pos.to_world(tile_size);
        Rect::new(x, y, tile_size, tile_size)
    }

    /// Everything to draw this frame, back to front.
    pub fn draw_list(&self) -> Vec<DrawCall> {
        let mut calls = Vec::new();
        let tile_size = self.config.tile_size;
        let view = self.camera.viewport();

        self.push(
            &mut calls,
            DrawKind::MapBackground,
            Rect::new(0, 0, self.map_size.0, self.map_size.1),
        );

        // only the tiles under the viewport
        let cols = self.map_size.0 / tile_size;
        let rows = self.map_size.1 / tile_size;
        let first_col = view.x.div_euclid(tile_size).max(0);
        let first_row = view.y.div_euclid(tile_size).max(0);
        let last_col = (view.right().div_euclid(tile_size) + 1).min(cols);
        let last_row = (view.bottom().div_euclid(tile_size) + 1).min(rows);
        for col in first_col..last_col {
            for row in first_row..last_row {
                let cell = self.tile_rect(GridPosition::new(col, row));
                if cell.intersects(&view) {
                    self.push(&mut calls, DrawKind::GridCell, cell);
                }
            }
        }

        let mut highlighted: Vec<&GridPosition> = self.reachable.iter().collect();
        highlighted.sort();
        for &pos in highlighted {
            self.push(&mut calls, DrawKind::Reachable, self.tile_rect(pos));
        }

        let selected = self.cursor.selection().map(|s| s.unit);
        for unit in self.units.iter() {
            let kind = DrawKind::Unit {
                selected: selected == Some(unit.id),
            };
            self.push(&mut calls, kind, unit.hitbox(tile_size));
        }

        let cursor_kind = DrawKind::Cursor {
            escorting: self.cursor.state() == CursorState::Escorting,
        };
        self.push(&mut calls, cursor_kind, self.cursor.hitbox(tile_size));

        if self.is_debug_overlay() {
            for obstacle in self.obstacles.iter() {
                self.push(&mut calls, DrawKind::Obstacle, self.tile_rect(obstacle.position));
            }
        }

        calls
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile_map::{Marker, TileMapData};

    const MAP: &str = r#"{
        "width": 40, "height": 30, "tilewidth": 32, "tileheight": 32,
        "layers": [ { "name": "collision", "data": [[6, 5], [0, 0]] } ],
        "objects": [
            { "name": "player", "x": 160, "y": 160, "width": 32, "height": 32, "movement": 2 },
            { "name": "player", "x": 320, "y": 320, "width": 32, "height": 32 },
            { "name": "cursor", "x": 160, "y": 160, "width": 32, "height": 32 },
            { "name": "chest", "x": 32, "y": 32, "width": 32, "height": 32 }
        ]
    }"#;

    fn session() -> Session {
        let map = TileMapData::from_json(MAP).unwrap();
        Session::new(Config::default(), &map).unwrap()
    }

    fn count(calls: &[DrawCall], pred: impl Fn(&DrawKind) -> bool) -> usize {
        calls.iter().filter(|c| pred(&c.kind)).count()
    }

    #[test]
    fn test_builds_from_markers() {
        let s = session();
        assert_eq!(s.units.len(), 2);
        assert_eq!(s.obstacles.len(), 2);
        assert_eq!(s.cursor.position, GridPosition::new(5, 5));
        let budgets: Vec<i32> = s.units.iter().map(|u| u.movement_budget).collect();
        assert_eq!(budgets, vec![2, Config::default().default_movement]);
    }

    #[test]
    fn test_tile_size_mismatch_is_rejected() {
        let map = TileMapData::from_json(MAP).unwrap();
        let config = Config {
            tile_size: 16,
            ..Config::default()
        };
        assert!(matches!(Session::new(config, &map), Err(GameError::InvalidMap(_))));
    }

    #[test]
    fn test_missing_cursor_marker_falls_back_to_first_unit() {
        let map = TileMapData::from_json(
            r#"{ "width": 4, "height": 4, "tilewidth": 32, "tileheight": 32,
                 "objects": [ { "name": "unit", "x": 64, "y": 32, "width": 32, "height": 32 } ] }"#,
        )
        .unwrap();
        let s = Session::new(Config::default(), &map).unwrap();
        assert_eq!(s.cursor.position, GridPosition::new(2, 1));
        assert_eq!(s.obstacles.len(), 0);
    }

    #[test]
    fn test_select_move_confirm_cycle() {
        let mut s = session();
        assert_eq!(s.handle(Command::Action), Flow::Continue);
        assert_eq!(s.cursor.state(), CursorState::Escorting);

        s.update();
        assert_eq!(s.reachable.len(), 12);
        assert!(!s.reachable.contains(&GridPosition::new(6, 5)));

        // (6, 5) is a wall, go around it
        s.handle(Command::Move(Direction::Right));
        assert_eq!(s.cursor.position, GridPosition::new(5, 5));
        s.handle(Command::Move(Direction::Down));
        s.handle(Command::Move(Direction::Right));
        s.handle(Command::Move(Direction::Right));
        assert_eq!(s.cursor.position, GridPosition::new(6, 6));

        s.handle(Command::Action);
        s.update();
        assert_eq!(s.cursor.state(), CursorState::Idle);
        assert!(s.reachable.is_empty());
        assert_eq!(s.units.unit_at(GridPosition::new(6, 6)).map(|u| u.movement_budget), Some(2));
    }

    #[test]
    fn test_action_on_empty_tile_does_nothing() {
        let mut s = session();
        s.handle(Command::Move(Direction::Left));
        s.handle(Command::Action);
        assert_eq!(s.cursor.state(), CursorState::Idle);
    }

    #[test]
    fn test_pause_freezes_input_and_camera() {
        let mut s = session();
        s.handle(Command::TogglePause);
        assert!(s.is_paused());
        let before = s.cursor.position;
        s.handle(Command::Move(Direction::Down));
        s.handle(Command::Action);
        s.update();
        assert_eq!(s.cursor.position, before);
        assert_eq!(s.cursor.state(), CursorState::Idle);

        s.handle(Command::TogglePause);
        s.handle(Command::Move(Direction::Down));
        assert_eq!(s.cursor.position, before.offset(0, 1));
    }

    #[test]
    fn test_reset_and_quit_are_reported() {
        let mut s = session();
        assert_eq!(s.handle(Command::Reset), Flow::Reset);
        assert_eq!(s.handle(Command::Quit), Flow::Quit);
        s.handle(Command::TogglePause);
        assert_eq!(s.handle(Command::Quit), Flow::Quit);
    }

    #[test]
    fn test_camera_follows_cursor() {
        let mut s = session();
        for _ in 0..20 {
            s.handle(Command::Move(Direction::Down));
            s.handle(Command::Move(Direction::Right));
        }
        s.update();
        assert_eq!(s.cursor.position, GridPosition::new(25, 25));
        // centered horizontally, clamped to the bottom of a 1280x960 map
        assert_eq!(s.camera.origin, (-416, -320));
    }

    #[test]
    fn test_draw_list_order_and_overlay() {
        let mut s = session();
        let calls = s.draw_list();
        assert_eq!(calls[0].kind, DrawKind::MapBackground);
        assert_eq!(count(&calls, |k| *k == DrawKind::GridCell), 25 * 20);
        assert_eq!(count(&calls, |k| matches!(k, DrawKind::Unit { .. })), 2);
        assert_eq!(count(&calls, |k| *k == DrawKind::Obstacle), 0);
        assert!(matches!(calls.last().unwrap().kind, DrawKind::Cursor { escorting: false }));

        s.handle(Command::ToggleDebug);
        s.handle(Command::Action);
        s.update();
        let calls = s.draw_list();
        assert_eq!(count(&calls, |k| *k == DrawKind::Obstacle), 2);
        assert_eq!(count(&calls, |k| *k == DrawKind::Reachable), 12);
        assert_eq!(count(&calls, |k| *k == DrawKind::Unit { selected: true }), 1);
        assert!(calls.iter().all(|c| c.screen == s.camera.apply(&c.world)));
    }

    fn layer(kind: &DrawKind) -> u8 {
        match kind {
            DrawKind::MapBackground => 0,
            DrawKind::GridCell => 1,
            DrawKind::Reachable => 2,
            DrawKind::Unit { .. } => 3,
            DrawKind::Cursor { .. } => 4,
            DrawKind::Obstacle => 5,
        }
    }

    #[test]
    fn test_draw_list_is_back_to_front() {
        let mut s = session();
        s.handle(Command::ToggleDebug);
        s.handle(Command::Action);
        s.update();
        let calls = s.draw_list();

        let layers: Vec<u8> = calls.iter().map(|c| layer(&c.kind)).collect();
        assert!(layers.windows(2).all(|w| w[0] <= w[1]), "{:?}", layers);

        let mut present = layers.clone();
        present.dedup();
        assert_eq!(present, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(count(&calls, |k| *k == DrawKind::MapBackground), 1);
        assert_eq!(count(&calls, |k| matches!(k, DrawKind::Cursor { escorting: true })), 1);
    }

    #[test]
    fn test_grid_is_limited_to_viewport_on_large_maps() {
        let map = TileMapData::from_json(
            r#"{ "width": 2000, "height": 2000, "tilewidth": 32, "tileheight": 32,
                 "objects": [ { "name": "cursor", "x": 32000, "y": 32010, "width": 32, "height": 32 } ] }"#,
        )
        .unwrap();
        let s = Session::new(Config::default(), &map).unwrap();
        let view = s.camera.viewport();
        let cells: Vec<DrawCall> = s
            .draw_list()
            .into_iter()
            .filter(|c| c.kind == DrawKind::GridCell)
            .collect();
        assert!(!cells.is_empty());
        assert!(cells.len() <= 26 * 21, "{} cells", cells.len());
        assert!(cells.iter().all(|c| c.world.intersects(&view)));
    }

    struct LooseMap {
        tiles: Vec<GridPosition>,
        markers: Vec<Marker>,
    }

    impl MapSource for LooseMap {
        fn pixel_size(&self) -> (i32, i32) {
            (128, 128)
        }

        fn tile_size(&self) -> i32 {
            32
        }

        fn layer_tiles(&self, name: &str) -> Option<Vec<GridPosition>> {
            (name == COLLISION_LAYER).then(|| self.tiles.clone())
        }

        fn markers(&self) -> Vec<Marker> {
            self.markers.clone()
        }
    }

    #[test]
    fn test_out_of_map_tiles_and_markers_are_rejected() {
        let far_tile = LooseMap {
            tiles: vec![GridPosition::new(2_000_000_000, 0)],
            markers: vec![],
        };
        assert!(matches!(
            Session::new(Config::default(), &far_tile),
            Err(GameError::InvalidMap(_))
        ));

        let far_marker = LooseMap {
            tiles: vec![GridPosition::new(1, 1)],
            markers: vec![Marker {
                name: "player".to_string(),
                center: (-16.0, 48.0),
                movement: None,
            }],
        };
        assert!(matches!(
            Session::new(Config::default(), &far_marker),
            Err(GameError::InvalidMap(_))
        ));

        let fine = LooseMap {
            tiles: vec![GridPosition::new(3, 3)],
            markers: vec![],
        };
        assert!(Session::new(Config::default(), &fine).is_ok());
    }
}
