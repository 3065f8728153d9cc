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

use crate::creature::Creature;
use crate::position::GridPosition;
use crate::rect::Rect;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Obstacle {
    pub position: GridPosition,
    pub rect: Rect,
}

/// Static terrain. Built once at level load and never mutated afterwards.
#[derive(Clone, Debug, Default)]
pub struct ObstacleSet {
    obstacles: Vec<Obstacle>,
}

impl ObstacleSet {
    pub fn new(tiles: impl IntoIterator<Item = GridPosition>, tile_size: i32) -> Self {
        let mut set = Self::default();
        let mut seen = HashSet::new();
        for position in tiles {
            if !seen.insert(position) {
                continue;
            }
            let (x, y) = position.to_world(tile_size);
            set.obstacles.push(Obstacle {
                position,
                rect: Rect::new(x, y, tile_size, tile_size),
            });
        }
        set
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn hitboxes(&self) -> impl Iterator<Item = Rect> + '_ {
        self.obstacles.iter().map(|o| o.rect)
    }
}

/// Moves `entity` by `(dx, dy)` tiles, checks its hitbox against `blockers`
/// and puts it back. The entity is always restored before returning, and the
/// exclusive borrow keeps the displaced state invisible to anyone else.
pub fn probe<C, I>(entity: &mut C, dx: i32, dy: i32, blockers: I, tile_size: i32) -> bool
where
    C: Creature + ?Sized,
    I: IntoIterator<Item = Rect>,
{
    let origin = entity.pos();
    entity.set_pos(origin.offset(dx, dy));
    let hitbox = entity.hitbox(tile_size);
    let hit = blockers.into_iter().any(|rect| hitbox.intersects(&rect));
    entity.set_pos(origin);
    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::Footprint;

    const TILE: i32 = 32;

    fn walls() -> ObstacleSet {
        ObstacleSet::new(
            [GridPosition::new(6, 5), GridPosition::new(5, 3), GridPosition::new(6, 5)],
            TILE,
        )
    }

    #[test]
    fn test_duplicate_tiles_collapse() {
        let set = walls();
        assert_eq!(set.len(), 2);
        assert!(set.iter().any(|o| o.position == GridPosition::new(6, 5)));
        assert!(!set.iter().any(|o| o.position == GridPosition::new(5, 5)));
    }

    #[test]
    fn test_obstacle_rect_matches_tile() {
        let set = walls();
        let wall = set.iter().find(|o| o.position == GridPosition::new(5, 3)).unwrap();
        assert_eq!(wall.rect, Rect::new(160, 96, 32, 32));
    }

    #[test]
    fn test_probe_detects_blocked_tile() {
        let set = walls();
        let mut body = Footprint(GridPosition::new(5, 5));
        assert!(probe(&mut body, 1, 0, set.hitboxes(), TILE));
        assert!(probe(&mut body, 0, -2, set.hitboxes(), TILE));
        assert!(!probe(&mut body, -1, 0, set.hitboxes(), TILE));
        assert!(!probe(&mut body, 0, 0, set.hitboxes(), TILE));
    }

    #[test]
    fn test_probe_always_restores_position() {
        let set = walls();
        let start = GridPosition::new(5, 5);
        let mut body = Footprint(start);
        for (dx, dy) in [(1, 0), (-1, 0), (0, -2), (3, 3), (0, 0)] {
            probe(&mut body, dx, dy, set.hitboxes(), TILE);
            assert_eq!(body.pos(), start);
        }
    }

    #[test]
    fn test_probe_against_empty_set() {
        let set = ObstacleSet::default();
        assert_eq!(set.len(), 0);
        let mut body = Footprint(GridPosition::new(0, 0));
        assert!(!probe(&mut body, 1, 1, set.hitboxes(), TILE));
    }
}
