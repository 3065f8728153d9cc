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

use crate::collision::{probe, ObstacleSet};
use crate::creature::Footprint;
use crate::position::{within_range, GridPosition};

/// Tiles within `budget` Manhattan steps of `anchor` that are not terrain.
///
/// Walks the bounding square `[-budget, budget]²` and keeps the diamond. Only
/// the destination tile is tested, not the path to it, which mirrors what the
/// cursor allows while escorting. Recomputed from scratch on every call.
pub fn reachable_area(
    anchor: GridPosition,
    budget: i32,
    obstacles: &ObstacleSet,
    tile_size: i32,
) -> HashSet<GridPosition> {
    let mut area = HashSet::new();
    if budget < 0 {
        return area;
    }

    let mut body = Footprint(anchor);
    for i in -budget..=budget {
        for j in -budget..=budget {
            let tile = anchor.offset(j, i);
            if !within_range(anchor, tile, budget) {
                continue;
            }
            if !probe(&mut body, j, i, obstacles.hitboxes(), tile_size) {
                area.insert(tile);
            }
        }
    }
    area
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILE: i32 = 32;

    #[test]
    fn test_open_diamond_size() {
        let anchor = GridPosition::new(5, 5);
        let area = reachable_area(anchor, 2, &ObstacleSet::default(), TILE);
        assert_eq!(area.len(), 13);
        assert!(area.contains(&anchor));
        assert!(area.contains(&GridPosition::new(7, 5)));
        assert!(area.contains(&GridPosition::new(6, 6)));
        assert!(!area.contains(&GridPosition::new(7, 6)));

        assert_eq!(reachable_area(anchor, 3, &ObstacleSet::default(), TILE).len(), 25);
        assert_eq!(reachable_area(anchor, 0, &ObstacleSet::default(), TILE).len(), 1);
    }

    #[test]
    fn test_obstacle_excluded() {
        let anchor = GridPosition::new(5, 5);
        let obstacles = ObstacleSet::new([GridPosition::new(6, 5)], TILE);
        let area = reachable_area(anchor, 2, &obstacles, TILE);
        assert_eq!(area.len(), 12);
        assert!(!area.contains(&GridPosition::new(6, 5)));
        // tiles behind the obstacle stay highlighted; only destinations are checked
        assert!(area.contains(&GridPosition::new(7, 5)));
    }

    #[test]
    fn test_matches_what_the_cursor_accepts() {
        let anchor = GridPosition::new(0, 0);
        let area = reachable_area(anchor, 2, &ObstacleSet::default(), TILE);
        for x in -4..=4 {
            for y in -4..=4 {
                let tile = GridPosition::new(x, y);
                assert_eq!(area.contains(&tile), within_range(anchor, tile, 2), "{:?}", tile);
            }
        }
    }

    #[test]
    fn test_negative_budget_is_empty() {
        let area = reachable_area(GridPosition::new(1, 1), -1, &ObstacleSet::default(), TILE);
        assert!(area.is_empty());
    }
}
