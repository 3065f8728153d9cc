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

use tracing::{debug, info};

use crate::collision::{probe, ObstacleSet};
use crate::creature::Creature;
use crate::position::{within_range, GridPosition};
use crate::unit::{UnitArena, UnitId};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CursorState {
    Idle,
    Escorting,
}

/// A unit picked up by the cursor, together with the tile it started from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    pub unit: UnitId,
    pub anchor: GridPosition,
}

impl Selection {
    /// Movement budget of the escorted unit. The handle must be live.
    pub fn budget(&self, units: &UnitArena) -> i32 {
        units
            .get(self.unit)
            .map(|u| u.movement_budget)
            .unwrap_or_else(|| panic!("selected unit {:?} is not in the arena", self.unit))
    }
}

#[derive(Clone, Debug)]
pub struct Cursor {
    pub position: GridPosition,
    /// Map size in tiles; the cursor never leaves `[0, w) × [0, h)`.
    bounds: (i32, i32),
    selection: Option<Selection>,
}

impl Creature for Cursor {
    fn pos(&self) -> GridPosition {
        self.position
    }

    fn set_pos(&mut self, pos: GridPosition) {
        self.position = pos;
    }
}

impl Cursor {
    pub fn new(position: GridPosition, bounds: (i32, i32)) -> Self {
        Self {
            position,
            bounds,
            selection: None,
        }
    }

    fn in_bounds(&self, pos: GridPosition) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.bounds.0 && pos.y < self.bounds.1
    }

    pub fn state(&self) -> CursorState {
        match self.selection {
            Some(_) => CursorState::Escorting,
            None => CursorState::Idle,
        }
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Moves one step if allowed. The map edge and terrain always block;
    /// while escorting, the candidate tile must also stay within the unit's
    /// budget of the anchor. A denied move leaves everything untouched and
    /// returns `false`.
    pub fn try_move(
        &mut self,
        dx: i32,
        dy: i32,
        obstacles: &ObstacleSet,
        units: &UnitArena,
        tile_size: i32,
    ) -> bool {
        let candidate = self.position.offset(dx, dy);
        if !self.in_bounds(candidate) {
            debug!(?candidate, "move off the map");
            return false;
        }

        if probe(self, dx, dy, obstacles.hitboxes(), tile_size) {
            debug!(from = ?self.position, dx, dy, "move blocked by terrain");
            return false;
        }

        if let Some(selection) = self.selection {
            let budget = selection.budget(units);
            if !within_range(selection.anchor, candidate, budget) {
                debug!(?candidate, anchor = ?selection.anchor, budget, "move out of range");
                return false;
            }
        }

        self.position = candidate;
        true
    }

    /// Picks up the unit under the cursor. Only valid while idle.
    pub fn select(&mut self, units: &UnitArena, tile_size: i32) -> bool {
        assert!(
            self.selection.is_none(),
            "select while already escorting {:?}",
            self.selection
        );

        if !probe(self, 0, 0, units.hitboxes(tile_size, None), tile_size) {
            return false;
        }

        let Some(unit) = units.unit_at(self.position) else {
            return false;
        };

        info!(unit = %unit.name, anchor = ?unit.position, budget = unit.movement_budget, "unit selected");
        self.selection = Some(Selection {
            unit: unit.id,
            anchor: unit.position,
        });
        true
    }

    /// Drops the escorted unit on the cursor tile and returns to idle. Refused
    /// when another unit already stands there. Only valid while escorting.
    pub fn confirm(&mut self, units: &mut UnitArena, tile_size: i32) -> bool {
        let selection = self
            .selection
            .unwrap_or_else(|| panic!("confirm without a selection at {:?}", self.position));

        if probe(self, 0, 0, units.hitboxes(tile_size, Some(selection.unit)), tile_size) {
            debug!(tile = ?self.position, "tile occupied by another unit");
            return false;
        }

        let unit = units
            .get_mut(selection.unit)
            .unwrap_or_else(|| panic!("selected unit {:?} is not in the arena", selection.unit));
        unit.set_pos(self.position);
        info!(unit = %unit.name, from = ?selection.anchor, to = ?self.position, "move committed");

        self.selection = None;
        true
    }
}
