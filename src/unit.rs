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

use crate::creature::Creature;
use crate::position::GridPosition;
use crate::rect::Rect;

/// Stable handle into a [`UnitArena`]. Units are never removed during a
/// session, so a handle stays valid until the session is reset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct UnitId(usize);

#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    pub position: GridPosition,
    /// Maximum Manhattan distance, in tiles, per committed move.
    pub movement_budget: i32,
}

impl Creature for Unit {
    fn pos(&self) -> GridPosition {
        self.position
    }

    fn set_pos(&mut self, pos: GridPosition) {
        self.position = pos;
    }
}

#[derive(Clone, Debug, Default)]
pub struct UnitArena {
    units: Vec<Unit>,
}

impl UnitArena {
    pub fn new() -> Self {
        Self { units: Vec::new() }
    }

    pub fn spawn(&mut self, name: &str, position: GridPosition, movement_budget: i32) -> UnitId {
        let id = UnitId(self.units.len());
        self.units.push(Unit {
            id,
            name: name.to_string(),
            position,
            movement_budget,
        });
        id
    }

    pub fn get(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id.0)
    }

    pub fn get_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub fn unit_at(&self, pos: GridPosition) -> Option<&Unit> {
        self.units.iter().find(|u| u.position == pos)
    }

    /// Hitboxes of every unit except `except`, for occupancy probes.
    pub fn hitboxes(&self, tile_size: i32, except: Option<UnitId>) -> impl Iterator<Item = Rect> + '_ {
        self.units
            .iter()
            .filter(move |u| Some(u.id) != except)
            .map(move |u| u.hitbox(tile_size))
    }
}
