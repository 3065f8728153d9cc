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

use crate::position::GridPosition;
use crate::rect::Rect;

/// Anything that occupies exactly one tile.
pub trait Creature {
    fn pos(&self) -> GridPosition;
    fn set_pos(&mut self, pos: GridPosition);

    fn hitbox(&self, tile_size: i32) -> Rect {
        let (x, y) = self.pos().to_world(tile_size);
        Rect::new(x, y, tile_size, tile_size)
    }
}

/// A bare tile-sized body used to probe tiles nothing stands on yet.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Footprint(pub GridPosition);

impl Creature for Footprint {
    fn pos(&self) -> GridPosition {
        self.0
    }

    fn set_pos(&mut self, pos: GridPosition) {
        self.0 = pos;
    }
}
