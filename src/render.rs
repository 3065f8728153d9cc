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

use macroquad::prelude::*;

use crate::rect::Rect;
use crate::session::Session;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DrawKind {
    MapBackground,
    GridCell,
    Reachable,
    Unit { selected: bool },
    Cursor { escorting: bool },
    Obstacle,
}

/// A world rectangle and where it lands on screen after the camera offset.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub kind: DrawKind,
    pub world: Rect,
    pub screen: Rect,
}

const GRID_COLOR: Color = Color::new(0.39, 0.39, 0.39, 1.0);
const MAP_COLOR: Color = Color::new(0.12, 0.2, 0.12, 1.0);
const REACHABLE_COLOR: Color = Color::new(0.0, 0.4, 1.0, 0.35);
const DIM_COLOR: Color = Color::new(0.39, 0.39, 0.39, 0.47);
const CURSOR_BORDER: f32 = 3.0;

fn fill(rect: &Rect, color: Color) {
    draw_rectangle(rect.x as f32, rect.y as f32, rect.w as f32, rect.h as f32, color);
}

fn outline(rect: &Rect, thickness: f32, color: Color) {
    draw_rectangle_lines(
        rect.x as f32,
        rect.y as f32,
        rect.w as f32,
        rect.h as f32,
        thickness,
        color,
    );
}

pub fn draw(session: &Session, calls: &[DrawCall]) {
    clear_background(BLACK);

    for call in calls {
        let r = &call.screen;
        match call.kind {
            DrawKind::MapBackground => fill(r, MAP_COLOR),
            DrawKind::GridCell => outline(r, 1.0, GRID_COLOR),
            DrawKind::Reachable => fill(r, REACHABLE_COLOR),
            DrawKind::Unit { selected } => {
                fill(&Rect::new(r.x + 4, r.y + 4, r.w - 8, r.h - 8), BLUE);
                if selected {
                    outline(r, 2.0, WHITE);
                }
            }
            DrawKind::Cursor { escorting } => {
                let color = if escorting { MAGENTA } else { YELLOW };
                outline(r, CURSOR_BORDER * 2.0, color);
            }
            DrawKind::Obstacle => outline(r, 2.0, RED),
        }
    }

    if session.is_paused() {
        draw_rectangle(0.0, 0.0, screen_width(), screen_height(), DIM_COLOR);
        let text = "Paused";
        let size = 105;
        let dims = measure_text(text, None, size, 1.0);
        draw_text(
            text,
            (screen_width() - dims.width) / 2.0,
            (screen_height() + dims.offset_y) / 2.0,
            size as f32,
            RED,
        );
    }
}
