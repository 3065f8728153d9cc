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

use crate::rect::Rect;

/// Scrolling view over the map, kept inside the map bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// Offset added to world coordinates to get screen coordinates. Never
    /// positive on either axis.
    pub origin: (i32, i32),
    pub viewport_size: (i32, i32),
    pub map_size: (i32, i32),
}

impl Camera {
    pub fn new(viewport_size: (i32, i32), map_size: (i32, i32)) -> Self {
        Self {
            origin: (0, 0),
            viewport_size,
            map_size,
        }
    }

    /// Centers the view on `target`, then clamps so nothing past the map edge
    /// is shown. On an axis where the map is smaller than the viewport, the
    /// map is pinned to the top-left corner.
    pub fn update(&mut self, target: &Rect) {
        let (cx, cy) = target.center();
        let x = -cx + self.viewport_size.0 / 2;
        let y = -cy + self.viewport_size.1 / 2;
        self.origin = (
            clamp_axis(x, self.map_size.0, self.viewport_size.0),
            clamp_axis(y, self.map_size.1, self.viewport_size.1),
        );
    }

    pub fn apply(&self, rect: &Rect) -> Rect {
        rect.translate(self.origin.0, self.origin.1)
    }

    /// The visible part of the map in world coordinates.
    pub fn viewport(&self) -> Rect {
        Rect::new(
            -self.origin.0,
            -self.origin.1,
            self.viewport_size.0,
            self.viewport_size.1,
        )
    }
}

fn clamp_axis(value: i32, map: i32, view: i32) -> i32 {
    if map <= view {
        return 0;
    }
    // left/top first, then right/bottom
    value.min(0).max(-(map - view))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(x: i32, y: i32) -> Rect {
        Rect::new(x * 32, y * 32, 32, 32)
    }

    #[test]
    fn test_centers_on_target_in_the_middle() {
        let mut camera = Camera::new((800, 640), (3200, 3200));
        camera.update(&tile(50, 50));
        assert_eq!(camera.origin, (-(1616 - 400), -(1616 - 320)));
        assert_eq!(camera.apply(&tile(50, 50)), Rect::new(384, 304, 32, 32));
    }

    #[test]
    fn test_clamps_at_every_edge() {
        let mut camera = Camera::new((800, 640), (1600, 1280));
        camera.update(&tile(0, 0));
        assert_eq!(camera.origin, (0, 0));
        camera.update(&tile(49, 39));
        assert_eq!(camera.origin, (-800, -640));
    }

    #[test]
    fn test_viewport_stays_inside_map() {
        let map = (1600, 1280);
        let bounds = Rect::new(0, 0, map.0, map.1);
        let mut camera = Camera::new((800, 640), map);
        for x in -10..70 {
            for y in -10..60 {
                camera.update(&tile(x, y));
                assert!(bounds.contains_rect(&camera.viewport()), "target ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut camera = Camera::new((800, 640), (1600, 1280));
        camera.update(&tile(30, 7));
        let once = camera.clone();
        camera.update(&tile(30, 7));
        assert_eq!(camera, once);
    }

    #[test]
    fn test_small_map_is_pinned() {
        let mut camera = Camera::new((800, 640), (320, 1280));
        camera.update(&tile(9, 30));
        assert_eq!(camera.origin.0, 0);
        assert_eq!(camera.origin.1, -640);
    }
}
