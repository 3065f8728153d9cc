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

use macroquad::file::load_string;
use serde::Deserialize;
use serde_json::from_str;
use tracing::info;

use crate::error::GameError;
use crate::position::GridPosition;

/// Object placed on the map by the level author, e.g. a unit spawn.
#[derive(Clone, Debug, PartialEq)]
pub struct Marker {
    pub name: String,
    /// World-space center in pixels.
    pub center: (f32, f32),
    pub movement: Option<i32>,
}

/// What the session needs from a level, independent of how it is stored.
pub trait MapSource {
    /// Map dimensions in pixels.
    fn pixel_size(&self) -> (i32, i32);
    fn tile_size(&self) -> i32;
    /// Tile coordinates of every cell present in layer `name`. `None` when the
    /// layer does not exist.
    fn layer_tiles(&self, name: &str) -> Option<Vec<GridPosition>>;
    fn markers(&self) -> Vec<Marker>;
}

#[derive(Clone, Debug, Deserialize)]
pub struct LayerData {
    pub name: String,
    #[serde(default)]
    pub data: Vec<[i32; 2]>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ObjectData {
    pub name: String,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub movement: Option<i32>,
}

/// JSON level file. `width`/`height` are in tiles.
#[derive(Clone, Debug, Deserialize)]
pub struct TileMapData {
    pub width: i32,
    pub height: i32,
    pub tilewidth: i32,
    pub tileheight: i32,
    #[serde(default)]
    pub layers: Vec<LayerData>,
    #[serde(default)]
    pub objects: Vec<ObjectData>,
}

impl TileMapData {
    pub fn from_json(text: &str) -> Result<Self, GameError> {
        let map: TileMapData = from_str(text).map_err(|source| GameError::Parse {
            path: "<map>".to_string(),
            source,
        })?;
        map.validate()
    }

    fn validate(self) -> Result<Self, GameError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(GameError::InvalidMap(format!(
                "size {}x{} tiles",
                self.width, self.height
            )));
        }
        if self.tilewidth <= 0 || self.tilewidth != self.tileheight {
            return Err(GameError::InvalidMap(format!(
                "tiles must be square, got {}x{}",
                self.tilewidth, self.tileheight
            )));
        }
        let (Some(pixel_w), Some(pixel_h)) = (
            self.width.checked_mul(self.tilewidth),
            self.height.checked_mul(self.tileheight),
        ) else {
            return Err(GameError::InvalidMap(format!(
                "{}x{} tiles of {} px do not fit in pixel coordinates",
                self.width, self.height, self.tilewidth
            )));
        };

        for layer in &self.layers {
            if let Some(&[x, y]) = layer
                .data
                .iter()
                .find(|&&[x, y]| x < 0 || y < 0 || x >= self.width || y >= self.height)
            {
                return Err(GameError::InvalidMap(format!(
                    "layer '{}' has tile ({}, {}) outside {}x{}",
                    layer.name, x, y, self.width, self.height
                )));
            }
        }

        for obj in &self.objects {
            let (cx, cy) = (obj.x + obj.width / 2.0, obj.y + obj.height / 2.0);
            if !(cx >= 0.0 && cy >= 0.0 && cx < pixel_w as f32 && cy < pixel_h as f32) {
                return Err(GameError::InvalidMap(format!(
                    "object '{}' centered at ({}, {}) is outside the map",
                    obj.name, cx, cy
                )));
            }
        }
        Ok(self)
    }

    pub async fn load(path: &str) -> Result<Self, GameError> {
        let text = load_string(path).await.map_err(|e| GameError::Load {
            path: path.to_string(),
            message: e.to_string(),
        })?;
        let map = Self::from_json(&text).map_err(|e| match e {
            GameError::Parse { source, .. } => GameError::Parse {
                path: path.to_string(),
                source,
            },
            other => other,
        })?;

        info!(
            path,
            width = map.width,
            height = map.height,
            layers = map.layers.len(),
            objects = map.objects.len(),
            "loaded map"
        );
        Ok(map)
    }
}

impl MapSource for TileMapData {
    fn pixel_size(&self) -> (i32, i32) {
        (self.width * self.tilewidth, self.height * self.tileheight)
    }

    fn tile_size(&self) -> i32 {
        self.tilewidth
    }

    fn layer_tiles(&self, name: &str) -> Option<Vec<GridPosition>> {
        self.layers
            .iter()
            .find(|layer| layer.name == name)
            .map(|layer| {
                layer
                    .data
                    .iter()
                    .map(|&[x, y]| GridPosition::new(x, y))
                    .collect()
            })
    }

    fn markers(&self) -> Vec<Marker> {
        self.objects
            .iter()
            .map(|obj| Marker {
                name: obj.name.clone(),
                center: (obj.x + obj.width / 2.0, obj.y + obj.height / 2.0),
                movement: obj.movement,
            })
            .collect()
    }
}
