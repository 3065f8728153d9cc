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
use tracing::{info, warn};

use crate::error::GameError;

pub const CONFIG_PATH: &str = "assets/config.json";

/// Session parameters. Everything the grid logic needs to know about tile
/// and screen sizes flows through here instead of through constants.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub screen_width: i32,
    pub screen_height: i32,
    pub tile_size: i32,
    /// Seconds a direction key is held before it starts repeating.
    pub key_repeat_delay: f32,
    /// Seconds between repeats once repeating.
    pub key_repeat_interval: f32,
    pub default_movement: i32,
    pub map_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Explorers of Elrualia".to_string(),
            screen_width: 800,
            screen_height: 640,
            tile_size: 32,
            key_repeat_delay: 0.3,
            key_repeat_interval: 0.075,
            default_movement: 3,
            map_path: "assets/map.json".to_string(),
        }
    }
}

impl Config {
    pub fn viewport_size(&self) -> (i32, i32) {
        (self.screen_width, self.screen_height)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        from_str(text)
    }

    fn validate(self) -> Result<Self, GameError> {
        if self.tile_size <= 0 || self.screen_width <= 0 || self.screen_height <= 0 {
            return Err(GameError::InvalidConfig(format!(
                "tile {} screen {}x{}",
                self.tile_size, self.screen_width, self.screen_height
            )));
        }
        Ok(self)
    }

    /// Reads `assets/config.json`. A missing file is not an error, the defaults
    /// are used instead; a malformed one is.
    pub async fn load() -> Result<Self, GameError> {
        let text = match load_string(CONFIG_PATH).await {
            Ok(text) => text,
            Err(e) => {
                warn!("no config at {} ({}), using defaults", CONFIG_PATH, e);
                return Ok(Self::default());
            }
        };

        let config = Self::from_json(&text).map_err(|source| GameError::Parse {
            path: CONFIG_PATH.to_string(),
            source,
        })?;
        info!(?config, "loaded config");
        config.validate()
    }
}
