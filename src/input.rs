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
use once_cell::sync::Lazy;
use std::sync::Mutex;

use crate::config::Config;
use crate::position::Direction;
use crate::session::Command;

const DIRECTION_KEYS: [(Direction, KeyCode, KeyCode); 4] = [
    (Direction::Up, KeyCode::Up, KeyCode::W),
    (Direction::Right, KeyCode::Right, KeyCode::D),
    (Direction::Down, KeyCode::Down, KeyCode::S),
    (Direction::Left, KeyCode::Left, KeyCode::A),
];

/// Auto-repeat for a held direction: fires on press, again after `delay`,
/// then every `interval` while the key stays down.
#[derive(Clone, Debug)]
pub struct KeyRepeat {
    delay: f32,
    interval: f32,
    held: Option<(Direction, f32, f32)>, // direction, held for, next fire at
}

impl KeyRepeat {
    pub fn new(delay: f32, interval: f32) -> Self {
        Self {
            delay,
            interval: interval.max(f32::EPSILON),
            held: None,
        }
    }

    /// Forgets the held key so the next `tick` fires straight away.
    pub fn restart(&mut self) {
        self.held = None;
    }

    pub fn tick(&mut self, down: Option<Direction>, dt: f32) -> Option<Direction> {
        let Some(direction) = down else {
            self.held = None;
            return None;
        };

        match &mut self.held {
            Some((held, elapsed, next)) if *held == direction => {
                *elapsed += dt;
                if *elapsed >= *next {
                    *next = *elapsed + self.interval;
                    Some(direction)
                } else {
                    None
                }
            }
            _ => {
                self.held = Some((direction, 0.0, self.delay));
                Some(direction)
            }
        }
    }
}

pub struct Input {
    repeat: KeyRepeat,
}

impl Input {
    /// The direction to feed the repeat clock, and whether its key went down
    /// this frame.
    fn held_direction(&self) -> (Option<Direction>, bool) {
        let pressed = DIRECTION_KEYS
            .iter()
            .find(|(_, a, b)| is_key_pressed(*a) || is_key_pressed(*b))
            .map(|(d, _, _)| *d);
        if pressed.is_some() {
            return (pressed, true);
        }

        let is_down = |d: Direction| {
            DIRECTION_KEYS
                .iter()
                .any(|(dir, a, b)| *dir == d && (is_key_down(*a) || is_key_down(*b)))
        };
        if let Some((held, _, _)) = self.repeat.held {
            if is_down(held) {
                return (Some(held), false);
            }
        }
        (DIRECTION_KEYS.iter().map(|(d, _, _)| *d).find(|d| is_down(*d)), false)
    }

    fn handle_keyboard_input(&mut self, dt: f32) -> Vec<Command> {
        let mut commands = Vec::new();

        let (down, fresh) = self.held_direction();
        if fresh {
            self.repeat.restart();
        }
        if let Some(direction) = self.repeat.tick(down, dt) {
            commands.push(Command::Move(direction));
        }
        if is_key_pressed(KeyCode::Space) || is_key_pressed(KeyCode::Enter) {
            commands.push(Command::Action);
        }
        if is_key_pressed(KeyCode::G) || is_key_pressed(KeyCode::F1) {
            commands.push(Command::ToggleDebug);
        }
        if is_key_pressed(KeyCode::P) {
            commands.push(Command::TogglePause);
        }
        if is_key_pressed(KeyCode::R) {
            commands.push(Command::Reset);
        }
        if is_key_pressed(KeyCode::Escape) {
            commands.push(Command::Quit);
        }

        commands
    }

    pub fn configure(config: &Config) {
        let mut input = INPUT.lock().unwrap_or_else(|e| e.into_inner());
        input.repeat = KeyRepeat::new(config.key_repeat_delay, config.key_repeat_interval);
    }

    /// Commands triggered this frame, in a fixed order: movement first.
    pub fn poll(dt: f32) -> Vec<Command> {
        let mut input = INPUT.lock().unwrap_or_else(|e| e.into_inner());
        input.handle_keyboard_input(dt)
    }
}

static INPUT: Lazy<Mutex<Input>> = Lazy::new(|| {
    let config = Config::default();
    Mutex::new(Input {
        repeat: KeyRepeat::new(config.key_repeat_delay, config.key_repeat_interval),
    })
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_on_press_then_after_delay() {
        let mut repeat = KeyRepeat::new(0.3, 0.1);
        assert_eq!(repeat.tick(Some(Direction::Up), 0.016), Some(Direction::Up));
        assert_eq!(repeat.tick(Some(Direction::Up), 0.2), None);
        assert_eq!(repeat.tick(Some(Direction::Up), 0.2), Some(Direction::Up));
        assert_eq!(repeat.tick(Some(Direction::Up), 0.05), None);
        assert_eq!(repeat.tick(Some(Direction::Up), 0.06), Some(Direction::Up));
    }

    #[test]
    fn test_release_and_switch_restart_the_delay() {
        let mut repeat = KeyRepeat::new(0.3, 0.1);
        repeat.tick(Some(Direction::Left), 0.0);
        assert_eq!(repeat.tick(None, 0.5), None);
        assert_eq!(repeat.tick(Some(Direction::Left), 0.5), Some(Direction::Left));
        assert_eq!(repeat.tick(Some(Direction::Down), 0.01), Some(Direction::Down));
        assert_eq!(repeat.tick(Some(Direction::Down), 0.1), None);
    }

    #[test]
    fn test_restart_fires_same_direction_again() {
        // Up held, then W pressed for the same direction
        let mut repeat = KeyRepeat::new(0.3, 0.1);
        assert_eq!(repeat.tick(Some(Direction::Up), 0.0), Some(Direction::Up));
        assert_eq!(repeat.tick(Some(Direction::Up), 0.05), None);
        repeat.restart();
        assert_eq!(repeat.tick(Some(Direction::Up), 0.05), Some(Direction::Up));
        assert_eq!(repeat.tick(Some(Direction::Up), 0.1), None);
    }
}
