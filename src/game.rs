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
use tracing::{error, info};

use crate::config::Config;
use crate::input::Input;
use crate::render;
use crate::session::{Flow, Session};
use crate::tile_map::TileMapData;

async fn run_session(session: &mut Session) -> Flow {
    loop {
        let dt = get_frame_time();

        for command in Input::poll(dt) {
            match session.handle(command) {
                Flow::Continue => {}
                flow => return flow,
            }
        }

        session.update();
        render::draw(session, &session.draw_list());
        next_frame().await;
    }
}

pub async fn run() {
    let config = match Config::load().await {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };
    Input::configure(&config);

    let map = match TileMapData::load(&config.map_path).await {
        Ok(map) => map,
        Err(e) => {
            error!("{}", e);
            return;
        }
    };

    loop {
        let mut session = match Session::new(config.clone(), &map) {
            Ok(session) => session,
            Err(e) => {
                error!("{}", e);
                return;
            }
        };

        match run_session(&mut session).await {
            Flow::Reset => info!("restarting session"),
            _ => break,
        }
    }
    info!("bye");
}
