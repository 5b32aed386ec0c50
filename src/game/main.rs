//
// Copyright 2025 Jeff Bush
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

mod gfx;
mod platform;

use anyhow::Context as _;
use engine::tuning::Tuning;
use engine::GameEngine;
use std::path::PathBuf;

// Assets and the tuning file live next to the executable.
fn exe_dir() -> anyhow::Result<PathBuf> {
    let exe_path = std::env::current_exe().context("locating executable")?;
    Ok(exe_path
        .parent()
        .map(|dir| dir.to_path_buf())
        .unwrap_or_default())
}

fn run() -> anyhow::Result<()> {
    let exe_dir = exe_dir()?;
    let tuning = Tuning::load(&exe_dir.join("tuning.json"))?;
    let mut platform = platform::SdlPlatform::new(exe_dir.join("sprites"))?;
    let mut game = GameEngine::new(tuning, &mut platform)?;
    game.run(&mut platform)
}

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        log::error!("{:#}", err);
        std::process::exit(1);
    }
}
