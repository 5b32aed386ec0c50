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

mod level;
mod menu;

pub use level::Level;
pub use menu::{Action, Menu, Pause, Victory};

use crate::scene::{Scene, SceneId};
use crate::tuning::Tuning;

// Construct (but don't start up) the scene for `id`.
pub fn create(id: SceneId, tuning: &Tuning) -> Box<dyn Scene> {
    match id {
        SceneId::Menu => Box::new(Menu::new()),
        SceneId::Level(level) => Box::new(Level::new(level, tuning)),
        SceneId::Pause => Box::new(Pause::new()),
        SceneId::Victory => Box::new(Victory::new()),
    }
}
