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

// The lifecycle every screen of the game shares.
//
// A scene never switches to another scene itself. It raises flags in its
// `Transition`, and the director acts on them between frames.

use crate::gfx::Context;
use crate::input::Event;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LevelId {
    One,
    Two,
    Three,
    Four,
    Five,
}

impl LevelId {
    pub const ALL: [LevelId; 5] = [
        LevelId::One,
        LevelId::Two,
        LevelId::Three,
        LevelId::Four,
        LevelId::Five,
    ];

    // Also the stage's asset name.
    pub fn name(self) -> &'static str {
        match self {
            LevelId::One => "level1",
            LevelId::Two => "level2",
            LevelId::Three => "level3",
            LevelId::Four => "level4",
            LevelId::Five => "level5",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SceneId {
    Menu,
    Level(LevelId),
    Pause,
    Victory,
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneId::Menu => write!(f, "menu"),
            SceneId::Level(level) => write!(f, "{}", level.name()),
            SceneId::Pause => write!(f, "pause"),
            SceneId::Victory => write!(f, "win"),
        }
    }
}

// Player state handed down to the level below when falling out of the
// bottom of a level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Carry {
    pub x: i32,
    pub vy: f32,
    pub dunked: bool,
}

// What a scene wants to happen after the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transition {
    // Leave this scene.
    pub done: bool,
    // Scene to start, or None to resume the most recently preserved one.
    pub next: Option<SceneId>,
    // Stop the game.
    pub quit: bool,
    // Keep this scene on the backlog instead of destroying it.
    pub preserve: bool,
    // Handed to the resumed scene's `restart`.
    pub carry: Option<Carry>,
}

impl Transition {
    pub fn reset(&mut self) {
        *self = Transition::default();
    }

    // Replaces any earlier request made this frame.
    pub fn goto(&mut self, next: SceneId) {
        self.next = Some(next);
        self.preserve = false;
        self.carry = None;
        self.done = true;
    }

    pub fn goto_preserving(&mut self, next: SceneId) {
        self.goto(next);
        self.preserve = true;
    }

    pub fn pop(&mut self, carry: Option<Carry>) {
        self.next = None;
        self.preserve = false;
        self.carry = carry;
        self.done = true;
    }

    pub fn quit(&mut self) {
        self.quit = true;
    }
}

pub trait Scene {
    fn id(&self) -> SceneId;

    fn transition(&self) -> &Transition;
    fn transition_mut(&mut self) -> &mut Transition;

    // Load assets. Called once, before the first update.
    fn startup(&mut self, context: &mut dyn Context) -> anyhow::Result<()>;

    fn handle_event(&mut self, _event: &Event) {}

    // Held buttons (CONTROL_* bits), sampled once per frame.
    fn handle_buttons(&mut self, _buttons: u32) {}

    // Simulate and draw one frame.
    fn update(&mut self, context: &mut dyn Context, d_t: f32);

    // Called when this scene comes back off the backlog.
    fn restart(&mut self, _carry: Option<Carry>) {
        self.transition_mut().reset();
    }

    // Called when this scene is discarded for good.
    fn destroy(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_names() {
        assert_eq!(SceneId::Level(LevelId::Three).to_string(), "level3");
        assert_eq!(SceneId::Victory.to_string(), "win");
        assert_eq!(SceneId::Menu.to_string(), "menu");
    }

    #[test]
    fn test_transition_helpers() {
        let mut transition = Transition::default();
        transition.goto_preserving(SceneId::Pause);
        assert!(transition.done && transition.preserve);
        assert_eq!(transition.next, Some(SceneId::Pause));

        // A later request in the same frame wins outright.
        transition.goto(SceneId::Menu);
        assert!(transition.done && !transition.preserve);
        assert_eq!(transition.next, Some(SceneId::Menu));

        let carry = Carry {
            x: 3,
            vy: 1.5,
            dunked: true,
        };
        transition.reset();
        transition.pop(Some(carry));
        assert!(transition.done && !transition.preserve);
        assert_eq!(transition.next, None);
        assert_eq!(transition.carry, Some(carry));

        transition.reset();
        assert_eq!(transition, Transition::default());
    }
}
