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

// Bitmask of held buttons
pub const CONTROL_UP: u32 = 1;
pub const CONTROL_DOWN: u32 = 2;
pub const CONTROL_LEFT: u32 = 4;
pub const CONTROL_RIGHT: u32 = 8;

pub const POINTER_PRIMARY: u8 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Escape,
    Other,
}

impl Key {
    pub fn control_mask(self) -> u32 {
        match self {
            Key::Up => CONTROL_UP,
            Key::Down => CONTROL_DOWN,
            Key::Left => CONTROL_LEFT,
            Key::Right => CONTROL_RIGHT,
            Key::Escape | Key::Other => 0,
        }
    }
}

// Discrete things that happened since the last frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Quit,
    KeyDown(Key),
    PointerUp { button: u8, x: i32, y: i32 },
}

pub trait InputSource {
    // Next pending event, or None once this frame's events are drained.
    fn poll_event(&mut self) -> Option<Event>;

    // Currently held buttons, as CONTROL_* bits.
    fn buttons(&self) -> u32;
}

pub fn held(buttons: u32, control: u32) -> bool {
    buttons & control != 0
}
