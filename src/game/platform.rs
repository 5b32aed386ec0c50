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

use crate::gfx::RenderContext;
use anyhow::anyhow;
use engine::gfx::{AssetLoader, Color, Image, RenderTarget};
use engine::input::{Event, InputSource, Key};
use engine::mask::BitmapMask;
use engine::util::Rect;
use sdl2::event::Event as SdlEvent;
use sdl2::keyboard::Keycode;
use sdl2::mouse::MouseButton;
use std::path::PathBuf;

const TITLE: &str = "Tower Climber";

fn map_key(keycode: Keycode) -> Key {
    match keycode {
        Keycode::Up => Key::Up,
        Keycode::Down => Key::Down,
        Keycode::Left => Key::Left,
        Keycode::Right => Key::Right,
        Keycode::Escape => Key::Escape,
        _ => Key::Other,
    }
}

fn map_mouse_button(button: MouseButton) -> u8 {
    match button {
        MouseButton::Left => 1,
        MouseButton::Middle => 2,
        MouseButton::Right => 3,
        _ => 0,
    }
}

// The window, its GL context and SDL's event queue.
pub struct SdlPlatform {
    _sdl: sdl2::Sdl,
    context: RenderContext,
    event_pump: sdl2::EventPump,
    buttons: u32,
}

impl SdlPlatform {
    pub fn new(asset_dir: PathBuf) -> anyhow::Result<SdlPlatform> {
        let sdl = sdl2::init().map_err(|msg| anyhow!(msg))?;
        let video = sdl.video().map_err(|msg| anyhow!(msg))?;

        // Half the display wide, most of it tall.
        let display = video
            .current_display_mode(0)
            .map_err(|msg| anyhow!(msg))?;
        let size = ((display.w / 2) as u32, (display.h * 4 / 5) as u32);
        log::info!("Window {}x{} on a {}x{} display", size.0, size.1, display.w, display.h);

        let context = RenderContext::new(&video, TITLE, size, asset_dir)?;
        let event_pump = sdl.event_pump().map_err(|msg| anyhow!(msg))?;
        Ok(SdlPlatform {
            _sdl: sdl,
            context,
            event_pump,
            buttons: 0,
        })
    }
}

impl InputSource for SdlPlatform {
    fn poll_event(&mut self) -> Option<Event> {
        while let Some(event) = self.event_pump.poll_event() {
            match event {
                SdlEvent::Quit { .. } => return Some(Event::Quit),
                SdlEvent::KeyDown {
                    keycode: Some(keycode),
                    repeat,
                    ..
                } => {
                    let key = map_key(keycode);
                    self.buttons |= key.control_mask();
                    if !repeat {
                        return Some(Event::KeyDown(key));
                    }
                }
                SdlEvent::KeyUp {
                    keycode: Some(keycode),
                    ..
                } => {
                    self.buttons &= !map_key(keycode).control_mask();
                }
                SdlEvent::MouseButtonUp {
                    mouse_btn, x, y, ..
                } => {
                    return Some(Event::PointerUp {
                        button: map_mouse_button(mouse_btn),
                        x,
                        y,
                    });
                }
                _ => {}
            }
        }

        None
    }

    fn buttons(&self) -> u32 {
        self.buttons
    }
}

impl AssetLoader for SdlPlatform {
    fn load_image(&mut self, name: &str, size: Option<(u32, u32)>) -> anyhow::Result<Image> {
        self.context.load_image(name, size)
    }

    fn load_mask(&mut self, name: &str, color_key: [u8; 3]) -> anyhow::Result<BitmapMask> {
        self.context.load_mask(name, color_key)
    }
}

impl RenderTarget for SdlPlatform {
    fn fill(&mut self, color: Color) {
        self.context.fill(color);
    }

    fn blit(&mut self, image: &Image, position: (i32, i32), flip_h: bool) {
        self.context.blit(image, position, flip_h);
    }

    fn draw_rect(&mut self, color: Color, rect: Rect<i32>) {
        self.context.draw_rect(color, rect);
    }

    fn size(&self) -> (i32, i32) {
        self.context.size()
    }

    fn present(&mut self) {
        self.context.present();
    }
}
