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

// A platform with no window.
//
// Images come from an in-memory table instead of files, drawing is
// recorded instead of rasterized, and input is a script with one entry per
// frame. Presenting a frame moves the script on to the next entry; once the
// script runs out the platform reports a quit.

use crate::gfx::{AssetLoader, Color, Image, RenderTarget, SurfaceId};
use crate::input::{Event, InputSource};
use crate::mask::BitmapMask;
use crate::util::Rect;
use anyhow::anyhow;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use std::collections::{HashMap, VecDeque};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCall {
    Fill(Color),
    Blit {
        surface: SurfaceId,
        position: (i32, i32),
        flip_h: bool,
    },
    Rect(Color, Rect<i32>),
}

// Input for one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptedFrame {
    pub events: Vec<Event>,
    pub buttons: u32,
}

impl ScriptedFrame {
    pub fn idle() -> ScriptedFrame {
        ScriptedFrame::default()
    }

    pub fn held(buttons: u32) -> ScriptedFrame {
        ScriptedFrame {
            events: Vec::new(),
            buttons,
        }
    }

    pub fn events(events: &[Event]) -> ScriptedFrame {
        ScriptedFrame {
            events: events.to_vec(),
            buttons: 0,
        }
    }
}

pub struct HeadlessPlatform {
    width: i32,
    height: i32,
    images: HashMap<String, RgbaImage>,
    fallback_size: Option<(u32, u32)>,
    next_surface: usize,
    cache: HashMap<(String, Option<(u32, u32)>), Image>,
    loaded: Vec<String>,
    draw_calls: Vec<DrawCall>,
    last_frame: Vec<DrawCall>,
    frames_presented: usize,
    script: VecDeque<ScriptedFrame>,
    pending: VecDeque<Event>,
    buttons: u32,
}

impl HeadlessPlatform {
    pub fn new(width: i32, height: i32) -> HeadlessPlatform {
        HeadlessPlatform {
            width,
            height,
            images: HashMap::new(),
            fallback_size: None,
            next_surface: 0,
            cache: HashMap::new(),
            loaded: Vec::new(),
            draw_calls: Vec::new(),
            last_frame: Vec::new(),
            frames_presented: 0,
            script: VecDeque::new(),
            pending: VecDeque::new(),
            buttons: 0,
        }
    }

    // Images that were never inserted are synthesized as opaque gray boxes
    // of this size instead of failing. Masks are never synthesized.
    pub fn with_fallback_size(mut self, size: (u32, u32)) -> HeadlessPlatform {
        self.fallback_size = Some(size);
        self
    }

    // Replaces any remaining script. The first entry is the current frame's
    // input.
    pub fn with_script(mut self, frames: impl IntoIterator<Item = ScriptedFrame>) -> HeadlessPlatform {
        self.script = frames.into_iter().collect();
        self.next_frame_input();
        self
    }

    pub fn insert_image(&mut self, name: &str, image: RgbaImage) {
        self.cache.retain(|(cached, _), _| cached != name);
        self.images.insert(name.to_string(), image);
    }

    // Names actually loaded, in order. Cache hits are not listed.
    pub fn loaded_names(&self) -> &[String] {
        &self.loaded
    }

    // Draw calls since the last present.
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    // Draw calls of the most recently presented frame.
    pub fn last_frame(&self) -> &[DrawCall] {
        &self.last_frame
    }

    pub fn frames_presented(&self) -> usize {
        self.frames_presented
    }

    fn next_frame_input(&mut self) {
        match self.script.pop_front() {
            Some(frame) => {
                self.pending = frame.events.into();
                self.buttons = frame.buttons;
            }
            None => {
                self.pending = VecDeque::from([Event::Quit]);
                self.buttons = 0;
            }
        }
    }

    fn source_image(&self, name: &str) -> anyhow::Result<RgbaImage> {
        if let Some(image) = self.images.get(name) {
            return Ok(image.clone());
        }

        match self.fallback_size {
            Some((w, h)) => Ok(RgbaImage::from_pixel(w, h, Rgba([128, 128, 128, 255]))),
            None => Err(anyhow!("no image named {}", name)),
        }
    }
}

impl AssetLoader for HeadlessPlatform {
    fn load_image(&mut self, name: &str, size: Option<(u32, u32)>) -> anyhow::Result<Image> {
        let key = (name.to_string(), size);
        if let Some(image) = self.cache.get(&key) {
            return Ok(image.clone());
        }

        let mut image = self.source_image(name)?;
        if let Some((w, h)) = size {
            image = imageops::resize(&image, w, h, FilterType::Nearest);
        }

        let surface = SurfaceId(self.next_surface);
        self.next_surface += 1;
        self.loaded.push(name.to_string());
        let image = Image {
            surface,
            mask: BitmapMask::from_alpha(&image),
        };
        self.cache.insert(key, image.clone());
        Ok(image)
    }

    fn load_mask(&mut self, name: &str, color_key: [u8; 3]) -> anyhow::Result<BitmapMask> {
        let image = self
            .images
            .get(name)
            .ok_or_else(|| anyhow!("no mask image named {}", name))?;
        Ok(BitmapMask::from_color_key(image, color_key))
    }
}

impl RenderTarget for HeadlessPlatform {
    fn fill(&mut self, color: Color) {
        self.draw_calls.push(DrawCall::Fill(color));
    }

    fn blit(&mut self, image: &Image, position: (i32, i32), flip_h: bool) {
        self.draw_calls.push(DrawCall::Blit {
            surface: image.surface,
            position,
            flip_h,
        });
    }

    fn draw_rect(&mut self, color: Color, rect: Rect<i32>) {
        self.draw_calls.push(DrawCall::Rect(color, rect));
    }

    fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    fn present(&mut self) {
        self.last_frame = std::mem::take(&mut self.draw_calls);
        self.frames_presented += 1;
        self.next_frame_input();
    }
}

impl InputSource for HeadlessPlatform {
    fn poll_event(&mut self) -> Option<Event> {
        self.pending.pop_front()
    }

    fn buttons(&self) -> u32 {
        self.buttons
    }
}

// Render a mask as a terrain-style image: black where opaque, white
// elsewhere. Useful for feeding masks back through the asset loader.
pub fn mask_image(mask: &BitmapMask) -> RgbaImage {
    RgbaImage::from_fn(mask.width() as u32, mask.height() as u32, |x, y| {
        if mask.opaque_at(x as i32, y as i32).unwrap_or(false) {
            Rgba([0, 0, 0, 255])
        } else {
            Rgba([255, 255, 255, 255])
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::STAGE_COLOR_KEY;
    use crate::input::{Key, CONTROL_LEFT};

    #[test]
    fn test_mask_image_round_trip() {
        let mask = BitmapMask::from_rows(&["#..", ".##"]);
        let image = mask_image(&mask);
        assert_eq!(BitmapMask::from_color_key(&image, STAGE_COLOR_KEY), mask);
        assert_eq!(BitmapMask::from_alpha(&image).count(), 6);
    }

    #[test]
    fn test_missing_image_without_fallback_fails() {
        let mut platform = HeadlessPlatform::new(10, 10);
        assert!(platform.load_image("ghost", None).is_err());
        assert!(platform.loaded_names().is_empty());
    }

    #[test]
    fn test_fallback_and_resize() {
        let mut platform = HeadlessPlatform::new(10, 10).with_fallback_size((3, 2));
        let a = platform.load_image("a", None).unwrap();
        let b = platform.load_image("b", Some((7, 5))).unwrap();
        assert_eq!((a.width(), a.height()), (3, 2));
        assert_eq!((b.width(), b.height()), (7, 5));
        assert_ne!(a.surface, b.surface);
        assert!(platform.load_mask("a", STAGE_COLOR_KEY).is_err());
    }

    #[test]
    fn test_reload_reuses_surface() {
        let mut platform = HeadlessPlatform::new(10, 10).with_fallback_size((3, 2));
        let first = platform.load_image("a", None).unwrap();
        let again = platform.load_image("a", None).unwrap();
        let scaled = platform.load_image("a", Some((6, 4))).unwrap();
        assert_eq!(first.surface, again.surface);
        assert_ne!(first.surface, scaled.surface);
        assert_eq!(platform.loaded_names(), ["a", "a"]);

        // Replacing the source drops the cached copy.
        platform.insert_image("a", RgbaImage::new(5, 5));
        let replaced = platform.load_image("a", None).unwrap();
        assert_ne!(replaced.surface, first.surface);
        assert_eq!(replaced.width(), 5);
    }

    #[test]
    fn test_script_advances_on_present() {
        let mut platform = HeadlessPlatform::new(10, 10).with_script([
            ScriptedFrame::events(&[Event::KeyDown(Key::Up), Event::KeyDown(Key::Escape)]),
            ScriptedFrame::held(CONTROL_LEFT),
        ]);

        assert_eq!(platform.poll_event(), Some(Event::KeyDown(Key::Up)));
        assert_eq!(platform.poll_event(), Some(Event::KeyDown(Key::Escape)));
        assert_eq!(platform.poll_event(), None);
        assert_eq!(platform.buttons(), 0);

        platform.fill(Color::WHITE);
        platform.present();
        assert_eq!(platform.poll_event(), None);
        assert_eq!(platform.buttons(), CONTROL_LEFT);
        assert_eq!(platform.last_frame(), [DrawCall::Fill(Color::WHITE)]);
        assert!(platform.draw_calls().is_empty());

        platform.present();
        assert_eq!(platform.poll_event(), Some(Event::Quit));
        assert_eq!(platform.frames_presented(), 2);
    }
}
