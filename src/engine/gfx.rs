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

// The simulation never talks to a window directly. These traits are what a
// front end (the SDL/OpenGL one in the game binary, or the headless one used
// by tests) provides.

use crate::mask::BitmapMask;
use crate::util::Rect;

// Terrain maps are painted on white; white pixels are empty space.
pub const STAGE_COLOR_KEY: [u8; 3] = [255, 255, 255];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

// Opaque handle to something the render target knows how to draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceId(pub usize);

// A drawable surface plus the opacity mask of its pixels. Width and height
// are the mask's.
#[derive(Clone, Debug)]
pub struct Image {
    pub surface: SurfaceId,
    pub mask: BitmapMask,
}

impl Image {
    pub fn width(&self) -> i32 {
        self.mask.width()
    }

    pub fn height(&self) -> i32 {
        self.mask.height()
    }

    pub fn rect_at(&self, x: i32, y: i32) -> Rect<i32> {
        Rect::new(x, y, self.width(), self.height())
    }
}

pub trait AssetLoader {
    // Load `name` (a path relative to the asset directory, no extension),
    // optionally scaled to `size`. Fails if the asset is missing or corrupt.
    // Loading the same name and size again returns the same surface.
    fn load_image(&mut self, name: &str, size: Option<(u32, u32)>) -> anyhow::Result<Image>;

    // Load `name` as a bare mask: opaque pixels that do not match `color_key`.
    fn load_mask(&mut self, name: &str, color_key: [u8; 3]) -> anyhow::Result<BitmapMask>;
}

pub trait RenderTarget {
    fn fill(&mut self, color: Color);
    fn blit(&mut self, image: &Image, position: (i32, i32), flip_h: bool);
    fn draw_rect(&mut self, color: Color, rect: Rect<i32>);
    fn size(&self) -> (i32, i32);
    fn present(&mut self);
}

// Everything a scene needs from the outside world.
pub trait Context: AssetLoader + RenderTarget {}

impl<T: AssetLoader + RenderTarget + ?Sized> Context for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_to_f32() {
        assert_eq!(Color::WHITE.to_f32(), [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(Color::rgba(0, 51, 0, 0).to_f32(), [0.0, 0.2, 0.0, 0.0]);
    }

    #[test]
    fn test_image_rect() {
        let image = Image {
            surface: SurfaceId(3),
            mask: BitmapMask::filled(8, 5),
        };
        assert_eq!(image.rect_at(10, 20), Rect::new(10, 20, 8, 5));
    }
}
