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

use crate::gfx::{AssetLoader, Image, RenderTarget};
use crate::util::Rect;
use anyhow::Context as _;

pub struct Interpolator {
    t: f32,
    max_t: f32,
    start_value: f32,
    end_value: f32,
    easing_fn: fn(f32) -> f32,
}

pub fn cubic_inout(x: f32) -> f32 {
    if x < 0.5 {
        4.0 * x * x * x
    } else {
        1.0 - (-2.0 * x + 2.0).powf(3.0) / 2.0
    }
}

impl Interpolator {
    pub fn new(value: f32, easing_fn: fn(f32) -> f32) -> Interpolator {
        Interpolator {
            t: 1.0,
            max_t: 1.0,
            start_value: value,
            end_value: value,
            easing_fn,
        }
    }

    pub fn start(&mut self, time: f32, start: f32, end: f32) {
        self.start_value = start;
        self.end_value = end;
        self.t = 0.0;
        self.max_t = time;
    }

    pub fn is_done(&self) -> bool {
        self.t >= self.max_t
    }

    pub fn update(&mut self, d_t: f32) -> f32 {
        if self.t < self.max_t {
            self.t = (self.t + d_t).min(self.max_t);
            let x = self.t / self.max_t;
            self.start_value + (self.easing_fn)(x) * (self.end_value - self.start_value)
        } else {
            self.end_value
        }
    }
}

// A clickable image. Clicks only count on its opaque pixels.
pub struct Button<A> {
    image: Image,
    rect: Rect<i32>,
    action: A,
}

impl<A: Copy> Button<A> {
    pub fn new(image: Image, center: (i32, i32), action: A) -> Button<A> {
        let rect = Rect::centered_at(center.0, center.1, image.width(), image.height());
        Button {
            image,
            rect,
            action,
        }
    }

    pub fn rect(&self) -> Rect<i32> {
        self.rect
    }

    pub fn action(&self) -> A {
        self.action
    }

    pub fn hit(&self, x: i32, y: i32) -> bool {
        self.rect.contains(x, y)
            && self
                .image
                .mask
                .opaque_at(x - self.rect.left, y - self.rect.top)
                .unwrap_or(false)
    }

    pub fn draw<R: RenderTarget + ?Sized>(&self, target: &mut R) {
        target.blit(&self.image, (self.rect.left, self.rect.top), false);
    }
}

// Buttons stacked down the middle of the screen.
pub struct ButtonColumn<A> {
    buttons: Vec<Button<A>>,
}

impl<A: Copy> ButtonColumn<A> {
    // Each entry is (image name, vertical offset from screen center, action).
    pub fn load<L: AssetLoader + ?Sized>(
        loader: &mut L,
        screen: (i32, i32),
        entries: &[(&str, i32, A)],
    ) -> anyhow::Result<ButtonColumn<A>> {
        let (width, height) = screen;
        let mut buttons = Vec::with_capacity(entries.len());
        for &(name, offset, action) in entries {
            let image = loader
                .load_image(name, None)
                .with_context(|| format!("loading button {}", name))?;
            buttons.push(Button::new(image, (width / 2, height / 2 + offset), action));
        }

        Ok(ButtonColumn { buttons })
    }

    pub fn buttons(&self) -> &[Button<A>] {
        &self.buttons
    }

    // Action of the first button under the point, if any.
    pub fn hit(&self, x: i32, y: i32) -> Option<A> {
        self.buttons
            .iter()
            .find(|button| button.hit(x, y))
            .map(Button::action)
    }

    pub fn draw<R: RenderTarget + ?Sized>(&self, target: &mut R) {
        for button in &self.buttons {
            button.draw(target);
        }
    }
}
