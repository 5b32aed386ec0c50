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

use crate::mask::BitmapMask;
use crate::util::Rect;
use glam::Vec2;

// Moving actor: integer pixel box, real-valued velocity, and the mask used
// to test the box against terrain. Velocity is in tuned units per nominal
// frame; see `scaled_delta`.
#[derive(Clone, Debug)]
pub struct Body {
    pub rect: Rect<i32>,
    pub velocity: Vec2,
    pub mask: BitmapMask,
}

impl Body {
    // Body with a solid rectangular mask covering its whole box.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Body {
        Body {
            rect: Rect::new(x, y, width, height),
            velocity: Vec2::ZERO,
            mask: BitmapMask::filled(width, height),
        }
    }

    pub fn position(&self) -> (i32, i32) {
        (self.rect.left, self.rect.top)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.rect.left as f32 + self.rect.width as f32 / 2.0,
            self.rect.top as f32 + self.rect.height as f32 / 2.0,
        )
    }
}

// Whole-pixel displacement for one frame. Truncates toward zero; the
// fractional part is not carried in position.
pub fn scaled_delta(velocity: f32, d_t: f32, time_scale: f32) -> i32 {
    (velocity * d_t * time_scale) as i32
}
