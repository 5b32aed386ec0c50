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

use crate::gfx::{AssetLoader, Image, RenderTarget, STAGE_COLOR_KEY};
use crate::mask::BitmapMask;
use anyhow::{bail, Context as _};

// Level terrain. Assets come in pairs:
//    <name>.png       what is drawn
//    <name>_mask.png  what is solid (anything not white)
#[derive(Debug)]
pub struct Stage {
    background: Option<Image>,
    mask: BitmapMask,
}

impl Stage {
    // Terrain with nothing to draw.
    pub fn new(mask: BitmapMask) -> Stage {
        Stage {
            background: None,
            mask,
        }
    }

    pub fn load<L: AssetLoader + ?Sized>(loader: &mut L, name: &str) -> anyhow::Result<Stage> {
        let background = loader
            .load_image(name, None)
            .with_context(|| format!("loading stage image {}", name))?;
        let mask_name = format!("{}_mask", name);
        let mask = loader
            .load_mask(&mask_name, STAGE_COLOR_KEY)
            .with_context(|| format!("loading stage mask {}", mask_name))?;

        if background.mask.size() != mask.size() {
            bail!(
                "stage {} is {:?} but its mask is {:?}",
                name,
                background.mask.size(),
                mask.size()
            );
        }

        log::debug!(
            "Loaded stage {} ({}x{}, {} solid pixels)",
            name,
            mask.width(),
            mask.height(),
            mask.count()
        );

        Ok(Stage {
            background: Some(background),
            mask,
        })
    }

    pub fn mask(&self) -> &BitmapMask {
        &self.mask
    }

    pub fn width(&self) -> i32 {
        self.mask.width()
    }

    pub fn height(&self) -> i32 {
        self.mask.height()
    }

    // Anything outside the map counts as empty.
    pub fn solid_at(&self, x: i32, y: i32) -> bool {
        self.mask.opaque_at(x, y).unwrap_or(false)
    }

    pub fn draw<R: RenderTarget + ?Sized>(&self, target: &mut R) {
        if let Some(background) = &self.background {
            target.blit(background, (0, 0), false);
        }
    }
}
