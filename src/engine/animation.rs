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
use crate::mask::BitmapMask;
use anyhow::Context as _;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

pub struct Frame {
    pub image: Image,
    pub mirrored_mask: BitmapMask,
}

impl Frame {
    pub fn new(image: Image) -> Frame {
        let mirrored_mask = image.mask.mirrored();
        Frame {
            image,
            mirrored_mask,
        }
    }

    pub fn mask(&self, mirrored: bool) -> &BitmapMask {
        if mirrored {
            &self.mirrored_mask
        } else {
            &self.image.mask
        }
    }
}

// Selects animation group `group` whenever `when` holds for the entity.
pub struct Rule<E, K> {
    pub when: fn(&E) -> bool,
    pub group: K,
}

// Evaluate rules in order. The first one that matches wins.
pub fn select<E, K: Copy>(rules: &[Rule<E, K>], entity: &E) -> Option<K> {
    rules
        .iter()
        .find(|rule| (rule.when)(entity))
        .map(|rule| rule.group)
}

// A set of named, looping frame sequences, one of which is current.
pub struct Animation<K> {
    groups: HashMap<K, Vec<Frame>>,
    group: K,
    index: usize,
    time: f32,
    frame_time: f32,
}

impl<K: Copy + Eq + Hash + Debug> Animation<K> {
    pub fn new(initial: K, frame_time: f32) -> Animation<K> {
        Animation {
            groups: HashMap::new(),
            group: initial,
            index: 0,
            time: 0.0,
            frame_time,
        }
    }

    // Load each group's frames, named `<prefix>_0`, `<prefix>_1`, ...
    // `groups` lists (key, prefix, frame count).
    pub fn load<L: AssetLoader + ?Sized>(
        loader: &mut L,
        initial: K,
        frame_time: f32,
        groups: &[(K, &str, usize)],
        size: Option<(u32, u32)>,
    ) -> anyhow::Result<Animation<K>> {
        let mut animation = Animation::new(initial, frame_time);
        for &(key, prefix, count) in groups {
            let mut frames = Vec::with_capacity(count);
            for i in 0..count {
                let name = format!("{}_{}", prefix, i);
                let image = loader
                    .load_image(&name, size)
                    .with_context(|| format!("loading animation frame {}", name))?;
                frames.push(Frame::new(image));
            }

            animation.add_group(key, frames);
        }

        Ok(animation)
    }

    pub fn add_group(&mut self, key: K, frames: Vec<Frame>) {
        self.groups.insert(key, frames);
    }

    pub fn group(&self) -> K {
        self.group
    }

    pub fn index(&self) -> usize {
        self.index
    }

    // Switching to a different group restarts it from its first frame.
    pub fn set_group(&mut self, key: K) {
        if key == self.group {
            return;
        }

        if !self.groups.contains_key(&key) {
            log::debug!("Animation has no group {:?}, keeping {:?}", key, self.group);
            return;
        }

        self.group = key;
        self.index = 0;
        self.time = 0.0;
    }

    // Advances at most one frame per call.
    pub fn tick(&mut self, d_t: f32) {
        if self.frame_time <= 0.0 {
            return;
        }

        self.time += d_t;
        if self.time > self.frame_time {
            let count = self.groups.get(&self.group).map_or(0, Vec::len);
            if count > 0 {
                self.index = (self.index + 1) % count;
            }

            self.time %= self.frame_time;
        }
    }

    pub fn frame(&self) -> Option<&Frame> {
        self.groups.get(&self.group)?.get(self.index)
    }

    pub fn mask(&self, mirrored: bool) -> Option<&BitmapMask> {
        self.frame().map(|frame| frame.mask(mirrored))
    }

    pub fn draw<R: RenderTarget + ?Sized>(&self, target: &mut R, position: (i32, i32), mirrored: bool) {
        if let Some(frame) = self.frame() {
            target.blit(&frame.image, position, mirrored);
        }
    }
}
