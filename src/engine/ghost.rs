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

use crate::animation::Animation;
use crate::entity::Body;
use crate::gfx::{AssetLoader, RenderTarget};
use crate::mask::BitmapMask;
use crate::player::Player;
use crate::tuning::Tuning;
use glam::Vec2;

const GHOST_FRAMES: usize = 2;

// Which way the sprite looks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Heading {
    Up,
    Right,
    Down,
    Left,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::Up, Heading::Right, Heading::Down, Heading::Left];

    pub fn name(self) -> &'static str {
        match self {
            Heading::Up => "up",
            Heading::Right => "right",
            Heading::Down => "down",
            Heading::Left => "left",
        }
    }
}

// Face along whichever axis the target is further away on. Ties go to the
// vertical axis.
pub fn heading_toward(delta: Vec2) -> Heading {
    if delta.x.abs() > delta.y.abs() {
        if delta.x < 0.0 {
            Heading::Left
        } else {
            Heading::Right
        }
    } else if delta.y < 0.0 {
        Heading::Up
    } else {
        Heading::Down
    }
}

// Accelerate `velocity` by `acceleration` in the direction of `toward`, then
// scale it down uniformly if it is faster than `max_speed`.
pub fn steer(velocity: Vec2, toward: Vec2, acceleration: f32, max_speed: f32) -> Vec2 {
    (velocity + toward.normalize_or_zero() * acceleration).clamp_length_max(max_speed)
}

// Pursuer that drifts through terrain toward the player.
pub struct Ghost {
    pub body: Body,
    // Sub-pixel position. The body's rect is this, truncated.
    position: Vec2,
    pub heading: Heading,
    color: String,
    animation: Animation<Heading>,
    tuning: Tuning,
}

impl Ghost {
    pub fn new(x: i32, y: i32, color: &str, tuning: &Tuning) -> Ghost {
        let (width, height) = tuning.ghost_size;
        Ghost {
            body: Body::new(x, y, width as i32, height as i32),
            position: Vec2::new(x as f32, y as f32),
            heading: Heading::Down,
            color: color.to_string(),
            animation: Animation::new(Heading::Down, tuning.frame_time),
            tuning: *tuning,
        }
    }

    // Sprites are ghosts/<color>_<heading>_<n>
    pub fn load<L: AssetLoader + ?Sized>(
        loader: &mut L,
        x: i32,
        y: i32,
        color: &str,
        tuning: &Tuning,
    ) -> anyhow::Result<Ghost> {
        let mut ghost = Ghost::new(x, y, color, tuning);
        let prefixes: Vec<(Heading, String)> = Heading::ALL
            .iter()
            .map(|&heading| (heading, format!("ghosts/{}_{}", color, heading.name())))
            .collect();
        let groups: Vec<(Heading, &str, usize)> = prefixes
            .iter()
            .map(|(heading, prefix)| (*heading, prefix.as_str(), GHOST_FRAMES))
            .collect();
        ghost.animation = Animation::load(
            loader,
            Heading::Down,
            tuning.frame_time,
            &groups,
            Some(tuning.ghost_size),
        )?;
        Ok(ghost)
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn set_position(&mut self, x: i32, y: i32) {
        self.position = Vec2::new(x as f32, y as f32);
        self.sync_rect();
    }

    fn sync_rect(&mut self) {
        self.body.rect.left = self.position.x.floor() as i32;
        self.body.rect.top = self.position.y.floor() as i32;
    }

    pub fn update(&mut self, target: Vec2, d_t: f32) {
        let scale = d_t * self.tuning.time_scale;
        let toward = target - self.body.center();
        self.body.velocity = steer(
            self.body.velocity,
            toward,
            self.tuning.ghost_acceleration * scale,
            self.tuning.ghost_max_speed,
        );
        self.position += self.body.velocity * scale;
        self.sync_rect();

        self.heading = heading_toward(toward);
        self.animation.set_group(self.heading);
        self.animation.tick(d_t);
    }

    pub fn silhouette(&self) -> &BitmapMask {
        self.animation.mask(false).unwrap_or(&self.body.mask)
    }

    // Pixel-accurate test against the player's current frame.
    pub fn catches(&self, player: &Player) -> bool {
        if !self.body.rect.overlaps(&player.body.rect) {
            return false;
        }

        let offset = (
            self.body.rect.left - player.body.rect.left,
            self.body.rect.top - player.body.rect.top,
        );
        player.silhouette().overlaps(self.silhouette(), offset)
    }

    pub fn draw<R: RenderTarget + ?Sized>(&self, target: &mut R) {
        self.animation.draw(target, self.body.position(), false);
    }
}
