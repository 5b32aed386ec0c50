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

use crate::animation::{select, Animation, Rule};
use crate::collision::{self, Contact};
use crate::entity::{scaled_delta, Body};
use crate::gfx::{AssetLoader, RenderTarget};
use crate::input::{held, Key, CONTROL_LEFT, CONTROL_RIGHT};
use crate::mask::BitmapMask;
use crate::stage::Stage;
use crate::tuning::Tuning;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pose {
    Stand,
    Walk,
    Jump,
    Fall,
    Dunk,
}

// Sprite sets: player/dino_<pose>_<n>
const POSE_FRAMES: [(Pose, &str, usize); 5] = [
    (Pose::Stand, "player/dino_stand", 4),
    (Pose::Walk, "player/dino_walk", 6),
    (Pose::Jump, "player/dino_jump", 1),
    (Pose::Fall, "player/dino_fall", 1),
    (Pose::Dunk, "player/dino_dunk", 1),
];

fn is_dunked(player: &Player) -> bool {
    player.dunked
}

fn is_falling(player: &Player) -> bool {
    !player.on_ground && player.body.velocity.y > 0.0
}

fn is_airborne(player: &Player) -> bool {
    !player.on_ground
}

fn is_walking(player: &Player) -> bool {
    player.body.velocity.x != 0.0
}

fn is_standing(player: &Player) -> bool {
    player.on_ground
}

const POSE_RULES: [Rule<Player, Pose>; 5] = [
    Rule {
        when: is_dunked,
        group: Pose::Dunk,
    },
    Rule {
        when: is_falling,
        group: Pose::Fall,
    },
    Rule {
        when: is_airborne,
        group: Pose::Jump,
    },
    Rule {
        when: is_walking,
        group: Pose::Walk,
    },
    Rule {
        when: is_standing,
        group: Pose::Stand,
    },
];

pub struct Player {
    pub body: Body,
    pub on_ground: bool,
    // Fast-fall engaged. Locks out horizontal motion and gravity until the
    // next landing.
    pub dunked: bool,
    pub facing_left: bool,
    animation: Animation<Pose>,
    tuning: Tuning,
}

impl Player {
    // A player without sprites. Collides with its box.
    pub fn new(x: i32, y: i32, tuning: &Tuning) -> Player {
        let (width, height) = tuning.player_size;
        Player {
            body: Body::new(x, y, width as i32, height as i32),
            on_ground: false,
            dunked: false,
            facing_left: false,
            animation: Animation::new(Pose::Stand, tuning.frame_time),
            tuning: *tuning,
        }
    }

    pub fn load<L: AssetLoader + ?Sized>(
        loader: &mut L,
        x: i32,
        y: i32,
        tuning: &Tuning,
    ) -> anyhow::Result<Player> {
        let mut player = Player::new(x, y, tuning);
        player.animation = Animation::load(
            loader,
            Pose::Stand,
            tuning.frame_time,
            &POSE_FRAMES,
            Some(tuning.player_size),
        )?;
        Ok(player)
    }

    pub fn set_horizontal_intent(&mut self, left: bool, right: bool) {
        let mut vx = 0.0;
        if left {
            vx -= self.tuning.player_speed;
        }

        if right {
            vx += self.tuning.player_speed;
        }

        self.body.velocity.x = vx;
        if vx != 0.0 {
            self.facing_left = vx < 0.0;
        }
    }

    pub fn handle_buttons(&mut self, buttons: u32) {
        self.set_horizontal_intent(held(buttons, CONTROL_LEFT), held(buttons, CONTROL_RIGHT));
    }

    pub fn handle_key(&mut self, key: Key) {
        match key {
            Key::Up => {
                self.jump();
            }
            Key::Down => {
                self.dunk();
            }
            _ => {}
        }
    }

    // Returns false if not standing on anything.
    pub fn jump(&mut self) -> bool {
        if !self.on_ground {
            return false;
        }

        self.body.velocity.y = self.tuning.jump_impulse;
        self.on_ground = false;
        true
    }

    // Returns false if on the ground or already dunking.
    pub fn dunk(&mut self) -> bool {
        if self.on_ground || self.dunked {
            return false;
        }

        self.body.velocity.y = self.tuning.dunk_speed;
        self.dunked = true;
        true
    }

    // Move one frame through `stage`, applying gravity while airborne, and
    // update ground state from what was hit.
    pub fn advance(&mut self, stage: &Stage, d_t: f32) -> Contact {
        let time_scale = self.tuning.time_scale;
        let max_fall = self.tuning.max_fall_speed;
        let velocity = &mut self.body.velocity;
        if !self.on_ground && !self.dunked && velocity.y < max_fall {
            velocity.y = (velocity.y + self.tuning.gravity * d_t * time_scale).min(max_fall);
        }

        let dx = if self.dunked {
            0
        } else {
            scaled_delta(velocity.x, d_t, time_scale)
        };
        let dy = scaled_delta(velocity.y, d_t, time_scale);

        let contact = collision::resolve(&mut self.body, stage, (dx, dy));
        if contact.floor {
            self.land();
        } else if contact.ceiling {
            self.body.velocity.y = 0.0;
        }

        // Rising bodies are never grounded, even when skimming a ledge.
        if self.body.velocity.y >= 0.0 {
            if contact.grounded {
                self.land();
            } else {
                self.on_ground = false;
            }
        }

        contact
    }

    fn land(&mut self) {
        self.on_ground = true;
        self.dunked = false;
        self.body.velocity.y = 0.0;
    }

    pub fn pose(&self) -> Pose {
        select(&POSE_RULES, self).unwrap_or(Pose::Stand)
    }

    pub fn animate(&mut self, d_t: f32) {
        let pose = self.pose();
        self.animation.set_group(pose);
        self.animation.tick(d_t);
    }

    // Shape of the current animation frame, or the collision box if there
    // are no sprites.
    pub fn silhouette(&self) -> &BitmapMask {
        self.animation
            .mask(self.facing_left)
            .unwrap_or(&self.body.mask)
    }

    pub fn draw<R: RenderTarget + ?Sized>(&self, target: &mut R) {
        self.animation
            .draw(target, self.body.position(), self.facing_left);
    }
}
