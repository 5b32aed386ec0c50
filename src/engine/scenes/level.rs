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

use crate::gfx::{Color, Context};
use crate::ghost::Ghost;
use crate::input::{Event, Key};
use crate::levels::{self, LevelInfo};
use crate::player::Player;
use crate::scene::{Carry, LevelId, Scene, SceneId, Transition};
use crate::stage::Stage;
use crate::tuning::Tuning;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

struct World {
    stage: Stage,
    player: Player,
    ghosts: Vec<Ghost>,
}

pub struct Level {
    info: &'static LevelInfo,
    tuning: Tuning,
    transition: Transition,
    world: Option<World>,
    rng: Pcg32,
}

impl Level {
    pub fn new(id: LevelId, tuning: &Tuning) -> Level {
        Level::with_seed(id, tuning, rand::random())
    }

    // Ghost placement after a descent is drawn from this seed.
    pub fn with_seed(id: LevelId, tuning: &Tuning, seed: u64) -> Level {
        Level {
            info: levels::info(id),
            tuning: *tuning,
            transition: Transition::default(),
            world: None,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn player(&self) -> Option<&Player> {
        self.world.as_ref().map(|world| &world.player)
    }

    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.world.as_mut().map(|world| &mut world.player)
    }

    pub fn ghosts(&self) -> &[Ghost] {
        match self.world.as_ref() {
            Some(world) => world.ghosts.as_slice(),
            None => &[],
        }
    }

    pub fn ghosts_mut(&mut self) -> &mut [Ghost] {
        match self.world.as_mut() {
            Some(world) => world.ghosts.as_mut_slice(),
            None => &mut [],
        }
    }

    fn scatter_ghosts(world: &mut World, rng: &mut Pcg32) {
        let width = world.stage.width();
        let height = world.stage.height();
        for ghost in &mut world.ghosts {
            ghost.set_position(rng.random_range(0..=width), rng.random_range(0..=height));
        }
    }
}

impl Scene for Level {
    fn id(&self) -> SceneId {
        SceneId::Level(self.info.id)
    }

    fn transition(&self) -> &Transition {
        &self.transition
    }

    fn transition_mut(&mut self) -> &mut Transition {
        &mut self.transition
    }

    fn startup(&mut self, context: &mut dyn Context) -> anyhow::Result<()> {
        let name = self.info.id.name();
        let stage = Stage::load(context, name)?;
        let (x, y) = self.info.start;
        let player = Player::load(context, x, y, &self.tuning)?;
        let ghosts = self
            .info
            .ghosts
            .iter()
            .map(|spawn| Ghost::load(context, spawn.x, spawn.y, spawn.color, &self.tuning))
            .collect::<anyhow::Result<Vec<_>>>()?;

        log::info!("Starting {} with {} ghosts", name, ghosts.len());
        self.world = Some(World {
            stage,
            player,
            ghosts,
        });
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) {
        let Event::KeyDown(key) = *event else {
            return;
        };

        if key == Key::Escape {
            self.transition.goto_preserving(SceneId::Pause);
        } else if let Some(player) = self.player_mut() {
            player.handle_key(key);
        }
    }

    fn handle_buttons(&mut self, buttons: u32) {
        if let Some(player) = self.player_mut() {
            player.handle_buttons(buttons);
        }
    }

    fn update(&mut self, context: &mut dyn Context, d_t: f32) {
        let Some(world) = self.world.as_mut() else {
            return;
        };

        world.player.advance(&world.stage, d_t);
        world.player.animate(d_t);

        let target = world.player.body.center();
        let mut caught = false;
        for ghost in &mut world.ghosts {
            ghost.update(target, d_t);
            caught |= ghost.catches(&world.player);
        }

        let player = &mut world.player;
        if caught {
            log::info!("Caught by a ghost in {}", self.info.id.name());
            self.transition.goto(SceneId::Menu);
        } else if player.body.rect.top < 0 {
            player.body.rect.top = 0;
            player.body.velocity.y = 0.0;
            log::info!("Climbed out of {} to {}", self.info.id.name(), self.info.next);
            self.transition.goto_preserving(self.info.next);
        } else if !self.info.is_first && player.body.rect.bottom() > world.stage.height() {
            log::info!("Fell out of {}", self.info.id.name());
            self.transition.pop(Some(Carry {
                x: player.body.rect.left,
                vy: player.body.velocity.y,
                dunked: player.dunked,
            }));
        }

        context.fill(Color::WHITE);
        world.stage.draw(context);
        world.player.draw(context);
        for ghost in &world.ghosts {
            ghost.draw(context);
        }
    }

    // Arriving from above carries the player's fall into this level. Ghosts
    // are scattered so they don't ambush the entry point. Resuming from the
    // pause menu (no carry) leaves everything where it was.
    fn restart(&mut self, carry: Option<Carry>) {
        self.transition.reset();
        let (Some(carry), Some(world)) = (carry, self.world.as_mut()) else {
            return;
        };

        let max_left = (world.stage.width() - world.player.body.rect.width).max(0);
        let player = &mut world.player;
        player.body.rect.left = carry.x.clamp(0, max_left);
        player.body.velocity.y = carry.vy;
        player.dunked = carry.dunked;
        player.on_ground = false;

        Level::scatter_ghosts(world, &mut self.rng);
    }

    fn destroy(&mut self) {
        self.world = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{mask_image, DrawCall, HeadlessPlatform};
    use crate::mask::BitmapMask;

    const D_T: f32 = 1.0 / 125.0;

    // Registers a 1000x900 stage for every level, floored at y=815 so
    // level 1's player starts standing on it.
    fn platform() -> HeadlessPlatform {
        let terrain = BitmapMask::from_fn(1000, 900, |_, y| y >= 815);
        let mut platform = HeadlessPlatform::new(1000, 900).with_fallback_size((16, 16));
        for id in LevelId::ALL {
            platform.insert_image(id.name(), mask_image(&BitmapMask::filled(1000, 900)));
            platform.insert_image(&format!("{}_mask", id.name()), mask_image(&terrain));
        }

        platform
    }

    fn started(id: LevelId, platform: &mut HeadlessPlatform) -> Level {
        let mut level = Level::with_seed(id, &Tuning::default(), 7);
        level.startup(platform).unwrap();
        level
    }

    #[test]
    fn test_startup_places_actors() {
        let mut platform = platform();
        let level = started(LevelId::One, &mut platform);
        assert_eq!(level.player().unwrap().body.position(), (480, 764));
        assert_eq!(level.ghosts().len(), 1);
        assert_eq!(level.ghosts()[0].body.position(), (500, 100));
    }

    #[test]
    fn test_missing_stage_fails_startup() {
        let mut platform = HeadlessPlatform::new(100, 100).with_fallback_size((16, 16));
        let mut level = Level::new(LevelId::Two, &Tuning::default());
        assert!(level.startup(&mut platform).is_err());
    }

    #[test]
    fn test_escape_pauses_and_preserves() {
        let mut platform = platform();
        let mut level = started(LevelId::One, &mut platform);
        level.handle_event(&Event::KeyDown(Key::Escape));
        let transition = level.transition();
        assert!(transition.done && transition.preserve);
        assert_eq!(transition.next, Some(SceneId::Pause));
    }

    #[test]
    fn test_draw_order() {
        let mut platform = platform();
        let mut level = started(LevelId::One, &mut platform);
        level.update(&mut platform, D_T);
        let calls = platform.draw_calls();
        assert_eq!(calls[0], DrawCall::Fill(Color::WHITE));
        assert_eq!(calls.len(), 4);
        assert!(calls[1..].iter().all(|call| matches!(call, DrawCall::Blit { .. })));
    }

    #[test]
    fn test_climbing_out_of_top_advances() {
        let mut platform = platform();
        let mut level = started(LevelId::One, &mut platform);
        let player = level.player_mut().unwrap();
        player.body.rect.top = 2;
        player.body.velocity.y = -6.5;
        level.update(&mut platform, D_T);

        let player = level.player().unwrap();
        assert_eq!(player.body.rect.top, 0);
        assert_eq!(player.body.velocity.y, 0.0);
        let transition = level.transition();
        assert!(transition.done && transition.preserve);
        assert_eq!(transition.next, Some(SceneId::Level(LevelId::Two)));
    }

    #[test]
    fn test_falling_out_of_bottom_pops_with_carry() {
        let mut platform = platform();
        // Level 3's map has a hole under x < 100.
        let holed = BitmapMask::from_fn(1000, 900, |x, y| y >= 815 && x >= 100);
        platform.insert_image("level3_mask", mask_image(&holed));
        let mut level = started(LevelId::Three, &mut platform);
        let player = level.player_mut().unwrap();
        player.body.rect.left = 20;
        player.body.rect.top = 880;
        player.body.velocity.y = 5.0;
        player.dunked = true;
        level.update(&mut platform, D_T);

        let transition = level.transition();
        assert!(transition.done && !transition.preserve);
        assert_eq!(transition.next, None);
        assert_eq!(
            transition.carry,
            Some(Carry {
                x: 20,
                vy: 5.0,
                dunked: true
            })
        );
    }

    #[test]
    fn test_first_level_has_no_floor_exit() {
        let mut platform = platform();
        let holed = BitmapMask::empty(1000, 900);
        platform.insert_image("level1_mask", mask_image(&holed));
        let mut level = started(LevelId::One, &mut platform);
        level.player_mut().unwrap().body.rect.top = 880;
        level.update(&mut platform, D_T);
        assert!(!level.transition().done);
    }

    #[test]
    fn test_ghost_catch_returns_to_menu() {
        let mut platform = platform();
        let mut level = started(LevelId::Two, &mut platform);
        let (x, y) = level.player().unwrap().body.position();
        level.ghosts_mut()[0].set_position(x, y);
        level.update(&mut platform, D_T);

        let transition = level.transition();
        assert!(transition.done && !transition.preserve);
        assert_eq!(transition.next, Some(SceneId::Menu));
    }

    #[test]
    fn test_restart_with_carry() {
        let mut platform = platform();
        let mut level = started(LevelId::Two, &mut platform);
        level.transition_mut().goto_preserving(SceneId::Level(LevelId::Three));
        level.restart(Some(Carry {
            x: 5000,
            vy: 4.0,
            dunked: true,
        }));

        assert_eq!(*level.transition(), Transition::default());
        let player = level.player().unwrap();
        assert_eq!(player.body.rect.left, 1000 - 45);
        assert_eq!(player.body.velocity.y, 4.0);
        assert!(player.dunked);
        assert!(!player.on_ground);

        let ghost = &level.ghosts()[0];
        let (gx, gy) = ghost.body.position();
        assert!((0..=1000).contains(&gx) && (0..=900).contains(&gy));
    }

    #[test]
    fn test_resume_without_carry_keeps_ghosts() {
        let mut platform = platform();
        let mut level = started(LevelId::Two, &mut platform);
        level.update(&mut platform, D_T);
        let before = level.ghosts()[0].body.position();
        let player_before = level.player().unwrap().body.position();

        level.restart(None);
        assert_eq!(level.ghosts()[0].body.position(), before);
        assert_eq!(level.player().unwrap().body.position(), player_before);
    }

    #[test]
    fn test_ghost_pursues_player() {
        let mut platform = platform();
        let mut level = started(LevelId::One, &mut platform);
        let start = level.ghosts()[0].body.center();
        for _ in 0..100 {
            level.update(&mut platform, D_T);
        }

        let target = level.player().unwrap().body.center();
        let end = level.ghosts()[0].body.center();
        assert!(end.distance(target) < start.distance(target));
    }

    #[test]
    fn test_destroy_releases_world() {
        let mut platform = platform();
        let mut level = started(LevelId::One, &mut platform);
        level.destroy();
        assert!(level.player().is_none());
        level.update(&mut platform, D_T);
        assert!(platform.draw_calls().is_empty());
    }
}
