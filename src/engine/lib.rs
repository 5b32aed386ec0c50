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

pub mod animation;
pub mod collision;
pub mod director;
pub mod entity;
pub mod ghost;
pub mod gfx;
pub mod headless;
pub mod input;
pub mod levels;
pub mod mask;
pub mod player;
pub mod scene;
pub mod scenes;
pub mod stage;
pub mod tuning;
pub mod ui;
pub mod util;

use director::Director;
use gfx::Context;
use input::{Event, InputSource};
use scene::SceneId;
use std::time::{Duration, Instant};
use tuning::Tuning;

// Paces the loop to a target frame rate and measures real frame time.
pub struct FrameClock {
    target: Duration,
    last: Instant,
}

impl FrameClock {
    pub fn new(target_fps: u32) -> FrameClock {
        FrameClock {
            target: Duration::from_secs_f64(1.0 / target_fps.max(1) as f64),
            last: Instant::now(),
        }
    }

    // Sleep out whatever is left of the current frame, then return the
    // seconds since the previous tick.
    pub fn tick(&mut self) -> f32 {
        let elapsed = self.last.elapsed();
        if elapsed < self.target {
            std::thread::sleep(self.target - elapsed);
        }

        let now = Instant::now();
        let d_t = now - self.last;
        self.last = now;
        d_t.as_secs_f32()
    }
}

pub struct GameEngine {
    director: Director,
    clock: FrameClock,
    tuning: Tuning,
    running: bool,
}

impl GameEngine {
    // Starts at the title menu with the game's own scenes.
    pub fn new(tuning: Tuning, context: &mut dyn Context) -> anyhow::Result<GameEngine> {
        let director = Director::new(
            SceneId::Menu,
            Box::new(move |id| scenes::create(id, &tuning)),
            context,
        )?;
        Ok(GameEngine::with_director(director, tuning))
    }

    pub fn with_director(director: Director, tuning: Tuning) -> GameEngine {
        GameEngine {
            director,
            clock: FrameClock::new(tuning.target_fps),
            tuning,
            running: true,
        }
    }

    pub fn director(&self) -> &Director {
        &self.director
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // One pass of the loop: drain events, sample held buttons, update,
    // present. Returns whether the loop should keep going.
    pub fn frame<P: InputSource + Context>(&mut self, platform: &mut P, d_t: f32) -> anyhow::Result<bool> {
        while let Some(event) = platform.poll_event() {
            if event == Event::Quit {
                self.running = false;
            }

            self.director.handle_event(&event);
        }

        self.director.handle_buttons(platform.buttons());
        self.director.update(platform, d_t)?;
        platform.present();

        if self.director.wants_quit() {
            self.running = false;
        }

        Ok(self.running)
    }

    pub fn run<P: InputSource + Context>(&mut self, platform: &mut P) -> anyhow::Result<()> {
        log::info!("Running at {} fps", self.tuning.target_fps);
        self.clock = FrameClock::new(self.tuning.target_fps);
        let mut d_t = self.tuning.frame_duration();
        while self.frame(platform, d_t)? {
            d_t = self.clock.tick();
        }

        log::info!("Frame loop exited in {}", self.director.active_id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::{HeadlessPlatform, ScriptedFrame};
    use crate::input::Key;

    #[test]
    fn test_clock_paces_frames() {
        let mut clock = FrameClock::new(200);
        let d_t = clock.tick();
        assert!(d_t >= 0.004);
        let d_t = clock.tick();
        assert!(d_t >= 0.004);
    }

    #[test]
    fn test_quit_event_stops_after_frame() {
        let mut platform = HeadlessPlatform::new(400, 600)
            .with_fallback_size((100, 40))
            .with_script([ScriptedFrame::idle(), ScriptedFrame::events(&[Event::Quit])]);
        let mut engine = GameEngine::new(Tuning::default(), &mut platform).unwrap();

        assert!(engine.frame(&mut platform, 0.01).unwrap());
        assert!(!engine.frame(&mut platform, 0.01).unwrap());
        assert_eq!(platform.frames_presented(), 2);
    }

    #[test]
    fn test_scene_quit_stops_loop() {
        let mut platform = HeadlessPlatform::new(400, 600)
            .with_fallback_size((100, 40))
            .with_script([
                ScriptedFrame::idle(),
                ScriptedFrame::idle(),
                ScriptedFrame::events(&[Event::KeyDown(Key::Escape)]),
                ScriptedFrame::idle(),
            ]);
        let mut engine = GameEngine::new(Tuning::default(), &mut platform).unwrap();
        engine.run(&mut platform).unwrap();
        assert!(!engine.is_running());
        assert_eq!(platform.frames_presented(), 3);
    }
}
