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

// Owns the running scene and the stack of scenes waiting to be resumed.
//
// After every update the active scene's `Transition` is checked:
//
// - `next == None`: pop the backlog, `restart` the popped scene with the
//   carried player state and destroy the current one.
// - `next == Some(id)`: start scene `id`. The current scene goes on the
//   backlog if it asked to be preserved. Otherwise it is destroyed along
//   with the whole backlog.
//
// So climbing up through levels stacks them, falling back down unwinds the
// stack, and going to the menu throws everything away.

use crate::gfx::Context;
use crate::input::Event;
use crate::scene::{Scene, SceneId, Transition};
use anyhow::{bail, Context as _};

pub type SceneFactory = Box<dyn Fn(SceneId) -> Box<dyn Scene>>;

pub struct Director {
    active: Box<dyn Scene>,
    backlog: Vec<Box<dyn Scene>>,
    factory: SceneFactory,
}

impl Director {
    pub fn new(
        start: SceneId,
        factory: SceneFactory,
        context: &mut dyn Context,
    ) -> anyhow::Result<Director> {
        let mut active = factory(start);
        active
            .startup(context)
            .with_context(|| format!("starting scene {}", start))?;
        log::info!("Started in {}", start);
        Ok(Director {
            active,
            backlog: Vec::new(),
            factory,
        })
    }

    pub fn active(&self) -> &dyn Scene {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> &mut dyn Scene {
        self.active.as_mut()
    }

    pub fn active_id(&self) -> SceneId {
        self.active.id()
    }

    // Bottom of the stack first.
    pub fn backlog_ids(&self) -> Vec<SceneId> {
        self.backlog.iter().map(|scene| scene.id()).collect()
    }

    pub fn wants_quit(&self) -> bool {
        self.active.transition().quit
    }

    pub fn handle_event(&mut self, event: &Event) {
        self.active.handle_event(event);
    }

    pub fn handle_buttons(&mut self, buttons: u32) {
        self.active.handle_buttons(buttons);
    }

    // Run one frame of the active scene, then act on any transition it
    // requested. A quitting scene is never flipped.
    pub fn update(&mut self, context: &mut dyn Context, d_t: f32) -> anyhow::Result<()> {
        self.active.update(context, d_t);
        let transition = *self.active.transition();
        if transition.quit || !transition.done {
            return Ok(());
        }

        self.flip(context, transition)
    }

    fn flip(&mut self, context: &mut dyn Context, transition: Transition) -> anyhow::Result<()> {
        let from = self.active.id();
        let Some(next) = transition.next else {
            let Some(mut resumed) = self.backlog.pop() else {
                bail!("transition requested a backlog pop with an empty backlog");
            };

            resumed.restart(transition.carry);
            let mut outgoing = std::mem::replace(&mut self.active, resumed);
            outgoing.destroy();
            log::info!(
                "Scene {} -> {} (resumed, backlog depth {})",
                from,
                self.active.id(),
                self.backlog.len()
            );
            return Ok(());
        };

        let mut incoming = (self.factory)(next);
        incoming
            .startup(context)
            .with_context(|| format!("starting scene {}", next))?;
        let mut outgoing = std::mem::replace(&mut self.active, incoming);
        if transition.preserve {
            outgoing.transition_mut().reset();
            self.backlog.push(outgoing);
        } else {
            outgoing.destroy();
            for mut scene in self.backlog.drain(..) {
                scene.destroy();
            }
        }

        log::info!(
            "Scene {} -> {} ({}, backlog depth {})",
            from,
            next,
            if transition.preserve {
                "preserved"
            } else {
                "discarded"
            },
            self.backlog.len()
        );
        Ok(())
    }
}
