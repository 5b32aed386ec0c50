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

// The button screens: title menu, pause overlay and victory.

use crate::gfx::{Color, Context, Image};
use crate::input::{Event, Key, POINTER_PRIMARY};
use crate::scene::{LevelId, Scene, SceneId, Transition};
use crate::ui::{cubic_inout, ButtonColumn, Interpolator};
use anyhow::Context as _;

const PAUSE_SHADE: Color = Color::rgb(48, 48, 56);
const BANNER_DROP_TIME: f32 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Start,
    Resume,
    Restart,
    Menu,
    Exit,
}

// Shared response to a clicked button.
fn apply(transition: &mut Transition, action: Action) {
    log::debug!("Button {:?}", action);
    match action {
        Action::Start | Action::Restart => transition.goto(SceneId::Level(LevelId::One)),
        Action::Resume => transition.pop(None),
        Action::Menu => transition.goto(SceneId::Menu),
        Action::Exit => transition.quit(),
    }
}

fn clicked(buttons: &Option<ButtonColumn<Action>>, event: &Event) -> Option<Action> {
    match *event {
        Event::PointerUp { button, x, y } if button == POINTER_PRIMARY => {
            buttons.as_ref()?.hit(x, y)
        }
        _ => None,
    }
}

#[derive(Default)]
pub struct Menu {
    transition: Transition,
    buttons: Option<ButtonColumn<Action>>,
}

impl Menu {
    pub fn new() -> Menu {
        Menu::default()
    }
}

impl Scene for Menu {
    fn id(&self) -> SceneId {
        SceneId::Menu
    }

    fn transition(&self) -> &Transition {
        &self.transition
    }

    fn transition_mut(&mut self) -> &mut Transition {
        &mut self.transition
    }

    fn startup(&mut self, context: &mut dyn Context) -> anyhow::Result<()> {
        let screen = context.size();
        self.buttons = Some(ButtonColumn::load(
            context,
            screen,
            &[
                ("start_button", -50, Action::Start),
                ("exit_button", 50, Action::Exit),
            ],
        )?);
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) {
        if *event == Event::KeyDown(Key::Escape) {
            self.transition.quit();
        } else if let Some(action) = clicked(&self.buttons, event) {
            apply(&mut self.transition, action);
        }
    }

    fn update(&mut self, context: &mut dyn Context, _d_t: f32) {
        context.fill(Color::WHITE);
        if let Some(buttons) = &self.buttons {
            buttons.draw(context);
        }
    }
}

#[derive(Default)]
pub struct Pause {
    transition: Transition,
    buttons: Option<ButtonColumn<Action>>,
}

impl Pause {
    pub fn new() -> Pause {
        Pause::default()
    }
}

impl Scene for Pause {
    fn id(&self) -> SceneId {
        SceneId::Pause
    }

    fn transition(&self) -> &Transition {
        &self.transition
    }

    fn transition_mut(&mut self) -> &mut Transition {
        &mut self.transition
    }

    fn startup(&mut self, context: &mut dyn Context) -> anyhow::Result<()> {
        let screen = context.size();
        self.buttons = Some(ButtonColumn::load(
            context,
            screen,
            &[
                ("resume_button", -150, Action::Resume),
                ("restart_button", -50, Action::Restart),
                ("menu_button", 50, Action::Menu),
                ("exit_button", 150, Action::Exit),
            ],
        )?);
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) {
        if *event == Event::KeyDown(Key::Escape) {
            self.transition.pop(None);
        } else if let Some(action) = clicked(&self.buttons, event) {
            apply(&mut self.transition, action);
        }
    }

    fn update(&mut self, context: &mut dyn Context, _d_t: f32) {
        context.fill(PAUSE_SHADE);
        if let Some(buttons) = &self.buttons {
            buttons.draw(context);
        }
    }
}

// Shown after climbing out of the last level. The banner slides down from
// above the screen.
pub struct Victory {
    transition: Transition,
    buttons: Option<ButtonColumn<Action>>,
    banner: Option<Image>,
    banner_y: Interpolator,
}

impl Default for Victory {
    fn default() -> Victory {
        Victory {
            transition: Transition::default(),
            buttons: None,
            banner: None,
            banner_y: Interpolator::new(0.0, cubic_inout),
        }
    }
}

impl Victory {
    pub fn new() -> Victory {
        Victory::default()
    }
}

impl Scene for Victory {
    fn id(&self) -> SceneId {
        SceneId::Victory
    }

    fn transition(&self) -> &Transition {
        &self.transition
    }

    fn transition_mut(&mut self) -> &mut Transition {
        &mut self.transition
    }

    fn startup(&mut self, context: &mut dyn Context) -> anyhow::Result<()> {
        let screen = context.size();
        let banner = context
            .load_image("victory_banner", None)
            .context("loading victory banner")?;
        self.banner_y.start(
            BANNER_DROP_TIME,
            -banner.height() as f32,
            (screen.1 / 2 - 100 - banner.height() / 2) as f32,
        );
        self.banner = Some(banner);
        self.buttons = Some(ButtonColumn::load(
            context,
            screen,
            &[
                ("menu_button", 50, Action::Menu),
                ("exit_button", 150, Action::Exit),
            ],
        )?);
        Ok(())
    }

    fn handle_event(&mut self, event: &Event) {
        if *event == Event::KeyDown(Key::Escape) {
            self.transition.goto(SceneId::Menu);
        } else if let Some(action) = clicked(&self.buttons, event) {
            apply(&mut self.transition, action);
        }
    }

    fn update(&mut self, context: &mut dyn Context, d_t: f32) {
        let y = self.banner_y.update(d_t) as i32;
        context.fill(Color::WHITE);
        if let Some(banner) = &self.banner {
            let x = context.size().0 / 2 - banner.width() / 2;
            context.blit(banner, (x, y), false);
        }

        if let Some(buttons) = &self.buttons {
            buttons.draw(context);
        }
    }
}
