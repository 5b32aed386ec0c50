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

// Moving a body through pixel terrain.
//
// Motion is resolved one axis at a time, horizontal first. Each axis is
// swept in steps no longer than the body's extent along it, so a fast body
// can't skip over geometry thinner than itself. When a step lands inside
// terrain, the first overlapping pixel (row-major, see `BitmapMask::overlap`)
// is used to find the surface: walk from it, against the motion, to the
// first empty pixel and put the body's leading edge there. If that guess
// still overlaps (the contact pixel's row or column wasn't representative),
// back the body off a pixel at a time until it is clear.
//
// All of this assumes the body starts the frame clear of the terrain and has
// a solid rectangular mask. Under those conditions the body always ends up
// clear: the slow path can at worst walk back to where the step started.

use crate::entity::Body;
use crate::stage::Stage;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

// What the body touched this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Contact {
    pub wall: bool,
    pub floor: bool,
    pub ceiling: bool,
    // Terrain directly below the body after moving.
    pub grounded: bool,
}

pub fn stage_overlap(body: &Body, stage: &Stage) -> Option<(i32, i32)> {
    stage
        .mask()
        .overlap(&body.mask, (body.rect.left, body.rect.top))
}

pub fn resting_on_ground(body: &Body, stage: &Stage) -> bool {
    stage
        .mask()
        .overlaps(&body.mask, (body.rect.left, body.rect.top + 1))
}

// Move by (dx, dy) pixels, horizontal then vertical, and report contacts.
pub fn resolve(body: &mut Body, stage: &Stage, delta: (i32, i32)) -> Contact {
    let mut contact = Contact {
        wall: move_horizontal(body, stage, delta.0),
        ..Default::default()
    };

    if move_vertical(body, stage, delta.1) {
        if delta.1 > 0 {
            contact.floor = true;
        } else {
            contact.ceiling = true;
        }
    }

    if stage_overlap(body, stage).is_some() {
        eject_upward(body, stage);
    }

    contact.grounded = resting_on_ground(body, stage);
    contact
}

// Returns true if the body was stopped by a wall. The body is always kept
// inside the stage horizontally.
pub fn move_horizontal(body: &mut Body, stage: &Stage, dx: i32) -> bool {
    let max_left = (stage.width() - body.rect.width).max(0);
    let target = (body.rect.left + dx).clamp(0, max_left);
    body.rect.left = body.rect.left.clamp(0, max_left);
    let distance = target - body.rect.left;
    sweep(body, stage, Axis::Horizontal, distance)
}

// Returns true if the body hit a floor (dy > 0) or ceiling (dy < 0).
pub fn move_vertical(body: &mut Body, stage: &Stage, dy: i32) -> bool {
    sweep(body, stage, Axis::Vertical, dy)
}

fn extent(body: &Body, axis: Axis) -> i32 {
    match axis {
        Axis::Horizontal => body.rect.width,
        Axis::Vertical => body.rect.height,
    }
}

fn shift(body: &mut Body, axis: Axis, amount: i32) {
    match axis {
        Axis::Horizontal => body.rect.left += amount,
        Axis::Vertical => body.rect.top += amount,
    }
}

fn sweep(body: &mut Body, stage: &Stage, axis: Axis, distance: i32) -> bool {
    let dir = distance.signum();
    let max_step = extent(body, axis).max(1);
    let mut remaining = distance.abs();
    while remaining > 0 {
        let step = remaining.min(max_step);
        remaining -= step;
        shift(body, axis, dir * step);

        if let Some(contact) = stage_overlap(body, stage) {
            snap_to_surface(body, stage, axis, dir, contact);
            if stage_overlap(body, stage).is_some() {
                log::debug!(
                    "{:?} snap from {:?} still overlaps, correcting slowly",
                    axis,
                    contact
                );
                slow_correct(body, stage, axis, -dir, step);
            }

            return true;
        }
    }

    false
}

// Walk from the contact pixel away from the motion until reaching empty
// space (or the edge of the map) and rest the body's leading edge there.
fn snap_to_surface(body: &mut Body, stage: &Stage, axis: Axis, dir: i32, contact: (i32, i32)) {
    let (cx, cy) = contact;
    match (axis, dir > 0) {
        (Axis::Horizontal, false) => {
            let mut x = cx;
            while stage.solid_at(x, cy) {
                x += 1;
            }
            body.rect.left = x;
        }
        (Axis::Horizontal, true) => {
            let mut x = cx;
            while stage.solid_at(x, cy) {
                x -= 1;
            }
            body.rect.left = x + 1 - body.rect.width;
        }
        (Axis::Vertical, false) => {
            let mut y = cy;
            while stage.solid_at(cx, y) {
                y += 1;
            }
            body.rect.top = y;
        }
        (Axis::Vertical, true) => {
            let mut y = cy;
            while stage.solid_at(cx, y) {
                y -= 1;
            }
            body.rect.top = y + 1 - body.rect.height;
        }
    }
}

// Nudge one pixel at a time in direction `dir` until clear. `budget` is the
// length of the step that caused the overlap; walking back that far (plus the
// body's extent for slack) always reaches clear space.
fn slow_correct(body: &mut Body, stage: &Stage, axis: Axis, dir: i32, budget: i32) -> bool {
    let limit = budget + extent(body, axis) + 1;
    for _ in 0..limit {
        if stage_overlap(body, stage).is_none() {
            return true;
        }

        shift(body, axis, dir);
    }

    stage_overlap(body, stage).is_none()
}

// Last resort for a body that started the frame embedded in terrain, e.g.
// placed there by a level transition.
fn eject_upward(body: &mut Body, stage: &Stage) {
    let start = body.rect.top;
    let limit = stage.height() + body.rect.height;
    for _ in 0..limit {
        if stage_overlap(body, stage).is_none() {
            break;
        }

        body.rect.top -= 1;
    }

    log::warn!(
        "Body embedded in terrain at ({}, {}), ejected to y={}",
        body.rect.left,
        start,
        body.rect.top
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::BitmapMask;
    use proptest::prelude::*;

    // 40x40 stage: floor from row 30 down, wall from column 30 right, with a
    // ceiling slab across rows 0..=4 between columns 10 and 19.
    fn room() -> Stage {
        Stage::new(BitmapMask::from_fn(40, 40, |x, y| {
            y >= 30 || x >= 30 || (y <= 4 && (10..20).contains(&x))
        }))
    }

    #[test]
    fn test_free_motion() {
        let stage = room();
        let mut body = Body::new(5, 10, 4, 6);
        let contact = resolve(&mut body, &stage, (3, 2));
        assert_eq!(body.position(), (8, 12));
        assert_eq!(contact, Contact::default());
    }

    #[test]
    fn test_wall_stop_moving_right() {
        let stage = room();
        let mut body = Body::new(20, 10, 4, 6);
        assert!(move_horizontal(&mut body, &stage, 9));
        // Right edge rests against column 30.
        assert_eq!(body.rect.right(), 30);
        assert!(stage_overlap(&body, &stage).is_none());
    }

    #[test]
    fn test_wall_stop_moving_left() {
        let stage = Stage::new(BitmapMask::from_fn(40, 20, |x, _| x < 5));
        let mut body = Body::new(9, 3, 4, 6);
        assert!(move_horizontal(&mut body, &stage, -7));
        assert_eq!(body.rect.left, 5);
    }

    #[test]
    fn test_horizontal_clamped_to_stage() {
        let stage = Stage::new(BitmapMask::empty(40, 20));
        let mut body = Body::new(2, 3, 4, 6);
        assert!(!move_horizontal(&mut body, &stage, -10));
        assert_eq!(body.rect.left, 0);
        assert!(!move_horizontal(&mut body, &stage, 100));
        assert_eq!(body.rect.left, 36);
    }

    #[test]
    fn test_landing() {
        let stage = room();
        let mut body = Body::new(2, 15, 4, 6);
        let contact = resolve(&mut body, &stage, (0, 12));
        assert!(contact.floor);
        assert!(contact.grounded);
        assert_eq!(body.rect.bottom(), 30);
    }

    #[test]
    fn test_ceiling() {
        let stage = room();
        let mut body = Body::new(12, 8, 4, 6);
        let contact = resolve(&mut body, &stage, (0, -6));
        assert!(contact.ceiling);
        assert!(!contact.floor);
        assert!(!contact.grounded);
        assert_eq!(body.rect.top, 5);
    }

    #[test]
    fn test_thin_floor_is_not_skipped() {
        let stage = Stage::new(BitmapMask::from_fn(20, 100, |_, y| y == 40));
        let mut body = Body::new(5, 0, 4, 6);
        let contact = resolve(&mut body, &stage, (0, 80));
        assert!(contact.floor);
        assert_eq!(body.rect.bottom(), 40);
    }

    #[test]
    fn test_thin_wall_is_not_skipped() {
        let stage = Stage::new(BitmapMask::from_fn(100, 20, |x, _| x == 50));
        let mut body = Body::new(10, 5, 4, 6);
        assert!(move_horizontal(&mut body, &stage, 70));
        assert_eq!(body.rect.right(), 50);
    }

    #[test]
    fn test_landing_on_uneven_surface() {
        // Only the bump's peak is under the body's right edge.
        let stage = Stage::new(BitmapMask::from_rows(&[
            "..........",
            "..........",
            "..........",
            "..........",
            ".......#..",
            "......###.",
            "##########",
        ]));
        let mut body = Body::new(4, 0, 4, 3);
        let contact = resolve(&mut body, &stage, (0, 3));
        assert!(contact.floor);
        assert!(stage_overlap(&body, &stage).is_none());
        assert_eq!(body.rect.bottom(), 4);
    }

    #[test]
    fn test_embedded_body_is_ejected() {
        let stage = room();
        let mut body = Body::new(2, 32, 4, 6);
        resolve(&mut body, &stage, (0, 0));
        assert!(stage_overlap(&body, &stage).is_none());
        assert_eq!(body.rect.bottom(), 30);
    }

    #[test]
    fn test_resting_on_ground() {
        let stage = room();
        assert!(resting_on_ground(&Body::new(2, 24, 4, 6), &stage));
        assert!(!resting_on_ground(&Body::new(2, 23, 4, 6), &stage));
    }

    // Random blocky terrain for the property below.
    fn arb_stage() -> impl Strategy<Value = Stage> {
        proptest::collection::vec((0..48i32, 0..48i32, 1..12i32, 1..12i32), 0..10).prop_map(
            |blocks| {
                Stage::new(BitmapMask::from_fn(48, 48, |x, y| {
                    blocks
                        .iter()
                        .any(|&(bx, by, bw, bh)| x >= bx && x < bx + bw && y >= by && y < by + bh)
                }))
            },
        )
    }

    proptest! {
        #[test]
        fn resolution_never_leaves_overlap(
            stage in arb_stage(),
            x in 0..42i32,
            y in 0..40i32,
            dx in -30..30i32,
            dy in -30..30i32,
        ) {
            let mut body = Body::new(x, y, 6, 8);
            prop_assume!(stage_overlap(&body, &stage).is_none());

            resolve(&mut body, &stage, (dx, dy));
            prop_assert!(stage_overlap(&body, &stage).is_none());
            prop_assert!(body.rect.left >= 0 && body.rect.right() <= stage.width());
        }
    }
}
