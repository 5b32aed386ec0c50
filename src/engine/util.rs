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

use std::ops::{Add, Div, Sub};

// Axis aligned rectangle. Right and bottom edges are exclusive, so a rect
// at (0, 0) with width 10 covers columns 0..=9.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Rect<T> {
    pub left: T,
    pub top: T,
    pub width: T,
    pub height: T,
}

impl<T: Add<Output = T> + PartialOrd<T> + Clone + Copy> Rect<T> {
    pub fn new(left: T, top: T, width: T, height: T) -> Rect<T> {
        Rect {
            left,
            top,
            width,
            height,
        }
    }

    pub fn overlaps(&self, rect: &Rect<T>) -> bool {
        self.left < rect.right()
            && rect.left < self.right()
            && self.top < rect.bottom()
            && rect.top < self.bottom()
    }

    pub fn contains(&self, x: T, y: T) -> bool {
        x >= self.left && x < self.right() && y >= self.top && y < self.bottom()
    }

    pub fn right(&self) -> T {
        self.left + self.width
    }

    pub fn bottom(&self) -> T {
        self.top + self.height
    }
}

impl<T> Rect<T>
where
    T: Add<Output = T> + Sub<Output = T> + Div<Output = T> + PartialOrd<T> + Clone + Copy + From<u8>,
{
    // Rect of the given size whose center is (x, y).
    pub fn centered_at(x: T, y: T, width: T, height: T) -> Rect<T> {
        let two = T::from(2);
        Rect::new(x - width / two, y - height / two, width, height)
    }

    pub fn center(&self) -> (T, T) {
        let two = T::from(2);
        (self.left + self.width / two, self.top + self.height / two)
    }
}
