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

// Per-pixel opacity masks.
//
// Every collision in the game, player against terrain, ghost against player,
// pointer against button, is answered by one of these.

use image::RgbaImage;
use std::fmt;

// Pixels with alpha above this are considered opaque.
pub const ALPHA_THRESHOLD: u8 = 127;

// A query fell outside the mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutOfBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mask query ({}, {}) outside {}x{} mask",
            self.x, self.y, self.width, self.height
        )
    }
}

impl std::error::Error for OutOfBounds {}

// Immutable grid of opaque/transparent pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct BitmapMask {
    width: i32,
    height: i32,
    bits: Vec<bool>,
}

impl BitmapMask {
    pub fn from_fn(width: i32, height: i32, mut f: impl FnMut(i32, i32) -> bool) -> BitmapMask {
        let width = width.max(0);
        let height = height.max(0);
        let mut bits = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                bits.push(f(x, y));
            }
        }

        BitmapMask {
            width,
            height,
            bits,
        }
    }

    pub fn empty(width: i32, height: i32) -> BitmapMask {
        BitmapMask::from_fn(width, height, |_, _| false)
    }

    pub fn filled(width: i32, height: i32) -> BitmapMask {
        BitmapMask::from_fn(width, height, |_, _| true)
    }

    // Builds a mask from rows of text, `#` marking opaque pixels. Rows
    // shorter than the longest one are padded with transparent pixels.
    pub fn from_rows(rows: &[&str]) -> BitmapMask {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let grid: Vec<Vec<bool>> = rows
            .iter()
            .map(|r| r.chars().map(|c| c == '#').collect())
            .collect();
        BitmapMask::from_fn(width, rows.len() as i32, |x, y| {
            grid[y as usize].get(x as usize).copied().unwrap_or(false)
        })
    }

    // Opaque wherever the image's alpha channel is above the threshold.
    pub fn from_alpha(image: &RgbaImage) -> BitmapMask {
        BitmapMask::from_fn(image.width() as i32, image.height() as i32, |x, y| {
            image.get_pixel(x as u32, y as u32)[3] > ALPHA_THRESHOLD
        })
    }

    // Like `from_alpha`, but pixels exactly matching `key` are transparent
    // as well. Used for terrain maps painted on a white background.
    pub fn from_color_key(image: &RgbaImage, key: [u8; 3]) -> BitmapMask {
        BitmapMask::from_fn(image.width() as i32, image.height() as i32, |x, y| {
            let p = image.get_pixel(x as u32, y as u32);
            p[3] > ALPHA_THRESHOLD && [p[0], p[1], p[2]] != key
        })
    }

    // Horizontally flipped copy.
    pub fn mirrored(&self) -> BitmapMask {
        BitmapMask::from_fn(self.width, self.height, |x, y| {
            self.bit(self.width - 1 - x, y)
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn size(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }

    pub fn opaque_at(&self, x: i32, y: i32) -> Result<bool, OutOfBounds> {
        if !self.in_bounds(x, y) {
            return Err(OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        Ok(self.bit(x, y))
    }

    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    // First point, in this mask's coordinates, where this mask and `other`
    // (whose origin sits at `offset` relative to ours) are both opaque.
    //
    // The overlapping region is scanned row by row, top to bottom, and left
    // to right within a row. Collision response depends on where the first
    // hit lands, so this order must not change.
    pub fn overlap(&self, other: &BitmapMask, offset: (i32, i32)) -> Option<(i32, i32)> {
        let (ox, oy) = offset;
        let left = ox.max(0);
        let top = oy.max(0);
        let right = (ox + other.width).min(self.width);
        let bottom = (oy + other.height).min(self.height);

        for y in top..bottom {
            for x in left..right {
                if self.bit(x, y) && other.bit(x - ox, y - oy) {
                    return Some((x, y));
                }
            }
        }

        None
    }

    pub fn overlaps(&self, other: &BitmapMask, offset: (i32, i32)) -> bool {
        self.overlap(other, offset).is_some()
    }

    // Caller guarantees bounds.
    fn bit(&self, x: i32, y: i32) -> bool {
        self.bits[(y * self.width + x) as usize]
    }
}

impl fmt::Debug for BitmapMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BitmapMask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("opaque", &self.count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use proptest::prelude::*;

    #[test]
    fn test_opaque_at_bounds() {
        let mask = BitmapMask::from_rows(&["#.", ".#"]);
        assert_eq!(mask.opaque_at(0, 0), Ok(true));
        assert_eq!(mask.opaque_at(1, 0), Ok(false));
        assert_eq!(mask.opaque_at(1, 1), Ok(true));

        let err = mask.opaque_at(2, 0).unwrap_err();
        assert_eq!(err.x, 2);
        assert_eq!(err.width, 2);
        assert!(mask.opaque_at(0, -1).is_err());
        assert_eq!(
            "mask query (2, 0) outside 2x2 mask",
            format!("{}", err)
        );
    }

    #[test]
    fn test_overlap_scans_rows_first() {
        // Two candidate hits: (3, 1) and (1, 2). Row-major order finds the
        // upper one even though the lower one is further left.
        let stage = BitmapMask::from_rows(&[
            ".....", //
            "...#.", //
            ".#...", //
            ".....",
        ]);
        let body = BitmapMask::filled(5, 4);
        assert_eq!(stage.overlap(&body, (0, 0)), Some((3, 1)));
    }

    #[test]
    fn test_overlap_leftmost_in_row() {
        let stage = BitmapMask::from_rows(&["....", ".##.", "...."]);
        let body = BitmapMask::filled(4, 3);
        assert_eq!(stage.overlap(&body, (0, 0)), Some((1, 1)));
    }

    #[test]
    fn test_overlap_with_offset() {
        let stage = BitmapMask::from_rows(&["......", "......", "....##"]);
        let body = BitmapMask::filled(2, 2);
        assert_eq!(stage.overlap(&body, (0, 0)), None);
        assert_eq!(stage.overlap(&body, (3, 1)), Some((4, 2)));
        assert_eq!(stage.overlap(&body, (5, 2)), Some((5, 2)));
    }

    #[test]
    fn test_overlap_negative_and_outside_offsets() {
        let stage = BitmapMask::from_rows(&["#...", "....", "...."]);
        let body = BitmapMask::filled(2, 2);
        assert_eq!(stage.overlap(&body, (-1, -1)), Some((0, 0)));
        assert_eq!(stage.overlap(&body, (-2, -2)), None);
        assert_eq!(stage.overlap(&body, (10, 10)), None);
    }

    #[test]
    fn test_overlap_respects_both_masks() {
        let stage = BitmapMask::from_rows(&["##", "##"]);
        let ring = BitmapMask::from_rows(&["#.#", "...", "#.#"]);
        // Only the ring's lower-right pixel lands on the stage.
        assert_eq!(stage.overlap(&ring, (-1, -1)), Some((1, 1)));
        let hollow = BitmapMask::from_rows(&["...", ".#.", "..."]);
        assert_eq!(stage.overlap(&hollow, (2, 2)), None);
    }

    #[test]
    fn test_mirrored() {
        let mask = BitmapMask::from_rows(&["##..", "#..."]);
        let flipped = mask.mirrored();
        assert_eq!(flipped, BitmapMask::from_rows(&["..##", "...#"]));
        assert_eq!(flipped.mirrored(), mask);
    }

    #[test]
    fn test_from_alpha_and_color_key() {
        let mut img = RgbaImage::from_pixel(3, 1, Rgba([255, 255, 255, 255]));
        img.put_pixel(1, 0, Rgba([10, 20, 30, 255]));
        img.put_pixel(2, 0, Rgba([10, 20, 30, 100]));

        let alpha = BitmapMask::from_alpha(&img);
        assert_eq!(alpha, BitmapMask::from_rows(&["##."]));

        let keyed = BitmapMask::from_color_key(&img, [255, 255, 255]);
        assert_eq!(keyed, BitmapMask::from_rows(&[".#."]));
    }

    #[test]
    fn test_debug_is_summary() {
        let mask = BitmapMask::filled(3, 2);
        assert_eq!(
            "BitmapMask { width: 3, height: 2, opaque: 6 }",
            format!("{:?}", mask)
        );
    }

    fn arb_mask(max: i32) -> impl Strategy<Value = BitmapMask> {
        (1..max, 1..max).prop_flat_map(|(w, h)| {
            proptest::collection::vec(any::<bool>(), (w * h) as usize).prop_map(move |bits| {
                BitmapMask::from_fn(w, h, |x, y| bits[(y * w + x) as usize])
            })
        })
    }

    proptest! {
        #[test]
        fn overlap_is_deterministic_and_sound(
            a in arb_mask(12),
            b in arb_mask(12),
            ox in -12i32..12,
            oy in -12i32..12,
        ) {
            let first = a.overlap(&b, (ox, oy));
            prop_assert_eq!(first, a.overlap(&b, (ox, oy)));

            if let Some((x, y)) = first {
                prop_assert_eq!(a.opaque_at(x, y), Ok(true));
                prop_assert_eq!(b.opaque_at(x - ox, y - oy), Ok(true));
            }

            // Brute force: the reported point is the first in row-major order.
            let mut expected = None;
            'rows: for y in 0..a.height() {
                for x in 0..a.width() {
                    if a.opaque_at(x, y) == Ok(true) && b.opaque_at(x - ox, y - oy) == Ok(true) {
                        expected = Some((x, y));
                        break 'rows;
                    }
                }
            }
            prop_assert_eq!(first, expected);
        }
    }
}
