// Copyright 2019 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::geometry::predicates;

/// One of a node's four sub-quadrants.
///
/// Numbering is load-bearing: it indexes directly into a node's
/// `children` array and must match the split math in [`Rect::split`].
//
//        mid_y
//          |
//    1 UL  |  0 UR
//          |
//  --------+-------->x
//          |
//    2 LL  |  3 LR
//          |
//          v
//         mid_x
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub(crate) enum Quadrant {
    UpperRight = 0,
    UpperLeft = 1,
    LowerLeft = 2,
    LowerRight = 3,
}

/// An axis-aligned, half-open rectangle: `x in [left, left+width)`, `y in
/// [bottom, bottom+height)`. Half-open is essential so every point inside a
/// node's box belongs to exactly one child quadrant at every depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Rect {
    pub left: i32,
    pub bottom: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub(crate) fn new(left: i32, bottom: i32, width: i32, height: i32) -> Rect {
        debug_assert!(width > 0 && height > 0);
        Rect {
            left,
            bottom,
            width,
            height,
        }
    }

    /// Whether `(x, y)` lies within this rectangle under the half-open
    /// convention.
    pub(crate) fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.left
            && x < self.left + self.width
            && y >= self.bottom
            && y < self.bottom + self.height
    }

    fn mid(&self) -> (i32, i32) {
        (
            self.left + self.width / 2,
            self.bottom + self.height / 2,
        )
    }

    /// Which quadrant `(x, y)` falls in relative to this rectangle's
    /// midpoint. The caller must have already checked `contains_point`.
    pub(crate) fn quadrant_of(&self, x: i32, y: i32) -> Quadrant {
        let (mid_x, mid_y) = self.mid();
        match (x >= mid_x, y >= mid_y) {
            (true, true) => Quadrant::UpperRight,
            (false, true) => Quadrant::UpperLeft,
            (false, false) => Quadrant::LowerLeft,
            (true, false) => Quadrant::LowerRight,
        }
    }

    /// Splits this rectangle into its four sub-quadrants, in [`Quadrant`]
    /// order. Uses `floor(size / 2)` for the lower/left halves and gives the
    /// remainder to the upper/right halves, so odd dimensions are covered
    /// exactly. In practice the root is always rounded to a power of two, so
    /// this only matters once a lowered `MIN_SIZE` makes an odd split
    /// reachable.
    pub(crate) fn split(&self) -> [Rect; 4] {
        let half_w = self.width / 2;
        let half_h = self.height / 2;
        let rem_w = self.width - half_w;
        let rem_h = self.height - half_h;
        let (mid_x, mid_y) = self.mid();

        [
            Rect::new(mid_x, mid_y, rem_w, rem_h),           // UpperRight
            Rect::new(self.left, mid_y, half_w, rem_h),      // UpperLeft
            Rect::new(self.left, self.bottom, half_w, half_h), // LowerLeft
            Rect::new(mid_x, self.bottom, rem_w, half_h),    // LowerRight
        ]
    }

    pub(crate) fn collides_with_polygon(&self, xs: &[i32], ys: &[i32]) -> bool {
        predicates::collide_polygon_rectangle(xs, ys, self.left, self.bottom, self.width, self.height)
    }

    pub(crate) fn inside_polygon(&self, xs: &[i32], ys: &[i32]) -> bool {
        predicates::rectangle_inside_polygon(xs, ys, self.left, self.bottom, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_open_containment() {
        let r = Rect::new(2, 2, 6, 6);
        assert!(r.contains_point(2, 2));
        assert!(r.contains_point(4, 2));
        assert!(r.contains_point(2, 4));
        assert!(!r.contains_point(8, 2));
        assert!(!r.contains_point(2, 8));
        assert!(!r.contains_point(4, 8));
        assert!(!r.contains_point(8, 4));
        assert!(!r.contains_point(8, 8));
    }

    #[test]
    fn quadrant_numbering() {
        let r = Rect::new(0, 0, 8, 8);
        assert_eq!(r.quadrant_of(6, 6), Quadrant::UpperRight);
        assert_eq!(r.quadrant_of(2, 6), Quadrant::UpperLeft);
        assert_eq!(r.quadrant_of(2, 2), Quadrant::LowerLeft);
        assert_eq!(r.quadrant_of(6, 2), Quadrant::LowerRight);
        // Exactly at the midpoint belongs to upper-right.
        assert_eq!(r.quadrant_of(4, 4), Quadrant::UpperRight);
    }

    #[test]
    fn split_covers_every_point_exactly_once() {
        let r = Rect::new(0, 0, 8, 8);
        let children = r.split();
        for x in 0..8 {
            for y in 0..8 {
                let owners: Vec<_> = children
                    .iter()
                    .filter(|c| c.contains_point(x, y))
                    .collect();
                assert_eq!(owners.len(), 1, "({x}, {y}) owned by {owners:?}");
            }
        }
    }

    #[test]
    fn split_odd_dimensions_give_remainder_to_upper_right_half() {
        let r = Rect::new(0, 0, 5, 5);
        let children = r.split();
        // left/bottom halves are floor(5/2) = 2, upper/right halves are 3.
        assert_eq!(children[Quadrant::LowerLeft as usize].width, 2);
        assert_eq!(children[Quadrant::LowerLeft as usize].height, 2);
        assert_eq!(children[Quadrant::UpperRight as usize].width, 3);
        assert_eq!(children[Quadrant::UpperRight as usize].height, 3);
    }
}
