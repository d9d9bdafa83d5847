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

//! Pure integer geometric predicates used by the quadtree: winding-number
//! point-in-polygon, segment intersection, and the rectangle/polygon
//! collision tests that decide how a polygon is distributed into the tree.
//!
//! All coordinates are `i32`; every cross or dot product is carried out in
//! `i64` to avoid overflow, per the two-integer-widths-wider convention the
//! quadtree depends on throughout.

/// A single line segment, given by its two endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Segment {
    pub start: (i32, i32),
    pub end: (i32, i32),
}

impl Segment {
    pub(crate) fn new(start: (i32, i32), end: (i32, i32)) -> Segment {
        Segment { start, end }
    }
}

/// 2D cross product `(ax, ay) x (bx, by)`, widened to avoid overflow.
#[inline]
pub(crate) fn cross(ax: i32, ay: i32, bx: i32, by: i32) -> i64 {
    (ax as i64) * (by as i64) - (ay as i64) * (bx as i64)
}

/// 2D dot product `(ax, ay) . (bx, by)`, widened to avoid overflow.
#[inline]
pub(crate) fn dot(ax: i32, ay: i32, bx: i32, by: i32) -> i64 {
    (ax as i64) * (bx as i64) + (ay as i64) * (by as i64)
}

/// Smallest power of two `>= max(1, n)`.
pub(crate) fn next_power_of_2(n: i32) -> i32 {
    let n = n.max(1) as u32;
    n.next_power_of_two() as i32
}

/// Even-odd ray-cast point-in-polygon test.
///
/// `xs`/`ys` give the polygon's vertices in order; the edge from the last
/// vertex back to the first is implicit. Points exactly on the left or
/// bottom edges of the polygon are inside; points exactly on the right or
/// top edges are outside. This asymmetric boundary convention is what lets
/// two polygons sharing an edge each claim exactly one side of it.
pub(crate) fn point_in_polygon(px: i32, py: i32, xs: &[i32], ys: &[i32]) -> bool {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        if (ys[i] > py) != (ys[j] > py) {
            let dy = ys[i] - ys[j];
            let lhs = (px - xs[j]) as i64 * dy as i64;
            let rhs = (xs[i] - xs[j]) as i64 * (py - ys[j]) as i64;
            let crosses = if dy > 0 { lhs < rhs } else { lhs > rhs };
            if crosses {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// True iff `n / denom` (a rational, `denom != 0`) falls in the half-open
/// unit interval `[0, 1)`, without performing the division.
#[inline]
fn in_half_open_unit_interval(n: i64, denom: i64) -> bool {
    if denom > 0 {
        n >= 0 && n < denom
    } else {
        n <= 0 && n > denom
    }
}

/// Whether two segments intersect, under the half-open `[0, 1)` parameter
/// convention: touching at a segment's start counts as an intersection,
/// touching at its end does not. Entirely integer arithmetic — the source's
/// `double`-based division is rearranged into cross-multiplied comparisons,
/// per spec's preferred alternative, so large coordinates never lose
/// precision going through a float.
pub(crate) fn lines_intersect(s1: Segment, s2: Segment) -> bool {
    let ux = s1.end.0 - s1.start.0;
    let uy = s1.end.1 - s1.start.1;
    let vx = s2.end.0 - s2.start.0;
    let vy = s2.end.1 - s2.start.1;
    let dx = s2.start.0 - s1.start.0;
    let dy = s2.start.1 - s1.start.1;

    let c1 = cross(ux, uy, vx, vy);
    let c2 = cross(dx, dy, ux, uy);

    if c1 == 0 {
        if c2 != 0 {
            // Parallel, not collinear: never intersect.
            return false;
        }
        // Parallel and collinear: compare the two segments' parameter
        // ranges along u, sharing the common denominator dot(u, u) so no
        // division is needed to order or compare them.
        let denom = dot(ux, uy, ux, uy);
        if denom == 0 {
            // s1 is degenerate (a single point); fall back to equality.
            return s1.start == s2.start || s1.start == s2.end;
        }
        let n1 = dot(dx, dy, ux, uy);
        let n2 = n1 + dot(ux, uy, vx, vy);
        // denom = dot(u, u) > 0, so n1/n2 preserve the order of lambda1/lambda2.
        let (lo, hi) = if n1 <= n2 { (n1, n2) } else { (n2, n1) };
        return lo <= denom && hi >= 0;
    }

    let n1 = cross(dx, dy, vx, vy);
    let n2 = cross(dx, dy, ux, uy);
    in_half_open_unit_interval(n1, c1) && in_half_open_unit_interval(n2, c1)
}

/// The four corners of `(rx, ry, w, h)` as a closed polygon, used to treat a
/// rectangle as input to [`point_in_polygon`].
fn rect_as_polygon(rx: i32, ry: i32, w: i32, h: i32) -> ([i32; 4], [i32; 4]) {
    ([rx, rx + w, rx + w, rx], [ry, ry, ry + h, ry + h])
}

fn point_in_rectangle(px: i32, py: i32, rx: i32, ry: i32, w: i32, h: i32) -> bool {
    let (xs, ys) = rect_as_polygon(rx, ry, w, h);
    point_in_polygon(px, py, &xs, &ys)
}

/// True iff the polygon and the rectangle `(rx, ry, w, h)` overlap: any
/// polygon edge crosses a rectangle edge, the polygon's first vertex lies in
/// the rectangle, or the rectangle's lower-left corner lies in the polygon.
/// The latter two catch full containment in either direction, which edge
/// crossing alone would miss.
pub(crate) fn collide_polygon_rectangle(
    xs: &[i32],
    ys: &[i32],
    rx: i32,
    ry: i32,
    w: i32,
    h: i32,
) -> bool {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    let rect_edges = [
        Segment::new((rx, ry), (rx + w, ry)),
        Segment::new((rx + w, ry), (rx + w, ry + h)),
        Segment::new((rx + w, ry + h), (rx, ry + h)),
        Segment::new((rx, ry + h), (rx, ry)),
    ];

    let mut j = n - 1;
    for i in 0..n {
        let poly_edge = Segment::new((xs[j], ys[j]), (xs[i], ys[i]));
        for rect_edge in &rect_edges {
            if lines_intersect(poly_edge, *rect_edge) {
                return true;
            }
        }
        j = i;
    }

    if point_in_rectangle(xs[0], ys[0], rx, ry, w, h) {
        return true;
    }
    point_in_polygon(rx, ry, xs, ys)
}

/// True iff the rectangle `(rx, ry, w, h)` is entirely contained within the
/// polygon, checked at its four covered corners. This is the optimization
/// witness that lets insertion stop descending once a leaf is fully covered.
pub(crate) fn rectangle_inside_polygon(xs: &[i32], ys: &[i32], rx: i32, ry: i32, w: i32, h: i32) -> bool {
    point_in_polygon(rx, ry, xs, ys)
        && point_in_polygon(rx + w - 1, ry, xs, ys)
        && point_in_polygon(rx, ry + h - 1, xs, ys)
        && point_in_polygon(rx + w - 1, ry + h - 1, xs, ys)
}
