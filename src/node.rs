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

use std::rc::Rc;

use crate::error::QuadtreeError;
use crate::geometry::{Polygon, Rect};

/// Subdivision stops once a node reaches this depth...
const MAX_DEPTH: u32 = 15;
/// ...or once either side of its box shrinks to this size or below.
const MIN_SIZE: i32 = 4;

/// One node of the quadtree. A node is either a **leaf** — no children, may
/// hold payloads — or **internal** — exactly four children, never holds
/// payloads itself. The split procedure is what establishes this invariant:
/// it moves every payload out of a node before the node gains children.
pub(crate) struct QuadNode {
    rect: Rect,
    depth: u32,
    children: Option<Box<[QuadNode; 4]>>,
    polygons: Vec<Rc<Polygon>>,
}

impl QuadNode {
    pub(crate) fn new(rect: Rect, depth: u32) -> QuadNode {
        QuadNode {
            rect,
            depth,
            children: None,
            polygons: Vec::new(),
        }
    }

    pub(crate) fn rect(&self) -> Rect {
        self.rect
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    fn at_subdivision_limit(&self) -> bool {
        self.depth >= MAX_DEPTH || self.rect.width <= MIN_SIZE || self.rect.height <= MIN_SIZE
    }

    /// Inserts `polygon` into this subtree, cloning the `Rc` into whichever
    /// nodes the polygon actually touches. Returns success trivially if the
    /// polygon doesn't collide with this node's box at all.
    pub(crate) fn put(&mut self, polygon: &Rc<Polygon>) -> Result<(), QuadtreeError> {
        if !self.rect.collides_with_polygon(&polygon.xs, &polygon.ys) {
            tracing::trace!(depth = self.depth, "polygon does not touch this subtree");
            return Ok(());
        }

        let shortcut = self.is_leaf() && self.rect.inside_polygon(&polygon.xs, &polygon.ys);
        if self.at_subdivision_limit() || shortcut {
            tracing::debug!(
                depth = self.depth,
                id = polygon.id,
                "attaching polygon to node"
            );
            self.polygons.push(Rc::clone(polygon));
            return Ok(());
        }

        if self.is_leaf() {
            self.split()?;
        }
        let children = self
            .children
            .as_mut()
            .expect("split just ran or this node was already internal");
        for child in children.iter_mut() {
            child.put(polygon)?;
        }
        Ok(())
    }

    /// Allocates four children, pushes every payload currently held here
    /// into whichever of them it belongs, then clears this node's own
    /// payload list — leaving it internal.
    fn split(&mut self) -> Result<(), QuadtreeError> {
        debug_assert!(self.is_leaf());
        tracing::debug!(depth = self.depth, "splitting node");

        let sub_rects = self.rect.split();
        let mut children: [QuadNode; 4] = [
            QuadNode::new(sub_rects[0], self.depth + 1),
            QuadNode::new(sub_rects[1], self.depth + 1),
            QuadNode::new(sub_rects[2], self.depth + 1),
            QuadNode::new(sub_rects[3], self.depth + 1),
        ];

        for polygon in &self.polygons {
            for child in children.iter_mut() {
                child.put(polygon)?;
            }
        }

        self.children = Some(Box::new(children));
        self.polygons.clear();
        Ok(())
    }

    /// Descends to the unique leaf containing `(x, y)`. The caller must
    /// already have verified the point is within `self.rect`.
    fn find_leaf(&self, x: i32, y: i32) -> &QuadNode {
        match &self.children {
            None => self,
            Some(children) => {
                let quadrant = self.rect.quadrant_of(x, y);
                children[quadrant as usize].find_leaf(x, y)
            }
        }
    }

    /// Collects the ids of every payload at the leaf containing `(x, y)`
    /// whose polygon actually contains the point, in encounter order.
    pub(crate) fn query(&self, x: i32, y: i32, out: &mut Vec<i64>) {
        let leaf = self.find_leaf(x, y);
        for polygon in &leaf.polygons {
            if polygon.contains_point(x, y) {
                out.push(polygon.id);
            }
        }
    }

    /// Removes every payload reference (at any depth) whose id matches.
    /// Split tree structure is never compacted back down.
    pub(crate) fn remove(&mut self, id: i64) {
        if let Some(children) = &mut self.children {
            for child in children.iter_mut() {
                child.remove(id);
            }
        }
        self.polygons.retain(|p| p.id != id);
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        match &self.children {
            None => {
                assert!(self.depth <= MAX_DEPTH);
            }
            Some(children) => {
                assert!(self.polygons.is_empty(), "internal node holds payloads");
                assert_eq!(children.len(), 4);
                for child in children.iter() {
                    child.check_invariants();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Polygon;

    fn polygon(id: i64, xs: &[i32], ys: &[i32]) -> Rc<Polygon> {
        Rc::new(Polygon::new(id, xs, ys))
    }

    #[test]
    fn full_cover_shortcut_avoids_split() {
        let mut root = QuadNode::new(Rect::new(0, 0, 64, 64), 0);
        let square = polygon(1, &[0, 64, 64, 0], &[0, 0, 64, 64]);
        root.put(&square).unwrap();
        assert!(root.is_leaf());
    }

    #[test]
    fn splitting_moves_payloads_into_children() {
        let mut root = QuadNode::new(Rect::new(0, 0, 80, 60), 0);
        let tri_a = polygon(0, &[70, 32, 10], &[49, 14, 34]);
        let tri_b = polygon(1, &[12, 39, 60], &[34, 22, 23]);
        root.put(&tri_a).unwrap();
        root.put(&tri_b).unwrap();
        root.check_invariants();

        let mut got = Vec::new();
        root.query(39, 39, &mut got);
        got.sort_unstable();
        assert_eq!(got, vec![0]);
    }

    #[test]
    fn remove_drops_every_matching_copy() {
        let mut root = QuadNode::new(Rect::new(0, 0, 80, 60), 0);
        let tri = polygon(1, &[70, 32, 10], &[49, 14, 34]);
        root.put(&tri).unwrap();
        root.put(&tri).unwrap();
        root.remove(1);
        let mut got = Vec::new();
        root.query(40, 30, &mut got);
        assert!(got.is_empty());
    }
}
