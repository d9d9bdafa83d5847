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

use thiserror::Error;

/// Errors returned by [`crate::Quadtree`] operations.
///
/// Mirrors the stable integer error taxonomy of the quadtree this crate is
/// modeled on (`SUCCESS = 0`, `ERROR = 1`, `OUT_OF_MEMORY = 2`,
/// `OUT_OF_BOUNDS = 3`) — there is no `Success` variant because success is
/// `Ok(_)`, not a variant of this enum.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadtreeError {
    /// Reserved for generic, otherwise-unclassified failures. Never
    /// constructed by this crate; kept for parity with the four stable
    /// error codes of the original taxonomy.
    #[error("quadtree error")]
    Error,

    /// Allocation failed while mutating the tree. Never returned in
    /// practice under Rust's global allocator, which aborts on real
    /// allocation failure rather than handing back an error; retained so
    /// the full taxonomy is representable.
    #[error("out of memory")]
    OutOfMemory,

    /// A coordinate fell outside the quadtree's bounding rectangle, or the
    /// requested region has non-positive width or height.
    #[error("point or region out of bounds")]
    OutOfBounds,
}
