//! Axis-aligned bounding boxes.
//!
//! Bounding boxes gate the pairwise region tests of the skin and infill stages:
//! two regions whose boxes do not [`hit`](BoundingBox::hit) cannot overlap, so the
//! exact polygon boolean between them is skipped.

use super::Point;
use crate::{unscale, CoordF};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned bounding box in scaled coordinates.
///
/// An empty box is `defined == false`; it contains nothing and hits nothing.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
    pub defined: bool,
}

impl BoundingBox {
    /// Create an undefined (empty) bounding box.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bounding box from two corners.
    #[inline]
    pub fn from_corners(min: Point, max: Point) -> Self {
        Self {
            min: Point::new(min.x.min(max.x), min.y.min(max.y)),
            max: Point::new(min.x.max(max.x), min.y.max(max.y)),
            defined: true,
        }
    }

    /// Create the bounding box of a set of points.
    pub fn from_points(points: &[Point]) -> Self {
        let mut bb = Self::new();
        for p in points {
            bb.merge_point(*p);
        }
        bb
    }

    /// Grow this box to include a point.
    pub fn merge_point(&mut self, p: Point) {
        if self.defined {
            self.min.x = self.min.x.min(p.x);
            self.min.y = self.min.y.min(p.y);
            self.max.x = self.max.x.max(p.x);
            self.max.y = self.max.y.max(p.y);
        } else {
            self.min = p;
            self.max = p;
            self.defined = true;
        }
    }

    /// Grow this box to include another box.
    pub fn merge(&mut self, other: &BoundingBox) {
        if other.defined {
            self.merge_point(other.min);
            self.merge_point(other.max);
        }
    }

    /// Check whether two boxes overlap. Touching edges count as a hit.
    ///
    /// This is a conservative pre-filter: a hit does not imply that the
    /// enclosed geometry overlaps, but a miss guarantees that it does not.
    #[inline]
    pub fn hit(&self, other: &BoundingBox) -> bool {
        self.defined
            && other.defined
            && self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Check whether a point lies inside the box (inclusive).
    #[inline]
    pub fn contains(&self, p: &Point) -> bool {
        self.defined && p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Box width in mm.
    pub fn width_mm(&self) -> CoordF {
        if self.defined {
            unscale(self.max.x - self.min.x)
        } else {
            0.0
        }
    }

    /// Box height in mm.
    pub fn height_mm(&self) -> CoordF {
        if self.defined {
            unscale(self.max.y - self.min.y)
        } else {
            0.0
        }
    }
}

impl fmt::Debug for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.defined {
            write!(f, "BoundingBox({} - {})", self.min, self.max)
        } else {
            write!(f, "BoundingBox(undefined)")
        }
    }
}
