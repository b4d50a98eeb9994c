//! Line segment type.
//!
//! This module provides the Line type representing a line segment between two points.
//! The skin pipeline only needs it for point-to-segment distances during simplification.

use super::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A line segment defined by two endpoints.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Line {
    pub a: Point,
    pub b: Point,
}

impl Line {
    /// Create a new line segment from two points.
    #[inline]
    pub const fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    /// Squared distance from a point to this segment.
    #[inline]
    pub fn distance_to_point_squared(&self, p: &Point) -> i128 {
        p.distance_squared(&p.project_onto_segment(self.a, self.b))
    }

    /// Static method: Calculate the squared distance from a point to a line segment.
    pub fn distance_to_squared(p: Point, a: Point, b: Point) -> f64 {
        Line::new(a, b).distance_to_point_squared(&p) as f64
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line({:?} -> {:?})", self.a, self.b)
    }
}
