//! Closed polygon type.
//!
//! A [`Polygon`] is a closed ring of points; the closing edge from the last
//! point back to the first is implicit and the first point is not repeated.

use super::{BoundingBox, Point};
use crate::{scale, CoordF, SCALING_FACTOR};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A closed polygon in scaled coordinates.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    #[inline]
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Create a polygon from a vector of points.
    #[inline]
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    /// Create an axis-aligned rectangle, counter-clockwise.
    pub fn rectangle(min: Point, max: Point) -> Self {
        Self::from_points(vec![
            min,
            Point::new(max.x, min.y),
            max,
            Point::new(min.x, max.y),
        ])
    }

    /// Create an axis-aligned rectangle from millimetre coordinates.
    pub fn rectangle_mm(x: CoordF, y: CoordF, width: CoordF, height: CoordF) -> Self {
        Self::rectangle(
            Point::new(scale(x), scale(y)),
            Point::new(scale(x + width), scale(y + height)),
        )
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn points_mut(&mut self) -> &mut Vec<Point> {
        &mut self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// A polygon with fewer than three points encloses nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.len() < 3
    }

    /// Signed area in scaled units squared (positive for counter-clockwise).
    pub fn signed_area(&self) -> CoordF {
        if self.points.len() < 3 {
            return 0.0;
        }
        let mut sum: i128 = 0;
        let n = self.points.len();
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            sum += a.x as i128 * b.y as i128 - b.x as i128 * a.y as i128;
        }
        sum as CoordF / 2.0
    }

    /// Absolute area in scaled units squared.
    #[inline]
    pub fn area(&self) -> CoordF {
        self.signed_area().abs()
    }

    /// Absolute area in mm².
    #[inline]
    pub fn area_mm2(&self) -> CoordF {
        self.area() / (SCALING_FACTOR * SCALING_FACTOR)
    }

    #[inline]
    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() > 0.0
    }

    /// Reverse the winding order.
    pub fn reverse(&mut self) {
        self.points.reverse();
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_points(&self.points)
    }

    /// Even-odd point containment test. Points on an edge may go either way.
    pub fn contains_point(&self, p: &Point) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let pi = self.points[i];
            let pj = self.points[j];
            if (pi.y > p.y) != (pj.y > p.y) {
                let x_cross = pi.x as CoordF
                    + (p.y - pi.y) as CoordF * (pj.x - pi.x) as CoordF / (pj.y - pi.y) as CoordF;
                if (p.x as CoordF) < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

impl fmt::Debug for Polygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Polygon({} points, area={:.3}mm²)",
            self.points.len(),
            self.area_mm2()
        )
    }
}

/// A collection of polygons.
pub type Polygons = Vec<Polygon>;
