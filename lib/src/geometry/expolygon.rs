//! Polygon with holes.
//!
//! An [`ExPolygon`] is one connected planar part: an outer contour plus zero or
//! more holes. A set of parts ([`ExPolygons`]) is the region value every stage
//! of the skin/infill pipeline works with.

use super::simplify::douglas_peucker_polygon;
use super::{BoundingBox, Point, Polygon};
use crate::{unscale, Coord, CoordF, SCALING_FACTOR};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A polygon with holes.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExPolygon {
    /// The outer boundary.
    pub contour: Polygon,
    /// Interior boundaries.
    pub holes: Vec<Polygon>,
}

impl ExPolygon {
    /// Create an ExPolygon without holes.
    #[inline]
    pub fn new(contour: Polygon) -> Self {
        Self {
            contour,
            holes: Vec::new(),
        }
    }

    /// Create an ExPolygon with holes.
    #[inline]
    pub fn with_holes(contour: Polygon, holes: Vec<Polygon>) -> Self {
        Self { contour, holes }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.contour.is_empty()
    }

    /// Net area (contour minus holes) in scaled units squared.
    pub fn area(&self) -> CoordF {
        let holes: CoordF = self.holes.iter().map(|h| h.area()).sum();
        self.contour.area() - holes
    }

    /// Net area in mm².
    #[inline]
    pub fn area_mm2(&self) -> CoordF {
        self.area() / (SCALING_FACTOR * SCALING_FACTOR)
    }

    /// Bounding box of the outer contour.
    #[inline]
    pub fn bounding_box(&self) -> BoundingBox {
        self.contour.bounding_box()
    }

    /// Check whether a point lies inside the contour and outside every hole.
    pub fn contains_point(&self, p: &Point) -> bool {
        self.contour.contains_point(p) && !self.holes.iter().any(|h| h.contains_point(p))
    }

    /// Simplify contour and holes in place.
    ///
    /// `tolerance` is in scaled units. Holes that collapse are dropped.
    pub fn simplify(&mut self, tolerance: Coord) {
        let tolerance_mm = unscale(tolerance);
        self.contour = douglas_peucker_polygon(&self.contour, tolerance_mm);
        self.holes = self
            .holes
            .iter()
            .map(|h| douglas_peucker_polygon(h, tolerance_mm))
            .filter(|h| !h.is_empty())
            .collect();
    }
}

impl From<Polygon> for ExPolygon {
    fn from(contour: Polygon) -> Self {
        Self::new(contour)
    }
}

impl fmt::Debug for ExPolygon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ExPolygon({} contour points, {} holes, area={:.3}mm²)",
            self.contour.len(),
            self.holes.len(),
            self.area_mm2()
        )
    }
}

/// A collection of ExPolygons.
pub type ExPolygons = Vec<ExPolygon>;
