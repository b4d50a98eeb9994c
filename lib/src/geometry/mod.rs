//! Geometry primitives for the slicer.
//!
//! This module provides the fundamental geometric types used by the skin and infill stages:
//! - [`Point`] - 2D point with integer coordinates (scaled), [`PointF`] - unscaled (mm)
//! - [`Line`] - Line segment between two points
//! - [`Polygon`] - Closed polygon (boundary)
//! - [`ExPolygon`] - Polygon with holes (exterior + interior contours)
//! - [`BoundingBox`] - Axis-aligned bounding box
//!
//! ## Coordinate System
//!
//! The slicer uses scaled integer coordinates internally to avoid floating-point precision issues.
//! Coordinates are scaled by `SCALING_FACTOR` (1,000,000), so 1 unit = 1 nanometer.
//!
//! - Use `scale()` to convert from mm to internal units
//! - Use `unscale()` to convert from internal units to mm

mod bounding_box;
mod expolygon;
mod line;
mod point;
mod polygon;
pub mod simplify;

pub use bounding_box::BoundingBox;
pub use expolygon::{ExPolygon, ExPolygons};
pub use line::Line;
pub use point::{Point, PointF, Points};
pub use polygon::{Polygon, Polygons};
pub use simplify::{
    douglas_peucker, douglas_peucker_polygon, remove_duplicate_points, DEFAULT_SIMPLIFY_TOLERANCE,
};
