//! # Slicer Skin
//!
//! Per-layer region derivation stage of an FFF slicing pipeline.
//!
//! Given a mesh that has already been sliced into layers, split into regions
//! and given its wall insets, this library derives for every region:
//! - Top/bottom skin areas, by comparing the innermost wall against a window of
//!   layers above and below
//! - Skin perimeter insets
//! - The sparse infill area left once walls and skin are taken out
//! - Combined infill, merging the sparse infill of several consecutive layers
//!   into thicker extrusion passes
//!
//! ## Example
//!
//! ```rust,ignore
//! use slicer_skin::{SkinPipeline, SkinSettings, SliceMesh};
//!
//! let mut mesh = SliceMesh::new(layers, SkinSettings::default());
//! let stats = SkinPipeline::new(mesh.settings.clone()).process(&mut mesh)?;
//! println!("{} skin parts", stats.skin_parts);
//! ```

// Core modules
pub mod clipper;
pub mod config;
pub mod geometry;
pub mod infill;
pub mod pipeline;
pub mod skin;
pub mod slice;

pub use config::{
    CombineParams, InfillParams, SkinAreaParams, SkinInsetParams, SkinSettings, SkinStrategy,
    MIN_AREA_SIZE,
};
pub use geometry::{BoundingBox, ExPolygon, ExPolygons, Point, PointF, Polygon, Polygons};
pub use infill::{
    combine_group_tops, combine_infill_layers, combine_layer_group, compute_infill_areas,
    generate_infill,
};
pub use pipeline::{PipelineStats, SkinPipeline};
pub use skin::{
    compute_skin_areas, generate_skin_areas, generate_skin_insets, generate_skins,
    inside_polygons,
};
pub use slice::{Layer, LayerRegion, SkinPart, SliceMesh};

// Re-export clipper operations
pub use clipper::{
    difference, grow, intersection, offset_expolygons, opening, remove_small_areas, shrink,
    simplify_region, split_into_parts, total_area_mm2, union, union_ex, OffsetJoinType,
};

/// Coordinate type used throughout the slicer.
/// Using i64 for integer coordinates (scaled by SCALING_FACTOR) to avoid floating-point issues.
pub type Coord = i64;

/// Floating-point coordinate type for unscaled values.
pub type CoordF = f64;

/// Scaling factor: coordinates are stored as integers scaled by this factor.
/// 1 unit = 1 nanometer, so 1mm = 1_000_000 units.
pub const SCALING_FACTOR: f64 = 1_000_000.0;

/// Scale a floating-point coordinate to integer.
#[inline]
pub fn scale(v: CoordF) -> Coord {
    (v * SCALING_FACTOR).round() as Coord
}

/// Unscale an integer coordinate to floating-point.
#[inline]
pub fn unscale(v: Coord) -> CoordF {
    v as CoordF / SCALING_FACTOR
}

/// Result type used throughout the slicer.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for slicer operations.
///
/// Geometric degeneracies (empty offsets, missing neighbour layers, too few
/// walls) are never errors; they produce empty regions instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),
}
