//! Skin and infill configuration types.
//!
//! [`SkinSettings`] holds every mesh setting the skin, infill and combine stages
//! read. Stages never look settings up by name: each one receives the small
//! parameter struct it needs ([`SkinAreaParams`], [`SkinInsetParams`],
//! [`InfillParams`], [`CombineParams`]), projected from the settings once per build.

use crate::{CoordF, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest skin or infill part kept after boolean operations (mm², 0.4mm × 0.4mm).
pub const MIN_AREA_SIZE: CoordF = 0.4 * 0.4;

/// Default erosion/dilation distance applied to combined infill (mm).
pub const DEFAULT_COMBINE_OPENING_DISTANCE: CoordF = 0.2;

/// How skin areas are detected from the neighbouring layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkinStrategy {
    /// Skin is skipped only where every layer in the shell window is solid.
    ///
    /// One intersection per window layer; never leaves gaps above or below
    /// thin cavities.
    #[default]
    ExactWindowed,

    /// Only the layer exactly `down_skin_count` below (or `up_skin_count` above)
    /// is consulted.
    ///
    /// Cheap, but cavities thinner than the shell window are not detected.
    FastApproximate,
}

impl SkinStrategy {
    /// Map the legacy "no small gaps heuristic" flag onto a strategy.
    pub fn from_no_small_gaps_heuristic(enabled: bool) -> Self {
        if enabled {
            SkinStrategy::FastApproximate
        } else {
            SkinStrategy::ExactWindowed
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SkinStrategy::ExactWindowed => "exact windowed",
            SkinStrategy::FastApproximate => "fast approximate",
        }
    }
}

impl fmt::Display for SkinStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Mesh settings consumed by the skin and infill stages.
///
/// Distances are in mm, areas in mm², counts in layers or loops.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinSettings {
    // === Extrusion widths ===
    /// Line width used for skin perimeter insets (mm).
    pub extrusion_width: CoordF,
    /// Line width of the innermost wall (mm).
    pub innermost_wall_extrusion_width: CoordF,

    // === Walls ===
    /// Number of walls a region needs before it receives skin or infill.
    pub wall_line_count: usize,

    // === Skin ===
    /// Number of solid layers above a bottom surface.
    pub down_skin_count: usize,
    /// Number of solid layers below a top surface.
    pub up_skin_count: usize,
    /// Number of perimeter loops generated inside each skin part.
    pub skin_inset_count: usize,
    /// Skin detection strategy.
    pub skin_strategy: SkinStrategy,

    // === Infill ===
    /// Overlap between sparse infill and the walls/skin around it (mm).
    pub infill_skin_overlap: CoordF,
    /// Distance between sparse infill lines (mm). Zero or less disables sparse infill.
    pub infill_line_distance: CoordF,
    /// Number of layers merged into one thick infill pass.
    pub infill_sparse_combine: usize,

    // === Shells ===
    /// Number of top shell layers.
    pub top_layers: usize,
    /// Number of bottom shell layers.
    pub bottom_layers: usize,

    // === Cleanup ===
    /// Skin and infill parts smaller than this are dropped (mm²).
    pub min_area: CoordF,
    /// Erosion/dilation distance applied to combined infill (mm).
    pub combine_opening_distance: CoordF,
    /// Simplification tolerance for skin insets (mm).
    pub simplify_tolerance: CoordF,
}

impl Default for SkinSettings {
    fn default() -> Self {
        Self {
            extrusion_width: 0.4,
            innermost_wall_extrusion_width: 0.4,
            wall_line_count: 2,
            down_skin_count: 4,
            up_skin_count: 4,
            skin_inset_count: 0,
            skin_strategy: SkinStrategy::ExactWindowed,
            infill_skin_overlap: 0.04,
            infill_line_distance: 2.0,
            infill_sparse_combine: 1,
            top_layers: 4,
            bottom_layers: 4,
            min_area: MIN_AREA_SIZE,
            combine_opening_distance: DEFAULT_COMBINE_OPENING_DISTANCE,
            simplify_tolerance: crate::geometry::DEFAULT_SIMPLIFY_TOLERANCE,
        }
    }
}

impl SkinSettings {
    /// Create settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set both skin perimeter and innermost wall line widths.
    pub fn line_width(mut self, width: CoordF) -> Self {
        self.extrusion_width = width;
        self.innermost_wall_extrusion_width = width;
        self
    }

    /// Builder: set the required wall count.
    pub fn walls(mut self, count: usize) -> Self {
        self.wall_line_count = count;
        self
    }

    /// Builder: set the top and bottom skin layer counts and shell counts together.
    pub fn shells(mut self, bottom: usize, top: usize) -> Self {
        self.down_skin_count = bottom;
        self.up_skin_count = top;
        self.bottom_layers = bottom;
        self.top_layers = top;
        self
    }

    /// Builder: set the number of skin perimeter loops.
    pub fn skin_insets(mut self, count: usize) -> Self {
        self.skin_inset_count = count;
        self
    }

    /// Builder: set the skin detection strategy.
    pub fn strategy(mut self, strategy: SkinStrategy) -> Self {
        self.skin_strategy = strategy;
        self
    }

    /// Builder: set the infill/skin overlap.
    pub fn overlap(mut self, overlap: CoordF) -> Self {
        self.infill_skin_overlap = overlap;
        self
    }

    /// Builder: set the infill combine factor.
    pub fn combine(mut self, layers: usize) -> Self {
        self.infill_sparse_combine = layers;
        self
    }

    /// Validate the settings.
    ///
    /// Zero counts are valid and simply disable the matching stage.
    pub fn validate(&self) -> Result<()> {
        let distances = [
            ("extrusion_width", self.extrusion_width),
            (
                "innermost_wall_extrusion_width",
                self.innermost_wall_extrusion_width,
            ),
            ("infill_skin_overlap", self.infill_skin_overlap),
            ("min_area", self.min_area),
            ("combine_opening_distance", self.combine_opening_distance),
            ("simplify_tolerance", self.simplify_tolerance),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        if !self.infill_line_distance.is_finite() {
            return Err(Error::Config(format!(
                "infill_line_distance must be finite, got {}",
                self.infill_line_distance
            )));
        }
        Ok(())
    }

    pub fn skin_area_params(&self) -> SkinAreaParams {
        SkinAreaParams {
            innermost_wall_extrusion_width: self.innermost_wall_extrusion_width,
            down_skin_count: self.down_skin_count,
            up_skin_count: self.up_skin_count,
            wall_line_count: self.wall_line_count,
            strategy: self.skin_strategy,
            min_area: self.min_area,
        }
    }

    pub fn skin_inset_params(&self) -> SkinInsetParams {
        SkinInsetParams {
            extrusion_width: self.extrusion_width,
            inset_count: self.skin_inset_count,
            simplify_tolerance: self.simplify_tolerance,
        }
    }

    pub fn infill_params(&self) -> InfillParams {
        InfillParams {
            innermost_wall_extrusion_width: self.innermost_wall_extrusion_width,
            infill_skin_overlap: self.infill_skin_overlap,
            wall_line_count: self.wall_line_count,
            min_area: self.min_area,
        }
    }

    pub fn combine_params(&self) -> CombineParams {
        CombineParams {
            amount: self.infill_sparse_combine,
            bottom_layers: self.bottom_layers,
            top_layers: self.top_layers,
            infill_line_distance: self.infill_line_distance,
            opening_distance: self.combine_opening_distance,
            wall_line_count: self.wall_line_count,
        }
    }
}

impl fmt::Display for SkinSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SkinSettings(walls={}, skin={}↓/{}↑, {}, combine={})",
            self.wall_line_count,
            self.down_skin_count,
            self.up_skin_count,
            self.skin_strategy,
            self.infill_sparse_combine
        )
    }
}

/// Parameters of the skin area extraction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkinAreaParams {
    /// Innermost wall line width (mm); the skin starts half of it inside the wall.
    pub innermost_wall_extrusion_width: CoordF,
    pub down_skin_count: usize,
    pub up_skin_count: usize,
    pub wall_line_count: usize,
    pub strategy: SkinStrategy,
    /// Smallest skin part kept (mm²).
    pub min_area: CoordF,
}

/// Parameters of the skin perimeter generation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkinInsetParams {
    /// Skin perimeter line width (mm).
    pub extrusion_width: CoordF,
    pub inset_count: usize,
    /// Simplification tolerance (mm).
    pub simplify_tolerance: CoordF,
}

/// Parameters of the sparse infill area computation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InfillParams {
    /// Innermost wall line width (mm).
    pub innermost_wall_extrusion_width: CoordF,
    /// Overlap of infill into walls and skin (mm).
    pub infill_skin_overlap: CoordF,
    pub wall_line_count: usize,
    /// Smallest infill part kept (mm²).
    pub min_area: CoordF,
}

/// Parameters of the infill combiner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CombineParams {
    /// Number of layers merged per thick pass.
    pub amount: usize,
    pub bottom_layers: usize,
    pub top_layers: usize,
    /// Sparse infill line distance (mm); non-positive means no sparse infill.
    pub infill_line_distance: CoordF,
    /// Erosion/dilation distance applied to each combined intersection (mm).
    pub opening_distance: CoordF,
    /// Top regions with fewer walls keep their single placeholder level.
    pub wall_line_count: usize,
}

impl CombineParams {
    /// Parameters with the default opening distance.
    pub fn new(amount: usize, bottom_layers: usize, top_layers: usize) -> Self {
        Self {
            amount,
            bottom_layers,
            top_layers,
            infill_line_distance: 1.0,
            opening_distance: DEFAULT_COMBINE_OPENING_DISTANCE,
            wall_line_count: 0,
        }
    }
}
