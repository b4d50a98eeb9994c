//! Layer regions and their skin parts.
//!
//! A [`LayerRegion`] is one connected island of material on a layer. The wall
//! stage creates it with its outline and wall insets; the skin and infill
//! stages only append skin parts and fill in the infill fields.

use crate::clipper::total_area_mm2;
use crate::geometry::{BoundingBox, ExPolygon, ExPolygons};
use crate::CoordF;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A connected skin area and its perimeter loops.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkinPart {
    /// The skin area.
    pub outline: ExPolygon,

    /// Skin perimeter loops, outermost first. Each entry strictly nests in the previous one.
    pub insets: Vec<ExPolygons>,
}

impl SkinPart {
    /// Create a skin part without insets.
    pub fn new(outline: ExPolygon) -> Self {
        Self {
            outline,
            insets: Vec::new(),
        }
    }

    /// Area of the skin outline in mm².
    #[inline]
    pub fn area_mm2(&self) -> CoordF {
        self.outline.area_mm2()
    }

    /// The innermost generated perimeter loop, if any.
    #[inline]
    pub fn innermost_inset(&self) -> Option<&ExPolygons> {
        self.insets.last()
    }
}

impl fmt::Debug for SkinPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SkinPart(area={:.2}mm², {} insets)",
            self.area_mm2(),
            self.insets.len()
        )
    }
}

/// One connected material region of a layer.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct LayerRegion {
    /// The sliced outline of the region.
    pub outline: ExPolygon,

    /// Bounding box of the outline, used to prune region pairs.
    pub boundary_box: BoundingBox,

    /// Wall insets, outermost first (index 0 is the outer wall).
    pub insets: Vec<ExPolygons>,

    /// Skin parts (top/bottom solid areas).
    pub skin_parts: Vec<SkinPart>,

    /// Sparse infill area of this layer alone.
    pub infill_area: ExPolygons,

    /// Sparse infill per combine level. Entry 0 is this layer's own infill,
    /// entry `n` is area printed once for `n + 1` consecutive layers.
    pub infill_area_per_combine: Vec<ExPolygons>,
}

impl LayerRegion {
    /// Create a region from its outline and wall insets.
    pub fn new(outline: ExPolygon, insets: Vec<ExPolygons>) -> Self {
        let boundary_box = outline.bounding_box();
        Self {
            outline,
            boundary_box,
            insets,
            ..Default::default()
        }
    }

    /// Number of wall insets present.
    #[inline]
    pub fn wall_count(&self) -> usize {
        self.insets.len()
    }

    /// Whether at least `wall_count` walls are present.
    #[inline]
    pub fn has_walls(&self, wall_count: usize) -> bool {
        self.insets.len() >= wall_count
    }

    /// The innermost wall inset.
    #[inline]
    pub fn innermost_inset(&self) -> Option<&ExPolygons> {
        self.insets.last()
    }

    /// The innermost wall inset that counts towards `wall_count` walls.
    ///
    /// This is the inset at `clamp(wall_count, 0, len) - 1`, or `None` for a
    /// region without walls.
    pub fn wall_for_count(&self, wall_count: usize) -> Option<&ExPolygons> {
        let idx = wall_count.min(self.insets.len()).checked_sub(1)?;
        self.insets.get(idx)
    }

    /// Whether the two regions' bounding boxes overlap.
    #[inline]
    pub fn hits(&self, other: &LayerRegion) -> bool {
        self.boundary_box.hit(&other.boundary_box)
    }

    /// Total skin area in mm².
    pub fn skin_area_mm2(&self) -> CoordF {
        self.skin_parts.iter().map(|s| s.area_mm2()).sum()
    }

    /// Single-layer infill area in mm².
    pub fn infill_area_mm2(&self) -> CoordF {
        total_area_mm2(&self.infill_area)
    }

    /// Infill at a combine level, if that level exists.
    #[inline]
    pub fn combined_infill(&self, level: usize) -> Option<&ExPolygons> {
        self.infill_area_per_combine.get(level)
    }

    /// Area printed per layer summed over all combine levels, in mm².
    ///
    /// Level `n` counts `n + 1` times since it stands for that many layers.
    pub fn combined_layer_area_mm2(&self) -> CoordF {
        self.infill_area_per_combine
            .iter()
            .enumerate()
            .map(|(level, area)| (level + 1) as CoordF * total_area_mm2(area))
            .sum()
    }

    /// Drop everything derived by the skin and infill stages.
    pub fn clear_derived(&mut self) {
        self.skin_parts.clear();
        self.infill_area.clear();
        self.infill_area_per_combine.clear();
    }
}

impl fmt::Debug for LayerRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LayerRegion({} walls, {} skin parts, {} combine levels)",
            self.insets.len(),
            self.skin_parts.len(),
            self.infill_area_per_combine.len()
        )
    }
}
