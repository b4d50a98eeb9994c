//! Layer and mesh containers.
//!
//! A [`SliceMesh`] is the hand-over structure from the wall stage: layers in
//! bottom-to-top order, each holding its regions with wall insets already set,
//! plus the settings the skin and infill stages run with.

use super::LayerRegion;
use crate::config::SkinSettings;
use crate::{scale, unscale, Coord, CoordF};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single horizontal layer.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Layer {
    /// Layer index (0-based, bottom to top).
    id: usize,

    /// Z coordinate of the top of this layer (scaled).
    print_z: Coord,

    /// Material regions of this layer.
    pub regions: Vec<LayerRegion>,
}

impl Layer {
    /// Create an empty layer.
    pub fn new(id: usize, print_z: Coord) -> Self {
        Self {
            id,
            print_z,
            regions: Vec::new(),
        }
    }

    /// Create an empty layer with a Z height in mm.
    pub fn new_f(id: usize, print_z: CoordF) -> Self {
        Self::new(id, scale(print_z))
    }

    /// Create a layer holding the given regions.
    pub fn with_regions(id: usize, print_z: CoordF, regions: Vec<LayerRegion>) -> Self {
        Self {
            id,
            print_z: scale(print_z),
            regions,
        }
    }

    #[inline]
    pub fn id(&self) -> usize {
        self.id
    }

    #[inline]
    pub fn print_z(&self) -> Coord {
        self.print_z
    }

    #[inline]
    pub fn print_z_mm(&self) -> CoordF {
        unscale(self.print_z)
    }

    #[inline]
    pub fn regions(&self) -> &[LayerRegion] {
        &self.regions
    }

    #[inline]
    pub fn regions_mut(&mut self) -> &mut Vec<LayerRegion> {
        &mut self.regions
    }

    /// Add a region to this layer.
    pub fn add_region(&mut self, region: LayerRegion) {
        self.regions.push(region);
    }

    #[inline]
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Total number of skin parts over all regions.
    pub fn skin_part_count(&self) -> usize {
        self.regions.iter().map(|r| r.skin_parts.len()).sum()
    }

    /// Total skin area over all regions (mm²).
    pub fn skin_area_mm2(&self) -> CoordF {
        self.regions.iter().map(|r| r.skin_area_mm2()).sum()
    }

    /// Total single-layer infill area over all regions (mm²).
    pub fn infill_area_mm2(&self) -> CoordF {
        self.regions.iter().map(|r| r.infill_area_mm2()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Layer(id={}, z={:.3}mm, {} regions)",
            self.id,
            self.print_z_mm(),
            self.regions.len()
        )
    }
}

/// Type alias for a collection of layers.
pub type Layers = Vec<Layer>;

/// Sliced mesh with walls, ready for skin and infill derivation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SliceMesh {
    /// Layers in bottom-to-top order; `layers[i].id() == i`.
    pub layers: Layers,

    /// Settings of this mesh.
    pub settings: SkinSettings,
}

impl SliceMesh {
    pub fn new(layers: Layers, settings: SkinSettings) -> Self {
        Self { layers, settings }
    }

    #[inline]
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    #[inline]
    pub fn layer(&self, idx: usize) -> Option<&Layer> {
        self.layers.get(idx)
    }

    #[inline]
    pub fn layer_mut(&mut self, idx: usize) -> Option<&mut Layer> {
        self.layers.get_mut(idx)
    }

    /// Total number of skin parts in the mesh.
    pub fn skin_part_count(&self) -> usize {
        self.layers.iter().map(|l| l.skin_part_count()).sum()
    }
}
