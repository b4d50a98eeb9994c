//! Pipeline module - runs the skin and infill stages over a whole mesh.
//!
//! The mesh arrives from the wall stage with every region's wall insets in
//! place. The pipeline then runs, in order:
//!
//! 1. Skin areas for every layer (read-only over the stack, then applied)
//! 2. Skin perimeters for every region
//! 3. Sparse infill for every layer
//! 4. Infill combining over aligned layer groups
//!
//! Stages 1 to 3 run in parallel over layers. Stage 1 reads a window of
//! neighbouring layers, so its results are collected before any layer is
//! written. Stage 3 only reads the skin of its own layer.
//!
//! # Example
//!
//! ```rust,ignore
//! use slicer_skin::{SkinPipeline, SkinSettings, SliceMesh};
//!
//! let settings = SkinSettings::default().walls(2).shells(4, 4).combine(2);
//! let mut mesh = SliceMesh::new(layers, settings.clone());
//! let stats = SkinPipeline::new(settings).process(&mut mesh)?;
//! ```

use crate::config::SkinSettings;
use crate::infill::{combine_infill_layers, generate_infill};
use crate::skin::{compute_skin_areas, generate_skin_insets};
use crate::slice::{SkinPart, SliceMesh};
use crate::{CoordF, Result};
use log::{debug, info};
use rayon::prelude::*;
use std::fmt;

/// Summary of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineStats {
    /// Number of layers processed.
    pub layers: usize,

    /// Skin parts added over all layers.
    pub skin_parts: usize,

    /// Skin perimeter loops generated.
    pub skin_insets: usize,

    /// Total single-layer sparse infill area (mm²).
    pub infill_area_mm2: CoordF,

    /// Number of combine groups processed.
    pub combine_groups: usize,
}

impl fmt::Display for PipelineStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} layers, {} skin parts, {} skin insets, {:.2}mm² infill, {} combine groups",
            self.layers, self.skin_parts, self.skin_insets, self.infill_area_mm2, self.combine_groups
        )
    }
}

/// Derives skin, skin perimeters, infill and combined infill for a mesh.
#[derive(Debug, Clone, Default)]
pub struct SkinPipeline {
    settings: SkinSettings,
}

impl SkinPipeline {
    /// Create a new pipeline with the given settings.
    pub fn new(settings: SkinSettings) -> Self {
        Self { settings }
    }

    /// Create a pipeline running with the mesh's own settings.
    pub fn for_mesh(mesh: &SliceMesh) -> Self {
        Self::new(mesh.settings.clone())
    }

    /// Get the settings.
    pub fn settings(&self) -> &SkinSettings {
        &self.settings
    }

    /// Run all stages on the mesh.
    ///
    /// Must run once per mesh: a second run appends duplicate skin parts.
    pub fn process(&self, mesh: &mut SliceMesh) -> Result<PipelineStats> {
        self.process_with_callback(mesh, |_, _| {})
    }

    /// Run all stages with a progress callback.
    ///
    /// The callback receives (stage_name, progress_0_to_1).
    pub fn process_with_callback<F>(&self, mesh: &mut SliceMesh, mut callback: F) -> Result<PipelineStats>
    where
        F: FnMut(&str, f64),
    {
        self.settings.validate()?;
        debug!("Running skin pipeline with {}", self.settings);

        let mut stats = PipelineStats {
            layers: mesh.layer_count(),
            ..Default::default()
        };

        // Step 1: Skin areas
        callback("skin", 0.0);
        let area_params = self.settings.skin_area_params();
        let layers = &mesh.layers;
        let skins: Vec<Vec<Vec<SkinPart>>> = (0..layers.len())
            .into_par_iter()
            .map(|layer_nr| compute_skin_areas(layer_nr, layers, &area_params))
            .collect();
        for (layer, layer_skins) in mesh.layers.iter_mut().zip(skins) {
            for (region, parts) in layer.regions.iter_mut().zip(layer_skins) {
                stats.skin_parts += parts.len();
                region.skin_parts.extend(parts);
            }
        }
        callback("skin", 1.0);

        // Step 2: Skin perimeters
        callback("skin_insets", 0.0);
        let inset_params = self.settings.skin_inset_params();
        stats.skin_insets = mesh
            .layers
            .par_iter_mut()
            .map(|layer| {
                layer
                    .regions
                    .iter_mut()
                    .map(|region| generate_skin_insets(region, &inset_params))
                    .sum::<usize>()
            })
            .sum();
        callback("skin_insets", 1.0);

        // Step 3: Sparse infill
        callback("infill", 0.0);
        let infill_params = self.settings.infill_params();
        mesh.layers
            .par_iter_mut()
            .for_each(|layer| generate_infill(layer, &infill_params));
        stats.infill_area_mm2 = mesh.layers.iter().map(|l| l.infill_area_mm2()).sum();
        callback("infill", 1.0);

        // Step 4: Combine infill
        callback("combine", 0.0);
        stats.combine_groups = combine_infill_layers(&mut mesh.layers, &self.settings.combine_params());
        callback("combine", 1.0);

        info!("Skin pipeline done: {}", stats);
        Ok(stats)
    }
}
