//! Sparse infill areas.
//!
//! The sparse infill of a region is what remains inside its innermost wall
//! once the skin of the layer is taken out. It is computed with the overlap
//! distance removed and then grown back by it, so the stored area overlaps
//! the walls and skin it touches by exactly that distance.
//!
//! # Algorithm
//!
//! 1. Shrink the innermost wall by half its line width plus the overlap
//! 2. Subtract the skin outlines of every region whose bounding box overlaps
//!    this one (itself included)
//! 3. Drop fragments below the minimum area
//! 4. Grow the result by the overlap
//!
//! The combined infill levels are built afterwards by [`combine`].

pub mod combine;

use crate::clipper::{difference, grow, remove_small_areas, shrink, total_area_mm2, OffsetJoinType};
use crate::config::InfillParams;
use crate::geometry::ExPolygons;
use crate::slice::{Layer, LayerRegion};
use log::{debug, trace};

pub use combine::{combine_group_tops, combine_infill_layers, combine_layer_group};

fn region_infill(region: &LayerRegion, layer: &Layer, params: &InfillParams) -> Option<ExPolygons> {
    if !region.has_walls(params.wall_line_count) {
        return None;
    }
    let innermost = region.innermost_inset()?;

    let mut infill = shrink(
        innermost,
        params.innermost_wall_extrusion_width / 2.0 + params.infill_skin_overlap,
        OffsetJoinType::Miter,
    );

    for other in layer.regions.iter().filter(|other| region.hits(other)) {
        for skin in &other.skin_parts {
            if infill.is_empty() {
                break;
            }
            infill = difference(&infill, std::slice::from_ref(&skin.outline));
        }
    }

    let infill = remove_small_areas(&infill, params.min_area);
    Some(grow(&infill, params.infill_skin_overlap, OffsetJoinType::Miter))
}

/// Compute the sparse infill area of every region of a layer.
///
/// Returns one entry per region, in region order. `None` marks a region
/// with fewer walls than required; it gets no infill.
pub fn compute_infill_areas(layer: &Layer, params: &InfillParams) -> Vec<Option<ExPolygons>> {
    layer
        .regions
        .iter()
        .map(|region| region_infill(region, layer, params))
        .collect()
}

/// Compute and store the sparse infill of every region of a layer.
///
/// Each region gets its infill area and the matching first combine level.
/// Regions without enough walls only get an empty combine level, so every
/// region of the layer ends with the same number of levels.
pub fn generate_infill(layer: &mut Layer, params: &InfillParams) {
    let areas = compute_infill_areas(layer, params);
    let layer_id = layer.id();

    for (region, area) in layer.regions.iter_mut().zip(areas) {
        match area {
            Some(area) => {
                trace!("layer {}: infill {:.2}mm²", layer_id, total_area_mm2(&area));
                region.infill_area_per_combine.push(area.clone());
                region.infill_area = area;
            }
            None => region.infill_area_per_combine.push(ExPolygons::new()),
        }
    }
    debug!("layer {}: infill {:.2}mm²", layer_id, layer.infill_area_mm2());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SkinSettings;
    use crate::geometry::Polygon;
    use crate::slice::test_support::{make_layers, make_region, make_square_mm};
    use crate::slice::SkinPart;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn params() -> InfillParams {
        SkinSettings::default().infill_params()
    }

    #[test]
    fn test_infill_is_inset_regrown_by_overlap() {
        let mut layers = make_layers(1, |_| vec![make_region(0.0, 0.0, 10.0, 2, 0.4)]);
        generate_infill(&mut layers[0], &params());

        let region = &layers[0].regions[0];
        // Innermost wall 8.8mm, shrunk by 0.2 + 0.04, grown back by 0.04.
        assert!(approx(region.infill_area_mm2(), 8.4 * 8.4, 0.01));
        assert_eq!(region.infill_area_per_combine.len(), 1);
        assert_eq!(region.infill_area_per_combine[0], region.infill_area);
    }

    #[test]
    fn test_too_few_walls_gets_placeholder() {
        let mut layers = make_layers(1, |_| vec![make_region(0.0, 0.0, 10.0, 1, 0.4)]);
        generate_infill(&mut layers[0], &params());

        let region = &layers[0].regions[0];
        assert!(region.infill_area.is_empty());
        assert_eq!(region.infill_area_per_combine.len(), 1);
        assert!(region.infill_area_per_combine[0].is_empty());
    }

    #[test]
    fn test_skin_is_subtracted() {
        let mut layers = make_layers(1, |_| vec![make_region(0.0, 0.0, 10.0, 2, 0.4)]);
        // Left half of the region is skin.
        layers[0].regions[0]
            .skin_parts
            .push(SkinPart::new(Polygon::rectangle_mm(0.0, 0.0, 5.0, 10.0).into()));
        generate_infill(&mut layers[0], &params());

        // Sparse zone x 5.0..9.16 before regrowth, 4.96..9.2 after; y 0.8..9.2.
        let area = layers[0].regions[0].infill_area_mm2();
        assert!(approx(area, 4.24 * 8.4, 0.02), "area {area}");
    }

    #[test]
    fn test_neighbour_skin_is_subtracted() {
        let mut layers = make_layers(1, |_| {
            vec![
                make_region(0.0, 0.0, 10.0, 2, 0.4),
                LayerRegion::new(make_square_mm(5.0, 0.0, 10.0), vec![]),
                make_region(40.0, 0.0, 10.0, 2, 0.4),
            ]
        });
        layers[0].regions[1]
            .skin_parts
            .push(SkinPart::new(make_square_mm(5.0, 0.0, 10.0)));
        generate_infill(&mut layers[0], &params());

        let regions = &layers[0].regions;
        assert!(approx(regions[0].infill_area_mm2(), 4.24 * 8.4, 0.02));
        // The neighbour without walls only gets a placeholder.
        assert!(regions[1].infill_area.is_empty());
        assert_eq!(regions[1].infill_area_per_combine.len(), 1);
        // Far away region is untouched by the skin.
        assert!(approx(regions[2].infill_area_mm2(), 8.4 * 8.4, 0.01));
    }

    #[test]
    fn test_fully_skinned_region_has_no_infill() {
        let mut layers = make_layers(1, |_| vec![make_region(0.0, 0.0, 10.0, 2, 0.4)]);
        layers[0].regions[0]
            .skin_parts
            .push(SkinPart::new(make_square_mm(0.0, 0.0, 10.0)));
        generate_infill(&mut layers[0], &params());

        let region = &layers[0].regions[0];
        assert!(region.infill_area.is_empty());
        assert_eq!(region.infill_area_per_combine.len(), 1);
        assert_eq!(total_area_mm2(&region.infill_area_per_combine[0]), 0.0);
    }
}
