//! Top/bottom skin extraction and skin perimeters.
//!
//! A region needs solid skin wherever the material directly above or below
//! it is open within the configured shell thickness. The skin candidate is
//! the area enclosed by the region's innermost wall; everything that is
//! solid across the whole window of layers above (up-skin) or below
//! (down-skin) is subtracted from it.
//!
//! # Strategies
//!
//! - [`SkinStrategy::ExactWindowed`]: intersect the solid area of every layer
//!   in the window and subtract only what is solid throughout. Enclosed
//!   cavities anywhere in the window produce skin over them.
//! - [`SkinStrategy::FastApproximate`]: look only at the layer exactly
//!   `count` layers away. Cheaper, but misses cavities that close again
//!   before the end of the window.
//!
//! Window layers outside the mesh are air, so the bottom and top layers of a
//! mesh keep their full candidate skin.

use crate::clipper::{
    difference, intersection, remove_small_areas, shrink, simplify_region, split_into_parts,
    union, union_ex, OffsetJoinType,
};
use crate::config::{SkinAreaParams, SkinInsetParams, SkinStrategy};
use crate::geometry::{BoundingBox, ExPolygons};
use crate::slice::{Layer, LayerRegion, SkinPart};
use log::{debug, trace};
use std::ops::RangeInclusive;

/// Solid area of `layer` as seen from a region with the given bounding box.
///
/// Unions, over every region of `layer` whose bounding box overlaps
/// `boundary_box`, the innermost wall counting towards `wall_count` walls.
/// Regions without any wall contribute nothing.
pub fn inside_polygons(boundary_box: &BoundingBox, layer: &Layer, wall_count: usize) -> ExPolygons {
    let walls: ExPolygons = layer
        .regions
        .iter()
        .filter(|other| boundary_box.hit(&other.boundary_box))
        .filter_map(|other| other.wall_for_count(wall_count))
        .flatten()
        .cloned()
        .collect();
    union_ex(&walls)
}

/// Area that is solid on every layer of `window`.
///
/// Any window layer outside the mesh makes the whole window open.
fn solid_window(
    boundary_box: &BoundingBox,
    layers: &[Layer],
    window: RangeInclusive<usize>,
    wall_count: usize,
) -> ExPolygons {
    let mut not_air: Option<ExPolygons> = None;
    for layer_nr in window {
        let Some(layer) = layers.get(layer_nr) else {
            return Vec::new();
        };
        let inside = inside_polygons(boundary_box, layer, wall_count);
        let solid = match not_air {
            None => inside,
            Some(acc) => intersection(&acc, &inside),
        };
        if solid.is_empty() {
            return solid;
        }
        not_air = Some(solid);
    }
    not_air.unwrap_or_default()
}

fn region_skin_parts(
    region: &LayerRegion,
    layer_nr: usize,
    layers: &[Layer],
    params: &SkinAreaParams,
) -> Vec<SkinPart> {
    if !region.has_walls(params.wall_line_count) {
        trace!(
            "layer {}: region has {} of {} walls, no skin",
            layer_nr,
            region.wall_count(),
            params.wall_line_count
        );
        return Vec::new();
    }
    let Some(innermost) = region.innermost_inset() else {
        return Vec::new();
    };

    let down = params.down_skin_count;
    let up = params.up_skin_count;
    let wall_count = params.wall_line_count;
    let bbox = &region.boundary_box;

    let candidate = shrink(
        innermost,
        params.innermost_wall_extrusion_width / 2.0,
        OffsetJoinType::Miter,
    );
    let mut downskin = if down > 0 { candidate.clone() } else { Vec::new() };
    let mut upskin = if up > 0 { candidate } else { Vec::new() };

    match params.strategy {
        SkinStrategy::FastApproximate => {
            if !downskin.is_empty() {
                if let Some(below) = layer_nr.checked_sub(down).and_then(|i| layers.get(i)) {
                    downskin = difference(&downskin, &inside_polygons(bbox, below, wall_count));
                }
            }
            if !upskin.is_empty() {
                if let Some(above) = layers.get(layer_nr + up) {
                    upskin = difference(&upskin, &inside_polygons(bbox, above, wall_count));
                }
            }
        }
        SkinStrategy::ExactWindowed => {
            if !downskin.is_empty() && layer_nr >= down {
                let not_air = solid_window(bbox, layers, (layer_nr - down)..=(layer_nr - 1), wall_count);
                downskin = difference(&downskin, &not_air);
            }
            if !upskin.is_empty() {
                let not_air = solid_window(bbox, layers, (layer_nr + 1)..=(layer_nr + up), wall_count);
                upskin = difference(&upskin, &not_air);
            }
        }
    }

    let skin = remove_small_areas(&union(&upskin, &downskin), params.min_area);
    let parts: Vec<SkinPart> = split_into_parts(&skin).into_iter().map(SkinPart::new).collect();
    trace!(
        "layer {}: {} skin parts ({} up, {} down)",
        layer_nr,
        parts.len(),
        upskin.len(),
        downskin.len()
    );
    parts
}

/// Compute the skin parts of every region of layer `layer_nr`.
///
/// Read-only over all layers, so it may run for several layers at once.
/// The result holds one entry per region of the layer, in region order.
pub fn compute_skin_areas(
    layer_nr: usize,
    layers: &[Layer],
    params: &SkinAreaParams,
) -> Vec<Vec<SkinPart>> {
    let Some(layer) = layers.get(layer_nr) else {
        return Vec::new();
    };
    if params.down_skin_count == 0 && params.up_skin_count == 0 {
        return vec![Vec::new(); layer.regions.len()];
    }

    layer
        .regions
        .iter()
        .map(|region| region_skin_parts(region, layer_nr, layers, params))
        .collect()
}

/// Compute and append the skin parts of layer `layer_nr`.
///
/// Returns the number of skin parts added.
pub fn generate_skin_areas(layer_nr: usize, layers: &mut [Layer], params: &SkinAreaParams) -> usize {
    let skins = compute_skin_areas(layer_nr, layers, params);
    let Some(layer) = layers.get_mut(layer_nr) else {
        return 0;
    };

    let mut count = 0;
    for (region, parts) in layer.regions.iter_mut().zip(skins) {
        count += parts.len();
        region.skin_parts.extend(parts);
    }
    debug!("layer {}: {} skin parts", layer_nr, count);
    count
}

/// Generate the perimeter loops of every skin part of a region.
///
/// Loop 0 lies half a line width inside the skin outline, every further loop
/// one line width inside the previous one. Generation for a part stops at the
/// first loop that vanishes. Returns the number of loops generated.
pub fn generate_skin_insets(region: &mut LayerRegion, params: &SkinInsetParams) -> usize {
    if params.inset_count == 0 {
        return 0;
    }

    let mut count = 0;
    for part in &mut region.skin_parts {
        for i in 0..params.inset_count {
            let inset = match part.insets.last() {
                Some(prev) if i > 0 => shrink(prev, params.extrusion_width, OffsetJoinType::Miter),
                _ => shrink(
                    std::slice::from_ref(&part.outline),
                    params.extrusion_width / 2.0,
                    OffsetJoinType::Miter,
                ),
            };
            let inset = simplify_region(&inset, params.simplify_tolerance);
            if inset.is_empty() {
                break;
            }
            part.insets.push(inset);
            count += 1;
        }
    }
    count
}

/// Skin areas and skin perimeters for one layer.
///
/// Returns the number of skin parts added.
pub fn generate_skins(
    layer_nr: usize,
    layers: &mut [Layer],
    area_params: &SkinAreaParams,
    inset_params: &SkinInsetParams,
) -> usize {
    let parts = generate_skin_areas(layer_nr, layers, area_params);
    if let Some(layer) = layers.get_mut(layer_nr) {
        for region in &mut layer.regions {
            generate_skin_insets(region, inset_params);
        }
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipper::total_area_mm2;
    use crate::config::SkinSettings;
    use crate::geometry::{ExPolygon, Polygon};
    use crate::slice::test_support::{make_layers, make_region, make_region_from, make_square_mm};

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn area_params(down: usize, up: usize, strategy: SkinStrategy) -> SkinAreaParams {
        let mut params = SkinSettings::default().skin_area_params();
        params.down_skin_count = down;
        params.up_skin_count = up;
        params.strategy = strategy;
        params
    }

    fn skin_area(parts: &[SkinPart]) -> f64 {
        parts.iter().map(|p| p.area_mm2()).sum()
    }

    /// 20mm square with a 4mm square hole in the middle.
    fn holed_square() -> ExPolygon {
        let mut hole = Polygon::rectangle_mm(8.0, 8.0, 4.0, 4.0);
        hole.reverse();
        ExPolygon::with_holes(Polygon::rectangle_mm(0.0, 0.0, 20.0, 20.0), vec![hole])
    }

    #[test]
    fn test_inside_polygons_filters_by_bounding_box() {
        let layers = make_layers(1, |_| {
            vec![
                make_region(0.0, 0.0, 10.0, 2, 0.4),
                make_region(50.0, 50.0, 10.0, 2, 0.4),
                LayerRegion::new(make_square_mm(2.0, 2.0, 2.0), vec![]),
            ]
        });
        let query = make_square_mm(1.0, 1.0, 5.0).bounding_box();

        let inside = inside_polygons(&query, &layers[0], 2);
        // Innermost wall of the first region: 10 - 2 * (0.2 + 0.4) = 8.8mm square.
        assert!(approx(total_area_mm2(&inside), 8.8 * 8.8, 0.01));

        // Asking for more walls than exist clamps to the innermost one.
        let clamped = inside_polygons(&query, &layers[0], 5);
        assert!(approx(total_area_mm2(&clamped), 8.8 * 8.8, 0.01));

        // One wall: the outer inset.
        let outer = inside_polygons(&query, &layers[0], 1);
        assert!(approx(total_area_mm2(&outer), 9.6 * 9.6, 0.01));
    }

    #[test]
    fn test_region_with_too_few_walls_gets_no_skin() {
        let layers = make_layers(1, |_| vec![make_region(0.0, 0.0, 10.0, 1, 0.4)]);
        let skins = compute_skin_areas(0, &layers, &area_params(4, 4, SkinStrategy::ExactWindowed));
        assert_eq!(skins.len(), 1);
        assert!(skins[0].is_empty());
    }

    #[test]
    fn test_zero_skin_counts_is_noop() {
        let mut layers = make_layers(3, |_| vec![make_region(0.0, 0.0, 10.0, 2, 0.4)]);
        let params = area_params(0, 0, SkinStrategy::ExactWindowed);
        for layer_nr in 0..3 {
            assert_eq!(generate_skin_areas(layer_nr, &mut layers, &params), 0);
        }
        assert!(layers.iter().all(|l| l.skin_part_count() == 0));
    }

    #[test]
    fn test_shell_window_in_column() {
        let mut layers = make_layers(10, |_| vec![make_region(0.0, 0.0, 10.0, 2, 0.4)]);
        let params = area_params(4, 4, SkinStrategy::ExactWindowed);
        for layer_nr in 0..10 {
            generate_skin_areas(layer_nr, &mut layers, &params);
        }

        // Candidate: innermost wall (8.8mm) shrunk by half a line width.
        let full = 8.4 * 8.4;
        for (layer_nr, layer) in layers.iter().enumerate() {
            let area = layer.skin_area_mm2();
            if (4..=5).contains(&layer_nr) {
                assert_eq!(layer.skin_part_count(), 0, "layer {layer_nr} should be sparse");
            } else {
                assert_eq!(layer.skin_part_count(), 1, "layer {layer_nr} should be skin");
                assert!(approx(area, full, 0.01), "layer {layer_nr}: {area}");
            }
        }
    }

    #[test]
    fn test_exact_mode_finds_cavity_heuristic_misses() {
        // Cavity on layer 2 only; layer 4 looks four layers down.
        let layers = make_layers(5, |i| {
            if i == 2 {
                vec![make_region_from(holed_square(), 2, 0.4)]
            } else {
                vec![make_region(0.0, 0.0, 20.0, 2, 0.4)]
            }
        });

        let exact = compute_skin_areas(4, &layers, &area_params(4, 0, SkinStrategy::ExactWindowed));
        let fast = compute_skin_areas(4, &layers, &area_params(4, 0, SkinStrategy::FastApproximate));

        assert!(fast[0].is_empty(), "layer 0 is solid, heuristic sees no skin");
        // Hole grown by both walls: 4 + 2 * (0.2 + 0.4) = 5.2mm.
        assert_eq!(exact[0].len(), 1);
        assert!(approx(skin_area(&exact[0]), 5.2 * 5.2, 0.05));
    }

    #[test]
    fn test_exact_mode_contains_heuristic_skin() {
        let layers = make_layers(9, |i| {
            if i == 0 || i == 3 || i == 7 {
                vec![make_region_from(holed_square(), 2, 0.4)]
            } else {
                vec![make_region(0.0, 0.0, 20.0, 2, 0.4)]
            }
        });

        for layer_nr in 0..9 {
            let exact = compute_skin_areas(layer_nr, &layers, &area_params(3, 3, SkinStrategy::ExactWindowed));
            let fast = compute_skin_areas(layer_nr, &layers, &area_params(3, 3, SkinStrategy::FastApproximate));
            let exact: ExPolygons = exact[0].iter().map(|p| p.outline.clone()).collect();
            let fast: ExPolygons = fast[0].iter().map(|p| p.outline.clone()).collect();
            let extra = total_area_mm2(&difference(&fast, &exact));
            assert!(extra < 0.01, "layer {layer_nr}: heuristic skin outside exact skin ({extra})");
        }
    }

    #[test]
    fn test_skin_split_into_parts() {
        // A strip on the layer above covers the middle of the candidate.
        let layers = make_layers(2, |i| {
            if i == 0 {
                vec![make_region(0.0, 0.0, 10.0, 2, 0.4)]
            } else {
                let strip = Polygon::rectangle_mm(3.0, 0.0, 4.0, 10.0);
                vec![make_region_from(strip.into(), 2, 0.4)]
            }
        });

        let skins = compute_skin_areas(0, &layers, &area_params(0, 1, SkinStrategy::ExactWindowed));
        assert_eq!(skins[0].len(), 2);
        for part in &skins[0] {
            // x 0.8..3.6 or 6.4..9.2, y 0.8..9.2
            assert!(approx(part.area_mm2(), 2.8 * 8.4, 0.02));
            assert!(part.insets.is_empty());
        }
    }

    #[test]
    fn test_small_skin_removed() {
        let tiny = make_layers(1, |_| vec![make_region(0.0, 0.0, 1.1, 1, 0.4)]);
        let mut params = area_params(1, 1, SkinStrategy::ExactWindowed);
        params.wall_line_count = 1;
        // Candidate 0.3mm square is below the 0.16mm² threshold.
        assert!(compute_skin_areas(0, &tiny, &params)[0].is_empty());

        let small = make_layers(1, |_| vec![make_region(0.0, 0.0, 1.6, 1, 0.4)]);
        let parts = &compute_skin_areas(0, &small, &params)[0];
        assert_eq!(parts.len(), 1);
        assert!(approx(parts[0].area_mm2(), 0.64, 0.01));
    }

    #[test]
    fn test_skin_insets_shrink_monotonically() {
        let mut region = make_region(0.0, 0.0, 10.0, 2, 0.4);
        region.skin_parts.push(SkinPart::new(make_square_mm(0.8, 0.8, 8.4)));
        let params = SkinInsetParams {
            extrusion_width: 0.4,
            inset_count: 3,
            simplify_tolerance: 0.005,
        };

        assert_eq!(generate_skin_insets(&mut region, &params), 3);
        let insets = &region.skin_parts[0].insets;
        assert!(approx(total_area_mm2(&insets[0]), 8.0 * 8.0, 0.01));
        assert!(approx(total_area_mm2(&insets[1]), 7.2 * 7.2, 0.01));
        assert!(approx(total_area_mm2(&insets[2]), 6.4 * 6.4, 0.01));
        for pair in insets.windows(2) {
            assert!(difference(&pair[1], &pair[0]).is_empty(), "inset escapes its parent");
        }
    }

    #[test]
    fn test_skin_insets_stop_when_empty() {
        let mut region = LayerRegion::default();
        region.skin_parts.push(SkinPart::new(make_square_mm(0.0, 0.0, 1.0)));
        let params = SkinInsetParams {
            extrusion_width: 0.4,
            inset_count: 5,
            simplify_tolerance: 0.005,
        };

        // 1.0 -> 0.6 -> vanishes
        assert_eq!(generate_skin_insets(&mut region, &params), 1);
        assert_eq!(region.skin_parts[0].insets.len(), 1);
        assert!(region.skin_parts[0].insets.iter().all(|i| !i.is_empty()));
    }

    #[test]
    fn test_zero_inset_count_is_noop() {
        let mut region = LayerRegion::default();
        region.skin_parts.push(SkinPart::new(make_square_mm(0.0, 0.0, 5.0)));
        let params = SkinSettings::default().skin_inset_params();
        assert_eq!(params.inset_count, 0);
        assert_eq!(generate_skin_insets(&mut region, &params), 0);
        assert!(region.skin_parts[0].insets.is_empty());
    }

    #[test]
    fn test_generate_skins_for_layer() {
        let mut layers = make_layers(3, |_| vec![make_region(0.0, 0.0, 10.0, 2, 0.4)]);
        let area = area_params(1, 1, SkinStrategy::ExactWindowed);
        let inset = SkinInsetParams {
            extrusion_width: 0.4,
            inset_count: 2,
            simplify_tolerance: 0.005,
        };

        assert_eq!(generate_skins(0, &mut layers, &area, &inset), 1);
        assert_eq!(generate_skins(1, &mut layers, &area, &inset), 0);
        assert_eq!(layers[0].regions[0].skin_parts[0].insets.len(), 2);
        assert_eq!(layers[1].skin_part_count(), 0);
    }
}
