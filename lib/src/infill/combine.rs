//! Combining sparse infill over consecutive layers.
//!
//! With a combine amount of `a`, sparse infill that is present on `a`
//! consecutive layers is printed once, on the top layer of the group, with
//! `a` times the layer height. Groups are aligned to layer indices divisible
//! by `a` so every region of the mesh agrees on the group boundaries.
//!
//! After combining, entry `n` of a region's `infill_area_per_combine` holds
//! the area shared by `n + 1` layers. Area moved into a combined level is
//! subtracted from the levels it came from, so the entries of one region are
//! pairwise disjoint and no area is printed twice.
//!
//! Groups cover disjoint layer ranges and run in parallel; the steps inside
//! a group depend on each other and run in order.

use crate::clipper::{difference, intersection, opening, OffsetJoinType};
use crate::config::CombineParams;
use crate::geometry::ExPolygons;
use crate::slice::Layer;
use log::{debug, trace};
use rayon::prelude::*;

/// First and last group top of the schedule, or `None` if nothing is combined.
fn group_bounds(layer_count: usize, params: &CombineParams) -> Option<(usize, usize)> {
    let amount = params.amount;
    if amount <= 1 || layer_count == 0 || params.infill_line_distance <= 0.0 {
        return None;
    }
    let max_layer = (layer_count - 1).checked_sub(params.top_layers)?;

    // Round up, so no group reaches into the bottom shell.
    let min_layer = (params.bottom_layers + amount - 1).div_ceil(amount) * amount;
    let max_layer = max_layer - max_layer % amount;
    (min_layer <= max_layer).then_some((min_layer, max_layer))
}

/// Top layer index of every combine group, bottom to top.
///
/// Empty when combining is disabled: an amount of one or less, no layers,
/// fewer layers than the top shell, or no sparse infill at all.
pub fn combine_group_tops(layer_count: usize, params: &CombineParams) -> Vec<usize> {
    match group_bounds(layer_count, params) {
        Some((min_layer, max_layer)) => (min_layer..=max_layer).step_by(params.amount).collect(),
        None => Vec::new(),
    }
}

/// Combine the infill of one group of consecutive layers.
///
/// `group` holds the layers of the group bottom to top; the last one is the
/// layer the combined infill is printed on. For every step `n` in
/// `1..amount` the area shared by level `n - 1` of a top region and level 0
/// of an overlapping region `n` layers below is moved into a new level `n`
/// of the top region. Returns the number of levels appended.
pub fn combine_layer_group(group: &mut [Layer], params: &CombineParams) -> usize {
    let Some((top, below)) = group.split_last_mut() else {
        return 0;
    };

    let layer_id = top.id();
    let mut appended = 0;
    for n in 1..params.amount {
        if below.len() < n {
            break;
        }
        let lower_idx = below.len() - n;
        let lower = &mut below[lower_idx];

        for region in &mut top.regions {
            if region.infill_area_per_combine.len() < n || !region.has_walls(params.wall_line_count) {
                continue;
            }

            let bbox = region.boundary_box;
            let mut result = ExPolygons::new();
            for other in lower
                .regions
                .iter_mut()
                .filter(|other| bbox.hit(&other.boundary_box))
            {
                let Some(lower_area) = other.infill_area_per_combine.first() else {
                    continue;
                };
                let upper_area = &region.infill_area_per_combine[n - 1];

                let shared = opening(
                    &intersection(upper_area, lower_area),
                    params.opening_distance,
                    OffsetJoinType::Miter,
                );
                if shared.is_empty() {
                    continue;
                }

                let upper_rest = difference(upper_area, &shared);
                let lower_rest = difference(lower_area, &shared);
                region.infill_area_per_combine[n - 1] = upper_rest;
                other.infill_area_per_combine[0] = lower_rest;
                result.extend(shared);
            }

            trace!(
                "layer {}: combine level {} with {} parts",
                layer_id,
                n,
                result.len()
            );
            region.infill_area_per_combine.push(result);
            appended += 1;
        }
    }
    appended
}

/// Combine the sparse infill of all layers.
///
/// `layers` must be the complete layer stack in bottom-to-top order. Returns
/// the number of groups processed.
pub fn combine_infill_layers(layers: &mut [Layer], params: &CombineParams) -> usize {
    let Some((min_layer, max_layer)) = group_bounds(layers.len(), params) else {
        return 0;
    };
    let amount = params.amount;

    // Group tops are multiples of `amount`, so the groups are exactly the
    // chunks of the stack above layer 0.
    let Some((_, stack)) = layers.split_first_mut() else {
        return 0;
    };
    let groups: usize = stack
        .par_chunks_mut(amount)
        .enumerate()
        .filter(|(chunk, group)| {
            let top = (chunk + 1) * amount;
            group.len() == amount && (min_layer..=max_layer).contains(&top)
        })
        .map(|(_, group)| {
            combine_layer_group(group, params);
            1
        })
        .sum();

    debug!(
        "combined infill in {} groups of {} layers ({}..={})",
        groups, amount, min_layer, max_layer
    );
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipper::total_area_mm2;
    use crate::config::InfillParams;
    use crate::infill::generate_infill;
    use crate::slice::test_support::{make_layers, make_region};
    use crate::slice::LayerRegion;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    fn infill_params() -> InfillParams {
        InfillParams {
            innermost_wall_extrusion_width: 0.4,
            infill_skin_overlap: 0.04,
            wall_line_count: 2,
            min_area: 0.16,
        }
    }

    fn infilled_column(count: usize) -> Vec<Layer> {
        let mut layers = make_layers(count, |_| vec![make_region(0.0, 0.0, 10.0, 2, 0.4)]);
        for layer in &mut layers {
            generate_infill(layer, &infill_params());
        }
        layers
    }

    fn layer_area(layer: &Layer) -> f64 {
        layer
            .regions
            .iter()
            .map(LayerRegion::combined_layer_area_mm2)
            .sum()
    }

    #[test]
    fn test_group_alignment() {
        let params = CombineParams::new(3, 2, 0);
        let tops = combine_group_tops(20, &params);
        assert_eq!(tops.first(), Some(&6));
        assert_eq!(tops, vec![6, 9, 12, 15, 18]);
    }

    #[test]
    fn test_group_alignment_respects_top_shell() {
        // max = 20 - 1 - 4 = 15, already a multiple of 3
        let tops = combine_group_tops(20, &CombineParams::new(3, 2, 4));
        assert_eq!(tops.last(), Some(&15));

        // max = 12 - 1 - 2 = 9 -> 8 for amount 4
        let tops = combine_group_tops(12, &CombineParams::new(4, 0, 2));
        assert_eq!(tops, vec![4, 8]);
    }

    #[test]
    fn test_combine_disabled() {
        let mut params = CombineParams::new(1, 0, 0);
        assert!(combine_group_tops(10, &params).is_empty());

        params.amount = 2;
        assert!(combine_group_tops(0, &params).is_empty());
        params.top_layers = 10;
        assert!(combine_group_tops(10, &params).is_empty());

        params.top_layers = 0;
        params.infill_line_distance = 0.0;
        assert!(combine_group_tops(10, &params).is_empty());

        let mut layers = infilled_column(10);
        assert_eq!(combine_infill_layers(&mut layers, &params), 0);
        assert!(layers
            .iter()
            .all(|l| l.regions[0].infill_area_per_combine.len() == 1));
    }

    #[test]
    fn test_congruent_pair_combines_fully() {
        let mut layers = infilled_column(2);
        let original = layers[1].regions[0].infill_area.clone();
        let params = CombineParams::new(2, 0, 0);

        assert_eq!(combine_layer_group(&mut layers, &params), 1);

        let upper = &layers[1].regions[0];
        let lower = &layers[0].regions[0];
        assert_eq!(upper.infill_area_per_combine.len(), 2);
        assert!(approx(
            total_area_mm2(&upper.infill_area_per_combine[1]),
            total_area_mm2(&original),
            0.01
        ));
        assert!(upper.infill_area_per_combine[0].is_empty());
        assert!(lower.infill_area_per_combine[0].is_empty());
        // The single-layer infill itself is left alone.
        assert_eq!(upper.infill_area, original);
    }

    #[test]
    fn test_combine_conserves_area() {
        let mut layers = infilled_column(12);
        let before: f64 = layers.iter().map(layer_area).sum();
        let params = CombineParams::new(3, 2, 2);

        let groups = combine_infill_layers(&mut layers, &params);
        assert_eq!(groups, combine_group_tops(12, &params).len());
        assert_eq!(groups, 2);

        let after: f64 = layers.iter().map(layer_area).sum();
        assert!(approx(before, after, 0.05), "before {before}, after {after}");

        // Tops 6 and 9 carry the three-layer level; their group layers are emptied.
        for top in [6, 9] {
            let region = &layers[top].regions[0];
            assert_eq!(region.infill_area_per_combine.len(), 3);
            assert!(region.infill_area_per_combine[2].len() == 1);
            assert!(layers[top - 1].regions[0].infill_area_per_combine[0].is_empty());
            assert!(layers[top - 2].regions[0].infill_area_per_combine[0].is_empty());
        }
        // Layers outside any group keep their own infill.
        for idx in [0, 1, 2, 3, 10, 11] {
            let region = &layers[idx].regions[0];
            assert_eq!(region.infill_area_per_combine.len(), 1, "layer {idx}");
            assert!(!region.infill_area_per_combine[0].is_empty(), "layer {idx}");
        }
    }

    #[test]
    fn test_partial_overlap_keeps_remainder() {
        let mut layers = make_layers(2, |i| {
            let x = if i == 0 { 0.0 } else { 5.0 };
            vec![make_region(x, 0.0, 10.0, 2, 0.4)]
        });
        for layer in &mut layers {
            generate_infill(layer, &infill_params());
        }
        let before: f64 = layers.iter().map(layer_area).sum();

        combine_layer_group(&mut layers, &CombineParams::new(2, 0, 0));

        let upper = &layers[1].regions[0];
        let lower = &layers[0].regions[0];
        // Overlap x 5.8..9.2, y 0.8..9.2
        assert!(approx(total_area_mm2(&upper.infill_area_per_combine[1]), 3.4 * 8.4, 0.02));
        assert!(approx(total_area_mm2(&upper.infill_area_per_combine[0]), 5.0 * 8.4, 0.02));
        assert!(approx(total_area_mm2(&lower.infill_area_per_combine[0]), 5.0 * 8.4, 0.02));

        let after: f64 = layers.iter().map(layer_area).sum();
        assert!(approx(before, after, 0.05));
    }

    #[test]
    fn test_region_with_too_few_walls_is_not_combined() {
        let mut layers = make_layers(2, |_| {
            vec![
                make_region(0.0, 0.0, 10.0, 2, 0.4),
                make_region(20.0, 0.0, 10.0, 1, 0.4),
            ]
        });
        for layer in &mut layers {
            generate_infill(layer, &infill_params());
        }
        let mut params = CombineParams::new(2, 0, 0);
        params.wall_line_count = 2;

        assert_eq!(combine_layer_group(&mut layers, &params), 1);
        assert_eq!(layers[1].regions[0].infill_area_per_combine.len(), 2);
        let thin = &layers[1].regions[1];
        assert_eq!(thin.infill_area_per_combine.len(), 1);
        assert!(thin.infill_area_per_combine[0].is_empty());
    }
}
