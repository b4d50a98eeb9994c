//! Path simplification algorithms.
//!
//! Reduces the number of vertices of polygon loops while keeping the shape
//! within a tolerance. Skin insets are simplified after every offset so that
//! the kernel does not carry near-duplicate vertices from loop to loop.
//!
//! ## Algorithms
//!
//! - **Douglas-Peucker**: Classic recursive line simplification algorithm
//! - **Duplicate removal**: Cheap cleanup pass run before Douglas-Peucker

use super::{Line, Point, Polygon};
use crate::{scale, Coord, CoordF};

/// Default simplification tolerance for region loops (5 microns).
pub const DEFAULT_SIMPLIFY_TOLERANCE: CoordF = 0.005;

/// Douglas-Peucker line simplification algorithm.
///
/// Recursively simplifies a path by removing points that are within `tolerance`
/// of the line segment connecting their neighbors.
///
/// # Arguments
///
/// * `points` - The input points to simplify
/// * `tolerance` - Maximum distance a point can deviate from the simplified path (in mm)
///
/// # Returns
///
/// A new vector of simplified points. The first and last points are always preserved.
pub fn douglas_peucker(points: &[Point], tolerance: CoordF) -> Vec<Point> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let tolerance_sq = scale(tolerance) as f64 * scale(tolerance) as f64;

    // Stack-based implementation (avoids stack overflow for large inputs)
    let mut stack = vec![(0, points.len() - 1)];

    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[points.len() - 1] = true;

    while let Some((anchor_idx, floater_idx)) = stack.pop() {
        if anchor_idx + 1 >= floater_idx {
            continue;
        }

        let anchor = points[anchor_idx];
        let floater = points[floater_idx];

        let mut max_dist_sq = 0.0;
        let mut furthest_idx = anchor_idx;

        for (i, point) in points
            .iter()
            .enumerate()
            .take(floater_idx)
            .skip(anchor_idx + 1)
        {
            let dist_sq = Line::distance_to_squared(*point, anchor, floater);
            if dist_sq > max_dist_sq {
                max_dist_sq = dist_sq;
                furthest_idx = i;
            }
        }

        if max_dist_sq > tolerance_sq {
            keep[furthest_idx] = true;
            stack.push((anchor_idx, furthest_idx));
            stack.push((furthest_idx, floater_idx));
        }
    }

    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

/// Douglas-Peucker simplification for a polygon.
///
/// A polygon that would drop below three vertices collapses to an empty polygon.
pub fn douglas_peucker_polygon(polygon: &Polygon, tolerance: CoordF) -> Polygon {
    let points = remove_duplicate_points(polygon.points(), scale(tolerance).max(1));
    if points.len() <= 3 {
        return if points.len() == 3 {
            Polygon::from_points(points)
        } else {
            Polygon::new()
        };
    }

    let simplified = douglas_peucker(&points, tolerance);
    if simplified.len() < 3 {
        return Polygon::new();
    }

    Polygon::from_points(simplified)
}

/// Remove duplicate consecutive points from a path.
///
/// Points are considered duplicates if they're within `tolerance` of each other.
pub fn remove_duplicate_points(points: &[Point], tolerance: Coord) -> Vec<Point> {
    let tolerance_sq = tolerance as i128 * tolerance as i128;
    let mut result: Vec<Point> = Vec::with_capacity(points.len());

    for point in points {
        match result.last() {
            Some(last) if point.distance_squared(last) <= tolerance_sq => {}
            _ => result.push(*point),
        }
    }

    result
}
