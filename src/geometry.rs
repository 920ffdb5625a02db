//! Point-set geometry used by the contour and hull stages.
//!
//! Contour tracing, polygon simplification and the hull itself come from
//! `imageproc`; this module adds the pieces it does not ship (hull indices,
//! convexity defects, bounding rectangles) plus the small distance and angle
//! helpers the finger heuristics are written in.

use imageproc::geometry::convex_hull;
use imageproc::point::Point;

use crate::models::{BoundingRect, Defect};

/// Euclidean distance between two points
pub fn distance(a: Point<i32>, b: Point<i32>) -> f64 {
    let dx = (a.x - b.x) as f64;
    let dy = (a.y - b.y) as f64;
    (dx * dx + dy * dy).sqrt()
}

/// Horizontal distance between two points
pub fn x_offset(a: Point<i32>, b: Point<i32>) -> f64 {
    (a.x - b.x).abs() as f64
}

/// Angle in degrees at `vertex` between the rays towards `start` and `end`.
///
/// Degenerate rays (zero length) give NaN, which fails every comparison.
pub fn angle(start: Point<i32>, vertex: Point<i32>, end: Point<i32>) -> f64 {
    let l1 = distance(vertex, start);
    let l2 = distance(vertex, end);
    let dot = ((start.x - vertex.x) as f64) * ((end.x - vertex.x) as f64)
        + ((start.y - vertex.y) as f64) * ((end.y - vertex.y) as f64);
    (dot / (l1 * l2)).acos().to_degrees()
}

/// Unsigned polygon area (shoelace formula)
pub fn contour_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut twice_area: i64 = 0;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        twice_area += p.x as i64 * q.y as i64 - q.x as i64 * p.y as i64;
    }
    (twice_area as f64 / 2.0).abs()
}

/// Smallest upright rectangle covering every point, inclusive of the edges.
pub fn bounding_rect(points: &[Point<i32>]) -> Option<BoundingRect> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(BoundingRect {
        x: min_x,
        y: min_y,
        width: max_x - min_x + 1,
        height: max_y - min_y + 1,
    })
}

/// Convex hull of a contour expressed as indices into it.
///
/// Indices are ascending, so the hull is walked in the same direction as the
/// contour and starts at the hull point with the smallest contour index,
/// not at an extreme point. A point repeated in the contour maps to its
/// first occurrence.
pub fn convex_hull_indices(contour: &[Point<i32>]) -> Vec<usize> {
    if contour.is_empty() {
        return Vec::new();
    }
    let hull: Vec<Point<i32>> = convex_hull(contour);
    let mut indices: Vec<usize> = hull
        .iter()
        .filter_map(|h| contour.iter().position(|p| p == h))
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}

/// Convexity defects of `contour` against ascending `hull` indices.
///
/// For every pair of cyclically consecutive hull indices the contour points
/// strictly between them are scanned, and the one farthest from the line
/// through the pair is reported. Pairs with nothing off the line yield no
/// defect.
pub fn convexity_defects(contour: &[Point<i32>], hull: &[usize]) -> Vec<Defect> {
    let n = contour.len();
    let mut defects = Vec::new();
    let Some(&last) = hull.last() else {
        return defects;
    };
    if n < 3 || hull.len() < 3 {
        return defects;
    }

    let mut current = last;
    for &next in hull {
        let p0 = contour[current];
        let p1 = contour[next];
        let dx0 = (p1.x - p0.x) as f64;
        let dy0 = (p1.y - p0.y) as f64;
        let scale = if dx0 == 0.0 && dy0 == 0.0 {
            0.0
        } else {
            1.0 / (dx0 * dx0 + dy0 * dy0).sqrt()
        };

        let mut deepest = None;
        let mut depth = 0.0;
        let mut j = current;
        loop {
            j = (j + 1) % n;
            if j == next {
                break;
            }
            let dx = (contour[j].x - p0.x) as f64;
            let dy = (contour[j].y - p0.y) as f64;
            let dist = (-dy0 * dx + dx0 * dy).abs() * scale;
            if dist > depth {
                depth = dist;
                deepest = Some(j);
            }
        }

        if let Some(j) = deepest {
            defects.push(Defect {
                start: p0,
                end: p1,
                farthest: contour[j],
                depth,
            });
        }
        current = next;
    }
    defects
}
