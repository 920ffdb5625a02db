use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point;
use log::debug;

use crate::geometry::contour_area;

/// Outer borders of the mask's top-level regions; holes and anything
/// nested inside a hole are ignored. Points are not simplified.
pub fn external_contours(mask: &GrayImage) -> Vec<Vec<Point<i32>>> {
    find_contours::<i32>(mask)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| c.points)
        .collect()
}

/// Pick the hand among `contours`.
///
/// A contour takes the lead when it beats the running maximum area *or* the
/// running maximum point count, so the winner is the last contour in
/// iteration order that improved either record, not necessarily the largest
/// by both. Reordering the input can change the result.
pub fn select_hand_contour(contours: &[Vec<Point<i32>>]) -> Option<usize> {
    let mut selected = None;
    let mut max_area = 0.0;
    let mut max_points = 0;

    for (i, contour) in contours.iter().enumerate() {
        let area = contour_area(contour);
        let points = contour.len();
        if area > max_area || points > max_points {
            selected = Some(i);
            max_area = f64::max(max_area, area);
            max_points = max_points.max(points);
        }
    }

    if let Some(i) = selected {
        debug!(
            "Selected contour {} of {} (area {:.0}, {} points)",
            i,
            contours.len(),
            contour_area(&contours[i]),
            contours[i].len()
        );
    }
    selected
}

/// Simplify a contour as an open curve
pub fn simplify(contour: &[Point<i32>], epsilon: f64) -> Vec<Point<i32>> {
    approximate_polygon_dp(contour, epsilon, false)
}
