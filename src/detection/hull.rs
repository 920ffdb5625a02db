//! Finger counting from the hand contour's convex hull.
//!
//! Valleys between raised fingers show up as deep, narrow convexity defects;
//! fingertips show up as hull points that are well separated from their
//! neighbours and not too close to the bottom of the frame. All distance
//! thresholds are fractions of the hand's bounding rectangle, computed with
//! integer division.

use imageproc::point::Point;
use log::{debug, trace};

use crate::config::DetectorConfig;
use crate::geometry::{angle, convex_hull_indices, convexity_defects, distance, x_offset};
use crate::models::{BoundingRect, Defect, HullAnalysis};

/// Keep the defects that look like the gap between two fingers: both
/// flanks longer than a fifth of the hand height and an opening narrower
/// than `max_valley_angle`.
pub fn filter_valleys(defects: &[Defect], rect: &BoundingRect, config: &DetectorConfig) -> Vec<Defect> {
    let min_flank = (rect.height / config.defect_depth_divisor) as f64;
    defects
        .iter()
        .filter(|d| {
            let keep = distance(d.end, d.farthest) > min_flank
                && distance(d.start, d.farthest) > min_flank
                && angle(d.start, d.farthest, d.end) < config.max_valley_angle;
            trace!(
                "defect at ({}, {}) depth {:.1}: {}",
                d.farthest.x,
                d.farthest.y,
                d.depth,
                if keep { "valley" } else { "rejected" }
            );
            keep
        })
        .copied()
        .collect()
}

/// Thin the hull down to fingertip candidates in one left-to-right pass.
///
/// The first point is always kept. Each later point is compared with the
/// last point kept so far and with the next unvisited hull point (the first
/// hull point after the end), and dropped when it is too close to either,
/// too closely aligned with either horizontally, or sits on a nearly
/// straight stretch. A kept point is never revisited.
pub fn reduce_hull_points(hull: &[Point<i32>], rect: &BoundingRect, config: &DetectorConfig) -> Vec<Point<i32>> {
    let Some(&first) = hull.first() else {
        return Vec::new();
    };
    let min_gap = (rect.height / config.tip_distance_divisor) as f64;
    let min_offset = (rect.width / config.tip_offset_divisor) as f64;

    let mut kept = vec![first];
    for (i, &curr) in hull.iter().enumerate().skip(1) {
        let prev = kept[kept.len() - 1];
        let next = hull.get(i + 1).copied().unwrap_or(first);
        let crowded = distance(prev, curr) < min_gap
            || distance(curr, next) < min_gap
            || x_offset(prev, curr) < min_offset
            || x_offset(curr, next) < min_offset
            || angle(prev, curr, next) > config.max_tip_angle;
        if !crowded {
            kept.push(curr);
        }
    }
    kept
}

/// Drop candidates in the bottom band of the frame, where the wrist and
/// forearm meet the image edge.
pub fn prune_bottom(
    points: &[Point<i32>],
    rect: &BoundingRect,
    frame_height: u32,
    config: &DetectorConfig,
) -> Vec<Point<i32>> {
    let limit = frame_height as i32 - rect.height / config.bottom_margin_divisor;
    points.iter().copied().filter(|p| p.y <= limit).collect()
}

/// Finger count from the number of valleys, using the fingertip count only
/// to tell a single raised finger from a fist.
pub fn finger_label(valleys: usize, fingertips: usize) -> Option<u8> {
    match valleys {
        4 => Some(5),
        3 => Some(4),
        2 => Some(3),
        1 => Some(2),
        0 if fingertips == 1 => Some(1),
        0 => Some(0),
        _ => None,
    }
}

/// Run the hull stage on a simplified hand contour.
///
/// Returns `None` when the contour or its hull has fewer than
/// `min_contour_points` points.
pub fn analyze(
    contour: &[Point<i32>],
    rect: &BoundingRect,
    frame_height: u32,
    config: &DetectorConfig,
) -> Option<HullAnalysis> {
    let hull_indices = convex_hull_indices(contour);
    if contour.len() < config.min_contour_points || hull_indices.len() < config.min_contour_points {
        debug!(
            "Skipping hull analysis: {} contour points, {} hull points",
            contour.len(),
            hull_indices.len()
        );
        return None;
    }

    let defects = convexity_defects(contour, &hull_indices);
    let valleys = filter_valleys(&defects, rect, config);

    let hull: Vec<Point<i32>> = hull_indices.iter().map(|&i| contour[i]).collect();
    let reduced = reduce_hull_points(&hull, rect, config);
    let fingertips = prune_bottom(&reduced, rect, frame_height, config);

    let label = finger_label(valleys.len(), fingertips.len());
    debug!(
        "{} defects, {} valleys, {} fingertips -> {:?}",
        defects.len(),
        valleys.len(),
        fingertips.len(),
        label
    );

    Some(HullAnalysis {
        hull,
        valleys,
        fingertips,
        label,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::bounding_rect;

    /// Top-left corners of the five fingers, each 24 px wide, reaching down
    /// to the palm at y = 220.
    const FINGERS: [(i32, i32); 5] = [(200, 120), (250, 80), (300, 60), (350, 80), (400, 120)];

    /// Clockwise outline of a hand with the given fingers raised, a palm
    /// spanning x 200..=423 and a narrower wrist down to y = 470.
    fn hand_outline(raised: &[usize]) -> Vec<Point<i32>> {
        let mut pts: Vec<(i32, i32)> = Vec::new();
        for (k, &i) in raised.iter().enumerate() {
            let (x, y) = FINGERS[i];
            if k > 0 {
                pts.push((x, 220));
            }
            pts.extend([(x, y), (x + 23, y), (x + 23, 220)]);
        }
        if pts.last().map(|p| p.0) != Some(423) {
            pts.push((423, 220));
        }
        pts.extend([(423, 359), (361, 359), (361, 470), (262, 470), (262, 359), (200, 359)]);
        if pts[0].0 != 200 {
            pts.push((200, 220));
        }
        pts.into_iter().map(|(x, y)| Point::new(x, y)).collect()
    }

    fn run(contour: &[Point<i32>]) -> HullAnalysis {
        let rect = bounding_rect(contour).unwrap();
        analyze(contour, &rect, 480, &DetectorConfig::default()).unwrap()
    }

    #[test]
    fn test_label_table() {
        assert_eq!(finger_label(4, 0), Some(5));
        assert_eq!(finger_label(3, 7), Some(4));
        assert_eq!(finger_label(2, 2), Some(3));
        assert_eq!(finger_label(1, 1), Some(2));
        assert_eq!(finger_label(0, 1), Some(1));
        assert_eq!(finger_label(0, 0), Some(0));
        assert_eq!(finger_label(0, 3), Some(0));
        assert_eq!(finger_label(5, 1), None);
        assert_eq!(finger_label(9, 0), None);
    }

    #[test]
    fn test_open_hand_counts_five() {
        let analysis = run(&hand_outline(&[0, 1, 2, 3, 4]));
        assert_eq!(analysis.valleys.len(), 4);
        assert_eq!(analysis.fingertips.len(), 5);
        assert_eq!(analysis.label, Some(5));

        let mut valley_xs: Vec<i32> = analysis.valley_points().iter().map(|p| p.x).collect();
        valley_xs.sort_unstable();
        assert_eq!(valley_xs, vec![250, 300, 323, 373]);
    }

    #[test]
    fn test_defect_count_drives_label() {
        let cases: [(&[usize], usize, u8); 3] = [(&[1, 2, 3, 4], 3, 4), (&[1, 2, 3], 2, 3), (&[2, 3], 1, 2)];
        for (raised, valleys, label) in cases {
            let analysis = run(&hand_outline(raised));
            assert_eq!(analysis.valleys.len(), valleys, "fingers {:?}", raised);
            assert_eq!(analysis.label, Some(label), "fingers {:?}", raised);
        }
    }

    #[test]
    fn test_result_independent_of_contour_start() {
        let outline = hand_outline(&[0, 1, 2, 3, 4]);
        for shift in 0..outline.len() {
            let mut rotated = outline.clone();
            rotated.rotate_left(shift);
            let analysis = run(&rotated);
            assert_eq!(analysis.valleys.len(), 4, "shift {}", shift);
            assert_eq!(analysis.fingertips.len(), 5, "shift {}", shift);
        }
    }

    #[test]
    fn test_single_finger_counts_one() {
        // Tall index finger on a low palm; the palm corners fall into the
        // bottom band and only one fingertip survives
        let contour: Vec<Point<i32>> = [
            (300, 60),
            (323, 60),
            (323, 380),
            (423, 380),
            (423, 470),
            (200, 470),
            (200, 380),
            (300, 380),
        ]
        .into_iter()
        .map(|(x, y)| Point::new(x, y))
        .collect();
        let analysis = run(&contour);
        assert!(analysis.valleys.is_empty());
        assert_eq!(analysis.fingertips, vec![Point::new(300, 60)]);
        assert_eq!(analysis.label, Some(1));
    }

    #[test]
    fn test_finger_with_wide_shoulders_counts_zero() {
        // No valley, but the palm shoulders add fingertip candidates
        let analysis = run(&hand_outline(&[2]));
        assert!(analysis.valleys.is_empty());
        assert_eq!(analysis.fingertips.len(), 3);
        assert_eq!(analysis.label, Some(0));
    }

    #[test]
    fn test_fist_counts_zero() {
        let analysis = run(&hand_outline(&[]));
        assert!(analysis.valleys.is_empty());
        assert_ne!(analysis.fingertips.len(), 1);
        assert_eq!(analysis.label, Some(0));
    }

    #[test]
    fn test_too_few_points_skips_analysis() {
        let triangle = vec![Point::new(0, 0), Point::new(50, 0), Point::new(25, 40)];
        let rect = bounding_rect(&triangle).unwrap();
        assert!(analyze(&triangle, &rect, 480, &DetectorConfig::default()).is_none());

        // Five contour points but only four on the hull
        let notched = vec![
            Point::new(0, 0),
            Point::new(20, 10),
            Point::new(40, 0),
            Point::new(40, 40),
            Point::new(0, 40),
        ];
        let rect = bounding_rect(&notched).unwrap();
        assert!(analyze(&notched, &rect, 480, &DetectorConfig::default()).is_none());
    }

    #[test]
    fn test_reduction_is_single_pass() {
        let rect = BoundingRect { x: 0, y: 0, width: 100, height: 100 };
        let config = DetectorConfig::default();
        // b sits almost straight below a, so it is dropped; c is then
        // compared with a, and d with c. The first point is never examined.
        let a = Point::new(0, 0);
        let b = Point::new(5, 40);
        let c = Point::new(50, 40);
        let d = Point::new(90, 0);
        let reduced = reduce_hull_points(&[a, b, c, d], &rect, &config);
        assert_eq!(reduced, vec![a, c, d]);
    }

    #[test]
    fn test_prune_bottom_uses_integer_margin() {
        let rect = BoundingRect { x: 0, y: 0, width: 10, height: 83 };
        let config = DetectorConfig::default();
        // 480 - 83 / 4 = 460
        let pts = [Point::new(0, 459), Point::new(0, 460), Point::new(0, 461)];
        assert_eq!(prune_bottom(&pts, &rect, 480, &config), vec![pts[0], pts[1]]);
    }
}
