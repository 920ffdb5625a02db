pub mod preprocessing;
pub mod sampling;
pub mod calibration;
pub mod mask;
pub mod contours;
pub mod hull;
pub mod validation;

use image::GrayImage;
use log::debug;

use crate::config::DetectorConfig;
use crate::geometry::bounding_rect;
use crate::models::HandState;

/// Locate the hand in a binary mask and count its raised fingers.
///
/// Runs contour selection, simplification, hull analysis and the
/// plausibility gate. An empty mask or a contour too small to analyse is
/// not an error; the corresponding fields of the result are left empty.
pub fn track_hand(mask: &GrayImage, config: &DetectorConfig) -> HandState {
    let (width, height) = mask.dimensions();
    let all = contours::external_contours(mask);
    debug!("Found {} external contours", all.len());

    let Some(selected) = contours::select_hand_contour(&all) else {
        debug!("No contour in mask, skipping hand analysis");
        return HandState {
            contours: all,
            ..HandState::default()
        };
    };

    let contour = contours::simplify(&all[selected], config.approx_epsilon);
    let rect = bounding_rect(&contour);
    let analysis = rect
        .as_ref()
        .and_then(|r| hull::analyze(&contour, r, height, config));
    let is_hand = validation::is_hand(Some(selected), rect.as_ref(), (width, height));

    debug!(
        "Hand contour {} simplified to {} points, box {:?}, valid: {}",
        selected,
        contour.len(),
        rect,
        is_hand
    );

    HandState {
        contours: all,
        selected: Some(selected),
        contour,
        bounding_rect: rect,
        analysis,
        is_hand,
    }
}
