//! Annotations drawn on the color frame for the user.
//!
//! imageproc only draws one-pixel strokes, so thicker strokes are built
//! from several offset copies.

use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;

use crate::models::{BoundingRect, HandState, SampleRegion};

pub const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
pub const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
pub const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
pub const YELLOW: Rgba<u8> = Rgba([255, 255, 0, 255]);

const BACKGROUND_SQUARE_THICKNESS: u32 = 2;
const HAND_SQUARE_THICKNESS: u32 = 5;
const BOX_THICKNESS: u32 = 3;
const HULL_THICKNESS: u32 = 2;
const CONTOUR_THICKNESS: u32 = 3;
const DEFECT_RADIUS: i32 = 5;
const DEFECT_THICKNESS: u32 = 2;

/// Offsets of the one-pixel strokes making up a stroke of `thickness`
fn stroke_offsets(thickness: u32) -> std::ops::RangeInclusive<i32> {
    let t = thickness.max(1) as i32;
    -(t / 2)..=(t - 1 - t / 2)
}

fn draw_rect(canvas: &mut RgbaImage, x: i32, y: i32, width: i32, height: i32, color: Rgba<u8>, thickness: u32) {
    for o in stroke_offsets(thickness) {
        let (w, h) = (width - 2 * o, height - 2 * o);
        if w > 0 && h > 0 {
            let rect = Rect::at(x + o, y + o).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(canvas, rect, color);
        }
    }
}

fn draw_polygon(canvas: &mut RgbaImage, points: &[Point<i32>], color: Rgba<u8>, thickness: u32) {
    if points.len() < 2 {
        return;
    }
    for (i, p1) in points.iter().enumerate() {
        let p2 = points[(i + 1) % points.len()];
        for dx in stroke_offsets(thickness) {
            for dy in stroke_offsets(thickness) {
                draw_line_segment_mut(
                    canvas,
                    ((p1.x + dx) as f32, (p1.y + dy) as f32),
                    ((p2.x + dx) as f32, (p2.y + dy) as f32),
                    color,
                );
            }
        }
    }
}

/// Outline every sample square so the user can line up the scene
pub fn draw_sample_regions(canvas: &mut RgbaImage, regions: &[SampleRegion], color: Rgba<u8>, thickness: u32) {
    for region in regions {
        let side = region.side() as i32;
        draw_rect(
            canvas,
            region.top_left.0 as i32,
            region.top_left.1 as i32,
            side,
            side,
            color,
            thickness,
        );
    }
}

pub fn draw_background_regions(canvas: &mut RgbaImage, regions: &[SampleRegion]) {
    draw_sample_regions(canvas, regions, BLUE, BACKGROUND_SQUARE_THICKNESS);
}

pub fn draw_hand_regions(canvas: &mut RgbaImage, regions: &[SampleRegion]) {
    draw_sample_regions(canvas, regions, RED, HAND_SQUARE_THICKNESS);
}

pub fn draw_bounding_rect(canvas: &mut RgbaImage, rect: &BoundingRect) {
    draw_rect(canvas, rect.x, rect.y, rect.width, rect.height, BLUE, BOX_THICKNESS);
}

/// Draw the tracked hand: bounding box, hull, simplified contour and valley markers.
///
/// Nothing is drawn unless the hand passed validation. Hull and valleys
/// are skipped on frames where hull analysis did not run.
pub fn draw_hand(canvas: &mut RgbaImage, hand: &HandState) {
    if !hand.is_hand {
        return;
    }
    if let Some(rect) = &hand.bounding_rect {
        draw_bounding_rect(canvas, rect);
    }
    if let Some(analysis) = &hand.analysis {
        draw_polygon(canvas, &analysis.hull, RED, HULL_THICKNESS);
    }
    draw_polygon(canvas, &hand.contour, GREEN, CONTOUR_THICKNESS);
    if let Some(analysis) = &hand.analysis {
        for p in analysis.valley_points() {
            for o in stroke_offsets(DEFECT_THICKNESS) {
                draw_hollow_circle_mut(canvas, (p.x, p.y), DEFECT_RADIUS + o, YELLOW);
            }
        }
    }
}
