use crate::models::{LabImage, SAMPLE_COUNT, SampleRegion, SampleSet};

/// Which fixed arrangement of sample squares to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleLayout {
    /// Squares following a raised open hand held in front of the camera
    Hand,
    /// Squares spread over the frame, away from the hand area
    Background,
}

/// Fractions of (width, height) for the top-left corner of each square.
type Fraction = (u32, u32);

const HAND_LAYOUT: [(Fraction, Fraction); SAMPLE_COUNT] = [
    ((7, 45), (7, 27)),
    ((12, 45), (5, 36)),
    ((25, 72), (1, 9)),
    ((4, 9), (1, 6)),
    ((7, 12), (1, 2)),
    ((1, 4), (37, 45)),
    ((3, 8), (37, 45)),
    ((295, 720), (322, 540)),
];

const BACKGROUND_LAYOUT: [(Fraction, Fraction); SAMPLE_COUNT] = [
    ((1, 6), (1, 3)),
    ((1, 6), (2, 3)),
    ((1, 2), (1, 6)),
    ((1, 3), (1, 2)),
    ((2, 3), (1, 2)),
    ((1, 2), (5, 6)),
    ((5, 6), (1, 3)),
    ((5, 6), (2, 3)),
];

impl SampleLayout {
    fn fractions(self) -> &'static [(Fraction, Fraction); SAMPLE_COUNT] {
        match self {
            SampleLayout::Hand => &HAND_LAYOUT,
            SampleLayout::Background => &BACKGROUND_LAYOUT,
        }
    }

    /// Sample squares for a frame of the given size.
    ///
    /// Positions scale with the frame; the square side is
    /// `height / square_divisor`.
    pub fn regions(self, width: u32, height: u32, square_divisor: u32) -> [SampleRegion; SAMPLE_COUNT] {
        let side = height / square_divisor.max(1);
        self.fractions().map(|((xn, xd), (yn, yd))| {
            let x = width * xn / xd;
            let y = height * yn / yd;
            SampleRegion {
                top_left: (x, y),
                bottom_right: (x + side, y + side),
            }
        })
    }
}

/// Read the color at the center pixel of every region.
///
/// Only the single center pixel is read, no averaging over the square.
/// Centers falling outside a very small frame are clamped to its edge.
pub fn sample_colors(lab: &LabImage, regions: &[SampleRegion; SAMPLE_COUNT]) -> SampleSet {
    let (width, height) = lab.dimensions();
    regions.map(|region| {
        let (cx, cy) = region.center();
        let x = cx.min(width.saturating_sub(1));
        let y = cy.min(height.saturating_sub(1));
        lab.get_pixel(x, y).0
    })
}
