use image::{ImageBuffer, Rgb};
use imageproc::point::Point;

/// Number of sample squares per reference set.
pub const SAMPLE_COUNT: usize = 8;

/// Frame in Lab color space, stored as three 8-bit channels (L, a, b)
/// using the usual 8-bit scaling: `L * 255 / 100`, `a + 128`, `b + 128`.
pub type LabImage = ImageBuffer<Rgb<u8>, Vec<u8>>;

/// One sampled color as (L, a, b).
pub type LabColor = [u8; 3];

/// The 8 colors of one reference set (hand or background).
pub type SampleSet = [LabColor; SAMPLE_COUNT];

/// Square sample region given by its two diagonal corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRegion {
    pub top_left: (u32, u32),
    pub bottom_right: (u32, u32),
}

impl SampleRegion {
    pub fn side(&self) -> u32 {
        self.bottom_right.0 - self.top_left.0
    }

    /// Pixel that is actually read when sampling
    pub fn center(&self) -> (u32, u32) {
        let half = self.side() / 2;
        (self.top_left.0 + half, self.top_left.1 + half)
    }
}

/// Per-channel distances below and above a sample that still count as a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Radii {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl Radii {
    /// Build from (lower, upper) pairs for the L, a and b channels.
    pub const fn from_pairs(l: (u8, u8), a: (u8, u8), b: (u8, u8)) -> Self {
        Self {
            lower: [l.0, a.0, b.0],
            upper: [l.1, a.1, b.1],
        }
    }
}

/// Inclusive per-channel color range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColorBound {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl ColorBound {
    pub fn contains(&self, color: &[u8]) -> bool {
        (0..3).all(|c| self.lower[c] <= color[c] && color[c] <= self.upper[c])
    }
}

/// Radius state carried across frames for both reference sets.
///
/// Radii only ever shrink; a fresh state is the only way back to the seeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationState {
    pub hand: Radii,
    pub background: Radii,
}

impl CalibrationState {
    pub fn new(hand: Radii, background: Radii) -> Self {
        Self { hand, background }
    }
}

/// Axis-aligned bounding box with inclusive pixel extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl BoundingRect {
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }
}

/// Concavity between two consecutive hull points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Defect {
    pub start: Point<i32>,
    pub end: Point<i32>,
    pub farthest: Point<i32>,
    /// Distance of `farthest` from the line through `start` and `end`
    pub depth: f64,
}

/// Result of the convex-hull stage for one contour.
#[derive(Debug, Clone, PartialEq)]
pub struct HullAnalysis {
    /// Hull points in contour order
    pub hull: Vec<Point<i32>>,
    /// Defects that passed the finger-valley filter
    pub valleys: Vec<Defect>,
    /// Hull points left after reduction and bottom-edge pruning
    pub fingertips: Vec<Point<i32>>,
    /// 0..=5, or `None` when more than four valleys were found
    pub label: Option<u8>,
}

impl HullAnalysis {
    pub fn valley_points(&self) -> Vec<Point<i32>> {
        self.valleys.iter().map(|d| d.farthest).collect()
    }
}

/// Everything derived from one tracked frame.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HandState {
    /// External contours of the mask, in extraction order
    pub contours: Vec<Vec<Point<i32>>>,
    /// Index of the hand contour in `contours`
    pub selected: Option<usize>,
    /// Simplified hand contour
    pub contour: Vec<Point<i32>>,
    pub bounding_rect: Option<BoundingRect>,
    /// `None` when no contour was selected or it had too few points
    pub analysis: Option<HullAnalysis>,
    pub is_hand: bool,
}

impl HandState {
    pub fn finger_count(&self) -> Option<u8> {
        self.analysis.as_ref().and_then(|a| a.label)
    }
}
