use crate::models::{CalibrationState, Radii};

/// Seed radii for the hand set: wide on lightness, narrow on chroma.
pub const DEFAULT_HAND_RADII: Radii = Radii::from_pairs((40, 40), (10, 10), (10, 10));

/// Seed radii for the background set.
pub const DEFAULT_BACKGROUND_RADII: Radii = Radii::from_pairs((50, 50), (3, 3), (3, 3));

/// Tunable constants of the detector.
///
/// `Default` reproduces the values the heuristics were tuned with. Divisors
/// are applied with integer division to the bounding-rectangle size.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    pub hand_radii: Radii,
    pub background_radii: Radii,

    // Preprocessing
    pub blur_kernel: u32,
    pub blur_sigma: f32,

    // Mask cleanup (kernel sizes, odd)
    pub hand_median: u32,
    pub hand_close: u32,
    pub background_median: u32,
    pub tracking_median: u32,

    // Contour stage
    pub approx_epsilon: f64,
    pub min_contour_points: usize,

    // Hull stage
    pub defect_depth_divisor: i32,
    pub max_valley_angle: f64,
    pub tip_distance_divisor: i32,
    pub tip_offset_divisor: i32,
    pub max_tip_angle: f64,
    pub bottom_margin_divisor: i32,

    // Sampling
    pub sample_square_divisor: u32,
}

impl DetectorConfig {
    pub fn new() -> Self {
        Self {
            hand_radii: DEFAULT_HAND_RADII,
            background_radii: DEFAULT_BACKGROUND_RADII,
            blur_kernel: 5,
            blur_sigma: 5.0,
            hand_median: 3,
            hand_close: 7,
            background_median: 7,
            tracking_median: 5,
            approx_epsilon: 1.0,
            min_contour_points: 5,
            defect_depth_divisor: 5,
            max_valley_angle: 80.0,
            tip_distance_divisor: 10,
            tip_offset_divisor: 10,
            max_tip_angle: 165.0,
            bottom_margin_divisor: 4,
            sample_square_divisor: 20,
        }
    }

    pub fn with_hand_radii(mut self, radii: Radii) -> Self {
        self.hand_radii = radii;
        self
    }

    pub fn with_background_radii(mut self, radii: Radii) -> Self {
        self.background_radii = radii;
        self
    }

    /// Radius state a new session starts from
    pub fn initial_calibration(&self) -> CalibrationState {
        CalibrationState::new(self.hand_radii, self.background_radii)
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self::new()
    }
}
