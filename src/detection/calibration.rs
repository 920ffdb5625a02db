use log::{debug, warn};

use crate::models::{CalibrationState, ColorBound, Radii, SAMPLE_COUNT, SampleSet};

/// Color bounds derived for both reference sets in one calibration pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    pub hand: [ColorBound; SAMPLE_COUNT],
    pub background: [ColorBound; SAMPLE_COUNT],
}

/// Shrink `radii` until every sample's bound fits in [0, 255].
///
/// The radius is shared by all samples of the set, so one sample close to
/// either end of a channel narrows the bound of every other sample too.
pub fn fit_radii(samples: &SampleSet, radii: Radii) -> Radii {
    let mut fitted = radii;
    for sample in samples {
        for ch in 0..3 {
            if sample[ch] < fitted.lower[ch] {
                fitted.lower[ch] = sample[ch];
            }
            if sample[ch] as u16 + fitted.upper[ch] as u16 > 255 {
                fitted.upper[ch] = 255 - sample[ch];
            }
        }
    }
    fitted
}

/// Inclusive bound around each sample using already fitted radii
pub fn bounds_for(samples: &SampleSet, radii: &Radii) -> [ColorBound; SAMPLE_COUNT] {
    samples.map(|sample| {
        let mut bound = ColorBound::default();
        for ch in 0..3 {
            bound.lower[ch] = sample[ch].saturating_sub(radii.lower[ch]);
            bound.upper[ch] = sample[ch].saturating_add(radii.upper[ch]);
        }
        bound
    })
}

fn calibrate_set(name: &str, samples: &SampleSet, radii: Radii) -> (Radii, [ColorBound; SAMPLE_COUNT]) {
    let fitted = fit_radii(samples, radii);
    if fitted != radii {
        warn!(
            "{} radii tightened from {:?}/{:?} to {:?}/{:?}",
            name, radii.lower, radii.upper, fitted.lower, fitted.upper
        );
    }
    let bounds = bounds_for(samples, &fitted);
    debug!("{} bounds: {:?}", name, bounds);
    (fitted, bounds)
}

impl CalibrationState {
    /// Derive color bounds for both sets, returning the (possibly narrower)
    /// radius state to carry into the next frame.
    pub fn calibrate(self, hand: &SampleSet, background: &SampleSet) -> (CalibrationState, Thresholds) {
        let (hand_radii, hand_bounds) = calibrate_set("hand", hand, self.hand);
        let (background_radii, background_bounds) =
            calibrate_set("background", background, self.background);
        (
            CalibrationState::new(hand_radii, background_radii),
            Thresholds {
                hand: hand_bounds,
                background: background_bounds,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_BACKGROUND_RADII, DEFAULT_HAND_RADII};

    fn uniform(color: [u8; 3]) -> SampleSet {
        [color; SAMPLE_COUNT]
    }

    #[test]
    fn test_bounds_stay_in_range_for_every_value() {
        for radii in [DEFAULT_HAND_RADII, DEFAULT_BACKGROUND_RADII] {
            for v in 0..=255u8 {
                let samples = uniform([v, v, v]);
                let fitted = fit_radii(&samples, radii);
                for bound in bounds_for(&samples, &fitted) {
                    for ch in 0..3 {
                        assert!(bound.lower[ch] <= v && v <= bound.upper[ch]);
                        // No saturation was needed: the radius itself fits
                        assert_eq!(bound.lower[ch], v - fitted.lower[ch]);
                        assert_eq!(bound.upper[ch] as u16, v as u16 + fitted.upper[ch] as u16);
                    }
                }
            }
        }
    }

    #[test]
    fn test_radii_untouched_for_mid_range_samples() {
        let samples = uniform([128, 128, 128]);
        assert_eq!(fit_radii(&samples, DEFAULT_HAND_RADII), DEFAULT_HAND_RADII);
        let bounds = bounds_for(&samples, &DEFAULT_HAND_RADII);
        assert_eq!(bounds[0].lower, [88, 118, 118]);
        assert_eq!(bounds[0].upper, [168, 138, 138]);
    }

    #[test]
    fn test_one_outlier_tightens_every_sample() {
        let mut samples = uniform([150, 128, 128]);
        samples[3] = [20, 128, 250];
        let fitted = fit_radii(&samples, DEFAULT_HAND_RADII);
        assert_eq!(fitted.lower, [20, 10, 10]);
        assert_eq!(fitted.upper, [40, 10, 5]);

        let bounds = bounds_for(&samples, &fitted);
        // The ordinary samples inherit the narrowed radii
        assert_eq!(bounds[0].lower, [130, 118, 118]);
        assert_eq!(bounds[0].upper, [190, 138, 133]);
        assert_eq!(bounds[3].lower, [0, 118, 240]);
        assert_eq!(bounds[3].upper, [60, 138, 255]);
    }

    #[test]
    fn test_radius_state_never_grows() {
        let mut state = CalibrationState::new(DEFAULT_HAND_RADII, DEFAULT_BACKGROUND_RADII);
        let sequence = [
            uniform([100, 128, 128]),
            uniform([5, 128, 128]),
            uniform([200, 2, 254]),
            uniform([100, 128, 128]),
        ];
        for samples in &sequence {
            let previous = state;
            let (next, _) = state.calibrate(samples, samples);
            for ch in 0..3 {
                assert!(next.hand.lower[ch] <= previous.hand.lower[ch]);
                assert!(next.hand.upper[ch] <= previous.hand.upper[ch]);
                assert!(next.background.lower[ch] <= previous.background.lower[ch]);
                assert!(next.background.upper[ch] <= previous.background.upper[ch]);
            }
            state = next;
        }
        // Narrowing from the outliers persists after a benign frame
        assert_eq!(state.hand.lower, [5, 2, 10]);
        assert_eq!(state.hand.upper, [40, 10, 1]);
    }

    #[test]
    fn test_calibrate_is_pure() {
        let state = CalibrationState::new(DEFAULT_HAND_RADII, DEFAULT_BACKGROUND_RADII);
        let samples = uniform([3, 128, 128]);
        let (a, ta) = state.calibrate(&samples, &samples);
        let (b, tb) = state.calibrate(&samples, &samples);
        assert_eq!(a, b);
        assert_eq!(ta, tb);
        assert_eq!(state.hand, DEFAULT_HAND_RADII);
    }
}
