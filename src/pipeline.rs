//! Per-frame dispatch for a capture session.
//!
//! The pipeline owns the session's frame buffers, the sampled reference
//! colors and the calibration radii. Each call to
//! [`Pipeline::process_frame`] runs the stages selected by the current
//! [`Mode`] to completion before returning.

use std::path::{Path, PathBuf};

use image::{GrayImage, RgbaImage};
use log::{debug, info};

use crate::config::DetectorConfig;
use crate::detection::{self, mask, preprocessing, sampling, sampling::SampleLayout};
use crate::error::DetectError;
use crate::models::{CalibrationState, HandState, LabImage, SAMPLE_COUNT, SampleSet};
use crate::overlay;

/// What the session does with each incoming frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Read the background reference colors
    #[default]
    SampleBackground,
    /// Read the hand reference colors
    SampleHand,
    /// Show the binary mask
    Detect,
    /// Count fingers and annotate the color frame
    Track,
}

impl Mode {
    /// Next mode for the "advance" action.
    ///
    /// Cycles through the sampling steps into tracking; from tracking it
    /// falls back to showing the mask.
    pub fn advance(self) -> Mode {
        match self {
            Mode::SampleBackground => Mode::SampleHand,
            Mode::SampleHand => Mode::Detect,
            Mode::Detect => Mode::Track,
            Mode::Track => Mode::Detect,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::SampleBackground => "sample_background",
            Mode::SampleHand => "sample_hand",
            Mode::Detect => "detect",
            Mode::Track => "track",
        }
    }
}

/// Frame-sized buffers that live exactly as long as a capture session.
#[derive(Debug, Clone)]
pub struct FrameBuffers {
    pub width: u32,
    pub height: u32,
    /// Blurred color frame, annotated in place
    pub display: RgbaImage,
    /// `display` converted to Lab
    pub lab: LabImage,
    pub mask: GrayImage,
}

impl FrameBuffers {
    pub fn new(width: u32, height: u32) -> Result<Self, DetectError> {
        if width == 0 || height == 0 {
            return Err(DetectError::EmptyFrame { width, height });
        }
        Ok(Self {
            width,
            height,
            display: RgbaImage::new(width, height),
            lab: LabImage::new(width, height),
            mask: GrayImage::new(width, height),
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Image handed back to the renderer for one frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutput {
    Color(RgbaImage),
    Mask(GrayImage),
}

impl FrameOutput {
    pub fn save(&self, path: &Path) -> Result<(), image::ImageError> {
        match self {
            FrameOutput::Color(img) => img.save(path),
            FrameOutput::Mask(img) => img.save(path),
        }
    }
}

/// Result of processing one frame
#[derive(Debug, Clone)]
pub struct FrameResult {
    pub mode: Mode,
    pub output: FrameOutput,
    /// Only set in tracking mode
    pub hand: Option<HandState>,
}

impl FrameResult {
    pub fn finger_count(&self) -> Option<u8> {
        self.hand.as_ref().and_then(HandState::finger_count)
    }
}

/// Debug configuration
#[derive(Debug, Clone)]
pub struct DebugConfig {
    pub output_dir: PathBuf,
}

/// Capture session driving the detector frame by frame.
pub struct Pipeline {
    config: DetectorConfig,
    mode: Mode,
    calibration: CalibrationState,
    hand_samples: SampleSet,
    background_samples: SampleSet,
    buffers: Option<FrameBuffers>,
    verbose: bool,
    debug: Option<DebugConfig>,
    frame_index: usize,
}

impl Pipeline {
    pub fn new(config: DetectorConfig) -> Self {
        let calibration = config.initial_calibration();
        Self {
            config,
            mode: Mode::default(),
            calibration,
            hand_samples: [[0; 3]; SAMPLE_COUNT],
            background_samples: [[0; 3]; SAMPLE_COUNT],
            buffers: None,
            verbose: false,
            debug: None,
            frame_index: 0,
        }
    }

    /// Log every frame's outcome at info level instead of debug
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enable debug mode with output directory
    /// The directory must be empty or non-existent
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self, DetectError> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(DetectError::DebugDirNotEmpty(output_dir));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.debug = Some(DebugConfig { output_dir });
        Ok(self)
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn calibration(&self) -> CalibrationState {
        self.calibration
    }

    pub fn hand_samples(&self) -> &SampleSet {
        &self.hand_samples
    }

    pub fn background_samples(&self) -> &SampleSet {
        &self.background_samples
    }

    pub fn is_started(&self) -> bool {
        self.buffers.is_some()
    }

    /// Allocate the frame buffers for a session of the given frame size.
    pub fn start(&mut self, width: u32, height: u32) -> Result<(), DetectError> {
        if self.buffers.is_some() {
            return Err(DetectError::SessionAlreadyStarted);
        }
        self.buffers = Some(FrameBuffers::new(width, height)?);
        info!("Capture session started at {}x{}", width, height);
        Ok(())
    }

    /// Release the frame buffers. Stopping an idle pipeline does nothing.
    pub fn stop(&mut self) {
        if self.buffers.take().is_some() {
            info!("Capture session stopped after {} frames", self.frame_index);
        }
    }

    pub fn advance_mode(&mut self) -> Mode {
        let next = self.mode.advance();
        debug!("Mode {} -> {}", self.mode.name(), next.name());
        self.mode = next;
        next
    }

    /// Go back to sampling the background
    pub fn resample(&mut self) {
        debug!("Mode {} -> {}", self.mode.name(), Mode::SampleBackground.name());
        self.mode = Mode::SampleBackground;
    }

    /// Restore the seed radii and forget both sample sets
    pub fn reset_calibration(&mut self) {
        self.calibration = self.config.initial_calibration();
        self.hand_samples = [[0; 3]; SAMPLE_COUNT];
        self.background_samples = [[0; 3]; SAMPLE_COUNT];
        debug!("Calibration reset to seed radii");
    }

    /// Run the current mode's stages on one RGBA frame.
    pub fn process_frame(&mut self, frame: &RgbaImage) -> Result<FrameResult, DetectError> {
        let buffers = self.buffers.as_mut().ok_or(DetectError::SessionNotStarted)?;
        if frame.dimensions() != buffers.dimensions() {
            return Err(DetectError::FrameSizeMismatch {
                expected: buffers.dimensions(),
                actual: frame.dimensions(),
            });
        }

        buffers.display = preprocessing::apply_blur(frame, self.config.blur_kernel, self.config.blur_sigma);
        buffers.lab = preprocessing::to_lab(&buffers.display);

        let mode = self.mode;
        let (width, height) = buffers.dimensions();
        let mut hand = None;

        let output = match mode {
            Mode::SampleBackground => {
                let regions = SampleLayout::Background.regions(width, height, self.config.sample_square_divisor);
                overlay::draw_background_regions(&mut buffers.display, &regions);
                self.background_samples = sampling::sample_colors(&buffers.lab, &regions);
                info!("Sampled background colors: {:?}", self.background_samples);
                FrameOutput::Color(buffers.display.clone())
            }
            Mode::SampleHand => {
                let regions = SampleLayout::Hand.regions(width, height, self.config.sample_square_divisor);
                overlay::draw_hand_regions(&mut buffers.display, &regions);
                self.hand_samples = sampling::sample_colors(&buffers.lab, &regions);
                info!("Sampled hand colors: {:?}", self.hand_samples);
                FrameOutput::Color(buffers.display.clone())
            }
            Mode::Detect | Mode::Track => {
                let (calibration, thresholds) = self
                    .calibration
                    .calibrate(&self.hand_samples, &self.background_samples);
                self.calibration = calibration;
                buffers.mask = mask::build_mask(&buffers.lab, &thresholds, &self.config);

                if mode == Mode::Detect {
                    FrameOutput::Mask(buffers.mask.clone())
                } else {
                    buffers.mask = mask::median(&buffers.mask, self.config.tracking_median);
                    let state = detection::track_hand(&buffers.mask, &self.config);
                    overlay::draw_hand(&mut buffers.display, &state);
                    hand = Some(state);
                    FrameOutput::Color(buffers.display.clone())
                }
            }
        };

        let result = FrameResult { mode, output, hand };
        let index = self.frame_index;
        self.frame_index += 1;
        self.report(index, &result);
        self.save_debug_output(index, &result)?;
        Ok(result)
    }

    fn report(&self, index: usize, result: &FrameResult) {
        let Some(hand) = &result.hand else {
            return;
        };
        let message = format!(
            "Frame {}: fingers {:?}, hand {}",
            index,
            hand.finger_count(),
            if hand.is_hand { "accepted" } else { "rejected" }
        );
        if self.verbose {
            info!("{}", message);
        } else {
            debug!("{}", message);
        }
    }

    /// Write the frame's output image. A failed write does not roll back the
    /// frame: samples, calibration and the frame counter have already moved on.
    fn save_debug_output(&self, index: usize, result: &FrameResult) -> Result<(), DetectError> {
        let Some(debug_config) = &self.debug else {
            return Ok(());
        };
        let filename = format!("{:04}_{}.png", index, result.mode.name());
        let path = debug_config.output_dir.join(&filename);
        result.output.save(&path)?;
        debug!("Debug: saved {}", path.display());
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}
