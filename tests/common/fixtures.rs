use image::{GrayImage, Luma, Rgba, RgbaImage};
use tempfile::NamedTempFile;

pub const FRAME_WIDTH: u32 = 640;
pub const FRAME_HEIGHT: u32 = 480;

/// Background and skin colors that are far apart in Lab
pub const BACKGROUND: Rgba<u8> = Rgba([40, 60, 160, 255]);
pub const SKIN: Rgba<u8> = Rgba([220, 170, 140, 255]);

/// Inclusive pixel rectangle (x0, y0, x1, y1)
pub type Block = (u32, u32, u32, u32);

/// Top-left corners of the five fingers, thumb side first
const FINGER_TIPS: [(u32, u32); 5] = [(200, 120), (250, 80), (300, 60), (350, 80), (400, 120)];

/// Synthetic upright hand built from rectangles: the raised fingers
/// (indices into the five finger slots), a palm and a wrist stub reaching
/// into the bottom of a 640x480 frame.
pub fn hand_blocks(raised: &[usize]) -> Vec<Block> {
    let mut blocks: Vec<Block> = raised
        .iter()
        .map(|&i| {
            let (x, y) = FINGER_TIPS[i];
            (x, y, x + 23, 219)
        })
        .collect();
    blocks.push((200, 220, 423, 359));
    blocks.push((262, 360, 361, 470));
    blocks
}

pub fn open_hand() -> Vec<Block> {
    hand_blocks(&[0, 1, 2, 3, 4])
}

/// Binary mask with the blocks set to 255
pub fn paint_mask(blocks: &[Block]) -> GrayImage {
    let mut mask = GrayImage::new(FRAME_WIDTH, FRAME_HEIGHT);
    for &(x0, y0, x1, y1) in blocks {
        for y in y0..=y1 {
            for x in x0..=x1 {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
    }
    mask
}

/// Color frame of `background` with the blocks painted in `color`
pub fn paint_frame(blocks: &[Block], background: Rgba<u8>, color: Rgba<u8>) -> RgbaImage {
    let mut frame = RgbaImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, background);
    for &(x0, y0, x1, y1) in blocks {
        for y in y0..=y1 {
            for x in x0..=x1 {
                frame.put_pixel(x, y, color);
            }
        }
    }
    frame
}

pub fn uniform_frame(color: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_pixel(FRAME_WIDTH, FRAME_HEIGHT, color)
}

/// Writes a frame to a temporary PNG file.
/// The file will be automatically cleaned up when dropped.
pub fn save_temp_png(frame: &RgbaImage) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(".png")
        .tempfile()
        .expect("Failed to create temp image file");
    frame
        .save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

/// Pipeline that has sampled `BACKGROUND` and `SKIN` and is now tracking
pub fn calibrated_pipeline() -> fingercount::Pipeline {
    let mut pipeline = fingercount::Pipeline::default();
    pipeline
        .start(FRAME_WIDTH, FRAME_HEIGHT)
        .expect("Failed to start session");
    pipeline
        .process_frame(&uniform_frame(BACKGROUND))
        .expect("Background sampling failed");
    pipeline.advance_mode();
    pipeline
        .process_frame(&uniform_frame(SKIN))
        .expect("Hand sampling failed");
    pipeline.advance_mode();
    pipeline.advance_mode();
    pipeline
}
