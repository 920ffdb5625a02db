use crate::models::BoundingRect;

/// Plausibility gate for the selected contour.
///
/// The box must be at least half the frame tall and a quarter of it wide,
/// and its centre must fall in the middle half of the frame on both axes.
pub fn is_hand(selected: Option<usize>, rect: Option<&BoundingRect>, frame: (u32, u32)) -> bool {
    let (Some(_), Some(rect)) = (selected, rect) else {
        return false;
    };
    let (cols, rows) = (frame.0 as i32, frame.1 as i32);

    if rect.height < rows / 2 || rect.width < cols / 4 {
        return false;
    }
    let (cx, cy) = rect.center();
    cx >= cols / 4 && cx <= cols * 3 / 4 && cy >= rows / 4 && cy <= rows * 3 / 4
}
