//! Landscape / resolution gate for desktop wallpapers.

/// Narrowest accepted width:height ratio.
pub const MIN_ASPECT_RATIO: f64 = 1.3;
/// Widest accepted width:height ratio.
pub const MAX_ASPECT_RATIO: f64 = 2.5;

/// True when the image is wider than tall, at least `min_width` x
/// `min_height`, and its aspect ratio is within desktop range.
pub fn is_landscape_high_quality(width: u32, height: u32, min_width: u32, min_height: u32) -> bool {
    if width == 0 || height == 0 {
        return false;
    }
    let ratio = f64::from(width) / f64::from(height);
    width > height
        && width >= min_width
        && height >= min_height
        && (MIN_ASPECT_RATIO..=MAX_ASPECT_RATIO).contains(&ratio)
}
