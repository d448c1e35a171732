/// Longest edge of a stored bubble image (px)
pub const MAX_IMAGE_DIMENSION: u32 = 400;
/// JPEG quality used when re-encoding
pub const JPEG_QUALITY: f32 = 0.8;

/// Scale `(width, height)` down so neither edge exceeds `max`, keeping aspect.
/// Images already inside the box are returned unchanged.
pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width > height {
        if width > max {
            let h = (height as f64 * max as f64 / width as f64).round() as u32;
            return (max, h);
        }
    } else if height > max {
        let w = (width as f64 * max as f64 / height as f64).round() as u32;
        return (w, max);
    }
    (width, height)
}
