use crate::format::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Where a source of a given size lands on the screen after a uniform
/// fit-inside scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub width: u32,
    pub height: u32,
    pub x: u32,
    pub y: u32,
}

impl Placement {
    /// Fit a `src_width` × `src_height` image inside the screen, preserving
    /// aspect ratio, centred with black margins.
    pub fn fit(src_width: u32, src_height: u32) -> Self {
        Self::fit_within(src_width, src_height, SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    pub fn fit_within(src_width: u32, src_height: u32, dst_width: u32, dst_height: u32) -> Self {
        let scale_x = dst_width as f64 / src_width as f64;
        let scale_y = dst_height as f64 / src_height as f64;
        let scale = scale_x.min(scale_y);

        // Floor, but never collapse a very thin source to nothing.
        let width = ((src_width as f64 * scale) as u32).clamp(1, dst_width);
        let height = ((src_height as f64 * scale) as u32).clamp(1, dst_height);

        Self {
            width,
            height,
            x: (dst_width - width) / 2,
            y: (dst_height - height) / 2,
        }
    }
}
