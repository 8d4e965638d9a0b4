use anyhow::Context;
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use gbanim_core::Placement;

/// Scales every frame of one animation to the same fitted size.
pub struct FrameScaler {
    placement: Placement,
    resizer: Resizer,
    options: ResizeOptions,
}

impl FrameScaler {
    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            resizer: Resizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3)),
        }
    }

    /// Lanczos-resize an RGB24 frame to the placement size. Returns RGB24 data.
    pub fn scale(&mut self, src_data: Vec<u8>, src_width: u32, src_height: u32) -> anyhow::Result<Vec<u8>> {
        let (dst_width, dst_height) = (self.placement.width, self.placement.height);
        if src_width == dst_width && src_height == dst_height {
            return Ok(src_data);
        }

        let src_image = Image::from_vec_u8(src_width, src_height, src_data, PixelType::U8x3)
            .context("failed to create source image")?;
        let mut dst_image = Image::new(dst_width, dst_height, PixelType::U8x3);

        self.resizer
            .resize(&src_image, &mut dst_image, &self.options)
            .context("resize failed")?;

        Ok(dst_image.into_vec())
    }
}
