/// GBA Mode 3 screen width in pixels.
pub const SCREEN_WIDTH: u32 = 240;
/// GBA Mode 3 screen height in pixels.
pub const SCREEN_HEIGHT: u32 = 160;
/// Entries in one emitted frame array.
pub const FRAME_PIXELS: usize = (SCREEN_WIDTH * SCREEN_HEIGHT) as usize;

/// Display refreshes per second on the target device.
pub const REFRESH_RATE: u32 = 60;

pub const DEFAULT_FPS: u32 = 20;
pub const DEFAULT_SYMBOL: &str = "animation";

/// Values per line in a frame's pixel array.
pub const PIXELS_PER_LINE: usize = 12;
/// Symbols per line in the frame pointer table.
pub const POINTERS_PER_LINE: usize = 5;
/// Values per line in the duration table.
pub const DURATIONS_PER_LINE: usize = 10;

/// Pack an 8-bit RGB triple into the GBA's 15-bit colour word.
///
/// Layout is `R | G << 5 | B << 10`, each channel truncated to its top five
/// bits. No rounding is applied.
#[inline]
pub fn rgb15(r: u8, g: u8, b: u8) -> u16 {
    let r = (r >> 3) as u16 & 0x1F;
    let g = (g >> 3) as u16 & 0x1F;
    let b = (b >> 3) as u16 & 0x1F;
    r | (g << 5) | (b << 10)
}

/// Number of 60 Hz refreshes each frame is held for a source played at `fps`.
///
/// Halfway cases round to even, so 24 fps gives 2 and 8 fps gives 8.
/// Anything faster than 120 fps collapses to 0.
pub fn frame_duration(fps: u32) -> u16 {
    (REFRESH_RATE as f64 / fps as f64).round_ties_even() as u16
}

/// Pack a row-major RGB24 raster of exactly one screen into colour words.
pub fn pack_screen(rgb: &[u8]) -> Vec<u16> {
    debug_assert_eq!(rgb.len(), FRAME_PIXELS * 3);
    rgb.chunks_exact(3)
        .map(|px| rgb15(px[0], px[1], px[2]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_rgb15(color: u16) -> (u8, u8, u8) {
        (
            (color & 0x1F) as u8,
            ((color >> 5) & 0x1F) as u8,
            ((color >> 10) & 0x1F) as u8,
        )
    }

    #[test]
    fn channel_quantization_truncates() {
        for v in 0..=255u8 {
            let (r, g, b) = split_rgb15(rgb15(v, v, v));
            let expected = (v >> 3) & 0x1F;
            assert_eq!((r, g, b), (expected, expected, expected));

            let restored = (r as i32) << 3;
            assert!((v as i32 - restored).abs() <= 7, "v={v} restored={restored}");
        }
    }

    #[test]
    fn channel_positions() {
        assert_eq!(rgb15(255, 0, 0), 0x001F);
        assert_eq!(rgb15(0, 255, 0), 0x03E0);
        assert_eq!(rgb15(0, 0, 255), 0x7C00);
        assert_eq!(rgb15(255, 255, 255), 0x7FFF);
        assert_eq!(rgb15(7, 7, 7), 0x0000);
        assert_eq!(rgb15(8, 16, 24), 1 | (2 << 5) | (3 << 10));
    }

    #[test]
    fn durations_for_common_rates() {
        assert_eq!(frame_duration(20), 3);
        assert_eq!(frame_duration(30), 2);
        assert_eq!(frame_duration(60), 1);
        assert_eq!(frame_duration(15), 4);
        assert_eq!(frame_duration(1), 60);
    }

    #[test]
    fn durations_round_half_to_even() {
        assert_eq!(frame_duration(8), 8); // 7.5
        assert_eq!(frame_duration(24), 2); // 2.5
        assert_eq!(frame_duration(40), 2); // 1.5
        assert_eq!(frame_duration(120), 0); // 0.5
        assert_eq!(frame_duration(25), 2); // 2.4
    }

    #[test]
    fn pack_screen_is_row_major() {
        let mut rgb = vec![0u8; FRAME_PIXELS * 3];
        // second pixel of the second row
        let idx = (SCREEN_WIDTH as usize + 1) * 3;
        rgb[idx] = 255;
        let packed = pack_screen(&rgb);
        assert_eq!(packed.len(), FRAME_PIXELS);
        assert_eq!(packed[SCREEN_WIDTH as usize + 1], 0x001F);
        assert_eq!(packed.iter().filter(|&&c| c != 0).count(), 1);
    }
}
