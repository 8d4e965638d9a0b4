use gbanim_core::format::{pack_screen, FRAME_PIXELS, SCREEN_WIDTH};
use gbanim_core::Placement;

/// Paste a scaled RGB24 image onto a black screen-sized canvas at its
/// placement offset. Returns the RGB24 canvas.
pub fn paste(scaled: &[u8], placement: &Placement) -> Vec<u8> {
    let mut canvas = vec![0u8; FRAME_PIXELS * 3];
    let row_len = placement.width as usize * 3;
    let stride = SCREEN_WIDTH as usize * 3;

    for (row, src) in scaled.chunks_exact(row_len).take(placement.height as usize).enumerate() {
        let dst = (placement.y as usize + row) * stride + placement.x as usize * 3;
        canvas[dst..dst + row_len].copy_from_slice(src);
    }

    canvas
}

/// Paste then quantize: one full screen of packed colour words.
pub fn compose(scaled: &[u8], placement: &Placement) -> Vec<u16> {
    pack_screen(&paste(scaled, placement))
}
