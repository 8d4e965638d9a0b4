use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use gbanim_core::ConvertError;
use gif::{ColorOutput, DecodeOptions, DisposalMethod};

/// Largest logical screen we are willing to composite (64 MiB as RGBA).
pub const MAX_SCREEN_PIXELS: usize = 1 << 24;

/// One fully composited frame as the viewer would see it, RGB24 row-major.
pub struct SourceFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// What to do to the logical screen before drawing the next frame.
enum Disposal {
    Clear { left: u32, top: u32, right: u32, bottom: u32 },
    Restore(Vec<u8>),
}

/// Streams composited frames out of a GIF.
pub struct GifDecoder<R: Read> {
    decoder: gif::Decoder<R>,
    path: PathBuf,
    width: u32,
    height: u32,
    /// RGBA logical screen.
    screen: Vec<u8>,
    pending: Option<Disposal>,
}

impl GifDecoder<BufReader<File>> {
    pub fn open(path: &Path) -> Result<Self, ConvertError> {
        if !path.exists() {
            return Err(ConvertError::FileNotFound(path.to_path_buf()));
        }
        let file = File::open(path).map_err(|e| ConvertError::decode(path, e))?;
        Self::new(BufReader::new(file), path)
    }
}

impl<R: Read> GifDecoder<R> {
    /// Parse the GIF header. `path` is only used in error messages.
    pub fn new(reader: R, path: &Path) -> Result<Self, ConvertError> {
        let mut options = DecodeOptions::new();
        options.set_color_output(ColorOutput::RGBA);
        let decoder = options
            .read_info(reader)
            .map_err(|e| ConvertError::decode(path, e))?;

        let width = decoder.width() as u32;
        let height = decoder.height() as u32;
        if width == 0 || height == 0 {
            return Err(ConvertError::decode(path, "image has zero width or height"));
        }
        let pixels = width as usize * height as usize;
        if pixels > MAX_SCREEN_PIXELS {
            return Err(ConvertError::decode(
                path,
                format!("logical screen too large ({width}x{height})"),
            ));
        }

        Ok(Self {
            decoder,
            path: path.to_path_buf(),
            width,
            height,
            screen: vec![0u8; pixels * 4],
            pending: None,
        })
    }

    pub fn source_width(&self) -> u32 {
        self.width
    }

    pub fn source_height(&self) -> u32 {
        self.height
    }
}

impl<R: Read> Iterator for GifDecoder<R> {
    type Item = Result<SourceFrame, ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        let frame = match self.decoder.read_next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return None,
            Err(e) => return Some(Err(ConvertError::decode(&self.path, e))),
        };

        let width = self.width as usize;
        match self.pending.take() {
            Some(Disposal::Clear { left, top, right, bottom }) => {
                for y in top as usize..bottom as usize {
                    let row = (y * width + left as usize) * 4;
                    let end = (y * width + right as usize) * 4;
                    self.screen[row..end].fill(0);
                }
            }
            Some(Disposal::Restore(saved)) => self.screen = saved,
            None => {}
        }

        let saved = (frame.dispose == DisposalMethod::Previous).then(|| self.screen.clone());

        // Clip the frame rectangle to the logical screen.
        let left = (frame.left as u32).min(self.width);
        let top = (frame.top as u32).min(self.height);
        let right = (frame.left as u32 + frame.width as u32).min(self.width);
        let bottom = (frame.top as u32 + frame.height as u32).min(self.height);
        let frame_stride = frame.width as usize * 4;

        for y in top..bottom {
            let src_row = (y - frame.top as u32) as usize * frame_stride;
            for x in left..right {
                let src = src_row + (x - frame.left as u32) as usize * 4;
                let Some(px) = frame.buffer.get(src..src + 4) else {
                    continue;
                };
                if px[3] == 0 {
                    continue;
                }
                let dst = (y as usize * width + x as usize) * 4;
                self.screen[dst..dst + 4].copy_from_slice(px);
            }
        }

        self.pending = match frame.dispose {
            DisposalMethod::Background => Some(Disposal::Clear { left, top, right, bottom }),
            DisposalMethod::Previous => saved.map(Disposal::Restore),
            _ => None,
        };

        let mut data = Vec::with_capacity(self.screen.len() / 4 * 3);
        for px in self.screen.chunks_exact(4) {
            // Uncovered pixels flatten to black, not the transparent index's palette colour.
            if px[3] == 0 {
                data.extend_from_slice(&[0, 0, 0]);
            } else {
                data.extend_from_slice(&px[..3]);
            }
        }

        Some(Ok(SourceFrame {
            data,
            width: self.width,
            height: self.height,
        }))
    }
}
