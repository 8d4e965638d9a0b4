use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use gbanim_core::encode::is_c_identifier;
use gbanim_core::format::frame_duration;
use gbanim_core::{ConvertError, HeaderWriter, Placement};

use crate::canvas;
use crate::decode::{GifDecoder, SourceFrame};
use crate::resize::FrameScaler;

/// One GIF in, one header out.
#[derive(Debug, Clone)]
pub struct ConvertJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub symbol: String,
    pub fps: u32,
}

impl ConvertJob {
    fn validate(&self) -> Result<(), ConvertError> {
        if self.fps == 0 {
            return Err(ConvertError::InvalidFrameRate(self.fps));
        }
        if !is_c_identifier(&self.symbol) {
            return Err(ConvertError::InvalidSymbol(self.symbol.clone()));
        }
        Ok(())
    }
}

/// A decoded animation, every frame composited at its native size.
pub struct SourceAnimation {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<SourceFrame>,
}

impl SourceAnimation {
    pub fn load(path: &Path) -> Result<Self, ConvertError> {
        let decoder = GifDecoder::open(path)?;
        let width = decoder.source_width();
        let height = decoder.source_height();
        let frames = decoder.collect::<Result<Vec<_>, _>>()?;

        if frames.is_empty() {
            return Err(ConvertError::decode(path, "no image frames"));
        }

        let source = Self { width, height, frames };
        if !source.is_animated() {
            log::warn!(
                "{} is not animated, only the single frame will be converted",
                path.display()
            );
        }
        Ok(source)
    }

    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }
}

/// Every frame fitted to the screen and packed, ready to serialize.
pub struct ScannedAnimation {
    pub placement: Placement,
    pub frames: Vec<Vec<u16>>,
}

impl ScannedAnimation {
    pub fn scan(source: SourceAnimation) -> anyhow::Result<Self> {
        let placement = Placement::fit(source.width, source.height);
        log::info!(
            "Source: {}x{} pixels, scaled to {}x{} at ({}, {})",
            source.width,
            source.height,
            placement.width,
            placement.height,
            placement.x,
            placement.y
        );

        let mut scaler = FrameScaler::new(placement);
        let mut frames = Vec::with_capacity(source.frames.len());

        for frame in source.frames {
            let scaled = scaler
                .scale(frame.data, frame.width, frame.height)
                .with_context(|| format!("failed to scale frame {}", frames.len()))?;
            frames.push(canvas::compose(&scaled, &placement));

            log::debug!("rasterized frame {}", frames.len() - 1);
            if frames.len() % 100 == 0 {
                log::info!("Processed {} frames...", frames.len());
            }
        }

        Ok(Self { placement, frames })
    }

    /// Serialize to `job.output`. The file is only created here, after
    /// every frame has been rasterized.
    pub fn write(&self, job: &ConvertJob) -> Result<ConversionSummary, ConvertError> {
        let source_name = job
            .input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| job.input.display().to_string());

        let file = File::create(&job.output)?;
        let mut writer = HeaderWriter::new(BufWriter::new(file), &job.symbol, &source_name, job.fps)?;
        for frame in &self.frames {
            writer.write_frame(frame)?;
        }
        let frame_count = writer.frame_count();
        let duration = writer.duration();
        writer.finish()?;

        Ok(ConversionSummary {
            output: job.output.clone(),
            frame_count,
            duration,
            fps: job.fps,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub output: PathBuf,
    pub frame_count: usize,
    pub duration: u16,
    pub fps: u32,
}

/// Load, scan and write in one go.
pub fn run(job: &ConvertJob) -> anyhow::Result<ConversionSummary> {
    job.validate()?;

    log::info!("Decoding {}", job.input.display());
    let source = SourceAnimation::load(&job.input)?;
    log::info!(
        "{} frame(s), {} refreshes each at {} fps",
        source.frames.len(),
        frame_duration(job.fps),
        job.fps
    );

    let scanned = ScannedAnimation::scan(source)?;
    let summary = scanned
        .write(job)
        .with_context(|| format!("failed to write {}", job.output.display()))?;
    Ok(summary)
}
