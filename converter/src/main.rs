mod canvas;
mod convert;
mod decode;
mod resize;

use std::path::PathBuf;

use clap::Parser;
use gbanim_core::format::{DEFAULT_FPS, DEFAULT_SYMBOL};

use crate::convert::ConvertJob;

#[derive(Parser)]
#[command(name = "gbanim-convert", about = "Convert a GIF animation to a GBA Mode 3 C header")]
struct Cli {
    /// Input GIF file path
    input: PathBuf,

    /// Output header path (default: input with .h extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Symbol prefix for the generated arrays
    #[arg(short, long, default_value = DEFAULT_SYMBOL)]
    name: String,

    /// Input GIF frame rate
    #[arg(short, long, default_value_t = DEFAULT_FPS, value_parser = clap::value_parser!(u32).range(1..))]
    fps: u32,
}

impl Cli {
    fn into_job(self) -> ConvertJob {
        let output = self.output.unwrap_or_else(|| self.input.with_extension("h"));
        ConvertJob {
            input: self.input,
            output,
            symbol: self.name,
            fps: self.fps,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let job = Cli::parse().into_job();
    let summary = convert::run(&job)?;

    log::info!("Successfully converted GIF to {}", summary.output.display());
    log::info!(
        "Generated {} frames with {} frame duration each (for {}fps source)",
        summary.frame_count,
        summary.duration,
        summary.fps
    );

    Ok(())
}
