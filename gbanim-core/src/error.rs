use std::fmt;
use std::io;
use std::path::PathBuf;

/// Everything that can stop a conversion. None of these are retried.
#[derive(Debug)]
pub enum ConvertError {
    /// The source path does not exist.
    FileNotFound(PathBuf),
    /// The source exists but is not a readable animation.
    Decode { path: PathBuf, reason: String },
    /// The header could not be written.
    Write(io::Error),
    /// Input frame rate must be at least 1.
    InvalidFrameRate(u32),
    /// The symbol prefix is not a valid C identifier.
    InvalidSymbol(String),
    /// A frame handed to the writer is not exactly one screen of pixels.
    FrameSize { expected: usize, actual: usize },
}

impl ConvertError {
    pub fn decode(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        ConvertError::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::FileNotFound(path) => write!(f, "file '{}' not found", path.display()),
            ConvertError::Decode { path, reason } => {
                write!(f, "failed to decode '{}': {reason}", path.display())
            }
            ConvertError::Write(e) => write!(f, "failed to write header: {e}"),
            ConvertError::InvalidFrameRate(fps) => {
                write!(f, "input frame rate must be a positive integer, got {fps}")
            }
            ConvertError::InvalidSymbol(name) => {
                write!(f, "'{name}' is not a valid C identifier")
            }
            ConvertError::FrameSize { expected, actual } => {
                write!(f, "frame has {actual} pixels, expected {expected}")
            }
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Write(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ConvertError {
    fn from(e: io::Error) -> Self {
        ConvertError::Write(e)
    }
}
