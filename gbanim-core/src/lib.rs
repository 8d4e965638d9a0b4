pub mod format;
pub mod geometry;
pub mod error;
pub mod encode;

pub use encode::HeaderWriter;
pub use error::ConvertError;
pub use geometry::Placement;
