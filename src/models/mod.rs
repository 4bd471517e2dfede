pub mod image;
pub mod openai;
pub mod request;

pub use self::image::*;
pub use openai::*;
pub use request::*;

/// Outcome of one generation: the image, or the failure to report.
pub type GenerationResult = crate::error::Result<GeneratedImage>;
