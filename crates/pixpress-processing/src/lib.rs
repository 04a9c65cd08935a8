//! Pixpress Processing Library
//!
//! Image work behind the compression endpoint:
//! - Extension allowlist and output name derivation (validator)
//! - Aspect-preserving downscale (image::resize)
//! - HEIF/HEIC to JPEG conversion through `heif-convert` (image::heif)
//! - Decode, resize and re-encode pipeline (compression)

pub mod compression;
pub mod error;
pub mod image;
pub mod validator;

pub use compression::{CompressionJob, CompressionOutcome, ImageCompressor, OutputFormat};
pub use error::ProcessingError;
pub use crate::image::{HeifConverter, ImageResize};
pub use validator::{ExtensionValidator, OutputName, ValidationError};
