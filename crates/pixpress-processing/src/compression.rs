use crate::error::ProcessingError;
use crate::image::{HeifConverter, ImageResize};
use anyhow::{anyhow, Result};
use bytes::Bytes;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Quality used for lossy encoders (JPEG, WebP)
pub const OUTPUT_QUALITY: u8 = 85;

/// libjpeg refuses larger sides
const JPEG_MAX_DIMENSION: u32 = 65_500;
/// libwebp refuses larger sides
const WEBP_MAX_DIMENSION: u32 = 16_383;

/// Encoding chosen from the output file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim_start_matches('.').to_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "png" => Ok(OutputFormat::Png),
            "webp" => Ok(OutputFormat::WebP),
            _ => Err(anyhow!("Invalid format: {}", s)),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ProcessingError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::parse(ext).map_err(|e| ProcessingError::UnsupportedFormat(e.to_string()))
    }

    /// Largest width or height the encoder accepts
    pub fn max_dimension(self) -> Option<u32> {
        match self {
            OutputFormat::Jpeg => Some(JPEG_MAX_DIMENSION),
            OutputFormat::WebP => Some(WEBP_MAX_DIMENSION),
            OutputFormat::Png => None,
        }
    }

    pub fn to_mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
        }
    }
}

/// One upload to turn into one compressed output
#[derive(Debug, Clone)]
pub struct CompressionJob {
    pub source: PathBuf,
    pub output: PathBuf,
    pub max_width: u32,
    pub max_height: u32,
    /// Scratch JPEG path for HEIF/HEIC sources; `None` for formats decoded directly
    pub heif_scratch: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressionOutcome {
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}

/// Decode, downscale and re-encode uploads
#[derive(Debug, Clone)]
pub struct ImageCompressor {
    heif: HeifConverter,
}

impl ImageCompressor {
    pub fn new(heif: HeifConverter) -> Self {
        Self { heif }
    }

    /// Run a job end to end. The output is written in place; the HEIF scratch file is
    /// removed whether or not encoding succeeds.
    #[tracing::instrument(skip(self, job), fields(source = %job.source.display(), output = %job.output.display()))]
    pub async fn compress(&self, job: CompressionJob) -> Result<CompressionOutcome, ProcessingError> {
        let start = std::time::Instant::now();
        let format = OutputFormat::from_path(&job.output)?;

        let result = match &job.heif_scratch {
            Some(scratch) => {
                let converted = self.heif.convert(&job.source, scratch).await;
                let result = match converted {
                    Ok(()) => Self::run_blocking(scratch.clone(), &job, format).await,
                    Err(e) => Err(e),
                };
                if let Err(e) = tokio::fs::remove_file(scratch).await {
                    if e.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(path = %scratch.display(), error = %e, "Failed to remove HEIF scratch file");
                    }
                }
                result
            }
            None => Self::run_blocking(job.source.clone(), &job, format).await,
        };

        let outcome = result?;

        tracing::info!(
            width = outcome.width,
            height = outcome.height,
            size_bytes = outcome.size_bytes,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image compressed"
        );

        Ok(outcome)
    }

    async fn run_blocking(
        input: PathBuf,
        job: &CompressionJob,
        format: OutputFormat,
    ) -> Result<CompressionOutcome, ProcessingError> {
        let output = job.output.clone();
        let (max_width, max_height) = (job.max_width, job.max_height);

        tokio::task::spawn_blocking(move || {
            Self::compress_file(&input, &output, max_width, max_height, format)
        })
        .await
        .map_err(|e| ProcessingError::Task(e.to_string()))?
    }

    /// Blocking core: read `input`, fit it inside the box and write `output`
    pub fn compress_file(
        input: &Path,
        output: &Path,
        max_width: u32,
        max_height: u32,
        format: OutputFormat,
    ) -> Result<CompressionOutcome, ProcessingError> {
        let img = ImageReader::open(input)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| ProcessingError::Decode(e.to_string()))?;

        let resized = ImageResize::downscale(&img, max_width, max_height);
        let (width, height) = resized.dimensions();

        let data = Self::encode(&resized, format)
            .map_err(|e| ProcessingError::Encode(e.to_string()))?;

        std::fs::write(output, &data)?;

        Ok(CompressionOutcome {
            width,
            height,
            size_bytes: data.len() as u64,
        })
    }

    pub fn encode(img: &DynamicImage, format: OutputFormat) -> Result<Bytes> {
        // The native encoders abort on oversized input instead of returning an error
        let (width, height) = img.dimensions();
        if let Some(max) = format.max_dimension() {
            if width > max || height > max {
                return Err(anyhow!(
                    "{}x{} image exceeds the {} limit of {} pixels per side",
                    width,
                    height,
                    format.to_mime_type(),
                    max
                ));
            }
        }

        match format {
            OutputFormat::Jpeg => Self::compress_jpeg(img),
            OutputFormat::Png => Self::compress_png(img),
            OutputFormat::WebP => Self::compress_webp(img),
        }
    }

    /// Compress to JPEG using mozjpeg with optimized Huffman tables
    fn compress_jpeg(img: &DynamicImage) -> Result<Bytes> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(OUTPUT_QUALITY as f32);
        comp.set_optimize_coding(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(&rgb_img)?;
        let jpeg_data = comp.finish()?;

        Ok(Bytes::from(jpeg_data))
    }

    /// Compress to PNG at the encoder's best compression level
    fn compress_png(img: &DynamicImage) -> Result<Bytes> {
        let mut buffer = Vec::new();
        let encoder = PngEncoder::new_with_quality(
            Cursor::new(&mut buffer),
            CompressionType::Best,
            FilterType::Adaptive,
        );

        img.write_with_encoder(encoder)?;

        Ok(Bytes::from(buffer))
    }

    /// Compress to lossy WebP
    fn compress_webp(img: &DynamicImage) -> Result<Bytes> {
        let (width, height) = img.dimensions();

        let webp_data = if img.color().has_alpha() {
            let rgba_img = img.to_rgba8();
            webp::Encoder::from_rgba(&rgba_img, width, height).encode(OUTPUT_QUALITY as f32)
        } else {
            let rgb_img = img.to_rgb8();
            webp::Encoder::from_rgb(&rgb_img, width, height).encode(OUTPUT_QUALITY as f32)
        };

        Ok(Bytes::copy_from_slice(&webp_data))
    }
}
