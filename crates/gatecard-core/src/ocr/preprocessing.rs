//! Image filters applied before OCR.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PreprocessError;
use crate::models::config::PreprocessConfig;

/// Filter applied to a scanned image before text recognition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFilter {
    /// Leave the image unchanged.
    #[default]
    None,
    /// Convert to 8-bit grayscale.
    Gray,
    /// Gaussian blur.
    Blur,
    /// Unsharp mask.
    Sharpen,
    /// Halve both dimensions.
    Resize,
}

impl FromStr for ImageFilter {
    type Err = PreprocessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "" => Ok(ImageFilter::None),
            "gray" | "grey" | "grayscale" => Ok(ImageFilter::Gray),
            "blur" => Ok(ImageFilter::Blur),
            "sharpen" => Ok(ImageFilter::Sharpen),
            "resize" => Ok(ImageFilter::Resize),
            other => Err(PreprocessError::UnknownFilter(other.to_string())),
        }
    }
}

impl fmt::Display for ImageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFilter::None => "none",
            ImageFilter::Gray => "gray",
            ImageFilter::Blur => "blur",
            ImageFilter::Sharpen => "sharpen",
            ImageFilter::Resize => "resize",
        };
        f.write_str(name)
    }
}

/// Image preprocessor for the OCR pipeline.
pub struct ImagePreprocessor {
    filter: ImageFilter,
    blur_sigma: f32,
    sharpen_sigma: f32,
    sharpen_threshold: i32,
    resize_divisor: u32,
}

impl ImagePreprocessor {
    /// Create a preprocessor with default parameters for `filter`.
    pub fn new(filter: ImageFilter) -> Self {
        Self::from_config(&PreprocessConfig {
            filter,
            ..Default::default()
        })
    }

    /// Create a preprocessor from configuration.
    pub fn from_config(config: &PreprocessConfig) -> Self {
        Self {
            filter: config.filter,
            blur_sigma: config.blur_sigma,
            sharpen_sigma: config.sharpen_sigma,
            sharpen_threshold: config.sharpen_threshold,
            resize_divisor: config.resize_divisor,
        }
    }

    /// The configured filter.
    pub fn filter(&self) -> ImageFilter {
        self.filter
    }

    /// Apply the configured filter.
    pub fn apply(&self, image: &DynamicImage) -> Result<DynamicImage, PreprocessError> {
        let (width, height) = image.dimensions();
        debug!("Applying {} filter to {}x{} image", self.filter, width, height);

        let processed = match self.filter {
            ImageFilter::None => image.clone(),
            ImageFilter::Gray => image.grayscale(),
            ImageFilter::Blur => image.blur(self.blur_sigma),
            ImageFilter::Sharpen => image.unsharpen(self.sharpen_sigma, self.sharpen_threshold),
            ImageFilter::Resize => {
                if self.resize_divisor == 0 {
                    return Err(PreprocessError::InvalidParameter(
                        "resize divisor must be at least 1".to_string(),
                    ));
                }
                let (new_width, new_height) = self.resized_dimensions(width, height);
                image.resize_exact(new_width, new_height, FilterType::CatmullRom)
            }
        };

        Ok(processed)
    }

    fn resized_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        (
            (width / self.resize_divisor).max(1),
            (height / self.resize_divisor).max(1),
        )
    }
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new(ImageFilter::None)
    }
}

/// Path a filtered copy of `filename` is stored under in `output_dir`.
pub fn processed_image_path(output_dir: &Path, filename: &str) -> PathBuf {
    output_dir.join(format!("processed_{}", filename))
}
