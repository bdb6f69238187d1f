//! OCR over scanned scorecard images.
//!
//! The recognizer itself sits behind [`OcrBackend`]; the native build wraps
//! `pure-onnx-ocr`. Everything here only orders and joins what it returns.

mod preprocessing;
#[cfg(feature = "native")]
mod pure_engine;

pub use preprocessing::{processed_image_path, ImageFilter, ImagePreprocessor};
#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// Text recognition engine.
pub trait OcrBackend {
    /// Short engine name for logs.
    fn name(&self) -> &str;

    /// Recognize text in an image.
    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError>;
}

/// A detected text box with its coordinates and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Create a box from an axis-aligned rectangle.
    pub fn from_rect(x1: f32, y1: f32, x2: f32, y2: f32, text: impl Into<String>) -> Self {
        Self {
            bbox: [x1, y1, x2, y1, x2, y2, x1, y2],
            text: text.into(),
            confidence: 1.0,
        }
    }

    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Result of OCR processing on an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// Recognized text boxes in reading order.
    pub boxes: Vec<TextBox>,

    /// Full text (boxes joined with newlines).
    pub text: String,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrResult {
    /// Create an empty result.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            boxes: Vec::new(),
            text: String::new(),
            processing_time_ms: 0,
            image_size: (width, height),
        }
    }

    /// Build a result from unordered boxes.
    ///
    /// Boxes below `min_confidence` are dropped, the rest are put in reading
    /// order and their text joined with newlines.
    pub fn from_boxes(
        boxes: Vec<TextBox>,
        image_size: (u32, u32),
        min_confidence: f32,
        row_tolerance: f32,
    ) -> Self {
        let mut result = Self {
            boxes: boxes
                .into_iter()
                .filter(|b| b.confidence >= min_confidence)
                .collect(),
            ..Self::empty(image_size.0, image_size.1)
        };
        result.sort_by_reading_order(row_tolerance);
        result
    }

    /// Sort boxes by reading order (top-to-bottom, left-to-right).
    ///
    /// Boxes whose top edges fall in the same `row_tolerance` band share a row.
    pub fn sort_by_reading_order(&mut self, row_tolerance: f32) {
        let tolerance = row_tolerance.max(1.0);
        self.boxes.sort_by(|a, b| {
            let (ax, ay, _, _) = a.rect();
            let (bx, by, _, _) = b.rect();

            let row_a = (ay / tolerance) as i32;
            let row_b = (by / tolerance) as i32;

            if row_a != row_b {
                row_a.cmp(&row_b)
            } else {
                ax.partial_cmp(&bx).unwrap_or(std::cmp::Ordering::Equal)
            }
        });

        self.text = self
            .boxes
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
    }
}
