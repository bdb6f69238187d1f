//! Configuration structures for the scorecard pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ocr::ImageFilter;
use crate::spreadsheet::SpreadsheetFormat;

/// Main configuration for the gatecard pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatecardConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Image filter configuration.
    pub preprocess: PreprocessConfig,

    /// Spreadsheet output configuration.
    pub output: OutputConfig,

    /// Model configuration.
    pub models: ModelConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Drop recognized boxes below this confidence (0.0 - 1.0).
    pub recognition_threshold: f32,

    /// Maximum image dimension (longer side) handed to the engine.
    pub max_image_size: u32,

    /// Keep `[UNK]` tokens emitted by the recognizer instead of blanking them.
    pub keep_unk: bool,

    /// Vertical distance in pixels within which boxes share a reading row.
    pub row_tolerance: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            recognition_threshold: 0.0, // CTC confidences run low
            max_image_size: 2048,
            keep_unk: false,
            row_tolerance: 20.0,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Non-whitespace characters below which a PDF is reported as having no
    /// embedded text.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self { min_text_length: 1 }
    }
}

/// Image filter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Filter applied to images before OCR.
    pub filter: ImageFilter,

    /// Gaussian sigma for the `blur` filter.
    pub blur_sigma: f32,

    /// Gaussian sigma for the `sharpen` unsharp mask.
    pub sharpen_sigma: f32,

    /// Difference threshold for the `sharpen` unsharp mask.
    pub sharpen_threshold: i32,

    /// Both dimensions are divided by this for the `resize` filter.
    pub resize_divisor: u32,

    /// Save filtered images as `processed_<name>` in the output directory.
    pub keep_processed: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            filter: ImageFilter::None,
            blur_sigma: 2.0,
            sharpen_sigma: 1.0,
            sharpen_threshold: 0,
            resize_divisor: 2,
            keep_processed: false,
        }
    }
}

/// Spreadsheet output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory the spreadsheet (and processed images) are written to.
    pub output_dir: PathBuf,

    /// Spreadsheet file name, without directory.
    pub file_name: String,

    /// Spreadsheet format.
    pub format: SpreadsheetFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("uploads"),
            file_name: "gate_scorecard_data.xlsx".to_string(),
            format: SpreadsheetFormat::Xlsx,
        }
    }
}

impl OutputConfig {
    /// Full path of the spreadsheet, with the extension matching the format.
    ///
    /// A trailing `.xlsx` or `.csv` is swapped for the format's extension;
    /// any other name gets the extension appended.
    pub fn spreadsheet_path(&self) -> PathBuf {
        let stem = SpreadsheetFormat::ALL
            .iter()
            .find_map(|format| strip_extension(&self.file_name, format.extension()))
            .unwrap_or(self.file_name.as_str());

        self.output_dir.join(format!("{}.{}", stem, self.format.extension()))
    }
}

fn strip_extension<'a>(name: &'a str, extension: &str) -> Option<&'a str> {
    let (stem, ext) = name.rsplit_once('.')?;
    (!stem.is_empty() && ext.eq_ignore_ascii_case(extension)).then_some(stem)
}

/// Model file paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl ModelConfig {
    /// Full path of a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.model_dir.join(model_name)
    }

    /// Check that every model file exists under `model_dir`.
    pub fn is_available(&self) -> bool {
        [&self.detection_model, &self.recognition_model, &self.dictionary]
            .iter()
            .all(|name| self.model_path(name).exists())
    }
}

impl GatecardConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_spreadsheet_path() {
        let config = GatecardConfig::default();
        assert_eq!(
            config.output.spreadsheet_path(),
            PathBuf::from("uploads").join("gate_scorecard_data.xlsx")
        );
    }

    #[test]
    fn test_csv_spreadsheet_path() {
        let output = OutputConfig {
            format: SpreadsheetFormat::Csv,
            ..Default::default()
        };
        assert_eq!(
            output.spreadsheet_path(),
            PathBuf::from("uploads").join("gate_scorecard_data.csv")
        );
    }

    #[test]
    fn test_spreadsheet_path_keeps_dotted_names() {
        let mut output = OutputConfig {
            file_name: "scores.2024".to_string(),
            ..Default::default()
        };
        assert_eq!(
            output.spreadsheet_path(),
            PathBuf::from("uploads").join("scores.2024.xlsx")
        );

        output.file_name = "scores.2024.XLSX".to_string();
        assert_eq!(
            output.spreadsheet_path(),
            PathBuf::from("uploads").join("scores.2024.xlsx")
        );

        output.format = SpreadsheetFormat::Csv;
        assert_eq!(
            output.spreadsheet_path(),
            PathBuf::from("uploads").join("scores.2024.csv")
        );

        output.file_name = "report".to_string();
        assert_eq!(
            output.spreadsheet_path(),
            PathBuf::from("uploads").join("report.csv")
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: GatecardConfig =
            serde_json::from_str(r#"{"output": {"output_dir": "out"}, "preprocess": {"filter": "gray"}}"#)
                .unwrap();

        assert_eq!(config.output.output_dir, PathBuf::from("out"));
        assert_eq!(config.output.file_name, "gate_scorecard_data.xlsx");
        assert_eq!(config.preprocess.filter, ImageFilter::Gray);
        assert_eq!(config.preprocess.resize_divisor, 2);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = GatecardConfig::default();
        config.pdf.min_text_length = 50;
        config.save(&path).unwrap();

        let loaded = GatecardConfig::from_file(&path).unwrap();
        assert_eq!(loaded.pdf.min_text_length, 50);
        assert_eq!(loaded.models.detection_model, "det.onnx");
    }
}
