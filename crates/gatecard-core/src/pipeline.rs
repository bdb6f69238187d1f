//! Per-document processing: text acquisition followed by field extraction.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{GatecardError, OcrError, Result};
use crate::models::config::{GatecardConfig, PdfConfig};
use crate::models::scorecard::{ScorecardFields, SourceType};
use crate::ocr::{processed_image_path, ImageFilter, ImagePreprocessor, OcrBackend};
use crate::pdf::{PdfExtractor, PdfProcessor, PdfType};
use crate::scorecard::rules::sanitize_filename;
use crate::scorecard::{combine_with_filename, LinePositionalParser, ScorecardParser};

/// File extensions accepted for processing.
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "pdf"];

/// Kind of input document, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Image,
}

impl DocumentKind {
    /// Classify a file name. Returns `None` for extensions outside
    /// [`ALLOWED_EXTENSIONS`].
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        match extension.to_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "png" | "jpg" | "jpeg" | "gif" => Some(DocumentKind::Image),
            _ => None,
        }
    }

    /// Classify a path by its file name.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .and_then(|n| n.to_str())
            .and_then(Self::from_filename)
    }
}

/// Check whether a file name has an accepted extension.
pub fn is_allowed_file(filename: &str) -> bool {
    DocumentKind::from_filename(filename).is_some()
}

/// One processed document.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    /// Source path.
    pub path: PathBuf,
    /// Sanitized file name, appended to the text as the last line.
    pub filename: String,
    /// Where the text came from.
    pub source_type: SourceType,
    /// Text obtained from the document, without the filename line.
    pub raw_text: String,
    /// Extracted fields.
    pub fields: ScorecardFields,
    /// Warnings from text acquisition and extraction.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Outcome of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Successfully processed documents.
    pub documents: Vec<ProcessedDocument>,
    /// Documents that failed, with the error message.
    pub failures: Vec<(PathBuf, String)>,
}

impl BatchResult {
    /// Extracted fields of every successful document, in order.
    pub fn records(&self) -> Vec<ScorecardFields> {
        self.documents.iter().map(|d| d.fields.clone()).collect()
    }
}

/// Turns scorecard files into [`ScorecardFields`].
pub struct ScorecardPipeline {
    parser: LinePositionalParser,
    preprocessor: ImagePreprocessor,
    ocr: Option<Box<dyn OcrBackend>>,
    pdf: PdfConfig,
    processed_dir: Option<PathBuf>,
}

impl ScorecardPipeline {
    /// Create a pipeline without an OCR engine; images will fail until one is
    /// attached with [`with_ocr`](Self::with_ocr).
    pub fn new(config: &GatecardConfig) -> Self {
        let processed_dir = config
            .preprocess
            .keep_processed
            .then(|| config.output.output_dir.clone());

        Self {
            parser: LinePositionalParser::new(),
            preprocessor: ImagePreprocessor::from_config(&config.preprocess),
            ocr: None,
            pdf: config.pdf.clone(),
            processed_dir,
        }
    }

    /// Attach an OCR engine for image input.
    pub fn with_ocr(mut self, ocr: Box<dyn OcrBackend>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    /// Extract fields from text that was obtained elsewhere.
    pub fn process_text(&self, raw_text: &str, filename: &str) -> ProcessedDocument {
        let start = Instant::now();
        let filename = sanitize_filename(filename);
        self.finish(
            PathBuf::from(&filename),
            filename,
            SourceType::Text,
            raw_text.to_string(),
            Vec::new(),
            start,
        )
    }

    /// Process a single PDF or image file.
    pub fn process_file(&self, path: &Path) -> Result<ProcessedDocument> {
        let start = Instant::now();
        let original_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let kind = DocumentKind::from_filename(original_name)
            .ok_or_else(|| GatecardError::UnsupportedFormat(path.display().to_string()))?;
        let filename = sanitize_filename(original_name);

        info!("Processing {} as {:?}", path.display(), kind);

        let mut warnings = Vec::new();
        let (source_type, raw_text) = match kind {
            DocumentKind::Pdf => (SourceType::Pdf, self.pdf_text(path, &mut warnings)?),
            DocumentKind::Image => (
                SourceType::Image,
                self.image_text(path, &filename, &mut warnings)?,
            ),
        };

        Ok(self.finish(
            path.to_path_buf(),
            filename,
            source_type,
            raw_text,
            warnings,
            start,
        ))
    }

    /// Process files in order, calling `on_file` after each one.
    ///
    /// With `continue_on_error` a failing file is recorded and skipped;
    /// otherwise the first failure is returned.
    pub fn process_batch<F>(
        &self,
        paths: &[PathBuf],
        continue_on_error: bool,
        mut on_file: F,
    ) -> Result<BatchResult>
    where
        F: FnMut(&Path, std::result::Result<&ProcessedDocument, &GatecardError>),
    {
        let mut batch = BatchResult::default();

        for path in paths {
            match self.process_file(path) {
                Ok(document) => {
                    on_file(path, Ok(&document));
                    batch.documents.push(document);
                }
                Err(e) => {
                    on_file(path, Err(&e));
                    if !continue_on_error {
                        return Err(e);
                    }
                    warn!("Failed to process {}: {}", path.display(), e);
                    batch.failures.push((path.clone(), e.to_string()));
                }
            }
        }

        info!(
            "Batch finished: {} processed, {} failed",
            batch.documents.len(),
            batch.failures.len()
        );
        Ok(batch)
    }

    fn finish(
        &self,
        path: PathBuf,
        filename: String,
        source_type: SourceType,
        raw_text: String,
        mut warnings: Vec<String>,
        start: Instant,
    ) -> ProcessedDocument {
        let result = self.parser.parse(&combine_with_filename(&raw_text, &filename));
        warnings.extend(result.warnings);

        ProcessedDocument {
            path,
            filename,
            source_type,
            raw_text,
            fields: result.fields,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    fn pdf_text(&self, path: &Path, warnings: &mut Vec<String>) -> Result<String> {
        let data = fs::read(path)?;
        let mut extractor = PdfExtractor::new().with_min_text_length(self.pdf.min_text_length);
        extractor.load(&data)?;
        debug!("PDF has {} pages", extractor.page_count());

        let text = extractor.extract_text()?;
        if extractor.classify(&text) == PdfType::Empty {
            warn!("{} has no embedded text", path.display());
            warnings.push("PDF has no embedded text".to_string());
        }

        Ok(text)
    }

    fn image_text(&self, path: &Path, filename: &str, warnings: &mut Vec<String>) -> Result<String> {
        let ocr = self.ocr.as_ref().ok_or_else(|| {
            OcrError::Unavailable("no OCR engine configured for image input".to_string())
        })?;

        let image = image::open(path)?;
        let image = self.preprocessor.apply(&image)?;

        if let Some(dir) = &self.processed_dir {
            if self.preprocessor.filter() != ImageFilter::None {
                let processed_path = processed_image_path(dir, filename);
                let saved = fs::create_dir_all(dir)
                    .map_err(GatecardError::from)
                    .and_then(|_| image.save(&processed_path).map_err(GatecardError::from));
                match saved {
                    Ok(()) => debug!("Saved filtered image to {}", processed_path.display()),
                    Err(e) => {
                        warn!("Could not save {}: {}", processed_path.display(), e);
                        warnings.push(format!("Filtered image not saved: {}", e));
                    }
                }
            }
        }

        let result = ocr.recognize(&image)?;
        debug!(
            "{} detected {} text boxes in {}ms",
            ocr.name(),
            result.boxes.len(),
            result.processing_time_ms
        );

        if result.text.trim().is_empty() {
            warnings.push("No text detected in image".to_string());
        }

        Ok(result.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::{OcrResult, TextBox};
    use image::{DynamicImage, RgbImage};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    const SCORECARD_LINES: [&str; 13] = [
        "REG123",
        "CS",
        "Jane Doe",
        "42",
        "GEN",
        "Name of Candidate",
        "Registration Number",
        "GATE Score",
        "550",
        "85",
        "Marks out of 100",
        "Qualifying Marks",
        "16-03-2024",
    ];

    struct FixedOcr;

    impl OcrBackend for FixedOcr {
        fn name(&self) -> &str {
            "fixed"
        }

        fn recognize(&self, image: &DynamicImage) -> std::result::Result<OcrResult, OcrError> {
            let boxes = SCORECARD_LINES
                .iter()
                .enumerate()
                .map(|(i, line)| {
                    let y = i as f32 * 30.0;
                    TextBox::from_rect(10.0, y, 200.0, y + 20.0, *line)
                })
                .collect();
            Ok(OcrResult::from_boxes(
                boxes,
                (image.width(), image.height()),
                0.0,
                20.0,
            ))
        }
    }

    fn write_pdf(dir: &Path, name: &str, text: Option<&str>) -> PathBuf {
        use lopdf::content::{Content, Operation};
        use lopdf::{dictionary, Document, Object, Stream};

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let mut operations = Vec::new();
        if let Some(text) = text {
            operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ]);
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let path = dir.join(name);
        doc.save(&path).unwrap();
        path
    }

    fn write_png(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        DynamicImage::ImageRgb8(RgbImage::new(8, 8)).save(&path).unwrap();
        path
    }

    #[test]
    fn test_document_kind() {
        assert_eq!(DocumentKind::from_filename("card.PDF"), Some(DocumentKind::Pdf));
        assert_eq!(DocumentKind::from_filename("card.jpeg"), Some(DocumentKind::Image));
        assert_eq!(DocumentKind::from_filename("card.gif"), Some(DocumentKind::Image));
        assert_eq!(DocumentKind::from_filename("card.tiff"), None);
        assert_eq!(DocumentKind::from_filename("pdf"), None);
        assert!(is_allowed_file("a.b.png"));
        assert!(!is_allowed_file("notes.txt"));
    }

    #[test]
    fn test_process_text() {
        let pipeline = ScorecardPipeline::new(&GatecardConfig::default());
        let doc = pipeline.process_text(&SCORECARD_LINES.join("\n"), "my card-cs24s12345678.pdf");

        assert_eq!(doc.filename, "my_card-cs24s12345678.pdf");
        assert_eq!(doc.fields.name, "Jane Doe");
        assert_eq!(doc.fields.date, "16-03-2024");
        assert_eq!(doc.fields.roll_no, "CS24S12345");
        assert_eq!(doc.source_type, SourceType::Text);
    }

    #[test]
    fn test_process_image_with_ocr() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "Scorecard-ab12cd34ef56.png");

        let pipeline =
            ScorecardPipeline::new(&GatecardConfig::default()).with_ocr(Box::new(FixedOcr));
        let doc = pipeline.process_file(&path).unwrap();

        assert_eq!(doc.source_type, SourceType::Image);
        assert_eq!(doc.fields.register_no, "REG123");
        assert_eq!(doc.fields.all_india_rank, Some(42));
        assert_eq!(doc.fields.score, Some(550));
        assert_eq!(doc.fields.marks_out_of_100, Some(Decimal::from(85)));
        assert_eq!(doc.fields.roll_no, "AB12CD34EF");
    }

    #[test]
    fn test_filtered_image_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "card-x1.png");

        let mut config = GatecardConfig::default();
        config.preprocess.filter = ImageFilter::Gray;
        config.preprocess.keep_processed = true;
        config.output.output_dir = dir.path().join("uploads");

        let pipeline = ScorecardPipeline::new(&config).with_ocr(Box::new(FixedOcr));
        pipeline.process_file(&path).unwrap();

        assert!(dir.path().join("uploads").join("processed_card-x1.png").exists());
    }

    #[test]
    fn test_process_text_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), "Scorecard-cs24s1.pdf", Some("REG123"));

        let doc = ScorecardPipeline::new(&GatecardConfig::default())
            .process_file(&path)
            .unwrap();

        assert_eq!(doc.source_type, SourceType::Pdf);
        assert!(doc.raw_text.contains("REG123"));
        assert_eq!(doc.fields.roll_no, "CS24S1.PDF");
        assert!(doc.warnings.iter().all(|w| !w.contains("no embedded text")));
    }

    #[test]
    fn test_pdf_without_text_still_produces_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_pdf(dir.path(), "scan-ab12.pdf", None);

        let doc = ScorecardPipeline::new(&GatecardConfig::default())
            .process_file(&path)
            .unwrap();

        assert!(doc.warnings.contains(&"PDF has no embedded text".to_string()));
        assert_eq!(doc.fields.roll_no, "AB12.PDF");
        assert!(doc.fields.name.is_empty());
    }

    #[test]
    fn test_image_without_ocr_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_png(dir.path(), "card-x1.png");

        let pipeline = ScorecardPipeline::new(&GatecardConfig::default());
        assert!(matches!(
            pipeline.process_file(&path),
            Err(GatecardError::Ocr(OcrError::Unavailable(_)))
        ));
    }

    #[test]
    fn test_unsupported_format() {
        let pipeline = ScorecardPipeline::new(&GatecardConfig::default());
        assert!(matches!(
            pipeline.process_file(Path::new("notes.txt")),
            Err(GatecardError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_batch_keeps_order_and_failures() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_png(dir.path(), "a-first.png");
        let broken = dir.path().join("b-broken.pdf");
        fs::write(&broken, b"not a pdf").unwrap();
        let second = write_png(dir.path(), "c-second.png");

        let pipeline =
            ScorecardPipeline::new(&GatecardConfig::default()).with_ocr(Box::new(FixedOcr));
        let paths = vec![first, broken.clone(), second];

        let mut seen = Vec::new();
        let batch = pipeline
            .process_batch(&paths, true, |path, outcome| {
                seen.push((path.to_path_buf(), outcome.is_ok()));
            })
            .unwrap();
        assert_eq!(
            seen,
            vec![
                (paths[0].clone(), true),
                (broken.clone(), false),
                (paths[2].clone(), true),
            ]
        );
        let roll_numbers: Vec<String> = batch.records().into_iter().map(|f| f.roll_no).collect();
        assert_eq!(roll_numbers, vec!["FIRST.PNG", "SECOND.PNG"]);
        assert_eq!(batch.failures.len(), 1);
        assert_eq!(batch.failures[0].0, broken);

        let mut calls = 0;
        assert!(pipeline.process_batch(&paths, false, |_, _| calls += 1).is_err());
        assert_eq!(calls, 2);
    }
}
