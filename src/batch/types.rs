use super::ProcessError;
use crate::placement::Anchor;
use crate::watermark::TextColor;
use std::fmt;
use std::path::PathBuf;

/// Extensions (lowercase, without the dot) that are picked up from the input directory.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tiff"];

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Text height in pixels; `None` or `Some(0)` sizes it from the image width.
    pub font_size: Option<u32>,
    pub color: TextColor,
    pub anchor: Anchor,
    pub output_suffix: String,
    pub jpeg_quality: u8,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            font_size: None,
            color: TextColor::default(),
            anchor: Anchor::BottomRight,
            output_suffix: "_watermark".to_string(),
            jpeg_quality: 75,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoCaptureDate,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::NoCaptureDate => f.write_str("No EXIF date found."),
        }
    }
}

#[derive(Debug)]
pub enum FileOutcome {
    Saved {
        output: PathBuf,
        capture_date: String,
    },
    Skipped(SkipReason),
    Failed(ProcessError),
}

#[derive(Debug)]
pub struct FileReport {
    pub file_name: String,
    pub outcome: FileOutcome,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub output_directory: PathBuf,
    pub output_directory_created: bool,
    pub reports: Vec<FileReport>,
}

impl BatchSummary {
    pub fn saved(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Saved { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped(_)))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed(_)))
    }

    pub fn report(&self, file_name: &str) -> Option<&FileReport> {
        self.reports.iter().find(|r| r.file_name == file_name)
    }

    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.outcome)).count()
    }
}
