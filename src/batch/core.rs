use super::{
    BatchError, BatchOptions, BatchSummary, FileOutcome, FileReport, ProcessError,
    SUPPORTED_EXTENSIONS, SkipReason,
};
use crate::fonts::FontResolver;
use crate::metadata::{Photo, extract_capture_date};
use crate::startup_checks::{prepare_output_directory, validate_input_directory};
use crate::watermark::draw_date_watermark;
use image::{DynamicImage, ImageFormat, codecs::jpeg::JpegEncoder};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

pub fn is_supported_image(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

/// Text size used when none is given: a fortieth of the image width.
pub fn auto_font_size(image_width: u32) -> u32 {
    (image_width / 40).max(1)
}

/// Stamp every supported photo directly inside `input_dir`.
///
/// Results go to `<input_dir>/<name><suffix>/` under the original file
/// names. Per-file problems are recorded in the summary and never stop the
/// batch; only an unusable input or output directory does.
pub fn process_directory(
    input_dir: &Path,
    options: &BatchOptions,
    fonts: &FontResolver,
) -> Result<BatchSummary, BatchError> {
    validate_input_directory(input_dir)?;
    let output_dir = prepare_output_directory(input_dir, &options.output_suffix)?;

    let mut summary = BatchSummary {
        output_directory: output_dir.path.clone(),
        output_directory_created: output_dir.created,
        reports: Vec::new(),
    };

    for (file_name, path) in list_photos(input_dir)? {
        let output_path = output_dir.path.join(&file_name);
        let outcome = process_file(&path, &output_path, options, fonts);

        match &outcome {
            FileOutcome::Saved { output, .. } => {
                info!("Watermarked image saved to: {}", output.display())
            }
            FileOutcome::Skipped(reason) => info!("Skipping {}: {}", file_name, reason),
            FileOutcome::Failed(e) => error!("Error processing {}: {}", file_name, e),
        }

        summary.reports.push(FileReport { file_name, outcome });
    }

    info!(
        "Processed {} files: {} saved, {} skipped, {} failed",
        summary.reports.len(),
        summary.saved(),
        summary.skipped(),
        summary.failed()
    );

    Ok(summary)
}

/// Stamp a single photo, writing the result to `output_path`.
pub fn process_file(
    input_path: &Path,
    output_path: &Path,
    options: &BatchOptions,
    fonts: &FontResolver,
) -> FileOutcome {
    match stamp_file(input_path, output_path, options, fonts) {
        Ok(Some(capture_date)) => FileOutcome::Saved {
            output: output_path.to_path_buf(),
            capture_date,
        },
        Ok(None) => FileOutcome::Skipped(SkipReason::NoCaptureDate),
        Err(e) => FileOutcome::Failed(e),
    }
}

fn stamp_file(
    input_path: &Path,
    output_path: &Path,
    options: &BatchOptions,
    fonts: &FontResolver,
) -> Result<Option<String>, ProcessError> {
    let bytes = std::fs::read(input_path)?;
    let photo = Photo::decode(&bytes).map_err(ProcessError::Decode)?;
    drop(bytes);

    let Some(capture_date) = extract_capture_date(&photo) else {
        return Ok(None);
    };

    let font_size = match options.font_size {
        Some(size) if size > 0 => size,
        _ => auto_font_size(photo.width()),
    };
    let font = fonts.resolve(font_size).into_font();
    debug!(
        "Stamping {} with {} at {} (size {})",
        input_path.display(),
        capture_date,
        options.anchor,
        font_size
    );

    let stamped = draw_date_watermark(
        &photo.image,
        &capture_date,
        &font,
        options.color,
        options.anchor,
    );
    save_image(&stamped, output_path, options.jpeg_quality)?;

    Ok(Some(capture_date))
}

/// Encode by the output file's extension. JPEG drops alpha.
fn save_image(image: &DynamicImage, path: &Path, jpeg_quality: u8) -> Result<(), ProcessError> {
    let format = ImageFormat::from_path(path).map_err(ProcessError::Encode)?;

    if format == ImageFormat::Jpeg {
        let rgb_image = image.to_rgb8();
        let output = BufWriter::new(std::fs::File::create(path)?);
        let mut encoder = JpegEncoder::new_with_quality(output, jpeg_quality);
        encoder
            .encode_image(&rgb_image)
            .map_err(ProcessError::Encode)?;
        return Ok(());
    }

    image
        .save_with_format(path, format)
        .map_err(ProcessError::Encode)
}

/// Regular files in `dir` with a supported extension, sorted by name.
fn list_photos(dir: &Path) -> Result<Vec<(String, PathBuf)>, BatchError> {
    let read_error = |source| BatchError::ReadDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut photos = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let file_name = entry.file_name().to_string_lossy().into_owned();
        let path = entry.path();
        if is_supported_image(&file_name) && path.is_file() {
            photos.push((file_name, path));
        } else {
            debug!("Ignoring {}", path.display());
        }
    }

    photos.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(photos)
}
