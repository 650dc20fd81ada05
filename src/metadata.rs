use image::{DynamicImage, ImageDecoder, ImageReader};
use std::io::Cursor;
use tracing::{debug, trace};

/// A decoded photo together with the EXIF block found in its source bytes.
pub struct Photo {
    pub image: DynamicImage,
    pub exif: Option<rexif::ExifData>,
}

impl Photo {
    /// Decode `bytes` and parse whatever EXIF they carry.
    ///
    /// The decoder's own EXIF block is tried first, which covers containers
    /// such as PNG `eXIf` chunks. Otherwise the whole file is handed to rexif.
    pub fn decode(bytes: &[u8]) -> Result<Self, image::ImageError> {
        let mut decoder = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .into_decoder()?;

        let embedded = decoder.exif_metadata().unwrap_or_else(|e| {
            trace!("Decoder could not read EXIF: {}", e);
            None
        });
        let image = DynamicImage::from_decoder(decoder)?;

        let exif = embedded
            .as_deref()
            .and_then(parse_exif)
            .or_else(|| parse_exif(bytes));
        Ok(Self { image, exif })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Parse a JPEG, a TIFF file or a bare TIFF-headed EXIF block.
fn parse_exif(data: &[u8]) -> Option<rexif::ExifData> {
    let data = data.strip_prefix(b"Exif\0\0").unwrap_or(data);
    let (result, warnings) = rexif::parse_buffer_quiet(data);
    for warning in warnings {
        trace!("EXIF: {}", warning);
    }

    match result {
        Ok(exif) => Some(exif),
        Err(e) => {
            trace!("No EXIF data: {}", e);
            None
        }
    }
}

/// The date the photo was taken, as `YYYY-MM-DD`.
///
/// Only `DateTimeOriginal` is consulted. Missing EXIF, a missing tag or an
/// empty value all yield `None`.
pub fn extract_capture_date(photo: &Photo) -> Option<String> {
    let exif = photo.exif.as_ref()?;
    let entry = exif
        .entries
        .iter()
        .find(|e| e.tag == rexif::ExifTag::DateTimeOriginal)?;

    let raw = match &entry.value {
        rexif::TagValue::Ascii(s) => s.as_str(),
        _ => &*entry.value_more_readable,
    };

    let date = capture_date_from_exif_value(raw);
    debug!("DateTimeOriginal {:?} -> {:?}", raw, date);
    date
}

/// Turn an EXIF datetime (`"2005:07:30 07:22:46"`) into `"2005-07-30"`.
///
/// The value is not validated; anything before the first space has its
/// colons replaced and is returned as-is.
pub fn capture_date_from_exif_value(raw: &str) -> Option<String> {
    let raw = raw.trim_end_matches('\0').trim();
    let date_part = raw.split(' ').next()?;
    if date_part.is_empty() {
        return None;
    }
    Some(date_part.replace(':', "-"))
}
