//! Font lookup for the date text.
//!
//! A [`FontResolver`] walks an ordered list of font file names through a set
//! of search directories. The first candidate that exists and parses wins.
//! When nothing loads, the built-in [`BitmapFont`] is used instead and the
//! requested pixel size is ignored.

mod bitmap;

pub use bitmap::{BitmapFont, FIXED_SCALE};

use ab_glyph::{FontArc, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Font files tried in order, covering common Linux, Windows and macOS fonts.
pub const DEFAULT_FONT_CANDIDATES: &[&str] = &[
    "DejaVuSans.ttf",
    "FreeSans.ttf",
    "arial.ttf",
    "Helvetica.ttf",
];

/// Directories searched (recursively) for the candidate font files.
pub fn default_search_directories() -> Vec<PathBuf> {
    let mut dirs = vec![
        PathBuf::from("/usr/share/fonts"),
        PathBuf::from("/usr/local/share/fonts"),
        PathBuf::from("/Library/Fonts"),
        PathBuf::from("/System/Library/Fonts"),
    ];

    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join(".fonts"));
        dirs.push(home.join(".local/share/fonts"));
        dirs.push(home.join("Library/Fonts"));
    }

    if let Some(windir) = std::env::var_os("WINDIR") {
        dirs.push(PathBuf::from(windir).join("Fonts"));
    } else {
        dirs.push(PathBuf::from("C:\\Windows\\Fonts"));
    }

    dirs
}

/// A font ready to measure and draw the watermark text.
#[derive(Clone)]
pub enum WatermarkFont {
    Scalable { font: FontArc, scale: PxScale },
    Bitmap(BitmapFont),
}

impl WatermarkFont {
    /// Width and height of `text` in pixels.
    pub fn text_size(&self, text: &str) -> (u32, u32) {
        match self {
            WatermarkFont::Scalable { font, scale } => text_size(*scale, font, text),
            WatermarkFont::Bitmap(bitmap) => bitmap.text_size(text),
        }
    }

    pub fn draw(&self, canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, text: &str) {
        match self {
            WatermarkFont::Scalable { font, scale } => {
                draw_text_mut(canvas, color, x, y, *scale, font, text)
            }
            WatermarkFont::Bitmap(bitmap) => bitmap.draw(canvas, color, x, y, text),
        }
    }
}

impl std::fmt::Debug for WatermarkFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatermarkFont::Scalable { scale, .. } => f
                .debug_struct("Scalable")
                .field("scale", &scale.y)
                .finish_non_exhaustive(),
            WatermarkFont::Bitmap(bitmap) => f.debug_tuple("Bitmap").field(bitmap).finish(),
        }
    }
}

/// Result of a font lookup.
#[derive(Debug, Clone)]
pub enum FontResolution {
    Resolved {
        name: String,
        path: PathBuf,
        font: WatermarkFont,
    },
    FellBackToDefault(WatermarkFont),
}

impl FontResolution {
    pub fn is_fallback(&self) -> bool {
        matches!(self, FontResolution::FellBackToDefault(_))
    }

    pub fn font(&self) -> &WatermarkFont {
        match self {
            FontResolution::Resolved { font, .. } | FontResolution::FellBackToDefault(font) => font,
        }
    }

    pub fn into_font(self) -> WatermarkFont {
        match self {
            FontResolution::Resolved { font, .. } | FontResolution::FellBackToDefault(font) => font,
        }
    }
}

#[derive(Clone)]
struct LocatedFont {
    name: String,
    path: PathBuf,
    font: FontArc,
}

pub struct FontResolver {
    candidates: Vec<String>,
    search_directories: Vec<PathBuf>,
    // The search runs once per resolver; sizes are applied per call.
    located: OnceCell<Option<LocatedFont>>,
}

impl Default for FontResolver {
    fn default() -> Self {
        Self::new(
            DEFAULT_FONT_CANDIDATES.iter().map(|s| s.to_string()).collect(),
            default_search_directories(),
        )
    }
}

impl FontResolver {
    pub fn new(candidates: Vec<String>, search_directories: Vec<PathBuf>) -> Self {
        Self {
            candidates,
            search_directories,
            located: OnceCell::new(),
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Font for drawing at `size_px` pixels, or the bitmap fallback.
    pub fn resolve(&self, size_px: u32) -> FontResolution {
        match self.located.get_or_init(|| self.locate()) {
            Some(located) => FontResolution::Resolved {
                name: located.name.clone(),
                path: located.path.clone(),
                font: WatermarkFont::Scalable {
                    font: located.font.clone(),
                    scale: PxScale::from(size_px.max(1) as f32),
                },
            },
            None => FontResolution::FellBackToDefault(WatermarkFont::Bitmap(BitmapFont::default())),
        }
    }

    fn locate(&self) -> Option<LocatedFont> {
        for name in &self.candidates {
            for path in self.find_candidate_files(name) {
                match load_font(&path) {
                    Ok(font) => {
                        info!("Using font: {} ({})", name, path.display());
                        return Some(LocatedFont {
                            name: name.clone(),
                            path,
                            font,
                        });
                    }
                    Err(e) => debug!("Skipping font {}: {}", path.display(), e),
                }
            }
        }

        warn!(
            "Could not find any of the fonts {:?}; falling back to the built-in bitmap font. \
             Watermark size may not be as expected.",
            self.candidates
        );
        None
    }

    /// Files that could satisfy the candidate `name`, in search order.
    ///
    /// A name that is itself an existing file comes first, then every
    /// case-insensitive file name match under the search directories.
    pub(crate) fn find_candidate_files(&self, name: &str) -> Vec<PathBuf> {
        let mut found = Vec::new();

        let direct = Path::new(name);
        if direct.is_file() {
            found.push(direct.to_path_buf());
        }

        for dir in &self.search_directories {
            let matches = WalkDir::new(dir)
                .follow_links(true)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| {
                    entry.file_type().is_file()
                        && entry.file_name().to_string_lossy().eq_ignore_ascii_case(name)
                })
                .map(|entry| entry.into_path());
            found.extend(matches);
        }

        found
    }
}

fn load_font(path: &Path) -> Result<FontArc, Box<dyn std::error::Error>> {
    let data = std::fs::read(path)?;
    let font = FontArc::try_from_vec(data)?;
    Ok(font)
}
