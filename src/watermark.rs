use crate::fonts::WatermarkFont;
use crate::placement::{
    Anchor, ImageDimensions, Placement, TextDimensions, compute_position, margin_for_width,
};
use image::{DynamicImage, Rgba, RgbaImage};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WatermarkError {
    #[error(
        "Invalid color '{0}': expected a CSS color name, 'auto', #RGB/#RGBA/#RRGGBB/#RRGGBBAA, \
         rgb(), rgba() or hsl()"
    )]
    InvalidColor(String),
}

/// CSS named colors.
#[rustfmt::skip]
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("aliceblue",            [240, 248, 255]),
    ("antiquewhite",         [250, 235, 215]),
    ("aqua",                 [0, 255, 255]),
    ("aquamarine",           [127, 255, 212]),
    ("azure",                [240, 255, 255]),
    ("beige",                [245, 245, 220]),
    ("bisque",               [255, 228, 196]),
    ("black",                [0, 0, 0]),
    ("blanchedalmond",       [255, 235, 205]),
    ("blue",                 [0, 0, 255]),
    ("blueviolet",           [138, 43, 226]),
    ("brown",                [165, 42, 42]),
    ("burlywood",            [222, 184, 135]),
    ("cadetblue",            [95, 158, 160]),
    ("chartreuse",           [127, 255, 0]),
    ("chocolate",            [210, 105, 30]),
    ("coral",                [255, 127, 80]),
    ("cornflowerblue",       [100, 149, 237]),
    ("cornsilk",             [255, 248, 220]),
    ("crimson",              [220, 20, 60]),
    ("cyan",                 [0, 255, 255]),
    ("darkblue",             [0, 0, 139]),
    ("darkcyan",             [0, 139, 139]),
    ("darkgoldenrod",        [184, 134, 11]),
    ("darkgray",             [169, 169, 169]),
    ("darkgreen",            [0, 100, 0]),
    ("darkgrey",             [169, 169, 169]),
    ("darkkhaki",            [189, 183, 107]),
    ("darkmagenta",          [139, 0, 139]),
    ("darkolivegreen",       [85, 107, 47]),
    ("darkorange",           [255, 140, 0]),
    ("darkorchid",           [153, 50, 204]),
    ("darkred",              [139, 0, 0]),
    ("darksalmon",           [233, 150, 122]),
    ("darkseagreen",         [143, 188, 143]),
    ("darkslateblue",        [72, 61, 139]),
    ("darkslategray",        [47, 79, 79]),
    ("darkslategrey",        [47, 79, 79]),
    ("darkturquoise",        [0, 206, 209]),
    ("darkviolet",           [148, 0, 211]),
    ("deeppink",             [255, 20, 147]),
    ("deepskyblue",          [0, 191, 255]),
    ("dimgray",              [105, 105, 105]),
    ("dimgrey",              [105, 105, 105]),
    ("dodgerblue",           [30, 144, 255]),
    ("firebrick",            [178, 34, 34]),
    ("floralwhite",          [255, 250, 240]),
    ("forestgreen",          [34, 139, 34]),
    ("fuchsia",              [255, 0, 255]),
    ("gainsboro",            [220, 220, 220]),
    ("ghostwhite",           [248, 248, 255]),
    ("gold",                 [255, 215, 0]),
    ("goldenrod",            [218, 165, 32]),
    ("gray",                 [128, 128, 128]),
    ("grey",                 [128, 128, 128]),
    ("green",                [0, 128, 0]),
    ("greenyellow",          [173, 255, 47]),
    ("honeydew",             [240, 255, 240]),
    ("hotpink",              [255, 105, 180]),
    ("indianred",            [205, 92, 92]),
    ("indigo",               [75, 0, 130]),
    ("ivory",                [255, 255, 240]),
    ("khaki",                [240, 230, 140]),
    ("lavender",             [230, 230, 250]),
    ("lavenderblush",        [255, 240, 245]),
    ("lawngreen",            [124, 252, 0]),
    ("lemonchiffon",         [255, 250, 205]),
    ("lightblue",            [173, 216, 230]),
    ("lightcoral",           [240, 128, 128]),
    ("lightcyan",            [224, 255, 255]),
    ("lightgoldenrodyellow", [250, 250, 210]),
    ("lightgray",            [211, 211, 211]),
    ("lightgreen",           [144, 238, 144]),
    ("lightgrey",            [211, 211, 211]),
    ("lightpink",            [255, 182, 193]),
    ("lightsalmon",          [255, 160, 122]),
    ("lightseagreen",        [32, 178, 170]),
    ("lightskyblue",         [135, 206, 250]),
    ("lightslategray",       [119, 136, 153]),
    ("lightslategrey",       [119, 136, 153]),
    ("lightsteelblue",       [176, 196, 222]),
    ("lightyellow",          [255, 255, 224]),
    ("lime",                 [0, 255, 0]),
    ("limegreen",            [50, 205, 50]),
    ("linen",                [250, 240, 230]),
    ("magenta",              [255, 0, 255]),
    ("maroon",               [128, 0, 0]),
    ("mediumaquamarine",     [102, 205, 170]),
    ("mediumblue",           [0, 0, 205]),
    ("mediumorchid",         [186, 85, 211]),
    ("mediumpurple",         [147, 112, 219]),
    ("mediumseagreen",       [60, 179, 113]),
    ("mediumslateblue",      [123, 104, 238]),
    ("mediumspringgreen",    [0, 250, 154]),
    ("mediumturquoise",      [72, 209, 204]),
    ("mediumvioletred",      [199, 21, 133]),
    ("midnightblue",         [25, 25, 112]),
    ("mintcream",            [245, 255, 250]),
    ("mistyrose",            [255, 228, 225]),
    ("moccasin",             [255, 228, 181]),
    ("navajowhite",          [255, 222, 173]),
    ("navy",                 [0, 0, 128]),
    ("oldlace",              [253, 245, 230]),
    ("olive",                [128, 128, 0]),
    ("olivedrab",            [107, 142, 35]),
    ("orange",               [255, 165, 0]),
    ("orangered",            [255, 69, 0]),
    ("orchid",               [218, 112, 214]),
    ("palegoldenrod",        [238, 232, 170]),
    ("palegreen",            [152, 251, 152]),
    ("paleturquoise",        [175, 238, 238]),
    ("palevioletred",        [219, 112, 147]),
    ("papayawhip",           [255, 239, 213]),
    ("peachpuff",            [255, 218, 185]),
    ("peru",                 [205, 133, 63]),
    ("pink",                 [255, 192, 203]),
    ("plum",                 [221, 160, 221]),
    ("powderblue",           [176, 224, 230]),
    ("purple",               [128, 0, 128]),
    ("rebeccapurple",        [102, 51, 153]),
    ("red",                  [255, 0, 0]),
    ("rosybrown",            [188, 143, 143]),
    ("royalblue",            [65, 105, 225]),
    ("saddlebrown",          [139, 69, 19]),
    ("salmon",               [250, 128, 114]),
    ("sandybrown",           [244, 164, 96]),
    ("seagreen",             [46, 139, 87]),
    ("seashell",             [255, 245, 238]),
    ("sienna",               [160, 82, 45]),
    ("silver",               [192, 192, 192]),
    ("skyblue",              [135, 206, 235]),
    ("slateblue",            [106, 90, 205]),
    ("slategray",            [112, 128, 144]),
    ("slategrey",            [112, 128, 144]),
    ("snow",                 [255, 250, 250]),
    ("springgreen",          [0, 255, 127]),
    ("steelblue",            [70, 130, 180]),
    ("tan",                  [210, 180, 140]),
    ("teal",                 [0, 128, 128]),
    ("thistle",              [216, 191, 216]),
    ("tomato",               [255, 99, 71]),
    ("turquoise",            [64, 224, 208]),
    ("violet",               [238, 130, 238]),
    ("wheat",                [245, 222, 179]),
    ("white",                [255, 255, 255]),
    ("whitesmoke",           [245, 245, 245]),
    ("yellow",               [255, 255, 0]),
    ("yellowgreen",          [154, 205, 50]),
];

/// Color of the date text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextColor {
    Fixed(Rgba<u8>),
    /// Black or white, whichever contrasts with the pixels under the text.
    Auto,
}

impl Default for TextColor {
    fn default() -> Self {
        TextColor::Fixed(Rgba([255, 255, 255, 255]))
    }
}

impl TextColor {
    pub fn parse(value: &str) -> Result<Self, WatermarkError> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("auto") {
            return Ok(TextColor::Auto);
        }
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex)
                .map(TextColor::Fixed)
                .ok_or_else(|| WatermarkError::InvalidColor(value.to_string()));
        }

        let lower = trimmed.to_lowercase();
        let parsed = if lower.contains('(') {
            parse_function(&lower)
        } else {
            NAMED_COLORS
                .iter()
                .find(|(name, _)| *name == lower)
                .map(|(_, [r, g, b])| Rgba([*r, *g, *b, 255]))
        };

        parsed
            .map(TextColor::Fixed)
            .ok_or_else(|| WatermarkError::InvalidColor(value.to_string()))
    }
}

impl FromStr for TextColor {
    type Err = WatermarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TextColor::parse(s)
    }
}

impl fmt::Display for TextColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextColor::Auto => f.write_str("auto"),
            TextColor::Fixed(Rgba([r, g, b, a])) => {
                write!(f, "#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
            }
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok();
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        // #RGB / #RGBA: each digit is doubled, 0xF -> 0xFF
        3 => Some(Rgba([digit(0)? * 17, digit(1)? * 17, digit(2)? * 17, 255])),
        4 => Some(Rgba([
            digit(0)? * 17,
            digit(1)? * 17,
            digit(2)? * 17,
            digit(3)? * 17,
        ])),
        6 => Some(Rgba([pair(0)?, pair(2)?, pair(4)?, 255])),
        8 => Some(Rgba([pair(0)?, pair(2)?, pair(4)?, pair(6)?])),
        _ => None,
    }
}

/// `rgb(r, g, b)`, `rgba(r, g, b, a)` and `hsl(h, s%, l%)`.
fn parse_function(value: &str) -> Option<Rgba<u8>> {
    let (name, rest) = value.split_once('(')?;
    let args: Vec<&str> = rest.strip_suffix(')')?.split(',').map(str::trim).collect();

    match (name.trim(), args.as_slice()) {
        ("rgb", [r, g, b]) => Some(Rgba([channel(r)?, channel(g)?, channel(b)?, 255])),
        ("rgba", [r, g, b, a]) => Some(Rgba([channel(r)?, channel(g)?, channel(b)?, channel(a)?])),
        ("hsl", [h, s, l]) => {
            let hue: f32 = h.parse().ok()?;
            if !hue.is_finite() {
                return None;
            }
            Some(hsl_to_rgb(hue, percent(s)?, percent(l)?))
        }
        _ => None,
    }
}

/// A channel as `0..=255` or as a percentage of 255.
fn channel(value: &str) -> Option<u8> {
    match value.strip_suffix('%') {
        Some(_) => percent(value).map(|p| (p * 255.0).round() as u8),
        None => value.parse().ok(),
    }
}

/// `"40%"` as `0.4`.
fn percent(value: &str) -> Option<f32> {
    let number: f32 = value.strip_suffix('%')?.trim().parse().ok()?;
    (0.0..=100.0).contains(&number).then_some(number / 100.0)
}

fn hsl_to_rgb(hue: f32, saturation: f32, lightness: f32) -> Rgba<u8> {
    let chroma = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let sector = hue.rem_euclid(360.0) / 60.0;
    let x = chroma * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = lightness - chroma / 2.0;
    let to_u8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba([to_u8(r), to_u8(g), to_u8(b), 255])
}

/// Draw `text` onto `image` at `anchor`, returning the stamped image.
///
/// The result keeps an alpha channel only if the source had one.
pub fn draw_date_watermark(
    image: &DynamicImage,
    text: &str,
    font: &WatermarkFont,
    color: TextColor,
    anchor: Anchor,
) -> DynamicImage {
    let mut rgba_image = image.to_rgba8();

    let (text_width, text_height) = font.text_size(text);
    let dimensions = ImageDimensions {
        width: rgba_image.width(),
        height: rgba_image.height(),
    };
    let margin = margin_for_width(dimensions.width);
    let position = compute_position(
        anchor,
        dimensions,
        TextDimensions {
            width: text_width,
            height: text_height,
        },
        margin,
    );

    let fill = match color {
        TextColor::Fixed(rgba) => rgba,
        TextColor::Auto => determine_text_color(&rgba_image, position, text_width, text_height),
    };

    font.draw(&mut rgba_image, fill, position.x, position.y, text);

    if image.color().has_alpha() {
        DynamicImage::ImageRgba8(rgba_image)
    } else {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(rgba_image).to_rgb8())
    }
}

/// Determine whether to use black or white text based on the background
fn determine_text_color(
    image: &RgbaImage,
    position: Placement,
    width: u32,
    height: u32,
) -> Rgba<u8> {
    let mut total_luminance = 0.0;
    let mut pixel_count = 0;

    // Only the part of the text box that lies on the image is sampled
    let x_start = position.x.max(0) as u32;
    let y_start = position.y.max(0) as u32;
    let x_end = (position.x + width as i32).clamp(0, image.width() as i32) as u32;
    let y_end = (position.y + height as i32).clamp(0, image.height() as i32) as u32;

    for py in y_start..y_end {
        for px in x_start..x_end {
            let pixel = image.get_pixel(px, py);
            // Relative luminance per WCAG
            let luminance = 0.2126 * linearize(pixel[0])
                + 0.7152 * linearize(pixel[1])
                + 0.0722 * linearize(pixel[2]);
            total_luminance += luminance;
            pixel_count += 1;
        }
    }

    if pixel_count == 0 {
        return Rgba([255, 255, 255, 255]);
    }

    let average_luminance = total_luminance / pixel_count as f32;

    if average_luminance < 0.5 {
        Rgba([255, 255, 255, 255])
    } else {
        Rgba([0, 0, 0, 255])
    }
}

fn linearize(channel: u8) -> f32 {
    let c = channel as f32 / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
