//! Where the date text goes on the photo.
//!
//! Positions are named anchors relative to the image bounds. Every anchor
//! except `center` keeps the text `margin` pixels away from the edges it is
//! attached to; `center` ignores the margin entirely.

use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Dimensions of the photo being stamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Measured size of the rendered date text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextDimensions {
    pub width: u32,
    pub height: u32,
}

/// Top-left pixel of the text box. Negative when the text is larger than
/// the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub y: i32,
}

impl Placement {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
    Center,
}

impl Anchor {
    pub const ALL: [Anchor; 5] = [
        Anchor::TopLeft,
        Anchor::TopRight,
        Anchor::BottomLeft,
        Anchor::BottomRight,
        Anchor::Center,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Anchor::TopLeft => "top-left",
            Anchor::TopRight => "top-right",
            Anchor::BottomLeft => "bottom-left",
            Anchor::BottomRight => "bottom-right",
            Anchor::Center => "center",
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAnchor(pub String);

impl fmt::Display for UnknownAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown position '{}'", self.0)
    }
}

impl std::error::Error for UnknownAnchor {}

impl FromStr for Anchor {
    type Err = UnknownAnchor;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Anchor::ALL
            .into_iter()
            .find(|anchor| anchor.as_str() == lower)
            .ok_or_else(|| UnknownAnchor(s.to_string()))
    }
}

/// Outcome of turning a user-supplied position name into an [`Anchor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorSelection {
    Recognized(Anchor),
    /// The name was not one of the known anchors; bottom-right is used.
    Defaulted { requested: String },
}

impl AnchorSelection {
    pub fn anchor(&self) -> Anchor {
        match self {
            AnchorSelection::Recognized(anchor) => *anchor,
            AnchorSelection::Defaulted { .. } => Anchor::BottomRight,
        }
    }
}

/// Parse a position name, falling back to bottom-right with a warning.
pub fn select_anchor(name: &str) -> AnchorSelection {
    match name.parse::<Anchor>() {
        Ok(anchor) => AnchorSelection::Recognized(anchor),
        Err(_) => {
            warn!("Invalid position: {}. Using bottom-right.", name);
            AnchorSelection::Defaulted {
                requested: name.to_string(),
            }
        }
    }
}

/// Margin between the text and the image edges: one percent of the width.
pub fn margin_for_width(image_width: u32) -> u32 {
    image_width / 100
}

/// Compute where the text box's top-left corner goes for `anchor`.
pub fn compute_position(
    anchor: Anchor,
    image: ImageDimensions,
    text: TextDimensions,
    margin: u32,
) -> Placement {
    let img_w = image.width as i32;
    let img_h = image.height as i32;
    let txt_w = text.width as i32;
    let txt_h = text.height as i32;
    let m = margin as i32;

    match anchor {
        Anchor::TopLeft => Placement::new(m, m),
        Anchor::TopRight => Placement::new(img_w - txt_w - m, m),
        Anchor::BottomLeft => Placement::new(m, img_h - txt_h - m),
        Anchor::BottomRight => Placement::new(img_w - txt_w - m, img_h - txt_h - m),
        Anchor::Center => Placement::new((img_w - txt_w) / 2, (img_h - txt_h) / 2),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(w: u32, h: u32) -> ImageDimensions {
        ImageDimensions {
            width: w,
            height: h,
        }
    }

    fn text(w: u32, h: u32) -> TextDimensions {
        TextDimensions {
            width: w,
            height: h,
        }
    }

    #[test]
    fn test_compute_position_top_left() {
        let pos = compute_position(Anchor::TopLeft, image(800, 600), text(100, 50), 8);
        assert_eq!(pos, Placement::new(8, 8));
    }

    #[test]
    fn test_compute_position_top_right() {
        let pos = compute_position(Anchor::TopRight, image(800, 600), text(100, 50), 8);
        // 800 - 100 - 8 = 692
        assert_eq!(pos, Placement::new(692, 8));
    }

    #[test]
    fn test_compute_position_bottom_left() {
        let pos = compute_position(Anchor::BottomLeft, image(800, 600), text(100, 50), 8);
        // 600 - 50 - 8 = 542
        assert_eq!(pos, Placement::new(8, 542));
    }

    #[test]
    fn test_compute_position_bottom_right() {
        let pos = compute_position(Anchor::BottomRight, image(800, 600), text(100, 50), 8);
        assert_eq!(pos, Placement::new(692, 542));
    }

    #[test]
    fn test_compute_position_center_ignores_margin() {
        let pos = compute_position(Anchor::Center, image(800, 600), text(100, 50), 8);
        // (800 - 100) / 2 = 350, (600 - 50) / 2 = 275
        assert_eq!(pos, Placement::new(350, 275));

        let pos = compute_position(Anchor::Center, image(800, 600), text(100, 50), 40);
        assert_eq!(pos, Placement::new(350, 275));
    }

    #[test]
    fn test_center_truncates_odd_remainder() {
        let pos = compute_position(Anchor::Center, image(101, 51), text(10, 10), 1);
        assert_eq!(pos, Placement::new(45, 20));
    }

    #[test]
    fn test_text_larger_than_image_goes_negative() {
        let pos = compute_position(Anchor::BottomRight, image(50, 20), text(120, 30), 0);
        assert_eq!(pos, Placement::new(-70, -10));
    }

    #[test]
    fn test_all_anchors_stay_inside_margin() {
        let margin = 12;
        let txt = text(140, 36);
        // Smallest image that fits the text with a margin on both sides, and a larger one.
        for img in [
            image(2 * margin + txt.width, 2 * margin + txt.height),
            image(1920, 1080),
            image(333, 777),
        ] {
            for anchor in Anchor::ALL {
                let pos = compute_position(anchor, img, txt, margin);
                let m = margin as i32;
                assert!(pos.x >= m || anchor == Anchor::Center, "{anchor} x={}", pos.x);
                assert!(pos.y >= m || anchor == Anchor::Center, "{anchor} y={}", pos.y);
                assert!(pos.x >= 0 && pos.y >= 0, "{anchor} off the top-left edge");
                assert!(
                    pos.x + txt.width as i32 <= img.width as i32 - m || anchor == Anchor::Center,
                    "{anchor} overflows right edge"
                );
                assert!(
                    pos.y + txt.height as i32 <= img.height as i32 - m
                        || anchor == Anchor::Center,
                    "{anchor} overflows bottom edge"
                );
                assert!(pos.x + txt.width as i32 <= img.width as i32);
                assert!(pos.y + txt.height as i32 <= img.height as i32);
            }
        }
    }

    #[test]
    fn test_anchor_parse_is_case_insensitive() {
        assert_eq!("Top-Left".parse::<Anchor>().unwrap(), Anchor::TopLeft);
        assert_eq!("CENTER".parse::<Anchor>().unwrap(), Anchor::Center);
        assert_eq!(" bottom-left ".parse::<Anchor>().unwrap(), Anchor::BottomLeft);
        assert!("middle".parse::<Anchor>().is_err());
    }

    #[test]
    fn test_anchor_round_trips_through_display() {
        for anchor in Anchor::ALL {
            assert_eq!(anchor.to_string().parse::<Anchor>().unwrap(), anchor);
        }
    }

    #[test]
    fn test_select_anchor_unknown_falls_back_to_bottom_right() {
        let selection = select_anchor("diagonal");
        assert_eq!(
            selection,
            AnchorSelection::Defaulted {
                requested: "diagonal".to_string()
            }
        );
        assert_eq!(selection.anchor(), Anchor::BottomRight);

        let img = image(640, 480);
        let txt = text(90, 20);
        assert_eq!(
            compute_position(selection.anchor(), img, txt, 6),
            compute_position(Anchor::BottomRight, img, txt, 6)
        );
    }

    #[test]
    fn test_select_anchor_recognized() {
        assert_eq!(
            select_anchor("top-right"),
            AnchorSelection::Recognized(Anchor::TopRight)
        );
    }

    #[test]
    fn test_margin_is_one_percent_of_width() {
        assert_eq!(margin_for_width(4000), 40);
        assert_eq!(margin_for_width(1999), 19);
        assert_eq!(margin_for_width(99), 0);
    }
}
