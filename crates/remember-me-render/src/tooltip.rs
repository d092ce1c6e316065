//! Hover tooltip content and edge-aware placement.

use remember_me_core::PortraitRecord;
use serde::Serialize;

/// Horizontal gap between the pointer and the tooltip box.
const POINTER_OFFSET: f64 = 15.0;
/// The box is nudged up so the pointer sits near its first line.
const VERTICAL_NUDGE: f64 = 10.0;

/// What the tooltip shows for one portrait.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipContent {
    pub title: String,
    pub artist: String,
    pub sitter: String,
    /// `Year: 1795`.
    pub year_line: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl TooltipContent {
    pub fn for_record(record: &PortraitRecord) -> Self {
        fn or_placeholder(value: &str, placeholder: &str) -> String {
            let value = value.trim();
            if value.is_empty() {
                placeholder.to_string()
            } else {
                value.to_string()
            }
        }

        let thumbnail = record.thumbnail_url.trim();
        Self {
            title: or_placeholder(&record.title, "Untitled"),
            artist: or_placeholder(&record.artist, "Unknown Artist"),
            sitter: or_placeholder(&record.sitter, "Unknown Sitter"),
            year_line: match record.year {
                Some(year) => format!("Year: {year}"),
                None => "Year: unknown".to_string(),
            },
            thumbnail_url: (!thumbnail.is_empty()).then(|| thumbnail.to_string()),
        }
    }

    /// The text lines in display order.
    pub fn lines(&self) -> [&str; 4] {
        [&self.title, &self.artist, &self.sitter, &self.year_line]
    }

    /// Plain-text form, one line per field (used for SVG `<title>`).
    pub fn to_plain_text(&self) -> String {
        self.lines().join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipSide {
    Left,
    Right,
}

/// Page coordinates of the tooltip's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TooltipPlacement {
    pub left: f64,
    pub top: f64,
    pub side: TooltipSide,
}

/// Positions a tooltip of `tooltip_size` next to `pointer` (viewport coordinates).
///
/// The box goes left of the pointer only when the right side cannot fit it plus
/// `edge_padding` and the left side has more room. Vertically it follows the pointer, clamped
/// below the top padding and flipped above the pointer near the bottom edge.
pub fn place_tooltip(
    pointer: (f64, f64),
    tooltip_size: (f64, f64),
    viewport: (f64, f64),
    scroll_y: f64,
    edge_padding: f64,
) -> TooltipPlacement {
    let (px, py) = pointer;
    let (width, height) = tooltip_size;
    let (viewport_width, viewport_height) = viewport;

    let space_right = viewport_width - px;
    let space_left = px;
    let side = if space_right < width + edge_padding && space_left > space_right {
        TooltipSide::Left
    } else {
        TooltipSide::Right
    };
    let left = match side {
        TooltipSide::Left => px - width - POINTER_OFFSET,
        TooltipSide::Right => px + POINTER_OFFSET,
    };

    let mut top = py - VERTICAL_NUDGE + scroll_y;
    if py - VERTICAL_NUDGE < edge_padding {
        top = edge_padding + scroll_y;
    }
    // The bottom check wins when both apply (very short viewports).
    if py + height > viewport_height - edge_padding {
        top = py - height + VERTICAL_NUDGE + scroll_y;
    }

    TooltipPlacement { left, top, side }
}
