use std::fmt;
use std::str::FromStr;
use serde::Deserialize;
use crate::bucketing::MAX_DAYS;
use crate::errors::LayoutError;
use crate::models::forecast::DaySummary;

/// Page margin on all sides
pub const MARGIN: f64 = 10.0;

/// Space reserved on the first page for the report header
pub const HEADER_HEIGHT: f64 = 22.0;

/// Space between two overview columns
const COLUMN_GAP: f64 = 3.0;

const COMPONENT: &str = "layout";

/// Available report layouts
#[derive(Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    Overview,
    Detailed,
    Compact,
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LayoutMode::Overview => write!(f, "overview"),
            LayoutMode::Detailed => write!(f, "detailed"),
            LayoutMode::Compact  => write!(f, "compact"),
        }
    }
}

impl FromStr for LayoutMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "overview" => Ok(LayoutMode::Overview),
            "detailed" => Ok(LayoutMode::Detailed),
            "compact"  => Ok(LayoutMode::Compact),
            _ => Err(format!("unknown layout mode '{}'", s)),
        }
    }
}

/// Size metrics of the blocks inside a day card
#[derive(Clone, Copy, Debug)]
pub struct CardMetrics {
    pub padding: f64,
    pub icon_height: f64,
    pub line_height: f64,
    pub text_lines: usize,
    pub row_height: f64,
    pub gap: f64,
}

impl CardMetrics {
    pub fn text_height(&self) -> f64 {
        self.text_lines as f64 * self.line_height
    }

    /// A card must at least fit its icon
    pub fn min_card_width(&self) -> f64 {
        2.0 * self.padding + self.icon_height
    }
}

impl LayoutMode {
    pub fn metrics(&self) -> CardMetrics {
        match self {
            LayoutMode::Overview => CardMetrics {
                padding: 2.0, icon_height: 20.0, line_height: 5.0, text_lines: 9, row_height: 0.0, gap: COLUMN_GAP,
            },
            LayoutMode::Detailed => CardMetrics {
                padding: 2.0, icon_height: 16.0, line_height: 5.5, text_lines: 4, row_height: 5.0, gap: 4.0,
            },
            LayoutMode::Compact => CardMetrics {
                padding: 1.5, icon_height: 10.0, line_height: 4.5, text_lines: 2, row_height: 3.5, gap: 2.0,
            },
        }
    }
}

/// A rectangle in page coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> LayoutRect {
        LayoutRect { x, y, width, height }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// True if the interiors of the two rectangles intersect, shared edges do not count
    #[cfg(test)]
    pub fn overlaps(&self, other: &LayoutRect) -> bool {
        self.x < other.right() && other.x < self.right() && self.y < other.bottom() && other.y < self.bottom()
    }

    #[cfg(test)]
    pub fn contains(&self, other: &LayoutRect) -> bool {
        other.x >= self.x && other.y >= self.y && other.right() <= self.right() && other.bottom() <= self.bottom()
    }
}

/// Where one day card (and its hourly table, if any) goes
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub card: LayoutRect,
    pub table: Option<LayoutRect>,
    pub page: usize,
    pub new_page: bool,
}

/// Computes placements for the day cards of a report.
///
/// Placement is a pure function of the canvas size, the mode and the summaries (number of days and
/// number of hourly rows). In stacked modes a card that does not fit on the rest of the page is
/// flagged with new_page and moved to the top of the next page, the caller is responsible for
/// actually starting that page.
///
/// # Arguments
///
/// * 'summaries' - up to five day summaries
/// * 'canvas_width' - page width
/// * 'canvas_height' - page height
/// * 'mode' - the layout strategy
pub fn arrange(summaries: &[DaySummary], canvas_width: f64, canvas_height: f64, mode: LayoutMode) -> Result<Vec<Placement>, LayoutError> {
    if summaries.len() > MAX_DAYS {
        return Err(LayoutError::new(COMPONENT, "too many days", format!("{} summaries, max {}", summaries.len(), MAX_DAYS)));
    }
    if !(canvas_width > 0.0 && canvas_height > 0.0) {
        return Err(LayoutError::new(COMPONENT, "non-positive canvas", format!("{} x {}", canvas_width, canvas_height)));
    }
    if canvas_width <= 2.0 * MARGIN || canvas_height <= 2.0 * MARGIN + HEADER_HEIGHT {
        return Err(LayoutError::new(COMPONENT, "canvas leaves no content area", format!("{} x {}", canvas_width, canvas_height)));
    }
    if summaries.is_empty() {
        return Ok(Vec::new());
    }

    let metrics = mode.metrics();
    let columns = match mode {
        LayoutMode::Overview => summaries.len(),
        LayoutMode::Detailed | LayoutMode::Compact => 1,
    };
    let card_width = (canvas_width - 2.0 * MARGIN - metrics.gap * (columns - 1) as f64) / columns as f64;
    if card_width < metrics.min_card_width() {
        return Err(LayoutError::new(COMPONENT, "canvas too narrow for cards",
            format!("{} mm wide, {} columns of at least {} mm", canvas_width, columns, metrics.min_card_width())));
    }

    let placements = match mode {
        LayoutMode::Overview => arrange_columns(summaries.len(), card_width, canvas_height, metrics),
        LayoutMode::Detailed | LayoutMode::Compact => arrange_stacked(summaries, card_width, canvas_height, metrics),
    };

    Ok(placements)
}

/// Equal width columns in one row below the header
///
/// # Arguments
///
/// * 'count' - number of columns
/// * 'width' - width of one column
/// * 'canvas_height' - page height
/// * 'metrics' - card metrics
fn arrange_columns(count: usize, width: f64, canvas_height: f64, metrics: CardMetrics) -> Vec<Placement> {
    let top = MARGIN + HEADER_HEIGHT;
    let wanted = 2.0 * metrics.padding + metrics.icon_height + metrics.text_height();
    let height = wanted.min(canvas_height - top - MARGIN);

    (0..count).map(|i| Placement {
        card: LayoutRect::new(MARGIN + i as f64 * (width + metrics.gap), top, width, height),
        table: None,
        page: 0,
        new_page: false,
    }).collect()
}

/// Full width cards stacked top to bottom, each with a nested hourly table below its text block
///
/// # Arguments
///
/// * 'summaries' - the day summaries
/// * 'width' - card width
/// * 'canvas_height' - page height
/// * 'metrics' - card metrics
fn arrange_stacked(summaries: &[DaySummary], width: f64, canvas_height: f64, metrics: CardMetrics) -> Vec<Placement> {
    let bottom_limit = canvas_height - MARGIN;

    let mut page = 0;
    let mut page_top = MARGIN + HEADER_HEIGHT;
    let mut cursor = page_top;
    let mut placements: Vec<Placement> = Vec::with_capacity(summaries.len());

    for summary in summaries {
        let table_height = (summary.hourly.len() + 1) as f64 * metrics.row_height;
        let height = 2.0 * metrics.padding + metrics.icon_height + metrics.text_height() + table_height;

        // A card taller than a whole page is placed at the top and allowed to overflow
        let mut new_page = false;
        if cursor + height > bottom_limit && cursor > page_top {
            page += 1;
            page_top = MARGIN;
            cursor = page_top;
            new_page = true;
        }

        let card = LayoutRect::new(MARGIN, cursor, width, height);
        let table = LayoutRect::new(
            MARGIN + metrics.padding,
            cursor + metrics.padding + metrics.icon_height + metrics.text_height(),
            width - 2.0 * metrics.padding,
            table_height,
        );

        placements.push(Placement { card, table: Some(table), page, new_page });
        cursor += height + metrics.gap;
    }

    placements
}
