pub mod svg;
#[cfg(test)]
pub mod recording;

use std::path::Path;
use crate::banding::Color;
use crate::errors::CanvasError;

/// Millimeters per typographic point
pub const PT_TO_MM: f64 = 0.3528;

/// Font weight
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

/// Horizontal text alignment relative to the cursor x
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// A paginated drawing surface. Coordinates are page relative with y growing downwards,
/// text is drawn with its baseline at the cursor. Images are taken into the document when drawn,
/// so the saved output does not depend on the image files.
pub trait Canvas {
    fn set_cursor(&mut self, x: f64, y: f64);
    fn current_cursor(&self) -> (f64, f64);
    fn draw_text(&mut self, text: &str, font: &str, size: f64, style: FontStyle, align: Align);
    fn draw_image(&mut self, path: &Path, x: f64, y: f64, w: f64, h: f64) -> Result<(), CanvasError>;
    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64);
    fn draw_filled_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color);
    fn start_new_page(&mut self);
    fn page_width(&self) -> f64;
    fn page_height(&self) -> f64;
    fn save(&self, output_path: &Path) -> Result<(), CanvasError>;
}
