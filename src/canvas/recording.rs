use std::path::{Path, PathBuf};
use crate::banding::Color;
use crate::canvas::{Align, Canvas, FontStyle};
use crate::errors::CanvasError;

/// One recorded drawing call
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Text { text: String, x: f64, y: f64, size: f64, style: FontStyle, align: Align },
    Image { path: PathBuf, x: f64, y: f64, w: f64, h: f64 },
    Line { x1: f64, y1: f64, x2: f64, y2: f64 },
    Rect { x: f64, y: f64, w: f64, h: f64, color: Color },
    NewPage,
}

/// Canvas keeping every call in order, used to assert on rendering output
pub struct RecordingCanvas {
    pub width: f64,
    pub height: f64,
    pub calls: Vec<Call>,
    cursor: (f64, f64),
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> RecordingCanvas {
        RecordingCanvas { width, height, calls: Vec::new(), cursor: (0.0, 0.0) }
    }

    pub fn texts(&self) -> Vec<&str> {
        self.calls.iter().filter_map(|c| match c {
            Call::Text { text, .. } => Some(text.as_str()),
            _ => None,
        }).collect()
    }

    pub fn count_pages(&self) -> usize {
        1 + self.calls.iter().filter(|c| **c == Call::NewPage).count()
    }
}

impl Canvas for RecordingCanvas {
    fn set_cursor(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
    }

    fn current_cursor(&self) -> (f64, f64) {
        self.cursor
    }

    fn draw_text(&mut self, text: &str, _font: &str, size: f64, style: FontStyle, align: Align) {
        let (x, y) = self.cursor;
        self.calls.push(Call::Text { text: text.to_string(), x, y, size, style, align });
    }

    fn draw_image(&mut self, path: &Path, x: f64, y: f64, w: f64, h: f64) -> Result<(), CanvasError> {
        self.calls.push(Call::Image { path: path.to_path_buf(), x, y, w, h });
        Ok(())
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, _stroke_width: f64) {
        self.calls.push(Call::Line { x1, y1, x2, y2 });
    }

    fn draw_filled_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        self.calls.push(Call::Rect { x, y, w, h, color });
    }

    fn start_new_page(&mut self) {
        self.calls.push(Call::NewPage);
        self.cursor = (0.0, 0.0);
    }

    fn page_width(&self) -> f64 {
        self.width
    }

    fn page_height(&self) -> f64 {
        self.height
    }

    fn save(&self, _output_path: &Path) -> Result<(), CanvasError> {
        Ok(())
    }
}
