use std::fs;
use std::path::Path;
use base64::{engine::general_purpose, Engine as _};
use quick_xml::escape::escape;
use crate::banding::Color;
use crate::canvas::{Align, Canvas, FontStyle, PT_TO_MM};
use crate::errors::CanvasError;

const COMPONENT: &str = "svg";

/// Vertical space between pages in the output document
const PAGE_GAP: f64 = 10.0;

/// Canvas writing a single SVG document. Every page is its own nested viewport of page size,
/// so content never bleeds into the next page, and images are embedded as data URIs.
/// Page units are millimeters, font sizes are given in points.
pub struct SvgCanvas {
    width: f64,
    height: f64,
    cursor: (f64, f64),
    pages: Vec<String>,
}

impl SvgCanvas {
    /// Returns a new canvas with one empty page
    ///
    /// # Arguments
    ///
    /// * 'width' - page width in millimeters
    /// * 'height' - page height in millimeters
    pub fn new(width: f64, height: f64) -> SvgCanvas {
        SvgCanvas { width, height, cursor: (0.0, 0.0), pages: vec![String::new()] }
    }

    #[cfg(test)]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page(&mut self) -> &mut String {
        if self.pages.is_empty() {
            self.pages.push(String::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Renders the full document
    pub fn to_svg(&self) -> String {
        let total_height = self.pages.len() as f64 * (self.height + PAGE_GAP) - PAGE_GAP;
        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{w}mm\" height=\"{h}mm\" viewBox=\"0 0 {w} {h}\">\n",
            w = self.width, h = total_height);

        for (i, page) in self.pages.iter().enumerate() {
            let offset = i as f64 * (self.height + PAGE_GAP);
            svg.push_str(&format!(
                "<svg id=\"page-{}\" x=\"0\" y=\"{:.2}\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" overflow=\"hidden\">\n",
                i + 1, offset, w = self.width, h = self.height));
            svg.push_str(&format!("<rect width=\"{}\" height=\"{}\" fill=\"#ffffff\" stroke=\"#cccccc\" stroke-width=\"0.2\"/>\n", self.width, self.height));
            svg.push_str(page);
            svg.push_str("</svg>\n");
        }
        svg.push_str("</svg>\n");

        svg
    }
}

/// Media type of an image file, judged from its extension
///
/// # Arguments
///
/// * 'path' - the image file
fn media_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif")                => "image/gif",
        Some("svg")                => "image/svg+xml",
        _                          => "image/png",
    }
}

impl Canvas for SvgCanvas {
    fn set_cursor(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
    }

    fn current_cursor(&self) -> (f64, f64) {
        self.cursor
    }

    fn draw_text(&mut self, text: &str, font: &str, size: f64, style: FontStyle, align: Align) {
        let (x, y) = self.cursor;
        let anchor = match align {
            Align::Left   => "start",
            Align::Center => "middle",
        };
        let style = match style {
            FontStyle::Regular => "",
            FontStyle::Bold    => " font-weight=\"bold\"",
        };
        let element = format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{:.2}\" text-anchor=\"{}\"{}>{}</text>\n",
            x, y, escape(font), size * PT_TO_MM, anchor, style, escape(text));
        self.page().push_str(&element);
    }

    fn draw_image(&mut self, path: &Path, x: f64, y: f64, w: f64, h: f64) -> Result<(), CanvasError> {
        let bytes = fs::read(path).map_err(|e| CanvasError {
            component: COMPONENT,
            reason: format!("can't embed image: {}", e),
            output: path.display().to_string(),
        })?;

        let element = format!(
            "<image x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" xlink:href=\"data:{};base64,{}\"/>\n",
            x, y, w, h, media_type(path), general_purpose::STANDARD.encode(&bytes));
        self.page().push_str(&element);

        Ok(())
    }

    fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64) {
        let element = format!(
            "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"#000000\" stroke-width=\"{:.2}\" stroke-linecap=\"round\"/>\n",
            x1, y1, x2, y2, stroke_width);
        self.page().push_str(&element);
    }

    fn draw_filled_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        let element = format!(
            "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\"/>\n",
            x, y, w, h, color);
        self.page().push_str(&element);
    }

    fn start_new_page(&mut self) {
        self.pages.push(String::new());
        self.cursor = (0.0, 0.0);
    }

    fn page_width(&self) -> f64 {
        self.width
    }

    fn page_height(&self) -> f64 {
        self.height
    }

    fn save(&self, output_path: &Path) -> Result<(), CanvasError> {
        fs::write(output_path, self.to_svg()).map_err(|e| CanvasError {
            component: COMPONENT,
            reason: e.to_string(),
            output: output_path.display().to_string(),
        })
    }
}
