use chrono::DateTime;
use log::warn;
use crate::aggregation::round_half_away;
use crate::banding::{BandTable, Color, UNAVAILABLE};
use crate::canvas::{Align, Canvas, FontStyle, PT_TO_MM};
use crate::errors::LayoutError;
use crate::geometry::compute_arrow;
use crate::layout::{arrange, LayoutMode, LayoutRect, Placement, HEADER_HEIGHT, MARGIN};
use crate::locale::Locale;
use crate::manager_icons::IconResolver;
use crate::models::forecast::{DaySummary, ForecastSample};

const FONT: &str = "Helvetica";
const CARD_BACKGROUND: Color = Color::rgb(0xf2, 0xf4, 0xf7);
const PLACEHOLDER: Color = Color::rgb(0xd0, 0xd0, 0xd0);
const STROKE: f64 = 0.25;
const SWATCH: f64 = 3.5;

/// Average Helvetica glyph width relative to the font size
const GLYPH_WIDTH_EM: f64 = 0.55;

/// Counts of what was drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderStats {
    pub days: usize,
    pub pages: usize,
    pub icon_placeholders: usize,
}

/// Issues the drawing calls of a report. The renderer only holds configuration, the cursor lives
/// on the canvas.
pub struct ReportRenderer<'a> {
    city: String,
    locale: Locale,
    mode: LayoutMode,
    uv_table: &'a BandTable,
    precip_table: &'a BandTable,
    icons: &'a dyn IconResolver,
}

impl<'a> ReportRenderer<'a> {
    /// Returns a new renderer
    ///
    /// # Arguments
    ///
    /// * 'city' - city name shown in the header
    /// * 'locale' - locale for captions
    /// * 'mode' - layout strategy
    /// * 'uv_table' - band table for the UV index
    /// * 'precip_table' - band table for precipitation probability in percent
    /// * 'icons' - icon resolver
    pub fn new(
        city: &str,
        locale: Locale,
        mode: LayoutMode,
        uv_table: &'a BandTable,
        precip_table: &'a BandTable,
        icons: &'a dyn IconResolver) -> ReportRenderer<'a> {

        ReportRenderer { city: city.to_string(), locale, mode, uv_table, precip_table, icons }
    }

    /// Renders header and day cards onto the canvas
    ///
    /// # Arguments
    ///
    /// * 'canvas' - the canvas to draw on
    /// * 'summaries' - day summaries ordered by date
    /// * 'uv' - the report's UV reading, if any
    /// * 'hourly_detail' - whether to draw hourly tables in stacked modes
    pub fn render(&self, canvas: &mut dyn Canvas, summaries: &[DaySummary], uv: Option<f64>, hourly_detail: bool) -> Result<RenderStats, LayoutError> {
        let placements = arrange(summaries, canvas.page_width(), canvas.page_height(), self.mode)?;

        self.draw_header(canvas, uv);

        let mut stats = RenderStats { days: 0, pages: 1, icon_placeholders: 0 };
        for (summary, placement) in summaries.iter().zip(placements.iter()) {
            if placement.new_page {
                canvas.start_new_page();
                stats.pages += 1;
            }

            if !self.draw_card(canvas, summary, placement) {
                stats.icon_placeholders += 1;
            }

            if hourly_detail {
                if let Some(table) = placement.table {
                    self.draw_table(canvas, summary, &table);
                }
            }
            stats.days += 1;
        }

        Ok(stats)
    }

    /// Draws title and the UV line
    ///
    /// # Arguments
    ///
    /// * 'canvas' - the canvas to draw on
    /// * 'uv' - the UV reading
    fn draw_header(&self, canvas: &mut dyn Canvas, uv: Option<f64>) {
        let captions = self.locale.captions();

        canvas.set_cursor(MARGIN, MARGIN + 7.0);
        canvas.draw_text(&format!("{}: {}", captions.title, self.city), FONT, 16.0, FontStyle::Bold, Align::Left);

        let band = self.uv_table.classify(uv);
        let uv_line_y = MARGIN + HEADER_HEIGHT - 6.0;
        canvas.draw_filled_rect(MARGIN, uv_line_y - SWATCH, SWATCH, SWATCH, band.color);
        canvas.set_cursor(MARGIN + SWATCH + 2.0, uv_line_y);
        let text = match uv {
            Some(v) if !v.is_nan() => format!("{}: {:.1} ({})", captions.uv, v, band.label),
            _ => format!("{}: {}", captions.uv, UNAVAILABLE),
        };
        canvas.draw_text(&text, FONT, 10.0, FontStyle::Regular, Align::Left);
    }

    /// Draws one day card, returns false if the icon had to be replaced by a placeholder
    ///
    /// # Arguments
    ///
    /// * 'canvas' - the canvas to draw on
    /// * 'summary' - the day to draw
    /// * 'placement' - where to draw it
    fn draw_card(&self, canvas: &mut dyn Canvas, summary: &DaySummary, placement: &Placement) -> bool {
        let card = placement.card;
        let metrics = self.mode.metrics();
        let font_size = if self.mode == LayoutMode::Detailed { 9.0 } else { 7.5 };

        canvas.draw_filled_rect(card.x, card.y, card.width, card.height, CARD_BACKGROUND);

        let icon_size = metrics.icon_height;
        let icon_x = match self.mode {
            LayoutMode::Overview => card.x + (card.width - icon_size) / 2.0,
            _ => card.x + metrics.padding,
        };
        let icon_ok = self.draw_icon(canvas, &summary.modal_icon_id, icon_x, card.y + metrics.padding, icon_size);

        let lines = card_lines(summary, self.mode, self.locale);
        let text_top = card.y + metrics.padding + metrics.icon_height;
        let text_x = card.x + metrics.padding;
        let text_width = card.width - 2.0 * metrics.padding;
        for (i, line) in lines.iter().enumerate() {
            let baseline = text_top + (i + 1) as f64 * metrics.line_height - metrics.line_height * 0.25;
            canvas.set_cursor(text_x, baseline);
            let style = if i == 0 { FontStyle::Bold } else { FontStyle::Regular };
            canvas.draw_text(&fit_text(line, text_width, font_size), FONT, font_size, style, Align::Left);
        }

        // Precipitation probability swatch in the top right corner of the card
        let band = self.precip_table.classify(summary.precip_prob_avg_pct.map(|p| p as f64));
        canvas.draw_filled_rect(card.right() - metrics.padding - SWATCH, card.y + metrics.padding, SWATCH, SWATCH, band.color);

        icon_ok
    }

    /// Draws an icon or, if it can't be resolved, a placeholder. Returns false on placeholder.
    ///
    /// # Arguments
    ///
    /// * 'canvas' - the canvas to draw on
    /// * 'icon_id' - the icon id
    /// * 'x' - left edge
    /// * 'y' - top edge
    /// * 'size' - width and height
    fn draw_icon(&self, canvas: &mut dyn Canvas, icon_id: &str, x: f64, y: f64, size: f64) -> bool {
        let drawn = match self.icons.resolve_icon_path(icon_id) {
            Ok(path) => canvas.draw_image(&path, x, y, size, size).map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        if let Err(e) = drawn {
            warn!("using placeholder for icon '{}': {}", icon_id, e);
            canvas.draw_filled_rect(x, y, size, size, PLACEHOLDER);
            canvas.set_cursor(x + size / 2.0, y + size * 0.65);
            canvas.draw_text("?", FONT, 10.0, FontStyle::Bold, Align::Center);
            return false;
        }

        true
    }

    /// Draws the hourly table of a day
    ///
    /// # Arguments
    ///
    /// * 'canvas' - the canvas to draw on
    /// * 'summary' - the day
    /// * 'table' - the table rectangle
    fn draw_table(&self, canvas: &mut dyn Canvas, summary: &DaySummary, table: &LayoutRect) {
        let captions = self.locale.captions();
        let row_height = self.mode.metrics().row_height;
        let column = table.width / 4.0;
        let font_size = if self.mode == LayoutMode::Detailed { 8.0 } else { 6.5 };

        let headings = [captions.hour, captions.temperature, captions.wind, captions.precipitation];
        for (c, heading) in headings.iter().enumerate() {
            canvas.set_cursor(table.x + c as f64 * column, table.y + row_height * 0.75);
            canvas.draw_text(heading, FONT, font_size, FontStyle::Bold, Align::Left);
        }

        for (r, sample) in summary.hourly.iter().enumerate() {
            let top = table.y + (r + 1) as f64 * row_height;
            let baseline = top + row_height * 0.75;
            let cells = hourly_cells(sample, summary.utc_offset_seconds);

            canvas.set_cursor(table.x, baseline);
            canvas.draw_text(&cells[0], FONT, font_size, FontStyle::Regular, Align::Left);
            canvas.set_cursor(table.x + column, baseline);
            canvas.draw_text(&cells[1], FONT, font_size, FontStyle::Regular, Align::Left);

            // Arrows point the way the wind blows, i.e. away from the reported direction
            let arrow = compute_arrow(0.0, 0.0, row_height * 0.9, (sample.wind_dir_deg + 180.0) % 360.0)
                .centred_on(table.x + 2.0 * column + row_height / 2.0, top + row_height / 2.0);
            canvas.draw_line(arrow.origin.x, arrow.origin.y, arrow.shaft_end.x, arrow.shaft_end.y, STROKE);
            canvas.draw_line(arrow.shaft_end.x, arrow.shaft_end.y, arrow.barb_left.x, arrow.barb_left.y, STROKE);
            canvas.draw_line(arrow.shaft_end.x, arrow.shaft_end.y, arrow.barb_right.x, arrow.barb_right.y, STROKE);
            canvas.set_cursor(table.x + 2.0 * column + row_height + 1.0, baseline);
            canvas.draw_text(&cells[2], FONT, font_size, FontStyle::Regular, Align::Left);

            let probability = sample.precip_probability.map(|p| p * 100.0);
            let band = self.precip_table.classify(probability);
            let swatch = row_height * 0.6;
            canvas.draw_filled_rect(table.x + 3.0 * column, top + (row_height - swatch) / 2.0, swatch, swatch, band.color);
            canvas.set_cursor(table.x + 3.0 * column + swatch + 1.0, baseline);
            canvas.draw_text(&cells[3], FONT, font_size, FontStyle::Regular, Align::Left);
        }
    }
}

/// Text lines of a day card, the first line holds the weekday labels
///
/// # Arguments
///
/// * 'summary' - the day
/// * 'mode' - layout mode deciding how much goes on each line
/// * 'locale' - locale for captions
pub fn card_lines(summary: &DaySummary, mode: LayoutMode, locale: Locale) -> Vec<String> {
    let c = locale.captions();
    let labels = summary.weekday_labels.join(" · ");
    let date = summary.date.format("%d/%m").to_string();
    let probability = summary.precip_prob_avg_pct.map_or(UNAVAILABLE.to_string(), |p| format!("{}%", p));
    let max = format!("{} {:.1}°C", c.max, summary.temp_max_c);
    let min = format!("{} {:.1}°C", c.min, summary.temp_min_c);
    let humidity = format!("{} {}%", c.humidity, summary.humidity_avg_pct);
    let wind = format!("{} {} km/h", c.wind, summary.wind_avg_kmh);
    let precipitation = format!("{} {:.1} mm ({})", c.precipitation, summary.precip_sum_mm, probability);

    match mode {
        LayoutMode::Overview => vec![
            labels,
            date,
            summary.modal_description.clone(),
            max,
            min,
            humidity,
            wind,
            format!("{} {:.1} mm", c.precipitation, summary.precip_sum_mm),
            format!("({})", probability),
        ],
        LayoutMode::Detailed => vec![
            format!("{}  {}", labels, date),
            summary.modal_description.clone(),
            format!("{} · {} · {}", max, min, humidity),
            format!("{} · {}", wind, precipitation),
        ],
        LayoutMode::Compact => vec![
            format!("{}  {}  {}", labels, date, summary.modal_description),
            format!("{} · {} · {} · {} · {}", max, min, humidity, wind, precipitation),
        ],
    }
}

/// Shortens a text with an ellipsis so its estimated width stays within the given width
///
/// # Arguments
///
/// * 'text' - the text
/// * 'width' - available width in millimeters
/// * 'font_size' - font size in points
fn fit_text(text: &str, width: f64, font_size: f64) -> String {
    let glyph_width = font_size * PT_TO_MM * GLYPH_WIDTH_EM;
    let max_chars = (width / glyph_width).floor().max(0.0) as usize;

    if text.chars().count() <= max_chars {
        text.to_string()
    } else if max_chars == 0 {
        String::new()
    } else {
        let mut fitted = text.chars().take(max_chars - 1).collect::<String>();
        fitted.push('…');
        fitted
    }
}

/// Cells of one hourly table row: local time, temperature, wind speed and precipitation probability
///
/// # Arguments
///
/// * 'sample' - the sample to format
/// * 'utc_offset_seconds' - offset used for the local time
fn hourly_cells(sample: &ForecastSample, utc_offset_seconds: i32) -> [String; 4] {
    let time = DateTime::from_timestamp(sample.timestamp_utc + utc_offset_seconds as i64, 0)
        .map_or("--:--".to_string(), |d| d.format("%H:%M").to_string());
    let wind = format!("{} km/h", round_half_away(sample.wind_speed_mps * 3.6));
    let probability = sample.precip_probability
        .map_or(UNAVAILABLE.to_string(), |p| format!("{}%", round_half_away(p * 100.0)));

    [time, format!("{:.1}°C", sample.temp_c), wind, probability]
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use super::*;
    use crate::aggregation::summarize_all;
    use crate::bucketing::bucketize;
    use crate::bucketing::tests::{sample, MONDAY};
    use crate::canvas::recording::{Call, RecordingCanvas};
    use crate::errors::{ExternalError, ExternalKind};

    /// Resolves every icon except "10d"
    struct FakeIcons;

    impl IconResolver for FakeIcons {
        fn resolve_icon_path(&self, icon_id: &str) -> Result<PathBuf, ExternalError> {
            if icon_id == "10d" {
                Err(ExternalError::new("icons", ExternalKind::Network, "timeout".to_string(), icon_id))
            } else {
                Ok(PathBuf::from(format!("/tmp/{}.png", icon_id)))
            }
        }
    }

    fn summaries(days: i64) -> Vec<DaySummary> {
        let samples = (0..days * 8).map(|k| {
            let mut s = sample(MONDAY + k * 10800);
            if k / 8 == 1 {
                s.weather_icon_id = "10d".to_string();
            }
            s
        }).collect::<Vec<_>>();
        summarize_all(&bucketize(&samples, 0).unwrap()).unwrap()
    }

    fn render(mode: LayoutMode, summaries: &[DaySummary], uv: Option<f64>, hourly: bool) -> (RecordingCanvas, RenderStats) {
        let uv_table = BandTable::uv();
        let precip_table = BandTable::precipitation();
        let icons = FakeIcons;
        let renderer = ReportRenderer::new("Salou", Locale::Catalan, mode, &uv_table, &precip_table, &icons);
        let mut canvas = RecordingCanvas::new(210.0, 297.0);
        let stats = renderer.render(&mut canvas, summaries, uv, hourly).unwrap();
        (canvas, stats)
    }

    #[test]
    fn test_missing_uv_renders_unavailable() {
        let (canvas, _) = render(LayoutMode::Overview, &summaries(1), None, false);
        let texts = canvas.texts();
        assert_eq!(texts[0], "Previsió meteorològica: Salou");
        assert_eq!(texts[1], "Índex UV: unavailable");
        assert!(canvas.calls.contains(&Call::Rect { x: MARGIN, y: MARGIN + HEADER_HEIGHT - 6.0 - SWATCH, w: SWATCH, h: SWATCH, color: BandTable::uv().neutral() }));
    }

    #[test]
    fn test_uv_band_in_header() {
        let (canvas, _) = render(LayoutMode::Overview, &summaries(1), Some(5.2), false);
        assert!(canvas.texts().contains(&"Índex UV: 5.2 (medium)"));
    }

    #[test]
    fn test_failed_icon_gets_placeholder_and_other_days_render() {
        let (canvas, stats) = render(LayoutMode::Overview, &summaries(3), Some(1.0), false);
        assert_eq!(stats.days, 3);
        assert_eq!(stats.icon_placeholders, 1);

        let images = canvas.calls.iter().filter(|c| matches!(c, Call::Image { .. })).count();
        assert_eq!(images, 2);
        assert!(canvas.texts().contains(&"?"));
    }

    #[test]
    fn test_new_pages_follow_layout() {
        let s = summaries(5);
        let placements = arrange(&s, 210.0, 297.0, LayoutMode::Detailed).unwrap();
        let (canvas, stats) = render(LayoutMode::Detailed, &s, None, true);

        assert_eq!(canvas.count_pages(), stats.pages);
        assert_eq!(stats.pages, placements.last().unwrap().page + 1);
    }

    #[test]
    fn test_hourly_tables_draw_one_arrow_per_row() {
        let (canvas, _) = render(LayoutMode::Compact, &summaries(2), None, true);
        let lines = canvas.calls.iter().filter(|c| matches!(c, Call::Line { .. })).count();
        assert_eq!(lines, 2 * 8 * 3);
        assert!(canvas.texts().contains(&"12:00"));

        let (canvas, _) = render(LayoutMode::Compact, &summaries(2), None, false);
        assert!(!canvas.calls.iter().any(|c| matches!(c, Call::Line { .. })));
    }

    #[test]
    fn test_missing_precipitation_probability_renders_unavailable() {
        let mut s = summaries(1);
        s[0].precip_prob_avg_pct = None;
        let lines = card_lines(&s[0], LayoutMode::Detailed, Locale::English);
        assert_eq!(lines[3], "Wind 11 km/h · Precipitation 0.0 mm (unavailable)");
        assert_eq!(lines[0], "Dl · Lun · Mon · Lun  04/03");
    }

    #[test]
    fn test_overview_text_fits_the_cards() {
        let mut s = summaries(5);
        s[0].modal_description = "pluja de gran intensitat amb tempesta".to_string();
        s[2].precip_prob_avg_pct = None;
        let placements = arrange(&s, 210.0, 297.0, LayoutMode::Overview).unwrap();
        let (canvas, _) = render(LayoutMode::Overview, &s, None, false);

        let glyph_width = 7.5 * PT_TO_MM * GLYPH_WIDTH_EM;
        for call in &canvas.calls {
            if let Call::Text { text, x, y, size, .. } = call {
                if let Some(p) = placements.iter().find(|p| *y > p.card.y && *y < p.card.bottom() && *x >= p.card.x && *x < p.card.right()) {
                    if *size == 7.5 {
                        let right = x + text.chars().count() as f64 * glyph_width;
                        assert!(right <= p.card.right(), "'{}' runs past its card", text);
                    }
                }
            }
        }
        assert!(canvas.texts().contains(&"(unavailable)"));
        assert!(canvas.texts().iter().any(|t| t.starts_with("pluja de") && t.ends_with('…')));
    }

    #[test]
    fn test_fit_text() {
        assert_eq!(fit_text("Màx 17.0°C", 100.0, 7.5), "Màx 17.0°C");
        let fitted = fit_text("Precipitació 0.0 mm (unavailable)", 31.6, 7.5);
        assert!(fitted.ends_with('…'));
        assert!(fitted.chars().count() <= (31.6 / (7.5 * PT_TO_MM * GLYPH_WIDTH_EM)) as usize);
        assert_eq!(fit_text("abc", 0.5, 7.5), "");
    }

    #[test]
    fn test_hourly_cells() {
        let mut s = sample(MONDAY + 9 * 3600);
        s.precip_probability = None;
        let cells = hourly_cells(&s, 3600);
        assert_eq!(cells, ["10:00".to_string(), "15.0°C".to_string(), "11 km/h".to_string(), UNAVAILABLE.to_string()]);
    }

    #[test]
    fn test_too_many_days_is_layout_error() {
        let uv_table = BandTable::uv();
        let precip_table = BandTable::precipitation();
        let icons = FakeIcons;
        let renderer = ReportRenderer::new("Salou", Locale::Catalan, LayoutMode::Overview, &uv_table, &precip_table, &icons);
        let mut canvas = RecordingCanvas::new(210.0, 297.0);
        let six = [summaries(5), summaries(1)].concat();
        assert!(renderer.render(&mut canvas, &six, None, false).is_err());
        assert!(canvas.calls.is_empty());
    }
}
