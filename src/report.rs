use std::path::{Path, PathBuf};
use log::{info, warn};
use crate::aggregation::summarize_all;
use crate::banding::BandTable;
use crate::bucketing::bucketize;
use crate::canvas::Canvas;
use crate::config::Config;
use crate::errors::{ConfigError, ExternalError, ReportError};
use crate::layout::LayoutMode;
use crate::locale::Locale;
use crate::manager_icons::IconResolver;
use crate::manager_owm::ForecastSource;
use crate::renderer::ReportRenderer;

/// Everything that decides how a report looks
pub struct ReportSettings {
    pub city: String,
    pub locale: Locale,
    pub mode: LayoutMode,
    pub hourly_detail: bool,
    pub uv_table: BandTable,
    pub precip_table: BandTable,
}

impl ReportSettings {
    /// Builds report settings from configuration, validating any configured band tables
    ///
    /// # Arguments
    ///
    /// * 'config' - the loaded configuration
    pub fn from_config(config: &Config) -> Result<ReportSettings, ConfigError> {
        let uv_table = match &config.banding.uv {
            Some(tiers) => BandTable::new(tiers.clone(), BandTable::uv().neutral())?,
            None => BandTable::uv(),
        };
        let precip_table = match &config.banding.precipitation {
            Some(tiers) => BandTable::new(tiers.clone(), BandTable::precipitation().neutral())?,
            None => BandTable::precipitation(),
        };

        Ok(ReportSettings {
            city: config.report.city.clone(),
            locale: Locale::from_code(&config.report.primary_locale),
            mode: config.report.mode,
            hourly_detail: config.report.hourly_detail,
            uv_table,
            precip_table,
        })
    }
}

/// Summary of a finished report
#[derive(Debug)]
pub struct ReportOutcome {
    pub days: usize,
    pub pages: usize,
    pub uv_available: bool,
    pub icon_placeholders: usize,
    pub output: PathBuf,
}

/// Generates a report and saves it to the given output path
///
/// A failing forecast fetch aborts the report, while failing geocoding or UV retrieval only
/// leaves the UV reading unavailable.
///
/// # Arguments
///
/// * 'settings' - report settings
/// * 'source' - forecast, geocoding and UV source
/// * 'icons' - icon resolver
/// * 'canvas' - canvas to draw on
/// * 'output' - where to save the document
pub fn generate(
    settings: &ReportSettings,
    source: &dyn ForecastSource,
    icons: &dyn IconResolver,
    canvas: &mut dyn Canvas,
    output: &Path) -> Result<ReportOutcome, ReportError> {

    let (samples, utc_offset) = source.fetch_forecast(&settings.city)?;
    info!("fetched {} samples for {} (utc offset {}s)", samples.len(), settings.city, utc_offset);

    let uv = match fetch_uv(source, &settings.city) {
        Ok(uv) => uv,
        Err(e) => {
            warn!("UV index unavailable: {}", e);
            None
        }
    };

    let buckets = bucketize(&samples, utc_offset)?;
    let summaries = summarize_all(&buckets)?;
    info!("summarized {} days starting {}", summaries.len(), summaries.first().map_or("-".to_string(), |s| s.date.to_string()));

    let renderer = ReportRenderer::new(
        &settings.city, settings.locale, settings.mode, &settings.uv_table, &settings.precip_table, icons);
    let stats = renderer.render(canvas, &summaries, uv, settings.hourly_detail)?;

    canvas.save(output)?;
    info!("report with {} days on {} pages written to {}", stats.days, stats.pages, output.display());

    Ok(ReportOutcome {
        days: stats.days,
        pages: stats.pages,
        uv_available: uv.is_some(),
        icon_placeholders: stats.icon_placeholders,
        output: output.to_path_buf(),
    })
}

/// Geocodes the city and fetches its UV index
///
/// # Arguments
///
/// * 'source' - forecast source
/// * 'city' - city name
fn fetch_uv(source: &dyn ForecastSource, city: &str) -> Result<Option<f64>, ExternalError> {
    let (lat, lon) = source.geocode(city)?;
    source.fetch_uv_index(lat, lon)
}
