use anyhow::Result;
use log::{info, warn};
use log4rs::append::console::ConsoleAppender;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Root};
use log4rs::encode::pattern::PatternEncoder;
use crate::config::{Config, General};
use crate::errors::ReportError;
use crate::manager_icons::IconCache;
use crate::manager_owm::OpenWeatherMap;

const LOG_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S)} {l} {t} - {m}{n}";

/// Collaborators needed for a report run
pub struct Mgr {
    pub source: OpenWeatherMap,
    pub icons: IconCache,
}

/// Sets up log4rs with a file appender and optionally a console appender
///
/// # Arguments
///
/// * 'general' - general configuration holding log path, level and stdout flag
pub fn init_logging(general: &General) -> Result<()> {
    let file = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
        .build(&general.log_path)?;

    let mut builder = log4rs::Config::builder()
        .appender(Appender::builder().build("file", Box::new(file)));
    let mut root = Root::builder().appender("file");

    if general.log_to_stdout {
        let stdout = ConsoleAppender::builder()
            .encoder(Box::new(PatternEncoder::new(LOG_PATTERN)))
            .build();
        builder = builder.appender(Appender::builder().build("stdout", Box::new(stdout)));
        root = root.appender("stdout");
    }

    let config = builder.build(root.build(general.log_level))?;
    log4rs::init_config(config)?;

    Ok(())
}

/// Instantiates the forecast source and the icon cache, stale icons are pruned on the way
///
/// # Arguments
///
/// * 'config' - the loaded configuration
pub fn init(config: &Config) -> Result<Mgr, ReportError> {
    info!("meteoreport version: {}", env!("CARGO_PKG_VERSION"));

    let owm = &config.open_weather_map;
    let source = OpenWeatherMap::new(&owm.api_key, &owm.base_url, &config.report.country, &owm.lang, owm.timeout_secs);

    let icons = IconCache::new(&config.files.icon_cache_dir, owm.timeout_secs)?;
    if let Err(e) = icons.prune(config.files.icon_max_age_days) {
        warn!("could not prune icon cache: {}", e);
    }

    Ok(Mgr { source, icons })
}
