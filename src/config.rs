use std::env;
use std::fs;
use log::LevelFilter;
use serde::Deserialize;
use crate::banding::ColorTier;
use crate::errors::ConfigError;
use crate::layout::LayoutMode;

/// Environment variable overriding the configured api key, may also be given in a .env file
pub const API_KEY_VAR: &str = "OPENWEATHER_API_KEY";

const COMPONENT: &str = "config";

#[derive(Deserialize, Debug)]
pub struct General {
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
}

#[derive(Deserialize, Debug)]
pub struct ReportParameters {
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default = "default_locale")]
    pub primary_locale: String,
    pub mode: LayoutMode,
    #[serde(default = "default_true")]
    pub hourly_detail: bool,
    pub output: String,
    #[serde(default = "default_page_width")]
    pub page_width: f64,
    #[serde(default = "default_page_height")]
    pub page_height: f64,
}

#[derive(Deserialize, Debug)]
pub struct OpenWeatherMapParameters {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_locale")]
    pub lang: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Debug)]
pub struct Files {
    pub icon_cache_dir: String,
    #[serde(default = "default_icon_age")]
    pub icon_max_age_days: u64,
}

#[derive(Deserialize, Default, Debug)]
pub struct Banding {
    pub uv: Option<Vec<ColorTier>>,
    pub precipitation: Option<Vec<ColorTier>>,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub general: General,
    pub report: ReportParameters,
    pub open_weather_map: OpenWeatherMapParameters,
    pub files: Files,
    #[serde(default)]
    pub banding: Banding,
}

fn default_locale() -> String { "ca".to_string() }
fn default_true() -> bool { true }
fn default_page_width() -> f64 { 210.0 }
fn default_page_height() -> f64 { 297.0 }
fn default_base_url() -> String { "https://api.openweathermap.org".to_string() }
fn default_timeout() -> u64 { 30 }
fn default_icon_age() -> u64 { 30 }

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    let toml = fs::read_to_string(config_path)
        .map_err(|e| ConfigError::new(COMPONENT, e.to_string(), config_path))?;

    parse_config(&toml, env::var(API_KEY_VAR).ok())
}

/// Parses and validates configuration
///
/// # Arguments
///
/// * 'toml' - the configuration document
/// * 'api_key' - api key overriding the one in the document, if any
pub fn parse_config(toml: &str, api_key: Option<String>) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(toml)
        .map_err(|e| ConfigError::new(COMPONENT, e.to_string(), "toml document"))?;

    if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
        config.open_weather_map.api_key = key;
    }

    if config.open_weather_map.api_key.trim().is_empty() {
        return Err(ConfigError::new(COMPONENT, format!("no api key, set it in the file or in {}", API_KEY_VAR), "open_weather_map.api_key"));
    }
    if config.report.city.trim().is_empty() {
        return Err(ConfigError::new(COMPONENT, "empty city".to_string(), "report.city"));
    }
    if !(config.report.page_width > 0.0 && config.report.page_height > 0.0) {
        return Err(ConfigError::new(COMPONENT, "page size must be positive".to_string(),
            &format!("{} x {}", config.report.page_width, config.report.page_height)));
    }

    Ok(config)
}
