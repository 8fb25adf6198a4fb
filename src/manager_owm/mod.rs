use std::time::Duration;
use log::debug;
use serde::de::DeserializeOwned;
use ureq::Agent;
use crate::errors::{ExternalError, ExternalKind};
use crate::models::forecast::ForecastSample;
use crate::models::openweathermap::{FullForecast, GeoLocation, UvIndex};

const COMPONENT: &str = "openweathermap";

/// Source of forecast, geocoding and UV data
pub trait ForecastSource {
    /// Returns 3-hour samples in ascending order together with the forecast wide UTC offset
    fn fetch_forecast(&self, city: &str) -> Result<(Vec<ForecastSample>, i32), ExternalError>;
    fn fetch_uv_index(&self, lat: f64, lon: f64) -> Result<Option<f64>, ExternalError>;
    fn geocode(&self, city: &str) -> Result<(f64, f64), ExternalError>;
}

/// Struct for retrieving forecasts from the OpenWeatherMap API
pub struct OpenWeatherMap {
    agent: Agent,
    api_key: String,
    base_url: String,
    country: String,
    lang: String,
}

impl OpenWeatherMap {
    /// Returns an OpenWeatherMap struct ready for fetching forecasts
    ///
    /// # Arguments
    ///
    /// * 'api_key' - OpenWeatherMap api key
    /// * 'base_url' - api base url, e.g. "https://api.openweathermap.org"
    /// * 'country' - country code appended to city queries, may be empty
    /// * 'lang' - language for weather descriptions
    /// * 'timeout_secs' - global timeout for one request
    pub fn new(api_key: &str, base_url: &str, country: &str, lang: &str, timeout_secs: u64) -> OpenWeatherMap {
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs)))
            .build();

        let agent = config.into();

        Self {
            agent,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            country: country.to_string(),
            lang: lang.to_string(),
        }
    }

    /// City query as expected by the api, i.e. "city,country"
    ///
    /// # Arguments
    ///
    /// * 'city' - city name
    fn city_query(&self, city: &str) -> String {
        if self.country.is_empty() {
            city.to_string()
        } else {
            format!("{},{}", city, self.country)
        }
    }

    /// Makes a get request and decodes the json response
    ///
    /// # Arguments
    ///
    /// * 'path' - path below the base url
    /// * 'query' - query parameters, the api key is added
    /// * 'input' - the triggering input, used in errors
    fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)], input: &str) -> Result<T, ExternalError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("requesting {} for {}", url, input);

        let mut request = self.agent.get(&url).query("appid", &self.api_key);
        for (key, value) in query {
            request = request.query(*key, value);
        }

        let json = request
            .call()
            .map_err(|e| ExternalError::from_ureq(COMPONENT, e, input))?
            .body_mut()
            .read_to_string()
            .map_err(|e| ExternalError::from_ureq(COMPONENT, e, input))?;

        serde_json::from_str(&json)
            .map_err(|e| ExternalError::new(COMPONENT, ExternalKind::Document, e.to_string(), input))
    }
}

impl ForecastSource for OpenWeatherMap {
    fn fetch_forecast(&self, city: &str) -> Result<(Vec<ForecastSample>, i32), ExternalError> {
        let query = [
            ("q", self.city_query(city)),
            ("units", "metric".to_string()),
            ("lang", self.lang.clone()),
        ];
        let forecast: FullForecast = self.get_json("/data/2.5/forecast", &query, city)?;

        debug!("forecast for {} has {} entries", forecast.city.name, forecast.list.len());
        Ok((to_samples(&forecast), forecast.city.timezone))
    }

    fn fetch_uv_index(&self, lat: f64, lon: f64) -> Result<Option<f64>, ExternalError> {
        let input = format!("{:.4},{:.4}", lat, lon);
        let query = [("lat", format!("{:.4}", lat)), ("lon", format!("{:.4}", lon))];
        let uv: UvIndex = self.get_json("/data/2.5/uvi", &query, &input)?;

        Ok(uv.value)
    }

    fn geocode(&self, city: &str) -> Result<(f64, f64), ExternalError> {
        let query = [("q", self.city_query(city)), ("limit", "1".to_string())];
        let locations: Vec<GeoLocation> = self.get_json("/geo/1.0/direct", &query, city)?;

        let location = locations.first()
            .ok_or_else(|| ExternalError::new(COMPONENT, ExternalKind::NotFound, "no geocoding match".to_string(), city))?;
        debug!("geocoded {} to {} at {}, {}", city, location.name, location.lat, location.lon);

        Ok((location.lat, location.lon))
    }
}

/// Transforms a raw forecast document into forecast samples
///
/// A missing precipitation probability is kept as missing, while missing rain volume means no rain.
///
/// # Arguments
///
/// * 'forecast' - the decoded forecast document
pub fn to_samples(forecast: &FullForecast) -> Vec<ForecastSample> {
    forecast.list.iter().map(|e| {
        let (icon, description) = e.weather.first()
            .map_or((String::new(), String::new()), |w| (w.icon.clone(), w.description.clone()));

        ForecastSample {
            timestamp_utc: e.dt,
            local_offset_seconds: forecast.city.timezone,
            temp_c: e.main.temp,
            temp_min_c: e.main.temp_min,
            temp_max_c: e.main.temp_max,
            humidity_pct: e.main.humidity,
            wind_speed_mps: e.wind.speed,
            wind_dir_deg: e.wind.deg,
            precip_mm_3h: e.rain.three_hours,
            precip_probability: e.pop,
            weather_icon_id: icon,
            weather_description: description,
        }
    }).collect()
}
