use chrono::NaiveDate;

/// One 3-hour forecast sample as delivered by the forecast source
#[derive(Clone, Debug, PartialEq)]
pub struct ForecastSample {
    pub timestamp_utc: i64,
    pub local_offset_seconds: i32,
    pub temp_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_mps: f64,
    pub wind_dir_deg: f64,
    pub precip_mm_3h: f64,
    pub precip_probability: Option<f64>,
    pub weather_icon_id: String,
    pub weather_description: String,
}

impl ForecastSample {
    /// Seconds since local midnight given the offset to apply
    ///
    /// # Arguments
    ///
    /// * 'utc_offset_seconds' - offset from UTC in seconds
    pub fn local_seconds_of_day(&self, utc_offset_seconds: i32) -> i64 {
        (self.timestamp_utc + utc_offset_seconds as i64).rem_euclid(86400)
    }
}

/// Samples sharing one local calendar date, ascending by timestamp
#[derive(Clone, Debug)]
pub struct DayBucket {
    pub date: NaiveDate,
    pub utc_offset_seconds: i32,
    pub samples: Vec<ForecastSample>,
}

/// Aggregated values for one day
#[derive(Clone, Debug)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub weekday_labels: [&'static str; 4],
    pub temp_max_c: f64,
    pub temp_min_c: f64,
    pub humidity_avg_pct: i64,
    pub wind_avg_kmh: i64,
    pub precip_prob_avg_pct: Option<i64>,
    pub precip_sum_mm: f64,
    pub modal_icon_id: String,
    pub modal_description: String,
    pub representative: ForecastSample,
    pub utc_offset_seconds: i32,
    pub hourly: Vec<ForecastSample>,
}
