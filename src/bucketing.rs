use std::collections::BTreeMap;
use chrono::{DateTime, NaiveDate};
use crate::errors::InputError;
use crate::models::forecast::{DayBucket, ForecastSample};

/// Max number of calendar days kept in a report
pub const MAX_DAYS: usize = 5;

const COMPONENT: &str = "bucketing";

/// Returns the local calendar date of a timestamp, i.e. floor((timestamp + offset) / 86400)
///
/// # Arguments
///
/// * 'timestamp_utc' - unix timestamp in seconds
/// * 'utc_offset_seconds' - offset from UTC in seconds
pub fn local_date(timestamp_utc: i64, utc_offset_seconds: i32) -> Option<NaiveDate> {
    let local = timestamp_utc.checked_add(utc_offset_seconds as i64)?;
    DateTime::from_timestamp(local, 0).map(|d| d.date_naive())
}

/// Groups samples into local calendar day buckets, keeping only the first five dates.
///
/// The samples must be non-empty and ordered by timestamp (equal timestamps are allowed).
///
/// # Arguments
///
/// * 'samples' - forecast samples in ascending timestamp order
/// * 'utc_offset_seconds' - forecast wide offset from UTC in seconds
pub fn bucketize(samples: &[ForecastSample], utc_offset_seconds: i32) -> Result<BTreeMap<NaiveDate, DayBucket>, InputError> {
    if samples.is_empty() {
        return Err(InputError::new(COMPONENT, "no samples to bucketize", "[]".to_string()));
    }

    if let Some(i) = samples.windows(2).position(|w| w[1].timestamp_utc < w[0].timestamp_utc) {
        return Err(InputError::new(
            COMPONENT,
            "samples are not ordered by timestamp",
            format!("sample {} at {} follows {}", i + 1, samples[i + 1].timestamp_utc, samples[i].timestamp_utc),
        ));
    }

    let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();
    for sample in samples {
        let date = local_date(sample.timestamp_utc, utc_offset_seconds)
            .ok_or_else(|| InputError::new(
                COMPONENT,
                "timestamp out of range",
                format!("{} with offset {}", sample.timestamp_utc, utc_offset_seconds),
            ))?;

        // Samples are ordered, so a sixth date means we are done
        if !buckets.contains_key(&date) && buckets.len() == MAX_DAYS {
            break;
        }

        buckets.entry(date)
            .or_insert_with(|| DayBucket { date, utc_offset_seconds, samples: Vec::new() })
            .samples.push(sample.clone());
    }

    Ok(buckets)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// 2024-03-04 00:00:00 UTC, a Monday
    pub const MONDAY: i64 = 1_709_510_400;

    pub fn sample(timestamp_utc: i64) -> ForecastSample {
        ForecastSample {
            timestamp_utc,
            local_offset_seconds: 0,
            temp_c: 15.0,
            temp_min_c: 14.0,
            temp_max_c: 16.0,
            humidity_pct: 60.0,
            wind_speed_mps: 3.0,
            wind_dir_deg: 180.0,
            precip_mm_3h: 0.0,
            precip_probability: Some(0.2),
            weather_icon_id: "01d".to_string(),
            weather_description: "cel serè".to_string(),
        }
    }

    fn series(start: i64, count: i64) -> Vec<ForecastSample> {
        (0..count).map(|i| sample(start + i * 10800)).collect()
    }

    #[test]
    fn test_empty_is_input_error() {
        let err = bucketize(&[], 0).unwrap_err();
        assert_eq!(err.component, "bucketing");
    }

    #[test]
    fn test_unsorted_is_input_error() {
        let samples = vec![sample(MONDAY + 10800), sample(MONDAY)];
        let err = bucketize(&samples, 0).unwrap_err();
        assert!(err.input.contains("sample 1"));
    }

    #[test]
    fn test_equal_timestamps_are_accepted() {
        let samples = vec![sample(MONDAY), sample(MONDAY)];
        let buckets = bucketize(&samples, 0).unwrap();
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets.values().next().unwrap().samples.len(), 2);
    }

    #[test]
    fn test_at_most_five_ascending_buckets() {
        // 7 days worth of 3-hour samples
        let buckets = bucketize(&series(MONDAY, 56), 0).unwrap();
        assert_eq!(buckets.len(), MAX_DAYS);

        let keys: Vec<NaiveDate> = buckets.keys().cloned().collect();
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(keys[0], NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert!(buckets.values().all(|b| b.samples.len() == 8));
    }

    #[test]
    fn test_offset_moves_samples_to_local_date() {
        // 22:00 UTC on Monday is already Tuesday at UTC+3
        let samples = vec![sample(MONDAY + 22 * 3600)];
        let buckets = bucketize(&samples, 3 * 3600).unwrap();
        assert_eq!(*buckets.keys().next().unwrap(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());

        // 01:00 UTC on Monday is still Sunday at UTC-5
        let samples = vec![sample(MONDAY + 3600)];
        let buckets = bucketize(&samples, -5 * 3600).unwrap();
        assert_eq!(*buckets.keys().next().unwrap(), NaiveDate::from_ymd_opt(2024, 3, 3).unwrap());
    }

    #[test]
    fn test_partial_first_day() {
        // Forecast starting at 15:00 gives 3 samples on day one
        let buckets = bucketize(&series(MONDAY + 15 * 3600, 40), 0).unwrap();
        let first = buckets.values().next().unwrap();
        assert_eq!(first.samples.len(), 3);
        assert_eq!(buckets.len(), 5);
    }
}
