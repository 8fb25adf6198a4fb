use std::collections::BTreeMap;
use chrono::{Datelike, NaiveDate};
use crate::errors::InputError;
use crate::locale::weekday_labels;
use crate::models::forecast::{DayBucket, DaySummary, ForecastSample};

/// Meters per second to kilometers per hour
const MPS_TO_KMH: f64 = 3.6;

/// Local noon in seconds since midnight
const NOON: i64 = 12 * 3600;

const COMPONENT: &str = "aggregation";

/// Rounds half away from zero, which is the one rounding rule used for all averaged values
///
/// # Arguments
///
/// * 'value' - the value to round
pub fn round_half_away(value: f64) -> i64 {
    value.round() as i64
}

/// Reduces a day bucket into a day summary
///
/// # Arguments
///
/// * 'bucket' - the samples of one local calendar date
pub fn summarize(bucket: &DayBucket) -> Result<DaySummary, InputError> {
    let samples = &bucket.samples;
    if samples.is_empty() {
        return Err(InputError::new(COMPONENT, "empty day bucket", bucket.date.to_string()));
    }
    let count = samples.len() as f64;

    let temp_max_c = samples.iter().map(|s| s.temp_max_c).fold(f64::MIN, f64::max);
    let temp_min_c = samples.iter().map(|s| s.temp_min_c).fold(f64::MAX, f64::min);
    let humidity = samples.iter().map(|s| s.humidity_pct).sum::<f64>() / count;
    let wind = samples.iter().map(|s| s.wind_speed_mps).sum::<f64>() / count;
    let precip_sum_mm = samples.iter().map(|s| s.precip_mm_3h).sum::<f64>();

    let probabilities = samples.iter().filter_map(|s| s.precip_probability).collect::<Vec<f64>>();
    let precip_prob_avg_pct = if probabilities.is_empty() {
        None
    } else {
        Some(round_half_away(probabilities.iter().sum::<f64>() / probabilities.len() as f64 * 100.0))
    };

    Ok(DaySummary {
        date: bucket.date,
        weekday_labels: weekday_labels(bucket.date.weekday()),
        temp_max_c,
        temp_min_c,
        humidity_avg_pct: round_half_away(humidity),
        wind_avg_kmh: round_half_away(wind * MPS_TO_KMH),
        precip_prob_avg_pct,
        precip_sum_mm,
        modal_icon_id: modal(samples.iter().map(|s| s.weather_icon_id.as_str())),
        modal_description: modal(samples.iter().map(|s| s.weather_description.as_str())),
        representative: representative(samples, bucket.utc_offset_seconds).clone(),
        utc_offset_seconds: bucket.utc_offset_seconds,
        hourly: samples.clone(),
    })
}

/// Summarizes every bucket, the result is ordered by date
///
/// # Arguments
///
/// * 'buckets' - day buckets keyed by date
pub fn summarize_all(buckets: &BTreeMap<NaiveDate, DayBucket>) -> Result<Vec<DaySummary>, InputError> {
    let mut summaries = buckets.values()
        .map(summarize)
        .collect::<Result<Vec<DaySummary>, InputError>>()?;

    summaries.sort_by_key(|s| s.date);

    Ok(summaries)
}

/// Returns the most frequent value, ties are broken by first occurrence
///
/// # Arguments
///
/// * 'values' - the values to search
fn modal<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for v in values {
        match counts.iter_mut().find(|(c, _)| *c == v) {
            Some((_, n)) => *n += 1,
            None => counts.push((v, 1)),
        }
    }

    let mut best: Option<(&str, usize)> = None;
    for (v, n) in counts {
        if best.is_none_or(|(_, b)| n > b) {
            best = Some((v, n));
        }
    }

    best.map(|(v, _)| v.to_string()).unwrap_or_default()
}

/// Returns the sample closest to local noon, ties are broken by earliest timestamp
///
/// # Arguments
///
/// * 'samples' - non-empty samples in ascending order
/// * 'utc_offset_seconds' - offset from UTC in seconds
fn representative(samples: &[ForecastSample], utc_offset_seconds: i32) -> &ForecastSample {
    let mut best = &samples[0];
    let mut best_distance = (best.local_seconds_of_day(utc_offset_seconds) - NOON).abs();
    for s in &samples[1..] {
        let distance = (s.local_seconds_of_day(utc_offset_seconds) - NOON).abs();
        if distance < best_distance || (distance == best_distance && s.timestamp_utc < best.timestamp_utc) {
            best = s;
            best_distance = distance;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucketing::bucketize;
    use crate::bucketing::tests::{sample, MONDAY};

    const WIND: [f64; 8] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
    const RAIN: [f64; 8] = [0.0, 0.0, 0.5, 1.25, 0.0, 0.0, 2.0, 0.25];
    const ICONS: [&str; 8] = ["01n", "01n", "02d", "02d", "02d", "10d", "01n", "01n"];

    /// 40 samples over exactly five days where day n is offset by n degrees
    fn five_days() -> Vec<ForecastSample> {
        (0..40).map(|k| {
            let i = k % 8;
            let day = (k / 8) as f64;
            let mut s = sample(MONDAY + k as i64 * 10800);
            s.temp_c = 12.0 + i as f64 + day;
            s.temp_max_c = 10.0 + i as f64 + day;
            s.temp_min_c = 5.0 - 0.5 * i as f64 + day;
            s.humidity_pct = 60.0 + 2.0 * i as f64;
            s.wind_speed_mps = WIND[i] + day;
            s.precip_mm_3h = RAIN[i];
            s.precip_probability = Some(i as f64 / 10.0);
            s.weather_icon_id = ICONS[i].to_string();
            s.weather_description = format!("desc {}", ICONS[i]);
            s
        }).collect()
    }

    #[test]
    fn test_day_one_known_values() {
        let buckets = bucketize(&five_days(), 0).unwrap();
        assert_eq!(buckets.len(), 5);

        let summaries = summarize_all(&buckets).unwrap();
        let day1 = &summaries[0];

        assert_eq!(day1.date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(day1.temp_max_c, 17.0);
        assert_eq!(day1.temp_min_c, 1.5);
        // mean 4.5 m/s * 3.6 = 16.2 km/h
        assert_eq!(day1.wind_avg_kmh, 16);
        assert_eq!(day1.precip_sum_mm, 4.0);
        assert_eq!(day1.humidity_avg_pct, 67);
        assert_eq!(day1.precip_prob_avg_pct, Some(35));
        assert_eq!(day1.modal_icon_id, "01n");
        assert_eq!(day1.modal_description, "desc 01n");
        assert_eq!(day1.weekday_labels, ["Dl", "Lun", "Mon", "Lun"]);
        assert_eq!(day1.representative.timestamp_utc, MONDAY + 12 * 3600);
        assert_eq!(day1.hourly.len(), 8);

        // day 5 has every wind speed shifted by 4 m/s: 8.5 * 3.6 = 30.6
        assert_eq!(summaries[4].wind_avg_kmh, 31);
        assert_eq!(summaries[4].temp_max_c, 21.0);
    }

    #[test]
    fn test_max_not_below_min() {
        let buckets = bucketize(&five_days(), 7200).unwrap();
        for s in summarize_all(&buckets).unwrap() {
            assert!(s.temp_max_c >= s.temp_min_c);
        }
    }

    #[test]
    fn test_modal_tie_keeps_first_occurrence() {
        assert_eq!(modal(["b", "a", "a", "b", "c"].into_iter()), "b");
        assert_eq!(modal(["x"].into_iter()), "x");
    }

    #[test]
    fn test_representative_tie_takes_earliest() {
        // At offset 1h30 the 09:00 and 12:00 UTC samples are 10:30 and 13:30 local
        let samples = vec![sample(MONDAY + 9 * 3600), sample(MONDAY + 12 * 3600)];
        assert_eq!(representative(&samples, 5400).timestamp_utc, MONDAY + 9 * 3600);
    }

    #[test]
    fn test_missing_probability_is_unavailable() {
        let mut samples = vec![sample(MONDAY), sample(MONDAY + 10800)];
        samples.iter_mut().for_each(|s| s.precip_probability = None);
        let buckets = bucketize(&samples, 0).unwrap();
        let summary = summarize(buckets.values().next().unwrap()).unwrap();
        assert_eq!(summary.precip_prob_avg_pct, None);

        samples[0].precip_probability = Some(0.5);
        let buckets = bucketize(&samples, 0).unwrap();
        let summary = summarize(buckets.values().next().unwrap()).unwrap();
        assert_eq!(summary.precip_prob_avg_pct, Some(50));
    }

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_half_away(2.5), 3);
        assert_eq!(round_half_away(-2.5), -3);
        assert_eq!(round_half_away(66.49), 66);
    }

    #[test]
    fn test_empty_bucket_is_input_error() {
        let bucket = DayBucket { date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(), utc_offset_seconds: 0, samples: Vec::new() };
        assert!(summarize(&bucket).is_err());
    }
}
