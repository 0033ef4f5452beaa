//! Synthesized per-day history built from 3-hourly forecast samples.
//!
//! The free upstream tier has no historical endpoint, so each of the last
//! [`HISTORY_DAYS`] days is approximated by the forecast sample closest in time.
//! Forecasts only reach forward, which means older days all collapse onto the
//! earliest available sample. That approximation is intentional.

use chrono::{DateTime, Days, Duration, TimeZone};

use crate::{
    error::WeatherError,
    model::{ForecastPoint, WeatherSample},
};

pub const HISTORY_DAYS: u64 = 7;

/// Build one sample per day for `today - 6 ..= today`, oldest first.
///
/// Each day is labeled with its calendar date in `now`'s time zone, not with the
/// matched forecast's own timestamp.
pub fn synthesize_history<Tz: TimeZone>(
    points: &[ForecastPoint],
    now: &DateTime<Tz>,
) -> Result<Vec<WeatherSample>, WeatherError> {
    if points.is_empty() {
        return Err(WeatherError::NoData);
    }

    (0..HISTORY_DAYS)
        .rev()
        .map(|days_back| -> Result<WeatherSample, WeatherError> {
            let target = days_before(now, days_back);
            let closest = nearest_point(points, target.timestamp()).ok_or(WeatherError::NoData)?;
            let label = target.date_naive().format("%Y-%m-%d").to_string();

            Ok(WeatherSample::from_observation(&closest.observation, label))
        })
        .collect()
}

/// Forecast point with the smallest distance to `target_ts`; the first one wins a tie.
pub fn nearest_point(points: &[ForecastPoint], target_ts: i64) -> Option<&ForecastPoint> {
    points
        .iter()
        .min_by_key(|p| (p.timestamp.timestamp() - target_ts).abs())
}

fn days_before<Tz: TimeZone>(now: &DateTime<Tz>, days: u64) -> DateTime<Tz> {
    now.clone()
        .checked_sub_days(Days::new(days))
        .unwrap_or_else(|| now.clone() - Duration::days(days as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        condition::Condition,
        model::{Observation, UpstreamCondition},
    };
    use chrono::{FixedOffset, Utc};

    fn point(ts: DateTime<Utc>, temperature: f64, main: &str) -> ForecastPoint {
        ForecastPoint {
            timestamp: ts,
            observation: Observation {
                temperature,
                humidity: 50.0,
                rainfall: 0.0,
                wind_speed_mps: 1.0,
                weather: Some(UpstreamCondition { main: main.into(), icon: "01d".into() }),
            },
        }
    }

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn empty_input_is_no_data() {
        let now = utc(2024, 5, 10, 12);
        let err = synthesize_history(&[], &now).unwrap_err();
        assert_eq!(err, WeatherError::NoData);
    }

    #[test]
    fn always_seven_days_oldest_first() {
        let now = utc(2024, 5, 10, 12);
        let points = vec![point(utc(2024, 5, 10, 15), 20.0, "Clear")];

        let history = synthesize_history(&points, &now).unwrap();

        let dates: Vec<_> = history.iter().map(|s| s.timestamp.as_str()).collect();
        assert_eq!(
            dates,
            [
                "2024-05-04",
                "2024-05-05",
                "2024-05-06",
                "2024-05-07",
                "2024-05-08",
                "2024-05-09",
                "2024-05-10"
            ]
        );
        assert!(history.iter().all(|s| s.condition == Condition::Sunny));
    }

    #[test]
    fn past_days_collapse_onto_earliest_forecast_point() {
        let now = utc(2024, 5, 10, 12);
        let points = vec![
            point(utc(2024, 5, 10, 12), 10.0, "Rain"),
            point(utc(2024, 5, 11, 12), 11.0, "Snow"),
            point(utc(2024, 5, 12, 12), 12.0, "Fog"),
        ];

        let history = synthesize_history(&points, &now).unwrap();

        assert_eq!(history.len(), 7);
        assert!(history.iter().all(|s| s.temperature == 10.0));
        assert!(history.iter().all(|s| s.condition == Condition::Rainy));
    }

    #[test]
    fn picks_nearest_sample_per_day() {
        let now = utc(2024, 5, 10, 12);
        let points = vec![
            point(utc(2024, 5, 8, 0), 1.0, "Clear"),
            point(utc(2024, 5, 9, 9), 2.0, "Clouds"),
            point(utc(2024, 5, 10, 12), 3.0, "Thunderstorm"),
        ];

        let history = synthesize_history(&points, &now).unwrap();
        let temps: Vec<f64> = history.iter().map(|s| s.temperature).collect();

        assert_eq!(temps, [1.0, 1.0, 1.0, 1.0, 1.0, 2.0, 3.0]);
        assert_eq!(history[6].condition, Condition::Stormy);
    }

    #[test]
    fn equidistant_target_prefers_earlier_index() {
        let t = utc(2024, 5, 10, 0);
        let points = vec![
            point(t, 1.0, "Clear"),
            point(t + Duration::hours(3), 2.0, "Clouds"),
            point(t + Duration::hours(6), 3.0, "Rain"),
        ];

        let target = (t + Duration::minutes(90)).timestamp();
        assert_eq!(nearest_point(&points, target).unwrap().observation.temperature, 1.0);

        let target = (t + Duration::minutes(270)).timestamp();
        assert_eq!(nearest_point(&points, target).unwrap().observation.temperature, 2.0);
    }

    #[test]
    fn tie_break_follows_scan_order_not_time_order() {
        let t = utc(2024, 5, 10, 0);
        let points = vec![
            point(t + Duration::hours(6), 3.0, "Rain"),
            point(t, 1.0, "Clear"),
        ];

        let target = (t + Duration::hours(3)).timestamp();
        assert_eq!(nearest_point(&points, target).unwrap().observation.temperature, 3.0);
    }

    #[test]
    fn labels_use_the_local_calendar_date() {
        let ist = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        // 01:00 local on May 10 is still May 9 in UTC.
        let now = ist.with_ymd_and_hms(2024, 5, 10, 1, 0, 0).unwrap();
        let points = vec![point(utc(2024, 5, 10, 0), 5.0, "Mist")];

        let history = synthesize_history(&points, &now).unwrap();

        assert_eq!(history.first().unwrap().timestamp, "2024-05-04");
        assert_eq!(history.last().unwrap().timestamp, "2024-05-10");
        assert_eq!(history.last().unwrap().condition, Condition::Misty);
    }
}
