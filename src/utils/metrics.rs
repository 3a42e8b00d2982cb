//! Aggregate queries over the analytics log for the admin dashboard.
//!
//! Every query is an independent linear scan over the in-memory data. Days
//! and hours are computed in the webinar's timezone.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::utils::analytics::{
    AnalyticsData, DeviceData, FormCompletion, FormStart, LocationData, Visit,
};

pub const LOCATION_LIMIT: usize = 10;
pub const LEADS_PER_PAGE: usize = 10;

const WEEKDAY_NAMES: [&str; 7] = ["Domingo", "Segunda", "Terça", "Quarta", "Quinta", "Sexta", "Sábado"];

const AGE_RANGES: [(&str, u32, u32); 6] = [
    ("18-24", 18, 24),
    ("25-34", 25, 34),
    ("35-44", 35, 44),
    ("45-54", 45, 54),
    ("55-64", 55, 64),
    ("65+", 65, 150),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Day, Period::Week, Period::Month];

    pub fn label(&self) -> &'static str {
        match self {
            Period::Day => "Dia atual",
            Period::Week => "Últimos 7 dias",
            Period::Month => "Últimos 30 dias",
        }
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            Period::Day => "Hoje",
            Period::Week => "Semana",
            Period::Month => "Mês",
        }
    }

    fn days_back(&self) -> i64 {
        match self {
            Period::Day => 0,
            Period::Week => 6,
            Period::Month => 29,
        }
    }
}

/// Inclusive millisecond bounds of a dashboard period.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PeriodRange {
    pub start: i64,
    pub end: i64,
    pub first_day: NaiveDate,
}

impl PeriodRange {
    pub fn contains(&self, timestamp: i64) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}

fn start_of_day(day: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let midnight = day.and_time(NaiveTime::MIN);
    tz.from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight))
}

fn local_time(timestamp: i64, tz: Tz) -> Option<DateTime<Tz>> {
    Utc.timestamp_millis_opt(timestamp)
        .single()
        .map(|dt| dt.with_timezone(&tz))
}

pub fn period_range(period: Period, now: DateTime<Utc>, tz: Tz) -> PeriodRange {
    let today = now.with_timezone(&tz).date_naive();
    let first_day = today - Duration::days(period.days_back());
    PeriodRange {
        start: start_of_day(first_day, tz).timestamp_millis(),
        end: now.timestamp_millis(),
        first_day,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Share {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeriesPoint {
    pub label: String,
    pub visits: usize,
    pub form_starts: usize,
    pub form_completions: usize,
    pub abandoned_forms: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedMetrics {
    pub total_visits: usize,
    pub total_form_starts: usize,
    pub total_form_completions: usize,
    pub abandoned_forms: i64,
    pub conversion_rate: f64,
    pub abandonment_rate: f64,
    /// Seconds.
    pub average_time_on_page: f64,
    /// Seconds.
    pub average_time_to_form_start: f64,
    /// Seconds.
    pub average_time_to_complete: f64,
    pub device_distribution: Vec<Share>,
    pub location_distribution: Vec<Share>,
    pub hour_distribution: Vec<Bucket>,
    pub day_of_week_distribution: Vec<Bucket>,
    pub gender_distribution: Vec<Share>,
    pub age_distribution: Vec<Share>,
}

/// The subset of the log that falls inside a period.
pub struct PeriodSlice<'a> {
    pub visits: Vec<&'a Visit>,
    pub form_starts: Vec<&'a FormStart>,
    pub form_completions: Vec<&'a FormCompletion>,
}

impl<'a> PeriodSlice<'a> {
    pub fn new(data: &'a AnalyticsData, range: &PeriodRange) -> Self {
        PeriodSlice {
            visits: data.visits.iter().filter(|v| range.contains(v.timestamp)).collect(),
            form_starts: data.form_starts.iter().filter(|f| range.contains(f.timestamp)).collect(),
            form_completions: data
                .form_completions
                .iter()
                .filter(|f| range.contains(f.timestamp))
                .collect(),
        }
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn average(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Groups by label, then sorts by count descending (ties alphabetical).
fn ranked_shares(labels: impl Iterator<Item = String>) -> Vec<Share> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total = 0;
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
        total += 1;
    }
    let mut shares: Vec<Share> = counts
        .into_iter()
        .map(|(label, count)| Share {
            label,
            count,
            percentage: percentage(count, total),
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count));
    shares
}

pub fn device_distribution(slice: &PeriodSlice) -> Vec<Share> {
    ranked_shares(
        slice
            .visits
            .iter()
            .filter_map(|v| v.device.as_ref())
            .map(|d| d.kind.label().to_string()),
    )
}

pub fn location_distribution(slice: &PeriodSlice, limit: usize) -> Vec<Share> {
    let mut shares = ranked_shares(
        slice
            .visits
            .iter()
            .filter_map(|v| v.location.as_ref())
            .map(LocationData::display),
    );
    shares.truncate(limit);
    shares
}

pub fn hour_distribution(slice: &PeriodSlice, tz: Tz) -> Vec<Bucket> {
    let mut counts = [0usize; 24];
    for visit in &slice.visits {
        if let Some(local) = local_time(visit.timestamp, tz) {
            counts[local.hour() as usize] += 1;
        }
    }
    counts
        .iter()
        .enumerate()
        .map(|(hour, count)| Bucket {
            label: format!("{:02}:00", hour),
            count: *count,
        })
        .collect()
}

pub fn day_of_week_distribution(slice: &PeriodSlice, tz: Tz) -> Vec<Bucket> {
    let mut counts = [0usize; 7];
    for visit in &slice.visits {
        if let Some(local) = local_time(visit.timestamp, tz) {
            counts[local.weekday().num_days_from_sunday() as usize] += 1;
        }
    }
    WEEKDAY_NAMES
        .iter()
        .zip(counts)
        .map(|(day, count)| Bucket {
            label: day.to_string(),
            count,
        })
        .collect()
}

pub fn gender_distribution(slice: &PeriodSlice) -> Vec<Share> {
    ranked_shares(
        slice
            .form_completions
            .iter()
            .filter_map(|f| f.gender)
            .map(|g| g.label().to_string()),
    )
}

/// Always returns all six ranges, in order. Ages outside 18..=150 are counted
/// in the total but in no range.
pub fn age_distribution(slice: &PeriodSlice) -> Vec<Share> {
    let ages: Vec<u32> = slice
        .form_completions
        .iter()
        .filter_map(|f| f.age)
        .filter(|age| *age > 0)
        .collect();
    AGE_RANGES
        .iter()
        .map(|(label, min, max)| {
            let count = ages.iter().filter(|a| (*min..=*max).contains(*a)).count();
            Share {
                label: label.to_string(),
                count,
                percentage: percentage(count, ages.len()),
            }
        })
        .collect()
}

pub fn calculate_metrics(data: &AnalyticsData, period: Period, now: DateTime<Utc>, tz: Tz) -> AggregatedMetrics {
    let range = period_range(period, now, tz);
    let slice = PeriodSlice::new(data, &range);

    let total_visits = slice.visits.len();
    let total_form_starts = slice.form_starts.len();
    let total_form_completions = slice.form_completions.len();
    let abandoned_forms = total_form_starts as i64 - total_form_completions as i64;

    let conversion_rate = percentage(total_form_completions, total_visits);
    let abandonment_rate = if total_form_starts > 0 {
        abandoned_forms as f64 / total_form_starts as f64 * 100.0
    } else {
        0.0
    };

    let average_time_on_page = average(slice.visits.iter().map(|v| v.time_on_page as f64));
    let average_time_to_form_start = average(
        slice
            .visits
            .iter()
            .filter(|v| v.form_started)
            .filter_map(|v| v.time_to_form_start)
            .filter(|ms| *ms != 0)
            .map(|ms| ms as f64),
    ) / 1000.0;
    let average_time_to_complete =
        average(slice.form_completions.iter().map(|f| f.time_to_complete as f64)) / 1000.0;

    AggregatedMetrics {
        total_visits,
        total_form_starts,
        total_form_completions,
        abandoned_forms,
        conversion_rate,
        abandonment_rate,
        average_time_on_page,
        average_time_to_form_start,
        average_time_to_complete,
        device_distribution: device_distribution(&slice),
        location_distribution: location_distribution(&slice, LOCATION_LIMIT),
        hour_distribution: hour_distribution(&slice, tz),
        day_of_week_distribution: day_of_week_distribution(&slice, tz),
        gender_distribution: gender_distribution(&slice),
        age_distribution: age_distribution(&slice),
    }
}

/// Chart buckets: hourly for the current day, daily for week and month.
pub fn time_series(data: &AnalyticsData, period: Period, now: DateTime<Utc>, tz: Tz) -> Vec<TimeSeriesPoint> {
    let range = period_range(period, now, tz);
    let slice = PeriodSlice::new(data, &range);

    let labels: Vec<String> = match period {
        Period::Day => (0..24).map(|h| format!("{:02}:00", h)).collect(),
        Period::Week | Period::Month => (0..=period.days_back())
            .map(|offset| (range.first_day + Duration::days(offset)).format("%d/%m").to_string())
            .collect(),
    };
    let mut points: Vec<TimeSeriesPoint> = labels
        .into_iter()
        .map(|label| TimeSeriesPoint {
            label,
            visits: 0,
            form_starts: 0,
            form_completions: 0,
            abandoned_forms: 0,
        })
        .collect();

    let bucket_of = |timestamp: i64| -> Option<usize> {
        let local = local_time(timestamp, tz)?;
        let index = match period {
            Period::Day => local.hour() as usize,
            Period::Week | Period::Month => {
                usize::try_from((local.date_naive() - range.first_day).num_days()).ok()?
            }
        };
        Some(index)
    };

    for visit in &slice.visits {
        if let Some(point) = bucket_of(visit.timestamp).and_then(|i| points.get_mut(i)) {
            point.visits += 1;
        }
    }
    for start in &slice.form_starts {
        if let Some(point) = bucket_of(start.timestamp).and_then(|i| points.get_mut(i)) {
            point.form_starts += 1;
            if !start.completed {
                point.abandoned_forms += 1;
            }
        }
    }
    for completion in &slice.form_completions {
        if let Some(point) = bucket_of(completion.timestamp).and_then(|i| points.get_mut(i)) {
            point.form_completions += 1;
        }
    }
    points
}

/// One row of the dashboard's lead table.
#[derive(Clone, Debug, PartialEq)]
pub struct LeadRow {
    pub id: String,
    pub timestamp: i64,
    pub access_hour: String,
    pub location: Option<LocationData>,
    pub device: Option<DeviceData>,
    pub time_to_complete: i64,
    pub gender: Option<&'static str>,
    pub age: Option<u32>,
}

/// Completions joined to their visit by session id, newest first.
pub fn lead_rows(data: &AnalyticsData, tz: Tz) -> Vec<LeadRow> {
    let mut rows: Vec<LeadRow> = data
        .form_completions
        .iter()
        .map(|completion| {
            let visit = data.visits.iter().find(|v| v.session_id == completion.session_id);
            let access_hour = completion.access_hour.clone().unwrap_or_else(|| {
                local_time(completion.timestamp, tz)
                    .map(|t| t.format("%d/%m/%Y, %H:%M").to_string())
                    .unwrap_or_default()
            });
            LeadRow {
                id: completion.id.clone(),
                timestamp: completion.timestamp,
                access_hour,
                location: completion
                    .location
                    .clone()
                    .or_else(|| visit.and_then(|v| v.location.clone())),
                device: completion
                    .device
                    .clone()
                    .or_else(|| visit.and_then(|v| v.device.clone())),
                time_to_complete: completion.time_to_complete,
                gender: completion.gender.map(|g| g.label()),
                age: completion.age,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    rows
}

pub fn filter_leads<'r>(rows: &'r [LeadRow], search: &str) -> Vec<&'r LeadRow> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return rows.iter().collect();
    }
    rows.iter()
        .filter(|row| {
            let location_hit = row.location.as_ref().map_or(false, |l| {
                l.city.to_lowercase().contains(&needle) || l.region.to_lowercase().contains(&needle)
            });
            let device_hit = row.device.as_ref().map_or(false, |d| {
                d.kind.as_str().contains(&needle) || d.browser.to_lowercase().contains(&needle)
            });
            location_hit || device_hit
        })
        .collect()
}

pub fn total_pages(items: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    (items + per_page - 1) / per_page
}

/// 1-based page slice; out-of-range pages are empty.
pub fn page<T>(items: &[T], page: usize, per_page: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(per_page);
    if start >= items.len() {
        return &[];
    }
    let end = (start + per_page).min(items.len());
    &items[start..end]
}

pub fn format_time(seconds: f64) -> String {
    let total = seconds.round().max(0.0) as i64;
    if total < 60 {
        return format!("{}s", total);
    }
    format!("{}m {}s", total / 60, total % 60)
}

pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::analytics::{DeviceType, Gender};
    use crate::utils::webinar::WEBINAR_TZ;

    /// Wednesday 2025-11-26 15:00 in São Paulo.
    fn now() -> DateTime<Utc> {
        WEBINAR_TZ
            .with_ymd_and_hms(2025, 11, 26, 15, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    fn ago(hours: i64) -> i64 {
        (now() - Duration::hours(hours)).timestamp_millis()
    }

    fn visit(id: &str, session: &str, timestamp: i64, kind: Option<DeviceType>, city: Option<&str>) -> Visit {
        Visit {
            id: id.into(),
            timestamp,
            session_id: session.into(),
            page_load_time: timestamp,
            time_on_page: 30,
            form_started: false,
            form_completed: false,
            time_to_form_start: None,
            time_to_form_complete: None,
            device: kind.map(|kind| DeviceData {
                kind,
                info: "x".into(),
                browser: "Chrome".into(),
            }),
            location: city.map(|c| LocationData {
                city: c.into(),
                region: "SP".into(),
                country: "Brasil".into(),
            }),
            access_hour: None,
        }
    }

    fn completion(session: &str, timestamp: i64, gender: Option<Gender>, age: Option<u32>) -> FormCompletion {
        FormCompletion {
            id: format!("c-{}", timestamp),
            timestamp,
            session_id: session.into(),
            time_to_complete: 90_000,
            location: None,
            device: None,
            access_hour: None,
            gender,
            age,
        }
    }

    fn sample() -> AnalyticsData {
        let mut started = visit("v1", "s1", ago(1), Some(DeviceType::Mobile), Some("Campinas"));
        started.form_started = true;
        started.time_to_form_start = Some(20_000);
        AnalyticsData {
            visits: vec![
                started,
                visit("v2", "s2", ago(2), Some(DeviceType::Desktop), Some("São Paulo")),
                visit("v3", "s3", ago(3), Some(DeviceType::Mobile), Some("Campinas")),
                visit("v4", "s4", ago(4), None, None),
                visit("v5", "s5", ago(24 * 3), Some(DeviceType::Tablet), Some("Santos")),
                visit("old", "s6", ago(24 * 40), Some(DeviceType::Desktop), None),
            ],
            form_starts: vec![
                FormStart { id: "f1".into(), timestamp: ago(1), session_id: "s1".into(), completed: true },
                FormStart { id: "f2".into(), timestamp: ago(2), session_id: "s2".into(), completed: false },
            ],
            form_completions: vec![
                completion("s1", ago(1), Some(Gender::Female), Some(29)),
                completion("s5", ago(24 * 3), Some(Gender::Male), Some(70)),
            ],
        }
    }

    #[test]
    fn period_ranges_start_at_local_midnight() {
        let day = period_range(Period::Day, now(), WEBINAR_TZ);
        let week = period_range(Period::Week, now(), WEBINAR_TZ);
        let month = period_range(Period::Month, now(), WEBINAR_TZ);
        assert_eq!(day.end, now().timestamp_millis());
        assert_eq!(now().timestamp_millis() - day.start, 15 * 3_600_000);
        assert_eq!(week.first_day, NaiveDate::from_ymd_opt(2025, 11, 20).unwrap());
        assert_eq!(month.first_day, NaiveDate::from_ymd_opt(2025, 10, 28).unwrap());
    }

    #[test]
    fn totals_and_rates_for_the_day() {
        let m = calculate_metrics(&sample(), Period::Day, now(), WEBINAR_TZ);
        assert_eq!(m.total_visits, 4);
        assert_eq!(m.total_form_starts, 2);
        assert_eq!(m.total_form_completions, 1);
        assert_eq!(m.abandoned_forms, 1);
        assert!((m.conversion_rate - 25.0).abs() < 1e-9);
        assert!((m.abandonment_rate - 50.0).abs() < 1e-9);
        assert!((m.average_time_on_page - 30.0).abs() < 1e-9);
        assert!((m.average_time_to_form_start - 20.0).abs() < 1e-9);
        assert!((m.average_time_to_complete - 90.0).abs() < 1e-9);
    }

    #[test]
    fn empty_log_yields_zero_rates() {
        let m = calculate_metrics(&AnalyticsData::default(), Period::Month, now(), WEBINAR_TZ);
        assert_eq!(m.total_visits, 0);
        assert_eq!(m.conversion_rate, 0.0);
        assert_eq!(m.abandonment_rate, 0.0);
        assert_eq!(m.average_time_on_page, 0.0);
        assert_eq!(m.hour_distribution.len(), 24);
        assert_eq!(m.age_distribution.len(), 6);
        assert!(m.age_distribution.iter().all(|s| s.percentage == 0.0));
    }

    #[test]
    fn distributions_sum_to_their_filtered_counts() {
        let data = sample();
        let m = calculate_metrics(&data, Period::Week, now(), WEBINAR_TZ);
        assert_eq!(m.total_visits, 5);

        let with_device: usize = m.device_distribution.iter().map(|s| s.count).sum();
        assert_eq!(with_device, 4);
        let pct: f64 = m.device_distribution.iter().map(|s| s.percentage).sum();
        assert!((pct - 100.0).abs() < 1e-9);

        assert_eq!(m.hour_distribution.iter().map(|b| b.count).sum::<usize>(), 5);
        assert_eq!(m.day_of_week_distribution.iter().map(|b| b.count).sum::<usize>(), 5);
        assert_eq!(m.gender_distribution.iter().map(|s| s.count).sum::<usize>(), 2);
        assert_eq!(m.age_distribution.iter().map(|s| s.count).sum::<usize>(), 2);
    }

    #[test]
    fn device_shares_are_ranked() {
        let m = calculate_metrics(&sample(), Period::Week, now(), WEBINAR_TZ);
        assert_eq!(m.device_distribution[0].label, "Mobile");
        assert_eq!(m.device_distribution[0].count, 2);
        assert!((m.device_distribution[0].percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn locations_are_top_n() {
        let data = sample();
        let range = period_range(Period::Week, now(), WEBINAR_TZ);
        let slice = PeriodSlice::new(&data, &range);
        let top = location_distribution(&slice, 1);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].label, "Campinas, SP");
        assert_eq!(top[0].count, 2);
    }

    #[test]
    fn hours_and_weekdays_use_local_time() {
        let m = calculate_metrics(&sample(), Period::Day, now(), WEBINAR_TZ);
        assert_eq!(m.hour_distribution[14].label, "14:00");
        assert_eq!(m.hour_distribution[14].count, 1);
        assert_eq!(m.hour_distribution[11].count, 1);
        assert_eq!(m.day_of_week_distribution[3].label, "Quarta");
        assert_eq!(m.day_of_week_distribution[3].count, 4);
    }

    #[test]
    fn gender_and_age_labels() {
        let m = calculate_metrics(&sample(), Period::Week, now(), WEBINAR_TZ);
        let labels: Vec<&str> = m.gender_distribution.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Feminino", "Masculino"]);
        assert_eq!(m.age_distribution[1].label, "25-34");
        assert_eq!(m.age_distribution[1].count, 1);
        assert_eq!(m.age_distribution[5].label, "65+");
        assert_eq!(m.age_distribution[5].count, 1);
    }

    #[test]
    fn week_series_has_seven_daily_buckets() {
        let series = time_series(&sample(), Period::Week, now(), WEBINAR_TZ);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].label, "20/11");
        assert_eq!(series[6].label, "26/11");
        assert_eq!(series[6].visits, 4);
        assert_eq!(series[6].form_starts, 2);
        assert_eq!(series[6].abandoned_forms, 1);
        assert_eq!(series[6].form_completions, 1);
        assert_eq!(series[3].visits, 1);
        assert_eq!(series.iter().map(|p| p.visits).sum::<usize>(), 5);
    }

    #[test]
    fn day_and_month_series_shapes() {
        assert_eq!(time_series(&sample(), Period::Day, now(), WEBINAR_TZ).len(), 24);
        let month = time_series(&sample(), Period::Month, now(), WEBINAR_TZ);
        assert_eq!(month.len(), 30);
        assert_eq!(month.iter().map(|p| p.visits).sum::<usize>(), 5);
    }

    #[test]
    fn leads_are_joined_sorted_searched_and_paged() {
        let rows = lead_rows(&sample(), WEBINAR_TZ);
        assert_eq!(rows.len(), 2);
        assert!(rows[0].timestamp > rows[1].timestamp);
        assert_eq!(rows[0].location.as_ref().unwrap().city, "Campinas");
        assert_eq!(rows[0].gender, Some("Feminino"));
        assert!(!rows[0].access_hour.is_empty());

        assert_eq!(filter_leads(&rows, "SANTOS").len(), 1);
        assert_eq!(filter_leads(&rows, "tablet").len(), 1);
        assert_eq!(filter_leads(&rows, "").len(), 2);
        assert!(filter_leads(&rows, "recife").is_empty());

        let items: Vec<u32> = (1..=23).collect();
        assert_eq!(total_pages(items.len(), LEADS_PER_PAGE), 3);
        assert_eq!(page(&items, 3, LEADS_PER_PAGE), &[21, 22, 23]);
        assert!(page(&items, 4, LEADS_PER_PAGE).is_empty());
    }

    #[test]
    fn time_and_percentage_formatting() {
        assert_eq!(format_time(42.4), "42s");
        assert_eq!(format_time(185.0), "3m 5s");
        assert_eq!(format_time(119.6), "2m 0s");
        assert_eq!(format_time(59.6), "1m 0s");
        assert_eq!(format_percentage(12.345), "12.3%");
    }
}
