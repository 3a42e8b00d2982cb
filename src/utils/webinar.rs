use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

pub const WEBINAR_TZ: Tz = chrono_tz::America::Sao_Paulo;

pub const WEBINAR_TITLE: &str = "Do Inbound Tumultuado ao Comercial Qualificado";
pub const DURATION_MINUTES: u32 = 45;
pub const TOTAL_SPOTS: u32 = 33;
pub const FILLED_SPOTS: u32 = 25;

const WEEKDAYS: [&str; 7] = ["Domingo", "Segunda", "Terça", "Quarta", "Quinta", "Sexta", "Sábado"];
const WEEKDAYS_LONG: [&str; 7] = [
    "domingo",
    "segunda-feira",
    "terça-feira",
    "quarta-feira",
    "quinta-feira",
    "sexta-feira",
    "sábado",
];
const MONTHS: [&str; 12] = ["jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez"];
const MONTHS_LONG: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Date and time of the next session, in the webinar's local time.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WebinarSchedule {
    pub ano: i32,
    pub mes: u32,
    pub dia: u32,
    pub hora: u32,
    pub minuto: u32,
}

impl Default for WebinarSchedule {
    fn default() -> Self {
        WebinarSchedule {
            ano: 2025,
            mes: 11,
            dia: 26,
            hora: 19,
            minuto: 0,
        }
    }
}

impl WebinarSchedule {
    fn naive(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.ano, self.mes, self.dia)?.and_hms_opt(self.hora, self.minuto, 0)
    }

    pub fn is_valid(&self) -> bool {
        self.naive().is_some()
    }

    /// The configured instant. An impossible date (31/02, hour 25, ...) falls
    /// back to the default schedule.
    pub fn datetime(&self) -> DateTime<Tz> {
        self.naive()
            .or_else(|| WebinarSchedule::default().naive())
            .and_then(|naive| WEBINAR_TZ.from_local_datetime(&naive).earliest())
            .unwrap_or_else(|| WEBINAR_TZ.from_utc_datetime(&NaiveDateTime::default()))
    }

    pub fn time_label(&self) -> String {
        format!("{:02}:{:02}", self.hora, self.minuto)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeRemaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeRemaining {
    pub fn is_over(&self) -> bool {
        *self == TimeRemaining::default()
    }
}

/// Breakdown of the time left until `target`; all zero once it has passed.
pub fn time_remaining(target: DateTime<Utc>, now: DateTime<Utc>) -> TimeRemaining {
    let diff = target - now;
    if diff <= Duration::zero() {
        return TimeRemaining::default();
    }
    let total = diff.num_seconds();
    TimeRemaining {
        days: total / 86_400,
        hours: (total / 3_600) % 24,
        minutes: (total / 60) % 60,
        seconds: total % 60,
    }
}

/// "Hoje às 19:00", "Amanhã às 19:00" or "Quarta, 26 de nov às 19:00".
pub fn format_webinar_date(schedule: &WebinarSchedule, now: DateTime<Utc>) -> String {
    let when = schedule.datetime();
    let today = now.with_timezone(&WEBINAR_TZ).date_naive();
    let day = when.date_naive();
    let hour = when.format("%H:%M");

    if day == today {
        format!("Hoje às {}", hour)
    } else if Some(day) == today.succ_opt() {
        format!("Amanhã às {}", hour)
    } else {
        format!(
            "{}, {} de {} às {}",
            WEEKDAYS[when.weekday().num_days_from_sunday() as usize],
            when.day(),
            MONTHS[when.month0() as usize],
            hour
        )
    }
}

/// "quarta-feira, 26 de novembro às 19:00"
pub fn format_long_date(schedule: &WebinarSchedule) -> String {
    let when = schedule.datetime();
    format!(
        "{}, {} de {} às {}",
        WEEKDAYS_LONG[when.weekday().num_days_from_sunday() as usize],
        when.day(),
        MONTHS_LONG[when.month0() as usize],
        when.format("%H:%M")
    )
}

/// Countdown line shown after signup, refreshed once a minute.
pub fn thank_you_countdown(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let left = time_remaining(target, now);
    if left.is_over() {
        "Evento iniciado!".to_string()
    } else {
        format!("{}d {}h {}m", left.days, left.hours, left.minutes)
    }
}

pub fn remaining_spots() -> u32 {
    TOTAL_SPOTS.saturating_sub(FILLED_SPOTS)
}

pub fn filled_percentage() -> f64 {
    if TOTAL_SPOTS == 0 {
        return 0.0;
    }
    FILLED_SPOTS as f64 / TOTAL_SPOTS as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        WEBINAR_TZ
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn default_schedule_is_in_sao_paulo_time() {
        let when = WebinarSchedule::default().datetime();
        assert_eq!(when.with_timezone(&Utc), sp(2025, 11, 26, 19, 0));
        assert_eq!(when.with_timezone(&Utc).format("%H:%M").to_string(), "22:00");
    }

    #[test]
    fn invalid_dates_fall_back_to_the_default() {
        let schedule = WebinarSchedule {
            mes: 2,
            dia: 31,
            ..WebinarSchedule::default()
        };
        assert!(!schedule.is_valid());
        assert_eq!(schedule.datetime(), WebinarSchedule::default().datetime());
    }

    #[test]
    fn remaining_time_is_broken_down() {
        let target = sp(2025, 11, 26, 19, 0);
        let now = target - Duration::days(2) - Duration::hours(3) - Duration::minutes(4) - Duration::seconds(5);
        assert_eq!(
            time_remaining(target, now),
            TimeRemaining {
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5
            }
        );
    }

    #[test]
    fn countdown_never_goes_negative() {
        let target = sp(2025, 11, 26, 19, 0);
        for offset in [0, 1, 3_600, 86_400 * 400] {
            let left = time_remaining(target, target + Duration::seconds(offset));
            assert!(left.is_over());
            assert!(left.days >= 0 && left.hours >= 0 && left.minutes >= 0 && left.seconds >= 0);
        }
        assert_eq!(thank_you_countdown(target, target), "Evento iniciado!");
    }

    #[test]
    fn thank_you_countdown_drops_seconds() {
        let target = sp(2025, 11, 26, 19, 0);
        let now = target - Duration::hours(26) - Duration::seconds(59);
        assert_eq!(thank_you_countdown(target, now), "1d 2h 0m");
    }

    #[test]
    fn relative_day_labels() {
        let schedule = WebinarSchedule::default();
        assert_eq!(format_webinar_date(&schedule, sp(2025, 11, 26, 8, 0)), "Hoje às 19:00");
        assert_eq!(format_webinar_date(&schedule, sp(2025, 11, 25, 23, 59)), "Amanhã às 19:00");
        assert_eq!(format_webinar_date(&schedule, sp(2025, 11, 20, 10, 0)), "Quarta, 26 de nov às 19:00");
    }

    #[test]
    fn long_date_is_spelled_out() {
        assert_eq!(
            format_long_date(&WebinarSchedule::default()),
            "quarta-feira, 26 de novembro às 19:00"
        );
    }

    #[test]
    fn spots() {
        assert_eq!(remaining_spots(), 8);
        assert!((filled_percentage() - 75.757).abs() < 0.01);
    }
}
