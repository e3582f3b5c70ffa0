use serde::{Deserialize, Serialize};
use time::{OffsetDateTime, Weekday};

/// Opening window for a single weekday. Times are zero-padded `HH:MM`
/// strings in the restaurant's local clock, which makes `[open, close)`
/// comparable lexicographically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    pub open: String,
    pub close: String,
    pub enabled: bool,
}

impl DayHours {
    fn new(open: &str, close: &str, enabled: bool) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
            enabled,
        }
    }
}

/// Weekly schedule, one entry per weekday. Stored as a single JSONB value
/// in `store_settings`; missing days fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessHours {
    pub monday: DayHours,
    pub tuesday: DayHours,
    pub wednesday: DayHours,
    pub thursday: DayHours,
    pub friday: DayHours,
    pub saturday: DayHours,
    pub sunday: DayHours,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            monday: DayHours::new("11:00", "23:00", true),
            tuesday: DayHours::new("11:00", "23:00", true),
            wednesday: DayHours::new("11:00", "23:00", true),
            thursday: DayHours::new("11:00", "23:00", true),
            friday: DayHours::new("11:00", "23:00", true),
            saturday: DayHours::new("11:00", "23:00", true),
            sunday: DayHours::new("11:00", "23:00", true),
        }
    }
}

impl BusinessHours {
    pub fn day(&self, weekday: Weekday) -> &DayHours {
        match weekday {
            Weekday::Monday => &self.monday,
            Weekday::Tuesday => &self.tuesday,
            Weekday::Wednesday => &self.wednesday,
            Weekday::Thursday => &self.thursday,
            Weekday::Friday => &self.friday,
            Weekday::Saturday => &self.saturday,
            Weekday::Sunday => &self.sunday,
        }
    }

    /// Rejects malformed times and windows that cross midnight. Keeping
    /// `close` strictly after `open` is what makes the lexicographic
    /// `[open, close)` check in [`evaluate`] exact; overnight schedules are
    /// not representable.
    pub fn validate(&self) -> anyhow::Result<()> {
        for weekday in ALL_WEEKDAYS {
            let day = self.day(weekday);
            let label = weekday_label(weekday);
            if !is_valid_hhmm(&day.open) {
                anyhow::bail!("horário de abertura inválido para {}: {:?}", label, day.open);
            }
            if !is_valid_hhmm(&day.close) {
                anyhow::bail!(
                    "horário de fechamento inválido para {}: {:?}",
                    label,
                    day.close
                );
            }
            if day.enabled && day.close.as_str() <= day.open.as_str() {
                anyhow::bail!(
                    "horário de {} não pode cruzar a meia-noite ({} às {})",
                    label,
                    day.open,
                    day.close
                );
            }
        }
        Ok(())
    }
}

/// Open/closed status derived from a schedule and the current time.
#[derive(Debug, Clone, Serialize)]
pub struct HoursStatus {
    pub is_open: bool,
    pub message: String,
    pub next_open: Option<NextOpen>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NextOpen {
    /// "hoje", "amanhã" or a weekday name.
    pub day: String,
    pub time: String,
}

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "segunda-feira",
        Weekday::Tuesday => "terça-feira",
        Weekday::Wednesday => "quarta-feira",
        Weekday::Thursday => "quinta-feira",
        Weekday::Friday => "sexta-feira",
        Weekday::Saturday => "sábado",
        Weekday::Sunday => "domingo",
    }
}

fn weekday_index(weekday: Weekday) -> usize {
    match weekday {
        Weekday::Monday => 0,
        Weekday::Tuesday => 1,
        Weekday::Wednesday => 2,
        Weekday::Thursday => 3,
        Weekday::Friday => 4,
        Weekday::Saturday => 5,
        Weekday::Sunday => 6,
    }
}

fn is_valid_hhmm(s: &str) -> bool {
    let bytes = s.as_bytes();
    if bytes.len() != 5 || bytes[2] != b':' {
        return false;
    }
    let digits = |r: &[u8]| r.iter().all(u8::is_ascii_digit);
    if !digits(&bytes[..2]) || !digits(&bytes[3..]) {
        return false;
    }
    s[..2].parse::<u8>().map(|h| h < 24).unwrap_or(false)
        && s[3..].parse::<u8>().map(|m| m < 60).unwrap_or(false)
}

/// Classifies `now` against the schedule. Enabled days are open during
/// `[open, close)`; outside that window (or on a disabled day) the next
/// enabled day is found by scanning forward, wrapping after seven days.
pub fn evaluate(hours: &BusinessHours, now: OffsetDateTime) -> HoursStatus {
    let hhmm = format!("{:02}:{:02}", now.hour(), now.minute());
    let today = hours.day(now.weekday());

    if today.enabled {
        if hhmm.as_str() >= today.open.as_str() && hhmm.as_str() < today.close.as_str() {
            return HoursStatus {
                is_open: true,
                message: format!("Aberto agora · fecha às {}", today.close),
                next_open: None,
            };
        }
        if hhmm.as_str() < today.open.as_str() {
            return HoursStatus {
                is_open: false,
                message: format!("Fechado · abre hoje às {}", today.open),
                next_open: Some(NextOpen {
                    day: "hoje".into(),
                    time: today.open.clone(),
                }),
            };
        }
    }

    // Today is disabled or already closed: look for the next enabled day.
    let start = weekday_index(now.weekday());
    for offset in 1..=7 {
        let weekday = ALL_WEEKDAYS[(start + offset) % 7];
        let day = hours.day(weekday);
        if !day.enabled {
            continue;
        }
        let label = if offset == 1 {
            "amanhã".to_string()
        } else {
            weekday_label(weekday).to_string()
        };
        return HoursStatus {
            is_open: false,
            message: format!("Fechado · abre {} às {}", label, day.open),
            next_open: Some(NextOpen {
                day: label,
                time: day.open.clone(),
            }),
        };
    }

    HoursStatus {
        is_open: false,
        message: "Fechado".into(),
        next_open: None,
    }
}

#[cfg(test)]
mod hours_tests {
    use super::*;
    use time::macros::datetime;

    fn default_hours() -> BusinessHours {
        BusinessHours::default()
    }

    #[test]
    fn open_within_window() {
        let hours = default_hours();
        // 2024-07-01 is a Monday.
        let status = evaluate(&hours, datetime!(2024-07-01 12:30 UTC));
        assert!(status.is_open);
        assert_eq!(status.message, "Aberto agora · fecha às 23:00");
        assert!(status.next_open.is_none());
    }

    #[test]
    fn close_boundary_is_exclusive() {
        let hours = default_hours();
        let last_minute = evaluate(&hours, datetime!(2024-07-01 22:59 UTC));
        assert!(last_minute.is_open);

        let at_close = evaluate(&hours, datetime!(2024-07-01 23:00 UTC));
        assert!(!at_close.is_open);
    }

    #[test]
    fn open_boundary_is_inclusive() {
        let hours = default_hours();
        let status = evaluate(&hours, datetime!(2024-07-01 11:00 UTC));
        assert!(status.is_open);
    }

    #[test]
    fn before_opening_reports_today() {
        let hours = default_hours();
        let status = evaluate(&hours, datetime!(2024-07-01 09:15 UTC));
        assert!(!status.is_open);
        assert_eq!(status.message, "Fechado · abre hoje às 11:00");
        let next = status.next_open.expect("next_open");
        assert_eq!(next.day, "hoje");
        assert_eq!(next.time, "11:00");
    }

    #[test]
    fn after_closing_reports_tomorrow() {
        let hours = default_hours();
        let status = evaluate(&hours, datetime!(2024-07-01 23:30 UTC));
        assert!(!status.is_open);
        let next = status.next_open.expect("next_open");
        assert_eq!(next.day, "amanhã");
        assert_eq!(next.time, "11:00");
    }

    #[test]
    fn disabled_day_scans_to_next_enabled() {
        let mut hours = default_hours();
        hours.tuesday.enabled = false;
        hours.wednesday.enabled = false;
        // Tuesday noon: tuesday and wednesday are off, thursday is next.
        let status = evaluate(&hours, datetime!(2024-07-02 12:00 UTC));
        assert!(!status.is_open);
        assert_eq!(status.message, "Fechado · abre quinta-feira às 11:00");
        let next = status.next_open.expect("next_open");
        assert_eq!(next.day, "quinta-feira");
    }

    #[test]
    fn next_open_is_never_a_disabled_day() {
        let mut hours = default_hours();
        hours.monday.enabled = false;
        hours.tuesday.enabled = false;
        hours.wednesday.enabled = false;
        hours.thursday.enabled = false;
        hours.friday.enabled = false;
        hours.sunday.enabled = false;
        // Sunday evening: only saturday remains enabled.
        let status = evaluate(&hours, datetime!(2024-07-07 20:00 UTC));
        let next = status.next_open.expect("next_open");
        assert_eq!(next.day, "sábado");
    }

    #[test]
    fn all_days_disabled_has_no_next_open() {
        let mut hours = default_hours();
        for day in [
            &mut hours.monday,
            &mut hours.tuesday,
            &mut hours.wednesday,
            &mut hours.thursday,
            &mut hours.friday,
            &mut hours.saturday,
            &mut hours.sunday,
        ] {
            day.enabled = false;
        }
        let status = evaluate(&hours, datetime!(2024-07-01 12:00 UTC));
        assert!(!status.is_open);
        assert_eq!(status.message, "Fechado");
        assert!(status.next_open.is_none());
    }

    #[test]
    fn wraps_past_sunday() {
        let mut hours = default_hours();
        hours.saturday.enabled = false;
        hours.sunday.enabled = false;
        // Saturday noon: next enabled day is monday, two days ahead.
        let status = evaluate(&hours, datetime!(2024-07-06 12:00 UTC));
        let next = status.next_open.expect("next_open");
        assert_eq!(next.day, "segunda-feira");
    }

    #[test]
    fn validate_accepts_defaults() {
        assert!(default_hours().validate().is_ok());
    }

    #[test]
    fn validate_rejects_overnight_window() {
        let mut hours = default_hours();
        hours.friday.open = "18:00".into();
        hours.friday.close = "02:00".into();
        let err = hours.validate().unwrap_err();
        assert!(err.to_string().contains("meia-noite"));
    }

    #[test]
    fn validate_rejects_malformed_time() {
        let mut hours = default_hours();
        hours.monday.open = "9:00".into();
        assert!(hours.validate().is_err());

        hours.monday.open = "25:00".into();
        assert!(hours.validate().is_err());

        hours.monday.open = "10:61".into();
        assert!(hours.validate().is_err());
    }

    #[test]
    fn disabled_day_with_overnight_times_is_tolerated() {
        let mut hours = default_hours();
        hours.sunday.enabled = false;
        hours.sunday.open = "18:00".into();
        hours.sunday.close = "02:00".into();
        assert!(hours.validate().is_ok());
    }
}
