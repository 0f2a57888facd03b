//! Candidate slot generation from an agent's working schedule.
//!
//! All window math happens in the agent's own timezone and is converted to
//! UTC at the edge. The generated sequence is finite by construction: bounded
//! to a single day, or to a fixed lookahead when scanning forward.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc, Weekday};
use chrono_tz::Tz;
use openhouse_domain::{Agent, OpenHouseError, Result};

/// A candidate meeting window, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// An agent's working calendar, parsed and validated once per booking
/// attempt.
#[derive(Debug, Clone)]
pub struct WorkSchedule {
    working_days: Vec<Weekday>,
    start: NaiveTime,
    end: NaiveTime,
    meeting_duration: Duration,
    buffer: Duration,
    timezone: Tz,
}

impl WorkSchedule {
    pub fn for_agent(agent: &Agent) -> Result<Self> {
        let timezone: Tz = agent.timezone.parse().map_err(|_| {
            OpenHouseError::InvalidInput(format!("unknown timezone: {}", agent.timezone))
        })?;
        let working_days = agent.working_days.iter().filter_map(|d| parse_weekday(d)).collect();

        Ok(Self {
            working_days,
            start: agent.working_hours.start,
            end: agent.working_hours.end,
            meeting_duration: agent.meeting_duration(),
            buffer: agent.buffer(),
            timezone,
        })
    }

    pub fn meeting_duration(&self) -> Duration {
        self.meeting_duration
    }

    /// Ordered candidate windows for one calendar day.
    ///
    /// Empty when the weekday is outside the working set, or when the
    /// working-hours range is malformed (end <= start). The cursor advances
    /// by `meeting_duration + buffer` per emission, so the step is checked to
    /// be positive before looping.
    pub fn windows_for_day(&self, date: NaiveDate) -> Vec<TimeWindow> {
        if !self.working_days.contains(&date.weekday()) {
            return Vec::new();
        }
        if self.end <= self.start {
            return Vec::new();
        }
        let step = self.meeting_duration + self.buffer;
        if step <= Duration::zero() || self.meeting_duration <= Duration::zero() {
            return Vec::new();
        }

        let day_end = date.and_time(self.end);
        let mut cursor = date.and_time(self.start);
        let mut windows = Vec::new();
        loop {
            let window_end = cursor + self.meeting_duration;
            if window_end > day_end {
                break;
            }
            if let Some(window) = self.localize(cursor, window_end) {
                windows.push(window);
            }
            cursor += step;
        }
        windows
    }

    /// Ordered candidate windows strictly after `after`, scanning up to
    /// `lookahead_days` working days forward from `after`'s local date.
    pub fn windows_from(&self, after: DateTime<Utc>, lookahead_days: u32) -> Vec<TimeWindow> {
        let local_start = after.with_timezone(&self.timezone).date_naive();
        let mut windows = Vec::new();
        for offset in 0..=i64::from(lookahead_days) {
            let date = local_start + Duration::days(offset);
            for window in self.windows_for_day(date) {
                if window.start > after {
                    windows.push(window);
                }
            }
        }
        windows
    }

    /// Resolve a local window to UTC. Ambiguous local times (DST fall-back)
    /// take the earliest mapping; nonexistent local times (spring-forward
    /// gap) are skipped.
    fn localize(&self, start: NaiveDateTime, end: NaiveDateTime) -> Option<TimeWindow> {
        use chrono::TimeZone;

        let start = self.timezone.from_local_datetime(&start).earliest()?;
        let end = self.timezone.from_local_datetime(&end).earliest()?;
        Some(TimeWindow { start: start.with_timezone(&Utc), end: end.with_timezone(&Utc) })
    }
}

/// Parse a weekday name. Accepts full names and three-letter abbreviations,
/// case-insensitively.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    match name.trim().to_ascii_lowercase().as_str() {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}
