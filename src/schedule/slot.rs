//! Daily posting slot computation in a fixed local time zone.

use crate::error::ApiError;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

pub const DEFAULT_ZONE: Tz = chrono_tz::America::New_York;
pub const DEFAULT_HOUR: u32 = 8;
pub const DEFAULT_MINUTE: u32 = 15;
pub const DEFAULT_HORIZON_DAYS: u32 = 366;

/// One slot per platform per local calendar day, at a fixed wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPolicy {
    zone: Tz,
    time: NaiveTime,
    horizon_days: u32,
}

impl Default for SlotPolicy {
    fn default() -> Self {
        Self {
            zone: DEFAULT_ZONE,
            time: NaiveTime::from_hms_opt(DEFAULT_HOUR, DEFAULT_MINUTE, 0)
                .unwrap_or(NaiveTime::MIN),
            horizon_days: DEFAULT_HORIZON_DAYS,
        }
    }
}

impl SlotPolicy {
    pub fn new(zone: Tz, hour: u32, minute: u32, horizon_days: u32) -> Result<Self, ApiError> {
        let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
            ApiError::ConfigError(format!("Invalid posting time {:02}:{:02}", hour, minute))
        })?;
        if horizon_days == 0 {
            return Err(ApiError::ConfigError(
                "Scheduling horizon must be at least one day".to_string(),
            ));
        }
        Ok(Self {
            zone,
            time,
            horizon_days,
        })
    }

    /// Parse an IANA zone name such as `America/New_York`.
    pub fn parse_zone(name: &str) -> Result<Tz, ApiError> {
        name.trim()
            .parse::<Tz>()
            .map_err(|e| ApiError::ConfigError(format!("Invalid timezone '{}': {}", name, e)))
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn horizon_days(&self) -> u32 {
        self.horizon_days
    }

    /// Calendar date of `instant` in the policy zone.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.zone).date_naive()
    }

    /// UTC instant of the slot on `date`.
    ///
    /// Ambiguous wall-clock times take the earlier instant; times inside a spring-forward
    /// gap move one hour later.
    pub fn slot_for(&self, date: NaiveDate) -> DateTime<Utc> {
        let naive = date.and_time(self.time);
        let resolved = self
            .zone
            .from_local_datetime(&naive)
            .earliest()
            .or_else(|| {
                self.zone
                    .from_local_datetime(&(naive + chrono::Duration::hours(1)))
                    .earliest()
            });
        match resolved {
            Some(t) => t.with_timezone(&Utc),
            None => Utc.from_utc_datetime(&naive),
        }
    }

    /// First date from today (in zone) whose slot is still ahead of `now` and not
    /// `occupied`. `None` only when the horizon is exhausted.
    pub fn next_free<F>(&self, now: DateTime<Utc>, occupied: F) -> Option<(NaiveDate, DateTime<Utc>)>
    where
        F: Fn(NaiveDate) -> bool,
    {
        let mut date = self.local_date(now);
        for _ in 0..self.horizon_days {
            let slot = self.slot_for(date);
            if slot > now && !occupied(date) {
                return Some((date, slot));
            }
            date = date.succ_opt()?;
        }
        None
    }
}
