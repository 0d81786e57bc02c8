//! Business-hours oracle.
//!
//! Read-only queries against a clinic's weekly hours table. The gesture
//! engine consults these to clamp resolved drag positions; nothing here
//! mutates clinic data.

use chrono::{Datelike, NaiveDate, NaiveTime};

use crate::models::clinic::ClinicConfig;
use crate::utils::time::minutes_from_midnight;

/// Open/close range for a concrete date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl BusinessHours {
    pub fn open_minutes(&self) -> i32 {
        minutes_from_midnight(self.open)
    }

    pub fn close_minutes(&self) -> i32 {
        minutes_from_midnight(self.close)
    }
}

/// Whether the clinic is open at all on `date`.
pub fn is_business_day(date: NaiveDate, clinic: &ClinicConfig) -> bool {
    if clinic.closed_dates.contains(&date) {
        return false;
    }
    clinic.hours.for_weekday(date.weekday()).is_some()
}

/// Open/close times for `date`, or `None` when the clinic is closed.
pub fn business_hours(date: NaiveDate, clinic: &ClinicConfig) -> Option<BusinessHours> {
    if clinic.closed_dates.contains(&date) {
        return None;
    }
    clinic
        .hours
        .for_weekday(date.weekday())
        .map(|day| BusinessHours {
            open: day.open,
            close: day.close,
        })
}

/// Whether `time` falls inside the open range `[open, close)` on `date`.
pub fn is_time_within_hours(date: NaiveDate, time: NaiveTime, clinic: &ClinicConfig) -> bool {
    match business_hours(date, clinic) {
        Some(hours) => time >= hours.open && time < hours.close,
        None => false,
    }
}
