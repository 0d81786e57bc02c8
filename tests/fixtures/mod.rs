// Test fixtures - reusable test data
// Provides consistent clinics and bookings across test files
#![allow(dead_code)]

use chrono::{NaiveDate, NaiveTime};

use clinic_agenda::models::appointment::{Appointment, RoomId};
use clinic_agenda::models::clinic::{ClinicConfig, DayHours, WeekHours};
use clinic_agenda::services::appointment::AppointmentBook;

/// Sample dates for testing
pub mod dates {
    use super::*;

    /// Monday, 9 March 2026
    pub fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
    }

    /// Tuesday, 10 March 2026
    pub fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 10).unwrap()
    }

    /// Sunday, 8 March 2026 (closed under default hours)
    pub fn sunday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 8).unwrap()
    }
}

pub fn time(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

pub fn room(id: &str) -> RoomId {
    RoomId::from(id)
}

/// Sample clinics for testing
pub mod clinics {
    use super::*;

    /// Default clinic: Mon-Fri 09:00-20:00, Sat 10:00-14:00, Sun closed.
    pub fn standard() -> ClinicConfig {
        ClinicConfig::default()
    }

    /// Clinic opening late (09:30) with an early close (17:00).
    pub fn late_opening() -> ClinicConfig {
        let hours = Some(DayHours::new(time(9, 30), time(17, 0)));
        ClinicConfig {
            hours: WeekHours {
                monday: hours,
                tuesday: hours,
                wednesday: hours,
                thursday: hours,
                friday: hours,
                saturday: None,
                sunday: None,
            },
            ..ClinicConfig::default()
        }
    }
}

/// A booked day: two appointments in room-1, one in room-2.
pub fn booked_monday() -> AppointmentBook {
    let mut book = AppointmentBook::new();
    for (client, service, room_id, start, duration) in [
        ("Alice", "Facial", "room-1", time(10, 0), 45i64),
        ("Bob", "Massage", "room-1", time(16, 0), 60),
        ("Carol", "Laser", "room-2", time(12, 0), 30),
    ] {
        book.add(
            Appointment::new(client, room(room_id), dates::monday(), start, duration)
                .unwrap()
                .with_service(service),
        )
        .unwrap();
    }
    book
}
