//! Appointment book and slot validation.
//!
//! The book is the in-process stand-in for the external persistence layer:
//! it answers the day/room queries the grid renders from, and it applies
//! the single `MoveRequest` emitted by a committed drop. Conflict and
//! business-hours checks for drops live here too, so every entry point
//! (drag-drop, dialogs) validates the same way.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

use crate::models::appointment::{Appointment, RoomId};
use crate::models::clinic::ClinicConfig;
use crate::services::schedule;
use crate::utils::time::minutes_from_midnight;

/// The one mutation a finished drag emits.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveRequest {
    pub appointment_id: i64,
    pub new_date: NaiveDate,
    pub new_start_time: NaiveTime,
    pub new_room_id: RoomId,
}

/// External mutation endpoint, final authority on conflicts.
pub trait MoveSink {
    fn submit_move(&mut self, request: MoveRequest);
}

/// Why a drop target was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("target day is closed")]
    NotBusinessDay,
    #[error("start time is outside business hours")]
    OutsideBusinessHours,
    #[error("appointment would end after closing time")]
    EndsAfterClose,
    #[error("slot is already taken by {client}")]
    Conflict { client: String },
}

/// In-memory collection of appointments with id assignment.
#[derive(Debug, Default)]
pub struct AppointmentBook {
    appointments: Vec<Appointment>,
    next_id: i64,
}

impl AppointmentBook {
    pub fn new() -> Self {
        Self {
            appointments: Vec::new(),
            next_id: 1,
        }
    }

    /// Insert an appointment, assigning it an id. Invalid records are
    /// refused rather than stored half-formed.
    pub fn add(&mut self, mut appointment: Appointment) -> Result<i64, String> {
        appointment.validate()?;
        let id = self.next_id;
        self.next_id += 1;
        appointment.id = Some(id);
        self.appointments.push(appointment);
        Ok(id)
    }

    pub fn get(&self, id: i64) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == Some(id))
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    /// Appointments on `date` in `room`, ordered by start time.
    pub fn for_day_and_room(&self, date: NaiveDate, room_id: &RoomId) -> Vec<&Appointment> {
        let mut found: Vec<&Appointment> = self
            .appointments
            .iter()
            .filter(|a| a.date == date && &a.room_id == room_id)
            .collect();
        found.sort_by_key(|a| a.start_time);
        found
    }

    /// Validate a candidate slot for an appointment of `duration_minutes`.
    ///
    /// Checks, in order: the day is open, the start lies within hours, the
    /// end does not run past closing, and no same-day same-room appointment
    /// overlaps the target range. `exclude_id` exempts the appointment being
    /// moved from the overlap scan.
    pub fn validate_slot(
        &self,
        date: NaiveDate,
        start_time: NaiveTime,
        duration_minutes: i64,
        room_id: &RoomId,
        exclude_id: Option<i64>,
        clinic: &ClinicConfig,
    ) -> Result<(), RejectReason> {
        let Some(hours) = schedule::business_hours(date, clinic) else {
            return Err(RejectReason::NotBusinessDay);
        };

        let start = minutes_from_midnight(start_time);
        let end = start + duration_minutes as i32;
        if start < hours.open_minutes() || start >= hours.close_minutes() {
            return Err(RejectReason::OutsideBusinessHours);
        }
        if end > hours.close_minutes() {
            return Err(RejectReason::EndsAfterClose);
        }

        for other in self.for_day_and_room(date, room_id) {
            if other.id == exclude_id {
                continue;
            }
            // Two ranges overlap when startA < endB && endA > startB.
            if start < other.end_minutes() && end > other.start_minutes() {
                return Err(RejectReason::Conflict {
                    client: other.client_name.clone(),
                });
            }
        }

        Ok(())
    }

    /// Apply a committed move. Unknown ids are logged and ignored; the
    /// external endpoint is the final authority, so a stale id is not fatal.
    pub fn apply_move(&mut self, request: &MoveRequest) {
        match self
            .appointments
            .iter_mut()
            .find(|a| a.id == Some(request.appointment_id))
        {
            Some(appointment) => {
                appointment.date = request.new_date;
                appointment.start_time = request.new_start_time;
                appointment.room_id = request.new_room_id.clone();
                log::info!(
                    "Moved appointment {} to {} {} room {}",
                    request.appointment_id,
                    request.new_date,
                    request.new_start_time.format("%H:%M"),
                    request.new_room_id
                );
            }
            None => {
                log::warn!(
                    "Move request for unknown appointment {}",
                    request.appointment_id
                );
            }
        }
    }
}

impl MoveSink for AppointmentBook {
    fn submit_move(&mut self, request: MoveRequest) {
        self.apply_move(&request);
    }
}

/// Seed bookings so a fresh profile shows a realistic day.
pub fn seed_demo_appointments(book: &mut AppointmentBook, date: NaiveDate) {
    let entries = [
        ("Lucia Fernandez", "Facial cleansing", "room-1", (10, 0), 45, "#7c3aed"),
        ("Marta Ruiz", "Laser session", "room-3", (11, 30), 60, "#f59e0b"),
        ("Carmen Ortega", "Consultation", "room-2", (12, 15), 30, "#0ea5e9"),
        ("Ana Belen", "Massage", "room-1", (16, 0), 90, "#10b981"),
    ];
    for (client, service, room, (h, m), duration, color) in entries {
        let appointment = Appointment::new(
            client,
            RoomId::from(room),
            date,
            NaiveTime::from_hms_opt(h, m, 0).expect("valid seed time"),
            duration,
        )
        .expect("valid seed appointment")
        .with_service(service)
        .with_color(color);
        if let Err(err) = book.add(appointment) {
            log::warn!("Skipping demo appointment for {client}: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2026-03-09 is a Monday (09:00-20:00 under default hours)
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn book_with_one(start: NaiveTime, duration: i64) -> (AppointmentBook, i64) {
        let mut book = AppointmentBook::new();
        let id = book
            .add(
                Appointment::new("Alice", RoomId::from("room-1"), monday(), start, duration)
                    .unwrap(),
            )
            .unwrap();
        (book, id)
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let (mut book, first) = book_with_one(time(9, 0), 30);
        let second = book
            .add(
                Appointment::new("Bob", RoomId::from("room-2"), monday(), time(10, 0), 30)
                    .unwrap(),
            )
            .unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_for_day_and_room_sorted() {
        let mut book = AppointmentBook::new();
        for (name, start) in [("Late", time(15, 0)), ("Early", time(9, 30))] {
            book.add(
                Appointment::new(name, RoomId::from("room-1"), monday(), start, 30).unwrap(),
            )
            .unwrap();
        }
        let day = book.for_day_and_room(monday(), &RoomId::from("room-1"));
        assert_eq!(day[0].client_name, "Early");
        assert_eq!(day[1].client_name, "Late");
    }

    #[test]
    fn test_validate_slot_detects_overlap() {
        let clinic = ClinicConfig::default();
        let (book, _) = book_with_one(time(10, 0), 60);
        let err = book
            .validate_slot(monday(), time(10, 30), 30, &RoomId::from("room-1"), None, &clinic)
            .unwrap_err();
        assert_eq!(
            err,
            RejectReason::Conflict {
                client: "Alice".to_string()
            }
        );
    }

    #[test]
    fn test_validate_slot_adjacent_ranges_do_not_conflict() {
        let clinic = ClinicConfig::default();
        let (book, _) = book_with_one(time(10, 0), 60);
        assert!(book
            .validate_slot(monday(), time(11, 0), 30, &RoomId::from("room-1"), None, &clinic)
            .is_ok());
        assert!(book
            .validate_slot(monday(), time(9, 30), 30, &RoomId::from("room-1"), None, &clinic)
            .is_ok());
    }

    #[test]
    fn test_validate_slot_excludes_moved_appointment() {
        let clinic = ClinicConfig::default();
        let (book, id) = book_with_one(time(10, 0), 60);
        assert!(book
            .validate_slot(
                monday(),
                time(10, 15),
                60,
                &RoomId::from("room-1"),
                Some(id),
                &clinic
            )
            .is_ok());
    }

    #[test]
    fn test_validate_slot_other_room_is_free() {
        let clinic = ClinicConfig::default();
        let (book, _) = book_with_one(time(10, 0), 60);
        assert!(book
            .validate_slot(monday(), time(10, 15), 30, &RoomId::from("room-2"), None, &clinic)
            .is_ok());
    }

    #[test]
    fn test_validate_slot_business_hour_bounds() {
        let clinic = ClinicConfig::default();
        let book = AppointmentBook::new();
        let room = RoomId::from("room-1");
        assert_eq!(
            book.validate_slot(monday(), time(8, 30), 30, &room, None, &clinic),
            Err(RejectReason::OutsideBusinessHours)
        );
        assert_eq!(
            book.validate_slot(monday(), time(19, 45), 30, &room, None, &clinic),
            Err(RejectReason::EndsAfterClose)
        );
        let sunday = NaiveDate::from_ymd_opt(2026, 3, 8).unwrap();
        assert_eq!(
            book.validate_slot(sunday, time(10, 0), 30, &room, None, &clinic),
            Err(RejectReason::NotBusinessDay)
        );
    }

    #[test]
    fn test_apply_move_updates_all_fields() {
        let (mut book, id) = book_with_one(time(10, 0), 60);
        let request = MoveRequest {
            appointment_id: id,
            new_date: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
            new_start_time: time(12, 0),
            new_room_id: RoomId::from("room-2"),
        };
        book.apply_move(&request);
        let moved = book.get(id).unwrap();
        assert_eq!(moved.date, request.new_date);
        assert_eq!(moved.start_time, request.new_start_time);
        assert_eq!(moved.room_id, request.new_room_id);
    }

    #[test]
    fn test_apply_move_unknown_id_is_ignored() {
        let (mut book, _) = book_with_one(time(10, 0), 60);
        let before = book.appointments.clone();
        book.apply_move(&MoveRequest {
            appointment_id: 999,
            new_date: monday(),
            new_start_time: time(12, 0),
            new_room_id: RoomId::from("room-2"),
        });
        assert_eq!(book.appointments, before);
    }

    #[test]
    fn test_seed_demo_appointments() {
        let mut book = AppointmentBook::new();
        seed_demo_appointments(&mut book, monday());
        assert_eq!(book.len(), 4);
        assert_eq!(book.for_day_and_room(monday(), &RoomId::from("room-1")).len(), 2);
    }
}
