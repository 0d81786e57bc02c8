// Appointment module
// Booking model rendered on the agenda grid and moved by drag gestures

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::utils::time::{minutes_from_midnight, time_from_minutes};

/// Identifier of a treatment room (cabin) within a clinic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub String);

impl RoomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A booked appointment occupying one room for a contiguous time range.
#[derive(Debug, Clone, PartialEq)]
pub struct Appointment {
    pub id: Option<i64>,
    pub client_name: String,
    pub service: String,
    pub room_id: RoomId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
    pub color: Option<String>,
}

impl Appointment {
    /// Create a new appointment with required fields
    ///
    /// # Arguments
    /// * `client_name` - Client display name (required, non-empty)
    /// * `room_id` - Target room
    /// * `date` - Appointment date
    /// * `start_time` - Start of the booked range
    /// * `duration_minutes` - Length of the booking (must be positive)
    pub fn new(
        client_name: impl Into<String>,
        room_id: RoomId,
        date: NaiveDate,
        start_time: NaiveTime,
        duration_minutes: i64,
    ) -> Result<Self, String> {
        let client_name = client_name.into();

        if client_name.trim().is_empty() {
            return Err("Appointment client name cannot be empty".to_string());
        }

        if duration_minutes <= 0 {
            return Err("Appointment duration must be positive".to_string());
        }

        Ok(Self {
            id: None,
            client_name,
            service: String::new(),
            room_id,
            date,
            start_time,
            duration_minutes,
            color: None,
        })
    }

    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = service.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Validate the appointment
    pub fn validate(&self) -> Result<(), String> {
        if self.client_name.trim().is_empty() {
            return Err("Appointment client name cannot be empty".to_string());
        }

        if self.duration_minutes <= 0 {
            return Err("Appointment duration must be positive".to_string());
        }

        // Validate color format if present (should be hex color)
        if let Some(ref color) = self.color {
            if !color.starts_with('#') || (color.len() != 7 && color.len() != 4) {
                return Err("Color must be in hex format (#RRGGBB or #RGB)".to_string());
            }
        }

        Ok(())
    }

    pub fn start_minutes(&self) -> i32 {
        minutes_from_midnight(self.start_time)
    }

    pub fn end_minutes(&self) -> i32 {
        self.start_minutes() + self.duration_minutes as i32
    }

    /// End of the booked range, capped at the end of the day.
    pub fn end_time(&self) -> NaiveTime {
        time_from_minutes(self.end_minutes())
    }
}
