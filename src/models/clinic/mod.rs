// Clinic module
// Clinic identity, rooms, and the weekly business-hours table consumed
// (read-only) by the schedule oracle.

use chrono::{NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::models::appointment::RoomId;

/// "HH:MM" wire format for times inside schedule documents.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, "%H:%M").map_err(serde::de::Error::custom)
    }
}

/// Open/close range for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    #[serde(with = "hhmm")]
    pub open: NaiveTime,
    #[serde(with = "hhmm")]
    pub close: NaiveTime,
}

impl DayHours {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Self {
        Self { open, close }
    }
}

/// Weekly hours table; `None` marks a closed weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekHours {
    #[serde(default)]
    pub monday: Option<DayHours>,
    #[serde(default)]
    pub tuesday: Option<DayHours>,
    #[serde(default)]
    pub wednesday: Option<DayHours>,
    #[serde(default)]
    pub thursday: Option<DayHours>,
    #[serde(default)]
    pub friday: Option<DayHours>,
    #[serde(default)]
    pub saturday: Option<DayHours>,
    #[serde(default)]
    pub sunday: Option<DayHours>,
}

impl WeekHours {
    pub fn for_weekday(&self, weekday: Weekday) -> Option<DayHours> {
        match weekday {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }
}

impl Default for WeekHours {
    fn default() -> Self {
        let weekday = Some(DayHours::new(
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
        ));
        let saturday = Some(DayHours::new(
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            NaiveTime::from_hms_opt(14, 0, 0).unwrap(),
        ));
        Self {
            monday: weekday,
            tuesday: weekday,
            wednesday: weekday,
            thursday: weekday,
            friday: weekday,
            saturday,
            sunday: None,
        }
    }
}

/// A bookable room (cabin) inside a clinic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Clinic identity plus the data the agenda consumes: rooms and hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicConfig {
    pub id: String,
    pub name: String,
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub hours: WeekHours,
    /// Exceptional full-day closures (holidays), on top of the weekly table.
    #[serde(default)]
    pub closed_dates: Vec<NaiveDate>,
}

impl ClinicConfig {
    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| &room.id == id)
    }
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            id: "clinic-main".to_string(),
            name: "Main Clinic".to_string(),
            rooms: vec![
                Room {
                    id: RoomId::from("room-1"),
                    name: "Room 1".to_string(),
                    color: Some("#7c3aed".to_string()),
                },
                Room {
                    id: RoomId::from("room-2"),
                    name: "Room 2".to_string(),
                    color: Some("#0ea5e9".to_string()),
                },
                Room {
                    id: RoomId::from("room-3"),
                    name: "Laser".to_string(),
                    color: Some("#f59e0b".to_string()),
                },
            ],
            hours: WeekHours::default(),
            closed_dates: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_hours_lookup() {
        let hours = WeekHours::default();
        assert!(hours.for_weekday(Weekday::Mon).is_some());
        assert!(hours.for_weekday(Weekday::Sun).is_none());
        let saturday = hours.for_weekday(Weekday::Sat).unwrap();
        assert_eq!(saturday.open, NaiveTime::from_hms_opt(10, 0, 0).unwrap());
    }

    #[test]
    fn test_clinic_config_hhmm_round_trip() {
        let clinic = ClinicConfig::default();
        let json = serde_json::to_string(&clinic).unwrap();
        assert!(json.contains("\"09:00\""));
        let back: ClinicConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, clinic);
    }

    #[test]
    fn test_missing_weekday_deserializes_closed() {
        let json = r#"{
            "id": "c1",
            "name": "North",
            "rooms": [{"id": "r1", "name": "Room 1"}],
            "hours": {"monday": {"open": "08:00", "close": "15:00"}}
        }"#;
        let clinic: ClinicConfig = serde_json::from_str(json).unwrap();
        assert!(clinic.hours.for_weekday(Weekday::Mon).is_some());
        assert!(clinic.hours.for_weekday(Weekday::Tue).is_none());
        assert!(clinic.closed_dates.is_empty());
    }
}
