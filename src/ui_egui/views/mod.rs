//! Agenda grid views.
//!
//! `day_view` shows one date with a column per room; `week_view` shows the
//! week's business days for the active room. Both delegate the hour x slot
//! loop to `time_grid` and per-cell work to `grid_cell`.

use chrono::{NaiveDate, NaiveTime};

use crate::models::appointment::RoomId;
use crate::models::clinic::Room;

pub mod appointment_rendering;
pub mod day_view;
mod grid_cell;
mod palette;
pub mod time_grid;
pub mod week_view;

pub use grid_cell::CellParams;
pub use palette::AgendaPalette;

/// Constants for time grid rendering
pub const TIME_LABEL_WIDTH: f32 = 50.0;
pub const COLUMN_SPACING: f32 = 1.0;
pub const SLOT_HEIGHT: f32 = 40.0;

/// One vertical lane of the grid: a concrete date in a concrete room.
#[derive(Debug, Clone, PartialEq)]
pub struct GridColumn {
    pub date: NaiveDate,
    pub room: Room,
}

impl GridColumn {
    pub fn new(date: NaiveDate, room: Room) -> Self {
        Self { date, room }
    }

    pub fn room_id(&self) -> &RoomId {
        &self.room.id
    }
}

/// Request to open the booking dialog for an empty slot.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateRequest {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub room_id: RoomId,
}

/// What the grid wants the app shell to do after this frame.
#[derive(Default)]
pub struct GridInteraction {
    /// Click on a free, in-hours position.
    pub create_request: Option<CreateRequest>,
    /// Appointment the user double-clicked.
    pub appointment_to_edit: Option<i64>,
}

impl GridInteraction {
    pub fn merge(&mut self, other: GridInteraction) {
        if other.create_request.is_some() {
            self.create_request = other.create_request;
        }
        if other.appointment_to_edit.is_some() {
            self.appointment_to_edit = other.appointment_to_edit;
        }
    }
}
