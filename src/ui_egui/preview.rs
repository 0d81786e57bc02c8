//! Local preview adapter.
//!
//! Each grid cell asks one cheap question: "does the resolved drop position
//! land on me?" The answer is derived from the gesture store's resolved
//! `(date, room)`, never from raw pointer geometry, so hundreds of
//! subscribed cells stay passive while exactly one draws the ghost.

use chrono::{NaiveDate, NaiveTime};

use crate::models::appointment::RoomId;
use crate::ui_egui::drag::GestureState;
use crate::utils::time::minutes_from_midnight;

/// What the owning cell needs to draw the drop preview.
#[derive(Debug, Clone, PartialEq)]
pub struct CellPreview {
    pub appointment_id: i64,
    pub start_time: NaiveTime,
    pub duration_minutes: i64,
}

/// Preview for the cell column at `(date, room_id)`, if the resolved
/// position currently targets it.
pub fn preview_for_cell(
    state: &GestureState,
    date: NaiveDate,
    room_id: &RoomId,
) -> Option<CellPreview> {
    if !state.active {
        return None;
    }
    let item = state.dragged_item.as_ref()?;
    let position = state.current_position.as_ref()?;
    if position.date != date || &position.room_id != room_id {
        return None;
    }
    Some(CellPreview {
        appointment_id: item.id,
        start_time: position.time,
        duration_minutes: item.duration_minutes,
    })
}

/// Whether `(date, room_id)` is the current drop target.
pub fn is_drop_target(state: &GestureState, date: NaiveDate, room_id: &RoomId) -> bool {
    preview_for_cell(state, date, room_id).is_some()
}

/// Vertical pixel offset of `time` within the cell starting at `cell_time`,
/// or `None` when it falls outside `[cell_time, cell_time + slot)`. Of all
/// cells in the target column, exactly one gets `Some`.
pub fn offset_within_cell(
    time: NaiveTime,
    cell_time: NaiveTime,
    slot_duration_minutes: i32,
    cell_height: f32,
) -> Option<f32> {
    let minutes = minutes_from_midnight(time) - minutes_from_midnight(cell_time);
    if minutes < 0 || minutes >= slot_duration_minutes {
        return None;
    }
    Some(minutes as f32 / slot_duration_minutes as f32 * cell_height)
}
