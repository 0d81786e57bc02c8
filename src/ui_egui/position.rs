//! Position resolver: pointer geometry in, calendar coordinates out.
//!
//! Converts a pointer offset inside one grid cell into the snapped,
//! clamped, business-hours-valid `(date, time, room)` the gesture store
//! adopts. The pixel-to-minute offset is deliberately *not* clamped to the
//! cell: negative and over-slot values reach the neighbouring cells' times,
//! which is what lets a drag glide across cell boundaries without a
//! dedicated listener per minute. All arithmetic after the single
//! pixel conversion is integer minutes.

use chrono::{NaiveDate, NaiveTime};

use crate::models::appointment::RoomId;
use crate::models::clinic::ClinicConfig;
use crate::services::schedule;
use crate::ui_egui::drag::{GestureStore, SlotPosition};
use crate::utils::time::{
    align_up_to_granularity, minutes_from_midnight, snap_to_granularity, time_from_minutes,
};

/// Nominal identity of one grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub room_id: RoomId,
}

impl GridCell {
    pub fn new(date: NaiveDate, time: NaiveTime, room_id: RoomId) -> Self {
        Self {
            date,
            time,
            room_id,
        }
    }

    pub fn start_minutes(&self) -> i32 {
        minutes_from_midnight(self.time)
    }
}

/// Snapping parameters active for the current gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapSettings {
    pub slot_duration_minutes: i32,
    pub granularity_minutes: i32,
}

/// Pointer Y offset within a cell, as whole minutes on the slot scale.
/// Unclamped: above-the-top pointers yield negative minutes, below-the-
/// bottom pointers exceed the slot. Round-half-away-from-zero.
pub fn pointer_minute_offset(offset_y: f32, cell_height: f32, slot_duration_minutes: i32) -> i32 {
    if cell_height <= 0.0 {
        return 0;
    }
    ((offset_y / cell_height) * slot_duration_minutes as f32).round() as i32
}

/// Resolve an appointment-start position from a pointer offset.
///
/// Subtracts the constant grab offset (the cursor marks a point *inside*
/// the item, not its start), snaps the absolute minute-of-day to the active
/// granularity, then clamps into the day's open window. A non-business day
/// resolves to `None`: the caller keeps its last valid position rather than
/// adopting an invalid one.
pub fn resolve_position(
    cell: &GridCell,
    offset_y: f32,
    cell_height: f32,
    grab_offset_minutes: i32,
    snap: SnapSettings,
    clinic: &ClinicConfig,
) -> Option<SlotPosition> {
    if !schedule::is_business_day(cell.date, clinic) {
        return None;
    }
    let hours = schedule::business_hours(cell.date, clinic)?;

    let minute_offset = pointer_minute_offset(offset_y, cell_height, snap.slot_duration_minutes);
    let cursor_minutes = cell.start_minutes() + minute_offset;
    let raw_start = cursor_minutes - grab_offset_minutes;

    let granularity = snap.granularity_minutes.max(1);
    let snapped = snap_to_granularity(raw_start, granularity);

    let open = hours.open_minutes();
    let close = hours.close_minutes();

    let mut minutes = snapped.max(0);
    if minutes < open {
        minutes = align_up_to_granularity(open, granularity);
    }
    if minutes >= close {
        minutes = close - granularity;
    }
    if minutes < open || minutes >= close {
        // Degenerate window narrower than one granularity step.
        return None;
    }

    Some(SlotPosition::new(
        cell.date,
        time_from_minutes(minutes),
        cell.room_id.clone(),
    ))
}

/// Resolve and feed the gesture store in one step. The store applies its
/// own no-op suppression, so calling this on every drag-over event is safe.
pub fn resolve_into_store(
    store: &mut GestureStore,
    cell: &GridCell,
    offset_y: f32,
    cell_height: f32,
    snap: SnapSettings,
    clinic: &ClinicConfig,
) -> Option<SlotPosition> {
    if !store.is_dragging() {
        return None;
    }
    let grab_offset = store.state().grab_offset_minutes;
    let resolved = resolve_position(cell, offset_y, cell_height, grab_offset, snap, clinic)?;
    store.update_current_position(
        resolved.date,
        resolved.time,
        resolved.room_id.clone(),
    );
    Some(resolved)
}

/// Snapped time under the cursor for hover feedback and click-to-create.
/// Unlike drag resolution the offset is confined to the hovered cell, so
/// the indicator never points outside it.
pub fn resolve_hover_time(
    cell: &GridCell,
    offset_y: f32,
    cell_height: f32,
    snap: SnapSettings,
    clinic: &ClinicConfig,
) -> Option<NaiveTime> {
    if !schedule::is_time_within_hours(cell.date, cell.time, clinic) {
        return None;
    }
    let granularity = snap.granularity_minutes.max(1);
    let offset = pointer_minute_offset(offset_y, cell_height, snap.slot_duration_minutes)
        .clamp(0, snap.slot_duration_minutes);
    let snapped = snap_to_granularity(offset, granularity).clamp(0, snap.slot_duration_minutes);
    Some(time_from_minutes(cell.start_minutes() + snapped))
}
