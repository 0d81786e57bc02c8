//! A single time cell of the agenda grid.
//!
//! Handles background/hours shading, appointment bars, the hover time
//! indicator, drag-over resolution into the gesture store, the drop
//! preview, and drag starts. Drops and Escape are finished by the app
//! shell, which owns the commit path.

use chrono::{Local, NaiveTime};
use egui::{CursorIcon, Pos2, Rect, Sense, Stroke, Vec2};

use super::appointment_rendering::{
    render_appointment_continuation, render_appointment_in_cell,
};
use super::{AgendaPalette, CreateRequest, GridColumn, GridInteraction, SLOT_HEIGHT};
use crate::models::appointment::Appointment;
use crate::models::clinic::ClinicConfig;
use crate::services::appointment::AppointmentBook;
use crate::services::schedule;
use crate::ui_egui::drag::{DraggedItem, GestureStore};
use crate::ui_egui::position::{
    resolve_hover_time, resolve_into_store, GridCell, SnapSettings,
};
use crate::ui_egui::preview::{offset_within_cell, preview_for_cell};
use crate::utils::time::{format_hhmm, minutes_from_midnight, time_from_minutes};

/// Shared references every cell needs; threaded through the grid loop.
pub struct CellParams<'a> {
    pub store: &'a mut GestureStore,
    pub book: &'a AppointmentBook,
    pub clinic: &'a ClinicConfig,
    pub snap_create: SnapSettings,
    pub snap_move: SnapSettings,
    pub palette: &'a AgendaPalette,
}

/// Render one cell of `column` covering `slot_start .. slot_start + slot`.
pub fn render_time_cell(
    ui: &mut egui::Ui,
    params: &mut CellParams<'_>,
    column: &GridColumn,
    slot_start: NaiveTime,
    is_hour_start: bool,
    starting: &[&Appointment],
    continuing: &[&Appointment],
    col_width: f32,
) -> GridInteraction {
    let mut result = GridInteraction::default();

    let slot_minutes = params.snap_move.slot_duration_minutes;
    let slot_start_minutes = minutes_from_midnight(slot_start);

    let desired_size = Vec2::new(col_width, SLOT_HEIGHT);
    let sense = Sense::click_and_drag().union(Sense::hover());
    let (rect, response) = ui.allocate_exact_size(desired_size, sense);

    let is_open = schedule::is_time_within_hours(column.date, slot_start, params.clinic);
    let is_today = column.date == Local::now().date_naive();

    let bg = if !is_open {
        params.palette.closed_bg
    } else if is_today {
        params.palette.today_bg
    } else {
        params.palette.open_bg
    };
    ui.painter().rect_filled(rect, 0.0, bg);

    let line_color = if is_hour_start {
        params.palette.hour_line
    } else {
        params.palette.slot_line
    };
    ui.painter().line_segment(
        [
            Pos2::new(rect.left(), rect.top()),
            Pos2::new(rect.right(), rect.top()),
        ],
        Stroke::new(1.0, line_color),
    );
    ui.painter().line_segment(
        [
            Pos2::new(rect.right(), rect.top()),
            Pos2::new(rect.right(), rect.bottom()),
        ],
        Stroke::new(1.0, params.palette.divider),
    );

    // Appointment bars. Hitboxes carry the minute distance from the
    // appointment's start to the drawn rect's top edge, so a grab anywhere
    // on a multi-slot bar yields the right offset.
    let dragged_id = params
        .store
        .state()
        .dragged_item
        .as_ref()
        .map(|item| item.id);
    let mut hitboxes: Vec<(Rect, &Appointment, i32)> = Vec::new();

    for &appointment in continuing {
        let is_dragged = appointment.id == dragged_id && dragged_id.is_some();
        let block = render_appointment_continuation(
            ui,
            rect,
            appointment,
            slot_start_minutes,
            slot_minutes,
            is_dragged,
        );
        hitboxes.push((
            block,
            appointment,
            slot_start_minutes - appointment.start_minutes(),
        ));
    }
    for &appointment in starting {
        let is_dragged = appointment.id == dragged_id && dragged_id.is_some();
        let bar = render_appointment_in_cell(
            ui,
            rect,
            appointment,
            slot_start_minutes,
            slot_minutes,
            is_dragged,
        );
        hitboxes.push((bar, appointment, 0));
    }

    let pointer_pos = response
        .interact_pointer_pos()
        .or_else(|| ui.input(|i| i.pointer.hover_pos()));
    let pointer_hit = pointer_pos.and_then(|pos| {
        hitboxes
            .iter()
            .rev()
            .find(|(bar, _, _)| bar.contains(pos))
            .copied()
    });

    let cell = GridCell::new(column.date, slot_start, column.room_id().clone());
    let ppm = rect.height() / slot_minutes as f32;

    if params.store.is_dragging() {
        // Drag in flight: this cell resolves the pointer into the store
        // whenever the pointer is over it. The store's idempotence check
        // makes re-entrant updates from neighbouring cells harmless.
        if let Some(pointer) = pointer_pos {
            if rect.contains(pointer) && is_open {
                params.store.update_pointer(pointer);
                resolve_into_store(
                    params.store,
                    &cell,
                    pointer.y - rect.top(),
                    rect.height(),
                    params.snap_move,
                    params.clinic,
                );
            }
            if rect.contains(pointer) {
                ui.output_mut(|out| out.cursor_icon = CursorIcon::Grabbing);
                ui.ctx().request_repaint();
            }
        }
    } else if response.hovered() && is_open {
        // Idle hover: show the create-granularity time under the cursor.
        if let Some(pointer) = pointer_pos {
            if let Some(hover_time) = resolve_hover_time(
                &cell,
                pointer.y - rect.top(),
                rect.height(),
                params.snap_create,
                params.clinic,
            ) {
                if pointer_hit.is_none() {
                    let y = rect.top()
                        + (minutes_from_midnight(hover_time) - slot_start_minutes) as f32 * ppm;
                    ui.painter().line_segment(
                        [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
                        Stroke::new(1.0, params.palette.hover_indicator),
                    );
                    ui.painter().text(
                        Pos2::new(rect.left() + 2.0, y),
                        egui::Align2::LEFT_CENTER,
                        format_hhmm(hover_time),
                        egui::FontId::proportional(9.0),
                        params.palette.hover_indicator,
                    );
                    ui.output_mut(|out| out.cursor_icon = CursorIcon::PointingHand);

                    if response.clicked() {
                        result.create_request = Some(CreateRequest {
                            date: column.date,
                            time: hover_time,
                            room_id: column.room_id().clone(),
                        });
                    }
                }
            }
        }
    }

    render_drop_preview(ui, params, column, rect, slot_start_minutes, slot_minutes, ppm);

    // Begin a gesture when a drag starts on an appointment bar.
    if response.drag_started() {
        if let (Some((bar, appointment, origin_minutes)), Some(pointer)) =
            (pointer_hit, response.interact_pointer_pos())
        {
            if let Some(item) = DraggedItem::from_appointment(appointment) {
                let grab_offset =
                    origin_minutes + ((pointer.y - bar.top()) / ppm).round() as i32;
                if params.store.start_drag(item, grab_offset.max(0)) {
                    ui.output_mut(|out| out.cursor_icon = CursorIcon::Grabbing);
                }
            }
        }
    }

    if response.double_clicked() {
        if let Some((_, appointment, _)) = pointer_hit {
            result.appointment_to_edit = appointment.id;
        }
    }

    result
}

/// Ghost of the dragged appointment at its resolved position. The cell
/// containing the resolved start draws the line + label; cells the ghost
/// spans afterwards draw only the fill.
fn render_drop_preview(
    ui: &mut egui::Ui,
    params: &mut CellParams<'_>,
    column: &GridColumn,
    rect: Rect,
    slot_start_minutes: i32,
    slot_minutes: i32,
    ppm: f32,
) {
    let Some(preview) = preview_for_cell(params.store.state(), column.date, column.room_id())
    else {
        return;
    };

    let start_minutes = minutes_from_midnight(preview.start_time);
    let end_minutes = start_minutes + preview.duration_minutes as i32;

    if let Some(y_offset) = offset_within_cell(
        preview.start_time,
        time_from_minutes(slot_start_minutes),
        slot_minutes,
        rect.height(),
    ) {
        let y = rect.top() + y_offset;
        let fill_bottom = (rect.top() + (end_minutes - slot_start_minutes) as f32 * ppm)
            .min(rect.bottom());
        ui.painter().rect_filled(
            Rect::from_min_max(
                Pos2::new(rect.left() + 1.0, y),
                Pos2::new(rect.right() - 1.0, fill_bottom),
            ),
            2.0,
            params.palette.preview_fill,
        );
        ui.painter().line_segment(
            [Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)],
            Stroke::new(2.0, params.palette.preview_line),
        );
        ui.painter().text(
            Pos2::new(rect.left() + 2.0, y - 1.0),
            egui::Align2::LEFT_BOTTOM,
            format_hhmm(preview.start_time),
            egui::FontId::proportional(10.0),
            params.palette.preview_line,
        );
    } else if start_minutes < slot_start_minutes && end_minutes > slot_start_minutes {
        let fill_bottom = (rect.top() + (end_minutes - slot_start_minutes) as f32 * ppm)
            .min(rect.bottom());
        ui.painter().rect_filled(
            Rect::from_min_max(
                Pos2::new(rect.left() + 1.0, rect.top()),
                Pos2::new(rect.right() - 1.0, fill_bottom),
            ),
            0.0,
            params.palette.preview_fill,
        );
    }
}
