//! Time grid rendering shared by the day and week views.
//!
//! Iterates rows of `slot_duration` minutes across the given columns and
//! delegates each cell to `grid_cell`. Also draws the current-time
//! indicator across today's columns.

use chrono::{Local, NaiveTime, Timelike};
use egui::{Stroke, Vec2};

use super::grid_cell::{render_time_cell, CellParams};
use super::{GridColumn, GridInteraction, COLUMN_SPACING, SLOT_HEIGHT, TIME_LABEL_WIDTH};
use crate::models::appointment::Appointment;
use crate::utils::time::{time_from_minutes, MINUTES_PER_DAY};

/// Render the full grid for `columns`.
pub fn render_time_grid(
    ui: &mut egui::Ui,
    params: &mut CellParams<'_>,
    columns: &[GridColumn],
    col_width: f32,
) -> GridInteraction {
    let mut result = GridInteraction::default();

    let slot_minutes = params.snap_move.slot_duration_minutes.clamp(5, 60);
    let rows = MINUTES_PER_DAY / slot_minutes;

    // Per-column appointment lists, fetched once per frame.
    let day_appointments: Vec<Vec<&Appointment>> = columns
        .iter()
        .map(|column| params.book.for_day_and_room(column.date, column.room_id()))
        .collect();

    // Remove vertical spacing between slots so time calculations are accurate
    ui.spacing_mut().item_spacing.y = 0.0;

    for row in 0..rows {
        let slot_start_minutes = row * slot_minutes;
        let slot_end_minutes = slot_start_minutes + slot_minutes;
        let slot_start = time_from_minutes(slot_start_minutes);
        let is_hour_start = slot_start_minutes % 60 == 0;

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;

            ui.allocate_ui_with_layout(
                Vec2::new(TIME_LABEL_WIDTH, SLOT_HEIGHT),
                egui::Layout::right_to_left(egui::Align::Center),
                |ui| {
                    if is_hour_start {
                        ui.add_space(5.0);
                        ui.label(
                            egui::RichText::new(format!("{:02}:00", slot_start_minutes / 60))
                                .size(12.0)
                                .color(params.palette.time_label),
                        );
                    }
                },
            );

            ui.add_space(COLUMN_SPACING);

            for (col_idx, column) in columns.iter().enumerate() {
                let mut starting: Vec<&Appointment> = Vec::new();
                let mut continuing: Vec<&Appointment> = Vec::new();
                for &appointment in &day_appointments[col_idx] {
                    let start = appointment.start_minutes();
                    let end = appointment.end_minutes();
                    if start >= slot_end_minutes || end <= slot_start_minutes {
                        continue;
                    }
                    if start >= slot_start_minutes {
                        starting.push(appointment);
                    } else {
                        continuing.push(appointment);
                    }
                }

                let cell_result = render_time_cell(
                    ui,
                    params,
                    column,
                    slot_start,
                    is_hour_start,
                    &starting,
                    &continuing,
                    col_width,
                );
                result.merge(cell_result);

                if col_idx < columns.len() - 1 {
                    ui.add_space(COLUMN_SPACING);
                }
            }
        });
    }

    draw_current_time_indicator(ui, columns, col_width, slot_minutes, params);

    result
}

/// Red line across today's columns at the current wall-clock time.
fn draw_current_time_indicator(
    ui: &mut egui::Ui,
    columns: &[GridColumn],
    col_width: f32,
    slot_minutes: i32,
    params: &CellParams<'_>,
) {
    let now = Local::now();
    let today = now.date_naive();
    let now_time: NaiveTime = now.time();

    let ppm = SLOT_HEIGHT / slot_minutes as f32;
    let minutes = (now_time.hour() * 60 + now_time.minute()) as f32;
    let y = ui.min_rect().top() + minutes * ppm;
    let left = ui.min_rect().left() + TIME_LABEL_WIDTH + COLUMN_SPACING;

    for (col_idx, column) in columns.iter().enumerate() {
        if column.date != today {
            continue;
        }
        let x_start = left + col_idx as f32 * (col_width + COLUMN_SPACING);
        let x_end = x_start + col_width;

        let painter = ui.painter();
        painter.circle_filled(
            egui::pos2(x_start - 4.0, y),
            3.0,
            params.palette.current_time,
        );
        painter.line_segment(
            [egui::pos2(x_start, y), egui::pos2(x_end, y)],
            Stroke::new(2.0, params.palette.current_time),
        );
    }
}
