//! Week view: the week's business days, one column per day, for the
//! active room.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use egui::ScrollArea;

use super::grid_cell::CellParams;
use super::time_grid::render_time_grid;
use super::{GridColumn, GridInteraction, COLUMN_SPACING, TIME_LABEL_WIDTH};
use crate::models::appointment::RoomId;
use crate::services::schedule;

/// Monday of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday();
    date.checked_sub_days(Days::new(offset as u64)).unwrap_or(date)
}

pub struct WeekView;

impl WeekView {
    pub fn render(
        ui: &mut egui::Ui,
        params: &mut CellParams<'_>,
        date: NaiveDate,
        active_room: &RoomId,
    ) -> GridInteraction {
        let Some(room) = params.clinic.room(active_room).cloned() else {
            ui.label("Selected room is not part of this clinic");
            return GridInteraction::default();
        };

        let monday = week_start(date);
        let columns: Vec<GridColumn> = (0..7)
            .filter_map(|offset| monday.checked_add_days(Days::new(offset)))
            .filter(|day| {
                // Saturdays/Sundays appear only when the clinic opens then.
                day.weekday().number_from_monday() <= 5
                    || schedule::is_business_day(*day, params.clinic)
            })
            .map(|day| GridColumn::new(day, room.clone()))
            .collect();

        let available = ui.available_width() - TIME_LABEL_WIDTH - COLUMN_SPACING;
        let col_width = (available / columns.len() as f32 - COLUMN_SPACING).max(80.0);

        ui.horizontal(|ui| {
            ui.add_space(TIME_LABEL_WIDTH + COLUMN_SPACING);
            for column in &columns {
                let open = schedule::is_business_day(column.date, params.clinic);
                let label = format!(
                    "{} {}",
                    weekday_abbrev(column.date.weekday()),
                    column.date.format("%d/%m")
                );
                ui.allocate_ui(egui::Vec2::new(col_width, 20.0), |ui| {
                    ui.centered_and_justified(|ui| {
                        let mut text = egui::RichText::new(label).size(12.0);
                        if open {
                            text = text.strong();
                        } else {
                            text = text.weak();
                        }
                        ui.label(text);
                    });
                });
                ui.add_space(COLUMN_SPACING);
            }
        });

        ScrollArea::vertical()
            .id_source("week_view_grid")
            .show(ui, |ui| render_time_grid(ui, params, &columns, col_width))
            .inner
    }
}

fn weekday_abbrev(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}
