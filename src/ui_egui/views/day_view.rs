//! Day view: one date, one column per room.

use chrono::NaiveDate;
use egui::ScrollArea;

use super::grid_cell::CellParams;
use super::time_grid::render_time_grid;
use super::{GridColumn, GridInteraction, COLUMN_SPACING, TIME_LABEL_WIDTH};
use crate::services::schedule;

pub struct DayView;

impl DayView {
    pub fn render(
        ui: &mut egui::Ui,
        params: &mut CellParams<'_>,
        date: NaiveDate,
    ) -> GridInteraction {
        let columns: Vec<GridColumn> = params
            .clinic
            .rooms
            .iter()
            .map(|room| GridColumn::new(date, room.clone()))
            .collect();

        if columns.is_empty() {
            ui.label("No rooms configured for this clinic");
            return GridInteraction::default();
        }

        let available = ui.available_width() - TIME_LABEL_WIDTH - COLUMN_SPACING;
        let col_width = (available / columns.len() as f32 - COLUMN_SPACING).max(80.0);

        // Column headers: room names.
        ui.horizontal(|ui| {
            ui.add_space(TIME_LABEL_WIDTH + COLUMN_SPACING);
            for column in &columns {
                ui.allocate_ui(egui::Vec2::new(col_width, 20.0), |ui| {
                    ui.centered_and_justified(|ui| {
                        ui.label(egui::RichText::new(&column.room.name).strong().size(12.0));
                    });
                });
                ui.add_space(COLUMN_SPACING);
            }
        });

        if !schedule::is_business_day(date, params.clinic) {
            ui.colored_label(
                egui::Color32::GRAY,
                format!("{} · clinic closed", date.format("%A %d %B")),
            );
        }

        ScrollArea::vertical()
            .id_source("day_view_grid")
            .show(ui, |ui| render_time_grid(ui, params, &columns, col_width))
            .inner
    }
}
