//! Minimal booking dialog for click-to-create.
//!
//! Opened with the snapped slot the user clicked; collects client name,
//! service label, and duration, then hands a validated appointment back to
//! the app shell.

use crate::models::appointment::Appointment;
use crate::ui_egui::views::CreateRequest;
use crate::utils::time::format_hhmm;

#[derive(Debug, PartialEq, Eq)]
pub enum BookingDialogAction {
    None,
    Save,
    Cancel,
}

pub struct BookingDialog {
    pub request: CreateRequest,
    pub client_name: String,
    pub service: String,
    pub duration_minutes: i64,
}

impl BookingDialog {
    pub fn new(request: CreateRequest) -> Self {
        Self {
            request,
            client_name: String::new(),
            service: String::new(),
            duration_minutes: 30,
        }
    }

    pub fn show(&mut self, ctx: &egui::Context) -> BookingDialogAction {
        let mut action = BookingDialogAction::None;
        let title = format!(
            "New appointment · {} {}",
            self.request.date.format("%d/%m/%Y"),
            format_hhmm(self.request.time)
        );

        egui::Window::new(title)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                egui::Grid::new("booking_fields")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Client");
                        ui.text_edit_singleline(&mut self.client_name);
                        ui.end_row();

                        ui.label("Service");
                        ui.text_edit_singleline(&mut self.service);
                        ui.end_row();

                        ui.label("Duration");
                        egui::ComboBox::from_id_source("booking_duration")
                            .selected_text(format!("{} min", self.duration_minutes))
                            .show_ui(ui, |ui| {
                                for minutes in [15, 30, 45, 60, 90] {
                                    ui.selectable_value(
                                        &mut self.duration_minutes,
                                        minutes,
                                        format!("{minutes} min"),
                                    );
                                }
                            });
                        ui.end_row();
                    });

                ui.separator();
                ui.horizontal(|ui| {
                    let can_save = !self.client_name.trim().is_empty();
                    if ui
                        .add_enabled(can_save, egui::Button::new("Save"))
                        .clicked()
                    {
                        action = BookingDialogAction::Save;
                    }
                    if ui.button("Cancel").clicked() {
                        action = BookingDialogAction::Cancel;
                    }
                });
            });

        action
    }

    pub fn to_appointment(&self) -> Result<Appointment, String> {
        Ok(Appointment::new(
            self.client_name.trim(),
            self.request.room_id.clone(),
            self.request.date,
            self.request.time,
            self.duration_minutes,
        )?
        .with_service(self.service.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::appointment::RoomId;
    use chrono::{NaiveDate, NaiveTime};

    #[test]
    fn test_to_appointment_carries_slot() {
        let mut dialog = BookingDialog::new(CreateRequest {
            date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
            time: NaiveTime::from_hms_opt(10, 35, 0).unwrap(),
            room_id: RoomId::from("room-2"),
        });
        dialog.client_name = "  Alice  ".to_string();
        dialog.duration_minutes = 45;

        let appointment = dialog.to_appointment().unwrap();
        assert_eq!(appointment.client_name, "Alice");
        assert_eq!(appointment.room_id, RoomId::from("room-2"));
        assert_eq!(
            appointment.start_time,
            NaiveTime::from_hms_opt(10, 35, 0).unwrap()
        );
        assert_eq!(appointment.duration_minutes, 45);
    }

    #[test]
    fn test_to_appointment_requires_client() {
        let dialog = BookingDialog::new(CreateRequest {
            date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            room_id: RoomId::from("room-1"),
        });
        assert!(dialog.to_appointment().is_err());
    }
}
