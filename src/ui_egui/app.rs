//! Application shell.
//!
//! Owns the gesture store, appointment book, and configuration services,
//! and wires the global parts of the gesture lifecycle: Escape cancels the
//! active drag synchronously, and a primary-button release commits the
//! drop after the grid has resolved its final position for the frame.

use std::sync::Arc;

use chrono::{Days, Local, NaiveDate};
use egui_extras::DatePickerButton;

use crate::models::appointment::RoomId;
use crate::models::clinic::ClinicConfig;
use crate::services::appointment::{seed_demo_appointments, AppointmentBook, MoveSink};
use crate::services::config::{GestureKind, GranularitySettings, ScheduleConfigService};
use crate::services::settings::{AppSettings, SettingsService};
use crate::ui_egui::booking_dialog::{BookingDialog, BookingDialogAction};
use crate::ui_egui::commit::{commit_drop, DropOutcome, SlotValidator};
use crate::ui_egui::drag::GestureStore;
use crate::ui_egui::position::SnapSettings;
use crate::ui_egui::views::day_view::DayView;
use crate::ui_egui::views::week_view::WeekView;
use crate::ui_egui::views::{AgendaPalette, CellParams, GridInteraction};
use crate::utils::time::format_hhmm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewType {
    Day,
    Week,
}

impl ViewType {
    fn as_str(&self) -> &'static str {
        match self {
            ViewType::Day => "Day",
            ViewType::Week => "Week",
        }
    }

    fn from_name(name: &str) -> Self {
        match name {
            "Week" => ViewType::Week,
            _ => ViewType::Day,
        }
    }
}

pub struct AgendaApp {
    settings_service: Option<SettingsService>,
    settings: AppSettings,
    config_service: Option<ScheduleConfigService>,
    /// Active clinic; the built-in default until the schedule document lands.
    clinic: Arc<ClinicConfig>,
    granularity: Arc<GranularitySettings>,
    granularity_loading: bool,
    book: AppointmentBook,
    store: GestureStore,
    current_view: ViewType,
    current_date: NaiveDate,
    active_room: RoomId,
    booking_dialog: Option<BookingDialog>,
    status: Option<String>,
}

impl AgendaApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings_service = SettingsService::default_path().map(SettingsService::new);
        let settings = settings_service
            .as_ref()
            .map(|service| service.load())
            .unwrap_or_default();

        if settings.theme == "dark" {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
        } else {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
        }

        let config_service = SettingsService::schedule_config_dir().and_then(|dir| {
            match ScheduleConfigService::new(dir) {
                Ok(mut service) => {
                    service.request(&settings.active_clinic);
                    Some(service)
                }
                Err(err) => {
                    log::error!("Schedule config service unavailable: {err:#}");
                    None
                }
            }
        });

        let clinic = Arc::new(ClinicConfig::default());
        let active_room = clinic
            .rooms
            .first()
            .map(|room| room.id.clone())
            .unwrap_or_else(|| RoomId::from("room-1"));

        let mut book = AppointmentBook::new();
        seed_demo_appointments(&mut book, Local::now().date_naive());

        Self {
            settings_service,
            current_view: ViewType::from_name(&settings.current_view),
            settings,
            config_service,
            clinic,
            granularity: Arc::new(GranularitySettings::default()),
            granularity_loading: false,
            book,
            store: GestureStore::new(),
            current_date: Local::now().date_naive(),
            active_room,
            booking_dialog: None,
            status: None,
        }
    }

    fn poll_configuration(&mut self) {
        let Some(service) = &mut self.config_service else {
            return;
        };
        service.poll();

        if let Some(clinic) = service.clinic(&self.settings.active_clinic) {
            if !Arc::ptr_eq(&self.clinic, &clinic) {
                self.clinic = clinic;
                if self.clinic.room(&self.active_room).is_none() {
                    if let Some(room) = self.clinic.rooms.first() {
                        self.active_room = room.id.clone();
                    }
                }
            }
        }

        let resolved = service.resolve(&self.settings.active_clinic);
        self.granularity = resolved.settings;
        self.granularity_loading = resolved.is_loading;
    }

    fn persist_settings(&mut self) {
        self.settings.current_view = self.current_view.as_str().to_string();
        if let Some(service) = &self.settings_service {
            if let Err(err) = service.save(&self.settings) {
                log::warn!("Failed to persist settings: {err:#}");
            }
        }
    }

    fn snap_settings(&self, kind: GestureKind) -> SnapSettings {
        SnapSettings {
            slot_duration_minutes: self.granularity.slot_duration_minutes as i32,
            granularity_minutes: self.granularity.granularity_for(kind) as i32,
        }
    }

    fn render_toolbar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("agenda_toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for view in [ViewType::Day, ViewType::Week] {
                    if ui
                        .selectable_label(self.current_view == view, view.as_str())
                        .clicked()
                        && self.current_view != view
                    {
                        self.current_view = view;
                        self.persist_settings();
                    }
                }
                ui.separator();

                let step = match self.current_view {
                    ViewType::Day => 1,
                    ViewType::Week => 7,
                };
                if ui.button("◀").clicked() {
                    if let Some(date) = self.current_date.checked_sub_days(Days::new(step)) {
                        self.current_date = date;
                    }
                }
                if ui.button("Today").clicked() {
                    self.current_date = Local::now().date_naive();
                }
                if ui.button("▶").clicked() {
                    if let Some(date) = self.current_date.checked_add_days(Days::new(step)) {
                        self.current_date = date;
                    }
                }
                ui.add(DatePickerButton::new(&mut self.current_date).id_source("agenda_date"));

                if self.current_view == ViewType::Week {
                    ui.separator();
                    let selected = self
                        .clinic
                        .room(&self.active_room)
                        .map(|room| room.name.clone())
                        .unwrap_or_else(|| self.active_room.to_string());
                    egui::ComboBox::from_id_source("active_room")
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            for room in &self.clinic.rooms {
                                ui.selectable_value(
                                    &mut self.active_room,
                                    room.id.clone(),
                                    &room.name,
                                );
                            }
                        });
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let theme_label = if self.settings.theme == "dark" {
                        "☀"
                    } else {
                        "🌙"
                    };
                    if ui.button(theme_label).clicked() {
                        self.settings.theme = if self.settings.theme == "dark" {
                            "light".to_string()
                        } else {
                            "dark".to_string()
                        };
                        if self.settings.theme == "dark" {
                            ctx.set_visuals(egui::Visuals::dark());
                        } else {
                            ctx.set_visuals(egui::Visuals::light());
                        }
                        self.persist_settings();
                    }
                    if self.granularity_loading {
                        ui.weak("loading schedule…");
                    }
                    ui.label(egui::RichText::new(&self.clinic.name).strong());
                });
            });
        });
    }

    fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("agenda_status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if self.store.is_dragging() {
                    let state = self.store.state();
                    if let (Some(item), Some(position)) =
                        (&state.dragged_item, &state.current_position)
                    {
                        let client = self
                            .book
                            .get(item.id)
                            .map(|a| a.client_name.clone())
                            .unwrap_or_else(|| format!("appointment {}", item.id));
                        let room = self
                            .clinic
                            .room(&position.room_id)
                            .map(|room| room.name.clone())
                            .unwrap_or_else(|| position.room_id.to_string());
                        ui.label(format!(
                            "Moving {client} → {} {} · {room} (Esc cancels)",
                            position.date.format("%d/%m"),
                            format_hhmm(position.time),
                        ));
                    }
                } else if let Some(status) = &self.status {
                    ui.label(status);
                } else {
                    ui.weak(format!("{} appointments", self.book.len()));
                }
            });
        });
    }

    fn render_booking_dialog(&mut self, ctx: &egui::Context) {
        let Some(mut dialog) = self.booking_dialog.take() else {
            return;
        };
        match dialog.show(ctx) {
            BookingDialogAction::Save => match dialog.to_appointment() {
                Ok(appointment) => {
                    let slot_check = self.book.validate_slot(
                        appointment.date,
                        appointment.start_time,
                        appointment.duration_minutes,
                        &appointment.room_id,
                        None,
                        self.clinic.as_ref(),
                    );
                    match slot_check {
                        Ok(()) => match self.book.add(appointment) {
                            Ok(id) => {
                                self.status = Some(format!("Appointment {id} booked"));
                            }
                            Err(err) => {
                                self.status = Some(format!("Could not book: {err}"));
                            }
                        },
                        Err(reason) => {
                            self.status = Some(format!("Could not book: {reason}"));
                            self.booking_dialog = Some(dialog);
                        }
                    }
                }
                Err(err) => {
                    self.status = Some(format!("Could not book: {err}"));
                    self.booking_dialog = Some(dialog);
                }
            },
            BookingDialogAction::Cancel => {}
            BookingDialogAction::None => {
                self.booking_dialog = Some(dialog);
            }
        }
    }

    fn handle_grid_interaction(&mut self, interaction: GridInteraction) {
        if let Some(request) = interaction.create_request {
            if !self.store.is_dragging() && self.booking_dialog.is_none() {
                self.booking_dialog = Some(BookingDialog::new(request));
            }
        }
        if let Some(id) = interaction.appointment_to_edit {
            if let Some(appointment) = self.book.get(id) {
                self.status = Some(format!(
                    "{} · {} · {} {}–{} ({} min)",
                    appointment.client_name,
                    appointment.service,
                    appointment.date.format("%d/%m"),
                    format_hhmm(appointment.start_time),
                    format_hhmm(appointment.end_time()),
                    appointment.duration_minutes,
                ));
            }
        }
    }

    fn finish_drop_if_released(&mut self, ctx: &egui::Context) {
        if !self.store.is_dragging() {
            return;
        }
        if !ctx.input(|i| i.pointer.primary_released()) {
            return;
        }

        let outcome = {
            let validator = SlotValidator::new(&self.book, self.clinic.as_ref());
            commit_drop(&mut self.store, &validator)
        };
        match outcome {
            DropOutcome::Committed(request) => {
                self.book.submit_move(request);
                self.status = Some("Appointment moved".to_string());
            }
            DropOutcome::Rejected(reason) => {
                self.status = Some(format!("Move rejected: {reason}"));
            }
            DropOutcome::Unchanged => {
                self.status = None;
            }
            DropOutcome::NoGesture => {}
        }
    }
}

impl eframe::App for AgendaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_configuration();

        // Escape aborts the gesture synchronously, before any cell runs.
        if self.store.is_dragging() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.store.cancel_drag();
            self.status = Some("Move cancelled".to_string());
        }

        self.render_toolbar(ctx);
        self.render_status_bar(ctx);

        let palette = AgendaPalette::from_visuals(ctx.style().visuals.dark_mode);
        let snap_create = self.snap_settings(GestureKind::Create);
        let snap_move = self.snap_settings(GestureKind::Move);
        let clinic = Arc::clone(&self.clinic);
        let current_view = self.current_view;
        let current_date = self.current_date;
        let active_room = self.active_room.clone();

        let interaction = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let mut params = CellParams {
                    store: &mut self.store,
                    book: &self.book,
                    clinic: clinic.as_ref(),
                    snap_create,
                    snap_move,
                    palette: &palette,
                };
                match current_view {
                    ViewType::Day => DayView::render(ui, &mut params, current_date),
                    ViewType::Week => {
                        WeekView::render(ui, &mut params, current_date, &active_room)
                    }
                }
            })
            .inner;

        self.handle_grid_interaction(interaction);

        // Drop commit runs after the grid so it sees the frame's final
        // resolved position.
        self.finish_drop_if_released(ctx);

        self.render_booking_dialog(ctx);
    }
}
