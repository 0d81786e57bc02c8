// Clinic Agenda Application
// Main entry point

use clinic_agenda::ui_egui::AgendaApp;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting Clinic Agenda");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Clinic Agenda"),
        ..Default::default()
    };

    eframe::run_native(
        "Clinic Agenda",
        options,
        Box::new(|cc| Ok(Box::new(AgendaApp::new(cc)))),
    )
}
