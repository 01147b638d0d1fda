//! Enclose desktop front-end
//!
//! Play the edge-drawing game against the AI or another player.

use enclose::ui::EncloseApp;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 750.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("Enclose"),
        ..Default::default()
    };

    eframe::run_native(
        "Enclose",
        options,
        Box::new(|cc| Ok(Box::new(EncloseApp::new(cc)))),
    )
}
