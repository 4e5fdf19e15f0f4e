use anyhow::Result;
use eframe::egui;

use burbuja::repository::{self, Repository};
use burbuja::ui::BurbujaApp;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Create a runtime for database initialization
    let rt = tokio::runtime::Runtime::new()?;
    let pool = rt.block_on(repository::database::init_database("burbuja.db"))?;
    let repository = Repository::new(pool);

    // Shutdown the initialization runtime; the app owns its own.
    drop(rt);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Burbuja - Task Bubbles",
        options,
        Box::new(move |cc| Box::new(BurbujaApp::new(cc, repository))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
