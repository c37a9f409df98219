//! NGO Ops Platform planning viewer, native launcher
//!
//! ```bash
//! cargo run
//! RUST_LOG=ngo_plan_graph=debug cargo run
//! NGO_PLAN_CONFIG_DIR=./my-config cargo run
//! ```

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    use ngo_plan::{NgoPlanApp, Route};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ngo_plan=info,ngo_plan_graph=info,ngo_plan_types=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting NGO Ops Platform planning viewer");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("NGO Ops Platform - Planning")
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([960.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "NGO Ops Platform",
        native_options,
        Box::new(|cc| Ok(Box::new(NgoPlanApp::new(cc, Route::default())))),
    )
    .map_err(|e| anyhow::anyhow!("eframe exited with an error: {e}"))?;

    tracing::info!("Application shut down cleanly");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser build starts from `ngo_plan::start`
}
