//! NGO Ops Platform planning viewer
//!
//! eframe application shell around the hierarchy explorer: a fixed route
//! table, sidebar and header chrome, and seven pages over one bundled plan
//! document. Runs natively (`src/main.rs`) and in the browser (`start`).

pub mod app;
pub mod pages;
pub mod route;

pub use app::NgoPlanApp;
pub use route::Route;

#[cfg(target_arch = "wasm32")]
const CANVAS_ID: &str = "ngo_plan_canvas";

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    use wasm_bindgen::JsCast;

    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let route = app::location_hash()
        .map(|hash| Route::from_path(&hash))
        .unwrap_or_default();
    tracing::info!(route = %route, "NGO plan viewer loaded");

    wasm_bindgen_futures::spawn_local(async move {
        let canvas = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CANVAS_ID))
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok());
        let Some(canvas) = canvas else {
            tracing::error!(id = CANVAS_ID, "Canvas element not found");
            return;
        };

        let started = eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                Box::new(move |cc| Ok(Box::new(NgoPlanApp::new(cc, route)))),
            )
            .await;
        if let Err(err) = started {
            tracing::error!(?err, "Failed to start eframe");
        }
    });
}
