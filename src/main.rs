use eframe::NativeOptions;
use mannequin::api::HttpClient;
use mannequin::app::ViewerApp;
use mannequin::app::picker::DialogImagePicker;
use mannequin::app::tasks::Executor;
use mannequin::config::AppConfig;
use std::sync::Arc;

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let (config, config_error) = AppConfig::resolve();
    if let Some(e) = config_error {
        log::warn!("{}; falling back to defaults", e);
    }
    log::info!("Model server: {}", config.server_base_url);

    let client = Arc::new(HttpClient::new(&config));
    let app = ViewerApp::new(
        config,
        client.clone(),
        client,
        Box::new(DialogImagePicker),
        Executor::Threaded,
    );

    let native_options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 860.0])
            .with_title("Mannequin"),
        ..Default::default()
    };
    eframe::run_native(
        "Mannequin",
        native_options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
}
