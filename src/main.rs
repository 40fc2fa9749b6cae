use clap::Parser;
use eframe::egui;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::time::Duration;

use showreel::app::{AppOptions, ShowreelApp};
use showreel::cli::Args;
use showreel::config;
use showreel::config::AppSettings;
use showreel::core::reel::DEFAULT_CLIP_COUNT;
use showreel::entities::clip::discover_clip_count;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let path_config = config::PathConfig::from_env_and_cli(args.config_dir.clone());

    // Determine log level based on verbosity flags
    // 0 (default) = warn, 1 (-v) = info, 2 (-vv) = debug, 3+ (-vvv) = trace
    let log_level = match args.verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    if let Some(log_path_opt) = &args.log_file {
        let log_path = log_path_opt
            .as_ref()
            .cloned()
            .unwrap_or_else(|| config::data_file("showreel.log", &path_config));

        let file = std::fs::File::create(&log_path)?;

        env_logger::Builder::new()
            .filter_level(log_level)
            .filter_module("egui", log::LevelFilter::Info) // Suppress egui DEBUG spam
            .format_timestamp_millis()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();

        info!("Logging to file: {} (level: {:?})", log_path.display(), log_level);
    } else {
        let default_level = match args.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
            .filter_module("egui", log::LevelFilter::Info)
            .format_timestamp_millis()
            .init();
    }

    info!("Showreel starting...");
    debug!("Command-line args: {:?}", args);

    let media_dir = args.media_dir.clone().unwrap_or_else(|| PathBuf::from("clips"));
    let total = args
        .clips
        .or_else(|| discover_clip_count(&media_dir))
        .unwrap_or(DEFAULT_CLIP_COUNT);
    if total < 2 {
        warn!("Rotation of {} clip(s) - clicks will be a no-op swap", total);
    }
    info!("Media dir: {} ({} clips)", media_dir.display(), total);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!("Showreel v{}", env!("CARGO_PKG_VERSION")))
            .with_inner_size(egui::vec2(1280.0, 720.0))
            .with_resizable(true),
        persist_window: true,
        #[cfg(not(target_arch = "wasm32"))]
        persistence_path: Some(config::config_file("showreel.json", &path_config)),
        ..Default::default()
    };

    let opts = AppOptions {
        media_dir,
        total,
        fullscreen: args.fullscreen,
        animations_enabled: !args.no_anim,
        load_timeout: Duration::from_secs(args.load_timeout),
        settings: AppSettings::default(),
    };

    eframe::run_native(
        "Showreel",
        native_options,
        Box::new(move |cc| {
            // Restore persisted settings if available
            let settings: AppSettings = cc
                .storage
                .and_then(|storage| storage.get_string(eframe::APP_KEY))
                .and_then(|json| serde_json::from_str(&json).ok())
                .unwrap_or_else(|| {
                    info!("No persisted settings found, using defaults");
                    AppSettings::default()
                });

            let mut app = ShowreelApp::new(AppOptions { settings, ..opts });
            app.start_loading();
            Ok(Box::new(app))
        }),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {}", e))?;

    Ok(())
}
