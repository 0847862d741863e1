use anyhow::Result;
use clap::Parser;
use gtk4::prelude::*;
use gtk4::Application;
use log::{error, info, warn};
use shredder::config;
use shredder::ui::{MainView, MainWindow, SettingsView};
use std::path::PathBuf;

const APP_ID: &str = "org.gnome.Shredder";

/// Shredder - find and remove duplicate files
#[derive(Parser, Debug, Clone)]
#[command(name = "shredder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,

    /// Load the settings schema from a JSON file instead of the built-in one
    #[arg(long = "schema", value_name = "FILE")]
    schema: Option<PathBuf>,

    /// Store settings in this file instead of the user config directory
    #[arg(long = "settings-file", value_name = "FILE")]
    settings_file: Option<PathBuf>,

    /// Print the effective value of every setting as JSON and exit
    #[arg(long = "print-settings")]
    print_settings: bool,
}

fn main() {
    let cli = Cli::parse();

    // Level 0 (default): warn only
    // Level 1: info
    // Level 2: debug
    // Level 3+: trace
    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting Shredder v{}", env!("CARGO_PKG_VERSION"));

    if cli.print_settings {
        if let Err(e) = print_settings(&cli) {
            error!("Failed to print settings: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    let app = Application::builder().application_id(APP_ID).build();

    let cli_for_activate = cli.clone();
    app.connect_activate(move |app| {
        if let Err(e) = build_ui(app, &cli_for_activate) {
            error!("Failed to start: {:#}", e);
            app.quit();
        }
    });

    // Arguments were parsed already
    app.run_with_args(&["shredder"]);
}

fn print_settings(cli: &Cli) -> Result<()> {
    let settings = config::open_settings(cli.schema.as_deref(), cli.settings_file.as_deref())?;
    let values = config::effective_values(&settings)?;
    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

fn build_ui(app: &Application, cli: &Cli) -> Result<()> {
    let settings = config::open_settings(cli.schema.as_deref(), cli.settings_file.as_deref())?;
    if settings.list_keys().is_empty() {
        warn!("Settings schema '{}' has no keys", settings.schema().id);
    }

    let window = MainWindow::new(app, &settings);
    window.add_view(MainView::new(&window));
    window.add_view(SettingsView::new(&settings, &window));
    window.switch_to("main");
    window.present();

    Ok(())
}
