mod app;
mod color;
mod config;
mod data;
mod error;
mod report;
mod state;
mod ui;

use anyhow::{anyhow, Context};
use app::WageDashboardApp;
use clap::Parser;
use config::Cli;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if cli.headless() {
        return run_headless(&cli);
    }

    let mut state = AppState {
        selection: cli.selection(),
        month_order: cli.month_order(),
        ..Default::default()
    };
    match cli.startup_source() {
        Some(path) => state.load_path(&path),
        None => log::info!("No {} here; waiting for File → Open", config::DEFAULT_SOURCE),
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 900.0])
            .with_min_inner_size([640.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Wage Summary Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(WageDashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("running the dashboard window: {e}"))
}

/// Print the pipeline output for `cli` to stdout.
fn run_headless(cli: &Cli) -> anyhow::Result<()> {
    let path = cli.source();
    let dataset = data::loader::load_file(&path)
        .with_context(|| format!("loading {}", path.display()))?;

    let selection = cli.selection();
    let order = cli.month_order();
    let summary = data::aggregate::summarize(&dataset, &selection, order);

    if cli.json {
        println!("{}", report::to_json(&summary, &selection, order)?);
    } else {
        print!("{}", report::render_text(&summary, &selection));
    }
    Ok(())
}
