use clap::Parser;
use relm4::prelude::*;
use spotlight::TargetId;
use spotlight_demo::config;
use spotlight_demo::gui::app::{AppInit, AppModel};
use spotlight_demo::sys::runtime;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "spotlight-demo", version, about, long_about = None)]
struct Cli {
    /// Tour file to use instead of tour.toml in the config directory
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Draw the layout wireframe over every target
    #[arg(short = 'd', long)]
    debug: bool,

    /// Id of the target the tour starts at
    #[arg(short = 's', long)]
    start_at: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config_path = config::get_config_path(cli.config)?;
    let config = config::load_or_setup(&config_path);
    log::info!(
        "Loaded {} tour targets from {}",
        config.targets.len(),
        config_path.display()
    );

    let (tx, rx) = async_channel::bounded(32);

    runtime::start_background_services(config_path.clone(), tx);

    // clap owns the command line
    let app = RelmApp::new("org.spotlight.demo").with_args(Vec::new());

    app.run::<AppModel>(AppInit {
        config,
        config_path,
        debug: cli.debug,
        start_at: cli.start_at.map(TargetId::from),
        rx,
    });
    Ok(())
}
