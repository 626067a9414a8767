use anyhow::Result;
use flanker_experiment::ExperimentConfig;
use std::path::PathBuf;

mod app;
mod keymap;
mod tone;

fn main() -> Result<()> {
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = ExperimentConfig::load_or_default(config_path.as_deref())?;
    app::App::new(config)?.run()
}
