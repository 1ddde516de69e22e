// src/bin/cli.rs
use tablematch::{cli, runner::RunStatus};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let status = cli::run().map_err(|e| color_eyre::eyre::eyre!("{e}"))?;
    if let RunStatus::Failed(_) = status {
        std::process::exit(1);
    }
    Ok(())
}
