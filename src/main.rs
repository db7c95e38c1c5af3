use std::env;
use std::process::ExitCode;

use colored::Colorize;
use crater_grid::{generate, GridConfig, GridSummary, Result};

fn run(config_path: Option<String>) -> Result<GridSummary> {
    let config = match config_path {
        Some(path) => {
            println!("📄 Loading configuration from {}", path);
            GridConfig::from_file(&path)?
        }
        None => {
            println!("📄 No configuration file given, using defaults");
            GridConfig::default()
        }
    };

    let set = generate(&config)?;
    let summary = GridSummary::of(&set);

    println!("{}", "🗺️  Grid generated".green().bold());
    println!(
        "   Nx = {:5}, minimum x spacing fraction: {:e}",
        summary.nx, summary.min_dx_fraction
    );
    println!(
        "   Nz = {:5}, minimum z spacing fraction: {:e}",
        summary.nz, summary.min_dz_fraction
    );

    set.write(&config.writer_options())?;
    println!(
        "💾 Grid files are in the \"{}\" directory",
        config.grid_dir.display().to_string().cyan()
    );
    Ok(summary)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(env::args().nth(1)) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "❌ grid generation failed:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
