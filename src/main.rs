mod amount;
mod cleaner;
mod cli;
mod dates;
mod db;
mod error;
mod fmt;
mod logging;
mod models;
mod reader;
mod settings;

use clap::Parser;

use cli::{Cli, Commands};
use settings::{load_settings, resolve_db_path};

fn main() {
    let cli = Cli::parse();
    let settings = load_settings();
    let db_path = resolve_db_path(cli.db.as_deref(), &settings);
    let remember = cli.db.is_some();

    let result = match cli.command {
        Commands::InitDb => cli::init_db::run(&db_path, remember),
        Commands::Load {
            csv,
            log_file,
            verbose,
        } => {
            let log_file = log_file.or(settings.log_file);
            cli::load::run(&db_path, &csv, log_file.as_deref(), verbose)
        }
        Commands::Summary => cli::summary::run(&db_path),
        Commands::History => cli::history::run(&db_path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
