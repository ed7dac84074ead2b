mod cli;
mod db;
mod error;
mod fmt;
mod models;
mod settings;
mod store;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn init_logging() {
    let filter = EnvFilter::try_from_env("TALLY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::List { sort, json } => cli::transactions::list(sort, json),
        Commands::Show { item, json } => cli::transactions::show(item, json),
        Commands::Add { record } => cli::transactions::add(record.into_transaction()),
        Commands::Update { item, record } => cli::transactions::update(item, record.into_transaction()),
        Commands::Delete { item } => cli::transactions::delete(item),
        Commands::Summary => cli::summary::run(),
        Commands::Export { output } => cli::export::run(output),
        Commands::Backup { output } => cli::backup::run(output),
        Commands::Status => cli::status::run(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
