mod cli;
mod dashboard;
mod error;
mod expand;
mod fmt;
mod ledger;
mod models;
mod settings;
mod store;
mod tui;
mod views;

use clap::Parser;

use cli::{Cli, Commands};

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let data_dir = settings::resolve_data_dir(cli.data_dir.as_deref());
    log::debug!("data dir: {}", data_dir.display());

    let result = match cli.command {
        None => cli::dashboard::run(&data_dir, None),
        Some(command) => match command {
            Commands::Init => cli::init::run(&data_dir),
            Commands::Add {
                description,
                amount,
                tx_type,
                category,
                date,
                recurring,
                installments,
            } => cli::transactions::add(
                &data_dir,
                &description,
                amount,
                tx_type,
                category,
                date,
                recurring,
                installments,
            ),
            Commands::List {
                month,
                search,
                filter,
            } => cli::transactions::list(&data_dir, month.as_deref(), search.as_deref(), filter),
            Commands::Summary { month } => cli::summary::run(&data_dir, month.as_deref()),
            Commands::Overdue => cli::transactions::overdue(&data_dir),
            Commands::Toggle { id } => cli::transactions::toggle(&data_dir, &id),
            Commands::Delete { id } => cli::transactions::delete(&data_dir, &id),
            Commands::Export { output } => cli::backup::export(&data_dir, output),
            Commands::Import { file } => cli::backup::import(&data_dir, &file),
            Commands::Goal { amount, clear } => cli::goal::run(&data_dir, amount, clear),
            Commands::Privacy { mode } => cli::privacy::run(&data_dir, mode),
            Commands::Dashboard { month } => cli::dashboard::run(&data_dir, month.as_deref()),
            Commands::Demo => cli::demo::run(&data_dir),
            Commands::Status => cli::status::run(&data_dir),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
