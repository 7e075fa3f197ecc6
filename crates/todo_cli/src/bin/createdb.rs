//! `createdb` entry point: creates the todo database and applies migrations.

use log::error;
use std::process::ExitCode;
use todo_cli::{bootstrap_db, CliConfig};

fn main() -> ExitCode {
    let config = CliConfig::from_env();
    if let Some(warning) = config.init_logging() {
        eprintln!("createdb: logging disabled: {warning}");
    }

    match bootstrap_db(&config.db_path) {
        Ok(version) => {
            println!(
                "Database ready at {} (schema v{version})",
                config.db_path.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("createdb: {err}");
            ExitCode::FAILURE
        }
    }
}
