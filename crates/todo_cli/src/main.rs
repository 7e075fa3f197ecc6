//! `todo` entry point.
//!
//! Exit status: parse errors (including undecodable arguments) print to
//! stdout and exit 0; store failures after a successful parse print to
//! stderr and exit 1.

use log::{error, warn};
use std::io;
use std::process::ExitCode;
use todo_cli::{run_todo, CliConfig};
use todo_core::{decode_args, ExecContext};

fn main() -> ExitCode {
    let config = CliConfig::from_env();
    if let Some(warning) = config.init_logging() {
        eprintln!("todo: logging disabled: {warning}");
    }

    let args = match decode_args(std::env::args_os().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            warn!("event=command_parse module=cli status=rejected error={err}");
            println!("{err}");
            return ExitCode::SUCCESS;
        }
    };
    let ctx = ExecContext::background();
    let stdout = io::stdout();

    match run_todo(&args, &config.db_path, &ctx, &mut stdout.lock()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_exit module=cli status=error error={err}");
            eprintln!("todo: {err}");
            ExitCode::FAILURE
        }
    }
}
