use std::process::ExitCode;

use featmatch_cli::{execute, init_logger, resolve_log_level, CliArgs};
use log::error;

fn main() -> ExitCode {
    let args = match CliArgs::parse_normalized(std::env::args_os()) {
        Ok(args) => args,
        Err(err) => err.exit(),
    };
    init_logger(&resolve_log_level(&args));

    match execute(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::from(1)
        }
    }
}
