mod cli;
mod commands;

use std::process::ExitCode;

use cli::{CheckParams, CompileParams, DumpParams, build_cli, log_filter};
use commands::CliError;

fn main() -> ExitCode {
    let matches = build_cli().get_matches();

    env_logger::Builder::from_env(
        env_logger::Env::new().filter_or("STACKNOTE_LOG", log_filter(&matches)),
    )
    .format_timestamp(None)
    .init();

    let result: Result<(), CliError> = match matches.subcommand() {
        Some(("compile", m)) => {
            let params = CompileParams::from_matches(m);
            commands::compile::run(params.into())
        }
        Some(("check", m)) => {
            let params = CheckParams::from_matches(m);
            commands::check::run(params.into())
        }
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into())
        }
        _ => unreachable!("clap should have caught this"),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
