mod config;
mod client;
mod error;
mod sender;

use config::Configuration;
use sender::Sender;
use ipc::Arguments;

use std::process::ExitCode;
use std::ffi::OsString;

use clap::{CommandFactory, Parser};
use log::error;


fn main() -> ExitCode {
    let args = match Arguments::try_parse() {
        Ok(args) => args,
        Err(err) => return usage(err),
    };

    env_logger::Builder::new()
        .filter_level(config::level(args.quiet, args.verbose))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let sender = Sender::new(Configuration::new(&args));

    match sender.send(&args.widget, &args.event) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");

            ExitCode::FAILURE
        },
    }
}

/// Help and version exit cleanly, any other parse failure is a usage error.
fn usage(err: clap::Error) -> ExitCode {
    if !err.use_stderr() {
        let _ = err.print();

        return ExitCode::SUCCESS;
    }

    if !quiet(std::env::args_os().skip(1)) {
        let _ = err.print();
    }

    ExitCode::FAILURE
}

/// Parsing failed, so look for the flag by hand, alone or in a cluster of
/// known short flags such as `-qs`.
fn quiet(args: impl Iterator<Item = OsString>) -> bool {
    let command = Arguments::command();
    let shorts: Vec<char> = command.get_arguments().filter_map(|arg| arg.get_short()).collect();

    args.take_while(|arg| arg != "--")
        .any(|arg| match arg.to_str() {
            Some("--quiet") => true,
            Some(arg) => arg.strip_prefix('-')
                .filter(|cluster| !cluster.starts_with('-'))
                .is_some_and(|cluster| cluster.contains('q') && cluster.chars().all(|c| shorts.contains(&c))),
            None => false,
        })
}
