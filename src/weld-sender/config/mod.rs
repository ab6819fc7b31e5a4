use std::path::PathBuf;

use log::LevelFilter;

use ipc::{Arguments, Overflow, SOCKET_PATH};


#[derive(Debug, Clone)]
pub struct Configuration {
    pub socket: PathBuf,
    pub overflow: Overflow,
    pub read_reply: bool,
}

impl Default for Configuration {
    fn default() -> Configuration {
        Configuration {
            socket: PathBuf::from(SOCKET_PATH),
            overflow: Overflow::Truncate,
            read_reply: true,
        }
    }
}

impl Configuration {
    pub fn new(args: &Arguments) -> Configuration {
        Configuration {
            overflow: if args.strict { Overflow::Reject } else { Overflow::Truncate },
            read_reply: !args.no_reply,
            ..Configuration::default()
        }
    }
}

pub fn level(quiet: bool, verbose: u8) -> LevelFilter {
    if quiet {
        return LevelFilter::Off;
    }

    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        3.. => LevelFilter::Trace,
    }
}
