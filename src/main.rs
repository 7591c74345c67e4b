//! Tankpilot -- a tank battle bot speaking the line-delimited JSON game
//! protocol.
//!
//! Reads server messages from stdin and writes one action per turn to
//! stdout. Diagnostics go to stderr through `RUST_LOG` (default `info`).
//!
//! Usage:
//!   tankpilot [OPTIONS]
//!
//! Options:
//!   --config FILE   JSON file overriding engine parameters
//!   --seed N        Random seed, 0 for entropy (default: 0)
//!   --help          Show this help

use std::env;
use std::io;
use std::path::PathBuf;
use std::process;

use tankpilot::config::EngineConfig;
use tankpilot::engine::{DecisionEngine, SeededRandom};
use tankpilot::protocol::{MessageReader, MessageWriter, ProtocolError};
use tankpilot::session::{run_session, SessionError};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;
    let mut seed: u64 = 0;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                match args.get(i) {
                    Some(path) => config_path = Some(PathBuf::from(path)),
                    None => usage_error("--config needs a file path"),
                }
            }
            "--seed" => {
                i += 1;
                match args.get(i).and_then(|v| v.parse().ok()) {
                    Some(v) => seed = v,
                    None => usage_error("invalid --seed value"),
                }
            }
            "--help" | "-h" => {
                print_usage();
                return;
            }
            other => usage_error(&format!("unknown argument: {}", other)),
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => match EngineConfig::from_file(&path) {
            Ok(c) => c,
            Err(e) => {
                log::error!("{}", e);
                process::exit(1);
            }
        },
        None => EngineConfig::default(),
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut reader = MessageReader::new(stdin.lock());
    let mut writer = MessageWriter::new(stdout.lock());
    let mut engine = DecisionEngine::new(config, SeededRandom::new(seed));

    match run_session(&mut reader, &mut writer, &mut engine) {
        Ok(_) => {}
        Err(SessionError::Protocol(ProtocolError::UnexpectedEof)) => {
            log::warn!("server closed the connection without an end signal");
        }
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    }
}

fn usage_error(msg: &str) -> ! {
    eprintln!("{}", msg);
    print_usage();
    process::exit(2);
}

fn print_usage() {
    eprintln!("Usage: tankpilot [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config FILE    JSON file overriding engine parameters");
    eprintln!("  --seed N         Random seed, 0 for entropy (default: 0)");
    eprintln!("  --help           Show this help");
}
