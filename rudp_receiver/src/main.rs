use rudp_receiver::{Config, Receiver};
use rudp_shared::constants::{DEFAULT_PORT, DEFAULT_TIMEOUT_SECS};
use rudp_shared::logger;
use std::path::PathBuf;
use std::time::Duration;

fn usage() {
    println!("RUDP Receiver");
    println!("-p PORT | --port=PORT     The listen port, defaults to {DEFAULT_PORT}");
    println!("-t SECS | --timeout=SECS  Idle-connection timeout in seconds, defaults to {DEFAULT_TIMEOUT_SECS}");
    println!("-o DIR  | --out-dir=DIR   Directory sink files are written to, defaults to .");
    println!("-d      | --debug         Print debug messages");
    println!("-k      | --sack          Enable selective acknowledgement mode");
    println!("-h      | --help          Print this usage message");
}

/// Hand-rolled flag scan, in the spirit of the original's `getopt` CLI and
/// the teacher's manual (non-`clap`) argument handling — the spec scopes
/// argument parsing out of the reliability core (§1).
fn parse_args() -> Option<Config> {
    let mut port = DEFAULT_PORT;
    let mut timeout = DEFAULT_TIMEOUT_SECS;
    let mut debug = false;
    let mut sack_mode = false;
    let mut sink_dir = PathBuf::from(".");

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-p" | "--port" => {
                port = args.next()?.parse().ok()?;
            }
            "-t" | "--timeout" => {
                timeout = args.next()?.parse().ok()?;
            }
            "-o" | "--out-dir" => {
                sink_dir = PathBuf::from(args.next()?);
            }
            "-d" | "--debug" => debug = true,
            "-k" | "--sack" => sack_mode = true,
            "-h" | "--help" => return None,
            other if other.starts_with("--port=") => {
                port = other["--port=".len()..].parse().ok()?;
            }
            other if other.starts_with("--timeout=") => {
                timeout = other["--timeout=".len()..].parse().ok()?;
            }
            other if other.starts_with("--out-dir=") => {
                sink_dir = PathBuf::from(&other["--out-dir=".len()..]);
            }
            _ => return None,
        }
    }

    Some(Config {
        port,
        timeout: Duration::from_secs(timeout),
        sack_mode,
        debug,
        sink_dir,
    })
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    let Some(config) = parse_args() else {
        usage();
        return std::process::ExitCode::FAILURE;
    };

    let port = config.port;
    let mut receiver = match Receiver::bind(config).await {
        Ok(receiver) => receiver,
        Err(e) => {
            logger::log_error(&format!("failed to start receiver: {e}"));
            return std::process::ExitCode::FAILURE;
        }
    };

    logger::log_success(&format!("RUDP receiver listening on 0.0.0.0:{port}"));

    tokio::select! {
        result = receiver.run() => {
            if let Err(e) = result {
                logger::log_error(&format!("receiver loop ended with error: {e}"));
                return std::process::ExitCode::FAILURE;
            }
        }
        _ = tokio::signal::ctrl_c() => {
            logger::log_info("interrupted, shutting down");
        }
    }

    std::process::ExitCode::SUCCESS
}
