use rudp_sender::SendError;
use rudp_shared::constants::DEFAULT_PORT;
use rudp_shared::logger;
use std::io::Read;
use tokio::net::UdpSocket;

struct Config {
    file: Option<String>,
    address: String,
    port: u16,
    debug: bool,
    sack_mode: bool,
}

fn usage() {
    println!("RUDP Sender");
    println!("-f FILE    | --file=FILE       The file to transfer; if empty reads from stdin");
    println!("-a ADDRESS | --address=ADDRESS The receiver address or hostname, defaults to localhost");
    println!("-p PORT    | --port=PORT       The destination port, defaults to {DEFAULT_PORT}");
    println!("-d         | --debug           Print debug messages");
    println!("-k         | --sack            Enable selective acknowledgement mode");
    println!("-h         | --help            Print this usage message");
}

/// Hand-rolled flag scan mirroring the original's `getopt` surface and the
/// teacher's manual (non-`clap`) argument handling (§1 scopes CLI parsing
/// out of the reliability core).
fn parse_args() -> Option<Config> {
    let mut file = None;
    let mut address = "localhost".to_string();
    let mut port = DEFAULT_PORT;
    let mut debug = false;
    let mut sack_mode = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-f" | "--file" => file = Some(args.next()?),
            "-a" | "--address" => address = args.next()?,
            "-p" | "--port" => port = args.next()?.parse().ok()?,
            "-d" | "--debug" => debug = true,
            "-k" | "--sack" => sack_mode = true,
            "-h" | "--help" => return None,
            other if other.starts_with("--file=") => file = Some(other["--file=".len()..].to_string()),
            other if other.starts_with("--address=") => {
                address = other["--address=".len()..].to_string();
            }
            other if other.starts_with("--port=") => {
                port = other["--port=".len()..].parse().ok()?;
            }
            _ => return None,
        }
    }

    Some(Config {
        file,
        address,
        port,
        debug,
        sack_mode,
    })
}

fn read_input(config: &Config) -> Result<Vec<u8>, SendError> {
    match &config.file {
        Some(path) => std::fs::read(path).map_err(SendError::Read),
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .map_err(SendError::Read)?;
            Ok(buf)
        }
    }
}

/// Binds the local socket and connects it to the receiver. Both failure
/// modes are reported as `SendError::Connect` — from the caller's view
/// they're the same "couldn't set up the outbound connection" outcome.
async fn connect_socket(config: &Config) -> Result<UdpSocket, SendError> {
    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .map_err(SendError::Connect)?;
    socket
        .connect((config.address.as_str(), config.port))
        .await
        .map_err(SendError::Connect)?;
    Ok(socket)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::process::ExitCode {
    let Some(config) = parse_args() else {
        usage();
        return std::process::ExitCode::FAILURE;
    };

    let data = match read_input(&config) {
        Ok(data) => data,
        Err(e) => {
            logger::log_error(&format!("{e}"));
            return std::process::ExitCode::FAILURE;
        }
    };

    let socket = match connect_socket(&config).await {
        Ok(socket) => socket,
        Err(e) => {
            logger::log_error(&format!("{e}"));
            return std::process::ExitCode::FAILURE;
        }
    };

    logger::log_info(&format!(
        "sending {} bytes to {}:{}",
        data.len(),
        config.address,
        config.port
    ));

    tokio::select! {
        result = rudp_sender::send_file(&socket, &data, config.sack_mode, config.debug) => {
            if let Err(e) = result {
                logger::log_error(&format!("transfer failed: {e}"));
                return std::process::ExitCode::FAILURE;
            }
        }
        _ = tokio::signal::ctrl_c() => {
            logger::log_info("interrupted, aborting transfer");
            return std::process::ExitCode::FAILURE;
        }
    }

    std::process::ExitCode::SUCCESS
}
