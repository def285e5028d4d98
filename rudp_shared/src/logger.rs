//! Timestamped, colorized console logging, shared by the sender and
//! receiver binaries. Mirrors the teacher's chat client/server logger.

use chrono::Local;
use colored::Colorize;

fn get_timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

pub fn log_info(message: &str) {
    println!(
        "{} {} {}",
        format!("[{}]", get_timestamp()).dimmed(),
        "[INFO]".cyan().bold(),
        message
    );
}

pub fn log_success(message: &str) {
    println!(
        "{} {} {}",
        format!("[{}]", get_timestamp()).dimmed(),
        "[OK]".green().bold(),
        message
    );
}

pub fn log_warning(message: &str) {
    println!(
        "{} {} {}",
        format!("[{}]", get_timestamp()).dimmed(),
        "[WARN]".yellow().bold(),
        message
    );
}

pub fn log_error(message: &str) {
    eprintln!(
        "{} {} {}",
        format!("[{}]", get_timestamp()).dimmed(),
        "[ERROR]".red().bold(),
        message
    );
}

/// Only prints when `debug` is true. The spec requires malformed-frame and
/// checksum-failure drops to be "logged in debug" and nothing otherwise
/// (§4.1, §7) — callers gate on their own `debug` flag rather than a global.
pub fn log_debug(debug: bool, message: &str) {
    if debug {
        println!(
            "{} {} {}",
            format!("[{}]", get_timestamp()).dimmed(),
            "[DEBUG]".magenta().bold(),
            message
        );
    }
}
