//! Operator-facing console output.
//!
//! Structured events go through `tracing`; this module only prints the
//! banner and the final colored verdict on stdout/stderr.

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const MAGENTA_BG: &str = "\x1b[45m";

pub fn banner() {
    println!("\n{MAGENTA_BG}{BOLD} Substrate auto payout {RESET}\n");
}

pub fn step(message: &str) {
    println!("{BOLD} -> {message}{RESET}");
}

pub fn success(message: &str) {
    println!("\n{GREEN}{BOLD}Success! {RESET}{message}\n");
}

pub fn warning(message: &str) {
    println!("\n{YELLOW}{BOLD}Warning! {message}{RESET}\n");
}

pub fn error(message: &str) {
    eprintln!("{RED}{BOLD}Error! {message}{RESET}\n");
}

/// Explorer link for a transaction, when a prefix is configured.
pub fn explorer_link(prefix: Option<&str>, tx_hash: &str) -> Option<String> {
    prefix.map(|prefix| format!("{}{}", prefix, tx_hash))
}
