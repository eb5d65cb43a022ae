//! hrms entry point
//!
//! Parses arguments and dispatches through `cli::run`. Any error is
//! logged as FATAL and the process exits non-zero.

use hrms::cli;
use hrms::observability::Logger;

fn main() {
    if let Err(e) = cli::run() {
        Logger::fatal(
            "BOOT_FAILED",
            &[("code", e.code_str()), ("message", e.message())],
        );
        std::process::exit(1);
    }
}
