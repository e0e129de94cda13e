//! tmod - Minecraft mod manager
//!
//! Binary entry point. All logic lives in the library crate.

use std::process::ExitCode;

use tmod::ui::output;

fn main() -> ExitCode {
    match tmod::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
