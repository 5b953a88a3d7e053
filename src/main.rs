//=========================================================================
// Aetheric Showcase - Binary Entry Point
//
// Usage:
//   aetheric-showcase [DIALOGUE_JSON]
//
// Log level is taken from RUST_LOG (default: info).
//
//=========================================================================

use std::process::ExitCode;

use aetheric_showcase::ShellBuilder;
use log::error;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut builder = ShellBuilder::new();
    if let Some(path) = std::env::args_os().nth(1) {
        builder = builder.with_dialogue_source(path);
    }

    match builder.build().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
