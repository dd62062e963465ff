use std::io;
use std::process::ExitCode;

use recast_cli::{build_command, execute};
use recast_core::init_tracing;

fn main() -> ExitCode {
    let matches = build_command().get_matches();
    init_tracing(matches.get_flag("verbose"));

    let stdout = io::stdout();
    match execute(&matches, &mut stdout.lock()) {
        Ok(status) => ExitCode::from(status.code()),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}
