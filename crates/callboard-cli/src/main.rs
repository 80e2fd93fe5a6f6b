use std::process::ExitCode;

use callboard::{Cli, run};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    // Piping into `head` must end quietly, not panic on EPIPE.
    #[cfg(unix)]
    restore_default_sigpipe();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(unix)]
fn restore_default_sigpipe() {
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}
