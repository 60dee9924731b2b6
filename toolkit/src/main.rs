use lkg_toolkit::{build_cli, init_tracing, run, Verbosity};
use std::io::Write;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let matches = build_cli().get_matches();
    init_tracing(Verbosity::from_matches(&matches));

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    match run(&matches, &mut out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = out.flush();
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
