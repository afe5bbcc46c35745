use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    match srclinkd::run_daemon() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // Telemetry may not be installed when bootstrap itself fails.
            let mut stderr = std::io::stderr().lock();
            if writeln!(stderr, "srclinkd: {error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}
