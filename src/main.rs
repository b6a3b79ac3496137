use std::process::ExitCode;

fn main() -> ExitCode {
    match docudesk_lib::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("docudesk: {e}");
            ExitCode::FAILURE
        }
    }
}
