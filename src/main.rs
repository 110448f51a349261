use std::process::ExitCode;

fn main() -> ExitCode {
    match prompt_catalog::cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
