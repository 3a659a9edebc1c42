use std::process::ExitCode;

fn main() -> ExitCode {
    shopkeeper_cli::run()
}
