use layerwalk::cli::initialize_from_arguments;
use std::process::ExitCode;

/// Without arguments, main sends "Hello, world!" over TCP
#[tokio::main]
async fn main() -> ExitCode {
    println!("Layerwalk v{}", env!("CARGO_PKG_VERSION"));
    if let Err(e) = initialize_from_arguments().await {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }
    println!("Done");
    ExitCode::SUCCESS
}
