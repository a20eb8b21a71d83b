use std::process::ExitCode;

/// Main entry point
#[tokio::main]
async fn main() -> ExitCode {
    match tavily_tools::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}
