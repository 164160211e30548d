use clap::Parser;
use colored::*;
use std::process::ExitCode;
use std::sync::Arc;

use page_loader::logging::init_logging;
use page_loader::observer::{FanoutObserver, LoadObserver, TracingObserver};
use page_loader::progress::ProgressObserver;
use page_loader::{LoadCommand, PageLoader};

#[tokio::main]
async fn main() -> ExitCode {
    let args = LoadCommand::parse();

    if let Err(e) = init_logging() {
        eprintln!("{} failed to initialize logging: {}", "warning:".yellow(), e);
    }

    let mut observers: Vec<Box<dyn LoadObserver>> = vec![Box::new(TracingObserver)];
    if !args.quiet {
        if let Some(progress) = ProgressObserver::for_terminal() {
            observers.push(Box::new(progress));
        }
    }
    let observer = Arc::new(FanoutObserver::new(observers));

    let result = match PageLoader::with_observer(&args.loader_config(), observer) {
        Ok(loader) => loader.load(&args.url, &args.output).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(saved_page) => {
            let saved_page = std::path::absolute(&saved_page).unwrap_or(saved_page);
            println!("{}", saved_page.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}
