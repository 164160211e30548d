use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetcher::LoaderConfig;

#[derive(Parser, Debug)]
#[command(
    name = "page-loader",
    about = "Download a web page together with its local images, stylesheets and scripts",
    version,
    long_about = "Downloads a single page, saves every same-origin image, stylesheet and script next to it, and rewrites the page to reference the saved copies. Prints the path of the saved page."
)]
pub struct LoadCommand {
    /// The address of the page to download
    pub url: String,

    /// Directory the page and its assets are saved to
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// User agent string to use for requests
    #[arg(long, default_value_t = LoaderConfig::default().user_agent)]
    pub user_agent: String,

    /// Timeout for each request in seconds
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Do not display download progress
    #[arg(short, long)]
    pub quiet: bool,
}

impl LoadCommand {
    pub fn loader_config(&self) -> LoaderConfig {
        LoaderConfig {
            user_agent: self.user_agent.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }
}
