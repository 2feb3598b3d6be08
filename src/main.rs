use clap::Parser;

use dc_download::cli::Args;
use dc_download::config::{Configuration, FileConfig};
use dc_download::runner;

/// Load environment variables from .env file (if present)
fn load_env() {
    // dotenv::dotenv() returns Err if .env doesn't exist, which is fine
    let _ = dotenv::dotenv();
}

fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Load .env before parsing so DC_API_TOKEN can come from it
    load_env();
    init_logging();

    let args = Args::parse();

    let file_config = match FileConfig::load(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let config = Configuration::from_args(args, file_config);

    match runner::run(&config).await {
        Ok(summary) => {
            println!("{}", summary);
            if !summary.failed.is_empty() {
                log::warn!("Failed captures: {}", summary.failed.join(", "));
            }
        }
        Err(e) => println!("Could not start download: {}", e),
    }

    println!("Process complete.");
}
