//! Storefront Application CLI

use std::process;

use clap::Parser;
use tracing::error;

use crate::cli::{Cli, logging};

mod cli;

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(init_error) = logging::init_subscriber(&cli.config.logging) {
        eprintln!("failed to initialise logging: {init_error}");
        process::exit(1);
    }

    match cli.run().await {
        Ok(output) => println!("{output}"),
        Err(cli_error) => {
            error!(status = cli_error.status_code(), error = %cli_error, "command failed");
            eprintln!("error ({}): {cli_error}", cli_error.status_code());
            process::exit(1);
        }
    }
}
