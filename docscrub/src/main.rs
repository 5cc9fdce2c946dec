// docscrub/src/main.rs
//! docscrub entry point.

use clap::Parser;
use log::LevelFilter;

use docscrub::cli::Cli;
use docscrub::commands::error_msg;
use docscrub::{dispatch, logger};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Cli::parse();

    let level = if args.quiet {
        Some(LevelFilter::Off)
    } else if args.debug {
        Some(LevelFilter::Debug)
    } else {
        None
    };
    logger::init_logger(level);

    if let Err(e) = dispatch(args).await {
        error_msg(format!("{:#}", e));
        std::process::exit(1);
    }
}
