mod cli;
mod config;
mod documents;
mod export;
mod form;
mod generator;
mod history;
mod markdown;
mod model;
mod planner;
mod prompt;
mod render;
mod sections;
mod week;

use clap::Parser;
use colored::*;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();

    if let Err(e) = cli::run(args).await {
        eprintln!("{} {}", "Fejl:".red().bold(), e);
        std::process::exit(1);
    }
}
