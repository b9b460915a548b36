use clap::Parser;

mod cli;
mod commands;
mod config;
mod domain;
mod errors;
mod export;
mod filter;
mod images;
mod normalize;
mod ranker;
mod scraper;
mod stats;
mod store;

#[cfg(test)]
mod tests;

fn main() {
    let cli = cli::Cli::parse();

    if let Err(e) = commands::run(cli) {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}
