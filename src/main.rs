use crate::config::Config;
use crate::db::init_db;
use crate::pipeline::scrape_with_config;
use crate::responses::error_to_response;
use crate::router::{handle, AppState};
use anyhow::{Context, Result};
use astra::Server;
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cache;
mod config;
mod db;
mod domain;
mod errors;
mod pipeline;
mod responses;
mod router;
mod scraper;
mod sink;
mod spreadsheets;
mod templates;

#[cfg(test)]
mod tests;

#[derive(Parser)]
#[command(name = "annonce_scraper")]
#[command(about = "Scrape real-estate listings and serve them over HTTP")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape listing pages once and write them to the store and CSV file
    Scrape {
        /// Fetch exactly this many pages instead of stopping at the first empty one
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        pages: Option<u32>,
        /// Interchange file path
        #[arg(long)]
        csv: Option<PathBuf>,
        /// Skip the database sink
        #[arg(long)]
        no_store: bool,
        /// Skip the CSV sink
        #[arg(long)]
        no_csv: bool,
    },

    /// Serve the read API and dashboard
    Serve {
        #[arg(long)]
        addr: Option<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,annonce_scraper=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut cfg = Config::from_env().context("Failed to load configuration")?;

    match cli.command {
        Commands::Scrape {
            pages,
            csv,
            no_store,
            no_csv,
        } => {
            if pages.is_some() {
                cfg.max_pages = pages;
            }
            if let Some(path) = csv {
                cfg.csv_path = path;
            }
            cfg.write_store = !no_store;
            cfg.write_csv = !no_csv;
            run_scrape(&cfg)
        }
        Commands::Serve { addr } => {
            if let Some(addr) = addr {
                cfg.bind_addr = addr;
            }
            run_server(cfg)
        }
    }
}

fn run_scrape(cfg: &Config) -> Result<()> {
    let report = scrape_with_config(cfg).context("Scrape aborted")?;

    for outcome in &report.sinks.outcomes {
        match &outcome.result {
            Ok(written) => println!("{}: {} rows written", outcome.sink, written),
            Err(e) => println!("{}: failed ({})", outcome.sink, e),
        }
    }
    println!(
        "Scraped {} listings from {} pages ({} failed)",
        report.listings.len(),
        report.pages_fetched,
        report.failed_pages
    );

    Ok(())
}

fn run_server(cfg: Config) -> Result<()> {
    let addr: SocketAddr = cfg
        .bind_addr
        .parse()
        .with_context(|| format!("BIND_ADDR '{}' is not a socket address", cfg.bind_addr))?;

    let state = AppState::new(cfg);

    init_db(&state.db).context("Database initialization failed")?;
    if let Err(e) = state.cache.refresh() {
        warn!(error = %e, "Initial cache load failed, starting empty");
    }

    info!("Starting server at http://{addr}");

    let server = Server::bind(&addr).max_workers(8);

    let result = server.serve(move |req, _info| match handle(req, &state) {
        Ok(resp) => resp,
        Err(err) => error_to_response(err),
    });

    if let Err(e) = result {
        error!(error = %e, "Server ended with error");
    }

    info!("Server shut down cleanly.");
    Ok(())
}
