use anyhow::{bail, Context, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::scraper::Termination;

pub const DEFAULT_BASE_URL: &str = "http://www.tunisie-annonce.com/AnnoncesImmobilier.asp?rech_cod_cat=1&rech_cod_rub=&rech_cod_typ=&rech_cod_sou_typ=&rech_cod_pay=TN&rech_cod_reg=&rech_cod_vil=&rech_cod_loc=&rech_prix_min=&rech_prix_max=&rech_surf_min=&rech_surf_max=&rech_age=&rech_photo=&rech_typ_cli=&rech_order_by=31";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub database_path: String,
    pub csv_path: PathBuf,
    pub fetch_timeout: Duration,
    pub page_delay: Duration,
    pub max_pages: Option<u32>,
    pub bind_addr: String,
    pub write_store: bool,
    pub write_csv: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let max_pages = parse_max_pages(env::var("MAX_PAGES").ok().as_deref())?;

        Ok(Self {
            base_url: env::var("ANNONCE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "annonces.sqlite3".to_string()),
            csv_path: env::var("CSV_PATH")
                .unwrap_or_else(|_| "tunisie_annonce_listings.csv".to_string())
                .into(),
            fetch_timeout: Duration::from_secs(
                env::var("FETCH_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .context("FETCH_TIMEOUT_SECS must be a valid number")?,
            ),
            page_delay: Duration::from_millis(
                env::var("PAGE_DELAY_MS")
                    .unwrap_or_else(|_| "1000".to_string())
                    .parse()
                    .context("PAGE_DELAY_MS must be a valid number")?,
            ),
            max_pages,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:5000".to_string()),
            write_store: true,
            write_csv: true,
        })
    }

    pub fn termination(&self) -> Termination {
        Termination::from_max_pages(self.max_pages)
    }
}

/// `MAX_PAGES`: unset or blank means "until an empty page"; otherwise a
/// page count of at least 1.
pub fn parse_max_pages(raw: Option<&str>) -> Result<Option<u32>> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    let pages: u32 = raw
        .parse()
        .with_context(|| format!("MAX_PAGES must be a positive number, got '{raw}'"))?;
    if pages == 0 {
        bail!("MAX_PAGES must be a positive number, got 0");
    }
    Ok(Some(pages))
}
