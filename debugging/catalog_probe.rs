//! Fetch a page view from TMDB and print it as JSON.
//! Usage:
//!   cargo run --bin catalog_probe -- home
//!   cargo run --bin catalog_probe -- browse <category> [page]
//!   cargo run --bin catalog_probe -- genre <genre_id> [page]
//!   cargo run --bin catalog_probe -- search <term> [page]
//!   cargo run --bin catalog_probe -- movie <tmdb_id>
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;
use movieflix::catalog::TmdbCatalog;
use movieflix::config::Config;
use movieflix::views::{self, ViewContext};
use serde_json::Value;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Probe {
    Home,
    Browse,
    Genre,
    Search,
    Movie,
}

impl FromStr for Probe {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "home" => Ok(Probe::Home),
            "browse" => Ok(Probe::Browse),
            "genre" => Ok(Probe::Genre),
            "search" => Ok(Probe::Search),
            "movie" => Ok(Probe::Movie),
            _ => Err(anyhow!(
                "probe must be one of 'home', 'browse', 'genre', 'search', 'movie'"
            )),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let mut args = env::args().skip(1);
    let probe: Probe = args
        .next()
        .ok_or_else(|| anyhow!("missing probe kind"))?
        .parse()?;
    let arg = args.next();
    let page = args
        .next()
        .map(|p| p.parse::<u32>())
        .transpose()
        .context("page must be a number")?
        .unwrap_or(1);

    let config = Config::from_env()?;
    let catalog = TmdbCatalog::new(&config)?;
    let ctx = ViewContext {
        image_base: config.image_base.clone(),
        site_origin: config.site_origin.clone(),
    };

    let output: Value = match probe {
        Probe::Home => serde_json::to_value(views::home(&catalog, &ctx).await)?,
        Probe::Browse => serde_json::to_value(
            views::browse(&catalog, &ctx, arg.as_deref(), None, page).await,
        )?,
        Probe::Genre => {
            let genre = arg.ok_or_else(|| anyhow!("missing genre id"))?;
            serde_json::to_value(views::browse(&catalog, &ctx, None, Some(&genre), page).await)?
        }
        Probe::Search => {
            let term = arg.ok_or_else(|| anyhow!("missing search term"))?;
            serde_json::to_value(views::search(&catalog, &ctx, &term, page).await)?
        }
        Probe::Movie => {
            let id = arg.ok_or_else(|| anyhow!("missing tmdb id"))?;
            let view = views::movie(&catalog, &ctx, &id)
                .await
                .map_err(|_| anyhow!("movie {} not found", id))?;
            serde_json::to_value(view)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
