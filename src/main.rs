use std::sync::Arc;

use anyhow::Result;
use teloxide::Bot;
use tracing::info;

mod command;
mod config;
mod dialog;
mod error;
mod fetcher;
mod formatter;
mod models;
mod picker;
mod scrapers;
mod telegram;
mod traits;

use config::Config;
use dialog::PickerBot;
use fetcher::HttpFetcher;
use picker::RandomPicker;
use scrapers::LetterboxdScraper;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    info!("Starting Letterboxd Watchlist Picker Bot");

    let config = Config::from_env()?;

    let scraper = LetterboxdScraper::new(HttpFetcher::new(&config)?, &config.base_url);
    info!("Scraping lists from {}", scraper.config().base_url);

    let picker = PickerBot::new(Arc::new(scraper), Arc::new(RandomPicker));
    let bot = Bot::new(&config.bot_token);

    telegram::run(bot, picker).await
}
