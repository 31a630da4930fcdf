//! Traits and interfaces for fetching film lists

use async_trait::async_trait;

use crate::error::FetchError;
use crate::models::Film;

/// List identifier that addresses a user's watchlist instead of a named list
pub const WATCHLIST: &str = "watchlist";

/// Configuration for a list scraper
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Display name for the website
    pub name: String,
    /// Site origin used for page URLs and relative film links
    pub base_url: String,
    /// Watchlist URL pattern with {user} placeholder
    pub watchlist_url_pattern: String,
    /// Named list URL pattern with {user} and {list} placeholders
    pub list_url_pattern: String,
    /// CSS selectors and attribute names for extracting films
    pub selectors: SiteSelectors,
}

/// Where film data lives inside a list page
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    /// Container selector for individual films
    pub film_container: String,
    /// Poster selector within the film container
    pub poster: String,
    /// Attribute holding the film id
    pub id_attr: String,
    /// Attribute on the poster holding the title
    pub title_attr: String,
    /// Attribute on the poster holding the release year
    pub year_attr: String,
    /// Attribute on the poster holding the relative film link
    pub link_attr: String,
}

/// Fetches a raw HTML page.
///
/// This is the only place that talks to the network, so list parsing can be
/// tested against canned markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return the document body
    async fn fetch_page(&self, url: &str) -> Result<String, FetchError>;
}

/// A source of film collections
#[async_trait]
pub trait FilmSource: Send + Sync {
    /// Fetch a list owned by `username`.
    ///
    /// Both arguments are normalized by the implementation; a list that
    /// normalizes to [`WATCHLIST`] addresses the user's watchlist. An empty
    /// list is `Ok(vec![])`.
    async fn fetch_list(&self, username: &str, list: &str) -> Result<Vec<Film>, FetchError>;

    async fn fetch_watchlist(&self, username: &str) -> Result<Vec<Film>, FetchError> {
        self.fetch_list(username, WATCHLIST).await
    }
}
