//! Letterboxd watchlist and public list scraper

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use tracing::info;

use crate::error::FetchError;
use crate::models::Film;
use crate::traits::{FilmSource, PageFetcher, ScraperConfig, SiteSelectors, WATCHLIST};

/// Normalize a Letterboxd handle: trimmed and lowercase
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Normalize a list name into its URL slug: trimmed, lowercase, spaces as hyphens
pub fn normalize_list_name(list: &str) -> String {
    list.trim().to_lowercase().replace(' ', "-")
}

/// Scraper for Letterboxd list pages
pub struct LetterboxdScraper<F> {
    fetcher: F,
    config: ScraperConfig,
}

impl<F: PageFetcher> LetterboxdScraper<F> {
    /// Create a scraper for the site at `base_url` (no trailing slash)
    pub fn new(fetcher: F, base_url: &str) -> Self {
        let config = ScraperConfig {
            name: "Letterboxd".to_string(),
            base_url: base_url.to_string(),
            watchlist_url_pattern: format!("{base_url}/{{user}}/watchlist/"),
            list_url_pattern: format!("{base_url}/{{user}}/list/{{list}}/"),
            selectors: SiteSelectors {
                film_container: ".poster-container".to_string(),
                poster: ".film-poster".to_string(),
                id_attr: "data-film-id".to_string(),
                title_attr: "alt".to_string(),
                year_attr: "data-film-release-year".to_string(),
                link_attr: "data-target-link".to_string(),
            },
        };

        Self { fetcher, config }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Build the page URL for already normalized arguments
    pub fn build_list_url(&self, username: &str, list: &str) -> String {
        let user = urlencoding::encode(username);
        if list == WATCHLIST {
            self.config.watchlist_url_pattern.replace("{user}", &user)
        } else {
            self.config
                .list_url_pattern
                .replace("{user}", &user)
                .replace("{list}", &urlencoding::encode(list))
        }
    }

    /// Extract every complete film from a list page.
    ///
    /// Entries missing a title or a link are skipped.
    pub fn parse_films(&self, html: &str) -> Result<Vec<Film>, FetchError> {
        let selectors = &self.config.selectors;
        let container_selector = parse_selector(&selectors.film_container)?;
        let poster_selector = parse_selector(&selectors.poster)?;
        let image_selector = parse_selector("img")?;

        let document = Html::parse_document(html);
        let mut films = Vec::new();

        for container in document.select(&container_selector) {
            let poster = container.select(&poster_selector).next();

            let id = attr(Some(container), &selectors.id_attr)
                .or_else(|| attr(poster, &selectors.id_attr))
                .unwrap_or_default();

            let title = attr(poster, &selectors.title_attr)
                .or_else(|| {
                    poster
                        .and_then(|p| p.select(&image_selector).next())
                        .and_then(|img| attr(Some(img), &selectors.title_attr))
                })
                .unwrap_or_default();

            let year = attr(poster, &selectors.year_attr).unwrap_or_default();

            let url = attr(poster, &selectors.link_attr)
                .map(|link| self.absolute_url(&link))
                .unwrap_or_default();

            if title.is_empty() || url.is_empty() {
                continue;
            }

            films.push(Film {
                id,
                title,
                year,
                url,
            });
        }

        Ok(films)
    }

    fn absolute_url(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else if link.starts_with('/') {
            format!("{}{}", self.config.base_url, link)
        } else {
            format!("{}/{}", self.config.base_url, link)
        }
    }
}

#[async_trait]
impl<F: PageFetcher> FilmSource for LetterboxdScraper<F> {
    async fn fetch_list(&self, username: &str, list: &str) -> Result<Vec<Film>, FetchError> {
        let username = normalize_username(username);
        let list = normalize_list_name(list);
        let url = self.build_list_url(&username, &list);

        let html = self.fetcher.fetch_page(&url).await?;
        if html.trim().is_empty() {
            return Err(FetchError::NoDocument { url });
        }

        let films = self.parse_films(&html)?;
        info!(
            "Found {} films in {} on {}",
            films.len(),
            url,
            self.config.name
        );

        Ok(films)
    }
}

fn parse_selector(selector: &str) -> Result<Selector, FetchError> {
    Selector::parse(selector).map_err(|_| FetchError::Selector(selector.to_string()))
}

fn attr(element: Option<ElementRef<'_>>, name: &str) -> Option<String> {
    element?
        .value()
        .attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
