//! Data models for films scraped from Letterboxd

/// A film entry scraped from a watchlist or a public list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Film {
    /// Letterboxd's own film id, may be empty
    pub id: String,
    pub title: String,
    /// Release year, empty when the page does not expose it
    pub year: String,
    /// Absolute link to the film page
    pub url: String,
}

impl Film {
    /// `Title (Year)`, or just the title when the year is unknown
    pub fn display_title(&self) -> String {
        if self.year.is_empty() {
            self.title.clone()
        } else {
            format!("{} ({})", self.title, self.year)
        }
    }
}
