pub mod letterboxd;

pub use letterboxd::LetterboxdScraper;
