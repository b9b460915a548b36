mod scraper;
mod scraper_error;

pub use scraper::CottageScraper;
pub use scraper_error::ScraperError;
