pub mod fetch;
pub mod scrape;
pub mod server;
