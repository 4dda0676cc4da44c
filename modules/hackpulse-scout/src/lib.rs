pub mod channels;
pub mod extractor;
pub mod filter;
pub mod ingest;
pub mod rate_limit;
pub mod scheduler;
pub mod scraper;
pub mod search;

#[cfg(test)]
pub(crate) mod testing;
