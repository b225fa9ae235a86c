pub mod serpapi;

use crate::domain::market::CompetitorEntry;
use crate::error::Result;

#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    /// Runs a keyword search and returns the results in rank order.
    async fn search(&self, query: &str) -> Result<Vec<CompetitorEntry>>;
}
