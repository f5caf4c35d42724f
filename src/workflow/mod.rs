pub mod resolution_flow;
pub mod scrape_task;

pub use resolution_flow::ResolutionFlow;
pub use scrape_task::{PostingKey, ScrapeTask};
