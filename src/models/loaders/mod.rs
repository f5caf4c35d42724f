pub mod output_store;
pub mod profile_store;
pub mod toml_loader;

pub use output_store::{latest_postings, save_enriched_batch, EnrichedBatchFile};
pub use profile_store::{ProfileStore, DEFAULT_PROFILE_ID};
pub use toml_loader::{load_all_posting_batches, load_posting_batch, PostingBatch};
