pub mod criteria;
pub mod loaders;
pub mod posting;
pub mod profile;

pub use criteria::{ExperienceCriteria, LanguageCriterion, MatchCriteria};
pub use loaders::{load_all_posting_batches, PostingBatch, ProfileStore};
pub use posting::{
    EnrichedJobPosting, JobPosting, MatchScore, ScoreFactor, UrlClass, URL_NOT_AVAILABLE,
};
pub use profile::{ExperienceRange, LanguageRequirement, LocationPreferences, SearchCriteria, UserProfile};
