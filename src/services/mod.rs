pub mod criteria_compiler;
pub mod match_scoring;
pub mod retry_policy;
pub mod targeted_resolver;
pub mod url_validator;

pub use criteria_compiler::{compile_criteria, compile_criteria_at};
pub use match_scoring::score_posting;
pub use retry_policy::RetryPolicy;
pub use targeted_resolver::{
    AttemptFailure, NotFoundReason, Resolution, ResolutionOutcome, Step, TargetedResolver,
};
pub use url_validator::UrlValidator;
