//! 匹配评分 - 业务能力层
//!
//! 把一个职位与 `MatchCriteria` 比较，得到 0-100 的分数以及每一项的贡献。
//!
//! | 维度 | 权重 |
//! |------|------|
//! | 职位名称 | 35 |
//! | 地点 | 25 |
//! | 经验 | 20 |
//! | 语言 | 15 |
//! | 发布时间 | 5 |
//!
//! 评分只扣分、不过滤：缺失的字段让对应维度得 0 分，并记录为 `missing:<field>`。
//! 每个维度恰好输出一个主因素，所有因素的贡献之和等于总分。

use phf::phf_set;

use crate::models::criteria::MatchCriteria;
use crate::models::posting::{JobPosting, MatchScore, ScoreFactor};
use crate::utils::text::{shared_words, words};

pub const ROLE_WEIGHT: i32 = 35;
pub const LOCATION_WEIGHT: i32 = 25;
pub const EXPERIENCE_WEIGHT: i32 = 20;
pub const LANGUAGE_WEIGHT: i32 = 15;
pub const RECENCY_WEIGHT: i32 = 5;

/// 表示高级职位的词
static SENIOR_TERMS: phf::Set<&'static str> = phf_set! {
    "senior", "sr", "lead", "principal", "chief", "director",
};

static REMOTE_TERMS: phf::Set<&'static str> = phf_set! {
    "remote", "thuiswerk", "thuiswerken", "anywhere",
};

static YEAR_WORDS: phf::Set<&'static str> = phf_set! {
    "year", "years", "yrs", "jaar",
};

static EXPERIENCE_WORDS: phf::Set<&'static str> = phf_set! {
    "experience", "ervaring", "work", "working", "professional", "relevant",
};

/// 计算职位的匹配分数
pub fn score_posting(posting: &JobPosting, criteria: &MatchCriteria) -> MatchScore {
    let mut factors = Vec::with_capacity(8);

    role_component(posting, criteria, &mut factors);
    location_component(posting, criteria, &mut factors);
    experience_component(posting, criteria, &mut factors);
    language_component(posting, criteria, &mut factors);
    recency_component(posting, criteria, &mut factors);

    let total: i32 = factors.iter().map(|f| f.contribution).sum();
    MatchScore {
        score: total.clamp(0, 100) as u8,
        factors,
    }
}

fn role_component(posting: &JobPosting, criteria: &MatchCriteria, factors: &mut Vec<ScoreFactor>) {
    let title_words = words(&posting.title);
    if title_words.is_empty() {
        factors.push(ScoreFactor::new("role:none", 0));
        factors.push(ScoreFactor::new("missing:title", 0));
        return;
    }

    let title_lower = posting.title.to_lowercase();
    let title_joined = format!(" {} ", title_words.join(" "));

    // 完全包含：取最长的变体，便于审计
    let exact = criteria
        .role_tokens
        .iter()
        .filter(|variant| {
            let variant_joined = format!(" {} ", words(variant).join(" "));
            title_lower.contains(variant.as_str()) || title_joined.contains(&variant_joined)
        })
        .fold(None::<&String>, |best, variant| match best {
            Some(b) if b.len() >= variant.len() => Some(b),
            _ => Some(variant),
        });

    if let Some(variant) = exact {
        factors.push(ScoreFactor::new(format!("role:exact:{}", variant), ROLE_WEIGHT));
        return;
    }

    let partial = criteria
        .role_tokens
        .iter()
        .map(|variant| shared_words(&posting.title, variant))
        .filter(|shared| !shared.is_empty())
        .fold(None::<Vec<String>>, |best, shared| match best {
            Some(b) if b.len() >= shared.len() => Some(b),
            _ => Some(shared),
        });

    match partial {
        Some(shared) => factors.push(ScoreFactor::new(
            format!("role:partial:{}", shared.join("+")),
            ROLE_WEIGHT / 2,
        )),
        None => factors.push(ScoreFactor::new("role:none", 0)),
    }
}

fn location_component(
    posting: &JobPosting,
    criteria: &MatchCriteria,
    factors: &mut Vec<ScoreFactor>,
) {
    let location = posting
        .location
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty());

    let location_joined = location.map(|l| format!(" {} ", words(l).join(" ")));
    let mentions = |place: &str| {
        location_joined
            .as_ref()
            .is_some_and(|joined| joined.contains(&format!(" {} ", words(place).join(" "))))
    };

    let remote = words(location.unwrap_or_default())
        .iter()
        .chain(words(&posting.title).iter())
        .any(|w| REMOTE_TERMS.contains(w.as_str()));

    let primary = if let Some(city) = criteria.allowed_cities.iter().find(|c| mentions(c)) {
        ScoreFactor::new(format!("location:city:{}", city), LOCATION_WEIGHT)
    } else if let Some(country) = criteria.allowed_countries.iter().find(|c| mentions(c)) {
        ScoreFactor::new(format!("location:country:{}", country), LOCATION_WEIGHT)
    } else if remote && criteria.allow_remote {
        ScoreFactor::new("location:remote", LOCATION_WEIGHT)
    } else if remote {
        ScoreFactor::new("location:remote-not-allowed", 0)
    } else if location.is_none() {
        ScoreFactor::new("location:unknown", 0)
    } else {
        ScoreFactor::new("location:mismatch", 0)
    };

    factors.push(primary);
    if location.is_none() {
        factors.push(ScoreFactor::new("missing:location", 0));
    }
}

fn experience_component(
    posting: &JobPosting,
    criteria: &MatchCriteria,
    factors: &mut Vec<ScoreFactor>,
) {
    let title_words = words(&posting.title);

    if criteria.experience.exclude_senior_titles {
        let senior_term = title_words
            .iter()
            .find(|w| SENIOR_TERMS.contains(w.as_str()))
            .cloned()
            .or_else(|| {
                title_words
                    .windows(2)
                    .any(|pair| pair[0] == "head" && pair[1] == "of")
                    .then(|| "head of".to_string())
            });

        if let Some(term) = senior_term {
            factors.push(ScoreFactor::new(format!("experience:senior-title:{}", term), 0));
            return;
        }
    }

    if let Some(years) = stated_years_of_experience(&posting.searchable_text()) {
        if years > criteria.experience.max_years {
            factors.push(ScoreFactor::new(format!("experience:years-exceeded:{}", years), 0));
            return;
        }
    }

    factors.push(ScoreFactor::new("experience:fit", EXPERIENCE_WEIGHT));
}

/// 文本中声明的最高经验年限要求，例如 "3+ years of experience"
///
/// 对 "3-5 years" 这样的区间取下限。
fn stated_years_of_experience(text: &str) -> Option<u32> {
    let tokens = words(text);
    let mut strictest: Option<u32> = None;

    for (idx, token) in tokens.iter().enumerate() {
        if !YEAR_WORDS.contains(token.as_str()) {
            continue;
        }

        let followed_by_experience = tokens
            .iter()
            .skip(idx + 1)
            .take(3)
            .any(|w| EXPERIENCE_WORDS.contains(w.as_str()));
        if !followed_by_experience {
            continue;
        }

        let mut start = idx;
        while start > 0 && tokens[start - 1].chars().all(|c| c.is_ascii_digit()) {
            start -= 1;
        }
        if start == idx {
            continue;
        }

        if let Ok(years) = tokens[start].parse::<u32>() {
            if years <= 40 {
                strictest = Some(strictest.map_or(years, |s| s.max(years)));
            }
        }
    }

    strictest
}

fn language_component(
    posting: &JobPosting,
    criteria: &MatchCriteria,
    factors: &mut Vec<ScoreFactor>,
) {
    let has_description = posting
        .description
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty());
    if !has_description {
        factors.push(ScoreFactor::new("language:unknown", 0));
        factors.push(ScoreFactor::new("missing:description", 0));
        return;
    }

    let text = posting.searchable_text();

    if let Some(excluded) = criteria
        .languages
        .iter()
        .find(|l| l.exclude_if_required && l.is_required_by(&text))
    {
        factors.push(ScoreFactor::new(format!("language:excluded:{}", excluded.name), 0));
        return;
    }

    let required: Vec<_> = criteria.languages.iter().filter(|l| l.required).collect();
    let missing: Vec<&str> = required
        .iter()
        .filter(|l| !l.is_mentioned_in(&text))
        .map(|l| l.name.as_str())
        .collect();

    if missing.is_empty() {
        factors.push(ScoreFactor::new("language:fit", LANGUAGE_WEIGHT));
        return;
    }

    let present = (required.len() - missing.len()) as i32;
    let contribution = LANGUAGE_WEIGHT * present / required.len() as i32;
    factors.push(ScoreFactor::new(
        format!("language:missing:{}", missing.join("+")),
        contribution,
    ));
}

fn recency_component(
    posting: &JobPosting,
    criteria: &MatchCriteria,
    factors: &mut Vec<ScoreFactor>,
) {
    let Some(posted) = posting.posted_date else {
        factors.push(ScoreFactor::new("recency:unknown", 0));
        factors.push(ScoreFactor::new("missing:postedDate", 0));
        return;
    };

    let window = i64::from(criteria.max_posting_age_days);
    let age = (criteria.reference_date - posted).num_days();

    let factor = if age <= window {
        ScoreFactor::new("recency:fresh", RECENCY_WEIGHT)
    } else if age >= window * 2 {
        ScoreFactor::new(format!("recency:stale:{}d", age), 0)
    } else {
        let contribution = (i64::from(RECENCY_WEIGHT) * (window * 2 - age) / window) as i32;
        ScoreFactor::new(format!("recency:decayed:{}d", age), contribution)
    };
    factors.push(factor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::{
        ExperienceRange, LanguageRequirement, LocationPreferences, SearchCriteria, UserProfile,
    };
    use crate::services::criteria_compiler::compile_criteria_at;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn criteria_with(allow_remote: bool, exclude_senior: bool) -> MatchCriteria {
        let profile = UserProfile {
            name: "Seray".into(),
            email: None,
            search_criteria: SearchCriteria {
                role_variations: vec![
                    "Learning Designer".into(),
                    "Trainer".into(),
                    "Experiential Learning Designer".into(),
                ],
                location_prefs: LocationPreferences {
                    country: "Netherlands".into(),
                    cities: vec!["Amsterdam".into(), "Rotterdam".into()],
                    allow_remote,
                },
                experience: ExperienceRange {
                    min_years: 0,
                    max_years: 5,
                    exclude_senior_roles: exclude_senior,
                },
                languages: vec![
                    LanguageRequirement {
                        language: "English".into(),
                        required: true,
                        exclude_if_required: false,
                    },
                    LanguageRequirement {
                        language: "Dutch".into(),
                        required: false,
                        exclude_if_required: true,
                    },
                ],
                posting_recency_days: 30,
                min_target_jobs: 8,
                max_target_jobs: 12,
                job_sources: vec![],
            },
            profile_id: None,
            timezone: "Europe/Amsterdam".into(),
        };
        compile_criteria_at(&profile, today()).unwrap()
    }

    fn criteria() -> MatchCriteria {
        criteria_with(true, true)
    }

    fn ideal_posting() -> JobPosting {
        JobPosting::new("Learning Designer", "Acme", "indeed", "https://nl.indeed.com/viewjob?jk=abc123")
            .with_location("Amsterdam, Netherlands")
            .with_description("Design blended learning journeys. English speaking team.")
            .with_posted_date(NaiveDate::from_ymd_opt(2026, 10, 10).unwrap())
    }

    fn contribution(score: &MatchScore, prefix: &str) -> i32 {
        score
            .factor_with_prefix(prefix)
            .map(|f| f.contribution)
            .unwrap_or_else(|| panic!("no factor with prefix {prefix}: {:?}", score.factors))
    }

    #[test]
    fn ideal_posting_scores_full_marks() {
        let score = score_posting(&ideal_posting(), &criteria());
        assert_eq!(score.score, 100);
        assert_eq!(contribution(&score, "role:exact"), ROLE_WEIGHT);
        assert!(score.has_factor("location:city:amsterdam"));
    }

    #[test]
    fn factor_contributions_sum_to_score() {
        let postings = [
            ideal_posting(),
            JobPosting::new("Senior Warehouse Lead", "Globex", "linkedin", ""),
            ideal_posting().with_description("Fluent Dutch required."),
        ];
        for posting in postings {
            let score = score_posting(&posting, &criteria());
            let sum: i32 = score.factors.iter().map(|f| f.contribution).sum();
            assert_eq!(sum, i32::from(score.score));
        }
    }

    #[test]
    fn longest_exact_variant_is_reported() {
        let posting = JobPosting { title: "Experiential Learning Designer".into(), ..ideal_posting() };
        let score = score_posting(&posting, &criteria());
        assert!(score.has_factor("role:exact:experiential learning designer"));
    }

    #[test]
    fn partial_title_overlap_gets_half_weight() {
        let posting = JobPosting { title: "Instructional Designer".into(), ..ideal_posting() };
        let score = score_posting(&posting, &criteria());
        assert_eq!(contribution(&score, "role:"), ROLE_WEIGHT / 2);
        assert!(score.has_factor("role:partial:designer"));

        let unrelated = JobPosting { title: "Forklift Operator".into(), ..ideal_posting() };
        let score = score_posting(&unrelated, &criteria());
        assert!(score.has_factor("role:none"));
    }

    #[test]
    fn remote_postings_depend_on_allow_remote() {
        let remote = ideal_posting().with_location("Remote (EU)");
        assert!(score_posting(&remote, &criteria_with(true, true)).has_factor("location:remote"));

        let score = score_posting(&remote, &criteria_with(false, true));
        assert_eq!(contribution(&score, "location:"), 0);
        assert!(score.has_factor("location:remote-not-allowed"));
    }

    #[test]
    fn country_match_and_mismatch() {
        let utrecht = ideal_posting().with_location("Utrecht, Netherlands");
        assert!(score_posting(&utrecht, &criteria()).has_factor("location:country:netherlands"));

        let berlin = ideal_posting().with_location("Berlin, Germany");
        let score = score_posting(&berlin, &criteria());
        assert!(score.has_factor("location:mismatch"));
        assert_eq!(score.score, 75);
    }

    #[test]
    fn senior_titles_are_penalised_not_dropped() {
        let posting = JobPosting { title: "Senior Learning Designer".into(), ..ideal_posting() };
        let score = score_posting(&posting, &criteria());
        assert!(score.has_factor("experience:senior-title:senior"));
        assert_eq!(score.score, 80);

        let allowed = score_posting(&posting, &criteria_with(true, false));
        assert_eq!(allowed.score, 100);

        let head = JobPosting { title: "Head of Learning".into(), ..ideal_posting() };
        assert!(score_posting(&head, &criteria()).has_factor("experience:senior-title:head of"));
    }

    #[test]
    fn stated_years_above_range_zero_experience() {
        let posting = ideal_posting()
            .with_description("English speaking team. You bring 7+ years of experience in L&D.");
        let score = score_posting(&posting, &criteria());
        assert!(score.has_factor("experience:years-exceeded:7"));

        assert_eq!(stated_years_of_experience("3-5 years experience"), Some(3));
        assert_eq!(stated_years_of_experience("a company with 25 years history"), None);
    }

    #[test]
    fn excluded_language_zeroes_component() {
        let posting = ideal_posting().with_description("English and fluent Dutch required.");
        let score = score_posting(&posting, &criteria());
        assert!(score.has_factor("language:excluded:dutch"));
        assert_eq!(contribution(&score, "language:"), 0);
    }

    #[test]
    fn missing_required_language_subtracts_proportionally() {
        let posting = ideal_posting().with_description("Design learning journeys for our teams.");
        let score = score_posting(&posting, &criteria());
        assert!(score.has_factor("language:missing:english"));
        assert_eq!(contribution(&score, "language:"), 0);
        assert_eq!(score.score, 85);
    }

    #[test]
    fn languages_listed_in_requirements_count() {
        let posting = ideal_posting()
            .with_description("Design learning journeys for our teams.")
            .with_requirements(vec!["Fluent English".into(), "3+ years in L&D".into()]);
        let score = score_posting(&posting, &criteria());
        assert!(score.has_factor("language:fit"));
        assert_eq!(contribution(&score, "language:"), LANGUAGE_WEIGHT);
    }

    #[test]
    fn recency_decays_linearly_to_twice_the_window() {
        let at = |days_ago: i64| {
            let posting = ideal_posting().with_posted_date(today() - chrono::Duration::days(days_ago));
            contribution(&score_posting(&posting, &criteria()), "recency:")
        };
        assert_eq!(at(0), 5);
        assert_eq!(at(30), 5);
        assert_eq!(at(45), 2);
        assert_eq!(at(59), 0);
        assert_eq!(at(60), 0);
        assert_eq!(at(400), 0);
        assert_eq!(at(-3), 5);
    }

    #[test]
    fn missing_fields_are_recorded_not_fatal() {
        let posting = JobPosting::new("Trainer", "Acme", "indeed", "");
        let score = score_posting(&posting, &criteria());
        assert!(score.has_factor("missing:postedDate"));
        assert!(score.has_factor("missing:location"));
        assert!(score.has_factor("missing:description"));
        assert_eq!(score.score, (ROLE_WEIGHT + EXPERIENCE_WEIGHT) as u8);

        let untitled = JobPosting::new("  ", "Acme", "indeed", "");
        assert!(score_posting(&untitled, &criteria()).has_factor("missing:title"));
    }

    #[test]
    fn scoring_is_deterministic() {
        let posting = ideal_posting().with_location("Remote / Rotterdam");
        let first = score_posting(&posting, &criteria());
        let second = score_posting(&posting, &criteria());
        assert_eq!(first, second);
    }
}
