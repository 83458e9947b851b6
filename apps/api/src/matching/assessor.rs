//! Compatibility assessment — blends the deterministic local score with the
//! generative augmentation step into one `CompatibilityAssessment`.
//!
//! `assess` is infallible by contract: augmentation and interpretation
//! failures degrade to the local score with synthesized messages, and the
//! raw error never reaches the caller. Only entity lookups (done upstream in
//! the handlers) can fail.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::augmentation::AugmentationClient;
use crate::matching::interpreter::parse_object;
use crate::matching::prompts::build_assessment_prompt;
use crate::matching::scorer::{self, JitterSource};
use crate::matching::skills::tokenize_skills;
use crate::models::profile::{CandidateProfile, VacancyProfile};

/// Score tiers used when messages have to be synthesized locally.
const TIER_EXCELLENT: u32 = 85;
const TIER_GOOD: u32 = 70;
const TIER_MODERATE: u32 = 50;

/// At most this many strengths/weaknesses are quoted in synthesized messages.
const MESSAGE_ITEM_LIMIT: usize = 3;

/// Structured result of scoring one candidate against one vacancy.
/// Constructed once per pair and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatibilityAssessment {
    pub vacancy_id: Uuid,
    pub percentage: u32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
    pub candidate_message: String,
    pub recruiter_message: String,
    pub computed_at: DateTime<Utc>,
}

/// Orchestrates LocalScorer + AugmentationClient + ResponseInterpreter.
pub struct CompatibilityAssessor {
    augmentor: Arc<dyn AugmentationClient>,
    jitter: Arc<dyn JitterSource>,
}

impl CompatibilityAssessor {
    pub fn new(augmentor: Arc<dyn AugmentationClient>, jitter: Arc<dyn JitterSource>) -> Self {
        Self { augmentor, jitter }
    }

    /// Scores one candidate against one vacancy. Always returns a value.
    pub async fn assess(
        &self,
        candidate: &CandidateProfile,
        vacancy: &VacancyProfile,
    ) -> CompatibilityAssessment {
        let candidate_skills = tokenize_skills(candidate.skills_text.as_deref());
        let vacancy_skills = tokenize_skills(vacancy.skills_text.as_deref());

        let local_score = scorer::score(
            &candidate_skills,
            &vacancy_skills,
            candidate.experience_years,
            vacancy.min_experience_years,
            self.jitter.as_ref(),
        );

        let prompt = build_assessment_prompt(
            &candidate_skills,
            candidate.experience_years,
            &vacancy.title,
            &vacancy_skills,
            vacancy.min_experience_years,
            local_score,
        );

        let parsed = match self.augmentor.generate(&prompt).await {
            Ok(text) => parse_object(&text),
            Err(e) => {
                warn!(
                    "augmentation failed for candidate {} / vacancy {}: {e}; \
                     falling back to local score",
                    candidate.id, vacancy.id
                );
                Map::new()
            }
        };

        let assessment = assemble_assessment(vacancy.id, local_score, parsed);
        debug!(
            "assessed candidate {} against vacancy {}: {}%",
            candidate.id, vacancy.id, assessment.percentage
        );
        assessment
    }
}

/// Builds the final assessment from the local score and whatever the
/// interpreter managed to extract.
fn assemble_assessment(
    vacancy_id: Uuid,
    local_score: u32,
    parsed: Map<String, Value>,
) -> CompatibilityAssessment {
    // The augmented percentage is trusted only when it is a number in range;
    // anything else keeps the local score.
    let percentage = extract_percentage(&parsed).unwrap_or(local_score);

    let strengths = extract_strings(&parsed, "strengths");
    let weaknesses = extract_strings(&parsed, "weaknesses");
    let recommendations = extract_strings(&parsed, "recommendations");

    let candidate_message = extract_string(&parsed, "candidateMessage")
        .unwrap_or_else(|| synthesize_candidate_message(percentage, &strengths));
    let recruiter_message = extract_string(&parsed, "recruiterMessage")
        .unwrap_or_else(|| synthesize_recruiter_message(percentage, &weaknesses));

    CompatibilityAssessment {
        vacancy_id,
        percentage,
        strengths,
        weaknesses,
        recommendations,
        candidate_message,
        recruiter_message,
        computed_at: Utc::now(),
    }
}

/// Accepts `percentage` only as a number in [0, 100]; integers or floats.
fn extract_percentage(parsed: &Map<String, Value>) -> Option<u32> {
    let number = parsed.get("percentage")?.as_f64()?;
    if (0.0..=100.0).contains(&number) {
        Some(number.round() as u32)
    } else {
        None
    }
}

fn extract_string(parsed: &Map<String, Value>, key: &str) -> Option<String> {
    parsed
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Harvests a string array leniently: non-string members are skipped, a
/// missing or non-array value yields an empty list.
fn extract_strings(parsed: &Map<String, Value>, key: &str) -> Vec<String> {
    parsed
        .get(key)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn tier_label(percentage: u32) -> &'static str {
    if percentage >= TIER_EXCELLENT {
        "excellent"
    } else if percentage >= TIER_GOOD {
        "good"
    } else if percentage >= TIER_MODERATE {
        "moderate"
    } else {
        "limited"
    }
}

fn synthesize_candidate_message(percentage: u32, strengths: &[String]) -> String {
    let tier = tier_label(percentage);
    if strengths.is_empty() {
        format!("Your compatibility with this vacancy is {tier} ({percentage}%).")
    } else {
        format!(
            "Your compatibility with this vacancy is {tier} ({percentage}%). Key strengths: {}.",
            strengths
                .iter()
                .take(MESSAGE_ITEM_LIMIT)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

fn synthesize_recruiter_message(percentage: u32, weaknesses: &[String]) -> String {
    let tier = tier_label(percentage);
    if weaknesses.is_empty() {
        format!("Candidate shows {tier} compatibility ({percentage}%).")
    } else {
        format!(
            "Candidate shows {tier} compatibility ({percentage}%). Areas to probe: {}.",
            weaknesses
                .iter()
                .take(MESSAGE_ITEM_LIMIT)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augmentation::AugmentationError;
    use crate::matching::scorer::FixedJitter;
    use async_trait::async_trait;
    use serde_json::json;

    struct StubAugmentor {
        response: Option<String>,
    }

    #[async_trait]
    impl AugmentationClient for StubAugmentor {
        async fn generate(&self, _prompt: &str) -> Result<String, AugmentationError> {
            match &self.response {
                Some(text) => Ok(text.clone()),
                None => Err(AugmentationError::EmptyContent),
            }
        }
    }

    fn candidate(skills: &str, years: u32) -> CandidateProfile {
        CandidateProfile {
            id: Uuid::new_v4(),
            full_name: "Grace Hopper".to_string(),
            skills_text: Some(skills.to_string()),
            experience_years: years,
        }
    }

    fn vacancy(skills: &str, min_years: u32) -> VacancyProfile {
        VacancyProfile {
            id: Uuid::new_v4(),
            title: "Backend Engineer".to_string(),
            skills_text: Some(skills.to_string()),
            min_experience_years: min_years,
        }
    }

    fn assessor_with(response: Option<&str>) -> CompatibilityAssessor {
        CompatibilityAssessor::new(
            Arc::new(StubAugmentor {
                response: response.map(str::to_string),
            }),
            Arc::new(FixedJitter(1.0)),
        )
    }

    #[tokio::test]
    async fn test_well_formed_response_drives_the_assessment() {
        let assessor = assessor_with(Some(
            r#"{
                "percentage": 81,
                "strengths": ["rust", "sql"],
                "weaknesses": ["no react"],
                "recommendations": ["ship a small react project"],
                "candidateMessage": "Strong fit overall.",
                "recruiterMessage": "Worth a phone screen."
            }"#,
        ));
        let result = assessor
            .assess(&candidate("rust, sql", 5), &vacancy("rust, react", 3))
            .await;

        assert_eq!(result.percentage, 81);
        assert_eq!(result.strengths, vec!["rust", "sql"]);
        assert_eq!(result.candidate_message, "Strong fit overall.");
        assert_eq!(result.recruiter_message, "Worth a phone screen.");
    }

    #[tokio::test]
    async fn test_augmentation_failure_degrades_to_local_score() {
        let assessor = assessor_with(None);
        let result = assessor
            .assess(&candidate("java, spring, sql", 5), &vacancy("java,react", 3))
            .await;

        // Local worked example: 50 × 0.7 + 100 × 0.3 = 65 at fixed jitter 1.0.
        assert_eq!(result.percentage, 65);
        assert!(result.strengths.is_empty());
        assert!(result.candidate_message.contains("65%"));
        assert!(result.recruiter_message.contains("65%"));
    }

    #[tokio::test]
    async fn test_out_of_range_percentage_is_ignored() {
        let assessor = assessor_with(Some(r#"{"percentage": 250}"#));
        let result = assessor
            .assess(&candidate("java, spring, sql", 5), &vacancy("java,react", 3))
            .await;
        assert_eq!(result.percentage, 65);
    }

    #[tokio::test]
    async fn test_non_numeric_percentage_is_ignored() {
        let assessor = assessor_with(Some(r#"{"percentage": "eighty"}"#));
        let result = assessor
            .assess(&candidate("java, spring, sql", 5), &vacancy("java,react", 3))
            .await;
        assert_eq!(result.percentage, 65);
    }

    #[tokio::test]
    async fn test_prose_response_falls_back_entirely() {
        let assessor = assessor_with(Some("I'd rather chat about the weather."));
        let result = assessor
            .assess(&candidate("java, spring, sql", 5), &vacancy("java,react", 3))
            .await;
        assert_eq!(result.percentage, 65);
        assert!(result.strengths.is_empty());
        assert!(!result.candidate_message.is_empty());
    }

    #[tokio::test]
    async fn test_messages_synthesized_when_absent() {
        let assessor = assessor_with(Some(
            r#"{"percentage": 90, "strengths": ["rust", "tokio", "sqlx", "axum"]}"#,
        ));
        let result = assessor
            .assess(&candidate("rust", 5), &vacancy("rust", 1))
            .await;

        assert_eq!(result.percentage, 90);
        assert!(result.candidate_message.contains("excellent"));
        // Only the first three strengths are quoted.
        assert!(result.candidate_message.contains("rust, tokio, sqlx"));
        assert!(!result.candidate_message.contains("axum"));
    }

    #[tokio::test]
    async fn test_vacancy_id_tags_the_assessment() {
        let v = vacancy("rust", 1);
        let assessor = assessor_with(None);
        let result = assessor.assess(&candidate("rust", 2), &v).await;
        assert_eq!(result.vacancy_id, v.id);
    }

    #[test]
    fn test_tier_labels() {
        assert_eq!(tier_label(100), "excellent");
        assert_eq!(tier_label(85), "excellent");
        assert_eq!(tier_label(84), "good");
        assert_eq!(tier_label(70), "good");
        assert_eq!(tier_label(69), "moderate");
        assert_eq!(tier_label(50), "moderate");
        assert_eq!(tier_label(49), "limited");
        assert_eq!(tier_label(0), "limited");
    }

    #[test]
    fn test_extract_strings_skips_non_string_members() {
        let map = match json!({"strengths": ["rust", 42, null, "sql"]}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        assert_eq!(extract_strings(&map, "strengths"), vec!["rust", "sql"]);
        assert!(extract_strings(&map, "weaknesses").is_empty());
    }

    #[test]
    fn test_extract_percentage_accepts_floats_in_range() {
        let map = match json!({"percentage": 72.4}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        assert_eq!(extract_percentage(&map), Some(72));
    }

    #[test]
    fn test_blank_message_is_treated_as_absent() {
        let map = match json!({"candidateMessage": "   "}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        assert!(extract_string(&map, "candidateMessage").is_none());
    }
}
