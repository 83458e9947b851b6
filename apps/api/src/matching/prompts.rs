// All augmentation prompt constants for the Matching module.
// The JSON-only system instruction lives with the augmentation client.

/// Assessment prompt template. Replace: {candidate_skills}, {candidate_years},
/// {vacancy_title}, {vacancy_skills}, {vacancy_min_years}, {local_score}
/// before sending.
pub const ASSESSMENT_PROMPT_TEMPLATE: &str = r#"Assess how compatible this candidate is with this vacancy.

CANDIDATE:
- Skills: {candidate_skills}
- Years of experience: {candidate_years}

VACANCY: {vacancy_title}
- Required skills: {vacancy_skills}
- Minimum years of experience: {vacancy_min_years}

A deterministic local heuristic scored this pair at {local_score}/100. Use it
as an anchor; adjust only when the profiles justify it.

Return a JSON object with this EXACT schema (no extra fields):
{
  "percentage": 72,
  "strengths": ["Direct experience with the core required stack"],
  "weaknesses": ["No exposure to the listed frontend framework"],
  "recommendations": ["Complete an introductory React project"],
  "candidateMessage": "One short paragraph addressed to the candidate",
  "recruiterMessage": "One short paragraph addressed to the recruiter"
}

Rules:
- "percentage" is an integer from 0 to 100.
- "strengths", "weaknesses", "recommendations" each hold 1 to 5 short strings.
- Messages are plain prose, two sentences at most, no markdown."#;

/// Fills the assessment template with candidate and vacancy attributes.
pub fn build_assessment_prompt(
    candidate_skills: &[String],
    candidate_years: u32,
    vacancy_title: &str,
    vacancy_skills: &[String],
    vacancy_min_years: u32,
    local_score: u32,
) -> String {
    ASSESSMENT_PROMPT_TEMPLATE
        .replace("{candidate_skills}", &join_or_none(candidate_skills))
        .replace("{candidate_years}", &candidate_years.to_string())
        .replace("{vacancy_title}", vacancy_title)
        .replace("{vacancy_skills}", &join_or_none(vacancy_skills))
        .replace("{vacancy_min_years}", &vacancy_min_years.to_string())
        .replace("{local_score}", &local_score.to_string())
}

fn join_or_none(tokens: &[String]) -> String {
    if tokens.is_empty() {
        "(none listed)".to_string()
    } else {
        tokens.join(", ")
    }
}
