#![allow(dead_code)]

//! Local scorer — deterministic compatibility estimate from tokenized skills
//! and experience years. No network calls; pure given a fixed jitter source.
//!
//! The final score blends a skill component (70%) with an experience
//! component (30%), then applies a small jitter multiplier so batches of
//! similar profiles do not produce long runs of identical scores.

const SKILL_WEIGHT: f64 = 0.7;
const EXPERIENCE_WEIGHT: f64 = 0.3;
const JITTER_MIN: f64 = 0.95;
const JITTER_SPAN: f64 = 0.10;

// ────────────────────────────────────────────────────────────────────────────
// Jitter source
// ────────────────────────────────────────────────────────────────────────────

/// Source of the score jitter multiplier. Injected so tests can pin the
/// multiplier and make scoring fully deterministic.
pub trait JitterSource: Send + Sync {
    /// Returns a multiplier in [0.95, 1.05].
    fn multiplier(&self) -> f64;
}

/// Production jitter source backed by OS entropy.
pub struct EntropyJitter;

impl JitterSource for EntropyJitter {
    fn multiplier(&self) -> f64 {
        let mut buf = [0u8; 8];
        if getrandom::getrandom(&mut buf).is_err() {
            // No entropy available: fall back to the neutral multiplier.
            return 1.0;
        }
        let unit = u64::from_le_bytes(buf) as f64 / u64::MAX as f64;
        JITTER_MIN + unit * JITTER_SPAN
    }
}

/// Fixed multiplier for tests and reproducible scoring.
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn multiplier(&self) -> f64 {
        self.0
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Computes the local compatibility percentage in [0, 100].
///
/// Tokens must already be normalized (see `skills::tokenize_skills`); matching
/// is bidirectional substring containment.
pub fn score(
    candidate_skills: &[String],
    vacancy_skills: &[String],
    candidate_years: u32,
    vacancy_min_years: u32,
    jitter: &dyn JitterSource,
) -> u32 {
    let skill_pct = skill_match_pct(candidate_skills, vacancy_skills);
    let experience_pct = experience_match_pct(candidate_years, vacancy_min_years);

    let blended = (skill_pct * SKILL_WEIGHT + experience_pct * EXPERIENCE_WEIGHT)
        * jitter.multiplier();

    blended.round().clamp(0.0, 100.0) as u32
}

/// Skill component in [0, 100].
///
/// A vacancy with no declared skill tokens scores 0, not 100. This mirrors
/// the current product behavior even though it penalizes vacancies that left
/// the requirements field blank; keep it until product confirms a change.
fn skill_match_pct(candidate: &[String], vacancy: &[String]) -> f64 {
    if vacancy.is_empty() {
        return 0.0;
    }

    let matches = vacancy
        .iter()
        .filter(|required| {
            candidate
                .iter()
                .any(|offered| offered.contains(required.as_str()) || required.contains(offered.as_str()))
        })
        .count();

    let match_ratio = matches as f64 / vacancy.len() as f64;
    let mut pct = match_ratio * 100.0;

    // Breadth bonus: the candidate lists substantially more skills than asked.
    if candidate.len() as f64 / vacancy.len() as f64 > 1.5 {
        pct += 5.0;
    }
    // Coverage bonus: nearly every requirement is matched.
    if match_ratio > 0.8 {
        pct += 10.0;
    }

    pct.clamp(0.0, 100.0)
}

/// Experience component in [0, 100]. A vacancy with no minimum is fully
/// satisfied by any candidate.
fn experience_match_pct(candidate_years: u32, vacancy_min_years: u32) -> f64 {
    if vacancy_min_years == 0 {
        return 100.0;
    }

    let base = (candidate_years as f64 / vacancy_min_years as f64 * 100.0).min(100.0);

    let excess_years = candidate_years.saturating_sub(vacancy_min_years) as f64;
    let bonus_factor = if vacancy_min_years <= 2 { 5.0 } else { 2.5 };
    let bonus = (excess_years * bonus_factor).min(15.0);

    (base + bonus).min(100.0)
}
