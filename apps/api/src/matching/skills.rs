//! Skill tokenization — normalizes free-text skill lists into comparable tokens.
//!
//! Skill text arrives from profile forms and vacancy postings with no enforced
//! format. Tokens are lowercased and trimmed so the scorer can compare them
//! case-insensitively.

/// Splits raw skill text on `,`, `;`, or newline into lowercase trimmed tokens.
/// Absent or empty input yields an empty list, never an error.
pub fn tokenize_skills(text: Option<&str>) -> Vec<String> {
    let Some(text) = text else {
        return Vec::new();
    };

    text.split([',', ';', '\n'])
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_input_yields_empty() {
        assert!(tokenize_skills(None).is_empty());
    }

    #[test]
    fn test_empty_string_yields_empty() {
        assert!(tokenize_skills(Some("")).is_empty());
        assert!(tokenize_skills(Some("   ")).is_empty());
    }

    #[test]
    fn test_comma_separated() {
        let tokens = tokenize_skills(Some("Java, Spring, SQL"));
        assert_eq!(tokens, vec!["java", "spring", "sql"]);
    }

    #[test]
    fn test_mixed_separators() {
        let tokens = tokenize_skills(Some("rust;tokio\npostgres, docker"));
        assert_eq!(tokens, vec!["rust", "tokio", "postgres", "docker"]);
    }

    #[test]
    fn test_blank_segments_are_dropped() {
        let tokens = tokenize_skills(Some("rust,,  ,tokio;"));
        assert_eq!(tokens, vec!["rust", "tokio"]);
    }

    #[test]
    fn test_tokens_are_lowercased_and_trimmed() {
        let tokens = tokenize_skills(Some("  Kubernetes ;  CI/CD "));
        assert_eq!(tokens, vec!["kubernetes", "ci/cd"]);
    }
}
